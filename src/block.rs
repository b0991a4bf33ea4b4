use tracing::trace;

use crate::brake::Brake;
use crate::buffer::FixedVec;
use crate::profile::Profile;
use crate::tolerance::T_DUPLICATE;

/// Most candidate profiles a single free-time solve can produce.
pub const MAX_CANDIDATES: usize = 6;

/// Candidate profiles collected by a free-time solve.
pub type Candidates<const N: usize> = FixedVec<Profile, N>;

/// An open range of durations no profile exists for.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Interval {
    pub left: f64,
    pub right: f64,
    /// Profile with duration `right`.
    pub profile: Profile,
}

impl Interval {
    pub fn new(left: f64, right: Profile) -> Self {
        Self {
            left,
            right: right.duration(),
            profile: right,
        }
    }

    pub fn contains(&self, t: f64) -> bool {
        self.left < t && t < self.right
    }
}

/// Result of a free-time solve: the minimal duration and the durations that
/// are infeasible above it.
#[derive(Clone, Copy, Debug)]
pub struct Block {
    pub t_min: f64,
    pub p_min: Profile,
    pub a: Option<Interval>,
    pub b: Option<Interval>,
    candidates: Candidates<MAX_CANDIDATES>,
}

impl Block {
    /// Block of a single profile with no blocked intervals.
    pub fn from_profile(profile: Profile) -> Self {
        let mut candidates = Candidates::new();
        let _ = candidates.push(profile);
        Self {
            t_min: profile.duration(),
            p_min: profile,
            a: None,
            b: None,
            candidates,
        }
    }

    /// Ranks candidates by duration and derives the blocked intervals.
    ///
    /// Candidates alternate between the edges of feasible and infeasible
    /// duration ranges: with two of them the range between them is blocked,
    /// with three the range between the second and the third, with four the
    /// range between the second and the fourth, with five or more the ranges
    /// second to third and fourth to fifth. A zero-duration candidate stands
    /// alone, everything up to the next candidate is blocked.
    pub fn calculate<const N: usize>(candidates: &Candidates<N>) -> Option<Self> {
        let mut ranked: Candidates<MAX_CANDIDATES> = candidates.iter().copied().collect();
        ranked
            .as_mut_slice()
            .sort_by(|x, y| x.duration().total_cmp(&y.duration()));

        let p_min = *ranked.first()?;
        let (a, b) = Self::intervals(ranked.as_slice());
        Some(Self {
            t_min: p_min.duration(),
            p_min,
            a,
            b,
            candidates: ranked,
        })
    }

    fn intervals(profiles: &[Profile]) -> (Option<Interval>, Option<Interval>) {
        let duration = |i: usize| profiles[i].duration();
        match profiles {
            [standstill, rest @ ..] if !rest.is_empty() && standstill.duration() <= T_DUPLICATE => {
                // a third interval does not fit, the last two are merged
                let b = match Self::intervals(rest) {
                    (Some(a), Some(b)) => Some(Interval { left: a.left, ..b }),
                    (a, _) => a,
                };
                (Some(Interval::new(duration(0), rest[0])), b)
            }
            [] | [_] => (None, None),
            [_, _] => (Some(Interval::new(duration(0), profiles[1])), None),
            [_, _, _] => (Some(Interval::new(duration(1), profiles[2])), None),
            [_, _, _, _] => (Some(Interval::new(duration(1), profiles[3])), None),
            _ => (
                Some(Interval::new(duration(1), profiles[2])),
                Some(Interval::new(duration(3), profiles[4])),
            ),
        }
    }

    /// The same block with `brake` run in front of every profile, all
    /// durations shifted by the braking time.
    pub fn with_brake(mut self, brake: Brake) -> Self {
        if !brake.is_active() {
            return self;
        }
        for profile in self.candidates.as_mut_slice() {
            profile.brake = brake;
        }
        self.p_min.brake = brake;
        self.t_min = self.p_min.duration();
        for interval in [&mut self.a, &mut self.b].into_iter().flatten() {
            interval.profile.brake = brake;
            interval.left += brake.duration;
            interval.right = interval.profile.duration();
        }
        self
    }

    /// True when no profile exists for a total duration of `t`.
    pub fn is_blocked(&self, t: f64) -> bool {
        t < self.t_min
            || self.a.is_some_and(|a| a.contains(t))
            || self.b.is_some_and(|b| b.contains(t))
    }

    /// The candidate profile governing duration `t`: the profile at the right
    /// edge of the last blocked interval at or below `t`, or the minimal one.
    pub fn profile_at(&self, t: f64) -> &Profile {
        if let Some(b) = self.b.as_ref().filter(|b| t >= b.right) {
            return &b.profile;
        }
        if let Some(a) = self.a.as_ref().filter(|a| t >= a.right) {
            return &a.profile;
        }
        &self.p_min
    }

    /// Every accepted candidate, shortest first.
    pub fn candidates(&self) -> &[Profile] {
        self.candidates.as_slice()
    }
}

/// Adds a candidate unless one with the same duration is already present.
pub(crate) fn add_candidate<const N: usize>(candidates: &mut Candidates<N>, profile: Profile) {
    let duration = profile.duration();
    let duplicate = candidates
        .iter()
        .any(|c| (c.duration() - duration).abs() < T_DUPLICATE * duration.max(1.0));
    if duplicate {
        return;
    }
    if candidates.push(profile).is_err() {
        trace!(duration, "candidate buffer full, dropping profile");
    }
}
