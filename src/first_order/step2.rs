use tracing::trace;

use crate::limits::{Direction, KinematicLimits, KinematicState, Order};
use crate::profile::Profile;

/// Fixed-time velocity-limited solve.
#[derive(Clone, Copy, Debug)]
pub struct Step2 {
    start: KinematicState,
    goal: KinematicState,
    limits: KinematicLimits,
    tf: f64,
    pd: f64,
}

impl Step2 {
    pub fn new(start: &KinematicState, goal: &KinematicState, limits: &KinematicLimits, tf: f64) -> Self {
        Self {
            start: *start,
            goal: *goal,
            limits: *limits,
            tf,
            pd: goal.pos - start.pos,
        }
    }

    /// Cruise at the velocity that covers the distance in exactly `tf`, or
    /// travel at the limit and wait for the rest of the duration.
    pub fn get_profile(&self) -> Option<Profile> {
        let Self { tf, pd, .. } = *self;
        let direction = if pd >= 0.0 { Direction::Up } else { Direction::Down };
        let lim = self.limits.directed(direction);

        let mut profile = Profile::new(Order::First, &self.start, &self.goal);
        let vc = if tf > 0.0 { pd / tf } else { 0.0 };
        profile.t[..2].copy_from_slice(&[tf, 0.0]);
        if profile.check_first_order([vc, 0.0], &lim, Some(tf)) {
            return Some(profile);
        }

        let t0 = if lim.v_max != 0.0 { pd / lim.v_max } else { f64::NAN };
        profile.t[..2].copy_from_slice(&[t0, tf - t0]);
        if profile.check_first_order([lim.v_max, 0.0], &lim, Some(tf)) {
            return Some(profile);
        }

        trace!(tf, "first order step 2 found no profile");
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solve(goal: f64, tf: f64) -> Option<Profile> {
        let limits = KinematicLimits::symmetric(2.0, 0.0, 0.0);
        Step2::new(&KinematicState::at_rest(0.0), &KinematicState::at_rest(goal), &limits, tf).get_profile()
    }

    #[test]
    fn cruises_below_the_limit() {
        let profile = solve(4.0, 4.0).unwrap();
        assert_eq!(profile.v[0], 1.0);
        assert_eq!(profile.duration(), 4.0);
        assert_eq!(profile.state_at_time(2.0).0, 2.0);
    }

    #[test]
    fn backwards_at_the_minimal_duration() {
        let profile = solve(-4.0, 2.0).unwrap();
        assert_eq!(profile.v[0], -2.0);
        assert_eq!(profile.direction, Direction::Down);
    }

    #[test]
    fn too_short_duration_fails() {
        assert!(solve(4.0, 1.5).is_none());
    }

    #[test]
    fn standing_still_waits() {
        let profile = solve(0.0, 3.0).unwrap();
        assert_eq!(profile.duration(), 3.0);
        assert_eq!(profile.end_state(), KinematicState::at_rest(0.0));
    }
}
