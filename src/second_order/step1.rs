use tracing::trace;

use crate::block::{add_candidate, Block, Candidates};
use crate::limits::{DirectedLimits, Direction, KinematicLimits, KinematicState, Order};
use crate::profile::{Profile, ReachedLimits};
use crate::tolerance::EPS;

/// Candidate slots: standing still, the trapezoid and the two triangle roots.
const CAPACITY: usize = 4;

/// Free-time acceleration-limited solve.
#[derive(Clone, Copy, Debug)]
pub struct Step1 {
    start: KinematicState,
    goal: KinematicState,
    limits: KinematicLimits,

    v0: f64,
    vf: f64,
    pd: f64,
}

impl Step1 {
    pub fn new(start: &KinematicState, goal: &KinematicState, limits: &KinematicLimits) -> Self {
        Self {
            start: *start,
            goal: *goal,
            limits: *limits,
            v0: start.vel,
            vf: goal.vel,
            pd: goal.pos - start.pos,
        }
    }

    /// Minimal duration and blocked intervals, or `None` if no shape fits.
    pub fn get_profile(&self) -> Option<Block> {
        let mut candidates: Candidates<CAPACITY> = Candidates::new();

        if self.pd.abs() < EPS && (self.vf - self.v0).abs() < EPS {
            let lim = self.limits.directed(Direction::Up);
            let mut profile = self.new_profile();
            if !profile.check_second_order([0.0; 3], ReachedLimits::None, &lim, None) {
                return None;
            }
            if self.v0.abs() < EPS {
                return Some(Block::from_profile(profile));
            }
            add_candidate(&mut candidates, profile);
        }

        for direction in Direction::BOTH {
            let lim = self.limits.directed(direction);
            self.time_vel(&lim, &mut candidates);
            self.time_acc(&lim, &mut candidates);
        }

        trace!(candidates = candidates.len(), "second order step 1 done");
        Block::calculate(&candidates)
    }

    fn new_profile(&self) -> Profile {
        Profile::new(Order::Second, &self.start, &self.goal)
    }

    fn try_add(
        &self,
        candidates: &mut Candidates<CAPACITY>,
        t: [f64; 3],
        acc: [f64; 3],
        limits: ReachedLimits,
        lim: &DirectedLimits,
    ) {
        let mut profile = self.new_profile();
        profile.t[..3].copy_from_slice(&t);
        if profile.check_second_order(acc, limits, lim, None) {
            add_candidate(candidates, profile);
        }
    }

    /// Trapezoid: accelerate to the velocity limit, cruise, then decelerate.
    fn time_vel(&self, lim: &DirectedLimits, candidates: &mut Candidates<CAPACITY>) {
        let Self { v0, vf, pd, .. } = *self;
        let DirectedLimits { v_max, a_max, a_min, .. } = *lim;

        let t0 = (v_max - v0) / a_max;
        let t2 = (vf - v_max) / a_min;
        let t1 = (pd - (v_max * v_max - v0 * v0) / (2.0 * a_max) - (vf * vf - v_max * v_max) / (2.0 * a_min)) / v_max;
        self.try_add(candidates, [t0, t1, t2], [a_max, 0.0, a_min], ReachedLimits::Vel, lim);
    }

    /// Triangle: switch from full acceleration to full deceleration at a
    /// peak velocity below the limit.
    fn time_acc(&self, lim: &DirectedLimits, candidates: &mut Candidates<CAPACITY>) {
        let Self { v0, vf, pd, .. } = *self;
        let DirectedLimits { a_max, a_min, .. } = *lim;

        let h = (pd + v0 * v0 / (2.0 * a_max) - vf * vf / (2.0 * a_min)) / (1.0 / (2.0 * a_max) - 1.0 / (2.0 * a_min));
        if !(h >= 0.0) {
            return;
        }
        let vp = h.sqrt();
        for peak in [vp, -vp] {
            let t = [(peak - v0) / a_max, 0.0, (vf - peak) / a_min];
            self.try_add(candidates, t, [a_max, 0.0, a_min], ReachedLimits::Acc0, lim);
        }
    }
}
