use tracing::trace;

use crate::block::{add_candidate, Block, Candidates};
use crate::limits::{Direction, KinematicLimits, KinematicState, Order};
use crate::profile::Profile;
use crate::tolerance::EPS;

/// Free-time velocity-limited solve.
#[derive(Clone, Copy, Debug)]
pub struct Step1 {
    start: KinematicState,
    goal: KinematicState,
    limits: KinematicLimits,
    pd: f64,
}

impl Step1 {
    pub fn new(start: &KinematicState, goal: &KinematicState, limits: &KinematicLimits) -> Self {
        Self {
            start: *start,
            goal: *goal,
            limits: *limits,
            pd: goal.pos - start.pos,
        }
    }

    /// Travel at the velocity limit towards the goal.
    pub fn get_profile(&self) -> Option<Block> {
        let mut candidates: Candidates<2> = Candidates::new();

        for direction in Direction::BOTH {
            let lim = self.limits.directed(direction);
            let mut profile = Profile::new(Order::First, &self.start, &self.goal);
            let (t, v) = if self.pd.abs() < EPS {
                (0.0, 0.0)
            } else {
                (self.pd / lim.v_max, lim.v_max)
            };
            profile.t[0] = t;
            if profile.check_first_order([v, 0.0], &lim, None) {
                add_candidate(&mut candidates, profile);
            }
        }

        trace!(candidates = candidates.len(), "first order step 1 done");
        Block::calculate(&candidates)
    }
}
