use tracing::trace;

use crate::limits::{DirectedLimits, Direction, KinematicLimits, KinematicState, Order};
use crate::profile::{Profile, ReachedLimits};
use crate::roots::solve_quadratic;
use crate::tolerance::{EPS, T_PRECISION, V_EPS};

/// Fixed-time acceleration-limited solve.
#[derive(Clone, Copy, Debug)]
pub struct Step2 {
    start: KinematicState,
    goal: KinematicState,
    limits: KinematicLimits,
    tf: f64,

    v0: f64,
    vf: f64,
    pd: f64,
    vd: f64,
}

impl Step2 {
    pub fn new(start: &KinematicState, goal: &KinematicState, limits: &KinematicLimits, tf: f64) -> Self {
        Self {
            start: *start,
            goal: *goal,
            limits: *limits,
            tf,
            v0: start.vel,
            vf: goal.vel,
            pd: goal.pos - start.pos,
            vd: goal.vel - start.vel,
        }
    }

    /// A profile of duration `tf`, or `None` if no shape fits.
    pub fn get_profile(&self) -> Option<Profile> {
        let up = self.limits.directed(Direction::Up);
        let down = self.limits.directed(Direction::Down);

        if self.tf < T_PRECISION {
            if self.pd.abs() >= EPS || self.vd.abs() >= EPS {
                return None;
            }
            let mut profile = self.new_profile();
            return profile
                .check_second_order([0.0; 3], ReachedLimits::None, &up, Some(self.tf))
                .then_some(profile);
        }

        // ramp accelerations of the first and the last phase
        let ramps = [
            (up, up.a_max, up.a_min),
            (down, down.a_max, down.a_min),
            (up, up.a_max, up.a_max),
            (down, down.a_max, down.a_max),
        ];
        for (lim, a1, a2) in &ramps {
            if let Some(profile) = self.time_acc(lim, *a1, *a2) {
                trace!(tf = self.tf, "second order step 2 done");
                return Some(profile);
            }
        }
        if let Some(profile) = self.time_none() {
            trace!(tf = self.tf, "second order step 2 done without reaching a limit");
            return Some(profile);
        }

        trace!(tf = self.tf, "second order step 2 found no profile");
        None
    }

    fn new_profile(&self) -> Profile {
        Profile::new(Order::Second, &self.start, &self.goal)
    }

    /// Ramp at `a1` to a cruise velocity, hold it, ramp at `a2` to the goal.
    /// The cruise velocity solves a quadratic in the remaining distance.
    fn time_acc(&self, lim: &DirectedLimits, a1: f64, a2: f64) -> Option<Profile> {
        let Self { tf, v0, vf, pd, .. } = *self;
        if a1 == 0.0 || a2 == 0.0 {
            return None;
        }

        let a = 1.0 / (2.0 * a2) - 1.0 / (2.0 * a1);
        let b = tf + v0 / a1 - vf / a2;
        let c = vf * vf / (2.0 * a2) - v0 * v0 / (2.0 * a1) - pd;

        let mut profile = self.new_profile();
        for vc in solve_quadratic(a, b, c).iter().copied() {
            let t0 = (vc - v0) / a1;
            let t2 = (vf - vc) / a2;
            let limits = if (vc - lim.v_max).abs() < V_EPS {
                ReachedLimits::Vel
            } else {
                ReachedLimits::Acc0
            };
            profile.t[..3].copy_from_slice(&[t0, tf - t0 - t2, t2]);
            if profile.check_second_order([a1, 0.0, a2], limits, lim, Some(tf)) {
                return Some(profile);
            }
        }
        None
    }

    /// Two halves of equal duration with whatever accelerations reach the
    /// goal.
    fn time_none(&self) -> Option<Profile> {
        let Self { tf, v0, pd, vd, .. } = *self;
        if !(tf > 0.0) {
            return None;
        }

        let a1 = 4.0 * (pd - v0 * tf) / (tf * tf) - vd / tf;
        let a2 = 2.0 * vd / tf - a1;
        let direction = if a1 >= 0.0 { Direction::Up } else { Direction::Down };
        let lim = self.limits.directed(direction);

        let mut profile = self.new_profile();
        profile.t[..3].copy_from_slice(&[tf / 2.0, 0.0, tf / 2.0]);
        profile
            .check_second_order([a1, 0.0, a2], ReachedLimits::None, &lim, Some(tf))
            .then_some(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solve(start: KinematicState, goal: f64, tf: f64) -> Option<Profile> {
        let limits = KinematicLimits::symmetric(5.0, 5.0, 0.0);
        Step2::new(&start, &KinematicState::at_rest(goal), &limits, tf).get_profile()
    }

    #[test]
    fn minimal_duration_is_reproduced() {
        let profile = solve(KinematicState::at_rest(0.0), 10.0, 3.0).unwrap();
        for t in profile.durations() {
            assert!((t - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn slower_move_cruises_below_the_limit() {
        let profile = solve(KinematicState::at_rest(0.0), 10.0, 6.0).unwrap();
        assert!((profile.duration() - 6.0).abs() < 1e-8);
        // cruise at (6 - √28) / 0.4 m/s
        assert!((profile.v[1] - 1.771_243_444_677_046).abs() < 1e-9);
        assert!((profile.t[0] - 0.354_248_688_935_409_3).abs() < 1e-9);
        assert!((profile.end_state().pos - 10.0).abs() < 1e-8);
    }

    #[test]
    fn too_short_duration_fails() {
        assert!(solve(KinematicState::at_rest(0.0), 10.0, 2.0).is_none());
    }

    #[test]
    fn moving_axis_holds_its_state_only_without_time() {
        let state = KinematicState::new(0.0, 1.0, 0.0);
        let limits = KinematicLimits::symmetric(5.0, 5.0, 0.0);
        let solve = |tf| Step2::new(&state, &state, &limits, tf).get_profile();
        assert_eq!(solve(0.0).unwrap().duration(), 0.0);
        assert!(solve(0.5).is_none());
        let profile = solve(1.0).unwrap();
        assert!((profile.end_state().vel - 1.0).abs() < 1e-8);
        assert!(profile.position_extrema().min < 0.0);
    }

    #[test]
    fn overshooting_start_is_stretched() {
        let profile = solve(KinematicState::new(0.0, 4.0, 0.0), 1.0, 2.0).unwrap();
        assert!((profile.t[0] - 0.910_102_051_443_364_4).abs() < 1e-9);
        assert!((profile.end_state().vel).abs() < 1e-8);
    }
}
