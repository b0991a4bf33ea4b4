//! Braking stage in front of a profile.
//!
//! A start state may lie outside the limits, or settle outside them once its
//! acceleration is ramped to zero. The brake drives it back at full jerk and,
//! if needed, full acceleration before the actual profile takes over.

use crate::limits::{DirectedLimits, Direction, KinematicLimits, KinematicState};
use crate::motion_polynomial::MotionPolynomial;

/// Braking stops this far short of, or past, its target so the braked state
/// lands inside the limits.
const MARGIN: f64 = 2.2e-14;

/// Up to two phases: a jerk ramp and a constant acceleration.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Brake {
    pub t: [f64; 2],
    pub j: [f64; 2],
    /// State at the start of each phase.
    pub p: [f64; 2],
    pub v: [f64; 2],
    pub a: [f64; 2],
    pub duration: f64,
    /// State once braking is over.
    pub end: KinematicState,
}

impl Brake {
    /// Brake of a jerk-limited axis. Empty when `start` can be handed to the
    /// solver directly.
    pub fn third_order(start: &KinematicState, limits: &KinematicLimits) -> Self {
        let mut brake = Self::default();
        if limits.j_max == 0.0 || limits.a_max == 0.0 || limits.a_min == 0.0 {
            return brake.finish(start);
        }

        let (v0, a0) = (start.vel, start.acc);
        let up = limits.directed(Direction::Up);
        let down = limits.directed(Direction::Down);
        let (t, j) = if a0 > limits.a_max {
            acceleration_brake(v0, a0, &up)
        } else if a0 < limits.a_min {
            acceleration_brake(v0, a0, &down)
        } else if (v0 > limits.v_max && settled(v0, a0, -limits.j_max) > limits.v_min)
            || (a0 > 0.0 && settled(v0, a0, limits.j_max) > limits.v_max)
        {
            velocity_brake(v0, a0, &up)
        } else if (v0 < limits.v_min && settled(v0, a0, limits.j_max) < limits.v_max)
            || (a0 < 0.0 && settled(v0, a0, -limits.j_max) < limits.v_min)
        {
            velocity_brake(v0, a0, &down)
        } else {
            ([0.0; 2], [0.0; 2])
        };
        brake.t = t;
        brake.j = j;
        brake.finish(start)
    }

    /// Brake of an acceleration-limited axis: full deceleration until the
    /// velocity is back inside the limits.
    pub fn second_order(start: &KinematicState, limits: &KinematicLimits) -> Self {
        let mut brake = Self::default();
        let v0 = start.vel;
        if v0 > limits.v_max && limits.a_min < 0.0 {
            brake.t[0] = (limits.v_max - v0) / limits.a_min;
            brake.a[0] = limits.a_min;
        } else if v0 < limits.v_min && limits.a_max > 0.0 {
            brake.t[0] = (limits.v_min - v0) / limits.a_max;
            brake.a[0] = limits.a_max;
        }
        let mut state = *start;
        if brake.t[0] > 0.0 {
            // the acceleration jumps, it is not part of the state
            state.acc = brake.a[0];
        }
        let mut brake = brake.finish(&state);
        brake.end.acc = 0.0;
        brake
    }

    pub fn is_active(&self) -> bool {
        self.duration > 0.0
    }

    /// Phase `index` as a polynomial.
    pub fn phase(&self, index: usize) -> MotionPolynomial {
        MotionPolynomial::new(
            self.t[index],
            self.p[index],
            self.v[index],
            self.a[index],
            self.j[index],
        )
    }

    /// The phases with a non-zero duration, in order.
    pub fn phases(&self) -> impl Iterator<Item = MotionPolynomial> + '_ {
        (0..2).filter(|i| self.t[*i] > 0.0).map(|i| self.phase(i))
    }

    fn finish(mut self, start: &KinematicState) -> Self {
        let mut state = *start;
        self.duration = 0.0;
        for i in 0..2 {
            self.t[i] = self.t[i].max(0.0);
            self.p[i] = state.pos;
            self.v[i] = state.vel;
            self.a[i] = state.acc;
            if self.t[i] > 0.0 {
                let (pos, vel, acc, _) = self.phase(i).end();
                state = KinematicState::new(pos, vel, acc);
                self.duration += self.t[i];
            }
        }
        self.end = state;
        self
    }
}

/// Velocity once `a0` is ramped to zero, `j` carrying the sign of the
/// velocity change.
fn settled(v0: f64, a0: f64, j: f64) -> f64 {
    v0 + a0 * a0 / (2.0 * j)
}

fn velocity_after(v0: f64, a0: f64, j: f64, t: f64) -> f64 {
    v0 + t * (a0 + j * t / 2.0)
}

/// Pulls a velocity above `v_max` back down without letting it settle below
/// `v_min`.
fn velocity_brake(v0: f64, a0: f64, lim: &DirectedLimits) -> ([f64; 2], [f64; 2]) {
    let DirectedLimits { v_max, v_min, a_min, j_max, .. } = *lim;
    let t_to_a_min = (a0 - a_min) / j_max;
    let t_to_v_max = a0 / j_max + (a0 * a0 + 2.0 * j_max * (v0 - v_max)).sqrt() / j_max.abs();
    let t_to_v_min = a0 / j_max + (a0 * a0 / 2.0 + j_max * (v0 - v_min)).sqrt() / j_max.abs();
    let t_ramp = t_to_v_max.min(t_to_v_min);

    if t_to_a_min < t_ramp {
        let v_at_a_min = velocity_after(v0, a0, -j_max, t_to_a_min);
        let t_to_v_max_constant = -(v_at_a_min - v_max) / a_min;
        let t_to_v_min_constant = a_min / (2.0 * j_max) - (v_at_a_min - v_min) / a_min;
        (
            [
                (t_to_a_min - MARGIN).max(0.0),
                t_to_v_max_constant.min(t_to_v_min_constant).max(0.0),
            ],
            [-j_max, 0.0],
        )
    } else {
        ([(t_ramp - MARGIN).max(0.0), 0.0], [-j_max, 0.0])
    }
}

/// Brings an acceleration above `a_max` back to the limit, braking the
/// velocity as well when it would overshoot.
fn acceleration_brake(v0: f64, a0: f64, lim: &DirectedLimits) -> ([f64; 2], [f64; 2]) {
    let DirectedLimits { v_max, v_min, a_max, j_max, .. } = *lim;
    let t_to_a_max = (a0 - a_max) / j_max;
    let v_at_a_max = velocity_after(v0, a0, -j_max, t_to_a_max);
    let v_at_a_zero = velocity_after(v0, a0, -j_max, a0 / j_max);

    let overshoots = if j_max > 0.0 { v_at_a_zero > v_max } else { v_at_a_zero < v_max };
    if overshoots {
        return velocity_brake(v0, a0, lim);
    }

    let undershoots = if j_max > 0.0 { v_at_a_max < v_min } else { v_at_a_max > v_min };
    if undershoots {
        let t_to_v_min = -(v_at_a_max - v_min) / a_max;
        let t_to_v_max = -a_max / (2.0 * j_max) - (v_at_a_max - v_max) / a_max;
        (
            [t_to_a_max + MARGIN, t_to_v_min.min(t_to_v_max - MARGIN).max(0.0)],
            [-j_max, 0.0],
        )
    } else {
        ([t_to_a_max + MARGIN, 0.0], [-j_max, 0.0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_inside_the_limits_needs_no_brake() {
        let limits = KinematicLimits::symmetric(2.0, 1.0, 1.0);
        let start = KinematicState::new(3.0, 1.0, 0.5);
        let brake = Brake::third_order(&start, &limits);
        assert!(!brake.is_active());
        assert_eq!(brake.end, start);
        assert_eq!(brake.phases().count(), 0);
    }

    #[test]
    fn excess_velocity_is_ramped_down() {
        let limits = KinematicLimits::symmetric(800.0, 40000.0, 200000.0);
        let brake = Brake::third_order(&KinematicState::new(1300.0, 1200.0, 0.0), &limits);
        // 1200 - j t² / 2 = 800
        assert!((brake.duration - 0.063_245_553_203_345_6).abs() < 1e-12);
        assert_eq!(brake.j, [-200000.0, 0.0]);
        assert!((brake.end.vel - 800.0).abs() < 1e-9);
        assert!((brake.end.acc + 12_649.110_640_669_12).abs() < 1e-6);
        assert!((brake.end.pos - 1_367.461_923_416_908).abs() < 1e-9);
    }

    #[test]
    fn excess_acceleration_is_ramped_to_the_limit() {
        let limits = KinematicLimits::symmetric(10.0, 1.0, 2.0);
        let brake = Brake::third_order(&KinematicState::new(0.0, 0.0, 3.0), &limits);
        assert!((brake.t[0] - 1.0).abs() < 1e-12);
        assert_eq!(brake.t[1], 0.0);
        assert!((brake.end.acc - 1.0).abs() < 1e-12);
        assert!((brake.end.vel - 2.0).abs() < 1e-12);
    }

    #[test]
    fn negative_excess_mirrors() {
        let limits = KinematicLimits::symmetric(800.0, 40000.0, 200000.0);
        let brake = Brake::third_order(&KinematicState::new(0.0, -1200.0, 0.0), &limits);
        assert!((brake.end.vel + 800.0).abs() < 1e-9);
        assert!(brake.end.acc > 0.0);
    }

    #[test]
    fn acceleration_limited_brake_holds_full_deceleration() {
        let limits = KinematicLimits::symmetric(1.0, 2.0, 0.0);
        let brake = Brake::second_order(&KinematicState::new(0.0, 3.0, 0.0), &limits);
        assert_eq!(brake.t, [1.0, 0.0]);
        assert_eq!(brake.a[0], -2.0);
        assert_eq!(brake.end, KinematicState::new(2.0, 1.0, 0.0));
    }
}
