use core::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::tolerance::{A_EPS, V_EPS};

/// Position, velocity and acceleration of an axis at one instant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct KinematicState {
    #[serde(default)]
    pub pos: f64,
    #[serde(default)]
    pub vel: f64,
    #[serde(default)]
    pub acc: f64,
}

impl KinematicState {
    pub fn new(pos: f64, vel: f64, acc: f64) -> Self {
        Self { pos, vel, acc }
    }

    /// Axis standing still at `pos`.
    pub fn at_rest(pos: f64) -> Self {
        Self::new(pos, 0.0, 0.0)
    }

    fn is_finite(&self) -> bool {
        self.pos.is_finite() && self.vel.is_finite() && self.acc.is_finite()
    }
}

/// Asymmetric kinematic limits of one axis.
///
/// `v_min` and `a_min` are expected to be non-positive, the maxima
/// non-negative. A zero jerk limit switches the axis to the
/// acceleration-limited solver, zero acceleration limits switch it to the
/// velocity-limited one.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct KinematicLimits {
    pub v_max: f64,
    pub v_min: f64,
    pub a_max: f64,
    pub a_min: f64,
    pub j_max: f64,
}

impl Default for KinematicLimits {
    fn default() -> Self {
        Self::symmetric(1.0, 1.0, 1.0)
    }
}

/// Kinematic order of the solver family that handles a set of limits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Order {
    /// Velocity-limited, velocity jumps allowed.
    First,
    /// Acceleration-limited, jerk unbounded.
    Second,
    /// Jerk-limited.
    #[default]
    Third,
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Order::First => "first",
            Order::Second => "second",
            Order::Third => "third",
        };
        write!(f, "{name} order")
    }
}

/// Which end of a move a state belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Boundary {
    Start,
    Goal,
}

impl fmt::Display for Boundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Boundary::Start => f.write_str("start"),
            Boundary::Goal => f.write_str("goal"),
        }
    }
}

/// Rejected limits or boundary states.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum LimitsError {
    #[error("limit {name} is not finite ({value})")]
    NonFiniteLimit { name: &'static str, value: f64 },
    #[error("maximum velocity {0} must not be negative")]
    NegativeMaxVelocity(f64),
    #[error("minimum velocity {0} must not be positive")]
    PositiveMinVelocity(f64),
    #[error("maximum acceleration {0} must not be negative")]
    NegativeMaxAcceleration(f64),
    #[error("minimum acceleration {0} must not be positive")]
    PositiveMinAcceleration(f64),
    #[error("jerk limit {0} must not be negative")]
    NegativeJerk(f64),
    #[error("{0} state is not finite")]
    NonFiniteState(Boundary),
    #[error("{boundary} acceleration {acceleration} exceeds the acceleration limits")]
    AccelerationOutOfRange { boundary: Boundary, acceleration: f64 },
    #[error("{boundary} state will exceed the velocity limits (reaches {velocity})")]
    VelocityOutOfRange { boundary: Boundary, velocity: f64 },
}

impl KinematicLimits {
    pub fn new(v_max: f64, v_min: f64, a_max: f64, a_min: f64, j_max: f64) -> Self {
        Self {
            v_max,
            v_min,
            a_max,
            a_min,
            j_max,
        }
    }

    /// Limits with `min == -max`.
    pub fn symmetric(v_max: f64, a_max: f64, j_max: f64) -> Self {
        Self::new(v_max, -v_max, a_max, -a_max, j_max)
    }

    /// Selects the solver family for these limits.
    pub fn order(&self) -> Order {
        let has_acc = self.a_max > 0.0 && self.a_min < 0.0;
        if has_acc && self.j_max > 0.0 {
            Order::Third
        } else if has_acc {
            Order::Second
        } else {
            Order::First
        }
    }

    /// Limits as seen when solving in `direction`.
    pub fn directed(&self, direction: Direction) -> DirectedLimits {
        match direction {
            Direction::Up => DirectedLimits {
                v_max: self.v_max,
                v_min: self.v_min,
                a_max: self.a_max,
                a_min: self.a_min,
                j_max: self.j_max,
                direction,
            },
            Direction::Down => DirectedLimits {
                v_max: self.v_min,
                v_min: self.v_max,
                a_max: self.a_min,
                a_min: self.a_max,
                j_max: -self.j_max,
                direction,
            },
        }
    }

    /// Checks signs and finiteness of every limit.
    pub fn validate(&self) -> Result<(), LimitsError> {
        for (name, value) in [
            ("v_max", self.v_max),
            ("v_min", self.v_min),
            ("a_max", self.a_max),
            ("a_min", self.a_min),
            ("j_max", self.j_max),
        ] {
            if !value.is_finite() {
                return Err(LimitsError::NonFiniteLimit { name, value });
            }
        }
        if self.v_max < 0.0 {
            return Err(LimitsError::NegativeMaxVelocity(self.v_max));
        }
        if self.v_min > 0.0 {
            return Err(LimitsError::PositiveMinVelocity(self.v_min));
        }
        if self.a_max < 0.0 {
            return Err(LimitsError::NegativeMaxAcceleration(self.a_max));
        }
        if self.a_min > 0.0 {
            return Err(LimitsError::PositiveMinAcceleration(self.a_min));
        }
        if self.j_max < 0.0 {
            return Err(LimitsError::NegativeJerk(self.j_max));
        }
        Ok(())
    }

    /// Checks that a boundary state can be used with the limits of the
    /// selected order.
    ///
    /// A start only has to be finite: a start outside the limits is braked
    /// back into them first. A goal has to be reachable, so for the
    /// jerk-limited order the velocity it was approached with, before its
    /// acceleration was ramped up at full jerk, must be inside the velocity
    /// limits.
    pub fn validate_state(&self, state: &KinematicState, boundary: Boundary) -> Result<(), LimitsError> {
        if !state.is_finite() {
            return Err(LimitsError::NonFiniteState(boundary));
        }
        if boundary == Boundary::Start {
            return Ok(());
        }
        match self.order() {
            Order::First => Ok(()),
            Order::Second => self.check_velocity(state.vel, boundary),
            Order::Third => {
                if state.acc > self.a_max + A_EPS || state.acc < self.a_min - A_EPS {
                    return Err(LimitsError::AccelerationOutOfRange {
                        boundary,
                        acceleration: state.acc,
                    });
                }
                let ramp = state.acc * state.acc.abs() / (2.0 * self.j_max);
                self.check_velocity(state.vel - ramp, boundary)
            }
        }
    }

    fn check_velocity(&self, velocity: f64, boundary: Boundary) -> Result<(), LimitsError> {
        if velocity > self.v_max + V_EPS || velocity < self.v_min - V_EPS {
            return Err(LimitsError::VelocityOutOfRange { boundary, velocity });
        }
        Ok(())
    }
}

/// Direction a profile is solved in.
///
/// `Up` uses the limits as given, `Down` swaps the minima with the maxima and
/// negates the jerk.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Direction {
    #[default]
    Up,
    Down,
}

impl Direction {
    pub const BOTH: [Direction; 2] = [Direction::Up, Direction::Down];

    pub fn reversed(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
        }
    }
}

/// Limits oriented for one [`Direction`]; the shape formulas only ever see these.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DirectedLimits {
    pub v_max: f64,
    pub v_min: f64,
    pub a_max: f64,
    pub a_min: f64,
    pub j_max: f64,
    pub direction: Direction,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_follows_zero_limits() {
        assert_eq!(KinematicLimits::symmetric(1.0, 2.0, 3.0).order(), Order::Third);
        assert_eq!(KinematicLimits::symmetric(1.0, 2.0, 0.0).order(), Order::Second);
        assert_eq!(KinematicLimits::symmetric(1.0, 0.0, 3.0).order(), Order::First);
        assert_eq!(KinematicLimits::new(1.0, -1.0, 2.0, 0.0, 3.0).order(), Order::First);
    }

    #[test]
    fn down_swaps_and_negates() {
        let limits = KinematicLimits::new(2.0, -1.0, 4.0, -3.0, 10.0);
        let down = limits.directed(Direction::Down);
        assert_eq!((down.v_max, down.v_min), (-1.0, 2.0));
        assert_eq!((down.a_max, down.a_min), (-3.0, 4.0));
        assert_eq!(down.j_max, -10.0);
        assert_eq!(down.direction.reversed(), Direction::Up);
    }

    #[test]
    fn rejects_bad_limits() {
        let mut limits = KinematicLimits::symmetric(1.0, 1.0, 1.0);
        assert!(limits.validate().is_ok());
        limits.v_min = 0.5;
        assert_eq!(limits.validate(), Err(LimitsError::PositiveMinVelocity(0.5)));
        limits.v_min = -1.0;
        limits.j_max = f64::NAN;
        assert!(matches!(
            limits.validate(),
            Err(LimitsError::NonFiniteLimit { name: "j_max", .. })
        ));
    }

    #[test]
    fn goal_approached_too_fast_is_rejected() {
        let limits = KinematicLimits::symmetric(1.0, 2.0, 1.0);
        // v - a|a|/2j = 0.5 - 2 = -1.5 < -1
        let state = KinematicState::new(0.0, 0.5, 2.0);
        assert!(matches!(
            limits.validate_state(&state, Boundary::Goal),
            Err(LimitsError::VelocityOutOfRange { boundary: Boundary::Goal, .. })
        ));
        // a start is braked instead
        assert!(limits.validate_state(&state, Boundary::Start).is_ok());
        let goal = KinematicState::new(0.0, 0.5, 1.0);
        assert!(limits.validate_state(&goal, Boundary::Goal).is_ok());
    }

    #[test]
    fn acceleration_outside_limits_is_rejected() {
        let limits = KinematicLimits::symmetric(10.0, 1.0, 1.0);
        let state = KinematicState::new(0.0, 0.0, -1.5);
        assert!(matches!(
            limits.validate_state(&state, Boundary::Goal),
            Err(LimitsError::AccelerationOutOfRange { .. })
        ));
        assert!(limits.validate_state(&state, Boundary::Start).is_ok());
    }

    #[test]
    fn non_finite_state_is_rejected() {
        let limits = KinematicLimits::default();
        let state = KinematicState::new(f64::INFINITY, 0.0, 0.0);
        assert_eq!(
            limits.validate_state(&state, Boundary::Goal),
            Err(LimitsError::NonFiniteState(Boundary::Goal))
        );
    }
}
