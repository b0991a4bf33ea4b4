//! Per-axis entry point: validates the input, brakes a start outside the
//! limits, picks the solver family from the limits and turns a missing
//! profile into an error.

use thiserror::Error;
use tracing::debug;

use crate::block::Block;
use crate::brake::Brake;
use crate::limits::{Boundary, KinematicLimits, KinematicState, LimitsError, Order};
use crate::profile::Profile;
use crate::{first_order, second_order, third_order};

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum SolveError {
    #[error("invalid input: {0}")]
    InvalidInput(#[from] LimitsError),
    /// `duration` is `None` for a free-time solve.
    #[error("no {order} profile found{}", .duration.map(|d| format!(" for a duration of {d} s")).unwrap_or_default())]
    NoProfile { order: Order, duration: Option<f64> },
}

fn validate(start: &KinematicState, goal: &KinematicState, limits: &KinematicLimits) -> Result<Order, SolveError> {
    limits.validate()?;
    limits.validate_state(start, Boundary::Start)?;
    limits.validate_state(goal, Boundary::Goal)?;
    Ok(limits.order())
}

/// Brake in front of the move and the state the solvers start from.
fn braked_start(start: &KinematicState, limits: &KinematicLimits, order: Order) -> (Brake, KinematicState) {
    let brake = match order {
        Order::Third => Brake::third_order(start, limits),
        Order::Second => Brake::second_order(start, limits),
        Order::First => Brake::default(),
    };
    if !brake.is_active() {
        return (brake, *start);
    }
    debug!(%order, duration = brake.duration, end = ?brake.end, "braking into the limits");
    (brake, brake.end)
}

/// Minimal duration of a single-axis move and the durations it cannot take.
pub fn min_duration(
    start: &KinematicState,
    goal: &KinematicState,
    limits: &KinematicLimits,
) -> Result<Block, SolveError> {
    let order = validate(start, goal, limits)?;
    let (brake, from) = braked_start(start, limits, order);
    let block = match order {
        Order::Third => third_order::Step1::new(&from, goal, limits).get_profile(),
        Order::Second => second_order::Step1::new(&from, goal, limits).get_profile(),
        Order::First => first_order::Step1::new(&from, goal, limits).get_profile(),
    }
    .map(|block| block.with_brake(brake));

    match block {
        Some(block) => {
            debug!(
                %order,
                t_min = block.t_min,
                limits = ?block.p_min.limits,
                blocked = block.a.is_some(),
                "minimal duration found"
            );
            Ok(block)
        }
        None => {
            debug!(%order, ?start, ?goal, "no minimal duration profile");
            Err(SolveError::NoProfile { order, duration: None })
        }
    }
}

/// Profile of a single-axis move taking exactly `duration` seconds.
pub fn fixed_duration(
    start: &KinematicState,
    goal: &KinematicState,
    limits: &KinematicLimits,
    duration: f64,
) -> Result<Profile, SolveError> {
    let order = validate(start, goal, limits)?;
    let (brake, from) = braked_start(start, limits, order);
    let remaining = duration - brake.duration;
    let profile = if remaining.is_finite() && remaining >= 0.0 {
        match order {
            Order::Third => third_order::Step2::new(&from, goal, limits, remaining).get_profile(),
            Order::Second => second_order::Step2::new(&from, goal, limits, remaining).get_profile(),
            Order::First => first_order::Step2::new(&from, goal, limits, remaining).get_profile(),
        }
    } else {
        None
    }
    .map(|profile| Profile { brake, ..profile });

    match profile {
        Some(profile) => {
            debug!(%order, duration, limits = ?profile.limits, "fixed duration profile found");
            Ok(profile)
        }
        None => {
            debug!(%order, duration, ?start, ?goal, "no fixed duration profile");
            Err(SolveError::NoProfile {
                order,
                duration: Some(duration),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatches_on_order() {
        let start = KinematicState::at_rest(0.0);
        let goal = KinematicState::at_rest(10.0);

        let third = min_duration(&start, &goal, &KinematicLimits::symmetric(5.0, 5.0, 10.0)).unwrap();
        assert_eq!(third.p_min.order, Order::Third);
        let second = min_duration(&start, &goal, &KinematicLimits::symmetric(5.0, 5.0, 0.0)).unwrap();
        assert_eq!(second.p_min.order, Order::Second);
        let first = min_duration(&start, &goal, &KinematicLimits::symmetric(5.0, 0.0, 0.0)).unwrap();
        assert_eq!(first.p_min.order, Order::First);
        assert_eq!(first.t_min, 2.0);
    }

    #[test]
    fn invalid_limits_are_reported() {
        let limits = KinematicLimits::new(1.0, -1.0, -2.0, -1.0, 1.0);
        let err = min_duration(&KinematicState::default(), &KinematicState::at_rest(1.0), &limits).unwrap_err();
        assert_eq!(err, SolveError::InvalidInput(LimitsError::NegativeMaxAcceleration(-2.0)));
    }

    #[test]
    fn infeasible_duration_is_an_error() {
        let limits = KinematicLimits::symmetric(5.0, 5.0, 10.0);
        let err = fixed_duration(&KinematicState::default(), &KinematicState::at_rest(10.0), &limits, 1.0).unwrap_err();
        assert_eq!(
            err,
            SolveError::NoProfile {
                order: Order::Third,
                duration: Some(1.0)
            }
        );
        assert_eq!(err.to_string(), "no third order profile found for a duration of 1 s");
    }

    #[test]
    fn negative_duration_is_rejected() {
        let limits = KinematicLimits::symmetric(5.0, 5.0, 0.0);
        let start = KinematicState::default();
        assert!(fixed_duration(&start, &start, &limits, -1.0).is_err());
        assert!(fixed_duration(&start, &start, &limits, f64::NAN).is_err());
    }

    #[test]
    fn start_above_the_velocity_limit_is_braked_first() {
        let limits = KinematicLimits::symmetric(800.0, 40000.0, 200000.0);
        let start = KinematicState::new(1300.0, 1200.0, 0.0);
        let goal = KinematicState::at_rest(1400.0);

        let block = min_duration(&start, &goal, &limits).unwrap();
        assert!(block.p_min.brake.is_active());
        assert!((block.t_min - 0.167_347).abs() < 1e-6);

        let profile = fixed_duration(&start, &goal, &limits, block.t_min).unwrap();
        assert!((profile.duration() - block.t_min).abs() < 1e-9);
        assert_eq!(profile.state_at_time(0.0), (1300.0, 1200.0, 0.0, 0.0));
        assert!((profile.end_state().pos - 1400.0).abs() < 1e-8);
        // past the brake the velocity stays inside the limits
        let after_brake = profile.brake.duration;
        for i in 0..=100 {
            let t = after_brake + (block.t_min - after_brake) * f64::from(i) / 100.0;
            assert!(profile.state_at_time(t).1 <= 800.0 + 1e-6);
        }
    }

    #[test]
    fn duration_shorter_than_the_brake_is_infeasible() {
        let limits = KinematicLimits::symmetric(800.0, 40000.0, 200000.0);
        let start = KinematicState::new(1300.0, 1200.0, 0.0);
        let goal = KinematicState::at_rest(1400.0);
        assert!(fixed_duration(&start, &goal, &limits, 0.05).is_err());
    }
}
