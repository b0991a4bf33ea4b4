use otg_motion::axis::{fixed_duration, min_duration};
use otg_motion::{Boundary, KinematicLimits, KinematicState, LimitsError, MotionConfig, Order, SolveError};

const CONFIG: &str = r#"
[axes.x]
max_velocity = 5.0
max_accel = 5.0
max_jerk = 10.0

[axes.y]
max_velocity = 5.0
max_accel = 5.0
max_jerk = 0.0

[axes.z]
max_velocity = 2.0
min_velocity = -1.0
max_accel = 0.0
"#;

#[test]
fn configured_axes_synchronise() {
    let config = MotionConfig::from_toml_str(CONFIG).unwrap();
    let start = KinematicState::at_rest(0.0);
    let goals = [("x", 10.0), ("y", 4.0), ("z", 1.0)];

    let mut t_sync: f64 = 0.0;
    for (axis, goal) in goals {
        let limits = config.limits(axis).unwrap().unwrap();
        let block = min_duration(&start, &KinematicState::at_rest(goal), &limits).unwrap();
        t_sync = t_sync.max(block.t_min);
    }
    assert!((t_sync - 3.5).abs() < 1e-9);

    for (axis, goal) in goals {
        let limits = config.limits(axis).unwrap().unwrap();
        let goal = KinematicState::at_rest(goal);
        let profile = fixed_duration(&start, &goal, &limits, t_sync).unwrap();
        assert!((profile.duration() - t_sync).abs() < 1e-8, "axis {axis}");
        assert!((profile.end_state().pos - goal.pos).abs() < 1e-8, "axis {axis}");
    }
}

#[test]
fn orders_follow_the_limits() {
    let config = MotionConfig::from_toml_str(CONFIG).unwrap();
    let orders: Vec<Order> = ["x", "y", "z"]
        .iter()
        .map(|axis| config.limits(axis).unwrap().unwrap().order())
        .collect();
    assert_eq!(orders, [Order::Third, Order::Second, Order::First]);
}

#[test]
fn goal_outside_the_domain_is_rejected() {
    let limits = KinematicLimits::symmetric(1.0, 2.0, 1.0);
    let goal = KinematicState::new(5.0, -0.9, 1.0);
    let err = min_duration(&KinematicState::at_rest(0.0), &goal, &limits).unwrap_err();
    assert!(matches!(
        err,
        SolveError::InvalidInput(LimitsError::VelocityOutOfRange { boundary: Boundary::Goal, .. })
    ));
}

#[test]
fn start_outside_the_domain_is_braked() {
    let limits = KinematicLimits::symmetric(1.0, 2.0, 1.0);
    // settles at 0.9 + 0.5 once its acceleration is ramped down
    let start = KinematicState::new(0.0, 0.9, 1.0);
    let goal = KinematicState::at_rest(5.0);
    let block = min_duration(&start, &goal, &limits).unwrap();
    assert!(block.p_min.brake.is_active());

    let profile = fixed_duration(&start, &goal, &limits, block.t_min).unwrap();
    assert_eq!(profile.start_state(), start);
    assert!((profile.end_state().pos - 5.0).abs() < 1e-8);
    assert!(profile.state_at_time(profile.brake.duration).1 <= 1.0 + 1e-9);
}

#[test]
fn infeasible_duration_reports_the_order() {
    let limits = KinematicLimits::symmetric(2.0, 0.0, 0.0);
    let start = KinematicState::at_rest(0.0);
    let err = fixed_duration(&start, &KinematicState::at_rest(4.0), &limits, 1.0).unwrap_err();
    assert_eq!(
        err,
        SolveError::NoProfile {
            order: Order::First,
            duration: Some(1.0)
        }
    );
}
