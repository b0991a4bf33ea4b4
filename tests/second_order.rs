use otg_motion::second_order::{Step1, Step2};
use otg_motion::{KinematicLimits, KinematicState, Order, ReachedLimits};

fn limits() -> KinematicLimits {
    KinematicLimits::new(4.0, -2.0, 2.0, -3.0, 0.0)
}

#[test]
fn asymmetric_trapezoid() {
    let start = KinematicState::at_rest(0.0);
    let goal = KinematicState::at_rest(12.0);

    let block = Step1::new(&start, &goal, &limits()).get_profile().unwrap();
    let profile = block.p_min;
    assert_eq!(profile.order, Order::Second);
    assert_eq!(profile.limits, ReachedLimits::Vel);
    // 2 s up at 2, 4/3 s down at -3, cruise covers the remaining 12 - 4 - 8/3
    let expected = [2.0, (12.0 - 4.0 - 8.0 / 3.0) / 4.0, 4.0 / 3.0];
    for (t, e) in profile.durations().iter().zip(expected) {
        assert!((t - e).abs() < 1e-12);
    }
    assert!((profile.end_state().pos - 12.0).abs() < 1e-9);
}

#[test]
fn step2_stretches_the_minimum() {
    let start = KinematicState::new(0.0, 1.0, 0.0);
    let goal = KinematicState::new(5.0, -1.0, 0.0);

    let block = Step1::new(&start, &goal, &limits()).get_profile().unwrap();
    for factor in [1.0, 1.2, 2.0, 4.0] {
        let tf = block.t_min * factor;
        if block.is_blocked(tf) {
            continue;
        }
        let profile = Step2::new(&start, &goal, &limits(), tf).get_profile().unwrap();
        assert!((profile.duration() - tf).abs() < 1e-8);
        let end = profile.end_state();
        assert!((end.pos - 5.0).abs() < 1e-8);
        assert!((end.vel + 1.0).abs() < 1e-8);
        for a in &profile.a[..3] {
            assert!(*a <= 2.0 + 1e-12 && *a >= -3.0 - 1e-12);
        }
    }
    assert!(Step2::new(&start, &goal, &limits(), 0.9 * block.t_min).get_profile().is_none());
}

#[test]
fn goal_acceleration_is_not_controlled() {
    let start = KinematicState::new(0.0, 0.0, 1.5);
    let goal = KinematicState::new(1.0, 0.0, -0.5);
    let block = Step1::new(&start, &goal, &limits()).get_profile().unwrap();
    assert_eq!(block.p_min.end_state().acc, 0.0);
}
