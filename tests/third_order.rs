use otg_motion::third_order::{Step1, Step2};
use otg_motion::{Direction, KinematicLimits, KinematicState, ReachedLimits};

fn limits() -> KinematicLimits {
    KinematicLimits::symmetric(5.0, 5.0, 10.0)
}

fn assert_reaches(profile: &otg_motion::Profile, goal: &KinematicState) {
    let end = profile.end_state();
    assert!((end.pos - goal.pos).abs() < 1e-8, "position {} != {}", end.pos, goal.pos);
    assert!((end.vel - goal.vel).abs() < 1e-8, "velocity {} != {}", end.vel, goal.vel);
    assert!((end.acc - goal.acc).abs() < 1e-10, "acceleration {} != {}", end.acc, goal.acc);
}

#[test]
fn rest_to_rest_scenario() {
    let start = KinematicState::at_rest(0.0);
    let goal = KinematicState::at_rest(10.0);

    let block = Step1::new(&start, &goal, &limits()).get_profile().unwrap();
    assert!((block.t_min - 3.5).abs() < 1e-9);
    assert_eq!(block.p_min.durations().len(), 7);
    assert_eq!(block.p_min.limits, ReachedLimits::Acc0Acc1Vel);

    let at_min = Step2::new(&start, &goal, &limits(), block.t_min).get_profile().unwrap();
    assert!((at_min.duration() - block.t_min).abs() < 1e-8);
    assert_reaches(&at_min, &goal);

    let doubled = Step2::new(&start, &goal, &limits(), 2.0 * block.t_min).get_profile().unwrap();
    assert!((doubled.duration() - 7.0).abs() < 1e-8);
    assert_reaches(&doubled, &goal);

    assert!(Step2::new(&start, &goal, &limits(), 0.5 * block.t_min).get_profile().is_none());
}

#[test]
fn moving_start_and_goal() {
    let start = KinematicState::new(-1.0, 2.0, 1.5);
    let goal = KinematicState::new(4.0, -1.0, 0.5);

    let block = Step1::new(&start, &goal, &limits()).get_profile().unwrap();
    assert_reaches(&block.p_min, &goal);

    for factor in [1.0, 1.5, 3.0] {
        let tf = block.t_min * factor;
        if block.is_blocked(tf) {
            continue;
        }
        let profile = Step2::new(&start, &goal, &limits(), tf).get_profile().unwrap();
        assert!((profile.duration() - tf).abs() < 1e-8);
        assert_reaches(&profile, &goal);
    }
}

#[test]
fn blocked_interval_has_no_profile() {
    let limits = KinematicLimits::symmetric(3.0, 2.0, 4.0);
    let start = KinematicState::new(0.0, -1.0, 0.0);
    let goal = KinematicState::new(-1.0, -1.0, 0.0);

    let block = Step1::new(&start, &goal, &limits).get_profile().unwrap();
    let a = block.a.expect("blocked interval");
    assert!((a.left - (5.0_f64.sqrt() - 1.0)).abs() < 1e-9);
    assert!((a.right - 2.0).abs() < 1e-9);
    assert!(block.b.is_none());

    let inside = (a.left + a.right) / 2.0;
    assert!(block.is_blocked(inside));
    assert!(Step2::new(&start, &goal, &limits, inside).get_profile().is_none());
    for edge in [a.left, a.right] {
        let profile = Step2::new(&start, &goal, &limits, edge).get_profile().unwrap();
        assert_reaches(&profile, &goal);
    }
    assert_eq!(block.profile_at(a.right).duration(), a.profile.duration());
}

#[test]
fn mirrored_limits_for_negative_moves() {
    let limits = KinematicLimits::new(2.0, -4.0, 3.0, -1.0, 10.0);
    let start = KinematicState::at_rest(0.0);
    let goal = KinematicState::at_rest(-20.0);

    let block = Step1::new(&start, &goal, &limits).get_profile().unwrap();
    assert_eq!(block.p_min.direction, Direction::Down);
    let v_lowest = block.p_min.v.iter().copied().fold(f64::INFINITY, f64::min);
    assert!((v_lowest + 4.0).abs() < 1e-9);
    let a_lowest = block.p_min.a.iter().copied().fold(f64::INFINITY, f64::min);
    assert!((a_lowest + 1.0).abs() < 1e-9);
}

#[test]
fn samples_follow_the_phases() {
    let start = KinematicState::at_rest(0.0);
    let goal = KinematicState::at_rest(10.0);
    let profile = Step1::new(&start, &goal, &limits()).get_profile().unwrap().p_min;

    let (pos, vel, acc, jerk) = profile.state_at_time(1.75);
    assert!((pos - 5.0).abs() < 1e-9);
    assert!((vel - 5.0).abs() < 1e-9);
    assert!(acc.abs() < 1e-9);
    assert_eq!(jerk, 0.0);

    assert_eq!(profile.phases().count(), 7);
    let extrema = profile.position_extrema();
    assert_eq!(extrema.min, 0.0);
    assert!((extrema.max - 10.0).abs() < 1e-8);
}

#[test]
fn moving_axis_keeping_its_state() {
    let limits = KinematicLimits::symmetric(2.0, 1.0, 1.0);
    let state = KinematicState::new(0.0, -1.0, 0.0);

    let block = Step1::new(&state, &state, &limits).get_profile().unwrap();
    assert_eq!(block.t_min, 0.0);
    let solve = |tf: f64| Step2::new(&state, &state, &limits, tf).get_profile();

    let now = solve(0.0).unwrap();
    assert_eq!(now.duration(), 0.0);
    assert_eq!(now.end_state(), state);

    for tf in [0.5, 3.0, 5.9] {
        assert!(block.is_blocked(tf));
        assert!(solve(tf).is_none(), "profile of {tf} s");
    }
    for tf in [6.0, 6.5, 10.0] {
        assert!(!block.is_blocked(tf));
        let profile = solve(tf).unwrap();
        assert!((profile.duration() - tf).abs() < 1e-8);
        assert_reaches(&profile, &state);
    }
}

#[test]
fn goal_on_the_velocity_limit_blocks_until_the_turnaround() {
    let limits = KinematicLimits::new(2.0, -1.8155, 1.0, -1.0, 1.0);
    let state = KinematicState::new(0.0, -1.8155, 0.0);

    let block = Step1::new(&state, &state, &limits).get_profile().unwrap();
    let durations: Vec<f64> = block.candidates().iter().map(|p| p.duration()).collect();
    assert_eq!(durations.len(), 2);
    assert!((durations[1] - 9.262).abs() < 1e-9);

    for tf in [1.0, 2.916, 9.0] {
        assert!(block.is_blocked(tf));
        assert!(Step2::new(&state, &state, &limits, tf).get_profile().is_none());
    }
    let profile = Step2::new(&state, &state, &limits, 9.3).get_profile().unwrap();
    assert_reaches(&profile, &state);
}

#[test]
fn first_time_at_position_after_synchronisation() {
    let limits = KinematicLimits::symmetric(1.0, 1.0, 1.0);
    let solve = |start: f64, goal: KinematicState| {
        Step2::new(&KinematicState::at_rest(start), &goal, &limits, 4.0)
            .get_profile()
            .unwrap()
    };
    let close = |t: Option<f64>, expected: f64, tol: f64| t.is_some_and(|t| (t - expected).abs() < tol);

    let rising = solve(0.0, KinematicState::at_rest(1.0));
    assert!(close(rising.first_time_at_position(0.0), 0.0, 1e-12));
    assert!(close(rising.first_time_at_position(0.5), 2.0, 1e-9));
    // the goal is approached with zero velocity and acceleration
    assert!(close(rising.first_time_at_position(1.0), 4.0, 1e-4));
    assert_eq!(rising.first_time_at_position(-1.0), None);

    // overshoots the goal and comes back to meet it at 0.3 m/s
    let overshoot = solve(-2.0, KinematicState::new(-3.0, 0.3, 0.0));
    assert!((overshoot.state_at_time(2.0).0 + 2.687_126_830_3).abs() < 1e-9);
    assert!(close(overshoot.first_time_at_position(-3.0), 2.600_487_790_2, 1e-9));
    assert!(close(overshoot.first_time_at_position(-3.1), 2.864_415_448_9, 1e-9));
    assert_eq!(overshoot.first_time_at_position(-3.4), None);

    let longer = solve(0.0, KinematicState::at_rest(2.0));
    assert!(close(longer.first_time_at_position(0.05), 0.669_432_950_1, 1e-9));
}
