//! Seeded randomised checks of the solver invariants.

use otg_motion::{axis, KinematicLimits, KinematicState, Profile};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const CASES: usize = 2000;

#[derive(Debug, Clone, Copy)]
struct Case {
    start: KinematicState,
    goal: KinematicState,
    limits: KinematicLimits,
    from_rest: bool,
}

fn scaled(rng: &mut StdRng, low: f64, high: f64) -> f64 {
    rng.random_range(low..high) * rng.random::<f64>()
}

/// Random boundary states that the velocity limits allow to settle.
fn jerk_limited_case(rng: &mut StdRng) -> Case {
    loop {
        let from_rest = rng.random_bool(0.3);
        let limits = KinematicLimits::new(
            rng.random_range(0.5..5.0),
            -rng.random_range(0.5..5.0),
            rng.random_range(0.5..5.0),
            -rng.random_range(0.5..5.0),
            rng.random_range(0.5..10.0),
        );
        let mut start = KinematicState::at_rest(rng.random_range(-5.0..5.0));
        let mut goal = KinematicState::at_rest(rng.random_range(-5.0..5.0));
        if !from_rest {
            start.vel = scaled(rng, limits.v_min, limits.v_max);
            goal.vel = scaled(rng, limits.v_min, limits.v_max);
            if rng.random_bool(0.7) {
                start.acc = 0.5 * scaled(rng, limits.a_min, limits.a_max);
            }
            if rng.random_bool(0.7) {
                goal.acc = 0.5 * scaled(rng, limits.a_min, limits.a_max);
            }
        }
        let settled_start = start.vel + start.acc * start.acc.abs() / (2.0 * limits.j_max);
        let settled_goal = goal.vel - goal.acc * goal.acc.abs() / (2.0 * limits.j_max);
        let inside = |v: f64| limits.v_min < v && v < limits.v_max;
        if inside(settled_start) && inside(settled_goal) {
            return Case {
                start,
                goal,
                limits,
                from_rest,
            };
        }
    }
}

/// Long moves onto a goal sitting on the velocity and acceleration limits,
/// with a small acceleration limit so the plateaus run long.
fn saturated_goal_case(rng: &mut StdRng) -> Case {
    loop {
        let limits = KinematicLimits::new(
            rng.random_range(20.0..40.0),
            -rng.random_range(20.0..40.0),
            rng.random_range(0.05..0.5),
            -rng.random_range(1.0..4.0),
            rng.random_range(1.0..10.0),
        );
        let start = KinematicState::new(
            rng.random_range(-400.0..400.0),
            rng.random_range(limits.v_min..limits.v_max),
            rng.random_range(limits.a_min..limits.a_max),
        );
        let mut goal = KinematicState::new(
            rng.random_range(-400.0..400.0),
            rng.random_range(limits.v_min..limits.v_max),
            rng.random_range(limits.a_min..limits.a_max),
        );
        if rng.random_bool(0.5) {
            goal.vel = limits.v_min;
        }
        if rng.random_bool(0.5) {
            goal.acc = limits.a_min;
        }
        let settled_start = start.vel + start.acc * start.acc.abs() / (2.0 * limits.j_max);
        let settled_goal = goal.vel - goal.acc * goal.acc.abs() / (2.0 * limits.j_max);
        let inside = |v: f64| limits.v_min < v && v < limits.v_max;
        if inside(settled_start) && inside(settled_goal) {
            return Case {
                start,
                goal,
                limits,
                from_rest: false,
            };
        }
    }
}

/// A jerk-limited case a million units away from the origin.
fn far_from_origin_case(rng: &mut StdRng) -> Case {
    let mut case = jerk_limited_case(rng);
    case.start.pos += 1e6;
    case.goal.pos += 1e6;
    case
}

/// Start and goal are the same, possibly moving, state.
fn standstill_case(rng: &mut StdRng) -> Case {
    let mut case = jerk_limited_case(rng);
    case.goal = case.start;
    case
}

fn acceleration_limited_case(rng: &mut StdRng) -> Case {
    let mut case = jerk_limited_case(rng);
    case.limits.j_max = 0.0;
    case.start.acc = 0.0;
    case.goal.acc = 0.0;
    case
}

/// Starts up to three times past the velocity and acceleration limits,
/// braked before the move to a goal at rest.
fn braked_case(rng: &mut StdRng) -> Case {
    let mut case = jerk_limited_case(rng);
    let limits = case.limits;
    case.start.vel = rng.random_range(3.0 * limits.v_min..3.0 * limits.v_max);
    case.start.acc = rng.random_range(3.0 * limits.a_min..3.0 * limits.a_max);
    case.goal = KinematicState::at_rest(case.goal.pos);
    case.from_rest = false;
    case
}

/// Samples every phase and checks velocity and acceleration against the
/// limits.
fn within_limits(profile: &Profile, limits: &KinematicLimits) -> bool {
    const SAMPLES: usize = 16;
    const TOLERANCE: f64 = 1e-8;
    profile.phases().all(|phase| {
        (0..=SAMPLES).all(|k| {
            let (_, vel, acc, _) = phase.sample(phase.time * k as f64 / SAMPLES as f64);
            vel <= limits.v_max + TOLERANCE
                && vel >= limits.v_min - TOLERANCE
                && acc <= limits.a_max + TOLERANCE
                && acc >= limits.a_min - TOLERANCE
        })
    })
}

fn reaches(profile: &Profile, goal: &KinematicState, match_acc: bool) -> bool {
    let end = profile.end_state();
    (end.pos - goal.pos).abs() < 1e-8_f64.max(1e-12 * goal.pos.abs())
        && (end.vel - goal.vel).abs() < 1e-8
        && (!match_acc || (end.acc - goal.acc).abs() < 1e-10)
}

/// Runs the invariant checks and returns a description of every failure.
fn check(case: &Case, match_acc: bool) -> Vec<String> {
    let Case {
        start,
        goal,
        limits,
        from_rest,
    } = *case;
    let mut failures = Vec::new();

    let block = match axis::min_duration(&start, &goal, &limits) {
        Ok(block) => block,
        Err(e) => return vec![format!("min duration: {e} for {case:?}")],
    };
    let t_min = block.t_min;
    if block.p_min.durations().iter().any(|t| *t < 0.0) {
        failures.push(format!("negative duration in {:?}", block.p_min.durations()));
    }

    let mut durations = vec![t_min, 1.3 * t_min, 5.0 * t_min];
    if from_rest {
        durations.push(2.0 * t_min);
    }
    for tf in durations {
        if block.is_blocked(tf) {
            continue;
        }
        match axis::fixed_duration(&start, &goal, &limits, tf) {
            Ok(profile) => {
                if (profile.duration() - tf).abs() >= 1e-8 {
                    failures.push(format!("duration {} != {tf} for {case:?}", profile.duration()));
                }
                if !reaches(&profile, &goal, match_acc) {
                    failures.push(format!("goal missed at {tf} for {case:?}"));
                }
                if !within_limits(&profile, &limits) {
                    failures.push(format!("limits exceeded at {tf} for {case:?}"));
                }
            }
            Err(e) => failures.push(format!("fixed duration {tf}: {e} for {case:?}")),
        }
    }

    if t_min > 1e-3 && axis::fixed_duration(&start, &goal, &limits, 0.99 * t_min).is_ok() {
        failures.push(format!("profile below the minimum {t_min} for {case:?}"));
    }
    failures.extend(check_blocked_intervals(case));
    failures
}

/// A fixed-duration profile exists exactly for the durations the block
/// leaves open, on a grid past the longest candidate.
fn check_blocked_intervals(case: &Case) -> Vec<String> {
    const GRID: usize = 47;
    let Case { start, goal, limits, .. } = *case;
    let Ok(block) = axis::min_duration(&start, &goal, &limits) else {
        return Vec::new();
    };
    let longest = block.candidates().iter().map(Profile::duration).fold(0.0, f64::max);
    let (low, high) = (block.t_min, 1.5 * longest + 0.1);

    (1..=GRID)
        .map(|i| low + (high - low) * i as f64 / GRID as f64)
        .find(|tf| axis::fixed_duration(&start, &goal, &limits, *tf).is_ok() == block.is_blocked(*tf))
        .map(|tf| {
            let durations: Vec<f64> = block.candidates().iter().map(Profile::duration).collect();
            vec![format!(
                "blocked {} at {tf} with candidates {durations:?} for {case:?}",
                block.is_blocked(tf)
            )]
        })
        .unwrap_or_default()
}

fn run(seed: u64, cases: usize, generate: fn(&mut StdRng) -> Case, match_acc: bool) {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let mut rng = StdRng::seed_from_u64(seed);
    let failures: Vec<String> = (0..cases)
        .flat_map(|_| check(&generate(&mut rng), match_acc))
        .collect();

    assert!(
        failures.is_empty(),
        "{} failures, first: {:#?}",
        failures.len(),
        &failures[..failures.len().min(5)]
    );
}

/// A braked move exists, keeps its start state and reaches the goal in
/// exactly its minimal duration.
fn check_braked(case: &Case) -> Vec<String> {
    let Case { start, goal, limits, .. } = *case;
    let t_min = match axis::min_duration(&start, &goal, &limits) {
        Ok(block) => block.t_min,
        Err(e) => return vec![format!("min duration: {e} for {case:?}")],
    };
    let profile = match axis::fixed_duration(&start, &goal, &limits, t_min) {
        Ok(profile) => profile,
        Err(e) => return vec![format!("fixed duration {t_min}: {e} for {case:?}")],
    };
    let mut failures = Vec::new();
    if profile.start_state() != start {
        failures.push(format!("start moved to {:?} for {case:?}", profile.start_state()));
    }
    if (profile.duration() - t_min).abs() >= 1e-8 {
        failures.push(format!("duration {} != {t_min} for {case:?}", profile.duration()));
    }
    if !reaches(&profile, &goal, true) {
        failures.push(format!("goal missed for {case:?}"));
    }
    failures
}

#[test]
fn jerk_limited_invariants() {
    run(7, CASES, jerk_limited_case, true);
}

#[test]
fn jerk_limited_invariants_other_seed() {
    run(2024, CASES, jerk_limited_case, true);
}

#[test]
fn saturated_goal_invariants() {
    run(5, CASES / 2, saturated_goal_case, true);
}

#[test]
fn far_from_origin_invariants() {
    run(4, CASES / 4, far_from_origin_case, true);
}

#[test]
fn standstill_invariants() {
    run(3, CASES / 4, standstill_case, true);
}

#[test]
fn acceleration_limited_invariants() {
    run(11, CASES, acceleration_limited_case, false);
}

#[test]
fn zero_motion_takes_no_time() {
    let limits = KinematicLimits::symmetric(3.0, 2.0, 5.0);
    let state = KinematicState::at_rest(1.5);
    let block = axis::min_duration(&state, &state, &limits).unwrap();
    assert_eq!(block.t_min, 0.0);
    assert!(block.p_min.durations().iter().all(|t| *t == 0.0));
}

#[test]
fn braked_start_invariants() {
    let mut rng = StdRng::seed_from_u64(9);
    let failures: Vec<String> = (0..CASES)
        .flat_map(|_| check_braked(&braked_case(&mut rng)))
        .collect();
    assert!(
        failures.is_empty(),
        "{} failures, first: {:#?}",
        failures.len(),
        &failures[..failures.len().min(5)]
    );
}
