use tracing::trace;

use crate::block::{add_candidate, Block, Candidates, MAX_CANDIDATES};
use crate::limits::{DirectedLimits, Direction, KinematicLimits, KinematicState, Order};
use crate::profile::{ControlSigns, Profile, ReachedLimits, MAX_PHASES};
use crate::roots::{polish, solve_cubic, solve_quart_monic};
use crate::tolerance::EPS;

type Shape = fn(&Step1, &DirectedLimits, &mut Candidates<MAX_CANDIDATES>);

/// Free-time jerk-limited solve: every profile shape that reaches the goal,
/// ranked into a [`Block`].
#[derive(Clone, Copy, Debug)]
pub struct Step1 {
    start: KinematicState,
    goal: KinematicState,
    limits: KinematicLimits,

    v0: f64,
    a0: f64,
    vf: f64,
    af: f64,
    pd: f64,
    v0_v0: f64,
    vf_vf: f64,
    a0_a0: f64,
    af_af: f64,
    a0_p3: f64,
    af_p3: f64,
    a0_p4: f64,
    af_p4: f64,
}

impl Step1 {
    /// Shapes in priority order, tried for both directions.
    const SHAPES: [Shape; 5] = [
        Self::time_all_vel,
        Self::time_acc0_acc1,
        Self::time_acc0,
        Self::time_acc1,
        Self::time_none,
    ];

    /// Decompositions that stay stable for near-zero coefficients and nearly
    /// equal limits, only tried when no primary shape fits.
    const FALLBACK_SHAPES: [Shape; 3] = [
        Self::time_none_two_step,
        Self::time_acc0_two_step,
        Self::time_vel_two_step,
    ];

    pub fn new(start: &KinematicState, goal: &KinematicState, limits: &KinematicLimits) -> Self {
        let (v0, a0, vf, af) = (start.vel, start.acc, goal.vel, goal.acc);
        let a0_a0 = a0 * a0;
        let af_af = af * af;
        Self {
            start: *start,
            goal: *goal,
            limits: *limits,
            v0,
            a0,
            vf,
            af,
            pd: goal.pos - start.pos,
            v0_v0: v0 * v0,
            vf_vf: vf * vf,
            a0_a0,
            af_af,
            a0_p3: a0_a0 * a0,
            af_p3: af_af * af,
            a0_p4: a0_a0 * a0_a0,
            af_p4: af_af * af_af,
        }
    }

    /// Minimal duration and blocked intervals, or `None` if no shape fits.
    pub fn get_profile(&self) -> Option<Block> {
        let mut candidates = Candidates::new();

        if self.is_zero_motion() {
            let lim = self.limits.directed(Direction::Up);
            let mut profile = self.new_profile();
            if !profile.check(ControlSigns::Uddu, ReachedLimits::None, lim.j_max, &lim) {
                return None;
            }
            if self.v0.abs() < EPS && self.a0.abs() < EPS {
                return Some(Block::from_profile(profile));
            }
            // a moving axis may stay on its state, but any longer motion has
            // to leave and come back
            add_candidate(&mut candidates, profile);
        }

        let directions = Direction::BOTH.map(|d| self.limits.directed(d));
        for shape in Self::SHAPES {
            for lim in &directions {
                shape(self, lim, &mut candidates);
            }
        }
        if candidates.is_empty() {
            trace!("no primary shape fits, trying two-step shapes");
            for shape in Self::FALLBACK_SHAPES {
                for lim in &directions {
                    shape(self, lim, &mut candidates);
                }
            }
        }

        trace!(candidates = candidates.len(), "third order step 1 done");
        Block::calculate(&candidates)
    }

    /// Start and goal are the same state.
    fn is_zero_motion(&self) -> bool {
        [self.pd, self.vf - self.v0, self.af - self.a0]
            .iter()
            .all(|x| x.abs() < EPS)
    }

    fn new_profile(&self) -> Profile {
        Profile::new(Order::Third, &self.start, &self.goal)
    }

    fn try_add(
        &self,
        candidates: &mut Candidates<MAX_CANDIDATES>,
        t: [f64; MAX_PHASES],
        limits: ReachedLimits,
        lim: &DirectedLimits,
    ) {
        let mut profile = self.new_profile();
        profile.t = t;
        if profile.check(ControlSigns::Uddu, limits, lim.j_max, lim) {
            add_candidate(candidates, profile);
        }
    }

    /// Distance covered while accelerating from the start state to `vp`
    /// through a plateau at `a_max`.
    fn acc_plateau_distance(&self, vp: f64, a_max: f64, j: f64) -> f64 {
        let Self { a0, v0, .. } = *self;
        (vp * vp - self.v0_v0) / (2.0 * a_max) + a_max * (vp + v0) / (2.0 * j)
            - self.a0_p4 / (8.0 * a_max * j * j)
            + self.a0_p3 / (3.0 * j * j)
            - self.a0_a0 * a_max / (4.0 * j * j)
            + self.a0_a0 * v0 / (2.0 * a_max * j)
            - a0 * v0 / j
    }

    /// Distance covered while decelerating from `vp` to the goal state
    /// through a plateau at `a_min`.
    fn dec_plateau_distance(&self, vp: f64, a_min: f64, j: f64) -> f64 {
        let Self { af, vf, .. } = *self;
        (self.vf_vf - vp * vp) / (2.0 * a_min) - a_min * (vp + vf) / (2.0 * j)
            + self.af_p4 / (8.0 * a_min * j * j)
            - self.af_p3 / (3.0 * j * j)
            + a_min * self.af_af / (4.0 * j * j)
            - self.af_af * vf / (2.0 * a_min * j)
            + af * vf / j
    }

    /// Distance of the first half without plateau, `g` being the duration of
    /// the jerk-down phase.
    fn acc_ramp_distance(&self, g: f64, j: f64) -> f64 {
        j * g * g * g + (2.0 * self.v0 - self.a0_a0 / j) * g + self.a0_p3 / (3.0 * j * j)
            - self.a0 * self.v0 / j
    }

    /// Distance of the second half without plateau, `h` being the duration of
    /// the jerk-down phase.
    fn dec_ramp_distance(&self, h: f64, j: f64) -> f64 {
        j * h * h * h + (2.0 * self.vf - self.af_af / j) * h - self.af_p3 / (3.0 * j * j)
            + self.af * self.vf / j
    }

    fn time_all_vel(&self, lim: &DirectedLimits, candidates: &mut Candidates<MAX_CANDIDATES>) {
        let Self { a0, af, v0, vf, .. } = *self;
        let DirectedLimits { v_max, a_max, a_min, j_max: j, .. } = *lim;

        let t_acc0 = (self.a0_a0 / (2.0 * j * j) + (v_max - v0) / j).sqrt();
        let t_acc1 = (self.af_af / (2.0 * j * j) + (v_max - vf) / j).sqrt();

        let firsts = [
            (
                true,
                [
                    (a_max - a0) / j,
                    (self.a0_a0 / 2.0 - a_max * a_max + j * (v_max - v0)) / (a_max * j),
                    a_max / j,
                ],
                self.acc_plateau_distance(v_max, a_max, j),
            ),
            (false, [t_acc0 - a0 / j, 0.0, t_acc0], self.acc_ramp_distance(t_acc0, j)),
        ];
        let seconds = [
            (
                true,
                [
                    -a_min / j,
                    (a_min * a_min - self.af_af / 2.0 + j * (vf - v_max)) / (a_min * j),
                    (af - a_min) / j,
                ],
                self.dec_plateau_distance(v_max, a_min, j),
            ),
            (false, [t_acc1, 0.0, t_acc1 + af / j], self.dec_ramp_distance(t_acc1, j)),
        ];

        for (acc1, second, s2) in seconds {
            for (acc0, first, s1) in firsts {
                let cruise = (self.pd - s1 - s2) / v_max;
                let t = [
                    first[0], first[1], first[2], cruise, second[0], second[1], second[2],
                ];
                self.try_add(candidates, t, ReachedLimits::from_flags(acc0, acc1, true), lim);
            }
        }
    }

    fn time_acc0_acc1(&self, lim: &DirectedLimits, candidates: &mut Candidates<MAX_CANDIDATES>) {
        let Self { a0, af, v0, vf, .. } = *self;
        let DirectedLimits { a_max, a_min, j_max: j, .. } = *lim;

        // peak velocity from a quadratic in vp
        let qa = 1.0 / (2.0 * a_max) - 1.0 / (2.0 * a_min);
        let qb = (a_max - a_min) / (2.0 * j);
        let qc = self.acc_plateau_distance(0.0, a_max, j) + self.dec_plateau_distance(0.0, a_min, j)
            - self.pd;

        for vp in solve_cubic(0.0, qa, qb, qc).iter().copied() {
            let t = [
                (a_max - a0) / j,
                (self.a0_a0 / 2.0 - a_max * a_max + j * (vp - v0)) / (a_max * j),
                a_max / j,
                0.0,
                -a_min / j,
                (a_min * a_min - self.af_af / 2.0 + j * (vf - vp)) / (a_min * j),
                (af - a_min) / j,
            ];
            self.try_add(candidates, t, ReachedLimits::Acc0Acc1, lim);
        }
    }

    fn time_acc0(&self, lim: &DirectedLimits, candidates: &mut Candidates<MAX_CANDIDATES>) {
        let Self { a0, af, v0, vf, .. } = *self;
        let DirectedLimits { a_max, j_max: j, .. } = *lim;

        // velocity the goal is reached from when its ramp starts at zero acceleration
        let w = vf - self.af_af / (2.0 * j);
        let ka = self.acc_plateau_distance(0.0, a_max, j) + self.v0_v0 / (2.0 * a_max)
            - a_max * v0 / (2.0 * j);
        let kb = -self.af_p3 / (3.0 * j * j) + af * vf / j;
        let jj = j * j;
        let polynom = [
            1.0,
            2.0 * a_max / j,
            2.0 * w / j + a_max * a_max / jj,
            4.0 * a_max * w / jj,
            ((w * w - self.v0_v0) + a_max * a_max * (w + v0) / j + 2.0 * a_max * (ka + kb - self.pd))
                / jj,
        ];

        let roots = solve_quart_monic(polynom[1], polynom[2], polynom[3], polynom[4]);
        for h in roots.iter().copied() {
            let h = polish(&polynom, h, 2);
            let vp = w + j * h * h;
            let t0 = (a_max - a0) / j;
            let t1 = (self.a0_a0 / 2.0 - a_max * a_max + j * (vp - v0)) / (a_max * j);
            let t = if h >= 0.0 {
                [t0, t1, a_max / j, 0.0, h, 0.0, h + af / j]
            } else {
                [t0, t1, a_max / j + h, 0.0, 0.0, 0.0, h + af / j]
            };
            self.try_add(candidates, t, ReachedLimits::Acc0, lim);
        }
    }

    fn time_acc1(&self, lim: &DirectedLimits, candidates: &mut Candidates<MAX_CANDIDATES>) {
        let Self { a0, af, v0, vf, .. } = *self;
        let DirectedLimits { a_min, j_max: j, .. } = *lim;

        // velocity the start settles at when its acceleration ramps to zero
        let u = v0 - self.a0_a0 / (2.0 * j);
        let kb = self.dec_plateau_distance(0.0, a_min, j) - self.vf_vf / (2.0 * a_min)
            + a_min * vf / (2.0 * j);
        let ka = self.a0_p3 / (3.0 * j * j) - a0 * v0 / j;
        let jj = j * j;
        let polynom = [
            1.0,
            -2.0 * a_min / j,
            2.0 * u / j + a_min * a_min / jj,
            -4.0 * a_min * u / jj,
            ((u * u - self.vf_vf) + a_min * a_min * (u + vf) / j - 2.0 * a_min * (kb + ka - self.pd))
                / jj,
        ];

        let roots = solve_quart_monic(polynom[1], polynom[2], polynom[3], polynom[4]);
        for g in roots.iter().copied() {
            let g = polish(&polynom, g, 2);
            let vp = u + j * g * g;
            let t5 = (a_min * a_min - self.af_af / 2.0 + j * (vf - vp)) / (a_min * j);
            let t6 = (af - a_min) / j;
            let t = if g >= 0.0 {
                [g - a0 / j, 0.0, g, 0.0, -a_min / j, t5, t6]
            } else {
                [g - a0 / j, 0.0, g - a_min / j, 0.0, 0.0, t5, t6]
            };
            self.try_add(candidates, t, ReachedLimits::Acc1, lim);
        }
    }

    fn time_none(&self, lim: &DirectedLimits, candidates: &mut Candidates<MAX_CANDIDATES>) {
        let Self { a0, af, v0, vf, .. } = *self;
        let j = lim.j_max;

        // T = g + h is the time between the two acceleration peaks
        let c = (vf - v0 + (self.a0_a0 - self.af_af) / (2.0 * j)) / j;
        let k = self.a0_p3 / (3.0 * j * j) - a0 * v0 / j - self.af_p3 / (3.0 * j * j) + af * vf / j;
        let polynom = [
            1.0,
            0.0,
            2.0 * (2.0 * (v0 + vf) - (self.a0_a0 + self.af_af) / j) / j,
            4.0 * (k - self.pd) / j,
            -c * c,
        ];

        let roots = solve_quart_monic(polynom[1], polynom[2], polynom[3], polynom[4]);
        for big_t in roots.iter().copied() {
            if big_t <= EPS {
                continue;
            }
            let big_t = polish(&polynom, big_t, 2);
            let g = (big_t + c / big_t) / 2.0;
            let h = (big_t - c / big_t) / 2.0;
            let t = if g >= 0.0 && h >= 0.0 {
                [g - a0 / j, 0.0, g, 0.0, h, 0.0, h + af / j]
            } else {
                [g - a0 / j, 0.0, big_t, 0.0, 0.0, 0.0, h + af / j]
            };
            self.try_add(candidates, t, ReachedLimits::None, lim);
        }
    }

    fn time_none_two_step(&self, lim: &DirectedLimits, candidates: &mut Candidates<MAX_CANDIDATES>) {
        let Self { a0, af, .. } = *self;
        let j = lim.j_max;

        // single acceleration peak h0
        let h0 = ((self.a0_a0 + self.af_af) / 2.0 + j * (self.vf - self.v0)).sqrt() * j.signum();
        self.try_add(
            candidates,
            [(h0 - a0) / j, 0.0, (h0 - af) / j, 0.0, 0.0, 0.0, 0.0],
            ReachedLimits::None,
            lim,
        );
        // a single ramp from a0 to af
        self.try_add(
            candidates,
            [(af - a0) / j, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
            ReachedLimits::None,
            lim,
        );
    }

    fn time_acc0_two_step(&self, lim: &DirectedLimits, candidates: &mut Candidates<MAX_CANDIDATES>) {
        let Self { a0, af, v0, vf, .. } = *self;
        let DirectedLimits { a_max, j_max: j, .. } = *lim;

        // hold the start acceleration, then ramp to af
        let hold = if a0 != 0.0 {
            (self.af_af - self.a0_a0 + 2.0 * j * (vf - v0)) / (2.0 * a0 * j)
        } else {
            f64::NAN
        };
        self.try_add(
            candidates,
            [0.0, hold, (a0 - af) / j, 0.0, 0.0, 0.0, 0.0],
            ReachedLimits::Acc0,
            lim,
        );
        self.try_add(
            candidates,
            [
                (a_max - a0) / j,
                (self.a0_a0 + self.af_af - 2.0 * a_max * a_max + 2.0 * j * (vf - v0)) / (2.0 * a_max * j),
                (a_max - af) / j,
                0.0,
                0.0,
                0.0,
                0.0,
            ],
            ReachedLimits::Acc0,
            lim,
        );
    }

    fn time_vel_two_step(&self, lim: &DirectedLimits, candidates: &mut Candidates<MAX_CANDIDATES>) {
        let Self { a0, af, v0, vf, .. } = *self;
        let DirectedLimits { v_max, a_min, j_max: j, .. } = *lim;

        // bring the acceleration straight to zero, then cruise
        let first = if a0 >= 0.0 {
            [0.0, 0.0, a0 / j]
        } else {
            [-a0 / j, 0.0, 0.0]
        };
        let tz = (a0 / j).abs();
        let s1 = if a0 != 0.0 {
            v0 * tz + a0 * tz * tz / 2.0 - a0.signum() * j * tz * tz * tz / 6.0
        } else {
            0.0
        };

        let t_acc1 = (self.af_af / (2.0 * j * j) + (v_max - vf) / j).sqrt();
        let seconds = [
            (
                ReachedLimits::Acc1Vel,
                [
                    -a_min / j,
                    (a_min * a_min - self.af_af / 2.0 + j * (vf - v_max)) / (a_min * j),
                    (af - a_min) / j,
                ],
                self.dec_plateau_distance(v_max, a_min, j),
            ),
            (
                ReachedLimits::Vel,
                [t_acc1, 0.0, t_acc1 + af / j],
                self.dec_ramp_distance(t_acc1, j),
            ),
        ];

        for (limits, second, s2) in seconds {
            let cruise = (self.pd - s1 - s2) / v_max;
            let t = [
                first[0], first[1], first[2], cruise, second[0], second[1], second[2],
            ];
            self.try_add(candidates, t, limits, lim);
        }
    }
}
