//! The profile value shared by every solver family, its integration and its
//! validation against the limits.

use crate::brake::Brake;
use crate::limits::{DirectedLimits, Direction, KinematicState, Order};
use crate::motion_polynomial::MotionPolynomial;
use crate::tolerance::{
    A_EPS, A_PRECISION, EPS, J_EPS, P_PRECISION, P_PRECISION_REL, T_MAX, T_NEG, T_PRECISION, V_EPS,
    V_PRECISION,
};

/// Phase slots of a profile; lower orders use a prefix of them.
pub const MAX_PHASES: usize = 7;

/// Which limits a profile saturates.
///
/// `Acc0` is the acceleration plateau of the first half, `Acc1` the one of
/// the second half and `Vel` the cruise at the velocity limit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ReachedLimits {
    Acc0Acc1Vel,
    Vel,
    Acc0,
    Acc1,
    Acc0Acc1,
    Acc0Vel,
    Acc1Vel,
    #[default]
    None,
}

impl ReachedLimits {
    pub fn from_flags(acc0: bool, acc1: bool, vel: bool) -> Self {
        match (acc0, acc1, vel) {
            (true, true, true) => ReachedLimits::Acc0Acc1Vel,
            (false, true, true) => ReachedLimits::Acc1Vel,
            (true, false, true) => ReachedLimits::Acc0Vel,
            (false, false, true) => ReachedLimits::Vel,
            (true, true, false) => ReachedLimits::Acc0Acc1,
            (false, true, false) => ReachedLimits::Acc1,
            (true, false, false) => ReachedLimits::Acc0,
            (false, false, false) => ReachedLimits::None,
        }
    }

    pub fn has_acc0(self) -> bool {
        matches!(
            self,
            ReachedLimits::Acc0Acc1Vel
                | ReachedLimits::Acc0Vel
                | ReachedLimits::Acc0Acc1
                | ReachedLimits::Acc0
        )
    }

    pub fn has_acc1(self) -> bool {
        matches!(
            self,
            ReachedLimits::Acc0Acc1Vel
                | ReachedLimits::Acc1Vel
                | ReachedLimits::Acc0Acc1
                | ReachedLimits::Acc1
        )
    }

    pub fn has_vel(self) -> bool {
        matches!(
            self,
            ReachedLimits::Acc0Acc1Vel
                | ReachedLimits::Acc1Vel
                | ReachedLimits::Acc0Vel
                | ReachedLimits::Vel
        )
    }

    /// Drops every plateau whose phase has zero duration.
    fn normalized(self, t: &[f64; MAX_PHASES]) -> Self {
        Self::from_flags(
            self.has_acc0() && t[1] > EPS,
            self.has_acc1() && t[5] > EPS,
            self.has_vel() && t[3] > EPS,
        )
    }
}

/// Jerk sign pattern over the seven phases.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ControlSigns {
    /// +j, 0, -j, 0, -j, 0, +j
    #[default]
    Uddu,
    /// +j, 0, -j, 0, +j, 0, -j
    Udud,
}

impl ControlSigns {
    fn jerks(self, jf: f64) -> [f64; MAX_PHASES] {
        match self {
            ControlSigns::Uddu => [jf, 0.0, -jf, 0.0, -jf, 0.0, jf],
            ControlSigns::Udud => [jf, 0.0, -jf, 0.0, jf, 0.0, -jf],
        }
    }
}

/// Velocity and acceleration bounds of a profile, with slack scaled to the
/// size of the limits.
struct Envelope {
    v_lower: f64,
    v_upper: f64,
    a_lower: f64,
    a_upper: f64,
}

impl Envelope {
    fn new(lim: &DirectedLimits) -> Self {
        let v_slack = V_EPS * lim.v_max.abs().max(lim.v_min.abs()).max(1.0);
        let a_slack = A_EPS * lim.a_max.abs().max(lim.a_min.abs()).max(1.0);
        Self {
            v_lower: lim.v_max.min(lim.v_min) - v_slack,
            v_upper: lim.v_max.max(lim.v_min) + v_slack,
            a_lower: lim.a_max.min(lim.a_min) - a_slack,
            a_upper: lim.a_max.max(lim.a_min) + a_slack,
        }
    }

    fn holds_velocity(&self, v: f64) -> bool {
        (self.v_lower..=self.v_upper).contains(&v)
    }

    fn holds_acceleration(&self, a: f64) -> bool {
        (self.a_lower..=self.a_upper).contains(&a)
    }
}

/// Extreme positions reached along a profile.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PositionExtrema {
    pub min: f64,
    pub max: f64,
    pub t_min: f64,
    pub t_max: f64,
}

/// A time-parameterised motion from a start state to a goal state.
///
/// `t` holds the phase durations, `t_sum` their running sum. `p`, `v` and `a`
/// hold the state at each phase start plus the final state; `j` the jerk of
/// each phase. Second order profiles keep the phase acceleration in `a` with
/// zero jerk, first order profiles the phase velocity in `v`.
///
/// An active `brake` runs before the phases; `p[0]`, `v[0]` and `a[0]` are
/// then the braked state.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Profile {
    pub order: Order,
    pub t: [f64; MAX_PHASES],
    pub t_sum: [f64; MAX_PHASES],
    pub j: [f64; MAX_PHASES],
    pub a: [f64; MAX_PHASES + 1],
    pub v: [f64; MAX_PHASES + 1],
    pub p: [f64; MAX_PHASES + 1],
    pub pf: f64,
    pub vf: f64,
    pub af: f64,
    pub limits: ReachedLimits,
    pub control_signs: ControlSigns,
    pub direction: Direction,
    pub brake: Brake,
}

impl Profile {
    pub fn new(order: Order, start: &KinematicState, goal: &KinematicState) -> Self {
        let mut profile = Self {
            order,
            pf: goal.pos,
            vf: goal.vel,
            af: goal.acc,
            ..Self::default()
        };
        profile.p[0] = start.pos;
        profile.v[0] = start.vel;
        profile.a[0] = start.acc;
        profile
    }

    /// Number of phase slots used by the profile's order.
    pub fn phase_count(&self) -> usize {
        match self.order {
            Order::Third => 7,
            Order::Second => 3,
            Order::First => 2,
        }
    }

    /// Phase durations.
    pub fn durations(&self) -> &[f64] {
        &self.t[..self.phase_count()]
    }

    /// Total duration, braking included.
    pub fn duration(&self) -> f64 {
        self.brake.duration + self.t_sum[self.phase_count() - 1]
    }

    pub fn start_state(&self) -> KinematicState {
        if self.brake.is_active() {
            return KinematicState::new(self.brake.p[0], self.brake.v[0], self.brake.a[0]);
        }
        KinematicState::new(self.p[0], self.v[0], self.a[0])
    }

    /// State after the last phase.
    pub fn end_state(&self) -> KinematicState {
        let n = self.phase_count();
        KinematicState::new(self.p[n], self.v[n], self.a[n])
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

    /// The phases with a non-zero duration, in order, braking first.
    pub fn phases(&self) -> impl Iterator<Item = MotionPolynomial> + '_ {
        self.brake.phases().chain(
            (0..self.phase_count())
                .filter(|i| self.t[*i] > 0.0)
                .map(|i| self.phase(i)),
        )
    }

    /// `(p, v, a, j)` at `dt` into phase `phase` of the profile after
    /// braking. Indices past the last phase give the final state.
    pub fn state_at(&self, phase: usize, dt: f64) -> (f64, f64, f64, f64) {
        let n = self.phase_count();
        if phase >= n {
            return (self.p[n], self.v[n], self.a[n], 0.0);
        }
        self.phase(phase).sample(dt)
    }

    /// `(p, v, a, j)` at absolute time `time`.
    ///
    /// Before the start the start state is held; after the end the final
    /// state is extrapolated with zero jerk.
    pub fn state_at_time(&self, time: f64) -> (f64, f64, f64, f64) {
        if time <= 0.0 {
            let start = self.start_state();
            return (start.pos, start.vel, start.acc, 0.0);
        }
        let mut time = time;
        if self.brake.is_active() {
            if time <= self.brake.t[0] {
                return self.brake.phase(0).sample(time);
            }
            if time <= self.brake.duration {
                return self.brake.phase(1).sample(time - self.brake.t[0]);
            }
            time -= self.brake.duration;
        }
        let n = self.phase_count();
        let mut start = 0.0;
        for i in 0..n {
            if time <= self.t_sum[i] {
                return self.state_at(i, time - start);
            }
            start = self.t_sum[i];
        }
        MotionPolynomial::new(0.0, self.p[n], self.v[n], self.a[n], 0.0).sample(time - start)
    }

    /// Lowest and highest position along the profile and when they occur.
    pub fn position_extrema(&self) -> PositionExtrema {
        let start = self.start_state().pos;
        let mut extrema = PositionExtrema {
            min: start,
            max: start,
            t_min: 0.0,
            t_max: 0.0,
        };
        let mut visit = |pos: f64, time: f64| {
            if pos < extrema.min {
                extrema.min = pos;
                extrema.t_min = time;
            }
            if pos > extrema.max {
                extrema.max = pos;
                extrema.t_max = time;
            }
        };

        let mut start = 0.0;
        for phase in self.phases() {
            for dt in phase.velocity_zeros().iter() {
                visit(phase.sample(*dt).0, start + dt);
            }
            start += phase.time;
            visit(phase.end().0, start);
        }
        extrema
    }

    /// Earliest time at which the profile passes `position`, or `None` if it
    /// never does.
    pub fn first_time_at_position(&self, position: f64) -> Option<f64> {
        let mut start = 0.0;
        for phase in self.phases() {
            if (phase.pos - position).abs() < EPS {
                return Some(start);
            }
            if let Some(dt) = phase.first_time_at(position) {
                return Some(start + dt);
            }
            start += phase.time;
        }
        let end = self.end_state().pos;
        ((end - position).abs() < P_PRECISION).then_some(start)
    }

    /// Rounds tiny negative durations to zero and fills `t_sum`.
    fn accumulate_durations(&mut self) -> bool {
        let n = self.phase_count();
        let t_neg = T_NEG * self.t[..n].iter().map(|t| t.abs()).sum::<f64>().max(1.0);
        let mut sum = 0.0;
        for i in 0..n {
            let t = self.t[i];
            // also rejects NaN
            if !(t >= -t_neg) {
                return false;
            }
            self.t[i] = t.max(0.0);
            sum += self.t[i];
            self.t_sum[i] = sum;
        }
        sum <= T_MAX
    }

    fn reaches_position(&self, n: usize) -> bool {
        (self.p[n] - self.pf).abs() < P_PRECISION.max(P_PRECISION_REL * self.pf.abs())
    }

    fn reaches_goal(&self, n: usize) -> bool {
        self.reaches_position(n) && (self.v[n] - self.vf).abs() < V_PRECISION
    }

    /// Integrates a jerk-limited profile from `t` and validates it.
    ///
    /// `jf` is the jerk magnitude used by the phases, usually the directed
    /// jerk limit. On success the reached limits, control signs and
    /// direction are stored.
    pub(crate) fn check(
        &mut self,
        control_signs: ControlSigns,
        limits: ReachedLimits,
        jf: f64,
        lim: &DirectedLimits,
    ) -> bool {
        if !self.accumulate_durations() {
            return false;
        }
        let limits = if limits.has_vel() && self.t[3] < EPS {
            limits.normalized(&self.t)
        } else {
            limits
        };

        let jerks = control_signs.jerks(jf);
        for i in 0..MAX_PHASES {
            self.j[i] = if self.t[i] > 0.0 { jerks[i] } else { 0.0 };
        }

        let envelope = Envelope::new(lim);
        // a braked start may still be too fast, its first ramp and plateau
        // bring it back
        let entering = !envelope.holds_velocity(self.v[0]);
        for i in 0..MAX_PHASES {
            let (t, j) = (self.t[i], self.j[i]);
            self.a[i + 1] = self.a[i] + t * j;
            self.v[i + 1] = self.v[i] + t * (self.a[i] + t * j / 2.0);
            self.p[i + 1] = self.p[i] + t * (self.v[i] + t * (self.a[i] / 2.0 + t * j / 6.0));

            // the cruise starts at exactly zero acceleration
            if limits.has_vel() && i == 2 {
                self.a[3] = 0.0;
            }

            let (a_next, v_next) = (self.a[i + 1], self.v[i + 1]);
            if !envelope.holds_acceleration(a_next) {
                return false;
            }
            if entering && i < 2 {
                continue;
            }
            if !envelope.holds_velocity(v_next) {
                return false;
            }

            // velocity extremum where the acceleration crosses zero
            if j != 0.0 && self.a[i] * a_next < -EPS {
                let v_extremum = self.v[i] - self.a[i] * self.a[i] / (2.0 * j);
                if !envelope.holds_velocity(v_extremum) {
                    return false;
                }
            }
        }

        if !self.reaches_goal(MAX_PHASES) || (self.a[MAX_PHASES] - self.af).abs() >= A_PRECISION {
            return false;
        }

        self.control_signs = control_signs;
        self.limits = limits.normalized(&self.t);
        self.direction = lim.direction;
        true
    }

    /// [`Profile::check`] for a fixed total duration `tf`, also bounding a
    /// reduced jerk `jf` by the jerk limit.
    pub(crate) fn check_with_timing(
        &mut self,
        control_signs: ControlSigns,
        limits: ReachedLimits,
        tf: f64,
        jf: f64,
        lim: &DirectedLimits,
    ) -> bool {
        jf.abs() < lim.j_max.abs() + J_EPS
            && self.check(control_signs, limits, jf, lim)
            && (self.duration() - tf).abs() < T_PRECISION
    }

    /// Integrates an acceleration-limited profile with phase accelerations
    /// `acc` and validates it, optionally against a total duration.
    pub(crate) fn check_second_order(
        &mut self,
        acc: [f64; 3],
        limits: ReachedLimits,
        lim: &DirectedLimits,
        tf: Option<f64>,
    ) -> bool {
        if !self.accumulate_durations() {
            return false;
        }
        let envelope = Envelope::new(lim);
        for i in 0..3 {
            let t = self.t[i];
            let a = if t > 0.0 { acc[i] } else { 0.0 };
            if !envelope.holds_acceleration(a) {
                return false;
            }
            self.a[i] = a;
            self.j[i] = 0.0;
            self.v[i + 1] = self.v[i] + t * a;
            self.p[i + 1] = self.p[i] + t * (self.v[i] + t * a / 2.0);
            if !envelope.holds_velocity(self.v[i + 1]) {
                return false;
            }
        }
        self.a[3] = 0.0;

        if !self.reaches_goal(3) {
            return false;
        }
        if tf.is_some_and(|tf| (self.duration() - tf).abs() >= T_PRECISION) {
            return false;
        }

        self.limits = if limits == ReachedLimits::Vel && self.t[1] <= EPS {
            ReachedLimits::Acc0
        } else {
            limits
        };
        self.direction = lim.direction;
        true
    }

    /// Integrates a velocity-limited profile with phase velocities `vel` and
    /// validates the final position.
    pub(crate) fn check_first_order(&mut self, vel: [f64; 2], lim: &DirectedLimits, tf: Option<f64>) -> bool {
        if !self.accumulate_durations() {
            return false;
        }
        let envelope = Envelope::new(lim);
        for i in 0..2 {
            let t = self.t[i];
            let v = if t > 0.0 { vel[i] } else { 0.0 };
            if !envelope.holds_velocity(v) {
                return false;
            }
            self.v[i] = v;
            self.a[i] = 0.0;
            self.j[i] = 0.0;
            self.p[i + 1] = self.p[i] + t * v;
        }
        self.v[2] = 0.0;
        self.a[2] = 0.0;

        if !self.reaches_position(2) {
            return false;
        }
        if tf.is_some_and(|tf| (self.duration() - tf).abs() >= T_PRECISION) {
            return false;
        }

        self.limits = if vel.iter().any(|v| *v != 0.0 && (*v == lim.v_max || *v == lim.v_min)) {
            ReachedLimits::Vel
        } else {
            ReachedLimits::None
        };
        self.direction = lim.direction;
        true
    }
}
