use crate::buffer::FixedVec;
use crate::roots::solve_cubic;

/// A single phase of a profile: the state it starts from, its constant jerk
/// and its duration.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MotionPolynomial {
    pub time: f64,
    pub pos: f64,
    pub vel: f64,
    pub acc: f64,
    pub jrk: f64,
}

impl MotionPolynomial {
    /// Creates a new MotionPolynomial.
    pub fn new(time: f64, pos: f64, vel: f64, acc: f64, jrk: f64) -> Self {
        Self {
            time,
            pos,
            vel,
            acc,
            jrk,
        }
    }

    /// Position, velocity, acceleration and jerk `dt` after the phase start.
    ///
    /// `dt` is not clamped to the phase duration, so sampling past the end
    /// extrapolates the polynomial.
    pub fn sample(&self, dt: f64) -> (f64, f64, f64, f64) {
        // acc(t) = a0 + j0*t
        let acc = self.acc + self.jrk * dt;

        // vel(t) = v0 + a0*t + j0*t^2/2
        let vel = self.vel + (self.acc + acc) * dt * 0.5;

        // pos(t) = s0 + v0*t + a0*t^2/2 + j0*t^3/6, via the average velocity
        let vel_avg = self.vel + (2.0 * self.acc + acc) * dt / 6.0;
        let pos = self.pos + vel_avg * dt;

        (pos, vel, acc, self.jrk)
    }

    /// State at the end of the phase.
    pub fn end(&self) -> (f64, f64, f64, f64) {
        self.sample(self.time)
    }

    /// Times inside the phase where the velocity crosses zero.
    pub(crate) fn velocity_zeros(&self) -> FixedVec<f64, 4> {
        // vel(t) = v0 + a0*t + j0*t^2/2
        solve_cubic(0.0, self.jrk * 0.5, self.acc, self.vel)
            .iter()
            .copied()
            .filter(|t| *t > 0.0 && *t < self.time)
            .collect()
    }

    /// Earliest time in `(0, time]` at which the phase passes `position`.
    pub(crate) fn first_time_at(&self, position: f64) -> Option<f64> {
        solve_cubic(self.jrk / 6.0, self.acc / 2.0, self.vel, self.pos - position)
            .iter()
            .copied()
            .filter(|t| *t > 0.0 && *t <= self.time)
            .min_by(f64::total_cmp)
    }
}
