//! Velocity-limited solvers: a constant velocity phase followed by a rest,
//! with velocity jumps at the phase boundaries. Boundary velocities are not
//! matched; the profile ends at rest.

mod step1;
mod step2;

pub use step1::Step1;
pub use step2::Step2;
