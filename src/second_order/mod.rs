//! Acceleration-limited solvers: three phases of constant acceleration with
//! unbounded jerk.

mod step1;
mod step2;

pub use step1::Step1;
pub use step2::Step2;
