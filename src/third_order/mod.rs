//! Jerk-limited solvers: seven phases with jerk `+j, 0, -j, 0, ∓j, 0, ±j`.

mod step1;
mod step2;

pub use step1::Step1;
pub use step2::Step2;
