//! Numeric tolerances shared by every solver family.

/// Machine epsilon, used as the "is this zero" threshold for inputs and durations.
pub const EPS: f64 = f64::EPSILON;

/// Slack allowed when comparing a velocity against its limit, relative to
/// limits larger than one.
pub const V_EPS: f64 = 1e-12;
/// Slack allowed when comparing an acceleration against its limit, relative
/// to limits larger than one.
pub const A_EPS: f64 = 1e-12;
/// Slack allowed when comparing a reduced jerk against the jerk limit.
pub const J_EPS: f64 = 1e-12;

/// Required accuracy of the final position.
pub const P_PRECISION: f64 = 1e-8;
/// Required accuracy of the final position relative to its magnitude, for
/// goals far from the origin.
pub const P_PRECISION_REL: f64 = 1e-12;
/// Required accuracy of the final velocity.
pub const V_PRECISION: f64 = 1e-8;
/// Required accuracy of the final acceleration.
pub const A_PRECISION: f64 = 1e-10;
/// Required accuracy of the total duration of a fixed-time profile.
pub const T_PRECISION: f64 = 1e-8;

/// Negative durations down to this value, relative to profiles longer than
/// one second, are rounded to zero.
pub const T_NEG: f64 = 1e-11;
/// Profiles longer than this are rejected.
pub const T_MAX: f64 = 1e12;

/// Relative distance under which two candidate durations are the same candidate.
pub const T_DUPLICATE: f64 = 1e-12;

/// Convergence threshold of the bracketed root polishing.
pub const ROOT_TOLERANCE: f64 = 1e-14;
