//! # otg_motion
//!
//! Time-optimal single-axis trajectories between arbitrary kinematic states.
//!
//! Every solve is split in two steps:
//! - `Step1` finds the minimal duration of a move and the durations above it
//!   that are infeasible, returned as a [`Block`].
//! - `Step2` finds a profile of an exact, given duration, so several axes can
//!   be synchronised to the slowest of them.
//!
//! The solver family depends on the limits: [`third_order`] for jerk-limited
//! axes, [`second_order`] when the jerk is unbounded and [`first_order`]
//! when only the velocity is limited. [`axis`] validates the input, brakes a
//! start outside the limits back into them and picks the family.
//!
//! ```
//! use otg_motion::{axis, KinematicLimits, KinematicState};
//!
//! let limits = KinematicLimits::symmetric(5.0, 5.0, 10.0);
//! let start = KinematicState::at_rest(0.0);
//! let goal = KinematicState::at_rest(10.0);
//!
//! let block = axis::min_duration(&start, &goal, &limits).unwrap();
//! assert!((block.t_min - 3.5).abs() < 1e-9);
//!
//! let profile = axis::fixed_duration(&start, &goal, &limits, 2.0 * block.t_min).unwrap();
//! let (pos, _vel, _acc, _jerk) = profile.state_at_time(profile.duration());
//! assert!((pos - 10.0).abs() < 1e-8);
//! ```

pub mod axis;
pub mod block;
pub mod brake;
pub mod buffer;
pub mod config;
pub mod first_order;
pub mod limits;
pub mod motion_polynomial;
pub mod profile;
pub mod roots;
pub mod second_order;
pub mod third_order;
pub mod tolerance;

// Re-export main types for convenience:
pub use axis::SolveError;
pub use block::{Block, Interval};
pub use brake::Brake;
pub use buffer::FixedVec;
pub use config::{load_config, AxisConfig, ConfigError, MotionConfig};
pub use limits::{Boundary, Direction, KinematicLimits, KinematicState, LimitsError, Order};
pub use motion_polynomial::MotionPolynomial;
pub use profile::{ControlSigns, PositionExtrema, Profile, ReachedLimits};
