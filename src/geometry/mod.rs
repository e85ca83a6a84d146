//! Scene geometry and bullet trajectory.
//!
//! The bullet travels along a straight ray from the muzzle, slowing down at
//! a constant rate. The resolver reduces a scene to the quantities both
//! source models need:
//!
//! ```text
//!                      mic
//!                       *
//!                       |  miss distance b
//!   gun  o--------------+--------------->  trajectory
//!        |<--- along --->|
//!                   closest point
//! ```

mod resolver;
mod trajectory;

pub use resolver::{resolve, ClosestApproach, ResolvedGeometry};
pub use trajectory::{Trajectory, TrajectoryState};

/// Distances at or below this value (meters) are treated as coincident.
pub const COINCIDENCE_TOLERANCE: f64 = 1e-9;
