//! Fixed-tick maze simulation
//!
//! All gameplay logic lives here and belongs to one control thread:
//! - Fixed timestep only (one tick = gravity, damping, integration, collision)
//! - Stable processing order (goal check, obstacles, boundary re-check)
//! - Spatial-index rebuilds happen only at level-load boundaries
//! - No rendering, sensor or storage dependencies

pub mod ball;
pub mod collision;
pub mod grid;
pub mod session;
pub mod spatial;

pub use ball::Ball;
pub use collision::{CollisionEngine, CollisionEvents, ball_overlaps_cell, reflect_velocity};
pub use grid::{Cell, CellType, Grid, GridAnchor, OutOfBoundsError};
pub use session::{LevelSession, SessionError, SessionEvent, SessionStatus};
pub use spatial::SpatialIndex;
