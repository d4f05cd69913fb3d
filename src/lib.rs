//! Tilt Maze - a tilt-driven ball-in-a-maze game core
//!
//! Core modules:
//! - `sim`: Fixed-tick simulation (ball physics, grid, collisions, level session)
//! - `level`: Level records and JSON level packs
//! - `config`: Data-driven physics tuning
//! - `input`: Cross-thread tilt snapshot feed
//! - `best_times`: Min-kept per-level completion times
//!
//! Rendering, sensors and storage live outside this crate; the simulation
//! exposes plain state getters and a synchronous event stream for them.

pub mod best_times;
pub mod config;
pub mod input;
pub mod level;
pub mod sim;

pub use best_times::BestTimes;
pub use config::Tuning;
pub use input::{TiltFeed, TiltSample};
pub use level::{Level, LevelPackError, LevelSet, Obstacle, ObstacleKind, Position};
pub use sim::{
    Ball, CellType, CollisionEngine, CollisionEvents, Grid, LevelSession, OutOfBoundsError,
    SessionError, SessionEvent, SessionStatus, SpatialIndex,
};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation tick rate (sensor-game cadence)
    pub const TICK_HZ: u32 = 60;
    /// Fixed simulation timestep in seconds
    pub const TICK_DT: f32 = 1.0 / TICK_HZ as f32;

    /// Tilt-to-acceleration factor (velocity gain per tick per tilt unit)
    pub const DEFAULT_GRAVITY_FACTOR: f32 = 0.5;
    /// Fraction of velocity kept each tick
    pub const DEFAULT_DAMPING_FACTOR: f32 = 0.98;
    /// Ball radius in pixels; must stay below the cell size
    pub const DEFAULT_BALL_RADIUS: f32 = 50.0;

    /// Spatial-index bucket side length, in cells
    pub const DEFAULT_SECTION_SIZE: u32 = 2;
    /// Collision pre-filter reach, in cell sizes
    pub const PREFILTER_REACH: f32 = 1.5;
    /// Boundary re-check clamp distance from the edge, in ball radii
    pub const EDGE_CLAMP_OFFSET: f32 = 1.1;
}

/// Top-left corner of a grid cell in pixel space
#[inline]
pub fn cell_origin(col: u32, row: u32, cell_size: f32) -> Vec2 {
    Vec2::new(col as f32 * cell_size, row as f32 * cell_size)
}

/// Midpoint of a grid cell in pixel space
#[inline]
pub fn cell_center(col: u32, row: u32, cell_size: f32) -> Vec2 {
    cell_origin(col, row, cell_size) + Vec2::splat(cell_size / 2.0)
}
