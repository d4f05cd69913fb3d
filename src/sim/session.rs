//! Level lifecycle, tick orchestration and session events
//!
//! A session owns the live simulation state and walks a level set in
//! ascending id order. One `tick` runs the whole fixed-step pipeline:
//! tilt snapshot in, gravity, damping, integration with edge bounces,
//! then the collision pass. State transitions surface as synchronous
//! events so hosts can drive haptics, sound and score screens without
//! polling.

use std::fmt;

use glam::Vec2;

use crate::config::Tuning;
use crate::consts::TICK_HZ;
use crate::input::TiltSample;
use crate::level::{Level, LevelSet};

use super::ball::Ball;
use super::collision::CollisionEngine;
use super::grid::{Grid, OutOfBoundsError};
use super::spatial::SpatialIndex;

/// Where the session is in its life
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// No level started yet
    Idle,
    Running,
    Paused,
    /// Every level in the set has been played through
    Finished,
}

/// Synchronous notifications emitted as transitions happen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// A level was stamped and the ball placed on its start cell
    LevelStarted { id: i32, theme_color: i32 },
    /// The ball hit a map edge this tick
    WallBounce,
    /// The ball reached the goal; elapsed is fixed-tick game time
    LevelCompleted { id: i32, elapsed_ms: u64 },
    /// No next level remained after a completion
    AllLevelsCompleted,
}

/// Errors starting a level
#[derive(Debug)]
pub enum SessionError {
    /// The level set is empty
    NoLevels,
    /// No level carries this id
    UnknownLevel(i32),
    /// The level's start or goal lies outside its own grid
    Stamp(OutOfBoundsError),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::NoLevels => write!(f, "the level set is empty"),
            SessionError::UnknownLevel(id) => write!(f, "no level with id {id}"),
            SessionError::Stamp(err) => write!(f, "level failed to load: {err}"),
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SessionError::Stamp(err) => Some(err),
            _ => None,
        }
    }
}

impl From<OutOfBoundsError> for SessionError {
    fn from(err: OutOfBoundsError) -> Self {
        SessionError::Stamp(err)
    }
}

type Listener = Box<dyn FnMut(&SessionEvent)>;

/// Owns the live simulation and walks a level set front to back
///
/// Everything here belongs to one control thread; the only cross-thread
/// traffic is the tilt snapshot the caller hands to `tick`.
pub struct LevelSession {
    levels: LevelSet,
    tuning: Tuning,
    cell_size: f32,
    grid: Grid,
    ball: Ball,
    index: SpatialIndex,
    engine: CollisionEngine,
    current_id: Option<i32>,
    elapsed_ticks: u64,
    paused: bool,
    finished: bool,
    listeners: Vec<Listener>,
}

impl LevelSession {
    pub fn new(levels: LevelSet, tuning: Tuning, cell_size: f32) -> Self {
        debug_assert!(cell_size > 0.0);
        if tuning.ball_radius >= cell_size {
            log::warn!(
                "Ball radius {} does not fit a {}px cell; collision responses will misbehave",
                tuning.ball_radius,
                cell_size
            );
        }
        let ball = Ball::new(Vec2::ZERO, tuning.ball_radius);
        let index = SpatialIndex::new(tuning.section_size);
        Self {
            levels,
            tuning,
            cell_size,
            grid: Grid::new(1, 1),
            ball,
            index,
            engine: CollisionEngine::new(),
            current_id: None,
            elapsed_ticks: 0,
            paused: false,
            finished: false,
            listeners: Vec::new(),
        }
    }

    /// Register a listener for session events
    pub fn subscribe(&mut self, listener: impl FnMut(&SessionEvent) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Start the lowest-id level
    pub fn start_first(&mut self) -> Result<(), SessionError> {
        let id = self.levels.first().ok_or(SessionError::NoLevels)?.id;
        self.start_level(id)
    }

    /// Start (or restart) a specific level
    pub fn start_level(&mut self, id: i32) -> Result<(), SessionError> {
        let level = self
            .levels
            .get(id)
            .ok_or(SessionError::UnknownLevel(id))?
            .clone();
        self.load(&level)
    }

    /// Advance one fixed tick under the given tilt snapshot
    ///
    /// Does nothing while paused, finished or idle.
    pub fn tick(&mut self, tilt: TiltSample) -> SessionStatus {
        if self.paused || self.finished || self.current_id.is_none() {
            return self.status();
        }

        self.ball.apply_gravity(tilt, self.tuning.gravity_factor);
        self.ball.apply_damping(self.tuning.damping_factor);
        let edge_bounce = self.ball.integrate(
            self.grid.width(),
            self.grid.height(),
            self.cell_size,
            self.tuning.edge_damping(),
        );

        let events = self.engine.run(
            &mut self.ball,
            &self.grid,
            &self.index,
            self.cell_size,
            &self.tuning,
        );

        self.elapsed_ticks += 1;

        if edge_bounce || events.wall_bounce {
            self.emit(SessionEvent::WallBounce);
        }
        if events.goal_reached {
            self.complete_current_level();
        }

        self.status()
    }

    /// Freeze the simulation; safe to call repeatedly
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Unfreeze the simulation; safe to call repeatedly
    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn status(&self) -> SessionStatus {
        if self.finished {
            SessionStatus::Finished
        } else if self.current_id.is_none() {
            SessionStatus::Idle
        } else if self.paused {
            SessionStatus::Paused
        } else {
            SessionStatus::Running
        }
    }

    pub fn ball(&self) -> &Ball {
        &self.ball
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// The level being played, if any
    pub fn current_level(&self) -> Option<&Level> {
        self.current_id.and_then(|id| self.levels.get(id))
    }

    /// Ticks spent in the current level
    pub fn elapsed_ticks(&self) -> u64 {
        self.elapsed_ticks
    }

    /// Game time spent in the current level, in milliseconds
    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ticks * 1000 / TICK_HZ as u64
    }

    /// Display score derived from the ball position
    pub fn score(&self) -> i32 {
        ((self.ball.pos.x + self.ball.pos.y) / 10.0) as i32
    }

    fn load(&mut self, level: &Level) -> Result<(), SessionError> {
        // a failed stamp leaves the previous level intact
        self.grid.stamp_level(level)?;
        self.index.rebuild(&self.grid);
        self.ball = Ball::new(
            Vec2::new(
                level.start_position.x as f32 * self.cell_size + self.cell_size / 2.0,
                level.start_position.y as f32 * self.cell_size + self.cell_size / 2.0,
            ),
            self.tuning.ball_radius,
        );
        self.elapsed_ticks = 0;
        self.current_id = Some(level.id);
        self.finished = false;
        self.paused = false;
        log::info!(
            "Level {} started: {}x{} grid, {} obstacles",
            level.id,
            level.width,
            level.height,
            level.obstacles.len()
        );
        self.emit(SessionEvent::LevelStarted {
            id: level.id,
            theme_color: level.theme_color,
        });
        Ok(())
    }

    fn complete_current_level(&mut self) {
        let Some(id) = self.current_id else { return };
        let elapsed_ms = self.elapsed_ms();
        log::info!("Level {id} completed in {elapsed_ms} ms");
        self.emit(SessionEvent::LevelCompleted { id, elapsed_ms });

        match self.levels.next_after(id).cloned() {
            Some(next) => {
                if let Err(err) = self.load(&next) {
                    // a bad level mid-set ends the run instead of crashing it
                    log::error!("Could not start level {}: {err}", next.id);
                    self.finish();
                }
            }
            None => {
                log::info!("All levels completed");
                self.finish();
            }
        }
    }

    fn finish(&mut self) {
        self.current_id = None;
        self.finished = true;
        self.emit(SessionEvent::AllLevelsCompleted);
    }

    fn emit(&mut self, event: SessionEvent) {
        for listener in &mut self.listeners {
            listener(&event);
        }
    }
}
