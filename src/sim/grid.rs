//! Grid of typed cells, stamped from a level definition
//!
//! The grid is rebuilt on every level load and is the single authority on
//! what occupies each cell. Stamping order matters: goal first, then
//! obstacles, then start last, so a start marker always survives a clash
//! with an obstacle from a sloppy level file.

use std::fmt;

use crate::level::{Level, ObstacleKind, Position};

/// Semantic role of one grid square
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellType {
    #[default]
    Empty,
    /// Where the ball spawns
    Start,
    /// Reaching this cell completes the level
    Goal,
    /// Full-cell box obstacle
    ObstacleRect,
    /// Disc obstacle inscribed in the cell
    ObstacleCircle,
}

impl CellType {
    /// Whether this cell blocks the ball
    #[inline]
    pub fn is_obstacle(self) -> bool {
        matches!(self, CellType::ObstacleRect | CellType::ObstacleCircle)
    }
}

impl From<ObstacleKind> for CellType {
    fn from(kind: ObstacleKind) -> Self {
        match kind {
            ObstacleKind::Rectangle => CellType::ObstacleRect,
            ObstacleKind::Circle => CellType::ObstacleCircle,
        }
    }
}

/// One grid square
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cell {
    pub kind: CellType,
}

/// Which level anchor an out-of-bounds error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridAnchor {
    Start,
    Goal,
}

impl GridAnchor {
    fn as_str(self) -> &'static str {
        match self {
            GridAnchor::Start => "start",
            GridAnchor::Goal => "goal",
        }
    }
}

/// Fatal stamp error: a level's start or goal lies outside its own bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutOfBoundsError {
    pub anchor: GridAnchor,
    pub position: Position,
    pub width: u32,
    pub height: u32,
}

impl fmt::Display for OutOfBoundsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} position {} lies outside the {}x{} grid",
            self.anchor.as_str(),
            self.position,
            self.width,
            self.height
        )
    }
}

impl std::error::Error for OutOfBoundsError {}

/// Rectangular field of cells, indexed by (row, col)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: u32,
    height: u32,
    cells: Vec<Cell>,
}

impl Grid {
    /// New all-empty grid
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::default(); (width * height) as usize],
        }
    }

    /// Width in cells
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in cells
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Cell type at (row, col); None when out of range
    pub fn cell(&self, row: u32, col: u32) -> Option<CellType> {
        if row < self.height && col < self.width {
            Some(self.cells[(row * self.width + col) as usize].kind)
        } else {
            None
        }
    }

    /// Write a cell type; rejects out-of-range writes with a warning
    pub fn set_cell(&mut self, row: u32, col: u32, kind: CellType) -> bool {
        if row < self.height && col < self.width {
            self.cells[(row * self.width + col) as usize].kind = kind;
            true
        } else {
            log::warn!(
                "Ignoring cell write at ({row}, {col}) outside the {}x{} grid",
                self.width,
                self.height
            );
            false
        }
    }

    /// Clear every cell back to empty
    pub fn reset(&mut self) {
        self.cells.fill(Cell::default());
    }

    /// Iterate cells as (row, col, type)
    pub fn cells(&self) -> impl Iterator<Item = (u32, u32, CellType)> + '_ {
        let width = self.width;
        self.cells.iter().enumerate().map(move |(idx, cell)| {
            let idx = idx as u32;
            (idx / width, idx % width, cell.kind)
        })
    }

    /// Rebuild this grid from a level definition
    ///
    /// Resizes to the level's dimensions, then writes the goal, every
    /// in-bounds obstacle, and finally the start. A misplaced obstacle is
    /// skipped with a warning; a misplaced start or goal is fatal and
    /// leaves the grid untouched.
    pub fn stamp_level(&mut self, level: &Level) -> Result<(), OutOfBoundsError> {
        for (anchor, position) in [
            (GridAnchor::Start, level.start_position),
            (GridAnchor::Goal, level.goal_position),
        ] {
            if !in_bounds(position, level.width, level.height) {
                return Err(OutOfBoundsError {
                    anchor,
                    position,
                    width: level.width,
                    height: level.height,
                });
            }
        }

        self.width = level.width;
        self.height = level.height;
        self.cells.clear();
        self.cells
            .resize((level.width * level.height) as usize, Cell::default());

        let goal = level.goal_position;
        self.set_cell(goal.y as u32, goal.x as u32, CellType::Goal);

        for obstacle in &level.obstacles {
            if !in_bounds(Position::new(obstacle.x, obstacle.y), level.width, level.height) {
                log::warn!(
                    "Level {}: skipping obstacle at ({}, {}) outside the {}x{} grid",
                    level.id,
                    obstacle.x,
                    obstacle.y,
                    level.width,
                    level.height
                );
                continue;
            }
            if obstacle.x == goal.x && obstacle.y == goal.y {
                log::warn!(
                    "Level {}: skipping obstacle at ({}, {}) covering the goal",
                    level.id,
                    obstacle.x,
                    obstacle.y
                );
                continue;
            }
            self.set_cell(obstacle.y as u32, obstacle.x as u32, obstacle.kind.into());
        }

        let start = level.start_position;
        if start == goal {
            log::warn!("Level {}: start and goal share a cell; the level cannot be won", level.id);
        }
        self.set_cell(start.y as u32, start.x as u32, CellType::Start);

        Ok(())
    }
}

#[inline]
fn in_bounds(position: Position, width: u32, height: u32) -> bool {
    position.x >= 0
        && position.y >= 0
        && (position.x as u32) < width
        && (position.y as u32) < height
}
