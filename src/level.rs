//! Level records and JSON level packs
//!
//! A level pack is a JSON array of level records. Field names keep the
//! original asset spelling (camelCase keys, SCREAMING obstacle kinds) so
//! packs shipped for older builds keep loading unchanged.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A grid coordinate: `x` is the column, `y` the row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Obstacle footprint within its cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ObstacleKind {
    /// Full-cell axis-aligned box. Old packs spell this `OBSTACLE`;
    /// the alias keeps them loading.
    #[serde(alias = "OBSTACLE")]
    Rectangle,
    /// Disc inscribed in the cell
    Circle,
}

/// One obstacle cell in a level definition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Obstacle {
    pub x: i32,
    pub y: i32,
    #[serde(rename = "type")]
    pub kind: ObstacleKind,
}

/// A complete level definition, read-only to the simulation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Level {
    pub id: i32,
    /// Grid width in cells
    pub width: u32,
    /// Grid height in cells
    pub height: u32,
    pub start_position: Position,
    pub goal_position: Position,
    #[serde(default)]
    pub obstacles: Vec<Obstacle>,
    /// Presentation hint (ARGB); carried through level-change events untouched
    #[serde(default)]
    pub theme_color: i32,
}

/// Errors from loading a level pack
#[derive(Debug)]
pub enum LevelPackError {
    /// Malformed JSON or wrong shape
    Parse(serde_json::Error),
    /// Two levels share an id
    DuplicateId(i32),
    /// A level declares a zero-sized grid
    EmptyDimensions(i32),
}

impl fmt::Display for LevelPackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelPackError::Parse(err) => write!(f, "malformed level pack: {err}"),
            LevelPackError::DuplicateId(id) => write!(f, "duplicate level id {id}"),
            LevelPackError::EmptyDimensions(id) => write!(f, "level {id} has a zero-sized grid"),
        }
    }
}

impl std::error::Error for LevelPackError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LevelPackError::Parse(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for LevelPackError {
    fn from(err: serde_json::Error) -> Self {
        LevelPackError::Parse(err)
    }
}

/// An ordered collection of levels, kept sorted by ascending id
///
/// Progression walks this order: completing level `n` advances to the
/// smallest id greater than `n`, so gaps in the numbering are fine.
#[derive(Debug, Clone, Default)]
pub struct LevelSet {
    levels: Vec<Level>,
}

impl LevelSet {
    /// Validate and sort a batch of levels
    pub fn from_levels(mut levels: Vec<Level>) -> Result<Self, LevelPackError> {
        levels.sort_by_key(|level| level.id);
        for pair in levels.windows(2) {
            if pair[0].id == pair[1].id {
                return Err(LevelPackError::DuplicateId(pair[0].id));
            }
        }
        for level in &levels {
            if level.width == 0 || level.height == 0 {
                return Err(LevelPackError::EmptyDimensions(level.id));
            }
        }
        log::info!("Loaded {} levels", levels.len());
        Ok(Self { levels })
    }

    /// Parse a JSON level pack
    pub fn from_json(json: &str) -> Result<Self, LevelPackError> {
        let levels: Vec<Level> = serde_json::from_str(json)?;
        Self::from_levels(levels)
    }

    /// Level with the given id
    pub fn get(&self, id: i32) -> Option<&Level> {
        self.levels.iter().find(|level| level.id == id)
    }

    /// Lowest-id level
    pub fn first(&self) -> Option<&Level> {
        self.levels.first()
    }

    /// Next level in ascending id order, skipping gaps
    pub fn next_after(&self, id: i32) -> Option<&Level> {
        self.levels.iter().find(|level| level.id > id)
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Level> {
        self.levels.iter()
    }
}
