//! Data-driven physics tuning
//!
//! One struct of balance knobs, fixed for the lifetime of a session.
//! Serde-loadable so hosts can ship tweaks without a rebuild; every field
//! defaults, so a partial JSON override is enough.

use serde::{Deserialize, Serialize};

use crate::consts::{
    DEFAULT_BALL_RADIUS, DEFAULT_DAMPING_FACTOR, DEFAULT_GRAVITY_FACTOR, DEFAULT_SECTION_SIZE,
};

/// Physics tuning knobs
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Tilt units to velocity delta, per tick
    pub gravity_factor: f32,
    /// Fraction of velocity kept each tick, in (0, 1]
    pub damping_factor: f32,
    /// Whether map-edge bounces bleed energy like obstacle bounces do
    pub damp_edge_bounce: bool,
    /// Spatial-index bucket side length, in cells
    pub section_size: u32,
    /// Ball radius in pixels; must stay below the cell size
    pub ball_radius: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity_factor: DEFAULT_GRAVITY_FACTOR,
            damping_factor: DEFAULT_DAMPING_FACTOR,
            damp_edge_bounce: true,
            section_size: DEFAULT_SECTION_SIZE,
            ball_radius: DEFAULT_BALL_RADIUS,
        }
    }
}

impl Tuning {
    /// Reflection scale applied at map edges
    pub fn edge_damping(&self) -> f32 {
        if self.damp_edge_bounce {
            self.damping_factor
        } else {
            1.0
        }
    }

    /// Parse tuning from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let tuning = Tuning::default();
        assert_eq!(tuning.gravity_factor, 0.5);
        assert_eq!(tuning.damping_factor, 0.98);
        assert!(tuning.damp_edge_bounce);
        assert_eq!(tuning.section_size, 2);
        assert_eq!(tuning.ball_radius, 50.0);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{"gravity_factor": 0.8}"#).unwrap();
        assert_eq!(tuning.gravity_factor, 0.8);
        assert_eq!(tuning.damping_factor, 0.98);
        assert_eq!(tuning.section_size, 2);
    }

    #[test]
    fn test_edge_damping_switch() {
        let mut tuning = Tuning::default();
        assert_eq!(tuning.edge_damping(), tuning.damping_factor);
        tuning.damp_edge_bounce = false;
        assert_eq!(tuning.edge_damping(), 1.0);
    }
}
