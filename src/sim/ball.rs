//! Ball physical state and motion integration
//!
//! Positions are pixels, velocities pixels per tick. The tilt reading is the
//! only force input; damping and edge bounces bleed energy back out.

use glam::Vec2;

use crate::input::TiltSample;

/// The ball: a circle with mutable position and velocity
#[derive(Debug, Clone, PartialEq)]
pub struct Ball {
    /// Center position in pixels
    pub pos: Vec2,
    /// Velocity in pixels per tick
    pub vel: Vec2,
    /// Fixed for the lifetime of a session; must stay below the cell size
    pub radius: f32,
}

impl Ball {
    /// New ball at rest
    pub fn new(pos: Vec2, radius: f32) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            radius,
        }
    }

    /// Accelerate along the current tilt reading
    #[inline]
    pub fn apply_gravity(&mut self, tilt: TiltSample, gravity_factor: f32) {
        self.vel += tilt.as_vec2() * gravity_factor;
    }

    /// Bleed off energy; factor in (0, 1]
    #[inline]
    pub fn apply_damping(&mut self, damping_factor: f32) {
        self.vel *= damping_factor;
    }

    /// Advance one tick and bounce off the map edges
    ///
    /// Reflected components are scaled by `edge_damping` (1.0 reflects
    /// perfectly). Returns true when any edge was hit. Afterwards the ball's
    /// bounding circle sits inside `[0, width*cell] x [0, height*cell]`.
    pub fn integrate(
        &mut self,
        grid_width: u32,
        grid_height: u32,
        cell_size: f32,
        edge_damping: f32,
    ) -> bool {
        self.pos += self.vel;

        let max_x = grid_width as f32 * cell_size;
        let max_y = grid_height as f32 * cell_size;
        let mut bounced = false;

        if self.pos.x - self.radius < 0.0 {
            self.pos.x = self.radius;
            self.vel.x = -self.vel.x * edge_damping;
            bounced = true;
        } else if self.pos.x + self.radius > max_x {
            self.pos.x = max_x - self.radius;
            self.vel.x = -self.vel.x * edge_damping;
            bounced = true;
        }

        if self.pos.y - self.radius < 0.0 {
            self.pos.y = self.radius;
            self.vel.y = -self.vel.y * edge_damping;
            bounced = true;
        } else if self.pos.y + self.radius > max_y {
            self.pos.y = max_y - self.radius;
            self.vel.y = -self.vel.y * edge_damping;
            bounced = true;
        }

        bounced
    }

    /// Current speed in pixels per tick
    pub fn speed(&self) -> f32 {
        self.vel.length()
    }
}
