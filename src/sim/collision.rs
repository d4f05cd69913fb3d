//! Collision detection and response against grid cells
//!
//! One pass per tick, in a fixed order: goal check first (a hit ends the
//! level and short-circuits everything else), then obstacle candidates from
//! the spatial index, then a boundary re-check that cleans up after
//! push-outs. Geometry stays in plain closest-point/reflection form; the
//! zero-distance degenerate case is nudged, never divided.

use glam::Vec2;

use crate::config::Tuning;
use crate::consts::{EDGE_CLAMP_OFFSET, PREFILTER_REACH};
use crate::{cell_center, cell_origin};

use super::ball::Ball;
use super::grid::{CellType, Grid};
use super::spatial::SpatialIndex;

/// What a collision pass observed this tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionEvents {
    /// Ball overlapped the goal cell; all other processing was skipped
    pub goal_reached: bool,
    /// Boundary re-check had to reflect the ball back inside
    pub wall_bounce: bool,
    /// Obstacle responses applied this tick
    pub obstacle_hits: u32,
}

/// Per-tick collision pass over a stamped grid
///
/// Holds only a reusable candidate buffer; all game state lives in the ball
/// and grid passed in.
#[derive(Debug, Default)]
pub struct CollisionEngine {
    candidates: Vec<(u32, u32)>,
}

impl CollisionEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Detect and resolve everything the ball touches this tick
    pub fn run(
        &mut self,
        ball: &mut Ball,
        grid: &Grid,
        index: &SpatialIndex,
        cell_size: f32,
        tuning: &Tuning,
    ) -> CollisionEvents {
        let mut events = CollisionEvents::default();

        // Goal first: one overlap completes the level, nothing else matters
        for (row, col, kind) in grid.cells() {
            if kind == CellType::Goal && ball_overlaps_cell(ball, col, row, cell_size) {
                events.goal_reached = true;
                return events;
            }
        }

        index.query_neighborhood(ball.pos.x, ball.pos.y, cell_size, &mut self.candidates);

        let reach = ball.radius + cell_size * PREFILTER_REACH;
        for &(col, row) in &self.candidates {
            // cheap center-distance reject before the precise tests
            let center = cell_center(col, row, cell_size);
            if ball.pos.distance_squared(center) >= reach * reach {
                continue;
            }
            match grid.cell(row, col) {
                Some(CellType::ObstacleRect) => {
                    if ball_overlaps_cell(ball, col, row, cell_size)
                        && resolve_rect(ball, col, row, cell_size, tuning.damping_factor)
                    {
                        events.obstacle_hits += 1;
                    }
                }
                Some(CellType::ObstacleCircle) => {
                    if resolve_circle(ball, center, cell_size / 2.0, tuning.damping_factor) {
                        events.obstacle_hits += 1;
                    }
                }
                _ => {}
            }
        }

        if clamp_to_bounds(ball, grid.width(), grid.height(), cell_size, tuning.edge_damping()) {
            events.wall_bounce = true;
        }

        events
    }
}

/// Ball bounding box vs cell box overlap, the goal/rectangle gate test
#[inline]
pub fn ball_overlaps_cell(ball: &Ball, col: u32, row: u32, cell_size: f32) -> bool {
    let origin = cell_origin(col, row, cell_size);
    ball.pos.x + ball.radius > origin.x
        && ball.pos.x - ball.radius < origin.x + cell_size
        && ball.pos.y + ball.radius > origin.y
        && ball.pos.y - ball.radius < origin.y + cell_size
}

/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Push the ball out of a box obstacle and reflect off it
///
/// Returns false when the circle never actually reached the box (the boxes
/// can overlap while the circle clears the corner) or when the contact was
/// degenerate and only a nudge was applied.
fn resolve_rect(ball: &mut Ball, col: u32, row: u32, cell_size: f32, damping: f32) -> bool {
    let origin = cell_origin(col, row, cell_size);
    let closest = ball.pos.clamp(origin, origin + Vec2::splat(cell_size));
    let diff = ball.pos - closest;
    let dist = diff.length();

    if dist == 0.0 {
        // ball center on the box: no usable normal this tick
        ball.pos.x += 1.0;
        return false;
    }
    let penetration = ball.radius - dist;
    if penetration <= 0.0 {
        return false;
    }

    let normal = diff / dist;
    ball.pos += normal * penetration;
    ball.vel = reflect_velocity(ball.vel, normal) * damping;
    true
}

/// Push the ball out of a disc obstacle and reflect off it
fn resolve_circle(ball: &mut Ball, center: Vec2, cell_radius: f32, damping: f32) -> bool {
    let diff = ball.pos - center;
    let dist = diff.length();
    if dist >= ball.radius + cell_radius {
        return false;
    }
    if dist == 0.0 {
        // concentric with the obstacle: no usable normal this tick
        ball.pos.x += 1.0;
        return false;
    }

    let normal = diff / dist;
    let penetration = (ball.radius + cell_radius) - dist;
    ball.pos += normal * penetration;
    ball.vel = reflect_velocity(ball.vel, normal) * damping;
    true
}

/// Boundary re-check after obstacle responses
///
/// Integration already keeps the ball inside, so this only fires when a
/// push-out shoved it past an edge. The clamp backs off a tenth of a radius
/// extra so the next tick starts clear of the wall.
fn clamp_to_bounds(
    ball: &mut Ball,
    grid_width: u32,
    grid_height: u32,
    cell_size: f32,
    edge_damping: f32,
) -> bool {
    let max_x = grid_width as f32 * cell_size;
    let max_y = grid_height as f32 * cell_size;
    let offset = ball.radius * EDGE_CLAMP_OFFSET;
    let mut bounced = false;

    if ball.pos.x - ball.radius < 0.0 {
        ball.pos.x = offset;
        ball.vel.x = -ball.vel.x * edge_damping;
        bounced = true;
    } else if ball.pos.x + ball.radius > max_x {
        ball.pos.x = max_x - offset;
        ball.vel.x = -ball.vel.x * edge_damping;
        bounced = true;
    }

    if ball.pos.y - ball.radius < 0.0 {
        ball.pos.y = offset;
        ball.vel.y = -ball.vel.y * edge_damping;
        bounced = true;
    } else if ball.pos.y + ball.radius > max_y {
        ball.pos.y = max_y - offset;
        ball.vel.y = -ball.vel.y * edge_damping;
        bounced = true;
    }

    bounced
}
