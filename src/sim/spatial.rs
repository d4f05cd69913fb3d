//! Spatial bucketing of obstacle cells
//!
//! Collision only ever needs the obstacle cells near the ball. Obstacle
//! coordinates are grouped into `section_size` x `section_size` blocks of
//! cells at level load; a per-tick query unions the 3x3 block of buckets
//! around the ball. The result over-approximates, so callers still run the
//! precise tests; it never under-approximates as long as the ball cannot
//! cross a whole bucket in one tick (displacement plus radius below
//! `section_size * cell_size`).

use std::collections::HashMap;

use super::grid::Grid;

/// Key stride for packing (col_bucket, row_bucket) into one integer.
/// 2^20 rows of headroom keeps the packing alias-free for any level this
/// game could plausibly load.
const KEY_STRIDE: i64 = 1 << 20;

#[inline]
fn bucket_key(col_bucket: i64, row_bucket: i64) -> i64 {
    col_bucket * KEY_STRIDE + row_bucket
}

/// Coarse index over obstacle cells for near-ball collision queries
///
/// Rebuild whenever the grid's obstacle layout changes; queries against a
/// stale index miss obstacles.
#[derive(Debug, Clone)]
pub struct SpatialIndex {
    section_size: u32,
    /// bucket key -> obstacle cells as (col, row)
    buckets: HashMap<i64, Vec<(u32, u32)>>,
}

impl SpatialIndex {
    pub fn new(section_size: u32) -> Self {
        assert!(section_size > 0, "section size must be at least one cell");
        Self {
            section_size,
            buckets: HashMap::new(),
        }
    }

    /// Bucket side length, in cells
    pub fn section_size(&self) -> u32 {
        self.section_size
    }

    /// Re-derive every bucket from the grid's current obstacle cells
    pub fn rebuild(&mut self, grid: &Grid) {
        self.buckets.clear();
        let section = self.section_size as i64;
        for (row, col, kind) in grid.cells() {
            if kind.is_obstacle() {
                let key = bucket_key(col as i64 / section, row as i64 / section);
                self.buckets.entry(key).or_default().push((col, row));
            }
        }
        log::debug!(
            "Spatial index rebuilt: {} obstacles in {} buckets",
            self.len(),
            self.buckets.len()
        );
    }

    /// Obstacle cells in the 3x3 block of buckets around a pixel position
    ///
    /// `out` is cleared first; reuse one buffer across ticks to avoid
    /// allocations in the tick path.
    pub fn query_neighborhood(&self, x: f32, y: f32, cell_size: f32, out: &mut Vec<(u32, u32)>) {
        out.clear();
        let section = self.section_size as i64;
        // div_euclid keeps the bucket math sound for transiently negative space
        let col_bucket = ((x / cell_size).floor() as i64).div_euclid(section);
        let row_bucket = ((y / cell_size).floor() as i64).div_euclid(section);

        for dc in -1..=1 {
            for dr in -1..=1 {
                if let Some(cells) = self.buckets.get(&bucket_key(col_bucket + dc, row_bucket + dr))
                {
                    out.extend_from_slice(cells);
                }
            }
        }
    }

    /// Total number of indexed obstacle cells
    pub fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::{Level, Obstacle, ObstacleKind, Position};
    use crate::sim::grid::CellType;
    use proptest::prelude::*;

    fn grid_with_obstacles(obstacles: &[(i32, i32)]) -> Grid {
        let level = Level {
            id: 1,
            width: 10,
            height: 20,
            start_position: Position::new(0, 0),
            goal_position: Position::new(9, 19),
            obstacles: obstacles
                .iter()
                .map(|&(x, y)| Obstacle {
                    x,
                    y,
                    kind: ObstacleKind::Rectangle,
                })
                .collect(),
            theme_color: 0,
        };
        let mut grid = Grid::new(1, 1);
        grid.stamp_level(&level).unwrap();
        grid
    }

    #[test]
    fn test_rebuild_indexes_obstacles_only() {
        let grid = grid_with_obstacles(&[(4, 5), (7, 12)]);
        let mut index = SpatialIndex::new(2);
        index.rebuild(&grid);
        // start and goal cells are not obstacles and stay out of the index
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn test_query_finds_nearby_obstacle() {
        let grid = grid_with_obstacles(&[(4, 5)]);
        let mut index = SpatialIndex::new(2);
        index.rebuild(&grid);

        let mut out = Vec::new();
        // ball one cell away from the obstacle (cell size 50)
        index.query_neighborhood(225.0, 240.0, 50.0, &mut out);
        assert!(out.contains(&(4, 5)));
    }

    #[test]
    fn test_query_skips_distant_obstacles() {
        let grid = grid_with_obstacles(&[(9, 18)]);
        let mut index = SpatialIndex::new(2);
        index.rebuild(&grid);

        let mut out = Vec::new();
        index.query_neighborhood(25.0, 25.0, 50.0, &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn test_query_crosses_bucket_boundaries() {
        // cell (2, 2) sits in the bucket diagonally adjacent to cell (1, 1)'s
        let grid = grid_with_obstacles(&[(2, 2)]);
        let mut index = SpatialIndex::new(2);
        index.rebuild(&grid);

        let mut out = Vec::new();
        index.query_neighborhood(99.0, 99.0, 50.0, &mut out);
        assert_eq!(out, vec![(2, 2)]);
    }

    #[test]
    fn test_query_at_map_corner() {
        // start occupies (0, 0); these two sit right next to it
        let grid = grid_with_obstacles(&[(1, 0), (0, 1)]);
        let mut index = SpatialIndex::new(2);
        index.rebuild(&grid);

        let mut out = Vec::new();
        index.query_neighborhood(0.0, 0.0, 50.0, &mut out);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_index_is_stale_until_rebuilt() {
        let grid = grid_with_obstacles(&[(4, 5)]);
        let mut index = SpatialIndex::new(2);
        index.rebuild(&grid);

        let mut edited = grid.clone();
        edited.set_cell(5, 4, CellType::Empty);
        edited.set_cell(12, 7, CellType::ObstacleRect);

        let mut out = Vec::new();
        index.query_neighborhood(375.0, 625.0, 50.0, &mut out);
        assert!(out.is_empty(), "stale index must not know the new obstacle");

        index.rebuild(&edited);
        index.query_neighborhood(375.0, 625.0, 50.0, &mut out);
        assert_eq!(out, vec![(7, 12)]);
    }

    fn obstacle_cells() -> impl Strategy<Value = Vec<(i32, i32)>> {
        prop::collection::vec((0..10i32, 0..20i32), 0..30)
    }

    proptest! {
        /// Every obstacle the collision pre-filter could accept is in the
        /// queried neighborhood: the index over-approximates, never under.
        #[test]
        fn prop_query_covers_the_prefilter_reach(
            obstacles in obstacle_cells(),
            x in 0.0f32..500.0,
            y in 0.0f32..1000.0,
        ) {
            let cell_size = 50.0;
            let radius = 10.0;
            let grid = grid_with_obstacles(&obstacles);
            let mut index = SpatialIndex::new(2);
            index.rebuild(&grid);

            let mut out = Vec::new();
            index.query_neighborhood(x, y, cell_size, &mut out);

            let reach = radius + cell_size * 1.5;
            for (row, col, kind) in grid.cells() {
                if !kind.is_obstacle() {
                    continue;
                }
                let cx = col as f32 * cell_size + cell_size / 2.0;
                let cy = row as f32 * cell_size + cell_size / 2.0;
                let dist_sq = (x - cx) * (x - cx) + (y - cy) * (y - cy);
                if dist_sq < reach * reach {
                    prop_assert!(
                        out.contains(&(col, row)),
                        "obstacle ({col}, {row}) within reach of ({x}, {y}) missing"
                    );
                }
            }
        }
    }
}
