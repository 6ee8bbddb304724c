//! Obstacle sampler: builds a per-request occupancy grid from fixed colliders.

use bevy::math::bounding::Aabb2d;
use bevy::prelude::*;

use super::collision::{contains_point, CollisionWorld};
use super::grid::GridCoord;

/// Inclusive rectangle of tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridRegion {
    pub min: GridCoord,
    pub max: GridCoord,
}

impl GridRegion {
    /// Bounding box of two tiles grown by `padding` tiles on every side.
    pub fn around(a: GridCoord, b: GridCoord, padding: i32) -> Self {
        let padding = padding.max(0);
        Self {
            min: GridCoord::new(a.x.min(b.x) - padding, a.y.min(b.y) - padding),
            max: GridCoord::new(a.x.max(b.x) + padding, a.y.max(b.y) + padding),
        }
    }

    pub fn width(&self) -> usize {
        (self.max.x - self.min.x + 1).max(1) as usize
    }

    pub fn height(&self) -> usize {
        (self.max.y - self.min.y + 1).max(1) as usize
    }
}

/// Blocked/free flags over a `GridRegion`, row-major from `origin`.
#[derive(Debug, Clone, PartialEq)]
pub struct OccupancyGrid {
    origin: GridCoord,
    width: usize,
    height: usize,
    blocked: Vec<bool>,
}

impl OccupancyGrid {
    /// All tiles free.
    pub fn open(region: GridRegion) -> Self {
        let width = region.width();
        let height = region.height();
        Self {
            origin: region.min,
            width,
            height,
            blocked: vec![false; width * height],
        }
    }

    /// A tile is blocked when a fixed collider's bounds, grown by
    /// `padding_tiles * tile_size`, contain the tile centre. `exclude` is the
    /// requester's own collider.
    pub fn sample(
        world: &impl CollisionWorld,
        region: GridRegion,
        tile_size: f32,
        padding_tiles: f32,
        exclude: Option<Entity>,
    ) -> Self {
        let mut grid = Self::open(region);
        let padding = Vec2::splat(padding_tiles * tile_size);

        for (entity, bounds) in world.fixed_obstacles() {
            if Some(entity) == exclude {
                continue;
            }

            let expanded = Aabb2d {
                min: bounds.min - padding,
                max: bounds.max + padding,
            };
            grid.mark_covered(&expanded, tile_size);
        }

        grid
    }

    fn mark_covered(&mut self, bounds: &Aabb2d, tile_size: f32) {
        // Candidate tiles first (one tile of slack), exact centre test after
        let lo = GridCoord::from_world(bounds.min, tile_size).offset(-1, -1);
        let hi = GridCoord::from_world(bounds.max, tile_size).offset(1, 1);

        let x0 = lo.x.max(self.origin.x);
        let y0 = lo.y.max(self.origin.y);
        let x1 = hi.x.min(self.origin.x + self.width as i32 - 1);
        let y1 = hi.y.min(self.origin.y + self.height as i32 - 1);

        for y in y0..=y1 {
            for x in x0..=x1 {
                let coord = GridCoord::new(x, y);
                if contains_point(bounds, coord.to_world_center(tile_size)) {
                    self.set_blocked(coord, true);
                }
            }
        }
    }

    pub fn origin(&self) -> GridCoord {
        self.origin
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn len(&self) -> usize {
        self.blocked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocked.is_empty()
    }

    pub fn index_of(&self, coord: GridCoord) -> Option<usize> {
        let local_x = coord.x - self.origin.x;
        let local_y = coord.y - self.origin.y;
        if local_x < 0 || local_y < 0 {
            return None;
        }
        let (local_x, local_y) = (local_x as usize, local_y as usize);
        if local_x >= self.width || local_y >= self.height {
            return None;
        }
        Some(local_y * self.width + local_x)
    }

    pub fn coord_of(&self, index: usize) -> GridCoord {
        let local_x = (index % self.width) as i32;
        let local_y = (index / self.width) as i32;
        self.origin.offset(local_x, local_y)
    }

    /// Out-of-bounds tiles count as blocked.
    pub fn is_blocked(&self, coord: GridCoord) -> bool {
        self.index_of(coord).map_or(true, |index| self.blocked[index])
    }

    pub fn set_blocked(&mut self, coord: GridCoord, blocked: bool) {
        if let Some(index) = self.index_of(coord) {
            self.blocked[index] = blocked;
        }
    }

    pub fn blocked_count(&self) -> usize {
        self.blocked.iter().filter(|b| **b).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::{Collider, ColliderSet};

    #[test]
    fn test_region_around_pads_bounding_box() {
        let region = GridRegion::around(GridCoord::new(5, -2), GridCoord::new(1, 3), 10);
        assert_eq!(region.min, GridCoord::new(-9, -12));
        assert_eq!(region.max, GridCoord::new(15, 13));
        assert_eq!(region.width(), 25);
        assert_eq!(region.height(), 26);
    }

    #[test]
    fn test_single_tile_region() {
        let tile = GridCoord::new(3, 3);
        let grid = OccupancyGrid::open(GridRegion::around(tile, tile, 0));
        assert_eq!((grid.width(), grid.height()), (1, 1));
        assert_eq!(grid.index_of(tile), Some(0));
        assert!(!grid.is_blocked(tile));
        assert!(grid.is_blocked(GridCoord::new(4, 3)));
    }

    #[test]
    fn test_fixed_collider_blocks_with_padding() {
        let mut set = ColliderSet::new();
        // 16x16 rock on tile (0, 0); padding of one tile covers the 3x3 neighbourhood
        set.insert(Entity::from_raw(1), Vec2::new(8.0, 8.0), &Collider::fixed(Vec2::splat(16.0)));

        let region = GridRegion::around(GridCoord::new(-3, -3), GridCoord::new(3, 3), 0);
        let grid = OccupancyGrid::sample(&set, region, 16.0, 1.0, None);

        for y in -1..=1 {
            for x in -1..=1 {
                assert!(grid.is_blocked(GridCoord::new(x, y)), "tile ({x}, {y}) should be blocked");
            }
        }
        assert!(!grid.is_blocked(GridCoord::new(2, 0)));
        assert!(!grid.is_blocked(GridCoord::new(0, -2)));
        assert_eq!(grid.blocked_count(), 9);
    }

    #[test]
    fn test_active_and_excluded_colliders_never_block() {
        let mut set = ColliderSet::new();
        let me = Entity::from_raw(7);
        set.insert(me, Vec2::new(8.0, 8.0), &Collider::fixed(Vec2::splat(16.0)));
        set.insert(Entity::from_raw(8), Vec2::new(40.0, 8.0), &Collider::active(Vec2::splat(16.0)));

        let region = GridRegion::around(GridCoord::new(0, 0), GridCoord::new(4, 0), 2);
        let grid = OccupancyGrid::sample(&set, region, 16.0, 1.0, Some(me));
        assert_eq!(grid.blocked_count(), 0);
    }

    #[test]
    fn test_index_coord_round_trip() {
        let grid = OccupancyGrid::open(GridRegion::around(GridCoord::new(-2, -2), GridCoord::new(2, 1), 0));
        for index in 0..grid.len() {
            assert_eq!(grid.index_of(grid.coord_of(index)), Some(index));
        }
    }
}
