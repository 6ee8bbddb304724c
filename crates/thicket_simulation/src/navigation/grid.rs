//! World ↔ grid coordinate mapping at a fixed tile size.

use bevy::prelude::*;

/// Integer tile address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect)]
pub struct GridCoord {
    pub x: i32,
    pub y: i32,
}

impl GridCoord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Floor division by tile size (negative positions map to negative tiles).
    pub fn from_world(position: Vec2, tile_size: f32) -> Self {
        Self {
            x: (position.x / tile_size).floor() as i32,
            y: (position.y / tile_size).floor() as i32,
        }
    }

    /// World-space centre of this tile.
    pub fn to_world_center(self, tile_size: f32) -> Vec2 {
        Vec2::new(
            self.x as f32 * tile_size + tile_size / 2.0,
            self.y as f32 * tile_size + tile_size / 2.0,
        )
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

pub fn world_to_grid(position: Vec2, tile_size: f32) -> GridCoord {
    GridCoord::from_world(position, tile_size)
}

pub fn grid_to_world(coord: GridCoord, tile_size: f32) -> Vec2 {
    coord.to_world_center(tile_size)
}
