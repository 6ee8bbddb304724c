//! Navigation: grid mapping, obstacle sampling, A* and line of sight.
//!
//! The collision world is external. Everything here reads it through the
//! `CollisionWorld` trait; the headless `ColliderSet` snapshot is refreshed at
//! the start of every fixed tick.

use bevy::prelude::*;

use crate::config::PathfindingConfig;
use crate::SimulationSet;

pub mod collision;
pub mod grid;
pub mod los;
pub mod occupancy;
pub mod pathfinding;

pub use collision::{
    refresh_collider_set, BodyKind, Collider, ColliderEntry, ColliderSet, CollisionWorld, RayHit,
};
pub use grid::{grid_to_world, world_to_grid, GridCoord};
pub use los::has_line_of_sight;
pub use occupancy::{GridRegion, OccupancyGrid};
pub use pathfinding::find_path;

/// What the enemy brain needs from navigation.
pub trait NavigationQuery {
    /// Empty when no route exists.
    fn find_path(&self, start: Vec2, end: Vec2, exclude: Option<Entity>) -> Vec<Vec2>;

    fn has_line_of_sight(&self, from: Vec2, to: Vec2, ignore: &[Entity]) -> bool;
}

/// `NavigationQuery` over a collision world and pathfinding tuning.
pub struct Navigator<'a, W: CollisionWorld> {
    world: &'a W,
    config: &'a PathfindingConfig,
}

impl<'a, W: CollisionWorld> Navigator<'a, W> {
    pub fn new(world: &'a W, config: &'a PathfindingConfig) -> Self {
        Self { world, config }
    }
}

impl<W: CollisionWorld> NavigationQuery for Navigator<'_, W> {
    fn find_path(&self, start: Vec2, end: Vec2, exclude: Option<Entity>) -> Vec<Vec2> {
        pathfinding::find_path(self.world, start, end, self.config, exclude)
    }

    fn has_line_of_sight(&self, from: Vec2, to: Vec2, ignore: &[Entity]) -> bool {
        los::has_line_of_sight(self.world, from, to, ignore)
    }
}

pub struct NavigationPlugin;

impl Plugin for NavigationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ColliderSet>()
            .register_type::<Collider>()
            .add_systems(
                FixedUpdate,
                refresh_collider_set.in_set(SimulationSet::Colliders),
            );
    }
}
