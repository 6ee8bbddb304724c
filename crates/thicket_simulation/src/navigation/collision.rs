//! Collision world seam.
//!
//! Broad-phase collision belongs to the host physics engine. The core only needs two
//! capabilities from it, expressed by `CollisionWorld`:
//! - enumerate fixed obstacle bounds (obstacle sampling)
//! - cast a ray and report every collider it crosses (line of sight)
//!
//! `ColliderSet` is the headless implementation: a per-tick snapshot of all
//! `Collider` components answered by brute force.

use bevy::math::bounding::{Aabb2d, RayCast2d};
use bevy::prelude::*;

use crate::combat::Dead;
use crate::components::WorldPosition;

/// Collision classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
pub enum BodyKind {
    /// Immovable scenery (trees, rocks, walls). Blocks paths and sight.
    Fixed,
    /// Pushable / mobile actors. Blocks sight, never blocks paths.
    #[default]
    Active,
}

/// Axis-aligned collider centred on the entity's `WorldPosition`.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Collider {
    pub half_extents: Vec2,
    pub kind: BodyKind,
}

impl Collider {
    pub fn fixed(size: Vec2) -> Self {
        Self {
            half_extents: size / 2.0,
            kind: BodyKind::Fixed,
        }
    }

    pub fn active(size: Vec2) -> Self {
        Self {
            half_extents: size / 2.0,
            kind: BodyKind::Active,
        }
    }

    pub fn bounds_at(&self, center: Vec2) -> Aabb2d {
        Aabb2d::new(center, self.half_extents)
    }
}

/// One ray intersection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub entity: Entity,
    pub distance: f32,
    pub kind: BodyKind,
}

pub trait CollisionWorld {
    /// Bounds of every collider classified as `BodyKind::Fixed`.
    fn fixed_obstacles(&self) -> impl Iterator<Item = (Entity, Aabb2d)> + '_;

    /// All colliders crossed by the ray within `max_distance`, nearest first.
    fn raycast(&self, origin: Vec2, direction: Dir2, max_distance: f32) -> Vec<RayHit>;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColliderEntry {
    pub entity: Entity,
    pub bounds: Aabb2d,
    pub kind: BodyKind,
}

/// Headless snapshot of the collision world, refreshed at the start of every tick.
#[derive(Resource, Debug, Clone, Default)]
pub struct ColliderSet {
    entries: Vec<ColliderEntry>,
}

impl ColliderSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, entity: Entity, center: Vec2, collider: &Collider) {
        self.entries.push(ColliderEntry {
            entity,
            bounds: collider.bounds_at(center),
            kind: collider.kind,
        });
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[ColliderEntry] {
        &self.entries
    }
}

impl CollisionWorld for ColliderSet {
    fn fixed_obstacles(&self) -> impl Iterator<Item = (Entity, Aabb2d)> + '_ {
        self.entries
            .iter()
            .filter(|entry| entry.kind == BodyKind::Fixed)
            .map(|entry| (entry.entity, entry.bounds))
    }

    fn raycast(&self, origin: Vec2, direction: Dir2, max_distance: f32) -> Vec<RayHit> {
        let ray = RayCast2d::new(origin, direction, max_distance);

        let mut hits: Vec<RayHit> = self
            .entries
            .iter()
            .filter_map(|entry| {
                ray.aabb_intersection_at(&entry.bounds).map(|distance| RayHit {
                    entity: entry.entity,
                    distance,
                    kind: entry.kind,
                })
            })
            .collect();

        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }
}

pub fn contains_point(bounds: &Aabb2d, point: Vec2) -> bool {
    point.cmpge(bounds.min).all() && point.cmple(bounds.max).all()
}

/// System: rebuild the headless collider snapshot.
///
/// Dead actors drop out immediately so corpses never block paths or sight.
pub fn refresh_collider_set(
    mut set: ResMut<ColliderSet>,
    colliders: Query<(Entity, &WorldPosition, &Collider), Without<Dead>>,
) {
    set.clear();

    let mut entries: Vec<_> = colliders.iter().collect();
    entries.sort_by_key(|(entity, _, _)| entity.index());

    for (entity, position, collider) in entries {
        set.insert(entity, position.0, collider);
    }
}
