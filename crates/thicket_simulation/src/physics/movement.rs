//! Velocity integration with axis-separated sliding against fixed obstacles.
//!
//! Determinism: fixed timestep, obstacles read from the `ColliderSet` snapshot
//! taken at the start of the tick.

use bevy::math::bounding::Aabb2d;
use bevy::prelude::*;

use crate::combat::Dead;
use crate::components::{Velocity, WorldPosition};
use crate::navigation::{Collider, ColliderSet, CollisionWorld};

/// Resolve one movement step for a body with `collider`.
///
/// Tries the full step, then each axis alone (sliding along walls). A candidate is
/// blocked when it overlaps a fixed obstacle at least as much as the current
/// position does, so a body already inside an obstacle can still back out.
/// Returns the original position when every option is blocked.
pub fn resolve_step(
    world: &impl CollisionWorld,
    entity: Entity,
    collider: &Collider,
    position: Vec2,
    step: Vec2,
) -> Vec2 {
    let current = collider.bounds_at(position);
    let candidates = [
        position + step,
        position + Vec2::new(step.x, 0.0),
        position + Vec2::new(0.0, step.y),
    ];

    for candidate in candidates {
        let bounds = collider.bounds_at(candidate);
        let blocked = world
            .fixed_obstacles()
            .any(|(other, obstacle)| {
                if other == entity {
                    return false;
                }
                let after = overlap_area(&bounds, &obstacle);
                after > 0.0 && after >= overlap_area(&current, &obstacle)
            });
        if !blocked {
            return candidate;
        }
    }

    position
}

/// Area shared by two boxes. Touching edges share none.
fn overlap_area(a: &Aabb2d, b: &Aabb2d) -> f32 {
    let extent = (a.max.min(b.max) - a.min.max(b.min)).max(Vec2::ZERO);
    extent.x * extent.y
}

/// System: `WorldPosition += Velocity * dt`.
///
/// Bodies without a `Collider` move freely; dead actors stay where they fell.
pub fn integrate_velocity(
    time: Res<Time<Fixed>>,
    colliders: Res<ColliderSet>,
    mut bodies: Query<(Entity, &mut WorldPosition, &Velocity, Option<&Collider>), Without<Dead>>,
) {
    let delta = time.delta_secs();

    for (entity, mut position, velocity, collider) in bodies.iter_mut() {
        if velocity.0 == Vec2::ZERO {
            continue;
        }

        let step = velocity.0 * delta;
        position.0 = match collider {
            Some(collider) => resolve_step(&*colliders, entity, collider, position.0, step),
            None => position.0 + step,
        };
    }
}
