//! World-space positioning components (top-down plane, +Y down like screen space).

use bevy::prelude::*;

/// Centre of the actor in world units.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct WorldPosition(pub Vec2);

/// Desired velocity (world units per second).
///
/// Written by AI or input, consumed by the physics step.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Velocity(pub Vec2);

/// Facing angle in radians (`atan2(dir.y, dir.x)`), read by rendering.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Facing(pub f32);

impl Facing {
    pub fn towards(from: Vec2, to: Vec2) -> Option<Self> {
        let dir = to - from;
        if dir.length_squared() <= f32::EPSILON {
            return None;
        }
        Some(Self(dir.y.atan2(dir.x)))
    }
}
