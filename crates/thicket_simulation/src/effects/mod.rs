//! Visual effect requests.
//!
//! The simulation never renders. It spawns `VisualEffect` entities that a host
//! renderer may pick up, each with a `TimeToLive` ticked in `FixedUpdate`.
//! Expired entities are despawned by the same loop.

use bevy::prelude::*;

use crate::combat::Element;
use crate::components::WorldPosition;
use crate::SimulationSet;

#[derive(Component, Debug, Clone, PartialEq, Reflect)]
#[reflect(Component)]
pub enum VisualEffect {
    /// Jagged bolt between two points (lightning chain)
    LightningArc { points: Vec<Vec2> },
    /// Melee impact flash
    StrikeFlash,
    /// Element hit splash on a target
    ElementBurst { element: Element },
    /// Enemy state marker ("!" when it starts chasing)
    AlertMarker { owner: Entity },
}

/// Remaining lifetime in seconds.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct TimeToLive {
    pub remaining: f32,
}

impl TimeToLive {
    pub fn new(seconds: f32) -> Self {
        Self { remaining: seconds }
    }

    pub fn is_expired(&self) -> bool {
        self.remaining <= 0.0
    }
}

/// Area left by a lightning chain. Suppresses overlapping chains while alive.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
#[require(WorldPosition)]
pub struct LightningField {
    pub radius: f32,
}

/// Spawn a visual request at `position`.
pub fn spawn_visual(commands: &mut Commands, effect: VisualEffect, position: Vec2, ttl: f32) -> Entity {
    commands
        .spawn((effect, WorldPosition(position), TimeToLive::new(ttl)))
        .id()
}

/// System: tick lifetimes and despawn expired entities.
pub fn tick_time_to_live(
    mut commands: Commands,
    time: Res<Time<Fixed>>,
    mut query: Query<(Entity, &mut TimeToLive)>,
) {
    let delta = time.delta_secs();

    for (entity, mut ttl) in query.iter_mut() {
        ttl.remaining -= delta;
        if ttl.is_expired() {
            commands.entity(entity).despawn();
        }
    }
}

pub struct EffectsPlugin;

impl Plugin for EffectsPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<TimeToLive>()
            .register_type::<LightningField>()
            .add_systems(FixedUpdate, tick_time_to_live.in_set(SimulationSet::Cleanup));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_time_to_live_despawns() {
        let mut app = App::new();
        app.init_resource::<Time<Fixed>>()
            .add_systems(Update, tick_time_to_live);

        let short = app.world_mut().spawn(TimeToLive::new(0.1)).id();
        let long = app.world_mut().spawn(TimeToLive::new(10.0)).id();

        app.world_mut()
            .resource_mut::<Time<Fixed>>()
            .advance_by(Duration::from_millis(200));
        app.update();

        assert!(app.world().get_entity(short).is_err());
        assert!(app.world().get_entity(long).is_ok());
        let remaining = app.world().get::<TimeToLive>(long).unwrap().remaining;
        assert!((remaining - 9.8).abs() < 1e-4);
    }
}
