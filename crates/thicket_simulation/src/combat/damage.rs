//! Damage events, critical rolls and death handling.

use bevy::prelude::*;
use rand::Rng;

use crate::ai::{EnemyAiConfig, EnemyBrain};
use crate::combat::{Element, StatusEffects};
use crate::components::{MovementSpeed, Player, Velocity};
use crate::config::{CombatConfig, SimulationConfig};

/// Event: damage applied to a Health ledger.
///
/// Emitted for projectile hits, melee strikes and status ticks (UI, audio).
#[derive(Event, Debug, Clone, PartialEq)]
pub struct DamageDealt {
    /// None for status-effect ticks
    pub attacker: Option<Entity>,
    pub target: Entity,
    pub damage: u32,
    pub critical: bool,
    /// Status tick source
    pub element: Option<Element>,
    pub target_died: bool,
}

/// Event: entity died. Written once, by whoever landed the killing damage.
#[derive(Event, Debug, Clone, PartialEq)]
pub struct EntityDied {
    pub entity: Entity,
    pub killer: Option<Entity>,
}

/// Marker: health reached 0.
///
/// Dead entities drop out of collision, targeting and status ticking.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Dead;

/// Despawn once `Time<Fixed>` elapsed reaches `despawn_time`.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct DespawnAfter {
    /// Seconds since simulation start
    pub despawn_time: f32,
}

/// Rolled damage for one hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DamageRoll {
    pub amount: u32,
    pub critical: bool,
}

/// Critical roll: with `critical_chance` the base damage is multiplied.
pub fn roll_damage(base: u32, config: &CombatConfig, rng: &mut impl Rng) -> DamageRoll {
    let critical = config.critical_chance > 0.0 && rng.gen_bool(config.critical_chance.min(1.0));
    let amount = if critical {
        base.saturating_mul(config.critical_multiplier)
    } else {
        base
    };

    DamageRoll { amount, critical }
}

/// System: death handling.
///
/// Clears status effects (restoring speed), stops movement, removes the enemy
/// brain and marks the entity `Dead`. Non-player corpses are despawned after
/// `corpse_timeout`.
pub fn handle_deaths(
    mut commands: Commands,
    mut death_events: EventReader<EntityDied>,
    time: Res<Time<Fixed>>,
    config: Res<SimulationConfig>,
    mut actors: Query<(
        Option<&mut StatusEffects>,
        Option<&mut MovementSpeed>,
        Option<&mut Velocity>,
        Has<Player>,
    )>,
) {
    for event in death_events.read() {
        let Ok((effects, speed, velocity, is_player)) = actors.get_mut(event.entity) else {
            continue;
        };

        if let (Some(mut effects), Some(mut speed)) = (effects, speed) {
            effects.clear_all(&mut speed);
        }
        if let Some(mut velocity) = velocity {
            velocity.0 = Vec2::ZERO;
        }

        let Ok(mut entity_commands) = commands.get_entity(event.entity) else {
            continue;
        };
        entity_commands
            .remove::<(EnemyBrain, EnemyAiConfig)>()
            .insert(Dead);

        if !is_player {
            entity_commands.insert(DespawnAfter {
                despawn_time: time.elapsed_secs() + config.combat.corpse_timeout,
            });
        }

        crate::log_info(&format!(
            "💀 {:?} died (killer: {:?})",
            event.entity, event.killer
        ));
    }
}

/// System: despawn corpses whose timeout elapsed.
pub fn despawn_after_timeout(
    mut commands: Commands,
    time: Res<Time<Fixed>>,
    query: Query<(Entity, &DespawnAfter)>,
) {
    let now = time.elapsed_secs();

    for (entity, despawn_after) in query.iter() {
        if now >= despawn_after.despawn_time {
            commands.entity(entity).despawn();
            crate::log(&format!("🗑️ Despawned {:?}", entity));
        }
    }
}
