//! Spawn helpers for headless hosts (demo binary, integration tests, rounds).
//!
//! Each helper builds a complete entity; the Required Components on `Actor`
//! fill in health, position, velocity, facing, speed and status effects.

use bevy::prelude::*;

use rand::Rng;

use crate::ai::{EnemyAiConfig, EnemyBrain};
use crate::combat::{Element, ModifierLoadout, WeaponStats};
use crate::components::{Actor, AmmoReserves, Health, MovementSpeed, Player, WeaponKind, WorldPosition};
use crate::config::SimulationConfig;
use crate::navigation::Collider;
use crate::pickups::{AmmoPickup, ModifierPickup};
use crate::DeterministicRng;

pub const PLAYER_FACTION: u64 = 1;
pub const ENEMY_FACTION: u64 = 2;

/// Side of an actor's square collider
pub const ACTOR_SIZE: f32 = 16.0;

pub fn spawn_player(
    world: &mut World,
    position: Vec2,
    weapon: WeaponKind,
    modifiers: impl IntoIterator<Item = Element>,
) -> Entity {
    world
        .spawn((
            Actor {
                faction_id: PLAYER_FACTION,
            },
            Player,
            WorldPosition(position),
            Health::new(100),
            MovementSpeed::new(120.0),
            WeaponStats::for_kind(weapon),
            AmmoReserves::default(),
            ModifierLoadout::new(modifiers),
            Collider::active(Vec2::splat(ACTOR_SIZE)),
        ))
        .id()
}

/// Components of one enemy spawned at `position` (also used by the round director).
pub fn enemy_bundle(position: Vec2, max_health: u32, ai_config: EnemyAiConfig) -> impl Bundle {
    (
        Actor {
            faction_id: ENEMY_FACTION,
        },
        WorldPosition(position),
        Health::new(max_health),
        MovementSpeed::new(80.0),
        EnemyBrain::new(position),
        ai_config,
        Collider::active(Vec2::splat(ACTOR_SIZE)),
    )
}

/// Enemy with its own copy of the configured AI tuning.
pub fn spawn_enemy(world: &mut World, position: Vec2, max_health: u32) -> Entity {
    let ai_config = world
        .get_resource::<SimulationConfig>()
        .map(|config| config.enemy.clone())
        .unwrap_or_default();

    world.spawn(enemy_bundle(position, max_health, ai_config)).id()
}

/// Ammo crate; `amount` defaults to the configured crate size.
pub fn spawn_ammo_crate(world: &mut World, position: Vec2, kind: WeaponKind, amount: Option<u32>) -> Entity {
    let amount = amount.unwrap_or_else(|| {
        world
            .get_resource::<SimulationConfig>()
            .map(|config| config.pickups.ammo_amount)
            .unwrap_or_default()
    });

    world
        .spawn((AmmoPickup { kind, amount }, WorldPosition(position)))
        .id()
}

/// Modifier box; a random element when none is given.
pub fn spawn_modifier_box(world: &mut World, position: Vec2, element: Option<Element>) -> Entity {
    let element = element.unwrap_or_else(|| {
        let index = world
            .get_resource_mut::<DeterministicRng>()
            .map(|mut rng| rng.rng.gen_range(0..Element::COUNT))
            .unwrap_or(0);
        Element::ALL[index]
    });

    world
        .spawn((ModifierPickup { element }, WorldPosition(position)))
        .id()
}

/// Immovable obstacle (tree, rock).
pub fn spawn_tree(world: &mut World, position: Vec2, size: f32) -> Entity {
    world
        .spawn((WorldPosition(position), Collider::fixed(Vec2::splat(size))))
        .id()
}
