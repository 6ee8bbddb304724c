//! Combat resolution module
//!
//! Projectile impacts → critical roll → Health ledger → elemental status effects
//! (stacking / refresh / chain / slow) → periodic tick damage.
//!
//! Collision is external: `ProjectileHit` events come from the collision world
//! (headless: `advance_projectiles` sweeping `ColliderSet`). Melee strikes
//! (enemy attacks, player punches) resolve through the same Health contract.

use bevy::prelude::*;

use crate::SimulationSet;

pub mod damage;
pub mod damage_feed;
pub mod elements;
pub mod lightning;
pub mod melee;
pub mod projectile;
pub mod status;
pub mod weapon;

#[cfg(test)]
mod weapon_tests;

pub use damage::{
    despawn_after_timeout, handle_deaths, roll_damage, DamageDealt, DamageRoll, Dead, DespawnAfter,
    EntityDied,
};
pub use damage_feed::{update_damage_feed, DamageFeed, FeedEntry, FeedKind};
pub use elements::{ChainConfig, DamageBuildup, Element, ElementConfig, ElementTable};
pub use melee::{resolve_melee_strikes, MeleeStrike, StrikeArea};
pub use projectile::{
    advance_projectiles, resolve_projectile_hit, resolve_projectile_hits, spawn_projectile,
    DamageOutcome, HitContext, HitTarget, Payload, Projectile, ProjectileHit, ProjectileSpawn,
};
pub use status::{tick_status_effects, EffectTick, StatusEffect, StatusEffects};
pub use weapon::{
    fire_weapons, reload_weapons, ModifierLoadout, ReloadIntent, WeaponFireIntent, WeaponStats,
};

/// Combat Plugin
///
/// FixedUpdate order (inside the simulation sets):
/// 1. fire_weapons, reload_weapons: intents → projectiles / magazines
/// 2. advance_projectiles: flight + impact detection
/// 3. resolve_projectile_hits, resolve_melee_strikes: damage + modifiers
/// 4. tick_status_effects: periodic damage, expiry
/// 5. handle_deaths, despawn_after_timeout, update_damage_feed
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<DamageDealt>()
            .add_event::<EntityDied>()
            .add_event::<ProjectileHit>()
            .add_event::<WeaponFireIntent>()
            .add_event::<ReloadIntent>()
            .add_event::<MeleeStrike>()
            .init_resource::<DamageFeed>()
            .register_type::<StatusEffects>()
            .register_type::<Projectile>()
            .register_type::<WeaponStats>();

        app.add_systems(
            FixedUpdate,
            (
                (
                    fire_weapons,
                    reload_weapons,
                    advance_projectiles,
                    resolve_projectile_hits,
                    resolve_melee_strikes,
                )
                    .chain()
                    .in_set(SimulationSet::Combat),
                tick_status_effects.in_set(SimulationSet::StatusEffects),
                (handle_deaths, despawn_after_timeout, update_damage_feed)
                    .chain()
                    .in_set(SimulationSet::Cleanup),
            ),
        );
    }
}
