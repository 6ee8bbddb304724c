//! Thicket Simulation Core
//!
//! Headless ECS simulation on Bevy 0.16 for a top-down arena:
//! - navigation: obstacle sampling, A* on a tile grid, line of sight
//! - ai: Idle / Chase / Attack enemy FSM
//! - combat: projectiles, critical hits, elemental status effects, melee
//! - pickups: ammo crates and modifier boxes
//! - rounds: enemy waves with spawn cadence and auto-advance
//!
//! Rendering, input and real physics belong to the host engine. Everything here
//! runs in `FixedUpdate` in the order given by `SimulationSet`.

use bevy::ecs::event::event_update_system;
use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

pub mod ai;
pub mod arena;
pub mod combat;
pub mod components;
pub mod config;
pub mod effects;
pub mod logger;
pub mod navigation;
pub mod physics;
pub mod pickups;
pub mod rounds;

pub use ai::{AIPlugin, EnemyAiConfig, EnemyBrain, EnemyState, EnemyStateChanged, EnemyStateKind, NavPath};
pub use combat::{
    CombatPlugin, DamageDealt, DamageFeed, Dead, Element, ElementTable, EntityDied, MeleeStrike, ModifierLoadout,
    Projectile, ProjectileHit, ReloadIntent, StatusEffects, WeaponFireIntent, WeaponStats,
};
pub use components::*;
pub use config::{CombatConfig, ConfigError, PathfindingConfig, SimulationConfig};
pub use effects::{EffectsPlugin, LightningField, TimeToLive, VisualEffect};
pub use logger::{
    init_logger, log, log_error, log_info, log_warning, log_with_level, set_log_level, set_logger,
    set_logger_if_needed, LogLevel, LogPrinter,
};
pub use navigation::{BodyKind, Collider, ColliderSet, CollisionWorld, NavigationPlugin, NavigationQuery, Navigator};
pub use physics::PhysicsPlugin;
pub use pickups::{AmmoPickup, InteractIntent, ModifierPickup, PickupCollected, PickupConfig, PickupItem, PickupsPlugin};
pub use rounds::{RoundDirector, RoundEvent, RoundPhase, RoundsConfig, RoundsPlugin, SpawnDirective};

/// FixedUpdate phases, chained in declaration order.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    /// Collider snapshot for this tick
    Colliders,
    /// Enemy FSMs write velocities and strike requests
    Ai,
    /// Velocity integration
    Physics,
    /// Ammo crates and modifier boxes
    Pickups,
    /// Weapons, projectiles, hit resolution, melee
    Combat,
    /// Periodic status damage and expiry
    StatusEffects,
    /// Deaths, despawns, visual lifetimes, damage feed
    Cleanup,
    /// Wave schedule and enemy spawns
    Rounds,
}

/// Main simulation plugin (aggregates every subsystem)
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        if !app.world().contains_resource::<SimulationConfig>() {
            app.insert_resource(SimulationConfig::default());
        }
        if !app.world().contains_resource::<DeterministicRng>() {
            app.insert_resource(DeterministicRng::new(42));
        }

        let tick_hz = app.world().resource::<SimulationConfig>().tick_hz;

        app.insert_resource(Time::<Fixed>::from_hz(tick_hz))
            .configure_sets(
                FixedUpdate,
                (
                    SimulationSet::Colliders,
                    SimulationSet::Ai,
                    SimulationSet::Physics,
                    SimulationSet::Pickups,
                    SimulationSet::Combat,
                    SimulationSet::StatusEffects,
                    SimulationSet::Cleanup,
                    SimulationSet::Rounds,
                )
                    .chain(),
            )
            .add_plugins((
                NavigationPlugin,
                AIPlugin,
                PhysicsPlugin,
                PickupsPlugin,
                CombatPlugin,
                EffectsPlugin,
                RoundsPlugin,
            ));
    }
}

/// Deterministic RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Minimal headless app with the full simulation and default tuning.
pub fn create_headless_app(seed: u64) -> App {
    create_headless_app_with_config(seed, SimulationConfig::default())
}

pub fn create_headless_app_with_config(seed: u64, config: SimulationConfig) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(config)
        .insert_resource(DeterministicRng::new(seed))
        .add_plugins(SimulationPlugin);

    app
}

/// Advance `Time<Fixed>` by exactly one timestep and run `FixedUpdate` once.
///
/// Wall-clock time never leaks in, so the same seed and inputs replay identically.
/// Event buffers are rotated first, the way `First` does in a full frame: an event
/// stays readable for the tick it was sent in and the next one, then it is dropped.
pub fn run_fixed_tick(app: &mut App) {
    let world = app.world_mut();
    if let Err(error) = world.run_system_cached(event_update_system) {
        log_error(&format!("event update failed: {}", error));
    }

    let timestep = world.resource::<Time<Fixed>>().timestep();
    world.resource_mut::<Time<Fixed>>().advance_by(timestep);
    world.run_schedule(FixedUpdate);
}

/// Run `ticks` fixed ticks.
pub fn run_fixed_ticks(app: &mut App, ticks: usize) {
    for _ in 0..ticks {
        run_fixed_tick(app);
    }
}

/// World snapshot for determinism comparisons
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Sorted by entity id: query order is not guaranteed
    entities.sort_by_key(|(entity, _)| entity.index());

    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
