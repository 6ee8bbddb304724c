//! Enemy AI: three-state FSM (Idle / Chase / Attack).
//!
//! - Idle: wander around spawn, detect the player below `detection_range`
//! - Chase: direct pursuit with line of sight, A* path otherwise
//! - Attack: hold position, melee strike on cooldown
//!
//! Exit thresholds are wider than entry thresholds (hysteresis) so an enemy on
//! the boundary does not flip every tick.

use bevy::prelude::*;

use crate::SimulationSet;

pub mod components;
pub mod events;
pub mod systems;

pub use components::{
    EnemyAiConfig, EnemyBrain, EnemyState, EnemyStateKind, NavPath, StateChange, WanderTarget,
};
pub use events::EnemyStateChanged;
pub use systems::{enemy_brain_update, next_state, think, BrainInput, BrainOutput, Sensed};

/// AI Plugin
///
/// Runs `enemy_brain_update` in `SimulationSet::Ai`: after the collider snapshot,
/// before physics integrates the velocities it writes.
pub struct AIPlugin;

impl Plugin for AIPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<EnemyStateChanged>()
            .register_type::<EnemyBrain>()
            .register_type::<EnemyAiConfig>()
            .add_systems(FixedUpdate, enemy_brain_update.in_set(SimulationSet::Ai));
    }
}
