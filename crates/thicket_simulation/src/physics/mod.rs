//! Physics step (headless).
//!
//! The host engine owns real physics. Headless runs integrate velocities here
//! and stop actors at fixed obstacles so demos and tests stay meaningful.

use bevy::prelude::*;

use crate::SimulationSet;

pub mod movement;

pub use movement::{integrate_velocity, resolve_step};

/// Physics Plugin
///
/// `integrate_velocity` runs in `SimulationSet::Physics`, after AI wrote velocities.
pub struct PhysicsPlugin;

impl Plugin for PhysicsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(FixedUpdate, integrate_velocity.in_set(SimulationSet::Physics));
    }
}
