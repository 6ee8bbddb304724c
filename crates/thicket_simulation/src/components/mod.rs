//! ECS components shared across domains
//!
//! Organised by concern:
//! - actor: faction, health ledger, movement speed
//! - world: world-space position, velocity, facing
//! - player: player control marker
//! - ammo: per-weapon-kind ammo reserves

pub mod actor;
pub mod ammo;
pub mod player;
pub mod world;

pub use actor::*;
pub use ammo::*;
pub use player::*;
pub use world::*;
