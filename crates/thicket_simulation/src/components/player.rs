//! Player control marker component.

use bevy::prelude::Component;

/// Marker for the player-controlled actor.
///
/// Enemy brains look the player up with `With<Player>`; there is usually exactly one.
/// Its input side (aiming, punching) enters the simulation through the same intent
/// events AI uses, so damage always resolves through the health ledger.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Player;
