//! AI events for hosts (animation, alert markers, debug overlays).

use bevy::prelude::*;

use crate::ai::EnemyStateKind;

/// Enemy switched FSM state this tick.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct EnemyStateChanged {
    pub entity: Entity,
    pub from: EnemyStateKind,
    pub to: EnemyStateKind,
}
