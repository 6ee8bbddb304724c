//! Base actor components: Actor, Health, MovementSpeed

use bevy::prelude::*;

use crate::combat::StatusEffects;
use crate::components::{Facing, Velocity, WorldPosition};

/// Living actor (player or enemy).
///
/// Pulls in Health, position, velocity, facing, speed and the status-effect
/// ledger through Required Components.
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
#[require(Health, WorldPosition, Velocity, Facing, MovementSpeed, StatusEffects)]
pub struct Actor {
    /// Actors never damage their own faction
    pub faction_id: u64,
}

/// Health ledger.
///
/// Invariant: 0 ≤ current ≤ max, and `dead` flips to true exactly once, on the
/// damage call that first brings `current` to 0. A dead ledger ignores further
/// damage and healing until `reset`.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Health {
    current: u32,
    max: u32,
    dead: bool,
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100)
    }
}

impl Health {
    pub fn new(max: u32) -> Self {
        let max = max.max(1);
        Self {
            current: max,
            max,
            dead: false,
        }
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    pub fn is_alive(&self) -> bool {
        !self.dead
    }

    /// Remaining health in [0, 1] (health bar)
    pub fn fraction(&self) -> f32 {
        self.current as f32 / self.max as f32
    }

    /// Apply damage. Returns `true` only on the call that kills.
    pub fn take_damage(&mut self, amount: u32) -> bool {
        if self.dead {
            return false;
        }

        self.current = self.current.saturating_sub(amount);
        if self.current == 0 {
            self.dead = true;
            return true;
        }

        false
    }

    pub fn heal(&mut self, amount: u32) {
        if self.dead {
            return;
        }
        self.current = self.current.saturating_add(amount).min(self.max);
    }

    /// Back to full health and alive (respawn)
    pub fn reset(&mut self) {
        self.current = self.max;
        self.dead = false;
    }
}

/// Movement speed (world units per second).
///
/// Slows write `speed` directly; the status-effect ledger keeps the value to
/// restore.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct MovementSpeed {
    pub speed: f32,
}

impl Default for MovementSpeed {
    fn default() -> Self {
        Self { speed: 100.0 }
    }
}

impl MovementSpeed {
    pub fn new(speed: f32) -> Self {
        Self { speed }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_damage_clamps_at_zero() {
        let mut health = Health::new(100);
        assert!(!health.take_damage(30));
        assert_eq!(health.current(), 70);
        assert!(health.is_alive());

        assert!(health.take_damage(500));
        assert_eq!(health.current(), 0);
        assert!(health.is_dead());
    }

    #[test]
    fn test_death_reported_exactly_once() {
        let mut health = Health::new(20);
        assert!(!health.take_damage(10));
        assert!(health.take_damage(10));

        // Dead target: further damage is a no-op
        assert!(!health.take_damage(10));
        assert!(!health.take_damage(0));
        assert_eq!(health.current(), 0);
        assert!(health.is_dead());
    }

    #[test]
    fn test_zero_damage_on_living_target() {
        let mut health = Health::new(10);
        assert!(!health.take_damage(0));
        assert_eq!(health.current(), 10);
    }

    #[test]
    fn test_health_heal() {
        let mut health = Health::new(100);
        health.take_damage(50);
        health.heal(30);
        assert_eq!(health.current(), 80);

        health.heal(u32::MAX);
        assert_eq!(health.current(), 100);
    }

    #[test]
    fn test_dead_cannot_heal_until_reset() {
        let mut health = Health::new(10);
        health.take_damage(10);
        health.heal(5);
        assert_eq!(health.current(), 0);

        health.reset();
        assert!(health.is_alive());
        assert_eq!(health.current(), 10);
        assert_eq!(health.fraction(), 1.0);
    }

    #[test]
    fn test_zero_max_health_is_clamped() {
        let mut health = Health::new(0);
        assert_eq!(health.max(), 1);
        assert!(health.take_damage(1));
    }
}
