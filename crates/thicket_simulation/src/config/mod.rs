//! Simulation tuning.
//!
//! All gameplay constants live here with their default values. A host can load a
//! partial JSON document on top of the defaults (missing keys keep the default):
//!
//! ```json
//! { "enemy": { "detection_range": 250.0 }, "combat": { "critical_chance": 0.05 } }
//! ```

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ai::EnemyAiConfig;
use crate::combat::ElementTable;
use crate::pickups::PickupConfig;
use crate::rounds::RoundsConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse simulation config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Root tuning resource.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Fixed simulation rate (ticks per second)
    pub tick_hz: f64,
    pub pathfinding: PathfindingConfig,
    /// Template copied onto every spawned enemy
    pub enemy: EnemyAiConfig,
    pub combat: CombatConfig,
    pub elements: ElementTable,
    pub pickups: PickupConfig,
    /// Wave schedule; empty means no director-driven spawns
    pub rounds: RoundsConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_hz: 60.0,
            pathfinding: PathfindingConfig::default(),
            enemy: EnemyAiConfig::default(),
            combat: CombatConfig::default(),
            elements: ElementTable::default(),
            pickups: PickupConfig::default(),
            rounds: RoundsConfig::default(),
        }
    }
}

impl SimulationConfig {
    /// Parse a (possibly partial) JSON document and validate the result.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: SimulationConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.tick_hz > 0.0) {
            return Err(invalid("tick_hz", "must be positive"));
        }

        let nav = &self.pathfinding;
        if !(nav.tile_size > 0.0) {
            return Err(invalid("pathfinding.tile_size", "must be positive"));
        }
        if nav.waypoint_arrive_radius < 0.0 {
            return Err(invalid("pathfinding.waypoint_arrive_radius", "must not be negative"));
        }

        let enemy = &self.enemy;
        if enemy.chase_exit_factor < 1.0 {
            return Err(invalid(
                "enemy.chase_exit_factor",
                "must be >= 1.0 or the hysteresis band inverts",
            ));
        }
        if enemy.attack_exit_factor < 1.0 {
            return Err(invalid("enemy.attack_exit_factor", "must be >= 1.0"));
        }
        if enemy.attack_range >= enemy.detection_range {
            return Err(invalid(
                "enemy.attack_range",
                format!(
                    "{} must be below detection_range {}",
                    enemy.attack_range, enemy.detection_range
                ),
            ));
        }
        if enemy.wander_wait_min > enemy.wander_wait_max {
            return Err(invalid("enemy.wander_wait_min", "exceeds wander_wait_max"));
        }
        if enemy.wander_inner_radius > enemy.wander_radius {
            return Err(invalid("enemy.wander_inner_radius", "exceeds wander_radius"));
        }
        if !(enemy.attack_cooldown > 0.0) {
            return Err(invalid("enemy.attack_cooldown", "must be positive"));
        }

        let combat = &self.combat;
        if !(0.0..=1.0).contains(&combat.critical_chance) {
            return Err(invalid("combat.critical_chance", "must be within [0, 1]"));
        }
        if combat.critical_multiplier < 1 {
            return Err(invalid("combat.critical_multiplier", "must be at least 1"));
        }

        for (element, element_config) in self.elements.iter() {
            if !(element_config.tick_interval > 0.0) {
                return Err(invalid(
                    "elements.tick_interval",
                    format!("{:?} tick interval must be positive", element),
                ));
            }
            if let Some(factor) = element_config.slow_factor {
                if !(factor > 0.0 && factor <= 1.0) {
                    return Err(invalid(
                        "elements.slow_factor",
                        format!("{:?} slow factor {} outside (0, 1]", element, factor),
                    ));
                }
            }
        }

        let pickups = &self.pickups;
        if pickups.interact_radius < 0.0 || pickups.modifier_radius < 0.0 {
            return Err(invalid("pickups", "pickup radii must not be negative"));
        }

        let rounds = &self.rounds;
        if rounds.inter_round_delay < 0.0 {
            return Err(invalid("rounds.inter_round_delay", "must not be negative"));
        }
        if rounds.fallback_radius_min > rounds.fallback_radius_max {
            return Err(invalid("rounds.fallback_radius_min", "exceeds fallback_radius_max"));
        }
        for (index, round) in rounds.rounds.iter().enumerate() {
            for directive in &round.spawns {
                if directive.cadence < 0.0 || directive.start_delay < 0.0 {
                    return Err(invalid(
                        "rounds.spawns",
                        format!("round {} has a negative cadence or start delay", index + 1),
                    ));
                }
                if directive.area.is_some_and(|area| area.width < 0.0 || area.height < 0.0) {
                    return Err(invalid(
                        "rounds.spawns.area",
                        format!("round {} has a negative spawn area", index + 1),
                    ));
                }
            }
        }

        Ok(())
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathfindingConfig {
    /// World units per grid tile
    pub tile_size: f32,
    /// Tiles added around the start/end bounding box
    pub search_padding_tiles: i32,
    /// Obstacle bounds are grown by this many tiles (actor radius)
    pub obstacle_padding_tiles: f32,
    /// Distance at which a waypoint counts as reached
    pub waypoint_arrive_radius: f32,
}

impl Default for PathfindingConfig {
    fn default() -> Self {
        Self {
            tile_size: 16.0,
            search_padding_tiles: 10,
            obstacle_padding_tiles: 1.0,
            waypoint_arrive_radius: 8.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    pub critical_chance: f64,
    pub critical_multiplier: u32,
    /// Normal hits on one target within this window merge into one feed entry (seconds)
    pub damage_feed_grace: f32,
    /// Dead actors are despawned after this delay (seconds)
    pub corpse_timeout: f32,
    /// A new lightning chain is skipped if a live field sits within this radius
    pub lightning_overlap_radius: f32,
    pub lightning_field_ttl: f32,
    pub projectile_speed: f32,
    pub projectile_max_distance: f32,
    /// Projectiles spawn this far in front of the shooter
    pub projectile_spawn_offset: f32,
    /// Side length of the square area hit by an untargeted melee strike
    pub melee_box_size: f32,
    pub punch_damage: u32,
    /// Distance from the attacker to the punch box centre
    pub punch_reach: f32,
    pub punch_knockback: f32,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            critical_chance: 0.1,
            critical_multiplier: 2,
            damage_feed_grace: 0.3,
            corpse_timeout: 2.0,
            lightning_overlap_radius: 30.0,
            lightning_field_ttl: 0.5,
            projectile_speed: 600.0,
            projectile_max_distance: 1200.0,
            projectile_spawn_offset: 20.0,
            melee_box_size: 32.0,
            punch_damage: 10,
            punch_reach: 40.0,
            punch_knockback: 8.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::Element;

    #[test]
    fn test_default_config_is_valid() {
        let config = SimulationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.pathfinding.tile_size, 16.0);
        assert_eq!(config.combat.critical_chance, 0.1);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = SimulationConfig::from_json_str(
            r#"{ "enemy": { "detection_range": 250.0 }, "combat": { "critical_chance": 0.05 } }"#,
        )
        .unwrap();

        assert_eq!(config.enemy.detection_range, 250.0);
        assert_eq!(config.enemy.attack_range, 50.0);
        assert_eq!(config.combat.critical_chance, 0.05);
        assert_eq!(config.pathfinding.search_padding_tiles, 10);
        assert!(config.elements.get(Element::Fire).is_some());
    }

    #[test]
    fn test_missing_element_entry_is_allowed() {
        let config = SimulationConfig::from_json_str(r#"{ "elements": { "poison": null } }"#).unwrap();
        assert!(config.elements.get(Element::Poison).is_none());
        assert!(config.elements.get(Element::Ice).is_some());
    }

    #[test]
    fn test_rejects_inverted_hysteresis() {
        let err = SimulationConfig::from_json_str(r#"{ "enemy": { "chase_exit_factor": 0.9 } }"#)
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid { field: "enemy.chase_exit_factor", .. }
        ));
    }

    #[test]
    fn test_rejects_bad_critical_chance() {
        let mut config = SimulationConfig::default();
        config.combat.critical_chance = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rounds_from_json() {
        let config = SimulationConfig::from_json_str(
            r#"{ "rounds": { "inter_round_delay": 2.0, "rounds": [
                { "spawns": [ { "count": 3, "cadence": 0.5, "points": [[100.0, 0.0]] } ] },
                { "spawns": [ { "count": 5, "area": { "x": 0.0, "y": 0.0, "width": 64.0, "height": 64.0 } } ] }
            ] } }"#,
        )
        .unwrap();

        let rounds = &config.rounds;
        assert!(rounds.auto_advance);
        assert_eq!(rounds.inter_round_delay, 2.0);
        assert_eq!(rounds.rounds.len(), 2);
        assert_eq!(rounds.rounds[0].spawns[0].count, 3);
        assert_eq!(rounds.rounds[0].spawns[0].max_health, 80);
        assert_eq!(rounds.rounds[1].spawns[0].cadence, 0.0);
        assert_eq!(config.pickups.interact_radius, 25.0);
    }

    #[test]
    fn test_rejects_negative_cadence() {
        let err = SimulationConfig::from_json_str(r#"{ "rounds": { "rounds": [ { "spawns": [ { "cadence": -1.0 } ] } ] } }"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "rounds.spawns", .. }));
    }

    #[test]
    fn test_parse_error_reported() {
        let err = SimulationConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
