//! Enemy FSM components (state, path, wander target, tuning).

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Point an idle enemy is walking to.
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct WanderTarget {
    pub position: Vec2,
    /// Leg back towards spawn after drifting outside the wander ring; walked at
    /// full speed
    pub returning: bool,
}

/// Enemy FSM states.
#[derive(Debug, Clone, PartialEq, Reflect)]
pub enum EnemyState {
    /// Initial state: wander around spawn until the player is detected
    Idle {
        wander: Option<WanderTarget>,
        /// Pause before picking the next wander target (seconds)
        wait_timer: f32,
    },

    /// Pursue the player: direct when in sight, along a path otherwise
    Chase {
        /// Seconds until the path may be re-planned
        repath_timer: f32,
    },

    /// Hold position and strike on cooldown
    Attack {
        /// Seconds accumulated towards the next strike
        cooldown_timer: f32,
    },
}

impl Default for EnemyState {
    fn default() -> Self {
        Self::idle()
    }
}

impl EnemyState {
    pub fn idle() -> Self {
        Self::Idle {
            wander: None,
            wait_timer: 0.0,
        }
    }

    /// First tick in Chase may plan immediately
    pub fn chase() -> Self {
        Self::Chase { repath_timer: 0.0 }
    }

    pub fn attack() -> Self {
        Self::Attack { cooldown_timer: 0.0 }
    }

    pub fn kind(&self) -> EnemyStateKind {
        match self {
            EnemyState::Idle { .. } => EnemyStateKind::Idle,
            EnemyState::Chase { .. } => EnemyStateKind::Chase,
            EnemyState::Attack { .. } => EnemyStateKind::Attack,
        }
    }
}

/// Data-free state tag (events, visuals).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum EnemyStateKind {
    Idle,
    Chase,
    Attack,
}

/// World-space waypoints plus cursor. Owned by one enemy.
#[derive(Debug, Clone, Default, PartialEq, Reflect)]
pub struct NavPath {
    waypoints: Vec<Vec2>,
    cursor: usize,
}

impl NavPath {
    pub fn new(waypoints: Vec<Vec2>) -> Self {
        Self { waypoints, cursor: 0 }
    }

    pub fn set(&mut self, waypoints: Vec<Vec2>) {
        self.waypoints = waypoints;
        self.cursor = 0;
    }

    pub fn clear(&mut self) {
        self.waypoints.clear();
        self.cursor = 0;
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// True when every waypoint has been reached (or there were none).
    pub fn is_finished(&self) -> bool {
        self.cursor >= self.waypoints.len()
    }

    pub fn waypoints(&self) -> &[Vec2] {
        &self.waypoints
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn current(&self) -> Option<Vec2> {
        self.waypoints.get(self.cursor).copied()
    }

    /// Skip waypoints within `arrive_radius` of `position`, then return the one to
    /// head for. `None` once the path is finished.
    pub fn steer(&mut self, position: Vec2, arrive_radius: f32) -> Option<Vec2> {
        while let Some(waypoint) = self.current() {
            if position.distance(waypoint) > arrive_radius {
                return Some(waypoint);
            }
            self.cursor += 1;
        }
        None
    }
}

/// Transition record returned by `EnemyBrain::transition`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateChange {
    pub from: EnemyStateKind,
    pub to: EnemyStateKind,
}

/// Per-enemy FSM state.
#[derive(Component, Debug, Clone, PartialEq, Reflect)]
#[reflect(Component)]
pub struct EnemyBrain {
    pub state: EnemyState,
    pub path: NavPath,
    /// Wander centre
    pub spawn: Vec2,
}

impl EnemyBrain {
    pub fn new(spawn: Vec2) -> Self {
        Self {
            state: EnemyState::idle(),
            path: NavPath::default(),
            spawn,
        }
    }

    pub fn kind(&self) -> EnemyStateKind {
        self.state.kind()
    }

    /// Switch state: exit hook of the current state, then enter hook of `next`.
    ///
    /// Same-kind transitions are no-ops and return `None`.
    pub fn transition(&mut self, next: EnemyState) -> Option<StateChange> {
        let from = self.state.kind();
        let to = next.kind();
        if from == to {
            return None;
        }

        self.exit();
        self.state = next;
        self.enter();

        Some(StateChange { from, to })
    }

    fn exit(&mut self) {
        // Paths never outlive the state that planned them
        self.path.clear();
    }

    fn enter(&mut self) {
        match &mut self.state {
            EnemyState::Idle { wander, wait_timer } => {
                *wander = None;
                *wait_timer = 0.0;
            }
            EnemyState::Chase { repath_timer } => *repath_timer = 0.0,
            EnemyState::Attack { cooldown_timer } => *cooldown_timer = 0.0,
        }
    }
}

/// Enemy tuning, copied from `SimulationConfig::enemy` at spawn.
#[derive(Component, Debug, Clone, PartialEq, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
#[serde(default)]
pub struct EnemyAiConfig {
    /// Idle → Chase below this distance
    pub detection_range: f32,
    /// Chase → Idle above `detection_range * chase_exit_factor`
    pub chase_exit_factor: f32,
    /// Chase → Attack below this distance
    pub attack_range: f32,
    /// Attack → Chase above `attack_range * attack_exit_factor`
    pub attack_exit_factor: f32,
    /// Seconds between strikes
    pub attack_cooldown: f32,
    pub attack_damage: u32,
    pub attack_knockback: f32,
    /// Seconds between path re-plans while chasing out of sight
    pub repath_interval: f32,
    pub wander_inner_radius: f32,
    pub wander_radius: f32,
    pub wander_wait_min: f32,
    pub wander_wait_max: f32,
    /// Pause after a failed wander path request
    pub wander_retry_wait: f32,
    /// Fraction of movement speed used while wandering
    pub wander_speed_factor: f32,
}

impl Default for EnemyAiConfig {
    fn default() -> Self {
        Self {
            detection_range: 200.0,
            chase_exit_factor: 1.25,
            attack_range: 50.0,
            attack_exit_factor: 1.2,
            attack_cooldown: 1.0,
            attack_damage: 10,
            attack_knockback: 12.0,
            repath_interval: 0.05,
            wander_inner_radius: 32.0,
            wander_radius: 96.0,
            wander_wait_min: 2.0,
            wander_wait_max: 4.0,
            wander_retry_wait: 0.5,
            wander_speed_factor: 0.5,
        }
    }
}

impl EnemyAiConfig {
    pub fn chase_exit_range(&self) -> f32 {
        self.detection_range * self.chase_exit_factor
    }

    pub fn attack_exit_range(&self) -> f32 {
        self.attack_range * self.attack_exit_factor
    }
}
