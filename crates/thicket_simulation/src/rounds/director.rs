//! Round director: spawn directives, cadence, round clear, auto-advance.
//!
//! `RoundDirector::tick` is pure bookkeeping. It reports which directives owe a
//! spawn this tick and which round signals fired, and the system turns those
//! into enemies and events.

use bevy::prelude::*;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

/// Slack for accumulated fixed-step time compared against schedule points
const TIME_EPSILON: f32 = 1e-4;

/// Axis-aligned spawn rectangle (`x`, `y` is the min corner).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnArea {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnDirective {
    pub count: u32,
    /// Exact spawn points, one picked at random per enemy. Wins over `area`.
    pub points: Vec<[f32; 2]>,
    pub area: Option<SpawnArea>,
    /// Seconds between spawns; 0 spawns the whole batch at once
    pub cadence: f32,
    /// Seconds after round start before the first spawn
    pub start_delay: f32,
    pub max_health: u32,
}

impl Default for SpawnDirective {
    fn default() -> Self {
        Self {
            count: 1,
            points: Vec::new(),
            area: None,
            cadence: 0.0,
            start_delay: 0.0,
            max_health: 80,
        }
    }
}

impl SpawnDirective {
    /// Spawns owed `elapsed` seconds into the round.
    pub fn due_by(&self, elapsed: f32) -> u32 {
        let since_start = elapsed - self.start_delay + TIME_EPSILON;
        if since_start < 0.0 {
            return 0;
        }
        if self.cadence <= 0.0 {
            return self.count;
        }
        let due = (since_start / self.cadence).floor() as u32 + 1;
        due.min(self.count)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoundConfig {
    pub spawns: Vec<SpawnDirective>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoundsConfig {
    pub rounds: Vec<RoundConfig>,
    /// Start the next round on its own after a clear
    pub auto_advance: bool,
    /// Pause between a clear and the next round (seconds)
    pub inter_round_delay: f32,
    /// Enemies without points or area spawn this far from the player
    pub fallback_radius_min: f32,
    pub fallback_radius_max: f32,
}

impl Default for RoundsConfig {
    fn default() -> Self {
        Self {
            rounds: Vec::new(),
            auto_advance: true,
            inter_round_delay: 1.0,
            fallback_radius_min: 200.0,
            fallback_radius_max: 350.0,
        }
    }
}

/// Spawn position for one enemy of `directive`.
///
/// Points first, then the area, otherwise a ring around `anchor` (the player).
pub fn choose_spawn_position(
    directive: &SpawnDirective,
    config: &RoundsConfig,
    anchor: Vec2,
    rng: &mut impl Rng,
) -> Vec2 {
    if !directive.points.is_empty() {
        let [x, y] = directive.points[rng.gen_range(0..directive.points.len())];
        return Vec2::new(x, y);
    }
    if let Some(area) = directive.area {
        return Vec2::new(
            area.x + rng.gen::<f32>() * area.width,
            area.y + rng.gen::<f32>() * area.height,
        );
    }

    let angle = rng.gen_range(0.0..TAU);
    let radius = if config.fallback_radius_max > config.fallback_radius_min {
        rng.gen_range(config.fallback_radius_min..=config.fallback_radius_max)
    } else {
        config.fallback_radius_min
    };
    anchor + Vec2::from_angle(angle) * radius
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum RoundPhase {
    /// No round requested yet
    #[default]
    NotStarted,
    /// Directives still owe spawns
    Spawning,
    /// Everything spawned, waiting for the last enemy to fall
    Fighting,
    /// Round cleared; `next_in` counts down to the next round when auto-advancing
    Cleared { next_in: Option<f32> },
    /// Past the last configured round
    Complete,
}

/// Round lifecycle signals, numbered from 1.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundEvent {
    Started { round: u32 },
    Cleared { round: u32 },
    AllComplete,
}

/// What a tick asks the host to do.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoundTick {
    /// Directive index per enemy to spawn, in order
    pub spawns: Vec<usize>,
    pub events: Vec<RoundEvent>,
}

#[derive(Resource, Debug, Clone, Default)]
pub struct RoundDirector {
    phase: RoundPhase,
    round: Option<usize>,
    pending: Option<usize>,
    elapsed: f32,
    spawned: Vec<u32>,
    alive: Vec<Entity>,
}

impl RoundDirector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start_first_round(&mut self) {
        self.pending = Some(0);
    }

    pub fn start_next_round(&mut self) {
        self.pending = Some(self.round.map_or(0, |round| round + 1));
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    /// 1-based; 0 before the first round
    pub fn current_round(&self) -> u32 {
        self.round.map_or(0, |round| round as u32 + 1)
    }

    pub fn remaining_enemies(&self) -> usize {
        self.alive.len()
    }

    pub fn alive(&self) -> &[Entity] {
        &self.alive
    }

    /// Count a freshly spawned enemy towards the current round.
    pub fn track(&mut self, enemy: Entity) {
        self.alive.push(enemy);
    }

    /// Drop enemies that died or were despawned.
    pub fn retain_alive(&mut self, mut is_alive: impl FnMut(Entity) -> bool) {
        self.alive.retain(|enemy| is_alive(*enemy));
    }

    /// Advance the round schedule by `delta` seconds.
    ///
    /// Enemies listed in `spawns` must be `track`ed before the next tick, otherwise
    /// the round may count as cleared while they are alive.
    pub fn tick(&mut self, config: &RoundsConfig, delta: f32) -> RoundTick {
        let mut out = RoundTick::default();

        if let Some(index) = self.pending.take() {
            self.begin(index, config, &mut out);
        }

        if let RoundPhase::Cleared { next_in: Some(remaining) } = self.phase {
            let remaining = remaining - delta;
            if remaining <= 0.0 {
                let next = self.round.map_or(0, |round| round + 1);
                self.begin(next, config, &mut out);
            } else {
                self.phase = RoundPhase::Cleared {
                    next_in: Some(remaining),
                };
            }
        }

        if self.phase == RoundPhase::Spawning {
            self.elapsed += delta;
            let Some(round) = self.round.and_then(|index| config.rounds.get(index)) else {
                self.phase = RoundPhase::Fighting;
                return out;
            };

            let mut finished = true;
            for (index, directive) in round.spawns.iter().enumerate() {
                let due = directive.due_by(self.elapsed);
                while self.spawned[index] < due {
                    self.spawned[index] += 1;
                    out.spawns.push(index);
                }
                finished &= self.spawned[index] >= directive.count;
            }
            if finished {
                self.phase = RoundPhase::Fighting;
            }
        }

        if self.phase == RoundPhase::Fighting && out.spawns.is_empty() && self.alive.is_empty() {
            out.events.push(RoundEvent::Cleared {
                round: self.current_round(),
            });
            self.phase = RoundPhase::Cleared {
                next_in: config.auto_advance.then_some(config.inter_round_delay),
            };
        }

        out
    }

    fn begin(&mut self, index: usize, config: &RoundsConfig, out: &mut RoundTick) {
        let Some(round) = config.rounds.get(index) else {
            if self.phase != RoundPhase::Complete {
                self.phase = RoundPhase::Complete;
                out.events.push(RoundEvent::AllComplete);
            }
            return;
        };

        self.round = Some(index);
        self.phase = RoundPhase::Spawning;
        self.elapsed = 0.0;
        self.spawned = vec![0; round.spawns.len()];
        out.events.push(RoundEvent::Started {
            round: index as u32 + 1,
        });
    }
}
