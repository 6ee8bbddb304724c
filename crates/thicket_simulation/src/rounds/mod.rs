//! Rounds module
//!
//! Waves of enemies driven by `RoundsConfig`. A host calls
//! `RoundDirector::start_first_round`; after that the director spawns each
//! round's directives on their cadence, reports a clear once every spawned enemy
//! is dead or gone, and (with `auto_advance`) starts the next round after
//! `inter_round_delay`.

use bevy::prelude::*;

use crate::arena::enemy_bundle;
use crate::combat::Dead;
use crate::components::{Health, Player, WorldPosition};
use crate::config::SimulationConfig;
use crate::{DeterministicRng, SimulationSet};

pub mod director;

#[cfg(test)]
mod director_tests;

pub use director::{
    choose_spawn_position, RoundConfig, RoundDirector, RoundEvent, RoundPhase, RoundTick, RoundsConfig,
    SpawnArea, SpawnDirective,
};

/// System: prune fallen enemies, advance the schedule, spawn what is owed.
#[allow(clippy::too_many_arguments)]
pub fn run_round_director(
    mut commands: Commands,
    time: Res<Time<Fixed>>,
    config: Res<SimulationConfig>,
    mut director: ResMut<RoundDirector>,
    mut rng: ResMut<DeterministicRng>,
    living: Query<&Health, Without<Dead>>,
    players: Query<(Entity, &WorldPosition), (With<Player>, Without<Dead>)>,
    mut round_events: EventWriter<RoundEvent>,
) {
    director.retain_alive(|enemy| living.get(enemy).is_ok_and(|health| health.is_alive()));

    let rounds = &config.rounds;
    let step = director.tick(rounds, time.delta_secs());

    if !step.spawns.is_empty() {
        let anchor = players
            .iter()
            .min_by_key(|(entity, _)| entity.index())
            .map(|(_, position)| position.0)
            .unwrap_or(Vec2::ZERO);
        let round = director.current_round() as usize;

        for directive_index in step.spawns {
            let Some(directive) = round
                .checked_sub(1)
                .and_then(|index| rounds.rounds.get(index))
                .and_then(|round| round.spawns.get(directive_index))
            else {
                continue;
            };
            let position = choose_spawn_position(directive, rounds, anchor, &mut rng.rng);
            let enemy = commands
                .spawn(enemy_bundle(position, directive.max_health, config.enemy.clone()))
                .id();
            director.track(enemy);
        }
    }

    for event in step.events {
        match event {
            RoundEvent::Started { round } => crate::log_info(&format!("🏁 Round {} started", round)),
            RoundEvent::Cleared { round } => crate::log_info(&format!("🏆 Round {} cleared", round)),
            RoundEvent::AllComplete => crate::log_info("🎉 All rounds complete"),
        }
        round_events.write(event);
    }
}

pub struct RoundsPlugin;

impl Plugin for RoundsPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<RoundEvent>()
            .init_resource::<RoundDirector>()
            .add_systems(FixedUpdate, run_round_director.in_set(SimulationSet::Rounds));
    }
}
