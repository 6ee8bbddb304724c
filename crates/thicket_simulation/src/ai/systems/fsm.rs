//! Enemy FSM update: transitions, per-state behaviour, system wiring.

use bevy::prelude::*;
use rand::Rng;
use std::f32::consts::TAU;

use crate::ai::{EnemyAiConfig, EnemyBrain, EnemyState, EnemyStateChanged, EnemyStateKind, StateChange, WanderTarget};
use crate::combat::{Dead, MeleeStrike};
use crate::components::{Facing, MovementSpeed, Player, Velocity, WorldPosition};
use crate::config::SimulationConfig;
use crate::effects::{spawn_visual, VisualEffect};
use crate::navigation::{ColliderSet, NavigationQuery, Navigator};
use crate::DeterministicRng;

const ALERT_TTL: f32 = 0.6;

/// Target the brain can perceive this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sensed {
    pub entity: Entity,
    pub position: Vec2,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrainInput {
    pub entity: Entity,
    pub position: Vec2,
    pub speed: f32,
    pub target: Option<Sensed>,
    pub delta: f32,
    /// Waypoint counts as reached within this distance
    pub arrive_radius: f32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BrainOutput {
    pub velocity: Vec2,
    /// Melee strike against this entity
    pub strike: Option<Entity>,
    pub change: Option<StateChange>,
    /// Face this point (attack / chase)
    pub look_at: Option<Vec2>,
}

/// Transition table with the hysteresis band:
/// Idle → Chase below `detection_range`, Chase → Idle only above
/// `detection_range * chase_exit_factor`.
pub fn next_state(current: EnemyStateKind, config: &EnemyAiConfig, distance: Option<f32>) -> Option<EnemyState> {
    match (current, distance) {
        (EnemyStateKind::Idle, Some(d)) if d < config.detection_range => Some(EnemyState::chase()),
        (EnemyStateKind::Chase, None) => Some(EnemyState::idle()),
        (EnemyStateKind::Chase, Some(d)) if d > config.chase_exit_range() => Some(EnemyState::idle()),
        (EnemyStateKind::Chase, Some(d)) if d < config.attack_range => Some(EnemyState::attack()),
        (EnemyStateKind::Attack, None) => Some(EnemyState::idle()),
        (EnemyStateKind::Attack, Some(d)) if d > config.attack_exit_range() => Some(EnemyState::chase()),
        _ => None,
    }
}

/// One FSM step: evaluate transitions, then run the (possibly new) state.
pub fn think(
    brain: &mut EnemyBrain,
    config: &EnemyAiConfig,
    input: &BrainInput,
    nav: &impl NavigationQuery,
    rng: &mut impl Rng,
) -> BrainOutput {
    let mut output = BrainOutput::default();

    let distance = input.target.map(|t| input.position.distance(t.position));
    if let Some(next) = next_state(brain.kind(), config, distance) {
        output.change = brain.transition(next);
    }

    let EnemyBrain { state, path, spawn } = brain;
    let position = input.position;

    match state {
        EnemyState::Idle { wander, wait_timer } => {
            if *wait_timer > 0.0 {
                *wait_timer -= input.delta;
                return output;
            }

            if wander.is_none() {
                let target = pick_wander_target(*spawn, position, config, rng);
                let waypoints = nav.find_path(position, target.position, Some(input.entity));
                if waypoints.is_empty() {
                    // Stuck: wait instead of re-requesting every tick
                    *wait_timer = config.wander_retry_wait;
                    return output;
                }
                path.set(waypoints);
                *wander = Some(target);
            }

            let pace = match *wander {
                Some(target) if target.returning => 1.0,
                _ => config.wander_speed_factor,
            };
            match path.steer(position, input.arrive_radius) {
                Some(waypoint) => {
                    output.velocity = (waypoint - position).normalize_or_zero() * input.speed * pace;
                }
                None => {
                    *wander = None;
                    path.clear();
                    *wait_timer = random_between(rng, config.wander_wait_min, config.wander_wait_max);
                }
            }
        }

        EnemyState::Chase { repath_timer } => {
            let Some(target) = input.target else {
                return output;
            };
            output.look_at = Some(target.position);

            let ignore = [input.entity, target.entity];
            if nav.has_line_of_sight(position, target.position, &ignore) {
                path.clear();
                // Re-plan right away if sight is lost again
                *repath_timer = 0.0;
                output.velocity = (target.position - position).normalize_or_zero() * input.speed;
                return output;
            }

            *repath_timer -= input.delta;
            if *repath_timer <= 0.0 {
                path.set(nav.find_path(position, target.position, Some(input.entity)));
                *repath_timer = config.repath_interval;
            }

            if let Some(waypoint) = path.steer(position, input.arrive_radius) {
                output.velocity = (waypoint - position).normalize_or_zero() * input.speed;
            }
        }

        EnemyState::Attack { cooldown_timer } => {
            let Some(target) = input.target else {
                return output;
            };
            output.look_at = Some(target.position);

            *cooldown_timer += input.delta;
            if *cooldown_timer >= config.attack_cooldown {
                *cooldown_timer = 0.0;
                output.strike = Some(target.entity);
            }
        }
    }

    output
}

/// Random point in the wander ring around `spawn`, or spawn itself when the
/// enemy has drifted outside the ring.
pub fn pick_wander_target(spawn: Vec2, position: Vec2, config: &EnemyAiConfig, rng: &mut impl Rng) -> WanderTarget {
    if position.distance(spawn) > config.wander_radius {
        return WanderTarget {
            position: spawn,
            returning: true,
        };
    }

    let angle = rng.gen_range(0.0..TAU);
    let radius = random_between(rng, config.wander_inner_radius, config.wander_radius);
    WanderTarget {
        position: spawn + Vec2::from_angle(angle) * radius,
        returning: false,
    }
}

fn random_between(rng: &mut impl Rng, min: f32, max: f32) -> f32 {
    if max > min {
        rng.gen_range(min..=max)
    } else {
        min
    }
}

/// System: run every living enemy's FSM.
///
/// Enemies are processed in entity order so random draws are reproducible.
#[allow(clippy::too_many_arguments)]
pub fn enemy_brain_update(
    mut commands: Commands,
    time: Res<Time<Fixed>>,
    config: Res<SimulationConfig>,
    colliders: Res<ColliderSet>,
    mut rng: ResMut<DeterministicRng>,
    mut enemies: Query<
        (
            Entity,
            &mut EnemyBrain,
            &EnemyAiConfig,
            &WorldPosition,
            &MovementSpeed,
            &mut Velocity,
            &mut Facing,
        ),
        Without<Dead>,
    >,
    players: Query<(Entity, &WorldPosition), (With<Player>, Without<Dead>, Without<EnemyBrain>)>,
    mut strikes: EventWriter<MeleeStrike>,
    mut state_events: EventWriter<EnemyStateChanged>,
) {
    let delta = time.delta_secs();
    let navigator = Navigator::new(&*colliders, &config.pathfinding);

    let mut order: Vec<Entity> = enemies.iter().map(|(entity, ..)| entity).collect();
    order.sort_by_key(|entity| entity.index());

    for entity in order {
        let Ok((_, mut brain, ai_config, position, speed, mut velocity, mut facing)) = enemies.get_mut(entity) else {
            continue;
        };

        let target = players
            .iter()
            .map(|(player, player_position)| Sensed {
                entity: player,
                position: player_position.0,
            })
            .min_by(|a, b| {
                position
                    .0
                    .distance_squared(a.position)
                    .total_cmp(&position.0.distance_squared(b.position))
            });

        let input = BrainInput {
            entity,
            position: position.0,
            speed: speed.speed,
            target,
            delta,
            arrive_radius: config.pathfinding.waypoint_arrive_radius,
        };
        let output = think(&mut brain, ai_config, &input, &navigator, &mut rng.rng);

        velocity.0 = output.velocity;
        let look_at = output.look_at.unwrap_or(position.0 + output.velocity);
        if let Some(new_facing) = Facing::towards(position.0, look_at) {
            *facing = new_facing;
        }

        if let Some(change) = output.change {
            state_events.write(EnemyStateChanged {
                entity,
                from: change.from,
                to: change.to,
            });
            if change.to == EnemyStateKind::Chase && change.from == EnemyStateKind::Idle {
                spawn_visual(
                    &mut commands,
                    VisualEffect::AlertMarker { owner: entity },
                    position.0,
                    ALERT_TTL,
                );
            }
            crate::log(&format!("🤖 {:?}: {:?} → {:?}", entity, change.from, change.to));
        }

        if let Some(victim) = output.strike {
            strikes.write(MeleeStrike::targeted(
                entity,
                victim,
                ai_config.attack_damage,
                ai_config.attack_knockback,
            ));
        }
    }
}
