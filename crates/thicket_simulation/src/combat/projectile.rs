//! Projectiles: flight, impact detection and hit resolution.
//!
//! Hit resolution order:
//! 1. guard: a destroyed projectile, or one that already hit this target, is ignored
//! 2. critical roll on the base damage
//! 3. damage through the Health ledger (its return value reports the kill)
//! 4. carried elements become status effects on the target; lightning chains
//! 5. the projectile is destroyed unless it still carries an unexpired payload

use bevy::prelude::*;
use rand::Rng;

use crate::combat::lightning::{bolt_points, overlaps_field, select_chain_targets};
use crate::combat::{
    roll_damage, ChainConfig, DamageDealt, DamageFeed, Dead, Element, ElementTable, EntityDied,
    StatusEffects,
};
use crate::components::{Actor, Health, MovementSpeed, Velocity, WorldPosition};
use crate::config::{CombatConfig, SimulationConfig};
use crate::effects::{spawn_visual, LightningField, TimeToLive, VisualEffect};
use crate::navigation::{BodyKind, ColliderSet, CollisionWorld};
use crate::DeterministicRng;

const BOLT_SEGMENTS: usize = 6;
const BOLT_JITTER: f32 = 6.0;
const ARC_TTL: f32 = 0.2;
const BURST_TTL: f32 = 0.3;

/// Element carried by a round in flight.
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct Payload {
    pub element: Element,
    /// Seconds until the round stops carrying it
    pub remaining: f32,
}

#[derive(Component, Debug, Clone, PartialEq, Reflect)]
#[reflect(Component)]
#[require(WorldPosition, Velocity)]
pub struct Projectile {
    pub shooter: Option<Entity>,
    /// Actors of this faction are never hit
    pub faction_id: u64,
    pub damage: u32,
    pub max_distance: f32,
    pub travelled: f32,
    pub payload: Vec<Payload>,
    /// Targets already resolved
    pub hit: Vec<Entity>,
    /// Resolution finished with this projectile
    pub destroyed: bool,
    /// Out of range, hit an obstacle or lost its payload; removed next step
    pub spent: bool,
}

impl Projectile {
    pub fn new(shooter: Option<Entity>, faction_id: u64, damage: u32, max_distance: f32) -> Self {
        Self {
            shooter,
            faction_id,
            damage,
            max_distance,
            travelled: 0.0,
            payload: Vec::new(),
            hit: Vec::new(),
            destroyed: false,
            spent: false,
        }
    }

    /// Attach elements with their in-flight lifetime from the table. Unconfigured
    /// elements are dropped.
    pub fn with_payload(mut self, elements: impl IntoIterator<Item = Element>, table: &ElementTable) -> Self {
        for element in elements {
            let Some(config) = table.get(element) else {
                continue;
            };
            if self.payload.iter().any(|p| p.element == element) {
                continue;
            }
            self.payload.push(Payload {
                element,
                remaining: config.payload_duration,
            });
        }
        self
    }

    pub fn has_live_payload(&self) -> bool {
        self.payload.iter().any(|p| p.remaining > 0.0)
    }

    pub fn live_elements(&self) -> impl Iterator<Item = Element> + '_ {
        self.payload
            .iter()
            .filter(|p| p.remaining > 0.0)
            .map(|p| p.element)
    }

    fn decay_payload(&mut self, delta: f32) {
        for payload in self.payload.iter_mut() {
            payload.remaining -= delta;
        }
    }
}

/// Event: projectile overlaps a target (from the collision world).
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct ProjectileHit {
    pub projectile: Entity,
    pub target: Entity,
}

/// Mutable view of the struck actor.
pub struct HitTarget<'a> {
    pub entity: Entity,
    pub health: &'a mut Health,
    pub speed: &'a mut MovementSpeed,
    pub effects: &'a mut StatusEffects,
}

/// Collaborators for one resolution pass.
pub struct HitContext<'a, R: Rng> {
    pub combat: &'a CombatConfig,
    pub elements: &'a ElementTable,
    pub rng: &'a mut R,
    pub feed: &'a mut DamageFeed,
    pub now: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DamageOutcome {
    pub target: Entity,
    pub damage: u32,
    pub critical: bool,
    pub killed: bool,
    /// Status effects applied to the target
    pub applied: Vec<Element>,
    /// Lightning area spread to run from the impact point
    pub chain: Option<ChainConfig>,
    pub projectile_destroyed: bool,
}

/// Resolve one projectile impact. `None` when the guard rejects the hit.
pub fn resolve_projectile_hit<R: Rng>(
    projectile: &mut Projectile,
    target: HitTarget<'_>,
    ctx: &mut HitContext<'_, R>,
) -> Option<DamageOutcome> {
    if projectile.destroyed || projectile.hit.contains(&target.entity) || target.health.is_dead() {
        return None;
    }

    let roll = roll_damage(projectile.damage, ctx.combat, ctx.rng);
    let killed = target.health.take_damage(roll.amount);
    ctx.feed.record_hit(target.entity, roll.amount, roll.critical, ctx.now);

    let mut applied = Vec::new();
    let mut chain = None;
    if !killed {
        let live: Vec<Element> = projectile.live_elements().collect();
        for element in live {
            if target.effects.apply(element, ctx.elements, target.speed).is_some() {
                applied.push(element);
            }
        }
    }
    if projectile.live_elements().any(|e| e == Element::Lightning) {
        chain = ctx.elements.get(Element::Lightning).and_then(|config| config.chain);
    }

    projectile.hit.push(target.entity);
    projectile.destroyed = !projectile.has_live_payload();

    Some(DamageOutcome {
        target: target.entity,
        damage: roll.amount,
        critical: roll.critical,
        killed,
        applied,
        chain,
        projectile_destroyed: projectile.destroyed,
    })
}

/// Spawn parameters for one round.
#[derive(Debug, Clone)]
pub struct ProjectileSpawn {
    pub projectile: Projectile,
    pub position: Vec2,
    pub velocity: Vec2,
}

pub fn spawn_projectile(commands: &mut Commands, spawn: ProjectileSpawn) -> Entity {
    commands
        .spawn((
            spawn.projectile,
            WorldPosition(spawn.position),
            Velocity(spawn.velocity),
        ))
        .id()
}

/// System: move projectiles and report what they cross.
///
/// Fixed obstacles stop the round. Actors crossed this step become
/// `ProjectileHit` events, nearest first.
pub fn advance_projectiles(
    mut commands: Commands,
    time: Res<Time<Fixed>>,
    colliders: Res<ColliderSet>,
    mut projectiles: Query<(Entity, &mut Projectile, &mut WorldPosition, &Velocity)>,
    mut hit_events: EventWriter<ProjectileHit>,
) {
    let delta = time.delta_secs();

    for (entity, mut projectile, mut position, velocity) in projectiles.iter_mut() {
        if projectile.destroyed || projectile.spent || projectile.travelled >= projectile.max_distance {
            commands.entity(entity).despawn();
            continue;
        }

        let carried_payload = !projectile.payload.is_empty();
        projectile.decay_payload(delta);
        if carried_payload && !projectile.has_live_payload() {
            commands.entity(entity).despawn();
            continue;
        }

        let step = velocity.0 * delta;
        let Ok(direction) = Dir2::new(step) else {
            continue;
        };
        let length = step.length();

        let mut travel = length;
        for ray_hit in colliders.raycast(position.0, direction, length) {
            if Some(ray_hit.entity) == projectile.shooter || projectile.hit.contains(&ray_hit.entity) {
                continue;
            }
            match ray_hit.kind {
                BodyKind::Fixed => {
                    travel = ray_hit.distance;
                    projectile.spent = true;
                    break;
                }
                BodyKind::Active => {
                    hit_events.write(ProjectileHit {
                        projectile: entity,
                        target: ray_hit.entity,
                    });
                }
            }
        }

        position.0 += *direction * travel;
        projectile.travelled += travel;
    }
}

/// System: resolve impact events into damage, status effects and chains.
#[allow(clippy::too_many_arguments)]
pub fn resolve_projectile_hits(
    mut commands: Commands,
    mut hit_events: EventReader<ProjectileHit>,
    time: Res<Time<Fixed>>,
    config: Res<SimulationConfig>,
    mut rng: ResMut<DeterministicRng>,
    mut feed: ResMut<DamageFeed>,
    mut projectiles: Query<&mut Projectile>,
    mut targets: Query<
        (
            Entity,
            &Actor,
            &WorldPosition,
            &mut Health,
            &mut MovementSpeed,
            &mut StatusEffects,
        ),
        Without<Dead>,
    >,
    fields: Query<&WorldPosition, (With<LightningField>, Without<Actor>)>,
    mut damage_events: EventWriter<DamageDealt>,
    mut death_events: EventWriter<EntityDied>,
) {
    let mut ctx = HitContext {
        combat: &config.combat,
        elements: &config.elements,
        rng: &mut rng.rng,
        feed: &mut *feed,
        now: time.elapsed_secs(),
    };
    // Fields spawned during this pass are not queryable yet
    let mut new_fields: Vec<Vec2> = Vec::new();

    for hit in hit_events.read() {
        let Ok(mut projectile) = projectiles.get_mut(hit.projectile) else {
            continue;
        };
        let Ok((entity, actor, position, mut health, mut speed, mut effects)) =
            targets.get_mut(hit.target)
        else {
            continue;
        };
        if actor.faction_id == projectile.faction_id {
            continue;
        }
        let impact = position.0;

        let Some(outcome) = resolve_projectile_hit(
            &mut projectile,
            HitTarget {
                entity,
                health: &mut *health,
                speed: &mut *speed,
                effects: &mut *effects,
            },
            &mut ctx,
        ) else {
            continue;
        };

        damage_events.write(DamageDealt {
            attacker: projectile.shooter,
            target: entity,
            damage: outcome.damage,
            critical: outcome.critical,
            element: None,
            target_died: outcome.killed,
        });
        if outcome.killed {
            death_events.write(EntityDied {
                entity,
                killer: projectile.shooter,
            });
        }
        crate::log(&format!(
            "🎯 {:?} hit {:?} for {}{} (HP {})",
            hit.projectile,
            entity,
            outcome.damage,
            if outcome.critical { " CRIT" } else { "" },
            health.current()
        ));

        for element in &outcome.applied {
            spawn_visual(
                &mut commands,
                VisualEffect::ElementBurst { element: *element },
                impact,
                BURST_TTL,
            );
        }
        if outcome.projectile_destroyed {
            commands.entity(hit.projectile).despawn();
        }

        let Some(chain) = outcome.chain else {
            continue;
        };
        let guard_radius = ctx.combat.lightning_overlap_radius;
        let existing = fields.iter().map(|p| p.0).chain(new_fields.iter().copied());
        if overlaps_field(impact, existing, guard_radius) {
            crate::log("⚡ Lightning chain suppressed by nearby field");
            continue;
        }

        let shooter_faction = projectile.faction_id;
        let candidates: Vec<(Entity, Vec2)> = targets
            .iter()
            .filter(|(other, actor, _, health, _, _)| {
                *other != entity && actor.faction_id != shooter_faction && health.is_alive()
            })
            .map(|(other, _, other_position, _, _, _)| (other, other_position.0))
            .collect();
        let chained = select_chain_targets(impact, candidates, chain.range, chain.count);

        for secondary in chained {
            let Ok((_, _, other_position, _, mut other_speed, mut other_effects)) =
                targets.get_mut(secondary)
            else {
                continue;
            };
            other_effects.apply(Element::Lightning, ctx.elements, &mut other_speed);

            let points = bolt_points(impact, other_position.0, BOLT_SEGMENTS, BOLT_JITTER, ctx.rng);
            spawn_visual(&mut commands, VisualEffect::LightningArc { points }, impact, ARC_TTL);
        }

        commands.spawn((
            LightningField { radius: guard_radius },
            WorldPosition(impact),
            TimeToLive::new(ctx.combat.lightning_field_ttl),
        ));
        new_fields.push(impact);
    }
}
