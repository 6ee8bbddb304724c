//! Melee strikes (enemy attacks and player punches).
//!
//! Both resolve through the same Health ledger contract as projectiles.

use bevy::math::bounding::{Aabb2d, BoundingVolume};
use bevy::prelude::*;

use crate::combat::{DamageDealt, DamageFeed, Dead, EntityDied};
use crate::components::{Actor, Health, WorldPosition};
use crate::config::CombatConfig;
use crate::effects::{spawn_visual, VisualEffect};
use crate::navigation::collision::contains_point;
use crate::navigation::{Collider, ColliderSet};
use crate::physics::resolve_step;

const FLASH_TTL: f32 = 0.15;

/// Who a strike can hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StrikeArea {
    /// One known target (enemy attack state)
    Target(Entity),
    /// Every other-faction actor inside a square of side `size`, `reach` in front
    /// of the attacker along `facing`
    Box { facing: Vec2, reach: f32, size: f32 },
}

#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct MeleeStrike {
    pub attacker: Entity,
    pub area: StrikeArea,
    pub damage: u32,
    /// Displacement applied to each target, away from the attacker. Fixed
    /// obstacles stop it like any other movement.
    pub knockback: f32,
}

impl MeleeStrike {
    pub fn targeted(attacker: Entity, target: Entity, damage: u32, knockback: f32) -> Self {
        Self {
            attacker,
            area: StrikeArea::Target(target),
            damage,
            knockback,
        }
    }

    /// Player punch using the configured reach and box.
    pub fn punch(attacker: Entity, facing: Vec2, config: &CombatConfig) -> Self {
        Self {
            attacker,
            area: StrikeArea::Box {
                facing,
                reach: config.punch_reach,
                size: config.melee_box_size,
            },
            damage: config.punch_damage,
            knockback: config.punch_knockback,
        }
    }
}

/// Box hit by an area strike from `origin`.
pub fn strike_box(origin: Vec2, facing: Vec2, reach: f32, size: f32) -> Aabb2d {
    let center = origin + facing.normalize_or_zero() * reach;
    Aabb2d::new(center, Vec2::splat(size / 2.0))
}

/// System: resolve melee strike events.
pub fn resolve_melee_strikes(
    mut commands: Commands,
    time: Res<Time<Fixed>>,
    colliders: Res<ColliderSet>,
    mut feed: ResMut<DamageFeed>,
    mut strikes: EventReader<MeleeStrike>,
    mut actors: Query<(Entity, &Actor, &mut WorldPosition, &mut Health, Option<&Collider>), Without<Dead>>,
    mut damage_events: EventWriter<DamageDealt>,
    mut death_events: EventWriter<EntityDied>,
) {
    let now = time.elapsed_secs();

    for strike in strikes.read() {
        let Ok((_, attacker_actor, attacker_position, _, _)) = actors.get(strike.attacker) else {
            continue;
        };
        let faction = attacker_actor.faction_id;
        let origin = attacker_position.0;

        let victims: Vec<Entity> = match strike.area {
            StrikeArea::Target(target) => vec![target],
            StrikeArea::Box { facing, reach, size } => {
                let area = strike_box(origin, facing, reach, size);
                spawn_visual(&mut commands, VisualEffect::StrikeFlash, area.center(), FLASH_TTL);

                let mut inside: Vec<Entity> = actors
                    .iter()
                    .filter(|(entity, actor, position, _, _)| {
                        *entity != strike.attacker
                            && actor.faction_id != faction
                            && contains_point(&area, position.0)
                    })
                    .map(|(entity, ..)| entity)
                    .collect();
                inside.sort_by_key(|entity| entity.index());
                inside
            }
        };

        for victim in victims {
            let Ok((entity, actor, mut position, mut health, collider)) = actors.get_mut(victim) else {
                continue;
            };
            if actor.faction_id == faction || health.is_dead() {
                continue;
            }

            let killed = health.take_damage(strike.damage);
            feed.record_hit(entity, strike.damage, false, now);

            if strike.knockback > 0.0 {
                let push = (position.0 - origin).normalize_or_zero() * strike.knockback;
                position.0 = match collider {
                    Some(collider) => resolve_step(&*colliders, entity, collider, position.0, push),
                    None => position.0 + push,
                };
            }

            damage_events.write(DamageDealt {
                attacker: Some(strike.attacker),
                target: entity,
                damage: strike.damage,
                critical: false,
                element: None,
                target_died: killed,
            });
            if killed {
                death_events.write(EntityDied {
                    entity,
                    killer: Some(strike.attacker),
                });
            }

            crate::log(&format!(
                "👊 {:?} struck {:?} for {} (HP {})",
                strike.attacker,
                entity,
                strike.damage,
                health.current()
            ));
        }
    }
}
