//! Ground pickups
//!
//! - `AmmoPickup`: crate of rounds for one weapon kind, collected when a player
//!   sends an `InteractIntent` within `interact_radius`
//! - `ModifierPickup`: elemental modifier box, collected on contact
//!   (`modifier_radius`) and added to the player's `ModifierLoadout`
//!
//! Both are despawned when collected and reported through `PickupCollected`.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::combat::{Dead, Element, ModifierLoadout};
use crate::components::{AmmoReserves, Player, WeaponKind, WorldPosition};
use crate::config::SimulationConfig;
use crate::SimulationSet;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickupConfig {
    /// Ammo crates answer an interact within this distance
    pub interact_radius: f32,
    /// Modifier boxes are collected by walking within this distance
    pub modifier_radius: f32,
    /// Rounds in a crate spawned without an explicit amount
    pub ammo_amount: u32,
}

impl Default for PickupConfig {
    fn default() -> Self {
        Self {
            interact_radius: 25.0,
            modifier_radius: 20.0,
            ammo_amount: 30,
        }
    }
}

#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
#[require(WorldPosition)]
pub struct AmmoPickup {
    pub kind: WeaponKind,
    pub amount: u32,
}

#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
#[require(WorldPosition)]
pub struct ModifierPickup {
    pub element: Element,
}

/// Event: the player pressed interact.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct InteractIntent {
    pub actor: Entity,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PickupItem {
    /// `total` is the reserve count after the pickup
    Ammo { kind: WeaponKind, amount: u32, total: u32 },
    Modifier(Element),
}

#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct PickupCollected {
    pub collector: Entity,
    pub pickup: Entity,
    pub item: PickupItem,
}

/// Nearest candidate within `radius` of `origin`, skipping `taken`.
///
/// Equal distances resolve to the lowest entity index.
pub fn nearest_within(
    origin: Vec2,
    radius: f32,
    candidates: impl IntoIterator<Item = (Entity, Vec2)>,
    taken: &[Entity],
) -> Option<Entity> {
    let radius_sq = radius * radius;
    candidates
        .into_iter()
        .filter(|(entity, _)| !taken.contains(entity))
        .map(|(entity, position)| (entity, origin.distance_squared(position)))
        .filter(|(_, distance_sq)| *distance_sq <= radius_sq)
        .min_by(|a, b| a.1.total_cmp(&b.1).then(a.0.index().cmp(&b.0.index())))
        .map(|(entity, _)| entity)
}

/// System: interact intents collect the nearest ammo crate in reach.
pub fn collect_ammo_pickups(
    mut commands: Commands,
    config: Res<SimulationConfig>,
    mut intents: EventReader<InteractIntent>,
    mut players: Query<(&WorldPosition, &mut AmmoReserves), (With<Player>, Without<Dead>)>,
    crates: Query<(Entity, &WorldPosition, &AmmoPickup)>,
    mut collected: EventWriter<PickupCollected>,
) {
    let mut taken: Vec<Entity> = Vec::new();

    for intent in intents.read() {
        let Ok((position, mut reserves)) = players.get_mut(intent.actor) else {
            continue;
        };
        let candidates = crates.iter().map(|(entity, at, _)| (entity, at.0));
        let Some(pickup) = nearest_within(position.0, config.pickups.interact_radius, candidates, &taken) else {
            continue;
        };
        let Ok((_, _, ammo)) = crates.get(pickup) else {
            continue;
        };

        let previous = reserves.count(ammo.kind);
        let total = reserves.add(ammo.kind, ammo.amount);
        taken.push(pickup);
        commands.entity(pickup).despawn();

        collected.write(PickupCollected {
            collector: intent.actor,
            pickup,
            item: PickupItem::Ammo {
                kind: ammo.kind,
                amount: ammo.amount,
                total,
            },
        });
        crate::log(&format!(
            "📦 {:?} picked up {} {:?} rounds ({} → {})",
            intent.actor, ammo.amount, ammo.kind, previous, total
        ));
    }
}

/// System: players walking over a modifier box pick it up.
///
/// Boxes are visited in entity order; a box goes to the nearest player in range.
pub fn collect_modifier_pickups(
    mut commands: Commands,
    config: Res<SimulationConfig>,
    mut players: Query<(Entity, &WorldPosition, &mut ModifierLoadout), (With<Player>, Without<Dead>)>,
    boxes: Query<(Entity, &WorldPosition, &ModifierPickup)>,
    mut collected: EventWriter<PickupCollected>,
) {
    let mut order: Vec<(Entity, Vec2, Element)> = boxes
        .iter()
        .map(|(entity, position, pickup)| (entity, position.0, pickup.element))
        .collect();
    order.sort_by_key(|(entity, ..)| entity.index());

    for (pickup, position, element) in order {
        let candidates = players.iter().map(|(entity, at, _)| (entity, at.0));
        let Some(collector) = nearest_within(position, config.pickups.modifier_radius, candidates, &[]) else {
            continue;
        };
        let Ok((_, _, mut loadout)) = players.get_mut(collector) else {
            continue;
        };

        loadout.pick_up(element);
        commands.entity(pickup).despawn();

        collected.write(PickupCollected {
            collector,
            pickup,
            item: PickupItem::Modifier(element),
        });
        crate::log(&format!("✨ {:?} picked up {} modifier", collector, element.name()));
    }
}

pub struct PickupsPlugin;

impl Plugin for PickupsPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<InteractIntent>()
            .add_event::<PickupCollected>()
            .register_type::<AmmoPickup>()
            .register_type::<ModifierPickup>()
            .add_systems(
                FixedUpdate,
                (collect_ammo_pickups, collect_modifier_pickups)
                    .chain()
                    .in_set(SimulationSet::Pickups),
            );
    }
}
