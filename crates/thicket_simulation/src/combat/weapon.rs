//! Ranged weapons: stats, modifier loadout, fire / reload intents.
//!
//! Input is external. A host (or the demo binary) writes `WeaponFireIntent` /
//! `ReloadIntent`; the simulation owns fire-rate gating, magazines and
//! projectile spawning.

use bevy::prelude::*;

use crate::combat::projectile::{spawn_projectile, Projectile, ProjectileSpawn};
use crate::combat::{Dead, Element};
use crate::components::{Actor, AmmoReserves, WeaponKind, WorldPosition};
use crate::config::SimulationConfig;

/// Equipped ranged weapon.
#[derive(Component, Debug, Clone, PartialEq, Reflect)]
#[reflect(Component)]
pub struct WeaponStats {
    pub kind: WeaponKind,
    pub damage: u32,
    /// Shots per second
    pub fire_rate: f32,
    pub magazine_size: u32,
    pub current_ammo: u32,
    /// Projectiles per trigger pull (pellets)
    pub bullet_count: u32,
    /// Total fan angle in radians across all pellets
    pub spread_angle: f32,
    /// Seconds until the next shot is allowed
    pub cooldown_timer: f32,
}

impl WeaponStats {
    pub fn for_kind(kind: WeaponKind) -> Self {
        let (damage, fire_rate, magazine_size, bullet_count, spread_angle) = match kind {
            WeaponKind::AssaultRifle => (15, 8.0, 30, 1, 0.0),
            WeaponKind::Shotgun => (8, 1.5, 8, 6, std::f32::consts::FRAC_PI_6),
            WeaponKind::Pistol => (20, 3.0, 12, 1, 0.0),
            WeaponKind::Smg => (10, 12.0, 25, 1, 0.0),
        };

        Self {
            kind,
            damage,
            fire_rate,
            magazine_size,
            current_ammo: magazine_size,
            bullet_count,
            spread_angle,
            cooldown_timer: 0.0,
        }
    }

    pub fn can_fire(&self) -> bool {
        self.cooldown_timer <= 0.0 && self.current_ammo > 0
    }

    /// Consume one round and start the fire-rate cooldown.
    pub fn consume_shot(&mut self) -> bool {
        if !self.can_fire() {
            return false;
        }
        self.current_ammo -= 1;
        self.cooldown_timer = if self.fire_rate > 0.0 { 1.0 / self.fire_rate } else { 0.0 };
        true
    }

    pub fn needs_reload(&self) -> bool {
        self.current_ammo < self.magazine_size
    }

    /// Refill from reserves. Returns rounds loaded.
    pub fn reload_from(&mut self, reserves: &mut AmmoReserves) -> u32 {
        let space = self.magazine_size.saturating_sub(self.current_ammo);
        let loaded = reserves.remove(self.kind, space, Some(space));
        self.current_ammo += loaded;
        loaded
    }

    /// Unit directions of every pellet, evenly fanned around `aim`.
    pub fn pellet_directions(&self, aim: Vec2) -> Vec<Vec2> {
        let base = aim.y.atan2(aim.x);
        let count = self.bullet_count.max(1);

        (0..count)
            .map(|i| {
                let angle = if count > 1 {
                    base + (i as f32 / (count - 1) as f32 - 0.5) * self.spread_angle
                } else {
                    base
                };
                Vec2::from_angle(angle)
            })
            .collect()
    }
}

/// Elemental modifiers applied to every round fired by this actor.
///
/// One entry per element; picking up an element already held replaces it.
#[derive(Component, Debug, Clone, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct ModifierLoadout {
    elements: Vec<Element>,
}

impl ModifierLoadout {
    pub fn new(elements: impl IntoIterator<Item = Element>) -> Self {
        let mut loadout = Self::default();
        for element in elements {
            loadout.pick_up(element);
        }
        loadout
    }

    pub fn pick_up(&mut self, element: Element) {
        self.elements.retain(|held| *held != element);
        self.elements.push(element);
    }

    pub fn remove(&mut self, element: Element) -> bool {
        let before = self.elements.len();
        self.elements.retain(|held| *held != element);
        before != self.elements.len()
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }
}

/// Event: trigger pull towards `aim` (world direction, not normalised).
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct WeaponFireIntent {
    pub shooter: Entity,
    pub aim: Vec2,
}

#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct ReloadIntent {
    pub shooter: Entity,
}

/// Minimum aim vector length; shorter aims (clicking on yourself) are ignored
const MIN_AIM: f32 = 10.0;

/// System: cool weapons down and turn fire intents into projectiles.
pub fn fire_weapons(
    mut commands: Commands,
    time: Res<Time<Fixed>>,
    config: Res<SimulationConfig>,
    mut intents: EventReader<WeaponFireIntent>,
    mut shooters: Query<(&Actor, &WorldPosition, &mut WeaponStats, Option<&ModifierLoadout>), Without<Dead>>,
) {
    let delta = time.delta_secs();
    for (_, _, mut weapon, _) in shooters.iter_mut() {
        if weapon.cooldown_timer > 0.0 {
            weapon.cooldown_timer = (weapon.cooldown_timer - delta).max(0.0);
        }
    }

    let combat = &config.combat;
    for intent in intents.read() {
        let Ok((actor, position, mut weapon, loadout)) = shooters.get_mut(intent.shooter) else {
            continue;
        };
        if intent.aim.length() < MIN_AIM {
            continue;
        }
        if !weapon.consume_shot() {
            continue;
        }

        let elements = loadout.map(|l| l.elements().to_vec()).unwrap_or_default();
        for direction in weapon.pellet_directions(intent.aim) {
            let projectile = Projectile::new(
                Some(intent.shooter),
                actor.faction_id,
                weapon.damage,
                combat.projectile_max_distance,
            )
            .with_payload(elements.iter().copied(), &config.elements);

            spawn_projectile(
                &mut commands,
                ProjectileSpawn {
                    projectile,
                    position: position.0 + direction * combat.projectile_spawn_offset,
                    velocity: direction * combat.projectile_speed,
                },
            );
        }

        crate::log(&format!(
            "🔫 {:?} fired {} pellet(s) ({:?}), ammo {}/{}",
            intent.shooter,
            weapon.bullet_count.max(1),
            weapon.kind,
            weapon.current_ammo,
            weapon.magazine_size
        ));
    }
}

/// System: refill magazines from ammo reserves.
pub fn reload_weapons(
    mut intents: EventReader<ReloadIntent>,
    mut shooters: Query<(&mut WeaponStats, &mut AmmoReserves), Without<Dead>>,
) {
    for intent in intents.read() {
        let Ok((mut weapon, mut reserves)) = shooters.get_mut(intent.shooter) else {
            continue;
        };
        if !weapon.needs_reload() {
            continue;
        }

        let loaded = weapon.reload_from(&mut reserves);
        crate::log(&format!(
            "🔄 {:?} reloaded {} round(s), ammo {}/{} (reserve {})",
            intent.shooter,
            loaded,
            weapon.current_ammo,
            weapon.magazine_size,
            reserves.count(weapon.kind)
        ));
    }
}
