//! Status effects: timed, periodically ticking elemental effects on a target.
//!
//! One slot per element. Re-applying an element replaces the slot (fire raises
//! its tick damage up to a cap); ice slows the target once and restores the
//! cached speed when the effect ends.

use bevy::prelude::*;

use crate::combat::{DamageFeed, DamageDealt, Dead, Element, ElementConfig, ElementTable, EntityDied};
use crate::components::{Health, MovementSpeed};

/// One live effect instance.
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct StatusEffect {
    pub element: Element,
    /// Seconds left
    pub remaining: f32,
    pub damage_per_tick: u32,
    pub tick_interval: f32,
    /// Seconds since the last damage tick (or since application)
    pub since_last_tick: f32,
    /// This effect holds the target's slow
    pub slows: bool,
}

impl StatusEffect {
    pub fn is_active(&self) -> bool {
        self.remaining > 0.0
    }
}

/// Damage produced by one effect tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectTick {
    pub element: Element,
    pub damage: u32,
}

#[derive(Component, Debug, Clone, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct StatusEffects {
    slots: [Option<StatusEffect>; Element::COUNT],
    /// Pre-slow movement speed; Some while a slow is applied
    original_speed: Option<f32>,
}

impl StatusEffects {
    pub fn get(&self, element: Element) -> Option<&StatusEffect> {
        self.slots[element.index()].as_ref()
    }

    pub fn has(&self, element: Element) -> bool {
        self.slots[element.index()].is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Element types currently active (read-only view for visuals).
    pub fn active_elements(&self) -> impl Iterator<Item = Element> + '_ {
        self.slots.iter().flatten().map(|effect| effect.element)
    }

    pub fn is_slowed(&self) -> bool {
        self.original_speed.is_some()
    }

    pub fn original_speed(&self) -> Option<f32> {
        self.original_speed
    }

    /// Apply `element` from the tuning table. Returns the new instance, or
    /// `None` when the element has no configuration (skipped).
    pub fn apply(
        &mut self,
        element: Element,
        table: &ElementTable,
        speed: &mut MovementSpeed,
    ) -> Option<StatusEffect> {
        let config = table.get(element)?;
        Some(self.apply_config(element, config, speed))
    }

    pub fn apply_config(
        &mut self,
        element: Element,
        config: &ElementConfig,
        speed: &mut MovementSpeed,
    ) -> StatusEffect {
        let slot = &mut self.slots[element.index()];

        let damage_per_tick = match (config.buildup, slot.as_ref()) {
            (Some(buildup), Some(existing)) => existing
                .damage_per_tick
                .saturating_add(buildup.increment)
                .min(buildup.cap),
            _ => config.damage,
        };

        let effect = StatusEffect {
            element,
            remaining: config.effect_duration,
            damage_per_tick,
            tick_interval: config.tick_interval,
            since_last_tick: 0.0,
            slows: config.slow_factor.is_some(),
        };
        *slot = Some(effect);

        if let Some(factor) = config.slow_factor {
            // Only the first application multiplies the speed
            if self.original_speed.is_none() {
                self.original_speed = Some(speed.speed);
                speed.speed *= factor;
            }
        }

        effect
    }

    /// Advance every effect by `delta` seconds.
    ///
    /// Returns the damage ticks due this pass. Expired effects are dropped after
    /// the whole pass, restoring speed when the slowing effect ends.
    pub fn tick(&mut self, delta: f32, speed: &mut MovementSpeed) -> Vec<EffectTick> {
        let mut ticks = Vec::new();

        for effect in self.slots.iter_mut().flatten() {
            effect.remaining -= delta;
            effect.since_last_tick += delta;

            if effect.remaining > 0.0 && effect.since_last_tick >= effect.tick_interval {
                effect.since_last_tick = 0.0;
                ticks.push(EffectTick {
                    element: effect.element,
                    damage: effect.damage_per_tick,
                });
            }
        }

        let mut restore = false;
        for slot in self.slots.iter_mut() {
            if let Some(effect) = slot {
                if !effect.is_active() {
                    restore |= effect.slows;
                    *slot = None;
                }
            }
        }
        if restore && !self.slots.iter().flatten().any(|effect| effect.slows) {
            self.restore_speed(speed);
        }

        ticks
    }

    /// Drop every effect (death, cleanse).
    pub fn clear_all(&mut self, speed: &mut MovementSpeed) {
        self.slots = [None; Element::COUNT];
        self.restore_speed(speed);
    }

    fn restore_speed(&mut self, speed: &mut MovementSpeed) {
        if let Some(original) = self.original_speed.take() {
            speed.speed = original;
        }
    }
}

/// System: per-tick status-effect pass.
///
/// Runs after hit resolution. A freshly applied effect starts its interval
/// clock at zero.
pub fn tick_status_effects(
    time: Res<Time<Fixed>>,
    mut feed: ResMut<DamageFeed>,
    mut targets: Query<(Entity, &mut StatusEffects, &mut MovementSpeed, &mut Health), Without<Dead>>,
    mut damage_events: EventWriter<DamageDealt>,
    mut death_events: EventWriter<EntityDied>,
) {
    let delta = time.delta_secs();
    let now = time.elapsed_secs();

    for (entity, mut effects, mut speed, mut health) in targets.iter_mut() {
        if effects.is_empty() {
            continue;
        }

        for effect_tick in effects.tick(delta, &mut speed) {
            if health.is_dead() {
                break;
            }

            let killed = health.take_damage(effect_tick.damage);
            feed.record_status_tick(entity, effect_tick.element, effect_tick.damage, now);

            damage_events.write(DamageDealt {
                attacker: None,
                target: entity,
                damage: effect_tick.damage,
                critical: false,
                element: Some(effect_tick.element),
                target_died: killed,
            });

            if killed {
                death_events.write(EntityDied {
                    entity,
                    killer: None,
                });
                crate::logger::log_info(&format!(
                    "{:?} succumbed to {}",
                    entity,
                    effect_tick.element.name()
                ));
            }
        }
    }
}
