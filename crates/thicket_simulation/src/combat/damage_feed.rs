//! Damage feed: read-only damage history for floating numbers / hit markers.
//!
//! Normal hits on the same target within the grace window merge into one
//! entry. Criticals and status ticks always get their own entry.

use bevy::prelude::*;

use crate::combat::Element;
use crate::config::SimulationConfig;

/// Entries stay readable this long after their last update (seconds)
pub const FEED_DISPLAY_SECS: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedKind {
    Normal,
    Critical,
    Status(Element),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeedEntry {
    pub target: Entity,
    pub amount: u32,
    pub kind: FeedKind,
    /// Hits merged into this entry
    pub hits: u32,
    pub first_at: f32,
    pub last_at: f32,
}

#[derive(Resource, Debug, Clone)]
pub struct DamageFeed {
    entries: Vec<FeedEntry>,
    grace: f32,
}

impl Default for DamageFeed {
    fn default() -> Self {
        Self::new(0.3)
    }
}

impl DamageFeed {
    pub fn new(grace: f32) -> Self {
        Self {
            entries: Vec::new(),
            grace,
        }
    }

    pub fn grace(&self) -> f32 {
        self.grace
    }

    pub fn set_grace(&mut self, grace: f32) {
        self.grace = grace.max(0.0);
    }

    pub fn entries(&self) -> &[FeedEntry] {
        &self.entries
    }

    pub fn entries_for(&self, target: Entity) -> impl Iterator<Item = &FeedEntry> + '_ {
        self.entries.iter().filter(move |entry| entry.target == target)
    }

    pub fn record_hit(&mut self, target: Entity, amount: u32, critical: bool, now: f32) {
        if critical {
            self.push(target, amount, FeedKind::Critical, now);
            return;
        }

        let grace = self.grace;
        let open = self.entries.iter_mut().rev().find(|entry| {
            entry.target == target && entry.kind == FeedKind::Normal && now - entry.last_at <= grace
        });

        match open {
            Some(entry) => {
                entry.amount = entry.amount.saturating_add(amount);
                entry.hits += 1;
                entry.last_at = now;
            }
            None => self.push(target, amount, FeedKind::Normal, now),
        }
    }

    pub fn record_status_tick(&mut self, target: Entity, element: Element, amount: u32, now: f32) {
        self.push(target, amount, FeedKind::Status(element), now);
    }

    fn push(&mut self, target: Entity, amount: u32, kind: FeedKind, now: f32) {
        self.entries.push(FeedEntry {
            target,
            amount,
            kind,
            hits: 1,
            first_at: now,
            last_at: now,
        });
    }

    /// Drop entries nobody will display any more.
    pub fn prune(&mut self, now: f32) {
        let keep_for = self.grace + FEED_DISPLAY_SECS;
        self.entries.retain(|entry| now - entry.last_at <= keep_for);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// System: keep grace in sync with config and prune stale entries.
pub fn update_damage_feed(
    time: Res<Time<Fixed>>,
    config: Res<SimulationConfig>,
    mut feed: ResMut<DamageFeed>,
) {
    if feed.grace() != config.combat.damage_feed_grace {
        feed.set_grace(config.combat.damage_feed_grace);
    }
    feed.prune(time.elapsed_secs());
}
