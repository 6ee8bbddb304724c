//! Ammo reserves ledger (rounds carried outside the magazine).

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Weapon families sharing an ammo pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect, Serialize, Deserialize)]
pub enum WeaponKind {
    AssaultRifle,
    Shotgun,
    Pistol,
    Smg,
}

impl WeaponKind {
    pub const ALL: [WeaponKind; 4] = [
        WeaponKind::AssaultRifle,
        WeaponKind::Shotgun,
        WeaponKind::Pistol,
        WeaponKind::Smg,
    ];

    fn index(self) -> usize {
        match self {
            WeaponKind::AssaultRifle => 0,
            WeaponKind::Shotgun => 1,
            WeaponKind::Pistol => 2,
            WeaponKind::Smg => 3,
        }
    }
}

/// Per-kind reserve counts. Counts never go negative.
#[derive(Component, Debug, Clone, PartialEq, Reflect)]
#[reflect(Component)]
pub struct AmmoReserves {
    counts: [u32; 4],
}

impl Default for AmmoReserves {
    /// Four magazines worth for every kind
    fn default() -> Self {
        let mut reserves = Self::empty();
        reserves.set_count(WeaponKind::AssaultRifle, 120);
        reserves.set_count(WeaponKind::Shotgun, 32);
        reserves.set_count(WeaponKind::Pistol, 48);
        reserves.set_count(WeaponKind::Smg, 100);
        reserves
    }
}

impl AmmoReserves {
    pub fn empty() -> Self {
        Self { counts: [0; 4] }
    }

    pub fn count(&self, kind: WeaponKind) -> u32 {
        self.counts[kind.index()]
    }

    pub fn set_count(&mut self, kind: WeaponKind, count: u32) {
        self.counts[kind.index()] = count;
    }

    /// Returns the new count
    pub fn add(&mut self, kind: WeaponKind, amount: u32) -> u32 {
        let slot = &mut self.counts[kind.index()];
        *slot = slot.saturating_add(amount);
        *slot
    }

    /// Remove up to `amount` rounds (and at most `max_remove`, e.g. magazine space).
    /// Returns how many were actually removed.
    pub fn remove(&mut self, kind: WeaponKind, amount: u32, max_remove: Option<u32>) -> u32 {
        let slot = &mut self.counts[kind.index()];
        let mut taken = amount.min(*slot);
        if let Some(limit) = max_remove {
            taken = taken.min(limit);
        }
        *slot -= taken;
        taken
    }

    pub fn has_ammo(&self, kind: WeaponKind, amount: u32) -> bool {
        self.count(kind) >= amount
    }

    pub fn total(&self) -> u32 {
        self.counts.iter().fold(0u32, |acc, c| acc.saturating_add(*c))
    }

    pub fn has_any(&self) -> bool {
        self.total() > 0
    }
}
