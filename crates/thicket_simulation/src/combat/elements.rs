//! Elemental modifier types and their tuning table.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Closed set of elemental modifiers a projectile can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Reflect, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Element {
    Fire,
    Lightning,
    Ice,
    Poison,
}

impl Element {
    pub const COUNT: usize = 4;

    pub const ALL: [Element; Element::COUNT] =
        [Element::Fire, Element::Lightning, Element::Ice, Element::Poison];

    /// Slot in fixed-size per-element arrays
    pub const fn index(self) -> usize {
        match self {
            Element::Fire => 0,
            Element::Lightning => 1,
            Element::Ice => 2,
            Element::Poison => 3,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Element::Fire => "fire",
            Element::Lightning => "lightning",
            Element::Ice => "ice",
            Element::Poison => "poison",
        }
    }
}

/// Re-application raises per-tick damage by `increment`, never above `cap`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DamageBuildup {
    pub increment: u32,
    pub cap: u32,
}

/// Area spread on impact.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChainConfig {
    pub range: f32,
    /// Secondary targets at most
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementConfig {
    /// How long a fired round keeps carrying this element (seconds)
    pub payload_duration: f32,
    /// Status-effect lifetime on the target (seconds)
    pub effect_duration: f32,
    pub damage: u32,
    pub tick_interval: f32,
    #[serde(default)]
    pub buildup: Option<DamageBuildup>,
    /// Movement speed multiplier while the effect is active
    #[serde(default)]
    pub slow_factor: Option<f32>,
    #[serde(default)]
    pub chain: Option<ChainConfig>,
}

impl ElementConfig {
    fn base(damage: u32) -> Self {
        Self {
            payload_duration: 5.0,
            effect_duration: 3.0,
            damage,
            tick_interval: 0.3,
            buildup: None,
            slow_factor: None,
            chain: None,
        }
    }

    pub fn default_for(element: Element) -> Self {
        match element {
            Element::Fire => Self {
                buildup: Some(DamageBuildup { increment: 1, cap: 10 }),
                ..Self::base(4)
            },
            Element::Lightning => Self {
                chain: Some(ChainConfig { range: 150.0, count: 3 }),
                ..Self::base(8)
            },
            Element::Ice => Self {
                slow_factor: Some(0.3),
                ..Self::base(2)
            },
            Element::Poison => Self::base(8),
        }
    }
}

/// Per-element tuning. A `None` entry disables that element: modifiers of that
/// type are skipped during resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElementTable {
    pub fire: Option<ElementConfig>,
    pub lightning: Option<ElementConfig>,
    pub ice: Option<ElementConfig>,
    pub poison: Option<ElementConfig>,
}

impl Default for ElementTable {
    fn default() -> Self {
        Self {
            fire: Some(ElementConfig::default_for(Element::Fire)),
            lightning: Some(ElementConfig::default_for(Element::Lightning)),
            ice: Some(ElementConfig::default_for(Element::Ice)),
            poison: Some(ElementConfig::default_for(Element::Poison)),
        }
    }
}

impl ElementTable {
    pub fn get(&self, element: Element) -> Option<&ElementConfig> {
        match element {
            Element::Fire => self.fire.as_ref(),
            Element::Lightning => self.lightning.as_ref(),
            Element::Ice => self.ice.as_ref(),
            Element::Poison => self.poison.as_ref(),
        }
    }

    /// Configured elements in `Element::ALL` order.
    pub fn iter(&self) -> impl Iterator<Item = (Element, &ElementConfig)> + '_ {
        Element::ALL
            .into_iter()
            .filter_map(|element| self.get(element).map(|config| (element, config)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table() {
        let table = ElementTable::default();
        assert_eq!(table.iter().count(), 4);

        let fire = table.get(Element::Fire).unwrap();
        assert_eq!(fire.damage, 4);
        assert_eq!(fire.buildup, Some(DamageBuildup { increment: 1, cap: 10 }));

        let ice = table.get(Element::Ice).unwrap();
        assert_eq!(ice.slow_factor, Some(0.3));

        let lightning = table.get(Element::Lightning).unwrap();
        assert_eq!(lightning.chain.map(|c| c.count), Some(3));
        assert!(table.get(Element::Poison).unwrap().buildup.is_none());
    }

    #[test]
    fn test_indices_match_all_order() {
        for (slot, element) in Element::ALL.iter().enumerate() {
            assert_eq!(element.index(), slot);
        }
    }

    #[test]
    fn test_element_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Element::Lightning).unwrap(), "\"lightning\"");
        let parsed: Element = serde_json::from_str("\"ice\"").unwrap();
        assert_eq!(parsed, Element::Ice);
    }
}
