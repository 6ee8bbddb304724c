//! Tests for WeaponStats and ModifierLoadout.

#[cfg(test)]
mod tests {
    use super::super::weapon::*;
    use super::super::Element;
    use crate::components::{AmmoReserves, WeaponKind};
    use bevy::prelude::*;

    #[test]
    fn test_fire_rate_gate() {
        let mut weapon = WeaponStats::for_kind(WeaponKind::Pistol);
        assert!(weapon.can_fire());

        assert!(weapon.consume_shot());
        assert_eq!(weapon.current_ammo, 11);
        assert!(!weapon.can_fire());
        assert!(!weapon.consume_shot());

        weapon.cooldown_timer = 0.0;
        assert!(weapon.consume_shot());
        assert_eq!(weapon.current_ammo, 10);
    }

    #[test]
    fn test_empty_magazine_cannot_fire() {
        let mut weapon = WeaponStats::for_kind(WeaponKind::Smg);
        weapon.current_ammo = 0;
        assert!(!weapon.consume_shot());
    }

    #[test]
    fn test_shotgun_consumes_one_round_per_pull() {
        let mut weapon = WeaponStats::for_kind(WeaponKind::Shotgun);
        let before = weapon.current_ammo;
        assert!(weapon.consume_shot());
        assert_eq!(weapon.current_ammo, before - 1);
        assert_eq!(weapon.pellet_directions(Vec2::X).len(), weapon.bullet_count as usize);
    }

    #[test]
    fn test_pellets_fan_symmetrically() {
        let mut weapon = WeaponStats::for_kind(WeaponKind::Shotgun);
        weapon.bullet_count = 3;
        weapon.spread_angle = std::f32::consts::FRAC_PI_2;

        let directions = weapon.pellet_directions(Vec2::new(5.0, 0.0));
        assert_eq!(directions.len(), 3);
        assert!((directions[1] - Vec2::X).length() < 1e-5);
        assert!((directions[0].y + directions[2].y).abs() < 1e-5);
        assert!((directions[0].angle_to(directions[2]).abs() - std::f32::consts::FRAC_PI_2).abs() < 1e-4);
    }

    #[test]
    fn test_single_bullet_follows_aim() {
        let weapon = WeaponStats::for_kind(WeaponKind::AssaultRifle);
        let directions = weapon.pellet_directions(Vec2::new(0.0, -3.0));
        assert_eq!(directions.len(), 1);
        assert!((directions[0] - Vec2::NEG_Y).length() < 1e-5);
    }

    #[test]
    fn test_reload_takes_from_reserves() {
        let mut weapon = WeaponStats::for_kind(WeaponKind::Pistol);
        let mut reserves = AmmoReserves::default();
        weapon.current_ammo = 2;

        assert_eq!(weapon.reload_from(&mut reserves), 10);
        assert_eq!(weapon.current_ammo, 12);
        assert_eq!(reserves.count(WeaponKind::Pistol), 38);

        // Partial reload when the reserve runs dry
        weapon.current_ammo = 0;
        reserves.set_count(WeaponKind::Pistol, 5);
        assert_eq!(weapon.reload_from(&mut reserves), 5);
        assert_eq!(weapon.current_ammo, 5);
        assert_eq!(reserves.count(WeaponKind::Pistol), 0);
    }

    #[test]
    fn test_loadout_replaces_same_element() {
        let mut loadout = ModifierLoadout::new([Element::Fire, Element::Ice]);
        loadout.pick_up(Element::Fire);
        assert_eq!(loadout.elements(), &[Element::Ice, Element::Fire]);

        assert!(loadout.remove(Element::Ice));
        assert!(!loadout.remove(Element::Ice));
        assert_eq!(loadout.elements(), &[Element::Fire]);
    }
}
