//! Line-of-sight oracle.

use bevy::prelude::*;

use super::collision::CollisionWorld;

/// True when no collider outside `ignore` crosses the segment `from → to`.
///
/// Coincident points always see each other.
pub fn has_line_of_sight(world: &impl CollisionWorld, from: Vec2, to: Vec2, ignore: &[Entity]) -> bool {
    let separation = to - from;
    let distance = separation.length();

    let Ok(direction) = Dir2::new(separation) else {
        return true;
    };

    !world
        .raycast(from, direction, distance)
        .iter()
        .any(|hit| !ignore.contains(&hit.entity))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::{Collider, ColliderSet};

    #[test]
    fn test_clear_segment() {
        let set = ColliderSet::new();
        assert!(has_line_of_sight(&set, Vec2::ZERO, Vec2::new(100.0, 0.0), &[]));
    }

    #[test]
    fn test_tree_blocks_sight() {
        let mut set = ColliderSet::new();
        set.insert(Entity::from_raw(1), Vec2::new(50.0, 0.0), &Collider::fixed(Vec2::splat(16.0)));

        assert!(!has_line_of_sight(&set, Vec2::ZERO, Vec2::new(100.0, 0.0), &[]));
        // Obstacle beyond the target does not count
        assert!(has_line_of_sight(&set, Vec2::ZERO, Vec2::new(30.0, 0.0), &[]));
    }

    #[test]
    fn test_ignore_set_skips_self_and_target() {
        let mut set = ColliderSet::new();
        let me = Entity::from_raw(1);
        let player = Entity::from_raw(2);
        set.insert(me, Vec2::ZERO, &Collider::active(Vec2::splat(16.0)));
        set.insert(player, Vec2::new(100.0, 0.0), &Collider::active(Vec2::splat(16.0)));

        assert!(!has_line_of_sight(&set, Vec2::ZERO, Vec2::new(100.0, 0.0), &[]));
        assert!(has_line_of_sight(&set, Vec2::ZERO, Vec2::new(100.0, 0.0), &[me, player]));
    }

    #[test]
    fn test_other_actor_blocks_sight() {
        let mut set = ColliderSet::new();
        set.insert(Entity::from_raw(5), Vec2::new(50.0, 0.0), &Collider::active(Vec2::splat(16.0)));
        assert!(!has_line_of_sight(&set, Vec2::ZERO, Vec2::new(100.0, 0.0), &[]));
    }

    #[test]
    fn test_coincident_points() {
        let mut set = ColliderSet::new();
        set.insert(Entity::from_raw(1), Vec2::ZERO, &Collider::fixed(Vec2::splat(16.0)));
        assert!(has_line_of_sight(&set, Vec2::ZERO, Vec2::ZERO, &[]));
    }
}
