//! Lightning chaining: secondary target selection, overlap guard, bolt shape.

use bevy::prelude::*;
use rand::Rng;

/// Nearest `count` candidates within `range` of `origin`.
///
/// Ties on distance keep the candidates' input order.
pub fn select_chain_targets(
    origin: Vec2,
    candidates: impl IntoIterator<Item = (Entity, Vec2)>,
    range: f32,
    count: usize,
) -> Vec<Entity> {
    let range_sq = range * range;

    let mut in_range: Vec<(Entity, f32)> = candidates
        .into_iter()
        .map(|(entity, position)| (entity, origin.distance_squared(position)))
        .filter(|(_, distance_sq)| *distance_sq <= range_sq)
        .collect();

    in_range.sort_by(|a, b| a.1.total_cmp(&b.1));
    in_range.truncate(count);
    in_range.into_iter().map(|(entity, _)| entity).collect()
}

/// True when a live lightning field sits within `radius` of `origin`.
pub fn overlaps_field(origin: Vec2, fields: impl IntoIterator<Item = Vec2>, radius: f32) -> bool {
    let radius_sq = radius * radius;
    fields
        .into_iter()
        .any(|field| origin.distance_squared(field) <= radius_sq)
}

/// Jagged polyline from `from` to `to`.
///
/// Endpoints are exact; the `segments - 1` inner points are displaced
/// perpendicular to the segment by up to `jitter`.
pub fn bolt_points(from: Vec2, to: Vec2, segments: usize, jitter: f32, rng: &mut impl Rng) -> Vec<Vec2> {
    let segments = segments.max(1);
    let along = to - from;
    let normal = along.perp().normalize_or_zero();

    let mut points = Vec::with_capacity(segments + 1);
    points.push(from);
    for step in 1..segments {
        let t = step as f32 / segments as f32;
        let offset = if jitter > 0.0 {
            rng.gen_range(-jitter..=jitter)
        } else {
            0.0
        };
        points.push(from + along * t + normal * offset);
    }
    points.push(to);
    points
}
