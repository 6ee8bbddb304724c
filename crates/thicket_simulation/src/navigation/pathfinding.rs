//! A* over a freshly sampled occupancy grid.
//!
//! - 8-directional moves, cost 1 (axis) / √2 (diagonal)
//! - Manhattan heuristic (not admissible with diagonals; paths are valid, not always optimal)
//! - Open set is a plain Vec scanned linearly: lowest f wins, earliest entry wins ties
//!
//! "No path" is an empty Vec, never an error.

use bevy::prelude::*;

use super::collision::CollisionWorld;
use super::grid::GridCoord;
use super::occupancy::{GridRegion, OccupancyGrid};
use crate::config::PathfindingConfig;

const NEIGHBOURS: [(i32, i32); 8] = [
    (0, -1),
    (1, 0),
    (0, 1),
    (-1, 0),
    (1, -1),
    (1, 1),
    (-1, 1),
    (-1, -1),
];

/// World-space path between two points, avoiding fixed obstacles.
///
/// The returned waypoints are tile centres, excluding the start tile. When start
/// and end share a tile the result is that tile's centre.
pub fn find_path(
    world: &impl CollisionWorld,
    start: Vec2,
    end: Vec2,
    config: &PathfindingConfig,
    exclude: Option<Entity>,
) -> Vec<Vec2> {
    let tile_size = config.tile_size;
    let start_tile = GridCoord::from_world(start, tile_size);
    let end_tile = GridCoord::from_world(end, tile_size);

    let region = GridRegion::around(start_tile, end_tile, config.search_padding_tiles);
    let grid = OccupancyGrid::sample(world, region, tile_size, config.obstacle_padding_tiles, exclude);

    search(&grid, start_tile, end_tile)
        .into_iter()
        .map(|coord| coord.to_world_center(tile_size))
        .collect()
}

/// Tile sequence from `start` (exclusive) to `goal` (inclusive). Empty when unreachable.
pub fn search(grid: &OccupancyGrid, start: GridCoord, goal: GridCoord) -> Vec<GridCoord> {
    let (Some(start_index), Some(goal_index)) = (grid.index_of(start), grid.index_of(goal)) else {
        return Vec::new();
    };

    if start_index == goal_index {
        return vec![goal];
    }
    if grid.is_blocked(goal) {
        return Vec::new();
    }

    let len = grid.len();
    let mut g_score = vec![f32::INFINITY; len];
    let mut f_score = vec![f32::INFINITY; len];
    let mut parent: Vec<Option<usize>> = vec![None; len];
    let mut closed = vec![false; len];
    let mut in_open = vec![false; len];
    let mut open: Vec<usize> = Vec::new();

    g_score[start_index] = 0.0;
    f_score[start_index] = manhattan(start, goal);
    open.push(start_index);
    in_open[start_index] = true;

    while !open.is_empty() {
        let mut best = 0;
        for (slot, &index) in open.iter().enumerate().skip(1) {
            if f_score[index] < f_score[open[best]] {
                best = slot;
            }
        }
        let current = open.remove(best);
        in_open[current] = false;

        if current == goal_index {
            return reconstruct(grid, &parent, start_index, goal_index);
        }

        closed[current] = true;
        let current_coord = grid.coord_of(current);

        for (dx, dy) in NEIGHBOURS {
            let neighbour_coord = current_coord.offset(dx, dy);
            let Some(neighbour) = grid.index_of(neighbour_coord) else {
                continue;
            };
            if closed[neighbour] || grid.is_blocked(neighbour_coord) {
                continue;
            }

            let step = if dx != 0 && dy != 0 { std::f32::consts::SQRT_2 } else { 1.0 };
            let tentative = g_score[current] + step;
            if tentative >= g_score[neighbour] {
                continue;
            }

            parent[neighbour] = Some(current);
            g_score[neighbour] = tentative;
            f_score[neighbour] = tentative + manhattan(neighbour_coord, goal);
            if !in_open[neighbour] {
                open.push(neighbour);
                in_open[neighbour] = true;
            }
        }
    }

    Vec::new()
}

fn manhattan(a: GridCoord, b: GridCoord) -> f32 {
    ((a.x - b.x).abs() + (a.y - b.y).abs()) as f32
}

fn reconstruct(
    grid: &OccupancyGrid,
    parent: &[Option<usize>],
    start_index: usize,
    goal_index: usize,
) -> Vec<GridCoord> {
    let mut path = Vec::new();
    let mut cursor = goal_index;
    while cursor != start_index {
        path.push(grid.coord_of(cursor));
        match parent[cursor] {
            Some(previous) => cursor = previous,
            None => break,
        }
    }
    path.reverse();
    path
}
