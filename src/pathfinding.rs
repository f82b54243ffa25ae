//! Pathfinding module.
//!
//! This module contains the breadth-first search used for the hint feature. It reads the wall
//! topology of a [`Grid`] and keeps no state between calls.

use std::collections::VecDeque;

use crate::{grid::Grid, types::Coord};

/// Finds the shortest route between two cells through open walls.
///
/// The search explores the grid level by level from `from`, remembering for each discovered cell
/// the cell it was reached from. When `to` is dequeued the route is rebuilt by walking those links
/// backwards, so the returned path starts at `from`, ends at `to`, and has as few steps as
/// possible.
///
/// Returns `None` when either cell is outside the grid or when `to` cannot be reached, which can
/// only happen on a grid whose generation has not finished.
#[must_use]
pub fn shortest_path(grid: &Grid, from: Coord, to: Coord) -> Option<Vec<Coord>> {
    let start_idx = grid.index(from)?;
    let _ = grid.index(to)?;

    let mut came_from: Vec<Option<Coord>> = vec![None; grid.len()];
    let mut discovered = vec![false; grid.len()];
    if let Some(flag) = discovered.get_mut(start_idx) {
        *flag = true;
    }

    let mut queue = VecDeque::from([from]);
    while let Some(coord) = queue.pop_front() {
        if coord == to {
            return Some(rebuild_path(grid, &came_from, from, to));
        }

        for next in grid.open_neighbors(coord) {
            let Some(idx) = grid.index(next) else {
                continue;
            };
            if let Some(flag) = discovered.get_mut(idx) {
                if !*flag {
                    *flag = true;
                    if let Some(link) = came_from.get_mut(idx) {
                        *link = Some(coord);
                    }
                    queue.push_back(next);
                }
            }
        }
    }

    None
}

/// Walks the predecessor links back from `to` and returns the route in travel order.
fn rebuild_path(grid: &Grid, came_from: &[Option<Coord>], from: Coord, to: Coord) -> Vec<Coord> {
    let mut path = vec![to];
    let mut cursor = to;

    while cursor != from {
        let Some(previous) = grid
            .index(cursor)
            .and_then(|idx| came_from.get(idx).copied().flatten())
        else {
            break;
        };
        path.push(previous);
        cursor = previous;
    }

    path.reverse();
    path
}

/// Number of steps in a path, that is one less than the number of cells it visits.
#[must_use]
pub fn path_length(path: &[Coord]) -> usize {
    path.len().saturating_sub(1)
}
