//! Movement validation module.

use crate::{
    grid::Grid,
    types::{Coord, Direction},
};

/// Result of a requested single-step move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveOutcome {
    /// Whether the move went through.
    pub allowed: bool,
    /// Cell the player occupies after the move; unchanged when the move was refused.
    pub cell: Coord,
}

/// Checks a one-cell move from `from` in `direction` against the walls of the grid.
///
/// The move is allowed only if the wall of `from` facing `direction` is open and the target cell
/// lies inside the grid. Outer walls are never carved, so the bounds check only matters for grids
/// that were tampered with or cells that were never part of the grid.
#[must_use]
pub fn try_move(grid: &Grid, from: Coord, direction: Direction) -> MoveOutcome {
    match grid.neighbor(from, direction) {
        Some(target) if grid.contains(from) && !grid.has_wall(from, direction) => MoveOutcome {
            allowed: true,
            cell: target,
        },
        _ => MoveOutcome {
            allowed: false,
            cell: from,
        },
    }
}
