//! Grid model module.
//!
//! This module contains the cell arena the rest of the engine works on. It only stores wall and
//! visitation state and answers simple adjacency queries; it knows nothing about how mazes are
//! carved or solved.

use color_eyre::eyre::{ensure, OptionExt as _, Result};

use crate::types::{Coord, Direction};

/// Wall mask with all four walls standing.
const ALL_WALLS: u8 = 0b1111;

/// Largest number of cells accepted along either side of a grid.
pub const MAX_SIDE: usize = 1000;

/// A single maze cell.
///
/// Walls are kept as a bit mask, one bit per [`Direction`], alongside the flag the generator uses
/// to track which cells already belong to the spanning tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    /// Wall bits, set while the wall is standing.
    walls: u8,
    /// Whether the generator has already connected this cell.
    visited: bool,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            walls: ALL_WALLS,
            visited: false,
        }
    }
}

impl Cell {
    /// Returns `true` when the wall facing `direction` is standing.
    #[must_use]
    pub const fn has_wall(&self, direction: Direction) -> bool {
        self.walls & direction.wall_bit() != 0
    }

    /// Returns `true` once the generator has connected this cell to the maze.
    #[must_use]
    pub const fn is_visited(&self) -> bool {
        self.visited
    }

    /// Number of walls still standing around this cell.
    #[cfg(test)]
    pub(crate) const fn wall_count(&self) -> u32 {
        self.walls.count_ones()
    }
}

/// Fixed-size grid of cells with a designated start and goal.
///
/// Cells live in a single row-major vector and are addressed by [`Coord`]. The dimensions are
/// chosen once at construction and never change; the start is always the top-left cell and the
/// goal the bottom-right one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    /// Number of columns.
    cols: usize,
    /// Number of rows.
    rows: usize,
    /// Row-major cell storage.
    cells: Vec<Cell>,
}

impl Grid {
    /// Creates a grid where every cell has all four walls and is unvisited.
    ///
    /// # Errors
    ///
    /// This function returns an error if either dimension is zero or larger than [`MAX_SIDE`].
    pub fn new(cols: usize, rows: usize) -> Result<Self> {
        ensure!(cols >= 1, "maze needs at least one column, got {cols}");
        ensure!(rows >= 1, "maze needs at least one row, got {rows}");
        ensure!(
            cols <= MAX_SIDE && rows <= MAX_SIDE,
            "maze sides are limited to {MAX_SIDE} cells, got {cols}x{rows}"
        );
        let len = cols
            .checked_mul(rows)
            .ok_or_eyre("maze dimensions overflow the cell count")?;

        Ok(Self {
            cols,
            rows,
            cells: vec![Cell::default(); len],
        })
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn cols(&self) -> usize {
        self.cols
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Total number of cells.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.cols * self.rows
    }

    /// Always `false`: a grid holds at least one cell.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// The cell players start from, fixed at the top-left corner.
    #[must_use]
    pub const fn start(&self) -> Coord {
        Coord::new(0, 0)
    }

    /// The cell players must reach, fixed at the bottom-right corner.
    #[must_use]
    pub const fn goal(&self) -> Coord {
        Coord::new(self.cols - 1, self.rows - 1)
    }

    /// Returns `true` if the coordinate lies inside the grid.
    #[must_use]
    pub const fn contains(&self, coord: Coord) -> bool {
        coord.x < self.cols && coord.y < self.rows
    }

    /// Row-major index of a coordinate, if it is inside the grid.
    pub(crate) const fn index(&self, coord: Coord) -> Option<usize> {
        if self.contains(coord) {
            Some(coord.y * self.cols + coord.x)
        } else {
            None
        }
    }

    /// Looks up the cell at a coordinate.
    #[must_use]
    pub fn cell(&self, coord: Coord) -> Option<&Cell> {
        self.index(coord).and_then(|idx| self.cells.get(idx))
    }

    /// Mutable counterpart of [`cell`](Grid::cell), kept private so walls only change in pairs.
    fn cell_mut(&mut self, coord: Coord) -> Option<&mut Cell> {
        self.index(coord).and_then(|idx| self.cells.get_mut(idx))
    }

    /// Iterates over every coordinate in row-major order.
    pub fn coords(&self) -> impl Iterator<Item = Coord> {
        let cols = self.cols;
        (0..self.len()).map(move |idx| Coord::new(idx % cols, idx / cols))
    }

    /// Returns the in-bounds cell one step away in `direction`, regardless of walls.
    #[must_use]
    pub fn neighbor(&self, coord: Coord, direction: Direction) -> Option<Coord> {
        coord
            .step(direction)
            .filter(|&next| self.contains(next))
    }

    /// Returns the grid-adjacent cells of `coord`, ignoring walls.
    ///
    /// Neighbours are listed north, south, east, west, skipping those outside the grid, so the
    /// result holds between zero and four coordinates.
    #[must_use]
    pub fn neighbors(&self, coord: Coord) -> Vec<Coord> {
        if !self.contains(coord) {
            return Vec::new();
        }

        Direction::ALL
            .into_iter()
            .filter_map(|direction| self.neighbor(coord, direction))
            .collect()
    }

    /// Returns `true` if the wall on `coord` facing `direction` is standing.
    ///
    /// Cells outside the grid count as fully walled.
    #[must_use]
    pub fn has_wall(&self, coord: Coord, direction: Direction) -> bool {
        self.cell(coord).map_or(true, |cell| cell.has_wall(direction))
    }

    /// Returns `true` if `coord` and its neighbour in `direction` are joined by a passage.
    #[must_use]
    pub fn is_open(&self, coord: Coord, direction: Direction) -> bool {
        self.neighbor(coord, direction).is_some() && !self.has_wall(coord, direction)
    }

    /// Cells reachable from `coord` in a single step through an open wall.
    #[must_use]
    pub fn open_neighbors(&self, coord: Coord) -> Vec<Coord> {
        Direction::ALL
            .into_iter()
            .filter(|&direction| self.is_open(coord, direction))
            .filter_map(|direction| self.neighbor(coord, direction))
            .collect()
    }

    /// Removes the wall separating two adjacent cells, on both sides at once.
    ///
    /// Removing an already open wall is harmless.
    ///
    /// # Panics
    ///
    /// This function panics if either cell lies outside the grid or if the cells are not
    /// orthogonally adjacent. Both are logic errors in the caller.
    pub fn remove_wall_between(&mut self, a: Coord, b: Coord) {
        let direction = a
            .direction_to(b)
            .unwrap_or_else(|| panic!("cells {a:?} and {b:?} are not adjacent"));
        assert!(
            self.contains(a) && self.contains(b),
            "cells {a:?} and {b:?} must both lie inside a {}x{} grid",
            self.cols,
            self.rows
        );

        if let Some(cell) = self.cell_mut(a) {
            cell.walls &= !direction.wall_bit();
        }
        if let Some(cell) = self.cell_mut(b) {
            cell.walls &= !direction.opposite().wall_bit();
        }
    }

    /// Marks a cell as part of the spanning tree.
    pub fn mark_visited(&mut self, coord: Coord) {
        if let Some(cell) = self.cell_mut(coord) {
            cell.visited = true;
        }
    }

    /// Returns `true` if the generator has connected the cell; out-of-bounds cells never are.
    #[must_use]
    pub fn is_visited(&self, coord: Coord) -> bool {
        self.cell(coord).is_some_and(Cell::is_visited)
    }

    /// Restores every cell to all walls standing and unvisited.
    pub fn reset_generation_marks(&mut self) {
        self.cells.fill(Cell::default());
    }

    /// Counts the passages in the grid.
    ///
    /// Each passage is counted once, by looking only at the south and east side of every cell.
    #[must_use]
    pub fn open_passages(&self) -> usize {
        self.coords()
            .map(|coord| {
                usize::from(self.is_open(coord, Direction::South))
                    + usize::from(self.is_open(coord, Direction::East))
            })
            .sum()
    }

    /// Checks that every wall agrees with the matching wall of its neighbour.
    #[cfg(test)]
    pub(crate) fn walls_are_symmetric(&self) -> bool {
        self.coords().all(|coord| {
            [Direction::South, Direction::East]
                .into_iter()
                .all(|direction| match self.neighbor(coord, direction) {
                    Some(next) => {
                        self.has_wall(coord, direction) == self.has_wall(next, direction.opposite())
                    }
                    None => true,
                })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_zero_dimensions() {
        assert!(Grid::new(0, 5).is_err());
        assert!(Grid::new(5, 0).is_err());
        assert!(Grid::new(0, 0).is_err());
    }

    #[test]
    fn test_new_rejects_oversized_dimensions() {
        assert!(Grid::new(usize::MAX / 2, 3).is_err(), "cell count would overflow");
        assert!(Grid::new(3, usize::MAX).is_err(), "cell count would overflow");
        assert!(Grid::new(100_000, 100_000).is_err(), "grid would not fit in memory");
        assert!(Grid::new(MAX_SIDE + 1, 1).is_err());

        let grid = Grid::new(MAX_SIDE, 2).expect("largest side is accepted");
        assert_eq!(grid.len(), MAX_SIDE * 2);
    }

    #[test]
    fn test_new_starts_fully_walled() {
        let grid = Grid::new(4, 3).expect("valid dimensions");

        assert_eq!(grid.len(), 12);
        for coord in grid.coords() {
            let cell = grid.cell(coord).expect("coordinate comes from the grid");
            assert_eq!(cell.wall_count(), 4, "cell {coord:?} should be closed");
            assert!(!cell.is_visited(), "cell {coord:?} should be unvisited");
        }
        assert_eq!(grid.open_passages(), 0);
    }

    #[test]
    fn test_start_and_goal_are_corners() {
        let grid = Grid::new(7, 5).expect("valid dimensions");

        assert_eq!(grid.start(), Coord::new(0, 0));
        assert_eq!(grid.goal(), Coord::new(6, 4));
    }

    #[test]
    fn test_single_cell_grid() {
        let grid = Grid::new(1, 1).expect("valid dimensions");

        assert_eq!(grid.start(), grid.goal());
        assert!(grid.neighbors(grid.start()).is_empty());
    }

    #[test]
    fn test_neighbors_respect_bounds() {
        let grid = Grid::new(3, 3).expect("valid dimensions");

        assert_eq!(
            grid.neighbors(Coord::new(0, 0)),
            vec![Coord::new(0, 1), Coord::new(1, 0)]
        );
        assert_eq!(grid.neighbors(Coord::new(1, 0)).len(), 3);
        assert_eq!(grid.neighbors(Coord::new(1, 1)).len(), 4);
        assert!(grid.neighbors(Coord::new(3, 3)).is_empty());
    }

    #[test]
    fn test_remove_wall_between_clears_both_sides() {
        let mut grid = Grid::new(2, 2).expect("valid dimensions");
        let a = Coord::new(0, 0);
        let b = Coord::new(1, 0);

        grid.remove_wall_between(a, b);

        assert!(!grid.has_wall(a, Direction::East));
        assert!(!grid.has_wall(b, Direction::West));
        assert!(grid.has_wall(a, Direction::South));
        assert!(grid.walls_are_symmetric());
        assert_eq!(grid.open_passages(), 1);

        grid.remove_wall_between(b, a);
        assert_eq!(grid.open_passages(), 1, "removing twice should be harmless");
    }

    #[test]
    #[should_panic(expected = "not adjacent")]
    fn test_remove_wall_between_rejects_distant_cells() {
        let mut grid = Grid::new(3, 3).expect("valid dimensions");
        grid.remove_wall_between(Coord::new(0, 0), Coord::new(1, 1));
    }

    #[test]
    #[should_panic(expected = "must both lie inside")]
    fn test_remove_wall_between_rejects_out_of_bounds() {
        let mut grid = Grid::new(2, 2).expect("valid dimensions");
        grid.remove_wall_between(Coord::new(1, 1), Coord::new(2, 1));
    }

    #[test]
    fn test_open_neighbors_follow_walls() {
        let mut grid = Grid::new(3, 1).expect("valid dimensions");
        grid.remove_wall_between(Coord::new(0, 0), Coord::new(1, 0));

        assert_eq!(grid.open_neighbors(Coord::new(1, 0)), vec![Coord::new(0, 0)]);
        assert!(grid.open_neighbors(Coord::new(2, 0)).is_empty());
    }

    #[test]
    fn test_reset_generation_marks() {
        let mut grid = Grid::new(2, 2).expect("valid dimensions");
        grid.remove_wall_between(Coord::new(0, 0), Coord::new(0, 1));
        grid.mark_visited(Coord::new(0, 1));

        grid.reset_generation_marks();

        assert_eq!(grid, Grid::new(2, 2).expect("valid dimensions"));
    }

    #[test]
    fn test_outside_cells_are_walled_and_unvisited() {
        let mut grid = Grid::new(2, 2).expect("valid dimensions");
        grid.mark_visited(Coord::new(5, 5));

        assert!(grid.has_wall(Coord::new(5, 5), Direction::North));
        assert!(!grid.is_visited(Coord::new(5, 5)));
        assert!(grid.cell(Coord::new(2, 0)).is_none());
    }
}
