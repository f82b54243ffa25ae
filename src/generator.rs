//! Maze generation module.
//!
//! This module carves a perfect maze into a [`Grid`] one step at a time so that callers can
//! animate the process, drawing the grid between calls to [`MazeGenerator::step`]. Two carving
//! strategies are available, selected through [`Algorithm`].

use clap::ValueEnum;
use rand::{seq::IndexedRandom as _, Rng};
use tracing::{debug, trace};

use crate::{grid::Grid, types::Coord};

/// Carving strategy used to build the spanning tree.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Algorithm {
    /// Depth-first search with an explicit backtracking stack. Produces long, winding corridors.
    #[default]
    Backtracker,
    /// Randomised frontier growth in the style of Prim's algorithm. Produces short dead ends and
    /// a more branching layout.
    Frontier,
}

impl Algorithm {
    /// Human readable name of the strategy.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Backtracker => "Depth-first backtracker",
            Self::Frontier => "Randomized frontier",
        }
    }
}

/// Working set of the strategy in use.
#[derive(Clone, Debug)]
enum Strategy {
    /// Cells on the current depth-first path; the last one is the carving head.
    Backtracker {
        /// Visitation stack.
        stack: Vec<Coord>,
    },
    /// Candidate walls between the visited region and its surroundings.
    Frontier {
        /// Candidate edges. Stale edges are allowed and dropped when drawn.
        edges: Vec<(Coord, Coord)>,
    },
}

/// Resumable maze generator.
///
/// A generator only exists once [`start`](MazeGenerator::start) has prepared its working set, so
/// there is no way to step a generator that was never started. It owns its random source,
/// which makes a run fully reproducible from the seed of that source.
#[derive(Clone, Debug)]
pub struct MazeGenerator<R> {
    /// Strategy-specific working set.
    strategy: Strategy,
    /// Source of the uniform choices made while carving.
    rng: R,
    /// Cell most recently touched, for drawing the carving head.
    current: Option<Coord>,
    /// Number of walls removed so far.
    carved: usize,
}

impl<R: Rng> MazeGenerator<R> {
    /// Prepares a new generation run over `grid`.
    ///
    /// The grid is reset to all walls standing, then the start cell is marked visited and seeded
    /// into the working set of the chosen algorithm.
    pub fn start(grid: &mut Grid, algorithm: Algorithm, rng: R) -> Self {
        grid.reset_generation_marks();

        let start = grid.start();
        grid.mark_visited(start);

        let strategy = match algorithm {
            Algorithm::Backtracker => Strategy::Backtracker { stack: vec![start] },
            Algorithm::Frontier => {
                let mut edges = Vec::new();
                push_frontier_edges(grid, start, &mut edges);
                Strategy::Frontier { edges }
            }
        };

        debug!(
            algorithm = algorithm.label(),
            cols = grid.cols(),
            rows = grid.rows(),
            "maze generation started"
        );

        Self {
            strategy,
            rng,
            current: Some(start),
            carved: 0,
        }
    }

    /// Performs one unit of carving work.
    ///
    /// Returns whether more work remains after this step. Once it has returned `false`, further
    /// calls do nothing and keep returning `false`.
    pub fn step(&mut self, grid: &mut Grid) -> bool {
        let was_running = !self.is_complete();
        let more = match &mut self.strategy {
            Strategy::Backtracker { stack } => {
                backtracker_step(grid, stack, &mut self.rng, &mut self.current, &mut self.carved)
            }
            Strategy::Frontier { edges } => {
                frontier_step(grid, edges, &mut self.rng, &mut self.current, &mut self.carved)
            }
        };

        if !more {
            self.current = None;
            if was_running {
                debug!(carved = self.carved, "maze generation finished");
            }
        }

        more
    }

    /// Runs the generator until the maze is complete and returns the number of steps taken.
    #[cfg(test)]
    pub(crate) fn run_to_completion(&mut self, grid: &mut Grid) -> usize {
        let mut steps = 0;
        while self.step(grid) {
            steps += 1;
        }

        steps
    }
}

impl<R> MazeGenerator<R> {
    /// Strategy this generator was started with.
    #[must_use]
    pub const fn algorithm(&self) -> Algorithm {
        match self.strategy {
            Strategy::Backtracker { .. } => Algorithm::Backtracker,
            Strategy::Frontier { .. } => Algorithm::Frontier,
        }
    }

    /// Returns `true` once the working set has been exhausted.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        match &self.strategy {
            Strategy::Backtracker { stack } => stack.is_empty(),
            Strategy::Frontier { edges } => edges.is_empty(),
        }
    }

    /// The carving head, or `None` when generation is over.
    #[must_use]
    pub const fn current(&self) -> Option<Coord> {
        self.current
    }

    /// Number of walls removed so far.
    #[must_use]
    pub const fn carved(&self) -> usize {
        self.carved
    }
}

/// One depth-first step: carve into a random unvisited neighbour of the stack top, or pop.
fn backtracker_step<R: Rng + ?Sized>(
    grid: &mut Grid,
    stack: &mut Vec<Coord>,
    rng: &mut R,
    current: &mut Option<Coord>,
    carved: &mut usize,
) -> bool {
    let Some(&head) = stack.last() else {
        return false;
    };

    let unvisited: Vec<Coord> = grid
        .neighbors(head)
        .into_iter()
        .filter(|&next| !grid.is_visited(next))
        .collect();

    if let Some(&next) = unvisited.choose(rng) {
        grid.remove_wall_between(head, next);
        grid.mark_visited(next);
        stack.push(next);
        *carved += 1;
        *current = Some(next);
        trace!(?head, ?next, "carved passage");
    } else {
        let _ = stack.pop();
        *current = stack.last().copied();
    }

    !stack.is_empty()
}

/// One frontier step: draw a random candidate edge and carve it if it still crosses the
/// boundary of the visited region.
fn frontier_step<R: Rng + ?Sized>(
    grid: &mut Grid,
    edges: &mut Vec<(Coord, Coord)>,
    rng: &mut R,
    current: &mut Option<Coord>,
    carved: &mut usize,
) -> bool {
    if edges.is_empty() {
        return false;
    }

    let (a, b) = edges.swap_remove(rng.random_range(0..edges.len()));

    if grid.is_visited(a) ^ grid.is_visited(b) {
        let fresh = if grid.is_visited(a) { b } else { a };
        grid.remove_wall_between(a, b);
        grid.mark_visited(fresh);
        push_frontier_edges(grid, fresh, edges);
        *carved += 1;
        *current = Some(fresh);
        trace!(?a, ?b, "carved passage");
    }

    !edges.is_empty()
}

/// Adds every edge incident to `cell` to the frontier, skipping edges already listed in either
/// direction. Duplicates may still slip in later through other cells; they are dropped as stale.
fn push_frontier_edges(grid: &Grid, cell: Coord, edges: &mut Vec<(Coord, Coord)>) {
    for next in grid.neighbors(cell) {
        if !edges.contains(&(cell, next)) && !edges.contains(&(next, cell)) {
            edges.push((cell, next));
        }
    }
}
