//! Fog-of-war module.
//!
//! This module decides, frame by frame, which cells are lit around the player, which ones are
//! still drawn from recent memory, and which ones stay hidden.

use crate::{grid::Grid, types::Coord};

/// Number of frames a cell stays drawn after it leaves the lit area.
pub const FADE_FRAMES: u64 = 2;

/// How a cell should be drawn during the current frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Visibility {
    /// Within the light radius, drawn in full.
    Illuminated,
    /// Lit a moment ago, drawn faded.
    RecentlySeen,
    /// Not drawn.
    Hidden,
}

/// Parameters of a single visibility query.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Lighting {
    /// Cell the light is centred on, normally the player.
    pub focus: Coord,
    /// Whether fog of war is active. Without fog every cell is lit.
    pub fog: bool,
    /// Light radius in cells.
    pub radius: u32,
    /// Current frame number, used only to order observations.
    pub frame: u64,
}

/// Per-cell classification for one frame, laid out like the grid it was computed from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VisibilityMap {
    /// Number of columns of the source grid.
    cols: usize,
    /// Row-major classifications.
    cells: Vec<Visibility>,
}

impl VisibilityMap {
    /// Classification of a cell; cells outside the grid are hidden.
    #[must_use]
    pub fn get(&self, coord: Coord) -> Visibility {
        if coord.x >= self.cols {
            return Visibility::Hidden;
        }

        coord
            .y
            .checked_mul(self.cols)
            .and_then(|row| row.checked_add(coord.x))
            .and_then(|idx| self.cells.get(idx).copied())
            .unwrap_or(Visibility::Hidden)
    }

    /// Returns `true` if the cell should be drawn at all.
    #[must_use]
    pub fn is_drawn(&self, coord: Coord) -> bool {
        self.get(coord) != Visibility::Hidden
    }

    /// Number of cells with the given classification.
    #[cfg(test)]
    pub(crate) fn count(&self, visibility: Visibility) -> usize {
        self.cells.iter().filter(|&&cell| cell == visibility).count()
    }
}

/// Remembers when each cell was last lit.
///
/// The tracker keeps its own memory next to the grid instead of inside it, so classifying a frame
/// never mutates the maze.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VisibilityTracker {
    /// Frame at which each cell was last lit, `None` if it never was.
    last_seen: Vec<Option<u64>>,
}

impl VisibilityTracker {
    /// Creates a tracker for a grid where no cell has been seen yet.
    #[must_use]
    pub fn new(grid: &Grid) -> Self {
        Self {
            last_seen: vec![None; grid.len()],
        }
    }

    /// Forgets every observation.
    pub fn reset(&mut self) {
        self.last_seen.fill(None);
    }

    /// Frame at which a cell was last lit.
    #[cfg(test)]
    pub(crate) fn last_seen(&self, grid: &Grid, coord: Coord) -> Option<u64> {
        grid.index(coord)
            .and_then(|idx| self.last_seen.get(idx).copied().flatten())
    }

    /// Classifies every cell of `grid` for the frame described by `lighting`.
    ///
    /// Lit cells are those whose squared distance to the focus does not exceed the squared
    /// radius; their last-seen frame is set to the current one. Cells lit no more than
    /// [`FADE_FRAMES`] frames ago are recently seen. Everything else is hidden. With fog disabled
    /// every cell is lit.
    pub fn classify(&mut self, grid: &Grid, lighting: Lighting) -> VisibilityMap {
        if self.last_seen.len() != grid.len() {
            self.last_seen = vec![None; grid.len()];
        }

        let radius = usize::try_from(lighting.radius).unwrap_or(usize::MAX);
        let radius_squared = radius.saturating_mul(radius);

        let cells = grid
            .coords()
            .zip(self.last_seen.iter_mut())
            .map(|(coord, last_seen)| {
                if !lighting.fog || coord.distance_squared(lighting.focus) <= radius_squared {
                    *last_seen = Some(lighting.frame);
                    Visibility::Illuminated
                } else if last_seen
                    .is_some_and(|seen| lighting.frame.saturating_sub(seen) <= FADE_FRAMES)
                {
                    Visibility::RecentlySeen
                } else {
                    Visibility::Hidden
                }
            })
            .collect();

        VisibilityMap {
            cols: grid.cols(),
            cells,
        }
    }
}
