//! Coordinate and direction types shared by the maze engine and the terminal front end.

/// Position of a cell in the maze grid.
///
/// Cells are addressed by column (`x`) and row (`y`), both counted from the top-left corner of
/// the grid. Coordinates never own cell data; they are plain indices into the grid arena.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coord {
    /// Column of the cell, growing eastwards.
    pub x: usize,
    /// Row of the cell, growing southwards.
    pub y: usize,
}

impl Coord {
    /// Builds a coordinate from a column and a row.
    #[must_use]
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Returns the coordinate one step away in the given direction.
    ///
    /// This function only guards against underflow at the north and west edges; checking the
    /// south and east edges requires the grid dimensions and is left to the grid itself.
    #[must_use]
    pub const fn step(self, direction: Direction) -> Option<Self> {
        let (dx, dy) = direction.offset();
        let Some(x) = self.x.checked_add_signed(dx) else {
            return None;
        };
        let Some(y) = self.y.checked_add_signed(dy) else {
            return None;
        };

        Some(Self { x, y })
    }

    /// Returns the direction leading from this coordinate to an orthogonally adjacent one.
    ///
    /// Yields `None` when both coordinates are not exactly one step apart.
    #[must_use]
    pub fn direction_to(self, other: Self) -> Option<Direction> {
        Direction::ALL
            .into_iter()
            .find(|&direction| self.step(direction) == Some(other))
    }

    /// Squared euclidean distance between two coordinates.
    #[must_use]
    pub const fn distance_squared(self, other: Self) -> usize {
        let dx = self.x.abs_diff(other.x);
        let dy = self.y.abs_diff(other.y);
        dx * dx + dy * dy
    }
}

/// One of the four cardinal directions a wall can face or a player can move in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Towards row zero.
    North,
    /// Towards the last row.
    South,
    /// Towards the last column.
    East,
    /// Towards column zero.
    West,
}

impl Direction {
    /// Every direction, in the order neighbours are enumerated.
    pub const ALL: [Self; 4] = [Self::North, Self::South, Self::East, Self::West];

    /// Column and row deltas of a single step in this direction.
    #[must_use]
    pub const fn offset(self) -> (isize, isize) {
        match self {
            Self::North => (0, -1),
            Self::South => (0, 1),
            Self::East => (1, 0),
            Self::West => (-1, 0),
        }
    }

    /// The direction pointing back the way this one came.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::South => Self::North,
            Self::East => Self::West,
            Self::West => Self::East,
        }
    }

    /// Bit used to store the wall facing this direction inside a cell.
    pub(crate) const fn wall_bit(self) -> u8 {
        match self {
            Self::North => 0b0001,
            Self::South => 0b0010,
            Self::East => 0b0100,
            Self::West => 0b1000,
        }
    }
}
