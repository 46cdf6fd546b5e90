//! The neighbor direction table.
//!
//! Eight compass directions in one canonical order. The order drives both
//! the resolver's iteration and the concatenation that forms variant keys,
//! and the single-letter codes appear verbatim in level files.

use std::fmt;

/// A compass direction from a cell to one of its eight neighbors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl Direction {
    /// All directions in canonical order.
    pub const ALL: [Direction; 8] = [
        Direction::North,
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
        Direction::South,
        Direction::SouthWest,
        Direction::West,
        Direction::NorthWest,
    ];

    /// Unit offset `(dcol, drow)`; rows grow downward.
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::NorthEast => (1, -1),
            Direction::East => (1, 0),
            Direction::SouthEast => (1, 1),
            Direction::South => (0, 1),
            Direction::SouthWest => (-1, 1),
            Direction::West => (-1, 0),
            Direction::NorthWest => (-1, -1),
        }
    }

    /// Code letter used in variant keys.
    pub const fn code(self) -> char {
        match self {
            Direction::North => 'A',
            Direction::NorthEast => 'B',
            Direction::East => 'C',
            Direction::SouthEast => 'D',
            Direction::South => 'E',
            Direction::SouthWest => 'F',
            Direction::West => 'G',
            Direction::NorthWest => 'H',
        }
    }

    /// Look up a direction by its code letter.
    pub fn from_code(code: char) -> Option<Direction> {
        Direction::ALL.into_iter().find(|d| d.code() == code)
    }

    /// Position in the canonical order (0..8).
    pub const fn index(self) -> usize {
        self as usize
    }

    /// True for the four diagonal directions.
    pub const fn is_corner(self) -> bool {
        matches!(
            self,
            Direction::NorthEast | Direction::SouthEast | Direction::SouthWest | Direction::NorthWest
        )
    }

    /// The two edge directions adjacent to a corner.
    pub const fn corner_edges(self) -> Option<(Direction, Direction)> {
        match self {
            Direction::NorthEast => Some((Direction::North, Direction::East)),
            Direction::SouthEast => Some((Direction::South, Direction::East)),
            Direction::SouthWest => Some((Direction::South, Direction::West)),
            Direction::NorthWest => Some((Direction::North, Direction::West)),
            _ => None,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Concatenate direction codes into a variant key.
pub fn variant_key(directions: &[Direction]) -> String {
    directions.iter().map(|d| d.code()).collect()
}
