//! Grid addressing: cells, world pixels, and floating-point screen points.
//!
//! The editor pans a floating-point origin over an unbounded grid. Screen
//! positions are converted to world pixels by subtracting the origin, and
//! world pixels to cells by floor division, so that negative coordinates
//! land in the cell above/left rather than collapsing onto row/column zero.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Default edge length of a square tile, in pixels.
pub const TILE_SIZE: i32 = 64;

/// An integer (column, row) address into the sparse grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Cell {
    pub col: i32,
    pub row: i32,
}

impl Cell {
    pub const fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }

    /// Cell containing a world pixel.
    pub fn containing(pixel: Pixel, tile_size: i32) -> Self {
        Self {
            col: pixel.x.div_euclid(tile_size),
            row: pixel.y.div_euclid(tile_size),
        }
    }

    /// The cell offset by `(dcol, drow)`, or `None` past the edge of the
    /// addressable grid.
    pub fn offset(self, dcol: i32, drow: i32) -> Option<Self> {
        Some(Self {
            col: self.col.checked_add(dcol)?,
            row: self.row.checked_add(drow)?,
        })
    }

    /// World pixel of this cell's top-left corner, or `None` when the corner
    /// does not fit in `i32`.
    pub fn top_left(self, tile_size: i32) -> Option<Pixel> {
        Some(Pixel::new(
            self.col.checked_mul(tile_size)?,
            self.row.checked_mul(tile_size)?,
        ))
    }

    /// The 3x3 block of cells centred on this one, row by row. Cells past
    /// the edge of the grid are left out.
    pub fn window(self) -> impl Iterator<Item = Cell> {
        (-1..=1).flat_map(move |drow| (-1..=1).filter_map(move |dcol| self.offset(dcol, drow)))
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.col, self.row)
    }
}

/// An absolute pixel position in world space (relative to the grid origin).
///
/// Level documents are keyed by pixels, so ordering is by `x` then `y`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct Pixel {
    pub x: i32,
    pub y: i32,
}

impl Pixel {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Component-wise sum, or `None` on overflow.
    pub fn checked_add(self, rhs: Pixel) -> Option<Pixel> {
        Some(Pixel::new(self.x.checked_add(rhs.x)?, self.y.checked_add(rhs.y)?))
    }

    /// Component-wise difference, or `None` on overflow.
    pub fn checked_sub(self, rhs: Pixel) -> Option<Pixel> {
        Some(Pixel::new(self.x.checked_sub(rhs.x)?, self.y.checked_sub(rhs.y)?))
    }
}

impl From<[i32; 2]> for Pixel {
    fn from([x, y]: [i32; 2]) -> Self {
        Pixel::new(x, y)
    }
}

impl fmt::Display for Pixel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A floating-point screen position. The pan origin is a `Point`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// World pixel under this screen point for the given origin.
    pub fn to_world(self, origin: Point) -> Pixel {
        Pixel::new(
            (self.x - origin.x).floor() as i32,
            (self.y - origin.y).floor() as i32,
        )
    }

    /// Screen point of a world pixel for the given origin.
    pub fn from_world(pixel: Pixel, origin: Point) -> Self {
        Point::new(origin.x + pixel.x as f32, origin.y + pixel.y as f32)
    }
}

impl From<Pixel> for Point {
    fn from(pixel: Pixel) -> Self {
        Point::new(pixel.x as f32, pixel.y as f32)
    }
}

/// Cell under a screen point: component-wise floor of
/// `(point - origin) / tile_size`.
pub fn cell_at(point: Point, origin: Point, tile_size: i32) -> Cell {
    let size = tile_size as f32;
    Cell::new(
        ((point.x - origin.x) / size).floor() as i32,
        ((point.y - origin.y) / size).floor() as i32,
    )
}
