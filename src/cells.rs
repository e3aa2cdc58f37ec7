use smallvec::SmallVec;
use std::convert::From;
use std::fmt;

use crate::units::{ColumnIndex, RowIndex, RowLength};

/// A cell position on a labyrinth grid, addressed by column (x) then row (y).
#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug, Ord, PartialOrd)]
pub struct GridCoordinate {
    pub column: u32,
    pub row: u32,
}

pub type CoordinateSmallVec = SmallVec<[GridCoordinate; 4]>;

impl GridCoordinate {
    pub fn new(column: u32, row: u32) -> GridCoordinate {
        GridCoordinate { column, row }
    }

    #[inline]
    pub fn from_row_major_index(index: usize, row_length: RowLength) -> GridCoordinate {
        let RowLength(width) = row_length;
        GridCoordinate::new((index % width) as u32, (index / width) as u32)
    }

    #[inline]
    pub fn from_row_column_indices(col_index: ColumnIndex, row_index: RowIndex) -> GridCoordinate {
        let (ColumnIndex(col), RowIndex(row)) = (col_index, row_index);
        GridCoordinate::new(col as u32, row as u32)
    }

    /// Steps needed to walk from `self` to `other` moving only along rows and columns.
    #[inline]
    pub fn manhattan_distance(&self, other: GridCoordinate) -> u32 {
        let dx = if self.column > other.column { self.column - other.column } else { other.column - self.column };
        let dy = if self.row > other.row { self.row - other.row } else { other.row - self.row };
        dx + dy
    }

    /// Creates a new `GridCoordinate` offset 1 cell away in the given direction.
    /// Returns None if the coordinate is not representable (negative column or row).
    pub fn offset(&self, dir: CompassPrimary) -> Option<GridCoordinate> {
        let (column, row) = (self.column, self.row);
        match dir {
            CompassPrimary::East => column.checked_add(1).map(|c| GridCoordinate::new(c, row)),
            CompassPrimary::South => row.checked_add(1).map(|r| GridCoordinate::new(column, r)),
            CompassPrimary::West => column.checked_sub(1).map(|c| GridCoordinate::new(c, row)),
            CompassPrimary::North => row.checked_sub(1).map(|r| GridCoordinate::new(column, r)),
        }
    }
}

impl From<(u32, u32)> for GridCoordinate {
    fn from(column_row_pair: (u32, u32)) -> GridCoordinate {
        GridCoordinate::new(column_row_pair.0, column_row_pair.1)
    }
}

impl fmt::Display for GridCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.column, self.row)
    }
}

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum CompassPrimary {
    East,
    South,
    West,
    North,
}

/// The order in which neighbouring cells are offered as moves: +column, +row, -column, -row.
/// Depth first tie-breaking depends on it, so it must never vary between calls.
pub const MOVE_ORDER: [CompassPrimary; 4] = [CompassPrimary::East,
                                             CompassPrimary::South,
                                             CompassPrimary::West,
                                             CompassPrimary::North];

/// What occupies a grid cell when the labyrinth is drawn.
#[derive(Eq, PartialEq, Copy, Clone, Debug, Hash)]
pub enum Cell {
    Empty,
    Blocked,
    Start,
    End,
    Pathed,
}

impl Cell {
    pub fn glyph(self) -> char {
        match self {
            Cell::Empty => ' ',
            Cell::Blocked => 'X',
            Cell::Start => 'S',
            Cell::End => 'E',
            Cell::Pathed => '*',
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.glyph())
    }
}
