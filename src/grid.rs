use bit_set::BitSet;
use log::debug;
use rand::Rng;
use std::error::Error;
use std::fmt;

use crate::cells::{Cell, CoordinateSmallVec, GridCoordinate, MOVE_ORDER};
use crate::generators;
use crate::grid_iterators::{CellIter, RowIter};
use crate::masks::BinaryMask2D;
use crate::pathing::{SearchAlgorithm, SearchError};
use crate::units::{ColumnLength, NodesCount, RowLength};

/// A rectangular grid of open and blocked cells with a start and an end cell, plus the cells of
/// the most recently accepted path.
#[derive(Clone)]
pub struct Labyrinth {
    row_length: RowLength,
    column_length: ColumnLength,
    blocked: BinaryMask2D,
    pathed: BitSet,
    start: GridCoordinate,
    end: GridCoordinate,
}

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum GridError {
    EmptyGrid,
    InvalidGridCoordinate,
    InvalidBlockRatio,
    /// The start and end cells cannot be blocked.
    ProtectedCell,
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let reason = match *self {
            GridError::EmptyGrid => "the grid needs at least one row and one column",
            GridError::InvalidGridCoordinate => "coordinate is outside the grid",
            GridError::InvalidBlockRatio => "block ratio must be between 0 and 1",
            GridError::ProtectedCell => "the start and end cells cannot be blocked",
        };
        write!(f, "{}", reason)
    }
}

impl Error for GridError {}

impl fmt::Debug for Labyrinth {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Labyrinth :: columns: {:?}, rows: {:?}, start: {:?}, end: {:?}, blocked: {:?}",
               self.row_length.0, self.column_length.0, self.start, self.end, self.blocked.count_masked())
    }
}

impl Labyrinth {
    /// An open grid, nothing blocked.
    pub fn new(row_length: RowLength,
               column_length: ColumnLength,
               start: GridCoordinate,
               end: GridCoordinate)
               -> Result<Labyrinth, GridError> {

        let (RowLength(width), ColumnLength(height)) = (row_length, column_length);
        if width == 0 || height == 0 {
            return Err(GridError::EmptyGrid);
        }
        if width > u32::MAX as usize || height > u32::MAX as usize {
            return Err(GridError::InvalidGridCoordinate);
        }

        let labyrinth = Labyrinth {
            row_length,
            column_length,
            blocked: BinaryMask2D::new(row_length, column_length),
            pathed: BitSet::with_capacity(width * height),
            start,
            end,
        };

        if !labyrinth.is_valid_coordinate(start) || !labyrinth.is_valid_coordinate(end) {
            return Err(GridError::InvalidGridCoordinate);
        }

        Ok(labyrinth)
    }

    /// A grid where every cell apart from the start and end is blocked with probability
    /// `block_ratio`.
    pub fn generate<R: Rng>(row_length: RowLength,
                            column_length: ColumnLength,
                            start: GridCoordinate,
                            end: GridCoordinate,
                            block_ratio: f32,
                            rng: &mut R)
                            -> Result<Labyrinth, GridError> {

        if !(0.0..=1.0).contains(&block_ratio) {
            return Err(GridError::InvalidBlockRatio);
        }

        let mut labyrinth = Labyrinth::new(row_length, column_length, start, end)?;
        let blocked_count = generators::random_blocks(&mut labyrinth.blocked, block_ratio, &[start, end], rng);
        debug!("generated {:?} with {} blocked cells", labyrinth, blocked_count);

        Ok(labyrinth)
    }

    #[inline]
    pub fn start(&self) -> GridCoordinate {
        self.start
    }

    #[inline]
    pub fn end(&self) -> GridCoordinate {
        self.end
    }

    #[inline]
    pub fn row_length(&self) -> RowLength {
        self.row_length
    }

    #[inline]
    pub fn column_length(&self) -> ColumnLength {
        self.column_length
    }

    #[inline]
    pub fn size(&self) -> NodesCount {
        NodesCount(self.row_length.0 * self.column_length.0)
    }

    #[inline]
    pub fn blocked_count(&self) -> usize {
        self.blocked.count_masked()
    }

    #[inline]
    pub fn open_count(&self) -> usize {
        self.blocked.count_unmasked()
    }

    /// Is the grid coordinate valid for this grid - within the grid's dimensions
    #[inline]
    pub fn is_valid_coordinate(&self, coord: GridCoordinate) -> bool {
        (coord.column as usize) < self.row_length.0 && (coord.row as usize) < self.column_length.0
    }

    #[inline]
    pub fn is_blocked(&self, coord: GridCoordinate) -> bool {
        self.blocked.is_masked(coord)
    }

    /// Block a cell. Returns true if it was open before.
    pub fn block(&mut self, coord: GridCoordinate) -> Result<bool, GridError> {
        if !self.is_valid_coordinate(coord) {
            return Err(GridError::InvalidGridCoordinate);
        }
        if coord == self.start || coord == self.end {
            return Err(GridError::ProtectedCell);
        }
        Ok(self.blocked.mask(coord))
    }

    /// Open a cell. Returns true if it was blocked before.
    pub fn unblock(&mut self, coord: GridCoordinate) -> Result<bool, GridError> {
        if !self.is_valid_coordinate(coord) {
            return Err(GridError::InvalidGridCoordinate);
        }
        Ok(self.blocked.unmask(coord))
    }

    /// Convert a grid coordinate to a one dimensional index in the range 0...grid.size().
    /// Returns None if the grid coordinate is invalid.
    #[inline]
    pub fn grid_coordinate_to_index(&self, coord: GridCoordinate) -> Option<usize> {
        if self.is_valid_coordinate(coord) {
            Some(coord.row as usize * self.row_length.0 + coord.column as usize)
        } else {
            None
        }
    }

    /// The open cells next to `coord`, always listed east, south, west then north.
    pub fn possible_moves(&self, coord: GridCoordinate) -> CoordinateSmallVec {
        MOVE_ORDER.iter()
            .filter_map(|dir| coord.offset(*dir))
            .filter(|next| self.is_valid_coordinate(*next) && !self.is_blocked(*next))
            .collect()
    }

    /// Manhattan distance from `coord` to the end cell.
    #[inline]
    pub fn distance_to_end(&self, coord: GridCoordinate) -> u32 {
        coord.manhattan_distance(self.end)
    }

    /// Search for a route from the start to the end cell, returned start first.
    pub fn find_path(&self, algorithm: SearchAlgorithm) -> Result<Vec<GridCoordinate>, SearchError> {
        let path = algorithm.search(self.start,
                                    self.end,
                                    |coord: &GridCoordinate| self.possible_moves(*coord),
                                    |coord: &GridCoordinate| self.distance_to_end(*coord));
        match path {
            Ok(p) => {
                debug!("{} found a path of {} steps", algorithm, p.edge_count());
                Ok(p.into_start_to_goal())
            }
            Err(e) => {
                debug!("{}: {}", algorithm, e);
                Err(e)
            }
        }
    }

    /// Mark every coordinate on `path` as pathed. Invalid coordinates are skipped and the start and
    /// end cells keep showing as such.
    pub fn accept_path<I>(&mut self, path: I)
        where I: IntoIterator<Item = GridCoordinate>
    {
        for coord in path {
            if let Some(index) = self.grid_coordinate_to_index(coord) {
                self.pathed.insert(index);
            }
        }
    }

    pub fn clear_path(&mut self) {
        self.pathed.clear();
    }

    pub fn pathed_count(&self) -> usize {
        self.pathed.len()
    }

    /// What to draw at `coord`, or None if it is outside the grid.
    pub fn cell_at(&self, coord: GridCoordinate) -> Option<Cell> {
        let index = self.grid_coordinate_to_index(coord)?;
        let cell = if coord == self.start {
            Cell::Start
        } else if coord == self.end {
            Cell::End
        } else if self.is_blocked(coord) {
            Cell::Blocked
        } else if self.pathed.contains(index) {
            Cell::Pathed
        } else {
            Cell::Empty
        };
        Some(cell)
    }

    #[inline]
    pub fn iter(&self) -> CellIter {
        CellIter::new(self.row_length, self.column_length)
    }

    #[inline]
    pub fn iter_row(&self) -> RowIter {
        RowIter::new(self.row_length, self.column_length)
    }
}
