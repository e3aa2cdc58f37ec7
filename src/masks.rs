use bit_set::BitSet;

use crate::cells::GridCoordinate;
use crate::units::{ColumnLength, RowLength};

/// A set of switched off cells over a `width` * `height` 2d space, one bit per cell.
#[derive(Debug, Clone)]
pub struct BinaryMask2D {
    mask: BitSet,
    pub width: u32,
    pub height: u32,
}

impl BinaryMask2D {
    pub fn new(width: RowLength, height: ColumnLength) -> BinaryMask2D {
        let (RowLength(w), ColumnLength(h)) = (width, height);
        BinaryMask2D {
            mask: BitSet::with_capacity(w * h),
            width: w as u32,
            height: h as u32,
        }
    }

    /// Is the given coordinate masked out / turned off?
    ///
    /// A coordinate is not masked if it is outside the bounds of masks 2d space.
    pub fn is_masked(&self, coord: GridCoordinate) -> bool {
        self.bit_index(coord).map_or(false, |bit_index| self.mask.contains(bit_index))
    }

    /// Turn off a cell. Returns true if the cell was not already masked.
    /// Coordinates outside the mask are ignored.
    pub fn mask(&mut self, coord: GridCoordinate) -> bool {
        match self.bit_index(coord) {
            Some(bit_index) => self.mask.insert(bit_index),
            None => false,
        }
    }

    /// Turn a cell back on. Returns true if the cell was masked.
    pub fn unmask(&mut self, coord: GridCoordinate) -> bool {
        match self.bit_index(coord) {
            Some(bit_index) => self.mask.remove(bit_index),
            None => false,
        }
    }

    pub fn count_masked(&self) -> usize {
        self.mask.len()
    }

    pub fn count_unmasked(&self) -> usize {
        (self.width * self.height) as usize - self.count_masked()
    }

    fn bit_index(&self, coord: GridCoordinate) -> Option<usize> {
        if coord.column < self.width && coord.row < self.height {
            Some((coord.row * self.width + coord.column) as usize)
        } else {
            None
        }
    }
}
