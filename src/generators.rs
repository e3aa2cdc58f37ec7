use rand::Rng;

use crate::cells::GridCoordinate;
use crate::grid_iterators::CellIter;
use crate::masks::BinaryMask2D;
use crate::units::{ColumnLength, RowLength};

/// Randomly block cells of the mask, each one independently with probability `block_ratio`.
///
/// Cells listed in `keep_open` are left alone. Returns how many cells were newly blocked.
pub fn random_blocks<R: Rng>(mask: &mut BinaryMask2D,
                             block_ratio: f32,
                             keep_open: &[GridCoordinate],
                             rng: &mut R)
                             -> usize {
    let cells = CellIter::new(RowLength(mask.width as usize), ColumnLength(mask.height as usize));
    let mut blocked = 0;

    for coord in cells {
        // One draw per cell, kept cells included.
        let coin = rng.gen::<f32>();
        if coin < block_ratio && !keep_open.contains(&coord) && mask.mask(coord) {
            blocked += 1;
        }
    }

    blocked
}
