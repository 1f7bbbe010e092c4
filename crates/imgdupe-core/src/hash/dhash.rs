//! Gradient (difference) hash.
//!
//! The approach follows the classic dHash writeup: downsample to a 9x9 grid,
//! then record the sign of each horizontal and vertical neighbor difference
//! over the 8x8 interior.

use crate::resample::{self, Filter, SourceImage};

const GRID: usize = 9;

/// Compute the row- and column-gradient words of an image.
///
/// Bit `(y*8 + x)` of `row` is set iff the pixel at `(x, y)` is darker than
/// its right neighbor; the same bit of `col` compares against the neighbor
/// below. A constant image therefore hashes to `(0, 0)`.
pub fn dhash(img: &SourceImage) -> (u64, u64) {
    let small = resample::resize(img, GRID, GRID, Filter::Linear);
    let gray = super::luminance_grid(&small);

    let mut row = 0u64;
    let mut col = 0u64;
    for y in 0..GRID - 1 {
        for x in 0..GRID - 1 {
            if gray[x][y] < gray[x + 1][y] {
                row |= 1 << (y * 8 + x);
            }
            if gray[x][y] < gray[x][y + 1] {
                col |= 1 << (y * 8 + x);
            }
        }
    }
    (row, col)
}
