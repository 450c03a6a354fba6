//! Splitting large blocks into 4x4 grids of small blocks and back.

use crate::coeffs::{GRID_BLOCKS, GRID_FACTOR};
use crate::error::{GemmError, Result};
use crate::mat::Mat;

/// A 4x4 grid of equally sized square blocks.
///
/// Blocks are stored in row-major grid order: (0,0), (0,1), ..., (3,3).
/// Each block is an owned copy of its source region — the fast-multiply
/// linear combinations need contiguous, independently addressable storage.
#[derive(Debug, Clone)]
pub struct BlockGrid {
    blocks: Vec<Mat>,
    block_size: usize,
}

impl BlockGrid {
    /// Partition a square `4*SB x 4*SB` region into a 4x4 grid of SB x SB
    /// blocks.
    ///
    /// Fails with [`GemmError::Shape`] if the region is not square or its
    /// side is not a multiple of the grid factor.
    pub fn split(region: &Mat) -> Result<Self> {
        let (rows, cols) = region.shape();
        if rows != cols || rows % GRID_FACTOR != 0 {
            let side = rows - rows % GRID_FACTOR;
            return Err(GemmError::Shape {
                expected: (side, side),
                actual: (rows, cols),
            });
        }
        let sb = rows / GRID_FACTOR;

        let mut blocks = Vec::with_capacity(GRID_BLOCKS);
        for i in 0..GRID_FACTOR {
            for j in 0..GRID_FACTOR {
                blocks.push(region.block(i * sb, j * sb, sb, sb));
            }
        }
        Ok(Self {
            blocks,
            block_size: sb,
        })
    }

    /// Build a grid from 16 blocks in row-major grid order.
    ///
    /// Fails with [`GemmError::Shape`] if the count is wrong or any block is
    /// not `block_size x block_size`.
    pub fn from_blocks(blocks: Vec<Mat>, block_size: usize) -> Result<Self> {
        if blocks.len() != GRID_BLOCKS {
            return Err(GemmError::Shape {
                expected: (GRID_FACTOR, GRID_FACTOR),
                actual: (blocks.len(), 1),
            });
        }
        for block in &blocks {
            if block.shape() != (block_size, block_size) {
                return Err(GemmError::Shape {
                    expected: (block_size, block_size),
                    actual: block.shape(),
                });
            }
        }
        Ok(Self { blocks, block_size })
    }

    /// Side length of each block.
    #[inline]
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// The block at grid position (`i`, `j`).
    #[inline]
    pub fn block(&self, i: usize, j: usize) -> &Mat {
        &self.blocks[i * GRID_FACTOR + j]
    }

    /// The row-major flattening of block `idx` in grid-traversal order.
    ///
    /// A block's row-major buffer is already its flattening, so this is a
    /// plain slice borrow.
    #[inline]
    pub(crate) fn flat(&self, idx: usize) -> &[f32] {
        self.blocks[idx].as_slice()
    }

    /// Reassemble the grid into a contiguous `4*SB x 4*SB` matrix.
    pub fn assemble(&self) -> Mat {
        let side = self.block_size * GRID_FACTOR;
        let mut out = Mat::zeros(side, side);
        for i in 0..GRID_FACTOR {
            for j in 0..GRID_FACTOR {
                out.set_block(i * self.block_size, j * self.block_size, self.block(i, j));
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_order_and_content() {
        // 8x8 region, SB = 2; entry value encodes its (row, col).
        let region = Mat::from_fn(8, 8, |i, j| (i * 8 + j) as f32);
        let grid = BlockGrid::split(&region).unwrap();

        assert_eq!(grid.block_size(), 2);
        // block (0, 0) holds the top-left 2x2 corner
        assert_eq!(grid.block(0, 0).as_slice(), &[0.0, 1.0, 8.0, 9.0]);
        // block (0, 1) starts at column 2
        assert_eq!(grid.block(0, 1).as_slice(), &[2.0, 3.0, 10.0, 11.0]);
        // block (3, 3) is the bottom-right corner
        assert_eq!(grid.block(3, 3).as_slice(), &[54.0, 55.0, 62.0, 63.0]);
    }

    #[test]
    fn test_split_assemble_roundtrip() {
        let region = Mat::from_fn(12, 12, |i, j| (i * 12 + j) as f32);
        let grid = BlockGrid::split(&region).unwrap();
        assert_eq!(grid.assemble(), region);
    }

    #[test]
    fn test_split_rejects_non_square() {
        let region = Mat::zeros(8, 12);
        assert!(matches!(
            BlockGrid::split(&region),
            Err(GemmError::Shape { .. })
        ));
    }

    #[test]
    fn test_split_rejects_unaligned() {
        let region = Mat::zeros(10, 10);
        assert!(matches!(
            BlockGrid::split(&region),
            Err(GemmError::Shape { .. })
        ));
    }

    #[test]
    fn test_from_blocks_rejects_mismatched_block() {
        let mut blocks: Vec<Mat> = (0..GRID_BLOCKS).map(|_| Mat::zeros(2, 2)).collect();
        blocks[5] = Mat::zeros(3, 3);
        let err = BlockGrid::from_blocks(blocks, 2).unwrap_err();
        assert_eq!(
            err,
            GemmError::Shape {
                expected: (2, 2),
                actual: (3, 3),
            }
        );
    }

    #[test]
    fn test_from_blocks_rejects_wrong_count() {
        let blocks: Vec<Mat> = (0..GRID_BLOCKS - 1).map(|_| Mat::zeros(2, 2)).collect();
        assert!(matches!(
            BlockGrid::from_blocks(blocks, 2),
            Err(GemmError::Shape { .. })
        ));
    }

    #[test]
    fn test_flat_matches_block_data() {
        let region = Mat::from_fn(8, 8, |i, j| (i * 8 + j) as f32);
        let grid = BlockGrid::split(&region).unwrap();
        // grid-traversal order: index 1 is block (0, 1)
        assert_eq!(grid.flat(1), grid.block(0, 1).as_slice());
    }
}
