//! The 49-multiplication product of two 4x4 block grids.

use crate::base::BaseMultiplier;
use crate::coeffs::{GRID_BLOCKS, NUM_PRODUCTS, U_TERMS, V_TERMS, W_TERMS};
use crate::error::{GemmError, Result};
use crate::mat::Mat;
use crate::tile::BlockGrid;

/// Accumulate `sign * source` rows into a fresh length-`len` buffer.
///
/// `terms` is one precomputed nonzero coefficient row; slots with a zero
/// coefficient are never visited.
fn linear_combination<'a, F>(source: F, terms: &[(usize, f32)], len: usize) -> Vec<f32>
where
    F: Fn(usize) -> &'a [f32],
{
    let mut out = vec![0.0f32; len];
    for &(slot, sign) in terms {
        for (dst, src) in out.iter_mut().zip(source(slot)) {
            *dst += sign * src;
        }
    }
    out
}

/// Multiply two 4x4 block grids using 49 base-case multiplications.
///
/// The naive 4x4 block product needs `4^3 = 64` dense multiplies; the
/// coefficient tables trade 15 of them for extra block additions:
///
/// 1. Treat each grid as 16 flattened length-SB^2 vectors.
/// 2. For each k in 0..49, form one signed combination of A blocks and one
///    of B blocks, reshape both to SB x SB, and take their dense product.
/// 3. Recombine the 49 products into the 16 output blocks through `W`.
///
/// Exactly 49 base-case calls are issued per invocation; the coefficient
/// sparsity is fixed at table-definition time and no decision ever depends
/// on block content.
///
/// Fails with [`GemmError::Shape`] if the grids' block sizes differ.
pub fn fast_multiply<B: BaseMultiplier>(
    a_grid: &BlockGrid,
    b_grid: &BlockGrid,
    base: &B,
) -> Result<BlockGrid> {
    let sb = a_grid.block_size();
    if b_grid.block_size() != sb {
        return Err(GemmError::Shape {
            expected: (sb, sb),
            actual: (b_grid.block_size(), b_grid.block_size()),
        });
    }
    let len = sb * sb;

    // The 49 intermediate products, kept flattened for the W recombination.
    let mut products: Vec<Vec<f32>> = Vec::with_capacity(NUM_PRODUCTS);
    for k in 0..NUM_PRODUCTS {
        let a_lin = linear_combination(|slot| a_grid.flat(slot), &U_TERMS[k], len);
        let b_lin = linear_combination(|slot| b_grid.flat(slot), &V_TERMS[k], len);

        let product = base.multiply(
            &Mat::from_vec(a_lin, sb, sb),
            &Mat::from_vec(b_lin, sb, sb),
        )?;
        products.push(product.into_vec());
    }

    let mut blocks = Vec::with_capacity(GRID_BLOCKS);
    for idx in 0..GRID_BLOCKS {
        let c_flat = linear_combination(|k| products[k].as_slice(), &W_TERMS[idx], len);
        blocks.push(Mat::from_vec(c_flat, sb, sb));
    }
    BlockGrid::from_blocks(blocks, sb)
}
