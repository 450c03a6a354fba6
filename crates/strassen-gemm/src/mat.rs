//! Owned dense matrix type.

use std::ops::{Index, IndexMut};

use crate::error::{GemmError, Result};

/// Owned dense `f32` matrix in row-major order.
///
/// Use factory methods to create matrices:
///
/// ```
/// use strassen_gemm::Mat;
///
/// let zeros = Mat::zeros(3, 4);
/// let identity = Mat::identity(3);
/// let custom = Mat::from_fn(2, 2, |i, j| (i + j) as f32);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Mat {
    pub(crate) data: Vec<f32>,
    pub(crate) nrows: usize,
    pub(crate) ncols: usize,
}

impl Mat {
    /// Create a matrix filled with zeros.
    pub fn zeros(nrows: usize, ncols: usize) -> Self {
        Self {
            data: vec![0.0; nrows * ncols],
            nrows,
            ncols,
        }
    }

    /// Create an identity matrix.
    pub fn identity(n: usize) -> Self {
        let mut mat = Self::zeros(n, n);
        for i in 0..n {
            mat.data[i * n + i] = 1.0;
        }
        mat
    }

    /// Create a matrix from a function called with (row, col) indices.
    pub fn from_fn<F>(nrows: usize, ncols: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> f32,
    {
        let data = (0..nrows * ncols)
            .map(|idx| f(idx / ncols, idx % ncols))
            .collect();
        Self { data, nrows, ncols }
    }

    /// Create a matrix from row-major data.
    ///
    /// # Panics
    ///
    /// Panics if `data.len() != nrows * ncols`.
    pub fn from_vec(data: Vec<f32>, nrows: usize, ncols: usize) -> Self {
        assert_eq!(
            data.len(),
            nrows * ncols,
            "data length {} != nrows {} * ncols {}",
            data.len(),
            nrows,
            ncols
        );
        Self { data, nrows, ncols }
    }

    /// Number of rows.
    #[inline]
    pub fn nrows(&self) -> usize {
        self.nrows
    }

    /// Number of columns.
    #[inline]
    pub fn ncols(&self) -> usize {
        self.ncols
    }

    /// (rows, cols) pair.
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.nrows, self.ncols)
    }

    /// The underlying row-major data as a slice.
    ///
    /// For a square block this is also its row-major flattening, which is
    /// what the fast-multiply linear combinations operate on.
    #[inline]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// The underlying row-major data as a mutable slice.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// Consume the matrix, returning its row-major data.
    #[inline]
    pub fn into_vec(self) -> Vec<f32> {
        self.data
    }

    /// Copy a `rows`x`cols` sub-region starting at (`r0`, `c0`) into an
    /// owned matrix.
    ///
    /// The copy is deliberate: downstream flattening and linear combination
    /// rearrange block storage, so a borrowed view would not suffice.
    ///
    /// # Panics
    ///
    /// Panics if the region extends past the matrix bounds.
    pub fn block(&self, r0: usize, c0: usize, rows: usize, cols: usize) -> Mat {
        assert!(
            r0 + rows <= self.nrows && c0 + cols <= self.ncols,
            "block {}x{} at ({}, {}) out of bounds for {}x{} matrix",
            rows,
            cols,
            r0,
            c0,
            self.nrows,
            self.ncols
        );
        let mut data = Vec::with_capacity(rows * cols);
        for r in 0..rows {
            let start = (r0 + r) * self.ncols + c0;
            data.extend_from_slice(&self.data[start..start + cols]);
        }
        Mat {
            data,
            nrows: rows,
            ncols: cols,
        }
    }

    /// Write `block` into this matrix with its top-left corner at (`r0`, `c0`).
    ///
    /// # Panics
    ///
    /// Panics if the block extends past the matrix bounds.
    pub fn set_block(&mut self, r0: usize, c0: usize, block: &Mat) {
        assert!(
            r0 + block.nrows <= self.nrows && c0 + block.ncols <= self.ncols,
            "block {}x{} at ({}, {}) out of bounds for {}x{} matrix",
            block.nrows,
            block.ncols,
            r0,
            c0,
            self.nrows,
            self.ncols
        );
        for r in 0..block.nrows {
            let dst = (r0 + r) * self.ncols + c0;
            let src = r * block.ncols;
            self.data[dst..dst + block.ncols]
                .copy_from_slice(&block.data[src..src + block.ncols]);
        }
    }

    /// Element-wise accumulation: `self += other`.
    ///
    /// Fails with [`GemmError::Shape`] if the shapes differ.
    pub fn accumulate(&mut self, other: &Mat) -> Result<()> {
        if self.shape() != other.shape() {
            return Err(GemmError::Shape {
                expected: self.shape(),
                actual: other.shape(),
            });
        }
        for (dst, src) in self.data.iter_mut().zip(&other.data) {
            *dst += src;
        }
        Ok(())
    }
}

impl Index<(usize, usize)> for Mat {
    type Output = f32;

    #[inline]
    fn index(&self, (i, j): (usize, usize)) -> &f32 {
        debug_assert!(i < self.nrows, "row index {} out of bounds {}", i, self.nrows);
        debug_assert!(j < self.ncols, "col index {} out of bounds {}", j, self.ncols);
        &self.data[i * self.ncols + j]
    }
}

impl IndexMut<(usize, usize)> for Mat {
    #[inline]
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut f32 {
        debug_assert!(i < self.nrows, "row index {} out of bounds {}", i, self.nrows);
        debug_assert!(j < self.ncols, "col index {} out of bounds {}", j, self.ncols);
        &mut self.data[i * self.ncols + j]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zeros() {
        let m = Mat::zeros(3, 4);
        assert_eq!(m.nrows(), 3);
        assert_eq!(m.ncols(), 4);
        assert!(m.as_slice().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_identity() {
        let m = Mat::identity(3);
        for i in 0..3 {
            for j in 0..3 {
                assert_eq!(m[(i, j)], if i == j { 1.0 } else { 0.0 });
            }
        }
    }

    #[test]
    fn test_from_fn_row_major() {
        let m = Mat::from_fn(2, 3, |i, j| (i * 3 + j) as f32);
        assert_eq!(m[(0, 0)], 0.0);
        assert_eq!(m[(0, 2)], 2.0);
        assert_eq!(m[(1, 0)], 3.0);
        assert_eq!(m.as_slice(), &[0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_block_copies_region() {
        let m = Mat::from_fn(4, 4, |i, j| (i * 4 + j) as f32);
        let b = m.block(1, 2, 2, 2);
        assert_eq!(b.shape(), (2, 2));
        assert_eq!(b.as_slice(), &[6.0, 7.0, 10.0, 11.0]);
    }

    #[test]
    fn test_set_block_roundtrip() {
        let src = Mat::from_fn(4, 4, |i, j| (i * 4 + j) as f32);
        let b = src.block(2, 0, 2, 2);
        let mut dst = Mat::zeros(4, 4);
        dst.set_block(2, 0, &b);
        assert_eq!(dst[(2, 0)], 8.0);
        assert_eq!(dst[(3, 1)], 13.0);
        assert_eq!(dst[(0, 0)], 0.0);
    }

    #[test]
    fn test_accumulate() {
        let mut a = Mat::from_vec(vec![1.0, 2.0, 3.0, 4.0], 2, 2);
        let b = Mat::from_vec(vec![10.0, 20.0, 30.0, 40.0], 2, 2);
        a.accumulate(&b).unwrap();
        assert_eq!(a.as_slice(), &[11.0, 22.0, 33.0, 44.0]);
    }

    #[test]
    fn test_accumulate_shape_error() {
        let mut a = Mat::zeros(2, 2);
        let b = Mat::zeros(2, 3);
        assert_eq!(
            a.accumulate(&b),
            Err(GemmError::Shape {
                expected: (2, 2),
                actual: (2, 3),
            })
        );
    }

    #[test]
    #[should_panic(expected = "data length")]
    fn test_from_vec_size_mismatch() {
        let _ = Mat::from_vec(vec![1.0, 2.0], 2, 2);
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn test_block_out_of_bounds() {
        let m = Mat::zeros(4, 4);
        let _ = m.block(3, 3, 2, 2);
    }
}
