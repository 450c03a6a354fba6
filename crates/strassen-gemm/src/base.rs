//! Base-case dense multiplication of small square blocks.

use crate::error::{GemmError, Result};
use crate::mat::Mat;

/// The dense multiply primitive used for the 49 intermediate products.
///
/// Implementations compute the exact dense product of two equally sized
/// square blocks at `f32`. The fast-multiply path treats this as an opaque
/// primitive; all algorithmic novelty lives above this seam.
pub trait BaseMultiplier {
    /// Compute `a * b` for two `n x n` blocks.
    ///
    /// Fails with [`GemmError::Shape`] if either operand is not square or
    /// the sizes disagree; that can only happen when a caller violates the
    /// grid contract.
    fn multiply(&self, a: &Mat, b: &Mat) -> Result<Mat>;
}

fn check_square_pair(a: &Mat, b: &Mat) -> Result<usize> {
    let n = a.nrows();
    if a.ncols() != n {
        return Err(GemmError::Shape {
            expected: (n, n),
            actual: a.shape(),
        });
    }
    if b.shape() != (n, n) {
        return Err(GemmError::Shape {
            expected: (n, n),
            actual: b.shape(),
        });
    }
    Ok(n)
}

/// Default base-case multiplier backed by `matrixmultiply::sgemm`.
///
/// The BLIS-style packed kernels there are the "vectorized math library"
/// this crate deliberately does not reimplement.
#[derive(Debug, Default, Clone, Copy)]
pub struct SgemmMultiplier;

impl BaseMultiplier for SgemmMultiplier {
    fn multiply(&self, a: &Mat, b: &Mat) -> Result<Mat> {
        let n = check_square_pair(a, b)?;
        let mut c = Mat::zeros(n, n);
        let ld = n as isize;
        // Row-major contiguous operands: row stride n, column stride 1.
        unsafe {
            matrixmultiply::sgemm(
                n,
                n,
                n,
                1.0,
                a.as_slice().as_ptr(),
                ld,
                1,
                b.as_slice().as_ptr(),
                ld,
                1,
                0.0,
                c.as_mut_slice().as_mut_ptr(),
                ld,
                1,
            );
        }
        Ok(c)
    }
}

/// Naive triple-loop multiplier.
///
/// Used by tests as an independent oracle; also exercises the seam with an
/// implementation that shares no code with the sgemm path.
#[derive(Debug, Default, Clone, Copy)]
pub struct NaiveMultiplier;

impl BaseMultiplier for NaiveMultiplier {
    fn multiply(&self, a: &Mat, b: &Mat) -> Result<Mat> {
        let n = check_square_pair(a, b)?;
        let mut c = Mat::zeros(n, n);
        for i in 0..n {
            for t in 0..n {
                let av = a[(i, t)];
                for j in 0..n {
                    c[(i, j)] += av * b[(t, j)];
                }
            }
        }
        Ok(c)
    }
}
