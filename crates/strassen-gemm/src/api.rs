//! Convenience entry points.

use crate::engine::BlockedMatMul;
use crate::error::{GemmError, Result};
use crate::mat::Mat;

/// Multiply two matrices with the default engine configuration
/// (sequential, 64x64 small blocks, sgemm base case).
///
/// # Example
///
/// ```
/// use strassen_gemm::{multiply, Mat};
///
/// let a = Mat::identity(256);
/// let b = Mat::from_fn(256, 256, |i, j| (i + j) as f32);
///
/// let c = multiply(&a, &b).unwrap();
/// assert_eq!(c[(1, 2)], 3.0);
/// ```
pub fn multiply(a: &Mat, b: &Mat) -> Result<Mat> {
    BlockedMatMul::new().multiply(a, b)
}

/// Naive triple-loop multiply, the reference the blocked engine is checked
/// against.
///
/// Accepts any compatible shapes; only used for verification and tests, so
/// it favors clarity over speed.
pub fn reference_multiply(a: &Mat, b: &Mat) -> Result<Mat> {
    let (m, k) = a.shape();
    let (k_b, n) = b.shape();
    if k != k_b {
        return Err(GemmError::DimensionMismatch { m, k, k_b, n });
    }

    let mut c = Mat::zeros(m, n);
    for i in 0..m {
        for t in 0..k {
            let av = a[(i, t)];
            for j in 0..n {
                c[(i, j)] += av * b[(t, j)];
            }
        }
    }
    Ok(c)
}
