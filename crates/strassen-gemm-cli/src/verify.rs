//! Sampled correctness check against direct dot products.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use strassen_gemm::Mat;

/// Seed for picking sample coordinates, fixed independently of the matrix
/// generation seed so verification always samples the same positions.
const VERIFY_SEED: u64 = 42;

/// Allowed absolute error per coordinate before it is reported.
const TOLERANCE: f32 = 1e-2;

/// Recompute `samples` random coordinates of `c` by direct dot product and
/// report the maximum absolute error.
///
/// Advisory only: mismatches are printed, never fatal.
pub fn sample_check(a: &Mat, b: &Mat, c: &Mat, samples: usize) -> f32 {
    println!("\nverifying {} sampled coordinates...", samples);

    let (m, n) = c.shape();
    let k = a.ncols();
    let mut rng = StdRng::seed_from_u64(VERIFY_SEED);

    let mut max_error = 0.0f32;
    for _ in 0..samples {
        let i = rng.gen_range(0..m);
        let j = rng.gen_range(0..n);

        let mut expected = 0.0f32;
        for t in 0..k {
            expected += a[(i, t)] * b[(t, j)];
        }

        let error = (expected - c[(i, j)]).abs();
        if error > TOLERANCE {
            println!(
                "  error at [{}, {}]: expected {}, got {}, diff {}",
                i,
                j,
                expected,
                c[(i, j)],
                error
            );
        }
        max_error = max_error.max(error);
    }

    println!("  max abs error: {:e}", max_error);
    max_error
}

#[cfg(test)]
mod tests {
    use super::*;
    use strassen_gemm::{reference_multiply, BlockedMatMul};

    #[test]
    fn test_engine_output_passes_sampling() {
        let a = Mat::from_fn(32, 32, |i, j| ((i * 7 + j) % 10) as f32 * 0.1 - 0.5);
        let b = Mat::from_fn(32, 32, |i, j| ((i + j * 3) % 10) as f32 * 0.1 - 0.5);

        let c = BlockedMatMul::new().small_block(4).multiply(&a, &b).unwrap();
        let max_error = sample_check(&a, &b, &c, 50);
        assert!(max_error < TOLERANCE);
    }

    #[test]
    fn test_detects_corrupted_output() {
        let a = Mat::identity(16);
        let b = Mat::from_fn(16, 16, |i, j| (i * 16 + j) as f32);

        let mut c = reference_multiply(&a, &b).unwrap();
        for v in c.as_mut_slice() {
            *v += 1.0;
        }
        let max_error = sample_check(&a, &b, &c, 50);
        assert!(max_error >= 1.0);
    }
}
