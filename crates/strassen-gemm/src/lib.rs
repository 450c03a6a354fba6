//! Blocked single-precision matrix multiplication with a 49-multiplication
//! 4x4 fast kernel.
//!
//! Large dense `f32` matrices are multiplied through a two-level block
//! decomposition. The outer level walks 256x256 large blocks with standard
//! blocked accumulation; inside each large-block pair, a Strassen-family
//! scheme specialized to a 4x4 grid of 64x64 sub-blocks computes the product
//! with 49 dense sub-block multiplications instead of the naive 64 — a
//! 49/64 ≈ 76.6% multiplication-count ratio. The dense base case is
//! delegated to `matrixmultiply`'s packed sgemm kernels.
//!
//! # Quick Start
//!
//! ```
//! use strassen_gemm::{multiply, Mat};
//!
//! let a = Mat::identity(256);
//! let b = Mat::from_fn(256, 256, |i, j| (i + 2 * j) as f32);
//!
//! let c = multiply(&a, &b).unwrap();
//! assert_eq!(c[(4, 7)], 18.0);
//! ```
//!
//! # Engine configuration
//!
//! For progress observation, cancellation, parallel output cells, or a
//! different block size, build an engine explicitly:
//!
//! ```
//! use strassen_gemm::BlockedMatMul;
//!
//! let engine = BlockedMatMul::new()
//!     .parallel(true)
//!     .on_step(|done, total| eprintln!("{done}/{total}"));
//! let progress = engine.progress(); // pollable from another thread
//! # let _ = progress;
//! ```
//!
//! Dimensions must be exact multiples of the large block size; anything else
//! fails validation before any block work starts. See [`GemmError`].
//!
//! # Determinism
//!
//! Contraction partial sums are accumulated in fixed ascending order, so
//! identical inputs give bit-identical output across runs — including with
//! [`BlockedMatMul::parallel`], which only distributes independent output
//! cells.

pub mod base;
pub mod coeffs;
pub mod engine;
pub mod fast;
pub mod tile;

mod api;
mod error;
mod mat;

pub use api::{multiply, reference_multiply};
pub use base::{BaseMultiplier, NaiveMultiplier, SgemmMultiplier};
pub use engine::{BlockedMatMul, Progress, LARGE_BLOCK, SMALL_BLOCK};
pub use error::{GemmError, Result};
pub use mat::Mat;
pub use tile::BlockGrid;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use super::{
        multiply, BaseMultiplier, BlockGrid, BlockedMatMul, GemmError, Mat, Progress,
        SgemmMultiplier, LARGE_BLOCK, SMALL_BLOCK,
    };
}
