//! Top-level blocked multiplication driver.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use rayon::prelude::*;

use crate::base::{BaseMultiplier, SgemmMultiplier};
use crate::coeffs::GRID_FACTOR;
use crate::error::{GemmError, Result};
use crate::fast::fast_multiply;
use crate::mat::Mat;
use crate::tile::BlockGrid;

/// Default side length of a small block, the base case for dense multiplication.
pub const SMALL_BLOCK: usize = 64;

/// Default side length of a large block, the unit of fast multiplication.
pub const LARGE_BLOCK: usize = SMALL_BLOCK * GRID_FACTOR;

/// Monotonic counter of completed large-block contraction steps.
///
/// One step is one `C[i,j] += A[i,k] * B[k,j]` large-block contraction, out
/// of `GM * GK * GN` total. The handle is cheap to clone out of the engine
/// and may be polled from any thread while a multiply runs.
#[derive(Debug, Default)]
pub struct Progress {
    completed: AtomicU64,
    total: AtomicU64,
}

impl Progress {
    /// Contraction steps completed so far.
    pub fn completed(&self) -> u64 {
        self.completed.load(Ordering::Relaxed)
    }

    /// Total contraction steps of the running multiply, or 0 before one starts.
    pub fn total(&self) -> u64 {
        self.total.load(Ordering::Relaxed)
    }

    /// Completed fraction in [0, 1].
    pub fn fraction(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            0.0
        } else {
            self.completed() as f64 / total as f64
        }
    }

    fn start(&self, total: u64) {
        self.completed.store(0, Ordering::Relaxed);
        self.total.store(total, Ordering::Relaxed);
    }

    fn step(&self) -> u64 {
        self.completed.fetch_add(1, Ordering::Relaxed) + 1
    }
}

type StepCallback = Box<dyn Fn(u64, u64) + Send + Sync>;

/// Blocked matrix multiplication engine.
///
/// Splits the operands into large blocks, multiplies each pair of large
/// blocks through the 49-multiplication grid kernel, and accumulates the
/// partial products in fixed ascending contraction order.
///
/// # Example
///
/// ```
/// use strassen_gemm::{BlockedMatMul, Mat};
///
/// let a = Mat::identity(256);
/// let b = Mat::from_fn(256, 256, |i, j| (i + j) as f32);
///
/// let c = BlockedMatMul::new().multiply(&a, &b).unwrap();
/// assert_eq!(c[(3, 5)], 8.0);
/// ```
pub struct BlockedMatMul<B: BaseMultiplier = SgemmMultiplier> {
    small_block: usize,
    parallel: bool,
    base: B,
    progress: Arc<Progress>,
    cancel: Option<Arc<AtomicBool>>,
    on_step: Option<StepCallback>,
}

impl BlockedMatMul<SgemmMultiplier> {
    /// Create an engine with the default base-case multiplier and block size.
    pub fn new() -> Self {
        Self::with_base(SgemmMultiplier)
    }
}

impl Default for BlockedMatMul<SgemmMultiplier> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: BaseMultiplier> BlockedMatMul<B> {
    /// Create an engine around a custom base-case multiplier.
    pub fn with_base(base: B) -> Self {
        Self {
            small_block: SMALL_BLOCK,
            parallel: false,
            base,
            progress: Arc::new(Progress::default()),
            cancel: None,
            on_step: None,
        }
    }

    /// Override the small block side length (the large block becomes
    /// `4 * small_block`). The grid stays 4x4 regardless.
    ///
    /// # Panics
    ///
    /// Panics if `small_block` is zero.
    pub fn small_block(mut self, small_block: usize) -> Self {
        assert!(small_block > 0, "small block size must be non-zero");
        self.small_block = small_block;
        self
    }

    /// Compute output cells concurrently.
    ///
    /// Each (i, j) cell reads shared slices of A and B and owns its
    /// accumulator, and the contraction loop inside a cell stays sequential
    /// ascending, so the result is bit-identical to the sequential one.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Attach a cancellation flag, checked once per contraction step.
    ///
    /// Setting the flag makes the running multiply abort with
    /// [`GemmError::Cancelled`]; no partial output is returned.
    pub fn cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Subscribe to contraction steps with a `(completed, total)` callback.
    ///
    /// The callback runs on whichever thread finished the step; with
    /// [`parallel`](Self::parallel) enabled it must tolerate interleaving.
    pub fn on_step<F>(mut self, callback: F) -> Self
    where
        F: Fn(u64, u64) + Send + Sync + 'static,
    {
        self.on_step = Some(Box::new(callback));
        self
    }

    /// A pollable handle to this engine's progress counter.
    pub fn progress(&self) -> Arc<Progress> {
        Arc::clone(&self.progress)
    }

    /// The side length of the large blocks this engine multiplies by.
    pub fn large_block(&self) -> usize {
        self.small_block * GRID_FACTOR
    }

    /// Compute `C = A * B`.
    ///
    /// Validation happens before any block work: the inner dimensions must
    /// agree ([`GemmError::DimensionMismatch`]) and every dimension must be
    /// a multiple of the large block size ([`GemmError::BlockAlignment`]).
    /// On any error no partial output is surfaced.
    pub fn multiply(&self, a: &Mat, b: &Mat) -> Result<Mat>
    where
        B: Sync,
    {
        let (m, k) = a.shape();
        let (k_b, n) = b.shape();
        if k != k_b {
            return Err(GemmError::DimensionMismatch { m, k, k_b, n });
        }
        let lb = self.large_block();
        if m % lb != 0 || k % lb != 0 || n % lb != 0 {
            return Err(GemmError::BlockAlignment {
                m,
                k,
                n,
                large_block: lb,
            });
        }

        let gm = m / lb;
        let gk = k / lb;
        let gn = n / lb;
        let total = (gm * gk * gn) as u64;
        self.progress.start(total);
        log::debug!(
            "blocked multiply: {}x{}x{} large blocks of {}x{} ({} contractions)",
            gm,
            gk,
            gn,
            lb,
            lb,
            total
        );

        let mut c = Mat::zeros(m, n);
        if self.parallel {
            let cells: Vec<Mat> = (0..gm * gn)
                .into_par_iter()
                .map(|cell| self.compute_cell(a, b, cell / gn, cell % gn, gk))
                .collect::<Result<_>>()?;
            for (cell, block) in cells.iter().enumerate() {
                let (i, j) = (cell / gn, cell % gn);
                c.set_block(i * lb, j * lb, block);
            }
        } else {
            for i in 0..gm {
                for j in 0..gn {
                    let block = self.compute_cell(a, b, i, j, gk)?;
                    c.set_block(i * lb, j * lb, &block);
                }
            }
        }
        Ok(c)
    }

    /// One output cell: `sum_k A[i,k] * B[k,j]` over large blocks, k ascending.
    ///
    /// The ascending order is part of the contract — float summation is not
    /// associative, and reproducibility requires a fixed order.
    fn compute_cell(&self, a: &Mat, b: &Mat, i: usize, j: usize, gk: usize) -> Result<Mat> {
        let lb = self.large_block();
        let mut acc = Mat::zeros(lb, lb);
        for kk in 0..gk {
            if let Some(flag) = &self.cancel {
                if flag.load(Ordering::Relaxed) {
                    return Err(GemmError::Cancelled);
                }
            }

            let a_large = a.block(i * lb, kk * lb, lb, lb);
            let b_large = b.block(kk * lb, j * lb, lb, lb);
            let a_grid = BlockGrid::split(&a_large)?;
            let b_grid = BlockGrid::split(&b_large)?;
            let c_grid = fast_multiply(&a_grid, &b_grid, &self.base)?;
            acc.accumulate(&c_grid.assemble())?;

            let done = self.progress.step();
            if let Some(callback) = &self.on_step {
                callback(done, self.progress.total());
            }
        }
        Ok(acc)
    }
}
