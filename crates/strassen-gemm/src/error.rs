//! Error types for blocked multiplication.

use thiserror::Error;

/// Errors that can occur during a blocked multiplication.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GemmError {
    /// The inner dimensions of the operands disagree.
    #[error("dimension mismatch: A is {m}x{k}, B is {k_b}x{n}")]
    DimensionMismatch {
        m: usize,
        k: usize,
        k_b: usize,
        n: usize,
    },

    /// An operand dimension is not a multiple of the large block size.
    #[error("matrix dimensions {m}x{k}x{n} must be multiples of the large block size {large_block}")]
    BlockAlignment {
        m: usize,
        k: usize,
        n: usize,
        large_block: usize,
    },

    /// A block did not match the shape expected at a component boundary.
    ///
    /// Escaping the tiler or the fast-multiply path, this indicates an
    /// internal contract violation rather than a recoverable condition.
    #[error("shape error: expected {expected:?}, got {actual:?}")]
    Shape {
        expected: (usize, usize),
        actual: (usize, usize),
    },

    /// The multiplication was aborted through the cancellation flag.
    #[error("multiplication cancelled")]
    Cancelled,
}

/// Result type for blocked multiplication operations.
pub type Result<T> = std::result::Result<T, GemmError>;
