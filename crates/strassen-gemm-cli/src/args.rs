use std::path::PathBuf;

use clap::Parser;

/// Blocked matrix multiplication with a 49-multiplication 4x4 fast kernel.
#[derive(Parser)]
#[command(name = "strassen-gemm", version, about)]
pub struct Cli {
    /// Path to a 4096x4096 matrix file for operand A (.npy, .csv, .txt)
    pub matrix_path: Option<PathBuf>,

    /// Generate a random operand A instead of loading from a file
    #[arg(long)]
    pub generate_random: bool,

    /// Random seed for matrix generation
    #[arg(long, default_value = "42")]
    pub seed: u64,

    /// Compute output cells on multiple threads
    #[arg(long)]
    pub parallel: bool,

    /// Number of output coordinates to verify by direct dot product
    #[arg(long, default_value = "100")]
    pub samples: usize,
}
