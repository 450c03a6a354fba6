mod args;
mod load;
mod progress;
mod random;
mod verify;

use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use log::warn;
use rand::rngs::StdRng;
use rand::SeedableRng;
use strassen_gemm::{BlockedMatMul, Mat, LARGE_BLOCK, SMALL_BLOCK};

use args::Cli;

const MATRIX_SIZE: usize = 4096;

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    println!("blocked matrix multiplication, {0}x{0} f32", MATRIX_SIZE);

    let mut rng = StdRng::seed_from_u64(cli.seed);
    let a = operand_a(&cli, &mut rng);

    // B is always freshly generated from the same stream, matching the
    // reference behavior regardless of how A was obtained.
    println!("generating random matrix B...");
    let b = random::standard_normal(MATRIX_SIZE, MATRIX_SIZE, &mut rng);

    print_decomposition(&a);

    let engine = BlockedMatMul::new()
        .parallel(cli.parallel)
        .on_step(progress::render);

    let started = Instant::now();
    let c = engine.multiply(&a, &b)?;
    println!("multiplication finished in {:.1?}", started.elapsed());

    verify::sample_check(&a, &b, &c, cli.samples);
    Ok(())
}

/// Load operand A from the given path, or generate it.
///
/// A failed load is the one error recovered from locally: it is reported
/// and a generated matrix is substituted, as the reference program does.
fn operand_a(cli: &Cli, rng: &mut StdRng) -> Mat {
    if !cli.generate_random {
        if let Some(path) = &cli.matrix_path {
            println!("loading matrix A from {}...", path.display());
            match load::load_matrix(path, MATRIX_SIZE) {
                Ok(mat) => return mat,
                Err(err) => {
                    warn!("failed to load {}: {:#}", path.display(), err);
                    println!("falling back to a random matrix for A");
                }
            }
        }
    }
    println!("generating random matrix A (seed {})...", cli.seed);
    random::standard_normal(MATRIX_SIZE, MATRIX_SIZE, rng)
}

fn print_decomposition(a: &Mat) {
    let grid = a.nrows() / LARGE_BLOCK;
    println!("block decomposition:");
    println!("  large blocks: {0} x {0} x {0}", grid);
    println!("  large block size: {0} x {0}", LARGE_BLOCK);
    println!("  small block size: {0} x {0}", SMALL_BLOCK);
    println!("  total large-block contractions: {}", grid * grid * grid);
}
