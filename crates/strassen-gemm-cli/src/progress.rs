//! Progress rendering for the engine's contraction counter.

use std::io::{self, Write};

/// Render one progress update to stderr, overwriting the previous line.
///
/// Suitable as a [`strassen_gemm::BlockedMatMul::on_step`] callback; with
/// parallel cells the updates may arrive slightly out of order, which at
/// worst redraws a marginally older count.
pub fn render(done: u64, total: u64) {
    let percent = 100.0 * done as f64 / total as f64;
    eprint!(
        "\rmultiplying: {}/{} large-block contractions ({:.1}%)",
        done, total, percent
    );
    if done >= total {
        eprintln!();
    }
    let _ = io::stderr().flush();
}
