//! Basic example: multiply two 512x512 matrices and spot-check the result.

use strassen_gemm::{BlockedMatMul, Mat};

fn main() {
    let n = 512;
    let a = Mat::from_fn(n, n, |i, j| ((i * 7 + j * 3) % 100) as f32 * 0.1);
    let b = Mat::from_fn(n, n, |i, j| ((i * 5 + j * 11) % 100) as f32 * 0.1);

    let engine = BlockedMatMul::new().on_step(|done, total| {
        if done == total || done % 4 == 0 {
            eprint!("\r{}/{} large-block contractions", done, total);
        }
    });

    let c = engine.multiply(&a, &b).expect("aligned 512x512 operands");
    eprintln!();

    // spot-check one coordinate against a direct dot product
    let (i, j) = (17, 203);
    let expected: f32 = (0..n).map(|t| a[(i, t)] * b[(t, j)]).sum();
    println!("C[{}, {}] = {:.4} (direct dot product: {:.4})", i, j, c[(i, j)], expected);
    println!("max |C| = {:.4}", c.as_slice().iter().fold(0.0f32, |m, v| m.max(v.abs())));
}
