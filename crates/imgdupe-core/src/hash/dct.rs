//! DCT perceptual hash.
//!
//! 1. Downsample to 32x32 and reduce to grayscale.
//! 2. Apply a 2-D type-II DCT.
//! 3. Keep the 8x8 low-frequency block starting at (1, 1) — the DC row and
//!    column are skipped entirely, their magnitudes would swamp the median.
//! 4. Set one output bit per coefficient above the block's median.

use crate::resample::{self, Filter, SourceImage};
use std::f64::consts::PI;

const DCT_SIZE: usize = 32;
const BLOCK: usize = 8;

/// Compute the 64-bit DCT hash of an image.
pub fn dct(img: &SourceImage) -> u64 {
    let small = resample::resize(img, DCT_SIZE, DCT_SIZE, Filter::Linear);
    let gray = super::luminance_grid(&small);

    let mut vals = vec![0.0; DCT_SIZE * DCT_SIZE];
    for i in 0..DCT_SIZE {
        for j in 0..DCT_SIZE {
            vals[DCT_SIZE * i + j] = gray[i][j];
        }
    }

    let freq = forward_dct_2d(DCT_SIZE, &vals);

    // low-frequency block, offset by one in both axes
    let mut block = Vec::with_capacity(BLOCK * BLOCK);
    for x in 1..=BLOCK {
        for y in 1..=BLOCK {
            block.push(freq[DCT_SIZE * x + y]);
        }
    }

    let mut sorted = block.clone();
    sorted.sort_unstable_by(f64::total_cmp);
    let median = sorted[BLOCK * BLOCK / 2];

    let mut hash = 0u64;
    for (n, &v) in block.iter().enumerate() {
        if v > median {
            hash |= 1 << n;
        }
    }
    hash
}

/// Dense 2-D type-II DCT.
///
/// `F[u,v] = c[u] c[v] / 4 * sum_ij cos((2i+1)u pi / 2N) cos((2j+1)v pi / 2N) f[i,j]`
/// with `c[0] = 1/sqrt(2)` and `c[k>0] = 1`. The cosine arguments only take
/// `2N (N-1)` distinct values, so they come out of a lookup table instead of
/// an O(N^4) pile of transcendentals.
fn forward_dct_2d(n: usize, f: &[f64]) -> Vec<f64> {
    let mut c = vec![1.0; n];
    c[0] = 1.0 / 2.0_f64.sqrt();

    let entries = (2 * n) * (n - 1);
    let mut cos = vec![0.0; entries];
    for (k, slot) in cos.iter_mut().enumerate() {
        *slot = (k as f64 / (2 * n) as f64 * PI).cos();
    }

    let mut out = vec![0.0; n * n];
    for u in 0..n {
        for v in 0..n {
            let mut sum = 0.0;
            for i in 0..n {
                for j in 0..n {
                    sum += cos[(2 * i + 1) * u] * cos[(2 * j + 1) * v] * f[n * i + j];
                }
            }
            out[n * u + v] = sum * c[u] * c[v] / 4.0;
        }
    }
    out
}
