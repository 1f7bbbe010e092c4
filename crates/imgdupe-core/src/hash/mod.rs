//! Perceptual fingerprints and the Hamming metric over them.
//!
//! Two algorithms are available: a gradient hash ([`dhash`]) producing two
//! 64-bit words and a DCT hash ([`dct`]) producing one. A run must use a
//! single algorithm throughout; fingerprints of different lengths cannot be
//! compared and doing so is treated as a programmer error.

mod dct;
mod dhash;

pub use dct::dct;
pub use dhash::dhash;

use crate::resample::Rgba;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An ordered sequence of 64-bit hash words.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(Vec<u64>);

impl Fingerprint {
    pub fn new(words: Vec<u64>) -> Self {
        Self(words)
    }

    pub fn words(&self) -> &[u64] {
        &self.0
    }

    /// Hamming distance: differing bits summed across all words.
    ///
    /// Panics when the fingerprints come from different algorithms (their
    /// word counts differ); indexes built from mixed algorithms are
    /// meaningless and must not get further.
    pub fn hamming(&self, other: &Fingerprint) -> u32 {
        assert_eq!(
            self.0.len(),
            other.0.len(),
            "fingerprint length mismatch: {} vs {} words",
            self.0.len(),
            other.0.len()
        );
        self.0
            .iter()
            .zip(&other.0)
            .map(|(a, b)| (a ^ b).count_ones())
            .sum()
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x")?;
        for w in &self.0 {
            write!(f, "{:016x}", w)?;
        }
        Ok(())
    }
}

/// Which perceptual hash to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashKind {
    /// Row/column gradient hash, two words.
    DHash,
    /// DCT low-frequency hash, one word.
    #[default]
    Dct,
}

impl HashKind {
    /// Look up an algorithm by its user-facing name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "dhash" => Some(HashKind::DHash),
            "dct" => Some(HashKind::Dct),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            HashKind::DHash => "dhash",
            HashKind::Dct => "dct",
        }
    }

    /// Default search radius used when no threshold override is given.
    pub fn default_threshold(self) -> u32 {
        match self {
            HashKind::DHash => 10,
            HashKind::Dct => 22,
        }
    }

    /// Number of 64-bit words in a fingerprint of this kind.
    pub fn words(self) -> usize {
        match self {
            HashKind::DHash => 2,
            HashKind::Dct => 1,
        }
    }

    /// Compute the fingerprint of a decoded image.
    pub fn fingerprint(self, img: &crate::resample::SourceImage) -> Fingerprint {
        match self {
            HashKind::DHash => {
                let (row, col) = dhash(img);
                Fingerprint::new(vec![row, col])
            }
            HashKind::Dct => Fingerprint::new(vec![dct(img)]),
        }
    }
}

/// Luminance of one RGBA pixel on 16-bit-widened channels.
pub(crate) fn luminance(p: [u8; 4]) -> f64 {
    let r = p[0] as u32 * 257;
    let g = p[1] as u32 * 257;
    let b = p[2] as u32 * 257;
    0.299 * r as f64 + 0.587 * g as f64 + 0.114 * b as f64
}

/// Luminance grid of a raster, indexed `[x][y]`.
pub(crate) fn luminance_grid(img: &Rgba) -> Vec<Vec<f64>> {
    let mut grid = vec![vec![0.0; img.height]; img.width];
    for (x, column) in grid.iter_mut().enumerate() {
        for (y, v) in column.iter_mut().enumerate() {
            *v = luminance(img.pixel(x, y));
        }
    }
    grid
}
