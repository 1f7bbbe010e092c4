//! Core functionality for finding visually near-duplicate images.
//!
//! The building blocks, leaves first:
//! - image resampling to the small grids the hashers consume
//! - perceptual hashing (gradient dHash and DCT hash)
//! - a vantage-point tree over Hamming distance for radius queries
//! - a parallel pipeline that decodes, hashes and registers files
//! - a grouper that folds query neighborhoods into duplicate groups
//!
//! [`Deduper`] wires them together behind two operations: many-to-many
//! [`Deduper::duplicates`] and one-to-many [`Deduper::compare`].

mod error;

// -- Flatten
pub use config::Config;
pub use error::{Error, Result};
pub use hash::{Fingerprint, HashKind};

use log::info;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use vptree::{FileMapper, Item, VpTree};

// -- Public Modules --
pub mod actions;
pub mod codec;
pub mod config;
pub mod discovery;
pub mod grouper;
pub mod hash;
pub mod pipeline;
pub mod resample;
pub mod vptree;

/// Outcome of a deduplication run.
///
/// Per-file decode failures ride along with the results instead of replacing
/// them; a run only fails outright when nothing could be indexed at all.
#[derive(Debug)]
pub struct Report {
    /// Duplicate groups, rendered as file paths. For a one-to-many
    /// comparison there is at most one group holding the matches.
    pub groups: Vec<Vec<PathBuf>>,
    /// Total number of files across all groups.
    pub total: usize,
    /// Files that could not be decoded.
    pub failures: Vec<Error>,
}

/// Main entry point for the deduplication process
pub struct Deduper {
    config: Config,
}

impl Deduper {
    /// Create a new Deduper with the provided configuration
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Find groups of visually duplicate images among `files`.
    pub fn duplicates(&self, files: &[PathBuf]) -> Result<Report> {
        let (tree, mapper, failures) = self.index(files)?;

        let threshold = self.config.effective_threshold();
        let groups = grouper::group_duplicates(&tree, mapper.as_ref(), threshold);
        let total = groups.iter().map(Vec::len).sum();

        info!(
            "found {} duplicates in {} groups at radius {}",
            total,
            groups.len(),
            threshold
        );
        Ok(Report {
            groups,
            total,
            failures,
        })
    }

    /// Find duplicates of `target` among `files`.
    ///
    /// The target is hashed and registered after the tree is built, so its
    /// fresh id can never collide with an indexed item.
    pub fn compare(&self, target: &Path, files: &[PathBuf]) -> Result<Report> {
        let img = codec::load(target)?;

        let (tree, mapper, failures) = self.index(files)?;

        let hashes = self.config.hash.fingerprint(&img);
        let id = mapper.register(target.to_path_buf());
        let probe = Item { id, hashes };

        let found = tree.within(&probe, self.config.effective_threshold());
        let matches: Vec<PathBuf> = found
            .iter()
            .map(|(item, _)| mapper.path(item.id))
            .collect();

        let total = matches.len();
        let groups = if matches.is_empty() {
            Vec::new()
        } else {
            vec![matches]
        };
        Ok(Report {
            groups,
            total,
            failures,
        })
    }

    fn index(&self, files: &[PathBuf]) -> Result<(VpTree, Arc<FileMapper>, Vec<Error>)> {
        let mapper = Arc::new(FileMapper::new());
        let (items, failures) = pipeline::index_files(
            files,
            self.config.hash,
            self.config.effective_workers(),
            &mapper,
        );
        if items.is_empty() {
            return Err(Error::NoImages);
        }
        Ok((VpTree::new(items), mapper, failures))
    }
}
