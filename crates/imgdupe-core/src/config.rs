use crate::error::{Error, Result};
use crate::hash::HashKind;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// Configuration for a deduplication run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Which perceptual hash to use
    pub hash: HashKind,

    /// Search radius override; `None` uses the hash's default
    pub threshold: Option<u32>,

    /// Whether directory targets are searched recursively
    pub recursive: bool,

    /// Number of indexing workers (0 = one per logical CPU)
    pub workers: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            hash: HashKind::default(),
            threshold: None,
            recursive: false,
            workers: 0,
        }
    }
}

impl Config {
    /// The radius actually used for queries.
    pub fn effective_threshold(&self) -> u32 {
        self.threshold.unwrap_or_else(|| self.hash.default_threshold())
    }

    /// Worker count with the auto default resolved.
    pub fn effective_workers(&self) -> usize {
        if self.workers == 0 {
            num_cpus::get()
        } else {
            self.workers
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.threshold == Some(0) {
            return Err(Error::Configuration(
                "threshold must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let config: Config = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| Error::Configuration(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Write configuration to a JSON file.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)
            .map_err(|e| Error::Configuration(e.to_string()))?;
        Ok(())
    }
}
