//! File operations applied to duplicate groups.
//!
//! Every operation keeps going past individual failures and hands back the
//! ones it collected, so one unwritable file never strands the rest of a
//! group.

use crate::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

/// Move `files` into `dir`, keeping their file names.
pub fn move_files(files: &[PathBuf], dir: &Path) -> Vec<Error> {
    let mut failures = Vec::new();
    for src in files {
        let Some(name) = src.file_name() else {
            continue;
        };
        let dst = dir.join(name);
        if let Err(e) = fs::rename(src, &dst) {
            failures.push(Error::FileAction {
                operation: "move",
                path: src.clone(),
                source: e,
            });
        }
    }
    failures
}

/// Copy `files` into `dir`, keeping their file names.
pub fn copy_files(files: &[PathBuf], dir: &Path) -> Vec<Error> {
    let mut failures = Vec::new();
    for src in files {
        let Some(name) = src.file_name() else {
            continue;
        };
        let dst = dir.join(name);
        if let Err(e) = fs::copy(src, &dst) {
            failures.push(Error::FileAction {
                operation: "copy",
                path: src.clone(),
                source: e,
            });
        }
    }
    failures
}

/// Delete the given files.
pub fn delete_files(files: &[PathBuf]) -> Vec<Error> {
    let mut failures = Vec::new();
    for src in files {
        if let Err(e) = fs::remove_file(src) {
            failures.push(Error::FileAction {
                operation: "delete",
                path: src.clone(),
                source: e,
            });
        }
    }
    failures
}
