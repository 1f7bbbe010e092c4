//! Locating image files on disk.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Extensions the codec collaborator can decode. Matching is case-sensitive
/// on the file's suffix.
pub const IMAGE_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Returns true if the path carries a recognized image extension.
pub fn has_image_extension(path: &Path) -> bool {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => IMAGE_EXTENSIONS.contains(&ext),
        None => false,
    }
}

/// Collect image files under `root`. When `recursive` is false, files
/// directly inside `root` are considered but no subdirectory is entered.
pub fn find_images(root: &Path, recursive: bool) -> Vec<PathBuf> {
    let max_depth = if recursive { usize::MAX } else { 1 };
    WalkDir::new(root)
        .max_depth(max_depth)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| has_image_extension(e.path()))
        .map(|e| e.into_path())
        .collect()
}

/// How a command-line target should be treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    /// An existing file with an image extension.
    ImageFile,
    /// An existing directory.
    Directory,
    /// Anything else (missing, wrong extension, special file).
    Other,
}

/// Classify a path for mode selection.
pub fn classify(path: &Path) -> TargetKind {
    if path.is_dir() {
        TargetKind::Directory
    } else if path.is_file() && has_image_extension(path) {
        TargetKind::ImageFile
    } else {
        TargetKind::Other
    }
}
