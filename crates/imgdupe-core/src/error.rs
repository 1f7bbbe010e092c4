use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = core::result::Result<T, Error>;

/// Custom error types for the imgdupe library
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Image processing error
    #[error("Image processing error: {0}")]
    Image(#[from] image::ImageError),

    /// A file could not be decoded into an image
    #[error("unable to load {path}: {source}")]
    Decode {
        path: PathBuf,
        source: image::ImageError,
    },

    /// A file operation (move/copy/delete) failed
    #[error("unable to {operation} {path}: {source}")]
    FileAction {
        operation: &'static str,
        path: PathBuf,
        source: std::io::Error,
    },

    /// No decodable images remained after indexing
    #[error("no decodable images in input")]
    NoImages,

    /// Invalid configuration error
    #[error("Invalid configuration: {0}")]
    Configuration(String),
}
