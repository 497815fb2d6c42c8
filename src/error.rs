//! Error types for reading, writing and rescaling PAK files

use std::path::PathBuf;

use crate::cursor::OpenMode;

/// Errors that can occur while reading, writing or rescaling PAK files
#[derive(Debug, thiserror::Error)]
pub enum PakError {
    /// The file to open does not exist
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The file exists but cannot be opened in the requested mode
    #[error("Permission denied: {}", .0.display())]
    PermissionDenied(PathBuf),

    /// The input ended in the middle of a record
    #[error("Truncated input while reading {0}")]
    Truncated(&'static str),

    /// A field holds a value no valid PAK file can contain
    #[error("Corrupt PAK data: {0}")]
    Corrupt(String),

    /// A dataset violates its length invariants and cannot be written
    #[error("Invalid dataset: {0}")]
    InvalidDataset(String),

    /// A dataset has a shape the current session does not accept
    #[error("Unsupported shape: dataset '{name}' has nz = {nz}, expected nz = 1")]
    UnsupportedShape {
        /// Name of the offending dataset
        name: String,
        /// Number of Z samples it declares
        nz: usize,
    },

    /// Underlying read failure other than end-of-file
    #[error("I/O read error: {0}")]
    IoRead(#[source] std::io::Error),

    /// Underlying write or flush failure
    #[error("I/O write error: {0}")]
    IoWrite(#[source] std::io::Error),

    /// A dataset was released more than once
    #[error("Dataset '{0}' was already released")]
    DoubleRelease(String),
}

impl PakError {
    /// Classify an open failure on `path` into the taxonomy
    pub(crate) fn from_open(err: std::io::Error, path: impl Into<PathBuf>, mode: OpenMode) -> Self {
        match (err.kind(), mode) {
            (std::io::ErrorKind::NotFound, _) => PakError::NotFound(path.into()),
            (std::io::ErrorKind::PermissionDenied, _) => PakError::PermissionDenied(path.into()),
            (_, OpenMode::Read) => PakError::IoRead(err),
            (_, OpenMode::Write) => PakError::IoWrite(err),
        }
    }

    /// Classify a primitive read failure; end-of-file means the record was cut short
    pub(crate) fn from_read(err: std::io::Error, field: &'static str) -> Self {
        if err.kind() == std::io::ErrorKind::UnexpectedEof {
            PakError::Truncated(field)
        } else {
            PakError::IoRead(err)
        }
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, PakError>;
