//! Error types for archive extraction.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while unpacking an archive.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// Reading the archive or writing an entry failed.
    #[error("IO error extracting to {path}: {source}")]
    Io {
        /// Path being read or written.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The zip archive is invalid or an entry could not be read.
    #[error("invalid or corrupt ZIP {path}: {source}")]
    Zip {
        /// Archive path.
        path: PathBuf,
        /// Underlying zip error.
        #[source]
        source: zip::result::ZipError,
    },

    /// The 7z archive could not be decompressed.
    #[error("failed to extract 7z {path}: {message}")]
    SevenZ {
        /// Archive path.
        path: PathBuf,
        /// Decoder message.
        message: String,
    },

    /// The rar archive could not be extracted.
    #[error("failed to extract RAR {path}: {message}")]
    Rar {
        /// Archive path.
        path: PathBuf,
        /// Decoder message.
        message: String,
    },

    /// The rar decoder only accepts UTF-8 paths.
    #[error("path is not valid UTF-8: {path}")]
    NonUtf8Path {
        /// Offending path.
        path: PathBuf,
    },

    /// The background extraction task panicked or was cancelled.
    #[error("extraction task failed: {0}")]
    Task(String),
}

impl ExtractError {
    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates a zip error.
    pub fn zip(path: impl Into<PathBuf>, source: zip::result::ZipError) -> Self {
        Self::Zip {
            path: path.into(),
            source,
        }
    }
}
