//! # Error Types
//!
//! Failures that prevent a data file from being read at all. These are not
//! findings about the data itself; the loader converts each of them into a
//! single ERROR [`Issue`](crate::Issue) so a run never aborts on bad input.
//!
//! The `Display` text of every variant is the issue message shown to the
//! user, so it is phrased as a sentence about the file, not about Rust.

use std::path::PathBuf;

use thiserror::Error;

/// Error while reading a dataset file from disk.
#[derive(Error, Debug)]
pub enum DatasetError {
    /// The file does not exist.
    #[error("File not found.")]
    NotFound {
        /// Path that was looked up.
        path: PathBuf,
    },

    /// The file exists but could not be read.
    #[error("Cannot read file: {source}")]
    Unreadable {
        /// Path of the unreadable file.
        path: PathBuf,
        /// Underlying IO failure.
        #[source]
        source: std::io::Error,
    },

    /// The file (or one line of it) is not valid UTF-8.
    #[error("Invalid UTF-8: {source}")]
    InvalidUtf8 {
        /// Path of the offending file.
        path: PathBuf,
        /// Decoder failure.
        #[source]
        source: std::str::Utf8Error,
    },

    /// The file (or one line of it) is not valid JSON.
    #[error("Invalid JSON: {source}")]
    InvalidJson {
        /// Path of the offending file.
        path: PathBuf,
        /// Parser failure, including line and column.
        #[source]
        source: serde_json::Error,
    },
}

impl DatasetError {
    /// Path of the file the error refers to.
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::NotFound { path }
            | Self::Unreadable { path, .. }
            | Self::InvalidUtf8 { path, .. }
            | Self::InvalidJson { path, .. } => path,
        }
    }
}
