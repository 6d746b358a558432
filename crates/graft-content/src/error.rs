//! Error types for the `graft-content` crate.
//!
//! All fallible operations in this crate return [`ContentError`].

use std::path::PathBuf;

/// Errors that can occur while reading or writing content documents.
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    /// A file or directory could not be read or written.
    #[error("i/o error on {}: {source}", path.display())]
    Io {
        /// The path being accessed.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A document was not valid JSON for the expected shape.
    #[error("failed to parse JSON: {source}")]
    Json {
        /// The underlying parse error.
        #[from]
        source: serde_json::Error,
    },

    /// A path expected to be a directory is not one.
    #[error("not a directory: {}", .0.display())]
    NotADirectory(PathBuf),
}

impl ContentError {
    /// Wrap an I/O error with the path it occurred on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
