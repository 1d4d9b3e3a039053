//! Error types for the itrk idea tracker.
//!
//! The core distinguishes two failure families: a file whose text does not
//! follow the idea file format, and a filesystem operation that failed. The
//! remaining variants belong to the collaborators around the core (backup,
//! configuration, command-line driver).

use std::{io, path::PathBuf};

use thiserror::Error;

/// The main error type for the itrk application.
#[derive(Error, Debug)]
pub enum IdeaError {
    /// The text of an idea file does not follow the metadata + body layout,
    /// or a required metadata field is missing or has the wrong type.
    #[error("Invalid idea format: {message}")]
    Format { message: String },

    /// A filesystem operation (create dir, read, write, remove) failed.
    #[error("Storage error at {}: {source}", .path.display())]
    Storage {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Emitting the YAML metadata header failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_yaml::Error),

    /// Errors related to zip operations.
    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Errors related to backup or restore operations.
    #[error("Backup failed: {message}")]
    Backup { message: String },

    /// Errors related to configuration.
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Idea was not found. Only raised by the command-line driver; the store
    /// reports a missing id as `None` / `false`.
    #[error("Idea not found: {id}")]
    IdeaNotFound { id: u64 },

    /// Errors writing to the terminal or reading user input.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON output failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl IdeaError {
    /// Builds a `Format` error from anything printable.
    pub fn format(message: impl Into<String>) -> Self {
        IdeaError::Format {
            message: message.into(),
        }
    }

    /// Wraps an I/O error together with the path it happened on.
    pub fn storage(path: impl Into<PathBuf>, source: io::Error) -> Self {
        IdeaError::Storage {
            path: path.into(),
            source,
        }
    }

    pub fn is_format(&self) -> bool {
        matches!(self, IdeaError::Format { .. })
    }

    pub fn is_storage(&self) -> bool {
        matches!(self, IdeaError::Storage { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_error_mentions_path() {
        let err = IdeaError::storage(
            "/tmp/ideas/idea1.md",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        let msg = err.to_string();
        assert!(msg.contains("/tmp/ideas/idea1.md"));
        assert!(msg.contains("denied"));
        assert!(err.is_storage());
        assert!(!err.is_format());
    }

    #[test]
    fn test_format_error_display() {
        let err = IdeaError::format("missing required key `id`");
        assert_eq!(
            err.to_string(),
            "Invalid idea format: missing required key `id`"
        );
        assert!(err.is_format());
    }
}
