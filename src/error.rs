use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::convert::Format;

/// Failure taxonomy for a single conversion. Every variant is fatal to the
/// invocation; nothing is retried and no partial output survives an error.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The input extension is outside the recognized set. Raised before any
    /// extraction is attempted.
    #[error("unsupported file type: {extension}")]
    UnsupportedFormat { extension: String },

    /// The format is recognized but its reader was not compiled into this
    /// build. Raised before any extraction is attempted.
    #[error("{format} support is not built into this binary")]
    DependencyMissing { format: Format },

    /// The input archive or document could not be opened or parsed.
    #[error("failed to read {}: {message}", .path.display())]
    ReadFailure { path: PathBuf, message: String },

    /// The output directory could not be created, or the output file could
    /// not be written.
    #[error("failed to write {}: {source}", .path.display())]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ConvertError {
    pub(crate) fn read(path: &Path, source: impl std::fmt::Display) -> Self {
        ConvertError::ReadFailure {
            path: path.to_path_buf(),
            message: source.to_string(),
        }
    }

    pub(crate) fn write(path: &Path, source: std::io::Error) -> Self {
        ConvertError::WriteFailure {
            path: path.to_path_buf(),
            source,
        }
    }
}
