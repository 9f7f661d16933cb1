//! Environment file error types.

use std::num::ParseIntError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for environment file operations.
pub type EnvResult<T> = Result<T, EnvError>;

/// Errors that can occur while reading, querying or writing an environment file.
#[derive(Error, Debug)]
pub enum EnvError {
    /// A typed getter was called on a key that is not in the store.
    #[error("the key \"{key}\" couldn't be found in the configuration")]
    MissingKey {
        /// The key that was looked up.
        key: String,
    },

    /// An integer getter found a value that is not an integer.
    #[error("value \"{value}\" of key \"{key}\" cannot be parsed into an integer")]
    NumberFormat {
        /// The key that was looked up.
        key: String,
        /// The raw stored value.
        value: String,
        /// Underlying parse error.
        #[source]
        source: ParseIntError,
    },

    /// A boolean getter found a value other than `true`/`false`.
    #[error("value \"{value}\" of key \"{key}\" cannot be parsed into a boolean")]
    BooleanFormat {
        /// The key that was looked up.
        key: String,
        /// The raw stored value.
        value: String,
    },

    /// Reading, writing or creating the file failed.
    #[error("I/O error accessing environment file {path}: {source}")]
    Io {
        /// Path to the file.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The target file is not writable, so nothing was written.
    #[error("insufficient permission to write to the environment file {path}")]
    WriteDenied {
        /// Path to the file.
        path: PathBuf,
    },
}

impl EnvError {
    /// Create a new missing key error.
    pub fn missing_key(key: impl Into<String>) -> Self {
        Self::MissingKey { key: key.into() }
    }

    /// Create a new number format error.
    pub fn number_format(
        key: impl Into<String>,
        value: impl Into<String>,
        source: ParseIntError,
    ) -> Self {
        Self::NumberFormat {
            key: key.into(),
            value: value.into(),
            source,
        }
    }

    /// Create a new boolean format error.
    pub fn boolean_format(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::BooleanFormat {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Create a new I/O error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a new write denied error.
    pub fn write_denied(path: impl Into<PathBuf>) -> Self {
        Self::WriteDenied { path: path.into() }
    }

    /// Returns `true` for the kinds raised by typed getters.
    ///
    /// These are routine outcomes of a lookup rather than faults, and are the
    /// ones the fallback getters absorb.
    pub fn is_lookup_failure(&self) -> bool {
        matches!(
            self,
            Self::MissingKey { .. } | Self::NumberFormat { .. } | Self::BooleanFormat { .. }
        )
    }

    /// Returns `true` for errors raised by the file system.
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io { .. } | Self::WriteDenied { .. })
    }
}
