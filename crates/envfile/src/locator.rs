//! Locating the environment file on disk.
//!
//! The [`Locator`] looks for the file in a base directory (the working
//! directory by default), then in up to [`LocatorConfig::parent_depth`]
//! parent directories. The first existing candidate wins. If there is none,
//! an empty file is created in the base directory.
//!
//! # Example
//!
//! ```no_run
//! use envfile::Locator;
//!
//! let path = Locator::new()
//!     .with_file_name(".env.local")
//!     .with_parent_depth(3)
//!     .locate();
//! println!("using {}", path.display());
//! ```

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Default name of the environment file.
pub const DEFAULT_FILE_NAME: &str = ".env";

/// Default number of parent directories searched.
pub const DEFAULT_PARENT_DEPTH: usize = 2;

/// Search policy for the environment file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LocatorConfig {
    /// File name to look for.
    pub file_name: String,

    /// How many parent directories above the base directory to search.
    pub parent_depth: usize,

    /// Whether to create an empty file in the base directory when none is
    /// found.
    pub create_if_missing: bool,
}

impl Default for LocatorConfig {
    fn default() -> Self {
        Self {
            file_name: DEFAULT_FILE_NAME.to_string(),
            parent_depth: DEFAULT_PARENT_DEPTH,
            create_if_missing: true,
        }
    }
}

/// Finds the environment file.
#[derive(Debug, Clone, Default)]
pub struct Locator {
    config: LocatorConfig,
    base_dir: Option<PathBuf>,
}

impl Locator {
    /// Create a locator with the default policy.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a locator from a deserialized policy.
    #[must_use]
    pub fn from_config(config: LocatorConfig) -> Self {
        Self {
            config,
            base_dir: None,
        }
    }

    /// Set the file name to look for.
    #[must_use]
    pub fn with_file_name(mut self, name: impl Into<String>) -> Self {
        self.config.file_name = name.into();
        self
    }

    /// Set how many parent directories to search.
    #[must_use]
    pub fn with_parent_depth(mut self, depth: usize) -> Self {
        self.config.parent_depth = depth;
        self
    }

    /// Set whether to create the file when it is not found.
    #[must_use]
    pub fn with_create_if_missing(mut self, create: bool) -> Self {
        self.config.create_if_missing = create;
        self
    }

    /// Search from `dir` instead of the working directory.
    #[must_use]
    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    /// The policy in use.
    pub fn config(&self) -> &LocatorConfig {
        &self.config
    }

    /// Candidate paths in search order.
    pub fn candidates(&self) -> Vec<PathBuf> {
        let base = self.base_dir();
        (0..=self.config.parent_depth)
            .map(|level| {
                let mut dir = base.to_path_buf();
                for _ in 0..level {
                    dir.push("..");
                }
                dir.join(&self.config.file_name)
            })
            .collect()
    }

    /// Locate the file.
    ///
    /// Never fails: if nothing is found and creation fails (or is disabled),
    /// the path in the base directory is returned anyway and a later load
    /// reports the problem.
    pub fn locate(&self) -> PathBuf {
        if let Some(found) = self.candidates().into_iter().find(|p| p.is_file()) {
            debug!(path = %found.display(), "found environment file");
            return found;
        }

        let path = self.base_dir().join(&self.config.file_name);
        if self.config.create_if_missing {
            match OpenOptions::new().write(true).create(true).truncate(false).open(&path) {
                Ok(_) => debug!(path = %path.display(), "created environment file"),
                Err(e) => warn!(path = %path.display(), error = %e, "could not create environment file"),
            }
        }
        path
    }

    fn base_dir(&self) -> &Path {
        self.base_dir.as_deref().unwrap_or_else(|| Path::new("."))
    }
}
