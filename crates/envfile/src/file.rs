//! Disk-backed environment file.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::{codec, EnvError, EnvResult, Store};

/// An environment file at a fixed path.
///
/// Each [`load`](Self::load) and [`save`](Self::save) opens, reads or writes
/// the whole file and closes it again; no handle is held between calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentFile {
    path: PathBuf,
}

impl EnvironmentFile {
    /// Create an environment file for the given path. Nothing is touched on
    /// disk until the first load or save.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse the file.
    ///
    /// # Errors
    ///
    /// Returns [`EnvError::Io`] if the file cannot be read.
    pub fn load(&self) -> EnvResult<Store> {
        let text = fs::read_to_string(&self.path).map_err(|e| EnvError::io(&self.path, e))?;
        let store = codec::parse(&text);
        debug!(path = %self.path.display(), settings = store.len(), "loaded environment file");
        Ok(store)
    }

    /// Merge `store` into the file's current text and write it back.
    ///
    /// A file that does not exist yet is treated as empty and created.
    ///
    /// # Errors
    ///
    /// Returns [`EnvError::WriteDenied`] if the file is read-only, before
    /// anything is read or written, and [`EnvError::Io`] if reading or
    /// writing fails.
    pub fn save(&self, store: &Store) -> EnvResult<()> {
        self.check_writable()?;

        let original = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => String::new(),
            Err(e) => return Err(EnvError::io(&self.path, e)),
        };

        let text = codec::serialize(store, &original);
        fs::write(&self.path, text).map_err(|e| EnvError::io(&self.path, e))?;
        debug!(path = %self.path.display(), settings = store.len(), "saved environment file");
        Ok(())
    }

    fn check_writable(&self) -> EnvResult<()> {
        match fs::metadata(&self.path) {
            Ok(meta) if meta.permissions().readonly() => Err(EnvError::write_denied(&self.path)),
            Ok(_) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(EnvError::io(&self.path, e)),
        }
    }
}
