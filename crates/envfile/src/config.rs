//! Typed access to an environment file.
//!
//! [`Configuration`] owns an [`EnvironmentFile`] and the [`Store`] loaded from
//! it. Getters come in two flavours: a strict one returning
//! [`EnvResult`], and an `_or` one taking a fallback that never fails.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::{EnvError, EnvResult, EnvironmentFile, Locator, Store};

/// A value accepted by [`Configuration::set`] and
/// [`Configuration::key_equals`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingValue {
    /// Stored as-is and compared exactly.
    Text(String),
    /// Stored in decimal and compared exactly.
    Integer(i64),
    /// Stored as `true`/`false` and compared case-insensitively.
    Boolean(bool),
}

impl SettingValue {
    fn matches(&self, stored: &str) -> bool {
        match self {
            Self::Text(text) => stored == text.as_str(),
            Self::Integer(n) => stored == n.to_string(),
            Self::Boolean(b) => stored.eq_ignore_ascii_case(bool_str(*b)),
        }
    }
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Boolean(b) => f.write_str(bool_str(*b)),
        }
    }
}

impl From<&str> for SettingValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for SettingValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for SettingValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for SettingValue {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<bool> for SettingValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

fn bool_str(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

/// Parse `true`/`false` in any letter case.
fn parse_bool(s: &str) -> Option<bool> {
    if s.eq_ignore_ascii_case("true") {
        Some(true)
    } else if s.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// The settings of an application, backed by an environment file.
///
/// Keys are looked up exactly as given. Keys read from the file are
/// upper-cased, so query them in upper case.
///
/// # Example
///
/// ```no_run
/// use envfile::Configuration;
///
/// # fn main() -> Result<(), envfile::EnvError> {
/// let mut config = Configuration::from_path(".env");
/// config.load()?;
///
/// let port = config.get_integer_or("PORT", 8080);
/// let debug = config.get_boolean_or("DEBUG", false);
///
/// config.set("LAST_PORT", port);
/// config.save()?;
/// # let _ = debug;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Configuration {
    file: EnvironmentFile,
    settings: Store,
}

impl Configuration {
    /// Create a configuration for the file found by the default [`Locator`].
    ///
    /// Nothing is loaded yet; call [`load`](Self::load).
    pub fn locate() -> Self {
        Self::with_locator(&Locator::new())
    }

    /// Create a configuration for the file found by `locator`.
    pub fn with_locator(locator: &Locator) -> Self {
        Self::from_path(locator.locate())
    }

    /// Create a configuration for the file at `path`.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self {
            file: EnvironmentFile::new(path),
            settings: Store::new(),
        }
    }

    /// Create a configuration for the file at `path` and load it.
    ///
    /// # Errors
    ///
    /// Returns [`EnvError::Io`] if the file cannot be read.
    pub fn open(path: impl Into<PathBuf>) -> EnvResult<Self> {
        let mut config = Self::from_path(path);
        config.load()?;
        Ok(config)
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// The settings currently held in memory.
    pub fn store(&self) -> &Store {
        &self.settings
    }

    /// Get the value of a key.
    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.settings.get(key)
    }

    /// Get the value of a key, or `fallback` if it is absent.
    pub fn get_string_or(&self, key: &str, fallback: &str) -> String {
        self.get_string(key).unwrap_or(fallback).to_string()
    }

    /// Get the value of a key as an integer.
    ///
    /// Values are read as 64-bit signed integers, so `2147483648` and other
    /// values outside the 32-bit range are accepted. Only values beyond
    /// `i64` fail with [`EnvError::NumberFormat`].
    ///
    /// # Errors
    ///
    /// Returns [`EnvError::MissingKey`] if the key is absent and
    /// [`EnvError::NumberFormat`] if the value is not an integer.
    pub fn get_integer(&self, key: &str) -> EnvResult<i64> {
        let value = self.require(key)?;
        value
            .parse::<i64>()
            .map_err(|e| EnvError::number_format(key, value, e))
    }

    /// Get the value of a key as an integer, or `fallback` if it is absent or
    /// not an integer.
    pub fn get_integer_or(&self, key: &str, fallback: i64) -> i64 {
        self.get_integer(key).unwrap_or(fallback)
    }

    /// Get the value of a key as a boolean. Only `true` and `false` are
    /// accepted, in any letter case.
    ///
    /// # Errors
    ///
    /// Returns [`EnvError::MissingKey`] if the key is absent and
    /// [`EnvError::BooleanFormat`] if the value is not a boolean.
    pub fn get_boolean(&self, key: &str) -> EnvResult<bool> {
        let value = self.require(key)?;
        parse_bool(value).ok_or_else(|| EnvError::boolean_format(key, value))
    }

    /// Get the value of a key as a boolean, or `fallback` if it is absent or
    /// not a boolean.
    pub fn get_boolean_or(&self, key: &str, fallback: bool) -> bool {
        self.get_boolean(key).unwrap_or(fallback)
    }

    /// Set the value of a key, returning its previous value.
    ///
    /// ```
    /// use envfile::Configuration;
    ///
    /// let mut config = Configuration::from_path(".env");
    /// config.set("WORKERS", 4);
    /// config.set("VERBOSE", true);
    /// assert_eq!(config.set("NAME", "demo"), None);
    /// assert_eq!(config.get_string("WORKERS"), Some("4"));
    /// assert_eq!(config.get_string("VERBOSE"), Some("true"));
    /// ```
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<SettingValue>) -> Option<String> {
        self.settings.set(key, value.into().to_string())
    }

    /// Remove a key, returning its value. The key's line is dropped from the
    /// file on the next save.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.settings.remove(key)
    }

    /// Returns `true` if the key's value equals `value`, `false` if it
    /// differs or the key is absent.
    ///
    /// Booleans compare case-insensitively.
    pub fn key_equals(&self, key: &str, value: impl Into<SettingValue>) -> bool {
        self.key_equals_or(key, value, false)
    }

    /// Like [`key_equals`](Self::key_equals), returning `fallback` when the
    /// key is absent.
    pub fn key_equals_or(&self, key: &str, value: impl Into<SettingValue>, fallback: bool) -> bool {
        match self.settings.get(key) {
            Some(stored) => value.into().matches(stored),
            None => fallback,
        }
    }

    /// All keys, in insertion order.
    pub fn keys(&self) -> Vec<String> {
        self.settings.keys().map(str::to_string).collect()
    }

    /// Replace the in-memory settings with the file's contents.
    ///
    /// # Errors
    ///
    /// Returns [`EnvError::Io`] if the file cannot be read. The in-memory
    /// settings are left untouched in that case.
    pub fn load(&mut self) -> EnvResult<()> {
        self.settings = self.file.load()?;
        Ok(())
    }

    /// Write the in-memory settings back to the file.
    ///
    /// # Errors
    ///
    /// Returns [`EnvError::WriteDenied`] if the file is read-only and
    /// [`EnvError::Io`] if reading or writing fails.
    pub fn save(&self) -> EnvResult<()> {
        self.file.save(&self.settings)
    }

    fn require(&self, key: &str) -> EnvResult<&str> {
        self.settings
            .get(key)
            .ok_or_else(|| EnvError::missing_key(key))
    }
}
