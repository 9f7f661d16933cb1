//! Read and write flat `KEY=value` environment files.
//!
//! This crate loads a settings file such as `.env` into memory, gives typed
//! access to its values and writes changes back without disturbing the
//! comments, blank lines and ordering a human put there.
//!
//! # Overview
//!
//! - [`Store`] - ordered in-memory map of settings
//! - [`codec`] - parsing text into a store and merging a store back into text
//! - [`EnvironmentFile`] - whole-file load and save at a fixed path
//! - [`Locator`] - finds the file in the working directory or its parents
//! - [`Configuration`] - typed getters and setters over all of the above
//!
//! # Example
//!
//! ```no_run
//! use envfile::Configuration;
//!
//! # fn main() -> Result<(), envfile::EnvError> {
//! let mut config = Configuration::locate();
//! config.load()?;
//!
//! if config.get_boolean_or("MAINTENANCE", false) {
//!     println!("maintenance mode");
//! }
//!
//! config.set("LAUNCH_COUNT", config.get_integer_or("LAUNCH_COUNT", 0) + 1);
//! config.save()?;
//! # Ok(())
//! # }
//! ```
//!
//! # File Format
//!
//! ```text
//! KEY=value
//! KEY2="quoted value"          # optional trailing comment
//! KEY3='single quoted'
//! # a full-line comment
//!
//! MALFORMED LINE WITHOUT EQUALS SIGN
//! ```
//!
//! Keys are trimmed and upper-cased on load. One layer of matching quotes is
//! stripped from values. Lines without `=` are kept verbatim but never become
//! settings.

#![warn(missing_docs)]

pub mod codec;
mod config;
mod error;
mod file;
mod locator;
mod store;

pub use codec::QuoteStyle;
pub use config::{Configuration, SettingValue};
pub use error::{EnvError, EnvResult};
pub use file::EnvironmentFile;
pub use locator::{Locator, LocatorConfig, DEFAULT_FILE_NAME, DEFAULT_PARENT_DEPTH};
pub use store::Store;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_then_query() {
        let store = codec::parse("port=8080\ndebug=TRUE\n");
        assert_eq!(store.get("PORT"), Some("8080"));
        assert_eq!(store.get("DEBUG"), Some("TRUE"));
    }

    #[test]
    fn test_default_locator() {
        let locator = Locator::new();
        assert_eq!(locator.config().file_name, DEFAULT_FILE_NAME);
        assert_eq!(locator.config().parent_depth, DEFAULT_PARENT_DEPTH);
    }
}
