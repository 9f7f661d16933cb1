//! Logging setup for applications built on `envfile`.
//!
//! The `envfile` crate emits `tracing` events when it locates, loads and
//! saves files. This crate installs a `tracing-subscriber` that prints them,
//! either as JSON lines or in a human-readable layout.
//!
//! # Example
//!
//! ```no_run
//! use envfile_telemetry::{init_logging, LogConfig};
//!
//! # fn main() -> Result<(), envfile_telemetry::TelemetryError> {
//! init_logging(&LogConfig::development())?;
//! tracing::debug!("logging ready");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod logging;

pub use error::TelemetryError;
pub use logging::{create_env_filter, init_logging, LogConfig, LogFormat};

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;
