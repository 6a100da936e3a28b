//! Custom error types for the application.
//!
//! This module defines the primary error type, `ScopeError`, used across the
//! crate. Using the `thiserror` crate, it provides a centralized taxonomy for
//! everything that can go wrong between the serial link and the export sink:
//!
//! - **`Config`**: wraps errors from `figment`, i.e. file parsing or format
//!   issues in the configuration files.
//! - **`Configuration`**: semantic configuration errors that pass parsing but
//!   are logically wrong (unknown channel in a range group, zero capacity).
//!   These are caught by [`crate::config::Settings::validate`].
//! - **`Io`**: standard `std::io::Error`, covering file I/O.
//! - **`Connect`**: failure to open the serial link at startup. Reported as a
//!   warning; the process continues in a disconnected state rather than
//!   crashing.
//! - **`Read`**: a transport read error. Fatal to the ingestion loop, which
//!   stops the pipeline.
//! - **`Storage`**: export sink failures.
//! - **`PipelineHalted`**: the background reader exited (or was never able to
//!   produce a record) while a caller was still depending on it.
//! - **`FeatureNotEnabled`**: functionality compiled out via feature flags,
//!   with a hint on how to enable it.
//!
//! Frame timeouts are deliberately *not* an error: the frame reader encodes
//! them as `Ok(None)` and the ingestion loop retries indefinitely. Decode
//! failures are likewise not part of this taxonomy; they are a typed result
//! ([`crate::telemetry::record::DecodeFailure`]) consumed by an explicit
//! fallback policy, never propagated upward.

use thiserror::Error;

/// Convenience alias for results using the application error type.
pub type ScopeResult<T> = std::result::Result<T, ScopeError>;

/// Application-wide error taxonomy.
#[derive(Error, Debug)]
pub enum ScopeError {
    #[error("Configuration error: {0}")]
    Config(#[from] figment::Error),

    #[error("Configuration validation error: {0}")]
    Configuration(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to connect to '{port}': {message}")]
    Connect { port: String, message: String },

    #[error("Transport read error: {0}")]
    Read(std::io::Error),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Ingestion pipeline halted")]
    PipelineHalted,

    #[error("Feature '{0}' is not enabled. Please build with --features {0}")]
    FeatureNotEnabled(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_errors_are_distinct_from_general_io() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "link dropped");
        let err = ScopeError::Read(io);
        assert!(err.to_string().contains("Transport read error"));
    }

    #[test]
    fn feature_message_names_the_flag() {
        let err = ScopeError::FeatureNotEnabled("link_serial".to_string());
        assert!(err.to_string().contains("--features link_serial"));
    }
}
