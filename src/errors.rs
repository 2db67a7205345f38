//! Error taxonomy for the expiry alert job.
//!
//! Per-token delivery failures are not represented here: they are data
//! (`SendOutcome` records) tallied by the dispatcher. Errors in this module
//! abort the run and map to a non-zero process exit.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type AlertResult<T> = Result<T, AlertError>;

/// Errors that can abort an alert run.
#[derive(Debug, Error)]
pub enum AlertError {
    /// Missing or malformed service-account credential. Fatal at startup,
    /// before any I/O.
    #[error("Credential error: {0}")]
    Credential(String),

    /// Invalid configuration. Fatal at startup.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Failed to obtain an access token for the external services.
    #[error("Auth error: {0}")]
    Auth(String),

    /// Document store (inventory or token registry) call failed.
    #[error("Store error: {0}")]
    Store(String),

    /// A push delivery batch request failed at the transport level.
    #[error("Push delivery error: {0}")]
    Push(String),
}
