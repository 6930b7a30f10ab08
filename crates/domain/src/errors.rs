//! Error types used throughout the client

use std::time::Duration;

use thiserror::Error;

/// Main error type for the Lattice control plane client
#[derive(Error, Debug)]
pub enum LatticeError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("network error: {0}")]
    Transport(String),

    #[error("authentication failed with status {status}; check client id and secret values")]
    Auth { status: u16 },

    #[error("control plane error: status {status}, response: {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("not found: {0}")]
    NotFound(String),

    #[error("condition was not reached within {waited:?} ({attempts} polls)")]
    WaitTimeout { waited: Duration, attempts: u32 },

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl LatticeError {
    /// True when the error is the remote-absence signal used by
    /// deletion-confirmation polling. Keys off the HTTP status the adapter
    /// mapped, never off response body content.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// True when the wait deadline elapsed before the condition held,
    /// so callers can report "did not complete in time" rather than a
    /// generic failure.
    pub fn is_wait_timeout(&self) -> bool {
        matches!(self, Self::WaitTimeout { .. })
    }
}

/// Result type alias for Lattice operations
pub type Result<T> = std::result::Result<T, LatticeError>;
