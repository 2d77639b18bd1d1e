//! Partial transaction pool error types.
//!
//! Only infrastructure problems are errors. Duplicate inserts, unknown
//! cosignature parents and empty prunes are expected outcomes returned as
//! `bool`/`Option`/`Vec`; validation failures are [`ValidationResult`] values.
//!
//! [`ValidationResult`]: super::results::ValidationResult

use thiserror::Error;

/// Invalid configuration value.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A limit that must be positive is zero.
    #[error("{field} must be greater than zero")]
    ZeroLimit { field: &'static str },

    /// Multisig depth outside the supported range.
    #[error("max_multisig_depth {depth} is out of range (1..={max})")]
    MultisigDepthOutOfRange { depth: u8, max: u8 },

    /// Response budget smaller than a single transaction header.
    #[error("max_response_size {size} is below the minimum of {minimum} bytes")]
    ResponseSizeTooSmall { size: usize, minimum: usize },
}

/// Failure reading the blockchain state snapshot.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StateError {
    /// The snapshot cannot be read at all.
    #[error("State snapshot unavailable: {0}")]
    Unavailable(String),

    /// A single lookup failed.
    #[error("State lookup failed for {what}: {reason}")]
    LookupFailed { what: &'static str, reason: String },
}
