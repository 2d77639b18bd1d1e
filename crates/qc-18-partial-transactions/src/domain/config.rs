//! Partial transaction pool configuration.
//!
//! # Example
//!
//! ```ignore
//! use qc_18_partial_transactions::domain::PtConfig;
//!
//! let config: PtConfig = serde_json::from_str(json)?;
//! config.validate()?;
//! ```

use super::entities::MosaicId;
use super::errors::ConfigError;
use serde::{Deserialize, Serialize};

/// Upper bound accepted for `max_multisig_depth`.
pub const MAX_SUPPORTED_MULTISIG_DEPTH: u8 = 5;

/// Smallest accepted `max_response_size` in bytes.
pub const MIN_RESPONSE_SIZE: usize = 1024;

/// Partial transaction pool configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PtConfig {
    /// Maximum number of partial transactions held by the store.
    pub max_cache_size: usize,
    /// Byte budget of a single `unknown_transactions` response.
    pub max_response_size: usize,
    /// Maximum embedded transactions per aggregate.
    pub max_transactions_per_aggregate: usize,
    /// Maximum cosignatures per aggregate.
    pub max_cosignatures_per_aggregate: usize,
    /// Maximum distance between now and an aggregate deadline (ms).
    pub max_transaction_lifetime_ms: u64,
    /// Maximum transfer message size in bytes.
    pub max_message_size: usize,
    /// Maximum namespace name length in bytes.
    pub max_namespace_name_size: usize,
    /// Maximum depth followed when resolving multisig cosignatories.
    pub max_multisig_depth: u8,
    /// Mosaic in which transaction fees are paid.
    pub currency_mosaic_id: MosaicId,
}

impl Default for PtConfig {
    fn default() -> Self {
        Self {
            max_cache_size: 1_000_000,
            max_response_size: 20 * 1024 * 1024, // 20 MiB
            max_transactions_per_aggregate: 100,
            max_cosignatures_per_aggregate: 25,
            max_transaction_lifetime_ms: 24 * 60 * 60 * 1000, // 24 hours
            max_message_size: 1024,
            max_namespace_name_size: 64,
            max_multisig_depth: 3,
            currency_mosaic_id: 0x6BED_913F_A202_23F8,
        }
    }
}

impl PtConfig {
    /// Creates a minimal config for testing.
    pub fn for_testing() -> Self {
        Self {
            max_cache_size: 100,
            max_response_size: 64 * 1024,
            max_transactions_per_aggregate: 10,
            max_cosignatures_per_aggregate: 5,
            max_transaction_lifetime_ms: 60_000, // 1 minute
            max_message_size: 64,
            max_namespace_name_size: 16,
            ..Default::default()
        }
    }

    /// Validates limits.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("max_cache_size", self.max_cache_size),
            (
                "max_transactions_per_aggregate",
                self.max_transactions_per_aggregate,
            ),
            (
                "max_cosignatures_per_aggregate",
                self.max_cosignatures_per_aggregate,
            ),
            ("max_namespace_name_size", self.max_namespace_name_size),
        ];
        if let Some((field, _)) = positive.iter().find(|(_, value)| *value == 0) {
            return Err(ConfigError::ZeroLimit { field });
        }

        if self.max_transaction_lifetime_ms == 0 {
            return Err(ConfigError::ZeroLimit {
                field: "max_transaction_lifetime_ms",
            });
        }

        if self.max_multisig_depth == 0 || self.max_multisig_depth > MAX_SUPPORTED_MULTISIG_DEPTH {
            return Err(ConfigError::MultisigDepthOutOfRange {
                depth: self.max_multisig_depth,
                max: MAX_SUPPORTED_MULTISIG_DEPTH,
            });
        }

        if self.max_response_size < MIN_RESPONSE_SIZE {
            return Err(ConfigError::ResponseSizeTooSmall {
                size: self.max_response_size,
                minimum: MIN_RESPONSE_SIZE,
            });
        }

        Ok(())
    }

    /// Builder-style method to set the store capacity.
    pub fn with_max_cache_size(mut self, max_cache_size: usize) -> Self {
        self.max_cache_size = max_cache_size;
        self
    }

    /// Builder-style method to set the response byte budget.
    pub fn with_max_response_size(mut self, max_response_size: usize) -> Self {
        self.max_response_size = max_response_size;
        self
    }

    /// Builder-style method to set the multisig resolution depth.
    pub fn with_max_multisig_depth(mut self, depth: u8) -> Self {
        self.max_multisig_depth = depth;
        self
    }
}
