//! Domain layer for the partial transaction pool.
//!
//! Contains the core business logic:
//! - Entities (TransactionEntry, EnrichedTransactionInfo, BatchSummary)
//! - In-memory store and the change-notifying batch guard
//! - Validation pipeline, notifications and result codes
//! - Cosigner notification extraction

pub mod aggregate;
pub mod cache;
pub mod config;
pub mod cosigners;
pub mod entities;
pub mod errors;
pub mod notifications;
pub mod pipeline;
pub mod results;

pub use aggregate::{AggregatePtCache, AggregatePtCacheModifier};
pub use cache::{MemoryPtCache, MemoryPtCacheModifier, MemoryPtCacheView};
pub use config::PtConfig;
pub use cosigners::{required_cosigners, AdditionalCosignatories, CosignerNotificationExtractor};
pub use entities::*;
pub use errors::{ConfigError, StateError};
pub use notifications::*;
pub use pipeline::*;
pub use results::*;
