//! # Partial Transactions Subsystem
//!
//! **Subsystem ID:** 18
//!
//! ## Purpose
//!
//! Holds aggregate (multi-signature) transactions while their cosignatures
//! are collected, notifies downstream consumers of every change, and decides
//! whether a partial transaction may be admitted and whether its attached
//! cosignatures are eligible and sufficient.
//!
//! ## Domain Invariants
//!
//! | Invariant | Enforcement Location |
//! |-----------|---------------------|
//! | No duplicate entries | `domain/cache.rs` - `insert()` check |
//! | Cosignatures never change an entry's hash | `shared-types` - hash excludes cosignatures |
//! | One writer, atomic batches | `domain/cache.rs` - write guard held by the modifier |
//! | Exactly one flush per batch, always sent | `domain/aggregate.rs` - `commit()` and `Drop` |
//! | Notified infos carry a zero merkle hash | `domain/aggregate.rs` - `EnrichedTransactionInfo::from` |
//!
//! ## Batch Notifications
//!
//! Every modifier lifetime ends with one ordered notification sequence on
//! the committing thread:
//!
//! ```text
//! notify_add_partials ──→ notify_add_cosignature (×N) ──→ notify_remove_partials ──→ flush(BatchSummary)
//! ```
//!
//! ## Partial Transaction Lifecycle
//!
//! ```text
//! [UNSEEN] ──validate_partial──→ [ADMITTED] ──attach──→ [COSIGNING] ──validate_cosigners──→ [COMPLETE]
//!                                     │                      │
//!                                     └──── prune ───────────┴── Ineligible/Failure ──→ [REMOVED]
//! ```
//!
//! Transitions are enacted by the caller; this crate reports the outcomes.
//!
//! ## Module Structure (Hexagonal Architecture)
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      OUTER LAYER                                │
//! │  adapters/ - change subscribers, in-memory state snapshot      │
//! │  service.rs - DefaultPtValidator                                │
//! │  plugins/  - per-kind publishers and validators                │
//! └─────────────────────────────────────────────────────────────────┘
//!                          ↑ implements ↑
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      MIDDLE LAYER                               │
//! │  ports/inbound.rs  - PtCache, PtCacheView, PtCacheModifier,    │
//! │                      PtValidator                                │
//! │  ports/outbound.rs - StateProvider, TimeSource,                 │
//! │                      NotificationPublisher, PtChangeSubscriber  │
//! └─────────────────────────────────────────────────────────────────┘
//!                          ↑ uses ↑
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      INNER LAYER                                │
//! │  domain/entities.rs      - TransactionEntry, BatchSummary      │
//! │  domain/cache.rs         - MemoryPtCache                       │
//! │  domain/aggregate.rs     - AggregatePtCache, batch guard       │
//! │  domain/pipeline.rs      - validator sets, JointValidator      │
//! │  domain/cosigners.rs     - CosignerNotificationExtractor       │
//! │  domain/results.rs       - Failure, ValidationResult           │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! let manager = PluginManager::with_default_plugins(PtConfig::default());
//! let validator = DefaultPtValidator::new(&manager, state, Arc::new(SystemTimeSource));
//! let cache = AggregatePtCache::new(MemoryPtCache::new(manager.config()), subscriber);
//!
//! if validator.validate_partial(&entry).normalized {
//!     let mut modifier = cache.modifier();
//!     modifier.insert(entry);
//!     let summary = modifier.commit();
//! }
//! ```

pub mod adapters;
pub mod domain;
pub mod plugins;
pub mod ports;
pub mod service;

pub use adapters::*;
pub use domain::*;
pub use plugins::{PluginManager, TransactionPlugin, TransactionRegistry};
pub use ports::*;
pub use service::DefaultPtValidator;
