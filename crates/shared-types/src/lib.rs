//! # Shared Types Crate
//!
//! This crate contains the chain entities consumed by the partial transaction
//! pool: aggregate transactions, their embedded transactions and detached
//! cosignatures.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All cross-crate entity types are defined here.
//! - **Stable Identity**: An aggregate's hash never covers its cosignatures, so
//!   collecting signatures cannot change which transaction is being signed.
//! - **No Crypto**: Signatures are opaque bytes; verification lives elsewhere.

pub mod entities;

pub use entities::*;
