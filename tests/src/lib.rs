//! # Quantum-Chain Test Suite
//!
//! Unified test crate for the partial transaction subsystem.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/          # Cross-module flows
//!     ├── support.rs        # Fixtures, tracing setup
//!     ├── partial_pool.rs   # Store + change notifications
//!     └── cosigning_flow.rs # Admission, cosigning, completion
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p qc-tests
//!
//! # By flow
//! cargo test -p qc-tests integration::partial_pool::
//! cargo test -p qc-tests integration::cosigning_flow::
//! ```

#![allow(dead_code)]

pub mod integration;
