//! Ports layer for the partial transaction pool.
//!
//! Defines the inbound (driving) and outbound (driven) port traits.

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
