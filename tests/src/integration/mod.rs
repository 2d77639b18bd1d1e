//! # Integration Flows
//!
//! Exercises the partial transaction store, its change notifications and the
//! partial validator together, the way transaction admission drives them.

pub mod support;

#[cfg(test)]
mod cosigning_flow;
#[cfg(test)]
mod partial_pool;
