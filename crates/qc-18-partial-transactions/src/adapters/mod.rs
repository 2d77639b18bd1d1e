//! Adapters layer for the partial transaction pool.
//!
//! Implementations of the outbound ports:
//! - `subscriber`: change subscriber fan-out, logging, recording and no-op
//! - `state`: in-memory blockchain state snapshot

pub mod state;
pub mod subscriber;

pub use state::InMemoryStateProvider;
pub use subscriber::{
    AggregatePtChangeSubscriber, LoggingPtChangeSubscriber, NoOpPtChangeSubscriber,
    PtChangeEvent, RecordingPtChangeSubscriber,
};
