//! Change subscriber adapters.
//!
//! Implementations of [`PtChangeSubscriber`] that fan out, log, record or
//! discard partial transaction store changes.

use crate::domain::{BatchSummary, Cosignature, EnrichedTransactionInfo};
use crate::ports::PtChangeSubscriber;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, trace};

/// Forwards every call to each registered subscriber in registration order.
#[derive(Default)]
pub struct AggregatePtChangeSubscriber {
    subscribers: Vec<Arc<dyn PtChangeSubscriber>>,
}

impl AggregatePtChangeSubscriber {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style method to register a subscriber.
    pub fn with_subscriber(mut self, subscriber: Arc<dyn PtChangeSubscriber>) -> Self {
        self.subscribers.push(subscriber);
        self
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }
}

impl PtChangeSubscriber for AggregatePtChangeSubscriber {
    fn notify_add_partials(&self, infos: &[EnrichedTransactionInfo]) {
        for subscriber in &self.subscribers {
            subscriber.notify_add_partials(infos);
        }
    }

    fn notify_add_cosignature(&self, parent: &EnrichedTransactionInfo, cosignature: &Cosignature) {
        for subscriber in &self.subscribers {
            subscriber.notify_add_cosignature(parent, cosignature);
        }
    }

    fn notify_remove_partials(&self, infos: &[EnrichedTransactionInfo]) {
        for subscriber in &self.subscribers {
            subscriber.notify_remove_partials(infos);
        }
    }

    fn flush(&self, summary: &BatchSummary) {
        for subscriber in &self.subscribers {
            subscriber.flush(summary);
        }
    }
}

/// Discards every change.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpPtChangeSubscriber;

impl PtChangeSubscriber for NoOpPtChangeSubscriber {
    fn notify_add_partials(&self, _infos: &[EnrichedTransactionInfo]) {}

    fn notify_add_cosignature(&self, _parent: &EnrichedTransactionInfo, _cosignature: &Cosignature) {}

    fn notify_remove_partials(&self, _infos: &[EnrichedTransactionInfo]) {}

    fn flush(&self, _summary: &BatchSummary) {}
}

/// Logs every change through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingPtChangeSubscriber;

impl PtChangeSubscriber for LoggingPtChangeSubscriber {
    fn notify_add_partials(&self, infos: &[EnrichedTransactionInfo]) {
        for info in infos {
            trace!("[qc-18] Added partial {}", hex::encode(&info.hash()[..4]));
        }
    }

    fn notify_add_cosignature(&self, parent: &EnrichedTransactionInfo, cosignature: &Cosignature) {
        trace!(
            "[qc-18] Added cosignature from {} to {}",
            hex::encode(&cosignature.signer[..4]),
            hex::encode(&parent.hash()[..4])
        );
    }

    fn notify_remove_partials(&self, infos: &[EnrichedTransactionInfo]) {
        for info in infos {
            trace!("[qc-18] Removed partial {}", hex::encode(&info.hash()[..4]));
        }
    }

    fn flush(&self, summary: &BatchSummary) {
        if summary.is_empty() {
            return;
        }

        debug!(
            adds = summary.adds,
            cosignature_adds = summary.cosignature_adds,
            removes = summary.removes,
            "[qc-18] Partial transaction batch committed"
        );
    }
}

/// A single recorded change.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PtChangeEvent {
    AddPartials(Vec<EnrichedTransactionInfo>),
    AddCosignature(EnrichedTransactionInfo, Cosignature),
    RemovePartials(Vec<EnrichedTransactionInfo>),
    Flush(BatchSummary),
}

/// Records every change in arrival order.
#[derive(Debug, Default)]
pub struct RecordingPtChangeSubscriber {
    events: Mutex<Vec<PtChangeEvent>>,
}

impl RecordingPtChangeSubscriber {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the recorded events.
    pub fn events(&self) -> Vec<PtChangeEvent> {
        self.events.lock().clone()
    }

    /// Summaries of every recorded flush.
    pub fn flushes(&self) -> Vec<BatchSummary> {
        self.events
            .lock()
            .iter()
            .filter_map(|event| match event {
                PtChangeEvent::Flush(summary) => Some(*summary),
                _ => None,
            })
            .collect()
    }

    /// Clears the recorded events.
    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl PtChangeSubscriber for RecordingPtChangeSubscriber {
    fn notify_add_partials(&self, infos: &[EnrichedTransactionInfo]) {
        self.events
            .lock()
            .push(PtChangeEvent::AddPartials(infos.to_vec()));
    }

    fn notify_add_cosignature(&self, parent: &EnrichedTransactionInfo, cosignature: &Cosignature) {
        self.events
            .lock()
            .push(PtChangeEvent::AddCosignature(parent.clone(), *cosignature));
    }

    fn notify_remove_partials(&self, infos: &[EnrichedTransactionInfo]) {
        self.events
            .lock()
            .push(PtChangeEvent::RemovePartials(infos.to_vec()));
    }

    fn flush(&self, summary: &BatchSummary) {
        self.events.lock().push(PtChangeEvent::Flush(*summary));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aggregate_forwards_in_order() {
        let first = Arc::new(RecordingPtChangeSubscriber::new());
        let second = Arc::new(RecordingPtChangeSubscriber::new());
        let aggregate = AggregatePtChangeSubscriber::new()
            .with_subscriber(first.clone())
            .with_subscriber(second.clone());
        assert_eq!(aggregate.len(), 2);

        aggregate.notify_add_partials(&[]);
        aggregate.flush(&BatchSummary::new(1, 2, 3));

        for subscriber in [first, second] {
            assert_eq!(
                subscriber.events(),
                vec![
                    PtChangeEvent::AddPartials(vec![]),
                    PtChangeEvent::Flush(BatchSummary::new(1, 2, 3)),
                ]
            );
        }
    }

    #[test]
    fn test_empty_aggregate_is_noop() {
        let aggregate = AggregatePtChangeSubscriber::new();
        assert!(aggregate.is_empty());
        aggregate.flush(&BatchSummary::default());
    }

    #[test]
    fn test_recording_flushes_and_clear() {
        let recorder = RecordingPtChangeSubscriber::new();
        recorder.flush(&BatchSummary::new(0, 0, 1));
        recorder.notify_remove_partials(&[]);
        recorder.flush(&BatchSummary::default());

        assert_eq!(
            recorder.flushes(),
            vec![BatchSummary::new(0, 0, 1), BatchSummary::default()]
        );

        recorder.clear();
        assert!(recorder.events().is_empty());
    }

    #[test]
    fn test_logging_and_noop_accept_all_calls() {
        let info = EnrichedTransactionInfo::new(
            crate::domain::TransactionEntry::with_hash(
                Arc::new(crate::domain::AggregateTransaction {
                    signer: [1; 32],
                    signature: [0; 64],
                    max_fee: 0,
                    deadline: 0,
                    transactions: vec![],
                }),
                [2; 32],
            ),
            [0; 32],
        );
        let cosignature = Cosignature::new([3; 32], [4; 64]);

        for subscriber in [
            &LoggingPtChangeSubscriber as &dyn PtChangeSubscriber,
            &NoOpPtChangeSubscriber,
        ] {
            subscriber.notify_add_partials(std::slice::from_ref(&info));
            subscriber.notify_add_cosignature(&info, &cosignature);
            subscriber.notify_remove_partials(std::slice::from_ref(&info));
            subscriber.flush(&BatchSummary::new(1, 1, 1));
        }
    }
}
