//! Outbound (Driven) ports for the partial transaction pool.
//!
//! These traits define dependencies on external systems the pool needs:
//! a read-only state snapshot, a clock, a notification publisher and the
//! consumers of store changes.

use crate::domain::{
    Amount, BatchSummary, Cosignature, EnrichedTransactionInfo, MosaicId, MultisigEntry,
    NotificationSubscriber, PublicKey, StateError, Timestamp, TransactionEntry,
};

/// Read-only blockchain state snapshot used by stateful validators.
///
/// Lookups return `Ok(None)` for unknown keys. `Err` means the snapshot
/// itself could not be read.
pub trait StateProvider: Send + Sync {
    /// Balance of `mosaic_id` held by `account`.
    fn account_balance(
        &self,
        account: &PublicKey,
        mosaic_id: MosaicId,
    ) -> Result<Option<Amount>, StateError>;

    /// Multisig configuration of `account`, if it is a multisig account.
    fn multisig_entry(&self, account: &PublicKey) -> Result<Option<MultisigEntry>, StateError>;

    /// Current owner of the root namespace `name`.
    fn namespace_owner(&self, name: &str) -> Result<Option<PublicKey>, StateError>;
}

/// Time source for consistent timestamp handling.
///
/// Abstracted to allow testing with deterministic time.
pub trait TimeSource: Send + Sync {
    /// Returns the current timestamp in milliseconds.
    fn now(&self) -> Timestamp;
}

/// Default system time source.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> Timestamp {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as Timestamp
    }
}

/// Time source frozen at a fixed timestamp.
#[derive(Debug, Clone, Copy)]
pub struct FixedTimeSource(pub Timestamp);

impl TimeSource for FixedTimeSource {
    fn now(&self) -> Timestamp {
        self.0
    }
}

/// Expands a partial transaction into its ordered notification sequence.
///
/// Different deployments register different expansions per transaction kind.
pub trait NotificationPublisher: Send + Sync {
    fn publish(&self, entry: &TransactionEntry, subscriber: &mut dyn NotificationSubscriber);
}

/// Consumer of partial transaction store changes.
///
/// For a single batch the calls arrive on the committing thread in this order:
/// `notify_add_partials`, `notify_add_cosignature` (once per cosignature),
/// `notify_remove_partials`, `flush`. Every info carries a zero merkle
/// component hash.
pub trait PtChangeSubscriber: Send + Sync {
    /// Partial transactions added in the batch (possibly none).
    fn notify_add_partials(&self, infos: &[EnrichedTransactionInfo]);

    /// A cosignature attached to `parent`.
    fn notify_add_cosignature(&self, parent: &EnrichedTransactionInfo, cosignature: &Cosignature);

    /// Partial transactions removed in the batch (possibly none).
    fn notify_remove_partials(&self, infos: &[EnrichedTransactionInfo]);

    /// End of the batch.
    fn flush(&self, summary: &BatchSummary);
}

/// Clock that tests can move forward.
#[cfg(test)]
pub struct MockTimeSource {
    now: std::sync::atomic::AtomicU64,
}

#[cfg(test)]
impl MockTimeSource {
    pub fn new(now: Timestamp) -> Self {
        Self {
            now: std::sync::atomic::AtomicU64::new(now),
        }
    }

    pub fn set(&self, now: Timestamp) {
        self.now.store(now, std::sync::atomic::Ordering::SeqCst);
    }
}

#[cfg(test)]
impl TimeSource for MockTimeSource {
    fn now(&self) -> Timestamp {
        self.now.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_time_is_after_2020() {
        assert!(SystemTimeSource.now() > 1_577_836_800_000);
    }

    #[test]
    fn test_mock_time_source() {
        let time = MockTimeSource::new(1000);
        assert_eq!(time.now(), 1000);
        time.set(2000);
        assert_eq!(time.now(), 2000);
        assert_eq!(FixedTimeSource(7).now(), 7);
    }
}
