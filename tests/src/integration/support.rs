//! Shared fixtures for the integration flows.

use qc_18_partial_transactions::{
    AggregatePtCache, AggregateTransaction, DefaultPtValidator, EmbeddedTransaction,
    EmbeddedTransactionBody, FixedTimeSource, InMemoryStateProvider, MemoryPtCache, Mosaic,
    PluginManager, PtChangeSubscriber, PtConfig, PublicKey, RecordingPtChangeSubscriber,
    Timestamp, TransactionEntry,
};
use std::sync::{Arc, Once};

/// Time every flow runs at.
pub const NOW: Timestamp = 1_000;

static TRACING: Once = Once::new();

/// Installs a test tracing subscriber once per process.
///
/// Honors `RUST_LOG`; defaults to `qc_18_partial_transactions=debug`.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("qc_18_partial_transactions=debug"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

/// Random account key.
pub fn random_key() -> PublicKey {
    rand::random()
}

/// Transfer of `amount` units of mosaic 1 signed by `signer`.
pub fn transfer(signer: PublicKey, amount: u64) -> EmbeddedTransaction {
    EmbeddedTransaction::new(
        signer,
        EmbeddedTransactionBody::Transfer {
            recipient: random_key(),
            mosaics: vec![Mosaic::new(1, amount)],
            message: vec![],
        },
    )
}

/// Aggregate signed by `signer` expiring at `deadline`.
pub fn partial(
    signer: PublicKey,
    deadline: Timestamp,
    transactions: Vec<EmbeddedTransaction>,
) -> TransactionEntry {
    TransactionEntry::new(AggregateTransaction {
        signer,
        signature: [0; 64],
        max_fee: 0,
        deadline,
        transactions,
    })
}

/// Aggregate needing one cosignature from `cosigner`.
pub fn partial_for(cosigner: PublicKey, deadline: Timestamp) -> TransactionEntry {
    partial(random_key(), deadline, vec![transfer(cosigner, 5)])
}

/// A store wired to a recording subscriber.
pub struct Pool {
    pub cache: AggregatePtCache<MemoryPtCache>,
    pub recorder: Arc<RecordingPtChangeSubscriber>,
}

impl Pool {
    pub fn new() -> Self {
        let recorder = Arc::new(RecordingPtChangeSubscriber::new());
        let subscriber: Arc<dyn PtChangeSubscriber> = recorder.clone();
        let cache = AggregatePtCache::new(MemoryPtCache::new(&PtConfig::for_testing()), subscriber);
        Self { cache, recorder }
    }
}

impl Default for Pool {
    fn default() -> Self {
        Self::new()
    }
}

/// Partial validator with every built-in plugin at [`NOW`].
pub fn validator(state: Arc<InMemoryStateProvider>) -> DefaultPtValidator {
    let manager = PluginManager::with_default_plugins(PtConfig::for_testing());
    DefaultPtValidator::new(&manager, state, Arc::new(FixedTimeSource(NOW)))
}
