//! Change-notifying wrapper around a partial transaction store.
//!
//! [`AggregatePtCache`] hands out [`AggregatePtCacheModifier`] guards. A
//! guard forwards every mutation to the wrapped store immediately and
//! buffers what actually changed. When the guard is committed (explicitly
//! or by being dropped) it notifies the change subscriber exactly once:
//!
//! ```text
//! notify_add_partials ─→ notify_add_cosignature × N ─→ notify_remove_partials ─→ flush
//! ```
//!
//! The add and remove calls and the flush are always made, even for an
//! empty batch.

use super::entities::{
    BatchSummary, Cosignature, EnrichedTransactionInfo, Hash, PublicKey, Signature, Timestamp,
    TransactionEntry,
};
use crate::ports::{PtCache, PtCacheModifier, PtCacheView, PtChangeSubscriber};
use std::sync::Arc;
use tracing::trace;

/// A partial transaction store that reports every batch to a subscriber.
pub struct AggregatePtCache<C> {
    cache: C,
    subscriber: Arc<dyn PtChangeSubscriber>,
}

impl<C: PtCache> AggregatePtCache<C> {
    /// Wraps `cache`, reporting changes to `subscriber`.
    pub fn new(cache: C, subscriber: Arc<dyn PtChangeSubscriber>) -> Self {
        Self { cache, subscriber }
    }

    /// Acquires a read view of the wrapped store.
    pub fn view(&self) -> Box<dyn PtCacheView + '_> {
        self.cache.view()
    }

    /// Acquires the write guard.
    pub fn modifier(&self) -> AggregatePtCacheModifier<'_> {
        AggregatePtCacheModifier::new(self.cache.modifier(), self.subscriber.as_ref())
    }

    /// Returns the wrapped store.
    pub fn inner(&self) -> &C {
        &self.cache
    }
}

impl<C: PtCache> PtCache for AggregatePtCache<C> {
    fn view(&self) -> Box<dyn PtCacheView + '_> {
        AggregatePtCache::view(self)
    }

    fn modifier(&self) -> Box<dyn PtCacheModifier + '_> {
        Box::new(AggregatePtCache::modifier(self))
    }
}

/// Scoped write guard that commits one notified batch.
///
/// The underlying store modifier (and its write lock) lives as long as the
/// guard, so subscribers are notified before any other writer or reader can
/// observe the store. Subscribers must not re-enter the same store.
pub struct AggregatePtCacheModifier<'a> {
    modifier: Box<dyn PtCacheModifier + 'a>,
    subscriber: &'a dyn PtChangeSubscriber,
    added: Vec<EnrichedTransactionInfo>,
    cosignatures: Vec<(EnrichedTransactionInfo, Cosignature)>,
    removed: Vec<EnrichedTransactionInfo>,
    committed: bool,
}

impl<'a> AggregatePtCacheModifier<'a> {
    fn new(modifier: Box<dyn PtCacheModifier + 'a>, subscriber: &'a dyn PtChangeSubscriber) -> Self {
        Self {
            modifier,
            subscriber,
            added: Vec::new(),
            cosignatures: Vec::new(),
            removed: Vec::new(),
            committed: false,
        }
    }

    /// Counts accumulated so far.
    pub fn summary(&self) -> BatchSummary {
        BatchSummary::new(
            self.added.len(),
            self.cosignatures.len(),
            self.removed.len(),
        )
    }

    /// Notifies the subscriber and releases the store.
    pub fn commit(mut self) -> BatchSummary {
        self.flush()
    }

    fn flush(&mut self) -> BatchSummary {
        let summary = self.summary();
        if self.committed {
            return summary;
        }

        // Set before notifying: a panicking subscriber must not flush twice.
        self.committed = true;

        let added = std::mem::take(&mut self.added);
        let cosignatures = std::mem::take(&mut self.cosignatures);
        let removed = std::mem::take(&mut self.removed);

        self.subscriber.notify_add_partials(&added);
        for (parent, cosignature) in &cosignatures {
            self.subscriber.notify_add_cosignature(parent, cosignature);
        }
        self.subscriber.notify_remove_partials(&removed);
        self.subscriber.flush(&summary);

        trace!(
            adds = summary.adds,
            cosignature_adds = summary.cosignature_adds,
            removes = summary.removes,
            "[qc-18] Flushed partial transaction batch"
        );
        summary
    }

    fn record_removed(&mut self, entries: &[TransactionEntry]) {
        self.removed
            .extend(entries.iter().cloned().map(EnrichedTransactionInfo::from));
    }
}

impl PtCacheModifier for AggregatePtCacheModifier<'_> {
    fn len(&self) -> usize {
        self.modifier.len()
    }

    fn insert(&mut self, entry: TransactionEntry) -> bool {
        if !self.modifier.insert(entry.clone()) {
            return false;
        }

        self.added.push(entry.into());
        true
    }

    fn attach_cosignature(
        &mut self,
        parent_hash: &Hash,
        signer: &PublicKey,
        signature: &Signature,
    ) -> Option<TransactionEntry> {
        let parent = self
            .modifier
            .attach_cosignature(parent_hash, signer, signature)?;

        self.cosignatures.push((
            parent.clone().into(),
            Cosignature::new(*signer, *signature),
        ));
        Some(parent)
    }

    fn remove(&mut self, hash: &Hash) -> Option<TransactionEntry> {
        let entry = self.modifier.remove(hash)?;
        self.removed.push(entry.clone().into());
        Some(entry)
    }

    fn prune_by_time(&mut self, threshold: Timestamp) -> Vec<TransactionEntry> {
        let pruned = self.modifier.prune_by_time(threshold);
        self.record_removed(&pruned);
        pruned
    }

    fn prune_by_predicate(
        &mut self,
        predicate: &mut dyn FnMut(&Hash) -> bool,
    ) -> Vec<TransactionEntry> {
        let pruned = self.modifier.prune_by_predicate(predicate);
        self.record_removed(&pruned);
        pruned
    }
}

impl Drop for AggregatePtCacheModifier<'_> {
    fn drop(&mut self) {
        self.flush();
    }
}
