//! In-memory partial transaction store.
//!
//! Entries are indexed twice:
//! - `by_hash`: point lookups and cosignature attachment
//! - `by_deadline`: ordered pruning and pull responses
//!
//! The whole state sits behind one `parking_lot::RwLock`. A view holds the
//! read guard and a modifier holds the write guard for its whole lifetime,
//! so there is a single writer and readers never see half a batch.

use super::config::PtConfig;
use super::entities::{
    cosignatures_short_hash, Cosignature, CosignedTransactionInfo, Hash, PublicKey, ShortHashPair,
    ShortHashPairSet, Signature, Timestamp, TransactionEntry, ZERO_HASH,
};
use crate::ports::{PtCache, PtCacheModifier, PtCacheView};
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, warn};

/// A stored partial transaction and its cosignatures.
#[derive(Clone, Debug)]
struct StoredEntry {
    entry: TransactionEntry,
    cosignatures: Vec<Cosignature>,
}

impl StoredEntry {
    fn info(&self) -> CosignedTransactionInfo {
        CosignedTransactionInfo::new(self.entry.clone(), self.cosignatures.clone())
    }

    fn short_hash_pair(&self) -> ShortHashPair {
        ShortHashPair {
            transaction_short_hash: self.entry.short_hash(),
            cosignatures_short_hash: cosignatures_short_hash(&self.cosignatures),
        }
    }

    fn has_cosigner(&self, signer: &PublicKey) -> bool {
        self.cosignatures.iter().any(|c| &c.signer == signer)
    }
}

#[derive(Debug, Default)]
struct CacheState {
    by_hash: HashMap<Hash, StoredEntry>,
    /// (deadline, hash) for ordered iteration.
    by_deadline: BTreeSet<(Timestamp, Hash)>,
}

impl CacheState {
    fn remove(&mut self, hash: &Hash) -> Option<TransactionEntry> {
        let stored = self.by_hash.remove(hash)?;
        self.by_deadline.remove(&(stored.entry.deadline(), *hash));
        Some(stored.entry)
    }

    fn remove_all(&mut self, hashes: Vec<Hash>) -> Vec<TransactionEntry> {
        hashes.iter().filter_map(|hash| self.remove(hash)).collect()
    }
}

/// In-memory partial transaction store.
#[derive(Debug)]
pub struct MemoryPtCache {
    state: RwLock<CacheState>,
    max_cache_size: usize,
    max_response_size: usize,
}

impl MemoryPtCache {
    /// Creates an empty store with the limits from `config`.
    pub fn new(config: &PtConfig) -> Self {
        Self::with_limits(config.max_cache_size, config.max_response_size)
    }

    /// Creates an empty store with explicit limits.
    pub fn with_limits(max_cache_size: usize, max_response_size: usize) -> Self {
        Self {
            state: RwLock::new(CacheState::default()),
            max_cache_size,
            max_response_size,
        }
    }

    /// Acquires a read view.
    pub fn view(&self) -> MemoryPtCacheView<'_> {
        MemoryPtCacheView {
            state: self.state.read(),
            max_response_size: self.max_response_size,
        }
    }

    /// Acquires the write handle, blocking until no view or other modifier
    /// is open.
    pub fn modifier(&self) -> MemoryPtCacheModifier<'_> {
        MemoryPtCacheModifier {
            state: self.state.write(),
            max_cache_size: self.max_cache_size,
        }
    }
}

impl PtCache for MemoryPtCache {
    fn view(&self) -> Box<dyn PtCacheView + '_> {
        Box::new(MemoryPtCache::view(self))
    }

    fn modifier(&self) -> Box<dyn PtCacheModifier + '_> {
        Box::new(MemoryPtCache::modifier(self))
    }
}

/// Read view over a [`MemoryPtCache`].
pub struct MemoryPtCacheView<'a> {
    state: RwLockReadGuard<'a, CacheState>,
    max_response_size: usize,
}

impl PtCacheView for MemoryPtCacheView<'_> {
    fn len(&self) -> usize {
        self.state.by_hash.len()
    }

    fn contains(&self, hash: &Hash) -> bool {
        self.state.by_hash.contains_key(hash)
    }

    fn find(&self, hash: &Hash) -> Option<CosignedTransactionInfo> {
        self.state.by_hash.get(hash).map(StoredEntry::info)
    }

    fn short_hash_pairs(&self) -> Vec<ShortHashPair> {
        self.state
            .by_deadline
            .iter()
            .filter_map(|(_, hash)| self.state.by_hash.get(hash))
            .map(StoredEntry::short_hash_pair)
            .collect()
    }

    fn unknown_transactions(
        &self,
        min_deadline: Timestamp,
        known: &ShortHashPairSet,
    ) -> Vec<CosignedTransactionInfo> {
        let mut total_size = 0usize;
        let mut infos = Vec::new();

        for (_, hash) in self.state.by_deadline.range((min_deadline, ZERO_HASH)..) {
            let Some(stored) = self.state.by_hash.get(hash) else {
                continue;
            };

            if known.contains(&stored.short_hash_pair()) {
                continue;
            }

            let info = stored.info();
            let size = info.size();
            if total_size + size > self.max_response_size {
                break;
            }

            total_size += size;
            infos.push(info);
        }

        infos
    }
}

/// Write handle over a [`MemoryPtCache`]. Mutations apply immediately.
pub struct MemoryPtCacheModifier<'a> {
    state: RwLockWriteGuard<'a, CacheState>,
    max_cache_size: usize,
}

impl PtCacheModifier for MemoryPtCacheModifier<'_> {
    fn len(&self) -> usize {
        self.state.by_hash.len()
    }

    fn insert(&mut self, entry: TransactionEntry) -> bool {
        if self.state.by_hash.contains_key(&entry.hash) {
            return false;
        }

        if self.state.by_hash.len() >= self.max_cache_size {
            warn!(
                "[qc-18] Partial transaction cache is full ({} entries), dropping {}",
                self.max_cache_size,
                hex::encode(&entry.hash[..4])
            );
            return false;
        }

        self.state
            .by_deadline
            .insert((entry.deadline(), entry.hash));
        self.state.by_hash.insert(
            entry.hash,
            StoredEntry {
                entry,
                cosignatures: Vec::new(),
            },
        );
        true
    }

    fn attach_cosignature(
        &mut self,
        parent_hash: &Hash,
        signer: &PublicKey,
        signature: &Signature,
    ) -> Option<TransactionEntry> {
        let stored = self.state.by_hash.get_mut(parent_hash)?;
        if stored.has_cosigner(signer) {
            debug!(
                "[qc-18] Ignoring repeated cosignature from {} on {}",
                hex::encode(&signer[..4]),
                hex::encode(&parent_hash[..4])
            );
            return None;
        }

        stored
            .cosignatures
            .push(Cosignature::new(*signer, *signature));
        Some(stored.entry.clone())
    }

    fn remove(&mut self, hash: &Hash) -> Option<TransactionEntry> {
        self.state.remove(hash)
    }

    fn prune_by_time(&mut self, threshold: Timestamp) -> Vec<TransactionEntry> {
        let expired: Vec<Hash> = self
            .state
            .by_deadline
            .iter()
            .take_while(|(deadline, _)| *deadline <= threshold)
            .map(|(_, hash)| *hash)
            .collect();

        self.state.remove_all(expired)
    }

    fn prune_by_predicate(
        &mut self,
        predicate: &mut dyn FnMut(&Hash) -> bool,
    ) -> Vec<TransactionEntry> {
        let matching: Vec<Hash> = self
            .state
            .by_deadline
            .iter()
            .map(|(_, hash)| *hash)
            .filter(|hash| predicate(hash))
            .collect();

        self.state.remove_all(matching)
    }
}
