//! Core domain entities for the partial transaction pool.
//!
//! Entries are reference-counted immutable values: the store owns the only
//! mutable state (attached cosignatures) and hands out cheap clones.

use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::sync::Arc;

// Re-export from shared-types for convenience
pub use shared_types::{
    AggregateTransaction, Amount, Cosignature, EmbeddedTransaction, EmbeddedTransactionBody, Hash,
    Mosaic, MosaicId, PublicKey, Signature, Timestamp, TransactionKind, COSIGNATURE_SIZE,
};

/// The all-zero hash.
pub const ZERO_HASH: Hash = [0u8; 32];

/// A partial transaction owned by the store, identified by its hash.
///
/// INVARIANT: `hash` is the hash of `transaction`; attaching cosignatures
/// never changes either.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionEntry {
    /// Aggregate hash (unique identifier).
    pub hash: Hash,
    /// The aggregate transaction.
    pub transaction: Arc<AggregateTransaction>,
}

impl TransactionEntry {
    /// Creates an entry, computing the aggregate hash.
    pub fn new(transaction: AggregateTransaction) -> Self {
        let hash = transaction.hash();
        Self {
            hash,
            transaction: Arc::new(transaction),
        }
    }

    /// Creates an entry from a shared transaction and a precomputed hash.
    pub fn with_hash(transaction: Arc<AggregateTransaction>, hash: Hash) -> Self {
        Self { hash, transaction }
    }

    /// Retention time of the entry (the aggregate deadline).
    pub fn deadline(&self) -> Timestamp {
        self.transaction.deadline
    }

    /// Short hash used by pull synchronisation.
    pub fn short_hash(&self) -> ShortHash {
        short_hash(&self.hash)
    }
}

/// A transaction entry enriched with a merkle component hash.
///
/// This is the shape handed to change subscribers. The pool has no notion of
/// merkle component hashes, so every info it produces carries [`ZERO_HASH`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnrichedTransactionInfo {
    /// The underlying entry.
    pub entry: TransactionEntry,
    /// Merkle component hash (always zero when produced by the pool).
    pub merkle_component_hash: Hash,
}

impl EnrichedTransactionInfo {
    /// Creates an enriched info with an explicit merkle component hash.
    pub fn new(entry: TransactionEntry, merkle_component_hash: Hash) -> Self {
        Self {
            entry,
            merkle_component_hash,
        }
    }

    /// Aggregate hash of the underlying entry.
    pub fn hash(&self) -> &Hash {
        &self.entry.hash
    }
}

impl From<TransactionEntry> for EnrichedTransactionInfo {
    fn from(entry: TransactionEntry) -> Self {
        Self::new(entry, ZERO_HASH)
    }
}

impl From<EnrichedTransactionInfo> for TransactionEntry {
    /// Detaches the entry; the merkle component hash is dropped.
    fn from(info: EnrichedTransactionInfo) -> Self {
        info.entry
    }
}

/// A partial transaction together with every cosignature known for it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CosignedTransactionInfo {
    /// Aggregate hash.
    pub hash: Hash,
    /// The aggregate transaction.
    pub transaction: Arc<AggregateTransaction>,
    /// Attached cosignatures in arrival order.
    pub cosignatures: Vec<Cosignature>,
}

impl CosignedTransactionInfo {
    /// Creates a cosigned info from an entry and its cosignatures.
    pub fn new(entry: TransactionEntry, cosignatures: Vec<Cosignature>) -> Self {
        Self {
            hash: entry.hash,
            transaction: entry.transaction,
            cosignatures,
        }
    }

    /// Returns the entry without cosignatures.
    pub fn entry(&self) -> TransactionEntry {
        TransactionEntry::with_hash(Arc::clone(&self.transaction), self.hash)
    }

    /// Public keys of all cosigners in arrival order.
    pub fn cosigners(&self) -> Vec<PublicKey> {
        self.cosignatures.iter().map(|c| c.signer).collect()
    }

    /// Approximate serialized size including cosignatures.
    pub fn size(&self) -> usize {
        self.transaction.size() + self.cosignatures.len() * COSIGNATURE_SIZE
    }
}

/// Summary of one modifier lifetime, delivered with the flush notification.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Number of partial transactions added.
    pub adds: usize,
    /// Number of cosignatures attached.
    pub cosignature_adds: usize,
    /// Number of partial transactions removed (explicitly or by pruning).
    pub removes: usize,
}

impl BatchSummary {
    /// Creates a summary from explicit counts.
    pub fn new(adds: usize, cosignature_adds: usize, removes: usize) -> Self {
        Self {
            adds,
            cosignature_adds,
            removes,
        }
    }

    /// Returns true if the batch performed no mutation.
    pub fn is_empty(&self) -> bool {
        self.adds == 0 && self.cosignature_adds == 0 && self.removes == 0
    }
}

/// Multisig configuration of an account, read from blockchain state.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MultisigEntry {
    /// Number of cosignatories required to approve a transaction.
    pub min_approval: u8,
    /// Accounts allowed to cosign on behalf of the multisig account.
    pub cosignatories: Vec<PublicKey>,
}

impl MultisigEntry {
    /// Creates a multisig entry.
    pub fn new(min_approval: u8, cosignatories: Vec<PublicKey>) -> Self {
        Self {
            min_approval,
            cosignatories,
        }
    }
}

/// Four-byte prefix of a hash used for compact set reconciliation.
pub type ShortHash = u32;

/// Short hashes identifying a partial transaction and its cosignature set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ShortHashPair {
    /// Short hash of the aggregate.
    pub transaction_short_hash: ShortHash,
    /// Short hash of the attached cosignatures.
    pub cosignatures_short_hash: ShortHash,
}

/// Set of short hash pairs already known by a remote peer.
pub type ShortHashPairSet = HashSet<ShortHashPair>;

/// Computes the short hash of a full hash (first four bytes, little endian).
pub fn short_hash(hash: &Hash) -> ShortHash {
    ShortHash::from_le_bytes([hash[0], hash[1], hash[2], hash[3]])
}

/// Computes the short hash of a cosignature set.
///
/// The set is order independent: cosignatures are hashed sorted by signer.
pub fn cosignatures_short_hash(cosignatures: &[Cosignature]) -> ShortHash {
    let mut sorted: Vec<&Cosignature> = cosignatures.iter().collect();
    sorted.sort_by(|a, b| a.signer.cmp(&b.signer));

    let mut hasher = Sha256::new();
    for cosignature in sorted {
        hasher.update(cosignature.signer);
        hasher.update(cosignature.signature);
    }
    let digest: Hash = hasher.finalize().into();
    short_hash(&digest)
}
