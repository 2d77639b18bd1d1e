//! Inbound (Driving) ports for the partial transaction pool.
//!
//! These traits define the public API that callers (transaction admission,
//! block commit re-validation, cosignature sync) use to drive the pool.

use crate::domain::{
    CosignedTransactionInfo, CosignerCheckResult, Hash, PublicKey, ShortHashPair,
    ShortHashPairSet, Signature, Timestamp, TransactionEntry, ValidatorOutcome,
};

/// Read-only view over the partial transaction store.
///
/// A view holds the store's read lock for its whole lifetime, so it observes
/// a single consistent state and never a partially applied batch.
pub trait PtCacheView {
    /// Number of stored partial transactions.
    fn len(&self) -> usize;

    /// Returns true if the store holds no partial transactions.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true if a partial transaction with `hash` is stored.
    fn contains(&self, hash: &Hash) -> bool;

    /// Looks up a partial transaction and its attached cosignatures.
    fn find(&self, hash: &Hash) -> Option<CosignedTransactionInfo>;

    /// Short hash pairs of every stored partial transaction.
    fn short_hash_pairs(&self) -> Vec<ShortHashPair>;

    /// Returns stored partial transactions with `deadline >= min_deadline`
    /// whose short hash pair is not in `known`, up to the response size limit.
    fn unknown_transactions(
        &self,
        min_deadline: Timestamp,
        known: &ShortHashPairSet,
    ) -> Vec<CosignedTransactionInfo>;
}

/// Write handle over the partial transaction store.
///
/// Expected negatives (duplicates, unknown parents, empty prunes) are
/// reported through return values.
pub trait PtCacheModifier {
    /// Number of stored partial transactions.
    fn len(&self) -> usize;

    /// Stores `entry`. Returns false if its hash is already stored or the
    /// store is full.
    fn insert(&mut self, entry: TransactionEntry) -> bool;

    /// Attaches a cosignature to the stored parent, returning the parent.
    ///
    /// Returns `None` if the parent is unknown or `signer` already cosigned.
    fn attach_cosignature(
        &mut self,
        parent_hash: &Hash,
        signer: &PublicKey,
        signature: &Signature,
    ) -> Option<TransactionEntry>;

    /// Removes and returns the partial transaction with `hash`.
    fn remove(&mut self, hash: &Hash) -> Option<TransactionEntry>;

    /// Removes and returns every partial transaction whose deadline is at or
    /// before `threshold`.
    fn prune_by_time(&mut self, threshold: Timestamp) -> Vec<TransactionEntry>;

    /// Removes and returns every partial transaction whose hash matches
    /// `predicate`.
    fn prune_by_predicate(
        &mut self,
        predicate: &mut dyn FnMut(&Hash) -> bool,
    ) -> Vec<TransactionEntry>;
}

/// A partial transaction store.
pub trait PtCache: Send + Sync {
    /// Acquires a read view.
    fn view(&self) -> Box<dyn PtCacheView + '_>;

    /// Acquires the (exclusive) write handle.
    fn modifier(&self) -> Box<dyn PtCacheModifier + '_>;
}

/// Primary API for validating partial transactions and their cosigners.
pub trait PtValidator: Send + Sync {
    /// Validates a partial transaction, ignoring missing cosignatures.
    ///
    /// `normalized` is true only if the transaction may be admitted.
    fn validate_partial(&self, entry: &TransactionEntry) -> ValidatorOutcome<bool>;

    /// Validates the cosigners attached to a partial transaction.
    fn validate_cosigners(
        &self,
        info: &CosignedTransactionInfo,
    ) -> ValidatorOutcome<CosignerCheckResult>;
}
