//! # Core Domain Entities
//!
//! Defines the aggregate (multi-signature) transaction model shared by the
//! partial transaction pool and its callers.
//!
//! ## Clusters
//!
//! - **Primitives**: `Hash`, `PublicKey`, `Signature`, `Timestamp`, `Amount`
//! - **Aggregate**: `AggregateTransaction`, `EmbeddedTransaction`, `Cosignature`
//! - **Assets**: `Mosaic`

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, Bytes};
use sha2::{Digest, Sha256};

// =============================================================================
// PRIMITIVES
// =============================================================================

/// A 32-byte SHA-256 hash.
pub type Hash = [u8; 32];

/// A 64-byte Ed25519 signature.
pub type Signature = [u8; 64];

/// A 32-byte Ed25519 public key.
pub type PublicKey = [u8; 32];

/// Timestamp in milliseconds since UNIX epoch.
pub type Timestamp = u64;

/// Token amount in base units.
pub type Amount = u64;

/// Identifier of a mosaic (token definition).
pub type MosaicId = u64;

/// Size of the fixed aggregate header (signer, signature, fee, deadline).
const AGGREGATE_HEADER_SIZE: usize = 32 + 64 + 8 + 8;

/// Size of a serialized cosignature (signer + signature).
pub const COSIGNATURE_SIZE: usize = 32 + 64;

// =============================================================================
// ASSETS
// =============================================================================

/// An amount of a specific mosaic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Mosaic {
    /// Mosaic identifier.
    pub id: MosaicId,
    /// Amount in base units.
    pub amount: Amount,
}

impl Mosaic {
    /// Creates a new mosaic amount.
    pub fn new(id: MosaicId, amount: Amount) -> Self {
        Self { id, amount }
    }
}

// =============================================================================
// AGGREGATE
// =============================================================================

/// A cosignature attached to a parent aggregate transaction.
///
/// Cosignatures are detached: they travel and are stored separately from the
/// aggregate they sign.
#[serde_as]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cosignature {
    /// Public key of the cosigner.
    pub signer: PublicKey,
    /// Signature over the parent aggregate hash.
    #[serde_as(as = "Bytes")]
    pub signature: Signature,
}

impl Cosignature {
    /// Creates a new cosignature.
    pub fn new(signer: PublicKey, signature: Signature) -> Self {
        Self { signer, signature }
    }
}

/// Discriminant of an embedded transaction body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TransactionKind {
    /// Mosaic transfer between accounts.
    Transfer,
    /// Root namespace registration.
    NamespaceRegistration,
    /// Multisig account cosignatory modification.
    MultisigAccountModification,
}

impl TransactionKind {
    /// Stable single-byte tag used when hashing.
    pub fn tag(self) -> u8 {
        match self {
            Self::Transfer => 0x54,
            Self::NamespaceRegistration => 0x4E,
            Self::MultisigAccountModification => 0x55,
        }
    }
}

/// Body of an embedded transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EmbeddedTransactionBody {
    /// Transfers mosaics (and an optional message) to a recipient.
    Transfer {
        recipient: PublicKey,
        mosaics: Vec<Mosaic>,
        message: Vec<u8>,
    },
    /// Registers a root namespace for `duration` blocks.
    NamespaceRegistration { name: String, duration: u64 },
    /// Adds and removes cosignatories of the signer's multisig account.
    MultisigAccountModification {
        min_approval_delta: i8,
        additions: Vec<PublicKey>,
        deletions: Vec<PublicKey>,
    },
}

/// A transaction embedded inside an aggregate.
///
/// Embedded transactions carry no signature of their own; the aggregate
/// signer and the cosigners authorise them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbeddedTransaction {
    /// Account on whose behalf the embedded transaction executes.
    pub signer: PublicKey,
    /// Transaction body.
    pub body: EmbeddedTransactionBody,
}

impl EmbeddedTransaction {
    /// Creates an embedded transaction.
    pub fn new(signer: PublicKey, body: EmbeddedTransactionBody) -> Self {
        Self { signer, body }
    }

    /// Returns the body discriminant.
    pub fn kind(&self) -> TransactionKind {
        match self.body {
            EmbeddedTransactionBody::Transfer { .. } => TransactionKind::Transfer,
            EmbeddedTransactionBody::NamespaceRegistration { .. } => {
                TransactionKind::NamespaceRegistration
            }
            EmbeddedTransactionBody::MultisigAccountModification { .. } => {
                TransactionKind::MultisigAccountModification
            }
        }
    }

    /// Approximate serialized size in bytes.
    pub fn size(&self) -> usize {
        let body = match &self.body {
            EmbeddedTransactionBody::Transfer {
                mosaics, message, ..
            } => 32 + mosaics.len() * 16 + message.len(),
            EmbeddedTransactionBody::NamespaceRegistration { name, .. } => 8 + name.len(),
            EmbeddedTransactionBody::MultisigAccountModification {
                additions,
                deletions,
                ..
            } => 1 + 32 * (additions.len() + deletions.len()),
        };
        32 + 1 + body
    }

    fn update_hash(&self, hasher: &mut Sha256) {
        hasher.update(self.signer);
        hasher.update([self.kind().tag()]);
        match &self.body {
            EmbeddedTransactionBody::Transfer {
                recipient,
                mosaics,
                message,
            } => {
                hasher.update(recipient);
                hasher.update((mosaics.len() as u32).to_le_bytes());
                for mosaic in mosaics {
                    hasher.update(mosaic.id.to_le_bytes());
                    hasher.update(mosaic.amount.to_le_bytes());
                }
                hasher.update((message.len() as u32).to_le_bytes());
                hasher.update(message);
            }
            EmbeddedTransactionBody::NamespaceRegistration { name, duration } => {
                hasher.update((name.len() as u32).to_le_bytes());
                hasher.update(name.as_bytes());
                hasher.update(duration.to_le_bytes());
            }
            EmbeddedTransactionBody::MultisigAccountModification {
                min_approval_delta,
                additions,
                deletions,
            } => {
                hasher.update(min_approval_delta.to_le_bytes());
                hasher.update((additions.len() as u32).to_le_bytes());
                for key in additions {
                    hasher.update(key);
                }
                hasher.update((deletions.len() as u32).to_le_bytes());
                for key in deletions {
                    hasher.update(key);
                }
            }
        }
    }
}

/// An aggregate transaction bundling embedded transactions that require
/// signatures from several accounts.
///
/// The aggregate is signed by `signer`; every other required account signs it
/// with a detached [`Cosignature`].
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateTransaction {
    /// Account initiating (and paying for) the aggregate.
    pub signer: PublicKey,
    /// Signer's signature over the aggregate hash.
    #[serde_as(as = "Bytes")]
    pub signature: Signature,
    /// Maximum fee the signer is willing to pay.
    pub max_fee: Amount,
    /// Deadline after which the aggregate can no longer be confirmed (ms).
    pub deadline: Timestamp,
    /// Embedded transactions, executed in order.
    pub transactions: Vec<EmbeddedTransaction>,
}

impl AggregateTransaction {
    /// Computes the aggregate hash.
    ///
    /// Covers signer, fee, deadline and every embedded transaction. The
    /// signature and all cosignatures are excluded.
    pub fn hash(&self) -> Hash {
        let mut hasher = Sha256::new();
        hasher.update(self.signer);
        hasher.update(self.max_fee.to_le_bytes());
        hasher.update(self.deadline.to_le_bytes());
        hasher.update((self.transactions.len() as u32).to_le_bytes());
        for transaction in &self.transactions {
            transaction.update_hash(&mut hasher);
        }
        hasher.finalize().into()
    }

    /// Approximate serialized size in bytes (without cosignatures).
    pub fn size(&self) -> usize {
        AGGREGATE_HEADER_SIZE + self.transactions.iter().map(|tx| tx.size()).sum::<usize>()
    }

    /// Returns the distinct embedded transaction signers in first-seen order.
    pub fn embedded_signers(&self) -> Vec<PublicKey> {
        let mut signers: Vec<PublicKey> = Vec::with_capacity(self.transactions.len());
        for transaction in &self.transactions {
            if !signers.contains(&transaction.signer) {
                signers.push(transaction.signer);
            }
        }
        signers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transfer(signer: u8, amount: Amount) -> EmbeddedTransaction {
        EmbeddedTransaction::new(
            [signer; 32],
            EmbeddedTransactionBody::Transfer {
                recipient: [0xEE; 32],
                mosaics: vec![Mosaic::new(1, amount)],
                message: vec![],
            },
        )
    }

    fn aggregate(transactions: Vec<EmbeddedTransaction>) -> AggregateTransaction {
        AggregateTransaction {
            signer: [0xAA; 32],
            signature: [0x11; 64],
            max_fee: 100,
            deadline: 5000,
            transactions,
        }
    }

    #[test]
    fn test_hash_is_deterministic() {
        let tx = aggregate(vec![transfer(0xBB, 10)]);
        assert_eq!(tx.hash(), tx.clone().hash());
    }

    #[test]
    fn test_hash_excludes_signature() {
        let tx = aggregate(vec![transfer(0xBB, 10)]);
        let mut resigned = tx.clone();
        resigned.signature = [0x22; 64];
        assert_eq!(tx.hash(), resigned.hash());
    }

    #[test]
    fn test_hash_covers_embedded_transactions() {
        let tx1 = aggregate(vec![transfer(0xBB, 10)]);
        let tx2 = aggregate(vec![transfer(0xBB, 11)]);
        let tx3 = aggregate(vec![transfer(0xCC, 10)]);
        assert_ne!(tx1.hash(), tx2.hash());
        assert_ne!(tx1.hash(), tx3.hash());
    }

    #[test]
    fn test_hash_covers_deadline_and_fee() {
        let tx = aggregate(vec![transfer(0xBB, 10)]);
        let mut later = tx.clone();
        later.deadline += 1;
        let mut pricier = tx.clone();
        pricier.max_fee += 1;
        assert_ne!(tx.hash(), later.hash());
        assert_ne!(tx.hash(), pricier.hash());
    }

    #[test]
    fn test_embedded_signers_are_distinct_and_ordered() {
        let tx = aggregate(vec![transfer(0xCC, 1), transfer(0xBB, 2), transfer(0xCC, 3)]);
        assert_eq!(tx.embedded_signers(), vec![[0xCC; 32], [0xBB; 32]]);
    }

    #[test]
    fn test_kind_matches_body() {
        let namespace = EmbeddedTransaction::new(
            [1; 32],
            EmbeddedTransactionBody::NamespaceRegistration {
                name: "alpha".into(),
                duration: 10,
            },
        );
        assert_eq!(transfer(1, 1).kind(), TransactionKind::Transfer);
        assert_eq!(namespace.kind(), TransactionKind::NamespaceRegistration);
    }

    #[test]
    fn test_size_grows_with_content() {
        let small = aggregate(vec![transfer(0xBB, 10)]);
        let large = aggregate(vec![transfer(0xBB, 10), transfer(0xCC, 10)]);
        assert!(large.size() > small.size());
        assert!(small.size() > AGGREGATE_HEADER_SIZE);
    }

    #[test]
    fn test_cosignature_serde_roundtrip() {
        let cosignature = Cosignature::new([0x01; 32], [0x02; 64]);
        let json = serde_json::to_string(&cosignature).unwrap();
        let decoded: Cosignature = serde_json::from_str(&json).unwrap();
        assert_eq!(cosignature, decoded);
    }
}
