//! Cosigner notification extraction.
//!
//! Turns an aggregate and its attached cosignatures into the notifications
//! that check cosignature structure, cosigner eligibility and sufficiency:
//!
//! 1. one `AggregateCosignatures` listing every attached cosigner
//! 2. one `CosignerEligibility` per cosignature, in arrival order
//! 3. one `RequiredCosigners` covering the whole required set
//!
//! The required set is every embedded transaction signer plus the accounts
//! an embedded transaction additionally requires (for example accounts being
//! added as multisig cosignatories), minus the aggregate signer.

use super::entities::{AggregateTransaction, CosignedTransactionInfo, EmbeddedTransaction, PublicKey};
use super::notifications::{Notification, NotificationSubscriber};

/// Reports accounts an embedded transaction requires beyond its signer.
pub trait AdditionalCosignatories: Send + Sync {
    fn additional_cosignatories(&self, transaction: &EmbeddedTransaction) -> Vec<PublicKey>;
}

/// Computes the distinct accounts that must approve `transaction`, in
/// first-seen order.
pub fn required_cosigners(
    transaction: &AggregateTransaction,
    additional: &dyn AdditionalCosignatories,
) -> Vec<PublicKey> {
    let mut required: Vec<PublicKey> = Vec::new();
    for embedded in &transaction.transactions {
        let accounts = std::iter::once(embedded.signer)
            .chain(additional.additional_cosignatories(embedded));
        for account in accounts {
            if account != transaction.signer && !required.contains(&account) {
                required.push(account);
            }
        }
    }
    required
}

/// Publishes cosigner notifications for a cosigned partial transaction.
pub struct CosignerNotificationExtractor<'a> {
    additional: &'a dyn AdditionalCosignatories,
}

impl<'a> CosignerNotificationExtractor<'a> {
    pub fn new(additional: &'a dyn AdditionalCosignatories) -> Self {
        Self { additional }
    }

    /// Publishes the cosigner notifications for `info` to `subscriber`.
    pub fn publish(&self, info: &CosignedTransactionInfo, subscriber: &mut dyn NotificationSubscriber) {
        let aggregate_signer = info.transaction.signer;
        let required = required_cosigners(&info.transaction, self.additional);
        let cosignatories = info.cosigners();

        subscriber.notify(&Notification::AggregateCosignatures {
            signer: aggregate_signer,
            transaction_count: info.transaction.transactions.len(),
            cosignatories: cosignatories.clone(),
        });

        for cosignature in &info.cosignatures {
            subscriber.notify(&Notification::CosignerEligibility {
                aggregate_signer,
                cosigner: cosignature.signer,
                required: required.clone(),
            });
        }

        subscriber.notify(&Notification::RequiredCosigners {
            aggregate_signer,
            required,
            cosignatories,
        });
    }
}
