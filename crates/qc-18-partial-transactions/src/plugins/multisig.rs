//! Multisig account modification plugin.
//!
//! Accounts added as cosignatories must opt in, so each addition becomes an
//! additional required cosigner of the aggregate.

use super::{PluginManager, TransactionPlugin};
use crate::domain::{
    EmbeddedTransaction, EmbeddedTransactionBody, Failure, Notification, NotificationSubscriber,
    NotificationType, PublicKey, StatelessValidator, TransactionKind, ValidationResult,
};
use std::collections::HashSet;
use std::sync::Arc;

/// Registers the multisig plugin and its validator.
pub fn register(manager: &mut PluginManager) {
    manager.register_plugin(Arc::new(MultisigPlugin));
    manager.add_stateless_validator(Arc::new(MultisigModificationValidator));
}

/// Publishes one `MultisigModification` notification per modification.
pub struct MultisigPlugin;

impl TransactionPlugin for MultisigPlugin {
    fn kind(&self) -> TransactionKind {
        TransactionKind::MultisigAccountModification
    }

    fn publish(&self, transaction: &EmbeddedTransaction, subscriber: &mut dyn NotificationSubscriber) {
        if let EmbeddedTransactionBody::MultisigAccountModification {
            min_approval_delta,
            additions,
            deletions,
        } = &transaction.body
        {
            subscriber.notify(&Notification::MultisigModification {
                account: transaction.signer,
                min_approval_delta: *min_approval_delta,
                additions: additions.clone(),
                deletions: deletions.clone(),
            });
        }
    }

    fn additional_required_cosignatories(&self, transaction: &EmbeddedTransaction) -> Vec<PublicKey> {
        match &transaction.body {
            EmbeddedTransactionBody::MultisigAccountModification { additions, .. } => {
                additions.clone()
            }
            _ => Vec::new(),
        }
    }
}

/// Rejects empty modifications and keys listed more than once.
pub struct MultisigModificationValidator;

impl StatelessValidator for MultisigModificationValidator {
    fn name(&self) -> &'static str {
        "MultisigModificationValidator"
    }

    fn notification_type(&self) -> NotificationType {
        NotificationType::MultisigModification
    }

    fn validate(&self, notification: &Notification) -> ValidationResult {
        let Notification::MultisigModification {
            min_approval_delta,
            additions,
            deletions,
            ..
        } = notification
        else {
            return ValidationResult::Success;
        };

        if *min_approval_delta == 0 && additions.is_empty() && deletions.is_empty() {
            return Failure::MultisigNoModifications.into();
        }

        let mut seen: HashSet<&PublicKey> = HashSet::new();
        if !additions.iter().chain(deletions).all(|key| seen.insert(key)) {
            return Failure::MultisigRedundantModification.into();
        }

        ValidationResult::Success
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CollectingNotificationSubscriber;

    fn modification(delta: i8, additions: Vec<PublicKey>, deletions: Vec<PublicKey>) -> EmbeddedTransaction {
        EmbeddedTransaction::new(
            [1; 32],
            EmbeddedTransactionBody::MultisigAccountModification {
                min_approval_delta: delta,
                additions,
                deletions,
            },
        )
    }

    fn validate(transaction: &EmbeddedTransaction) -> ValidationResult {
        let mut collector = CollectingNotificationSubscriber::new();
        MultisigPlugin.publish(transaction, &mut collector);
        MultisigModificationValidator.validate(&collector.notifications[0])
    }

    #[test]
    fn test_additions_are_required_cosignatories() {
        let transaction = modification(1, vec![[2; 32], [3; 32]], vec![[4; 32]]);
        assert_eq!(
            MultisigPlugin.additional_required_cosignatories(&transaction),
            vec![[2; 32], [3; 32]]
        );
    }

    #[test]
    fn test_valid_modifications() {
        assert!(validate(&modification(1, vec![[2; 32]], vec![])).is_success());
        assert!(validate(&modification(-1, vec![], vec![])).is_success());
        assert!(validate(&modification(0, vec![[2; 32]], vec![[3; 32]])).is_success());
    }

    #[test]
    fn test_empty_modification() {
        assert_eq!(
            validate(&modification(0, vec![], vec![])),
            ValidationResult::Failure(Failure::MultisigNoModifications)
        );
    }

    #[test]
    fn test_redundant_modification() {
        assert_eq!(
            validate(&modification(1, vec![[2; 32], [2; 32]], vec![])),
            ValidationResult::Failure(Failure::MultisigRedundantModification)
        );
        assert_eq!(
            validate(&modification(0, vec![[2; 32]], vec![[2; 32]])),
            ValidationResult::Failure(Failure::MultisigRedundantModification)
        );
    }
}
