//! Transfer plugin.

use super::{PluginManager, TransactionPlugin};
use crate::domain::{
    EmbeddedTransaction, EmbeddedTransactionBody, Failure, Notification, NotificationSubscriber,
    NotificationType, StatefulValidator, StatelessValidator, TransactionKind, ValidationResult,
    ValidatorContext,
};
use std::sync::Arc;
use tracing::error;

/// Registers the transfer plugin and its validators.
pub fn register(manager: &mut PluginManager) {
    let max_message_size = manager.config().max_message_size;
    manager.register_plugin(Arc::new(TransferPlugin));
    manager.add_stateless_validator(Arc::new(TransferMosaicsValidator));
    manager.add_stateless_validator(Arc::new(TransferMessageValidator::new(max_message_size)));
    manager.add_stateful_validator(Arc::new(TransferBalanceValidator));
}

/// Publishes one `Transfer` notification per embedded transfer.
pub struct TransferPlugin;

impl TransactionPlugin for TransferPlugin {
    fn kind(&self) -> TransactionKind {
        TransactionKind::Transfer
    }

    fn publish(&self, transaction: &EmbeddedTransaction, subscriber: &mut dyn NotificationSubscriber) {
        if let EmbeddedTransactionBody::Transfer {
            recipient,
            mosaics,
            message,
        } = &transaction.body
        {
            subscriber.notify(&Notification::Transfer {
                sender: transaction.signer,
                recipient: *recipient,
                mosaics: mosaics.clone(),
                message_size: message.len(),
            });
        }
    }
}

/// Rejects zero amounts and mosaics not strictly ordered by id.
pub struct TransferMosaicsValidator;

impl StatelessValidator for TransferMosaicsValidator {
    fn name(&self) -> &'static str {
        "TransferMosaicsValidator"
    }

    fn notification_type(&self) -> NotificationType {
        NotificationType::Transfer
    }

    fn validate(&self, notification: &Notification) -> ValidationResult {
        let Notification::Transfer { mosaics, .. } = notification else {
            return ValidationResult::Success;
        };

        if mosaics.iter().any(|mosaic| mosaic.amount == 0) {
            return Failure::TransferZeroAmount.into();
        }

        if mosaics.windows(2).any(|pair| pair[0].id >= pair[1].id) {
            return Failure::TransferOutOfOrderMosaics.into();
        }

        ValidationResult::Success
    }
}

/// Limits the transfer message size.
pub struct TransferMessageValidator {
    max_message_size: usize,
}

impl TransferMessageValidator {
    pub fn new(max_message_size: usize) -> Self {
        Self { max_message_size }
    }
}

impl StatelessValidator for TransferMessageValidator {
    fn name(&self) -> &'static str {
        "TransferMessageValidator"
    }

    fn notification_type(&self) -> NotificationType {
        NotificationType::Transfer
    }

    fn validate(&self, notification: &Notification) -> ValidationResult {
        match notification {
            Notification::Transfer { message_size, .. } if *message_size > self.max_message_size => {
                Failure::TransferMessageTooLarge.into()
            }
            _ => ValidationResult::Success,
        }
    }
}

/// Requires the sender to hold every transferred amount.
pub struct TransferBalanceValidator;

impl StatefulValidator for TransferBalanceValidator {
    fn name(&self) -> &'static str {
        "TransferBalanceValidator"
    }

    fn notification_type(&self) -> NotificationType {
        NotificationType::Transfer
    }

    fn validate(&self, notification: &Notification, context: &ValidatorContext<'_>) -> ValidationResult {
        let Notification::Transfer { sender, mosaics, .. } = notification else {
            return ValidationResult::Success;
        };

        for mosaic in mosaics {
            match context.state.account_balance(sender, mosaic.id) {
                Ok(balance) if balance.unwrap_or(0) >= mosaic.amount => continue,
                Ok(_) => return Failure::TransferInsufficientBalance.into(),
                Err(e) => {
                    error!("[qc-18] Transfer balance lookup failed: {}", e);
                    return Failure::CoreStateUnavailable.into();
                }
            }
        }

        ValidationResult::Success
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryStateProvider;
    use crate::domain::{CollectingNotificationSubscriber, Mosaic};
    use crate::plugins::test_utils::with_context;

    fn notification(mosaics: Vec<Mosaic>, message_size: usize) -> Notification {
        Notification::Transfer {
            sender: [1; 32],
            recipient: [2; 32],
            mosaics,
            message_size,
        }
    }

    #[test]
    fn test_plugin_publishes_transfer() {
        let transaction = EmbeddedTransaction::new(
            [1; 32],
            EmbeddedTransactionBody::Transfer {
                recipient: [2; 32],
                mosaics: vec![Mosaic::new(5, 10)],
                message: vec![0; 12],
            },
        );
        let mut collector = CollectingNotificationSubscriber::new();

        TransferPlugin.publish(&transaction, &mut collector);

        assert_eq!(
            collector.notifications,
            vec![notification(vec![Mosaic::new(5, 10)], 12)]
        );
        assert!(TransferPlugin
            .additional_required_cosignatories(&transaction)
            .is_empty());
    }

    #[test]
    fn test_mosaics() {
        let validator = TransferMosaicsValidator;
        assert!(validator
            .validate(&notification(vec![Mosaic::new(1, 1), Mosaic::new(2, 1)], 0))
            .is_success());
        assert!(validator.validate(&notification(vec![], 0)).is_success());
        assert_eq!(
            validator.validate(&notification(vec![Mosaic::new(1, 0)], 0)),
            ValidationResult::Failure(Failure::TransferZeroAmount)
        );
        assert_eq!(
            validator.validate(&notification(vec![Mosaic::new(2, 1), Mosaic::new(1, 1)], 0)),
            ValidationResult::Failure(Failure::TransferOutOfOrderMosaics)
        );
        assert_eq!(
            validator.validate(&notification(vec![Mosaic::new(1, 1), Mosaic::new(1, 2)], 0)),
            ValidationResult::Failure(Failure::TransferOutOfOrderMosaics)
        );
    }

    #[test]
    fn test_message_size() {
        let validator = TransferMessageValidator::new(16);
        assert!(validator.validate(&notification(vec![], 16)).is_success());
        assert_eq!(
            validator.validate(&notification(vec![], 17)),
            ValidationResult::Failure(Failure::TransferMessageTooLarge)
        );
    }

    #[test]
    fn test_balance() {
        let state = InMemoryStateProvider::new()
            .with_balance([1; 32], 1, 100)
            .with_balance([1; 32], 2, 5);
        let check = |mosaics| {
            with_context(&state, 0, |context| {
                TransferBalanceValidator.validate(&notification(mosaics, 0), context)
            })
        };

        assert!(check(vec![Mosaic::new(1, 100), Mosaic::new(2, 5)]).is_success());
        assert_eq!(
            check(vec![Mosaic::new(1, 100), Mosaic::new(2, 6)]),
            ValidationResult::Failure(Failure::TransferInsufficientBalance)
        );
        assert_eq!(
            check(vec![Mosaic::new(3, 1)]),
            ValidationResult::Failure(Failure::TransferInsufficientBalance)
        );
    }
}
