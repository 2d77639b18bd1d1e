//! Basic validators shared by every aggregate.
//!
//! | Validator | Notification | Failures |
//! |-----------|--------------|----------|
//! | `SupportedTransactionKindValidator` | EmbeddedTransactionKind | CoreUnsupportedTransactionKind |
//! | `DeadlineValidator` | TransactionDeadline | CorePastDeadline, CoreFutureDeadline |
//! | `FeeValidator` | TransactionFee | CoreInsufficientFee, CoreStateUnavailable |

use super::{PluginManager, TransactionRegistry};
use crate::domain::{
    Failure, Notification, NotificationType, StatefulValidator, StatelessValidator,
    ValidationResult, ValidatorContext,
};
use std::sync::Arc;
use tracing::error;

/// Registers the basic stateful validators.
///
/// The supported kind check is added by
/// [`PluginManager::create_stateless_validator`].
pub fn register(manager: &mut PluginManager) {
    manager.add_stateful_validator(Arc::new(DeadlineValidator));
    manager.add_stateful_validator(Arc::new(FeeValidator));
}

/// Rejects embedded transactions without a registered plugin.
pub struct SupportedTransactionKindValidator {
    registry: Arc<TransactionRegistry>,
}

impl SupportedTransactionKindValidator {
    pub fn new(registry: Arc<TransactionRegistry>) -> Self {
        Self { registry }
    }
}

impl StatelessValidator for SupportedTransactionKindValidator {
    fn name(&self) -> &'static str {
        "SupportedTransactionKindValidator"
    }

    fn notification_type(&self) -> NotificationType {
        NotificationType::EmbeddedTransactionKind
    }

    fn validate(&self, notification: &Notification) -> ValidationResult {
        let Notification::EmbeddedTransactionKind { kind } = notification else {
            return ValidationResult::Success;
        };

        if self.registry.is_supported(*kind) {
            ValidationResult::Success
        } else {
            Failure::CoreUnsupportedTransactionKind.into()
        }
    }
}

/// Requires `now <= deadline <= now + max_transaction_lifetime_ms`.
pub struct DeadlineValidator;

impl StatefulValidator for DeadlineValidator {
    fn name(&self) -> &'static str {
        "DeadlineValidator"
    }

    fn notification_type(&self) -> NotificationType {
        NotificationType::TransactionDeadline
    }

    fn validate(&self, notification: &Notification, context: &ValidatorContext<'_>) -> ValidationResult {
        let Notification::TransactionDeadline { deadline } = notification else {
            return ValidationResult::Success;
        };

        if *deadline < context.now {
            return Failure::CorePastDeadline.into();
        }

        let max_deadline = context
            .now
            .saturating_add(context.config.max_transaction_lifetime_ms);
        if *deadline > max_deadline {
            return Failure::CoreFutureDeadline.into();
        }

        ValidationResult::Success
    }
}

/// Requires the signer to hold `max_fee` of the currency mosaic.
pub struct FeeValidator;

impl StatefulValidator for FeeValidator {
    fn name(&self) -> &'static str {
        "FeeValidator"
    }

    fn notification_type(&self) -> NotificationType {
        NotificationType::TransactionFee
    }

    fn validate(&self, notification: &Notification, context: &ValidatorContext<'_>) -> ValidationResult {
        let Notification::TransactionFee { signer, max_fee } = notification else {
            return ValidationResult::Success;
        };

        if *max_fee == 0 {
            return ValidationResult::Success;
        }

        match context
            .state
            .account_balance(signer, context.config.currency_mosaic_id)
        {
            Ok(balance) if balance.unwrap_or(0) >= *max_fee => ValidationResult::Success,
            Ok(_) => Failure::CoreInsufficientFee.into(),
            Err(e) => {
                error!("[qc-18] Fee balance lookup failed: {}", e);
                Failure::CoreStateUnavailable.into()
            }
        }
    }
}
