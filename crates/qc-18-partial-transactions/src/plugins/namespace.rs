//! Namespace registration plugin.

use super::{PluginManager, TransactionPlugin};
use crate::domain::{
    EmbeddedTransaction, EmbeddedTransactionBody, Failure, Notification, NotificationSubscriber,
    NotificationType, StatefulValidator, StatelessValidator, TransactionKind, ValidationResult,
    ValidatorContext,
};
use std::sync::Arc;
use tracing::error;

/// Registers the namespace plugin and its validators.
pub fn register(manager: &mut PluginManager) {
    let max_name_size = manager.config().max_namespace_name_size;
    manager.register_plugin(Arc::new(NamespacePlugin));
    manager.add_stateless_validator(Arc::new(NamespaceNameValidator::new(max_name_size)));
    manager.add_stateless_validator(Arc::new(NamespaceDurationValidator));
    manager.add_stateful_validator(Arc::new(NamespaceAvailabilityValidator));
}

/// Publishes one `NamespaceRegistration` notification per registration.
pub struct NamespacePlugin;

impl TransactionPlugin for NamespacePlugin {
    fn kind(&self) -> TransactionKind {
        TransactionKind::NamespaceRegistration
    }

    fn publish(&self, transaction: &EmbeddedTransaction, subscriber: &mut dyn NotificationSubscriber) {
        if let EmbeddedTransactionBody::NamespaceRegistration { name, duration } = &transaction.body {
            subscriber.notify(&Notification::NamespaceRegistration {
                owner: transaction.signer,
                name: name.clone(),
                duration: *duration,
            });
        }
    }
}

fn is_valid_name_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-'
}

/// Checks namespace name length and alphabet (`a-z`, `0-9`, `_`, `-`,
/// starting with a letter or digit).
pub struct NamespaceNameValidator {
    max_name_size: usize,
}

impl NamespaceNameValidator {
    pub fn new(max_name_size: usize) -> Self {
        Self { max_name_size }
    }
}

impl StatelessValidator for NamespaceNameValidator {
    fn name(&self) -> &'static str {
        "NamespaceNameValidator"
    }

    fn notification_type(&self) -> NotificationType {
        NotificationType::NamespaceRegistration
    }

    fn validate(&self, notification: &Notification) -> ValidationResult {
        let Notification::NamespaceRegistration { name, .. } = notification else {
            return ValidationResult::Success;
        };

        if name.len() > self.max_name_size {
            return Failure::NamespaceNameTooLong.into();
        }

        let starts_alphanumeric = name
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_lowercase() || c.is_ascii_digit());
        if !starts_alphanumeric || !name.chars().all(is_valid_name_char) {
            return Failure::NamespaceInvalidName.into();
        }

        ValidationResult::Success
    }
}

/// Rejects zero durations; eternal namespaces are not registrable.
pub struct NamespaceDurationValidator;

impl StatelessValidator for NamespaceDurationValidator {
    fn name(&self) -> &'static str {
        "NamespaceDurationValidator"
    }

    fn notification_type(&self) -> NotificationType {
        NotificationType::NamespaceRegistration
    }

    fn validate(&self, notification: &Notification) -> ValidationResult {
        match notification {
            Notification::NamespaceRegistration { duration: 0, .. } => {
                Failure::NamespaceInvalidDuration.into()
            }
            _ => ValidationResult::Success,
        }
    }
}

/// Rejects names owned by another account.
pub struct NamespaceAvailabilityValidator;

impl StatefulValidator for NamespaceAvailabilityValidator {
    fn name(&self) -> &'static str {
        "NamespaceAvailabilityValidator"
    }

    fn notification_type(&self) -> NotificationType {
        NotificationType::NamespaceRegistration
    }

    fn validate(&self, notification: &Notification, context: &ValidatorContext<'_>) -> ValidationResult {
        let Notification::NamespaceRegistration { owner, name, .. } = notification else {
            return ValidationResult::Success;
        };

        match context.state.namespace_owner(name) {
            Ok(Some(current)) if current != *owner => Failure::NamespaceAlreadyOwned.into(),
            Ok(_) => ValidationResult::Success,
            Err(e) => {
                error!("[qc-18] Namespace owner lookup failed: {}", e);
                Failure::CoreStateUnavailable.into()
            }
        }
    }
}
