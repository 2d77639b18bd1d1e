//! Semantic notifications produced from aggregate transactions.
//!
//! Validators never look at transactions directly. A publisher expands an
//! aggregate into an ordered sequence of notifications and each validator
//! registers for exactly one [`NotificationType`].

use super::entities::{Amount, Mosaic, PublicKey, Timestamp, TransactionKind};

/// Which notifications a publisher emits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PublicationMode {
    /// Structural and cosigner notifications common to every aggregate.
    Basic,
    /// Per-kind notifications published by transaction plugins.
    Custom,
}

/// Discriminant of a [`Notification`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NotificationType {
    EmbeddedTransactionKind,
    AggregateCosignatures,
    TransactionDeadline,
    TransactionFee,
    CosignerEligibility,
    RequiredCosigners,
    Transfer,
    NamespaceRegistration,
    MultisigModification,
}

/// A single semantic fact about a transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Notification {
    /// An embedded transaction of `kind` is present.
    EmbeddedTransactionKind { kind: TransactionKind },

    /// Aggregate structure: embedded transaction count and cosigners.
    AggregateCosignatures {
        signer: PublicKey,
        transaction_count: usize,
        cosignatories: Vec<PublicKey>,
    },

    /// The aggregate must be confirmed before `deadline`.
    TransactionDeadline { deadline: Timestamp },

    /// `signer` pays up to `max_fee`.
    TransactionFee { signer: PublicKey, max_fee: Amount },

    /// `cosigner` signed an aggregate requiring signatures from `required`.
    CosignerEligibility {
        aggregate_signer: PublicKey,
        cosigner: PublicKey,
        required: Vec<PublicKey>,
    },

    /// Every account in `required` must be satisfied by `cosignatories`
    /// (plus the aggregate signer).
    RequiredCosigners {
        aggregate_signer: PublicKey,
        required: Vec<PublicKey>,
        cosignatories: Vec<PublicKey>,
    },

    /// Embedded transfer.
    Transfer {
        sender: PublicKey,
        recipient: PublicKey,
        mosaics: Vec<Mosaic>,
        message_size: usize,
    },

    /// Embedded root namespace registration.
    NamespaceRegistration {
        owner: PublicKey,
        name: String,
        duration: u64,
    },

    /// Embedded multisig cosignatory modification.
    MultisigModification {
        account: PublicKey,
        min_approval_delta: i8,
        additions: Vec<PublicKey>,
        deletions: Vec<PublicKey>,
    },
}

impl Notification {
    /// Discriminant of this notification.
    pub fn notification_type(&self) -> NotificationType {
        match self {
            Self::EmbeddedTransactionKind { .. } => NotificationType::EmbeddedTransactionKind,
            Self::AggregateCosignatures { .. } => NotificationType::AggregateCosignatures,
            Self::TransactionDeadline { .. } => NotificationType::TransactionDeadline,
            Self::TransactionFee { .. } => NotificationType::TransactionFee,
            Self::CosignerEligibility { .. } => NotificationType::CosignerEligibility,
            Self::RequiredCosigners { .. } => NotificationType::RequiredCosigners,
            Self::Transfer { .. } => NotificationType::Transfer,
            Self::NamespaceRegistration { .. } => NotificationType::NamespaceRegistration,
            Self::MultisigModification { .. } => NotificationType::MultisigModification,
        }
    }
}

/// Receives notifications from a publisher, in publication order.
pub trait NotificationSubscriber {
    fn notify(&mut self, notification: &Notification);
}

/// Collects every notification it receives.
#[derive(Debug, Default)]
pub struct CollectingNotificationSubscriber {
    pub notifications: Vec<Notification>,
}

impl CollectingNotificationSubscriber {
    pub fn new() -> Self {
        Self::default()
    }

    /// Types of the collected notifications in order.
    pub fn types(&self) -> Vec<NotificationType> {
        self.notifications
            .iter()
            .map(Notification::notification_type)
            .collect()
    }
}

impl NotificationSubscriber for CollectingNotificationSubscriber {
    fn notify(&mut self, notification: &Notification) {
        self.notifications.push(notification.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_type() {
        let notification = Notification::TransactionDeadline { deadline: 10 };
        assert_eq!(
            notification.notification_type(),
            NotificationType::TransactionDeadline
        );

        let notification = Notification::NamespaceRegistration {
            owner: [1; 32],
            name: "alpha".into(),
            duration: 5,
        };
        assert_eq!(
            notification.notification_type(),
            NotificationType::NamespaceRegistration
        );
    }

    #[test]
    fn test_collecting_subscriber_preserves_order() {
        let mut subscriber = CollectingNotificationSubscriber::new();
        subscriber.notify(&Notification::TransactionDeadline { deadline: 1 });
        subscriber.notify(&Notification::TransactionFee {
            signer: [2; 32],
            max_fee: 3,
        });

        assert_eq!(
            subscriber.types(),
            vec![
                NotificationType::TransactionDeadline,
                NotificationType::TransactionFee
            ]
        );
    }
}
