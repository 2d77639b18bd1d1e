//! Transaction plugins and validator registration.
//!
//! Each plugin module contributes:
//! - a [`TransactionPlugin`] that publishes custom notifications for one
//!   [`TransactionKind`]
//! - the validators checking those notifications
//!
//! [`PluginManager`] collects plugins and validators and builds the
//! publishers and validator sets used by the partial validator.
//!
//! | Module | Kind | Stateless | Stateful |
//! |--------|------|-----------|----------|
//! | `basic` | - | supported kind | deadline, fee |
//! | `aggregate` | - | structure | eligible cosigners, sufficient cosigners |
//! | `transfer` | Transfer | mosaics, message | balance |
//! | `namespace` | NamespaceRegistration | name, duration | availability |
//! | `multisig` | MultisigAccountModification | modification | - |

pub mod aggregate;
pub mod basic;
pub mod multisig;
pub mod namespace;
pub mod transfer;

use crate::domain::{
    required_cosigners, AdditionalCosignatories, EmbeddedTransaction, Notification,
    NotificationSubscriber, PtConfig, PublicKey, PublicationMode, StatefulValidator,
    StatefulValidatorSet, StatelessValidator, StatelessValidatorSet, TransactionEntry,
    TransactionKind,
};
use crate::ports::NotificationPublisher;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

/// Per-kind behavior of embedded transactions.
pub trait TransactionPlugin: Send + Sync {
    /// Kind handled by this plugin.
    fn kind(&self) -> TransactionKind;

    /// Publishes the custom notifications of `transaction`.
    fn publish(&self, transaction: &EmbeddedTransaction, subscriber: &mut dyn NotificationSubscriber);

    /// Accounts that must approve `transaction` besides its signer.
    fn additional_required_cosignatories(&self, _transaction: &EmbeddedTransaction) -> Vec<PublicKey> {
        Vec::new()
    }
}

/// Registered transaction plugins keyed by kind.
#[derive(Clone, Default)]
pub struct TransactionRegistry {
    plugins: BTreeMap<TransactionKind, Arc<dyn TransactionPlugin>>,
}

impl TransactionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `plugin`, replacing any plugin for the same kind.
    pub fn register(&mut self, plugin: Arc<dyn TransactionPlugin>) {
        self.plugins.insert(plugin.kind(), plugin);
    }

    pub fn find(&self, kind: TransactionKind) -> Option<&Arc<dyn TransactionPlugin>> {
        self.plugins.get(&kind)
    }

    pub fn is_supported(&self, kind: TransactionKind) -> bool {
        self.plugins.contains_key(&kind)
    }

    /// Registered kinds in ascending order.
    pub fn kinds(&self) -> Vec<TransactionKind> {
        self.plugins.keys().copied().collect()
    }
}

impl AdditionalCosignatories for TransactionRegistry {
    fn additional_cosignatories(&self, transaction: &EmbeddedTransaction) -> Vec<PublicKey> {
        self.find(transaction.kind())
            .map(|plugin| plugin.additional_required_cosignatories(transaction))
            .unwrap_or_default()
    }
}

/// Publishes aggregate notifications.
///
/// Basic notifications, in order: one `EmbeddedTransactionKind` per embedded
/// transaction, `AggregateCosignatures`, `TransactionDeadline`,
/// `TransactionFee`, `RequiredCosigners`. Custom notifications come from the
/// plugin of each embedded transaction; kinds without a plugin publish
/// nothing.
pub struct AggregateNotificationPublisher {
    registry: Arc<TransactionRegistry>,
    mode: PublicationMode,
}

impl AggregateNotificationPublisher {
    pub fn new(registry: Arc<TransactionRegistry>, mode: PublicationMode) -> Self {
        Self { registry, mode }
    }

    fn publish_basic(&self, entry: &TransactionEntry, subscriber: &mut dyn NotificationSubscriber) {
        let transaction = &entry.transaction;
        for embedded in &transaction.transactions {
            subscriber.notify(&Notification::EmbeddedTransactionKind {
                kind: embedded.kind(),
            });
        }

        subscriber.notify(&Notification::AggregateCosignatures {
            signer: transaction.signer,
            transaction_count: transaction.transactions.len(),
            cosignatories: Vec::new(),
        });
        subscriber.notify(&Notification::TransactionDeadline {
            deadline: transaction.deadline,
        });
        subscriber.notify(&Notification::TransactionFee {
            signer: transaction.signer,
            max_fee: transaction.max_fee,
        });
        subscriber.notify(&Notification::RequiredCosigners {
            aggregate_signer: transaction.signer,
            required: required_cosigners(transaction, self.registry.as_ref()),
            cosignatories: Vec::new(),
        });
    }

    fn publish_custom(&self, entry: &TransactionEntry, subscriber: &mut dyn NotificationSubscriber) {
        for embedded in &entry.transaction.transactions {
            if let Some(plugin) = self.registry.find(embedded.kind()) {
                plugin.publish(embedded, subscriber);
            }
        }
    }
}

impl NotificationPublisher for AggregateNotificationPublisher {
    fn publish(&self, entry: &TransactionEntry, subscriber: &mut dyn NotificationSubscriber) {
        match self.mode {
            PublicationMode::Basic => self.publish_basic(entry, subscriber),
            PublicationMode::Custom => self.publish_custom(entry, subscriber),
        }
    }
}

/// Registry of plugins and validators.
pub struct PluginManager {
    config: PtConfig,
    registry: Arc<TransactionRegistry>,
    stateless: Vec<Arc<dyn StatelessValidator>>,
    stateful: Vec<Arc<dyn StatefulValidator>>,
}

impl PluginManager {
    /// Creates a manager without plugins or validators.
    pub fn new(config: PtConfig) -> Self {
        Self {
            config,
            registry: Arc::new(TransactionRegistry::new()),
            stateless: Vec::new(),
            stateful: Vec::new(),
        }
    }

    /// Creates a manager with every built-in plugin registered.
    pub fn with_default_plugins(config: PtConfig) -> Self {
        let mut manager = Self::new(config);
        basic::register(&mut manager);
        aggregate::register(&mut manager);
        transfer::register(&mut manager);
        namespace::register(&mut manager);
        multisig::register(&mut manager);

        debug!(
            "[qc-18] Registered {} transaction plugins, {} stateless and {} stateful validators",
            manager.registry.kinds().len(),
            manager.stateless.len(),
            manager.stateful.len()
        );
        manager
    }

    pub fn config(&self) -> &PtConfig {
        &self.config
    }

    pub fn register_plugin(&mut self, plugin: Arc<dyn TransactionPlugin>) {
        Arc::make_mut(&mut self.registry).register(plugin);
    }

    pub fn add_stateless_validator(&mut self, validator: Arc<dyn StatelessValidator>) {
        self.stateless.push(validator);
    }

    pub fn add_stateful_validator(&mut self, validator: Arc<dyn StatefulValidator>) {
        self.stateful.push(validator);
    }

    pub fn transaction_registry(&self) -> Arc<TransactionRegistry> {
        Arc::clone(&self.registry)
    }

    pub fn create_notification_publisher(&self, mode: PublicationMode) -> AggregateNotificationPublisher {
        AggregateNotificationPublisher::new(self.transaction_registry(), mode)
    }

    /// Builds the stateless validator set.
    ///
    /// The supported transaction kind check always runs first and reflects
    /// the plugins registered when the set is built.
    pub fn create_stateless_validator(&self) -> StatelessValidatorSet {
        let mut validators: Vec<Arc<dyn StatelessValidator>> =
            vec![Arc::new(basic::SupportedTransactionKindValidator::new(
                self.transaction_registry(),
            ))];
        validators.extend(self.stateless.iter().cloned());
        StatelessValidatorSet::new(validators)
    }

    /// Builds the stateful validator set.
    pub fn create_stateful_validator(&self) -> StatefulValidatorSet {
        StatefulValidatorSet::new(self.stateful.clone())
    }
}
