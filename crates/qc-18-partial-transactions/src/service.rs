//! # Partial Validator Service
//!
//! Application service implementing the [`PtValidator`] inbound port.
//!
//! ## Architecture
//!
//! This is the hexagonal "application service" that:
//! - Implements the inbound port (`PtValidator`)
//! - Uses the outbound ports (`StateProvider`, `TimeSource`) for stateful checks
//! - Delegates validation to the domain pipeline and the registered plugins
//!
//! ## Partial validation
//!
//! 1. Basic notifications run through every stateless and stateful
//!    validator, tolerating missing cosignatures.
//! 2. Custom notifications run through the stateless validators only.
//!
//! Custom stateful validators never run here; their checks belong to block
//! execution once every cosignature is present.

use crate::domain::{
    tolerate_missing_cosignatures, tolerate_nothing, CosignedTransactionInfo,
    CosignerCheckResult, CosignerNotificationExtractor, Hash, JointValidator,
    NotificationValidatorAdapter, PtConfig, PublicationMode, StatefulValidatorSet,
    StatelessValidatorSet, TolerateFn, TransactionEntry, ValidatingNotificationSubscriber,
    ValidationResult, ValidatorContext, ValidatorOutcome,
};
use crate::plugins::{AggregateNotificationPublisher, PluginManager, TransactionRegistry};
use crate::ports::{PtValidator, StateProvider, TimeSource};
use std::sync::Arc;
use tracing::{debug, error, info, trace, warn, Level};

/// Partial validator backed by the plugin validators.
pub struct DefaultPtValidator {
    config: PtConfig,
    state: Arc<dyn StateProvider>,
    time: Arc<dyn TimeSource>,
    registry: Arc<TransactionRegistry>,
    stateless: StatelessValidatorSet,
    stateful: StatefulValidatorSet,
    basic_publisher: AggregateNotificationPublisher,
    custom_publisher: AggregateNotificationPublisher,
}

impl DefaultPtValidator {
    /// Create a new partial validator.
    ///
    /// # Arguments
    /// * `manager` - Plugins and validators; sets are built once, here
    /// * `state` - Read-only state snapshot for stateful validators
    /// * `time` - Clock for deadline checks
    pub fn new(
        manager: &PluginManager,
        state: Arc<dyn StateProvider>,
        time: Arc<dyn TimeSource>,
    ) -> Self {
        Self {
            config: manager.config().clone(),
            state,
            time,
            registry: manager.transaction_registry(),
            stateless: manager.create_stateless_validator(),
            stateful: manager.create_stateful_validator(),
            basic_publisher: manager.create_notification_publisher(PublicationMode::Basic),
            custom_publisher: manager.create_notification_publisher(PublicationMode::Custom),
        }
    }

    /// Validates many partial transactions in parallel.
    ///
    /// Outcomes are returned in input order.
    pub fn validate_partials(&self, entries: &[TransactionEntry]) -> Vec<ValidatorOutcome<bool>> {
        use rayon::prelude::*;

        entries
            .par_iter()
            .map(|entry| self.validate_partial(entry))
            .collect()
    }

    fn joint<'a>(&'a self, now: u64, tolerate: TolerateFn) -> JointValidator<'a> {
        let context = ValidatorContext {
            state: self.state.as_ref(),
            now,
            config: &self.config,
        };
        JointValidator::new(&self.stateless, &self.stateful, context, tolerate)
    }
}

impl PtValidator for DefaultPtValidator {
    fn validate_partial(&self, entry: &TransactionEntry) -> ValidatorOutcome<bool> {
        let joint = self.joint(self.time.now(), tolerate_missing_cosignatures);
        let mut result =
            NotificationValidatorAdapter::new(&joint, &self.basic_publisher).validate(entry);

        if result.is_success() || result.is_missing_cosignatures() {
            result = NotificationValidatorAdapter::new(&self.stateless, &self.custom_publisher)
                .validate(entry);
        }

        if result.is_success() {
            return ValidatorOutcome::new(ValidationResult::Success, true);
        }

        log_rejection(&entry.hash, result);
        ValidatorOutcome::new(result, false)
    }

    fn validate_cosigners(
        &self,
        info: &CosignedTransactionInfo,
    ) -> ValidatorOutcome<CosignerCheckResult> {
        let joint = self.joint(self.time.now(), tolerate_nothing);
        let mut subscriber = ValidatingNotificationSubscriber::new(&joint);
        CosignerNotificationExtractor::new(self.registry.as_ref()).publish(info, &mut subscriber);

        let result = subscriber.result();
        trace!(
            "[qc-18] Cosigners of {} ({} cosignatures): {}",
            hex::encode(&info.hash[..4]),
            info.cosignatures.len(),
            result
        );
        ValidatorOutcome::new(result, result.into())
    }
}

fn log_rejection(hash: &Hash, result: ValidationResult) {
    let prefix = hex::encode(&hash[..4]);
    match result.log_level() {
        Level::ERROR => error!("[qc-18] Partial transaction {} rejected: {}", prefix, result),
        Level::WARN => warn!("[qc-18] Partial transaction {} rejected: {}", prefix, result),
        Level::INFO => info!("[qc-18] Partial transaction {} rejected: {}", prefix, result),
        Level::DEBUG => debug!("[qc-18] Partial transaction {} rejected: {}", prefix, result),
        _ => trace!("[qc-18] Partial transaction {} rejected: {}", prefix, result),
    }
}
