//! Validation pipeline.
//!
//! A publisher expands a transaction into notifications; each notification
//! is checked by the validators registered for its type. Stateless
//! validators run before stateful ones and evaluation stops at the first
//! failure, unless the tolerate predicate accepts that failure.
//!
//! ```text
//! publisher ──→ ValidatingNotificationSubscriber ──→ JointValidator
//!                      │                               ├─ StatelessValidatorSet
//!                      └─ result()                     └─ StatefulValidatorSet (+ state, now)
//! ```

use super::config::PtConfig;
use super::entities::{Timestamp, TransactionEntry};
use super::notifications::{Notification, NotificationSubscriber, NotificationType};
use super::results::ValidationResult;
use crate::ports::{NotificationPublisher, StateProvider};
use std::sync::Arc;
use tracing::trace;

/// Everything a stateful validator may read.
#[derive(Clone, Copy)]
pub struct ValidatorContext<'a> {
    /// Read-only blockchain state snapshot.
    pub state: &'a dyn StateProvider,
    /// Current time (ms).
    pub now: Timestamp,
    /// Pool limits shared by every validator.
    pub config: &'a PtConfig,
}

/// Validator that depends only on the notification.
pub trait StatelessValidator: Send + Sync {
    /// Name used in trace output.
    fn name(&self) -> &'static str;

    /// Type of notifications this validator checks.
    fn notification_type(&self) -> NotificationType;

    /// Checks one notification of [`Self::notification_type`].
    fn validate(&self, notification: &Notification) -> ValidationResult;
}

/// Validator that also reads blockchain state and time.
pub trait StatefulValidator: Send + Sync {
    /// Name used in trace output.
    fn name(&self) -> &'static str;

    /// Type of notifications this validator checks.
    fn notification_type(&self) -> NotificationType;

    /// Checks one notification of [`Self::notification_type`] against `context`.
    fn validate(
        &self,
        notification: &Notification,
        context: &ValidatorContext<'_>,
    ) -> ValidationResult;
}

/// Validates a single notification.
pub trait NotificationValidator {
    fn validate(&self, notification: &Notification) -> ValidationResult;

    /// Returns true if `result` should not stop evaluation.
    fn tolerates(&self, _result: ValidationResult) -> bool {
        false
    }
}

/// Predicate selecting failures that do not stop evaluation.
pub type TolerateFn = fn(ValidationResult) -> bool;

/// Tolerates no failure.
pub fn tolerate_nothing(_result: ValidationResult) -> bool {
    false
}

/// Tolerates only missing cosignatures.
pub fn tolerate_missing_cosignatures(result: ValidationResult) -> bool {
    result.is_missing_cosignatures()
}

/// Folds validator results in order.
///
/// Returns the first failure `tolerate` rejects; otherwise the last
/// tolerated failure, or success.
fn run_in_order<'v, I>(
    results: I,
    notification_type: NotificationType,
    tolerate: TolerateFn,
) -> ValidationResult
where
    I: Iterator<Item = (&'v str, ValidationResult)>,
{
    let mut tolerated = None;
    for (name, result) in results {
        if result.is_success() {
            continue;
        }

        if tolerate(result) {
            trace!("[qc-18] {} tolerated on {:?}: {}", name, notification_type, result);
            tolerated = Some(result);
            continue;
        }

        trace!("[qc-18] {} rejected {:?}: {}", name, notification_type, result);
        return result;
    }

    tolerated.unwrap_or(ValidationResult::Success)
}

/// Ordered stateless validators.
#[derive(Clone, Default)]
pub struct StatelessValidatorSet {
    validators: Vec<Arc<dyn StatelessValidator>>,
}

impl StatelessValidatorSet {
    /// Creates a set evaluated in `validators` order.
    pub fn new(validators: Vec<Arc<dyn StatelessValidator>>) -> Self {
        Self { validators }
    }

    /// Number of registered validators.
    pub fn len(&self) -> usize {
        self.validators.len()
    }

    /// Returns true if no validator is registered.
    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    /// Validator names in evaluation order.
    pub fn names(&self) -> Vec<&'static str> {
        self.validators.iter().map(|v| v.name()).collect()
    }

    /// Runs every matching validator, continuing past failures `tolerate` accepts.
    pub fn validate_with(
        &self,
        notification: &Notification,
        tolerate: TolerateFn,
    ) -> ValidationResult {
        let notification_type = notification.notification_type();
        let results = self
            .validators
            .iter()
            .filter(|validator| validator.notification_type() == notification_type)
            .map(|validator| (validator.name(), validator.validate(notification)));
        run_in_order(results, notification_type, tolerate)
    }
}

impl NotificationValidator for StatelessValidatorSet {
    fn validate(&self, notification: &Notification) -> ValidationResult {
        self.validate_with(notification, tolerate_nothing)
    }
}

/// Ordered stateful validators.
#[derive(Clone, Default)]
pub struct StatefulValidatorSet {
    validators: Vec<Arc<dyn StatefulValidator>>,
}

impl StatefulValidatorSet {
    /// Creates a set evaluated in `validators` order.
    pub fn new(validators: Vec<Arc<dyn StatefulValidator>>) -> Self {
        Self { validators }
    }

    /// Number of registered validators.
    pub fn len(&self) -> usize {
        self.validators.len()
    }

    /// Returns true if no validator is registered.
    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    /// Validator names in evaluation order.
    pub fn names(&self) -> Vec<&'static str> {
        self.validators.iter().map(|v| v.name()).collect()
    }

    /// Runs every matching validator, continuing past failures `tolerate` accepts.
    pub fn validate(
        &self,
        notification: &Notification,
        context: &ValidatorContext<'_>,
        tolerate: TolerateFn,
    ) -> ValidationResult {
        let notification_type = notification.notification_type();
        let results = self
            .validators
            .iter()
            .filter(|validator| validator.notification_type() == notification_type)
            .map(|validator| (validator.name(), validator.validate(notification, context)));
        run_in_order(results, notification_type, tolerate)
    }
}

/// Stateless then stateful validation of one notification.
///
/// Tolerated failures never stop evaluation, neither inside a set nor
/// between the sets. A later hard failure replaces them; otherwise the
/// last tolerated failure is returned.
pub struct JointValidator<'a> {
    stateless: &'a StatelessValidatorSet,
    stateful: &'a StatefulValidatorSet,
    context: ValidatorContext<'a>,
    tolerate: TolerateFn,
}

impl<'a> JointValidator<'a> {
    pub fn new(
        stateless: &'a StatelessValidatorSet,
        stateful: &'a StatefulValidatorSet,
        context: ValidatorContext<'a>,
        tolerate: TolerateFn,
    ) -> Self {
        Self {
            stateless,
            stateful,
            context,
            tolerate,
        }
    }
}

impl NotificationValidator for JointValidator<'_> {
    fn validate(&self, notification: &Notification) -> ValidationResult {
        let stateless = self.stateless.validate_with(notification, self.tolerate);
        if stateless.is_failure() && !(self.tolerate)(stateless) {
            return stateless;
        }

        let stateful = self
            .stateful
            .validate(notification, &self.context, self.tolerate);
        if stateful.is_failure() {
            return stateful;
        }

        stateless
    }

    fn tolerates(&self, result: ValidationResult) -> bool {
        (self.tolerate)(result)
    }
}

/// Validates notifications as they are published and keeps the outcome.
///
/// The first failure the validator does not tolerate is final and later
/// notifications are ignored. A tolerated failure is remembered (the last
/// one wins) and becomes the result unless a later failure is final.
pub struct ValidatingNotificationSubscriber<'a> {
    validator: &'a dyn NotificationValidator,
    failure: Option<ValidationResult>,
    tolerated: Option<ValidationResult>,
}

impl<'a> ValidatingNotificationSubscriber<'a> {
    pub fn new(validator: &'a dyn NotificationValidator) -> Self {
        Self {
            validator,
            failure: None,
            tolerated: None,
        }
    }

    /// Aggregate result of every notification received so far.
    pub fn result(&self) -> ValidationResult {
        self.failure
            .or(self.tolerated)
            .unwrap_or(ValidationResult::Success)
    }
}

impl NotificationSubscriber for ValidatingNotificationSubscriber<'_> {
    fn notify(&mut self, notification: &Notification) {
        if self.failure.is_some() {
            return;
        }

        let result = self.validator.validate(notification);
        if result.is_success() {
            return;
        }

        if self.validator.tolerates(result) {
            self.tolerated = Some(result);
        } else {
            self.failure = Some(result);
        }
    }
}

/// Validates whole transactions by publishing them through a validator.
pub struct NotificationValidatorAdapter<'a> {
    validator: &'a dyn NotificationValidator,
    publisher: &'a dyn NotificationPublisher,
}

impl<'a> NotificationValidatorAdapter<'a> {
    pub fn new(
        validator: &'a dyn NotificationValidator,
        publisher: &'a dyn NotificationPublisher,
    ) -> Self {
        Self {
            validator,
            publisher,
        }
    }

    pub fn validate(&self, entry: &TransactionEntry) -> ValidationResult {
        let mut subscriber = ValidatingNotificationSubscriber::new(self.validator);
        self.publisher.publish(entry, &mut subscriber);
        subscriber.result()
    }
}
