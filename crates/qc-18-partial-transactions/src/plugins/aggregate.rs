//! Aggregate validators.
//!
//! Structure checks are stateless. Cosigner checks read multisig entries from
//! the state snapshot and follow cosignatory chains up to
//! `max_multisig_depth` levels.

use super::PluginManager;
use crate::domain::{
    Failure, Notification, NotificationType, PtConfig, PublicKey, StateError,
    StatefulValidator, StatelessValidator, ValidationResult, ValidatorContext,
};
use crate::ports::StateProvider;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::error;

/// Registers the aggregate validators.
pub fn register(manager: &mut PluginManager) {
    let config = manager.config().clone();
    manager.add_stateless_validator(Arc::new(AggregateStructureValidator::new(&config)));
    manager.add_stateful_validator(Arc::new(EligibleCosignersValidator));
    manager.add_stateful_validator(Arc::new(SufficientCosignersValidator));
}

/// Checks embedded transaction and cosignature counts.
pub struct AggregateStructureValidator {
    max_transactions: usize,
    max_cosignatures: usize,
}

impl AggregateStructureValidator {
    pub fn new(config: &PtConfig) -> Self {
        Self {
            max_transactions: config.max_transactions_per_aggregate,
            max_cosignatures: config.max_cosignatures_per_aggregate,
        }
    }
}

impl StatelessValidator for AggregateStructureValidator {
    fn name(&self) -> &'static str {
        "AggregateStructureValidator"
    }

    fn notification_type(&self) -> NotificationType {
        NotificationType::AggregateCosignatures
    }

    fn validate(&self, notification: &Notification) -> ValidationResult {
        let Notification::AggregateCosignatures {
            signer,
            transaction_count,
            cosignatories,
        } = notification
        else {
            return ValidationResult::Success;
        };

        if *transaction_count == 0 {
            return Failure::AggregateNoTransactions.into();
        }

        if *transaction_count > self.max_transactions {
            return Failure::AggregateTooManyTransactions.into();
        }

        if cosignatories.len() > self.max_cosignatures {
            return Failure::AggregateTooManyCosignatures.into();
        }

        let mut seen: HashSet<&PublicKey> = HashSet::with_capacity(cosignatories.len() + 1);
        seen.insert(signer);
        if !cosignatories.iter().all(|cosigner| seen.insert(cosigner)) {
            return Failure::AggregateRedundantCosignatures.into();
        }

        ValidationResult::Success
    }
}

/// Accepts a cosigner that is the aggregate signer, a required account or a
/// (transitive) cosignatory of a required multisig account.
pub struct EligibleCosignersValidator;

impl StatefulValidator for EligibleCosignersValidator {
    fn name(&self) -> &'static str {
        "EligibleCosignersValidator"
    }

    fn notification_type(&self) -> NotificationType {
        NotificationType::CosignerEligibility
    }

    fn validate(&self, notification: &Notification, context: &ValidatorContext<'_>) -> ValidationResult {
        let Notification::CosignerEligibility {
            aggregate_signer,
            cosigner,
            required,
        } = notification
        else {
            return ValidationResult::Success;
        };

        if cosigner == aggregate_signer || required.contains(cosigner) {
            return ValidationResult::Success;
        }

        let resolver = MultisigResolver::new(context.state, context.config.max_multisig_depth);
        match resolver.eligible_cosigners(required) {
            Ok(eligible) if eligible.contains(cosigner) => ValidationResult::Success,
            Ok(_) => Failure::AggregateIneligibleCosignatories.into(),
            Err(e) => state_unavailable(e),
        }
    }
}

/// Requires every required account to be approved by the aggregate signer
/// and the cosignatories, honoring multisig minimum approvals.
pub struct SufficientCosignersValidator;

impl StatefulValidator for SufficientCosignersValidator {
    fn name(&self) -> &'static str {
        "SufficientCosignersValidator"
    }

    fn notification_type(&self) -> NotificationType {
        NotificationType::RequiredCosigners
    }

    fn validate(&self, notification: &Notification, context: &ValidatorContext<'_>) -> ValidationResult {
        let Notification::RequiredCosigners {
            aggregate_signer,
            required,
            cosignatories,
        } = notification
        else {
            return ValidationResult::Success;
        };

        let signers: HashSet<PublicKey> = std::iter::once(*aggregate_signer)
            .chain(cosignatories.iter().copied())
            .collect();
        let resolver = MultisigResolver::new(context.state, context.config.max_multisig_depth);

        for account in required {
            match resolver.is_satisfied(account, &signers, 0) {
                Ok(true) => continue,
                Ok(false) => return Failure::AggregateMissingCosignatures.into(),
                Err(e) => return state_unavailable(e),
            }
        }

        ValidationResult::Success
    }
}

fn state_unavailable(e: StateError) -> ValidationResult {
    error!("[qc-18] Multisig lookup failed: {}", e);
    Failure::CoreStateUnavailable.into()
}

/// Walks multisig cosignatory graphs with a depth bound.
struct MultisigResolver<'a> {
    state: &'a dyn StateProvider,
    max_depth: u8,
}

impl<'a> MultisigResolver<'a> {
    fn new(state: &'a dyn StateProvider, max_depth: u8) -> Self {
        Self { state, max_depth }
    }

    /// `required` plus every account reachable through multisig
    /// cosignatories within the depth bound.
    fn eligible_cosigners(&self, required: &[PublicKey]) -> Result<HashSet<PublicKey>, StateError> {
        let mut eligible: HashSet<PublicKey> = required.iter().copied().collect();
        let mut frontier: Vec<PublicKey> = required.to_vec();

        for _ in 0..self.max_depth {
            let mut next = Vec::new();
            for account in &frontier {
                if let Some(entry) = self.state.multisig_entry(account)? {
                    for cosignatory in entry.cosignatories {
                        if eligible.insert(cosignatory) {
                            next.push(cosignatory);
                        }
                    }
                }
            }

            if next.is_empty() {
                break;
            }
            frontier = next;
        }

        Ok(eligible)
    }

    /// Returns true if `account` is approved by `signers`.
    ///
    /// A regular account must sign itself. A multisig account needs
    /// `min_approval` approved cosignatories; nesting deeper than the bound
    /// is never approved.
    fn is_satisfied(
        &self,
        account: &PublicKey,
        signers: &HashSet<PublicKey>,
        depth: u8,
    ) -> Result<bool, StateError> {
        let entry = match self.state.multisig_entry(account)? {
            Some(entry) if !entry.cosignatories.is_empty() => entry,
            _ => return Ok(signers.contains(account)),
        };

        if depth >= self.max_depth {
            return Ok(false);
        }

        let required_approvals = usize::from(entry.min_approval.max(1));
        let mut approvals = 0usize;
        for cosignatory in &entry.cosignatories {
            if self.is_satisfied(cosignatory, signers, depth + 1)? {
                approvals += 1;
                if approvals >= required_approvals {
                    return Ok(true);
                }
            }
        }

        Ok(false)
    }
}
