//! Validation result codes and their public mappings.

use thiserror::Error;
use tracing::Level;

/// Group of related failure codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Facility {
    Core,
    Aggregate,
    Multisig,
    Transfer,
    Namespace,
}

/// Named validation failure.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq, Hash)]
pub enum Failure {
    // Core
    #[error("Transaction deadline has already passed")]
    CorePastDeadline,
    #[error("Transaction deadline is too far in the future")]
    CoreFutureDeadline,
    #[error("Signer cannot pay the maximum fee")]
    CoreInsufficientFee,
    #[error("Embedded transaction kind is not supported")]
    CoreUnsupportedTransactionKind,
    #[error("Blockchain state could not be read")]
    CoreStateUnavailable,

    // Aggregate
    #[error("Aggregate contains no transactions")]
    AggregateNoTransactions,
    #[error("Aggregate contains too many transactions")]
    AggregateTooManyTransactions,
    #[error("Aggregate has too many cosignatures")]
    AggregateTooManyCosignatures,
    #[error("Aggregate has redundant cosignatures")]
    AggregateRedundantCosignatures,
    #[error("Aggregate has ineligible cosignatories")]
    AggregateIneligibleCosignatories,
    #[error("Aggregate is missing cosignatures")]
    AggregateMissingCosignatures,

    // Multisig
    #[error("Multisig modification adds or deletes a cosignatory twice")]
    MultisigRedundantModification,
    #[error("Multisig modification changes nothing")]
    MultisigNoModifications,

    // Transfer
    #[error("Transfer contains a zero amount")]
    TransferZeroAmount,
    #[error("Transfer mosaics are not strictly ordered by id")]
    TransferOutOfOrderMosaics,
    #[error("Transfer message is too large")]
    TransferMessageTooLarge,
    #[error("Sender balance is insufficient for the transfer")]
    TransferInsufficientBalance,

    // Namespace
    #[error("Namespace name contains invalid characters")]
    NamespaceInvalidName,
    #[error("Namespace name is too long")]
    NamespaceNameTooLong,
    #[error("Namespace duration is invalid")]
    NamespaceInvalidDuration,
    #[error("Namespace is already owned by another account")]
    NamespaceAlreadyOwned,
}

impl Failure {
    /// Facility the failure belongs to.
    pub fn facility(&self) -> Facility {
        use Failure::*;
        match self {
            CorePastDeadline
            | CoreFutureDeadline
            | CoreInsufficientFee
            | CoreUnsupportedTransactionKind
            | CoreStateUnavailable => Facility::Core,
            AggregateNoTransactions
            | AggregateTooManyTransactions
            | AggregateTooManyCosignatures
            | AggregateRedundantCosignatures
            | AggregateIneligibleCosignatories
            | AggregateMissingCosignatures => Facility::Aggregate,
            MultisigRedundantModification | MultisigNoModifications => Facility::Multisig,
            TransferZeroAmount
            | TransferOutOfOrderMosaics
            | TransferMessageTooLarge
            | TransferInsufficientBalance => Facility::Transfer,
            NamespaceInvalidName
            | NamespaceNameTooLong
            | NamespaceInvalidDuration
            | NamespaceAlreadyOwned => Facility::Namespace,
        }
    }
}

/// Outcome of running validators over notifications.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValidationResult {
    Success,
    Failure(Failure),
}

impl ValidationResult {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    pub fn is_failure(&self) -> bool {
        !self.is_success()
    }

    /// Returns the failure code, if any.
    pub fn failure(&self) -> Option<Failure> {
        match self {
            Self::Success => None,
            Self::Failure(failure) => Some(*failure),
        }
    }

    /// Returns true for the missing cosignatures code.
    pub fn is_missing_cosignatures(&self) -> bool {
        *self == Self::Failure(Failure::AggregateMissingCosignatures)
    }

    /// Severity at which a caller should log this outcome.
    pub fn log_level(&self) -> Level {
        match self {
            Self::Success => Level::TRACE,
            Self::Failure(Failure::CorePastDeadline) => Level::DEBUG,
            Self::Failure(Failure::AggregateMissingCosignatures) => Level::INFO,
            Self::Failure(Failure::CoreStateUnavailable) => Level::ERROR,
            Self::Failure(_) => Level::WARN,
        }
    }
}

impl From<Failure> for ValidationResult {
    fn from(failure: Failure) -> Self {
        Self::Failure(failure)
    }
}

impl std::fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success => write!(f, "Success"),
            Self::Failure(failure) => write!(f, "{:?}: {}", failure, failure),
        }
    }
}

/// The four outcomes callers of cosigner validation observe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CosignerCheckResult {
    /// Cosigners are eligible and sufficient.
    Success,
    /// At least one cosigner is not allowed to sign.
    Ineligible,
    /// More cosignatures are required.
    Missing,
    /// Any other failure.
    Failure,
}

impl From<ValidationResult> for CosignerCheckResult {
    fn from(result: ValidationResult) -> Self {
        match result {
            ValidationResult::Success => Self::Success,
            ValidationResult::Failure(Failure::AggregateIneligibleCosignatories) => {
                Self::Ineligible
            }
            ValidationResult::Failure(Failure::AggregateMissingCosignatures) => Self::Missing,
            ValidationResult::Failure(_) => Self::Failure,
        }
    }
}

/// Raw validation result paired with its normalized interpretation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ValidatorOutcome<T> {
    /// Result produced by the pipeline.
    pub raw: ValidationResult,
    /// Caller-facing interpretation of `raw`.
    pub normalized: T,
}

impl<T> ValidatorOutcome<T> {
    pub fn new(raw: ValidationResult, normalized: T) -> Self {
        Self { raw, normalized }
    }
}
