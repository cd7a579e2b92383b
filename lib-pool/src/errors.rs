//! Pool Errors

use lib_pricing::PricingError;
use lib_types::{Address, AppId, AssetId, CodecError};
use thiserror::Error;

use crate::action::ActionKind;
use crate::governance::PoolPhase;
use crate::ledger::LedgerError;
use crate::types::{OnCompletion, SubOperationKind};

/// Coarse rejection category reported for a failed group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    /// Wrong length, wrong sub-operation kind, sender/receiver mismatch
    MalformedGroup,
    AssetMismatch,
    NonPositiveAmount,
    Unauthorized,
    /// Bootstrap after the pool asset is set
    Reinitialization,
    Arithmetic,
    /// Action not permitted in the current pool phase
    Lifecycle,
    Ledger,
    Internal,
}

/// Error during pool operations
///
/// Every variant is fatal to the invocation. The group is discarded as a
/// whole and no partial effect survives.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    // ---------------------------------------------------------------------
    // Malformed group
    // ---------------------------------------------------------------------
    #[error("Group size mismatch for {action}: expected {expected}, got {actual}")]
    GroupSize {
        action: ActionKind,
        expected: usize,
        actual: usize,
    },

    #[error("Sub-operation {index} must be {expected:?}")]
    WrongKind {
        index: usize,
        expected: SubOperationKind,
    },

    #[error("Sub-operation {index} pays {receiver:?}, not the application account")]
    ReceiverMismatch { index: usize, receiver: Address },

    #[error("Sub-operation {index} sent by {sender:?}, not the caller")]
    SenderMismatch { index: usize, sender: Address },

    #[error("{on_completion:?} call must stand alone, group has {actual} sub-operations")]
    BareCallGroup {
        on_completion: OnCompletion,
        actual: usize,
    },

    #[error("Call addressed to application {actual}, expected {expected}")]
    WrongApplication { expected: AppId, actual: AppId },

    #[error("Unknown action: {0:?}")]
    UnknownAction(String),

    #[error("{action} takes {expected} asset references, got {actual}")]
    ReferenceCount {
        action: ActionKind,
        expected: usize,
        actual: usize,
    },

    #[error("{action} takes {expected} account references, got {actual}")]
    AccountCount {
        action: ActionKind,
        expected: usize,
        actual: usize,
    },

    #[error("Malformed call arguments: {0}")]
    Codec(#[from] CodecError),

    // ---------------------------------------------------------------------
    // Asset identity and amounts
    // ---------------------------------------------------------------------
    #[error("Asset mismatch for {slot}: expected {expected}, got {actual}")]
    AssetMismatch {
        slot: &'static str,
        expected: AssetId,
        actual: AssetId,
    },

    #[error("Sub-operation {index} carries a zero amount")]
    NonPositiveAmount { index: usize },

    // ---------------------------------------------------------------------
    // Governance
    // ---------------------------------------------------------------------
    #[error("Sender {sender:?} is not the governor")]
    Unauthorized { sender: Address },

    #[error("Pool already bootstrapped with pool asset {0}")]
    AlreadyBootstrapped(AssetId),

    // ---------------------------------------------------------------------
    // Pricing
    // ---------------------------------------------------------------------
    #[error("Arithmetic failure: {0}")]
    Arithmetic(#[from] PricingError),

    // ---------------------------------------------------------------------
    // Lifecycle
    // ---------------------------------------------------------------------
    #[error("Pool has not been bootstrapped")]
    NotBootstrapped,

    #[error("Pool shares already in circulation; use mint")]
    AlreadyFunded,

    #[error("Pool is {0}, not active")]
    PoolNotActive(PoolPhase),

    #[error("Accounts may not opt in to the pool application")]
    OptInRejected,

    #[error("Application has been deleted")]
    ApplicationDeleted,

    // ---------------------------------------------------------------------
    // Collaborators and internals
    // ---------------------------------------------------------------------
    #[error("Application account holds no {asset}")]
    MissingHolding { asset: AssetId },

    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("State encoding error: {0}")]
    StateEncoding(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl PoolError {
    /// Map onto the rejection taxonomy
    pub fn class(&self) -> ErrorClass {
        match self {
            PoolError::GroupSize { .. }
            | PoolError::WrongKind { .. }
            | PoolError::ReceiverMismatch { .. }
            | PoolError::SenderMismatch { .. }
            | PoolError::BareCallGroup { .. }
            | PoolError::WrongApplication { .. }
            | PoolError::UnknownAction(_)
            | PoolError::ReferenceCount { .. }
            | PoolError::AccountCount { .. }
            | PoolError::Codec(_) => ErrorClass::MalformedGroup,
            PoolError::AssetMismatch { .. } => ErrorClass::AssetMismatch,
            PoolError::NonPositiveAmount { .. } => ErrorClass::NonPositiveAmount,
            PoolError::Unauthorized { .. } => ErrorClass::Unauthorized,
            PoolError::AlreadyBootstrapped(_) => ErrorClass::Reinitialization,
            PoolError::Arithmetic(_) => ErrorClass::Arithmetic,
            PoolError::NotBootstrapped
            | PoolError::AlreadyFunded
            | PoolError::PoolNotActive(_)
            | PoolError::OptInRejected
            | PoolError::ApplicationDeleted => ErrorClass::Lifecycle,
            PoolError::MissingHolding { .. } | PoolError::Ledger(_) => ErrorClass::Ledger,
            PoolError::InvalidConfig(_)
            | PoolError::StateEncoding(_)
            | PoolError::Internal(_) => ErrorClass::Internal,
        }
    }
}

/// Result type for pool operations
pub type PoolResult<T> = Result<T, PoolError>;
