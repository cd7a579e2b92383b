//! Constant-Product Pool Settlement
//!
//! Validation, governance and settlement for a two-asset AMM run by a
//! custodial application account.
//!
//! # Invariants
//!
//! 1. **All or nothing**: a group either commits every instruction and state
//!    write or leaves no trace
//! 2. **Start-of-invocation reserves**: pricing only sees reserves as they
//!    were before the group's own deposits
//! 3. **Write-once pool asset**: bootstrap succeeds at most once
//! 4. **Governor-only administration**: bootstrap, governor reassignment,
//!    update and delete
//!
//! # Usage
//!
//! ```ignore
//! let mut engine = PoolEngine::deploy(config, app_id, creator)?;
//! let receipt = ledger.submit_group(&mut engine, &group)?;
//! ```

pub mod action;
pub mod config;
pub mod engine;
pub mod errors;
pub mod governance;
pub mod ledger;
pub mod settlement;
pub mod state;
pub mod types;
pub mod validate;

pub use action::{
    Action, ActionKind, BootstrapPayload, BurnPayload, CallArgs, FundPayload, MintPayload,
    SetGovernorPayload, SwapPayload,
};
pub use config::{PoolConfig, PoolTokenParams};
pub use engine::PoolEngine;
pub use errors::{ErrorClass, PoolError, PoolResult};
pub use governance::{GovernanceGate, PoolPhase};
pub use ledger::{Ledger, LedgerError, MemoryLedger, Reserves};
pub use settlement::{Committed, Settlement, StateWrite};
pub use state::{PoolState, StateValue};
pub use types::{
    AppCall, AssetParams, AssetTransfer, Group, Holding, Instruction, OnCompletion, Receipt,
    SubOperation, SubOperationKind,
};
pub use validate::GroupValidator;
