//! Governance and Pool Lifecycle
//!
//! Administrative actions are gated on the governor: the stored governor if
//! one was ever set, otherwise the creator of the application.

use std::fmt;

use lib_types::{Address, Amount};
use serde::{Deserialize, Serialize};

use crate::errors::{PoolError, PoolResult};
use crate::state::PoolState;
use crate::types::OnCompletion;

/// Lifecycle phase, derived from state and reserves and never stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PoolPhase {
    /// No pool asset
    Uninitialized,
    /// Pool asset created, liquidity never seeded
    Bootstrapped,
    /// Liquidity seeded but a reserve is empty, as after a full drain
    Funded,
    /// Both reserves positive; mint, burn and swap permitted
    Active,
}

impl PoolPhase {
    pub fn derive(state: &PoolState, a_reserve: Amount, b_reserve: Amount) -> Self {
        match (state.pool_asset(), state.liquidity_seeded()) {
            (None, _) => PoolPhase::Uninitialized,
            (Some(_), false) => PoolPhase::Bootstrapped,
            (Some(_), true) if a_reserve == 0 || b_reserve == 0 => PoolPhase::Funded,
            (Some(_), true) => PoolPhase::Active,
        }
    }

    pub fn ensure_active(self) -> PoolResult<()> {
        match self {
            PoolPhase::Active => Ok(()),
            PoolPhase::Uninitialized => Err(PoolError::NotBootstrapped),
            other => Err(PoolError::PoolNotActive(other)),
        }
    }

    /// `fund` is accepted while no pool shares circulate
    ///
    /// That covers a freshly bootstrapped pool and a seeded pool whose every
    /// share has been burned.
    pub fn ensure_fundable(self, issued: Amount) -> PoolResult<()> {
        match self {
            PoolPhase::Uninitialized => Err(PoolError::NotBootstrapped),
            PoolPhase::Bootstrapped => Ok(()),
            PoolPhase::Funded | PoolPhase::Active if issued == 0 => Ok(()),
            PoolPhase::Funded | PoolPhase::Active => Err(PoolError::AlreadyFunded),
        }
    }
}

impl fmt::Display for PoolPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PoolPhase::Uninitialized => "uninitialized",
            PoolPhase::Bootstrapped => "bootstrapped",
            PoolPhase::Funded => "funded",
            PoolPhase::Active => "active",
        };
        f.write_str(name)
    }
}

pub struct GovernanceGate<'a> {
    state: &'a PoolState,
    creator: Address,
}

impl<'a> GovernanceGate<'a> {
    pub fn new(state: &'a PoolState, creator: Address) -> Self {
        Self { state, creator }
    }

    pub fn governor(&self) -> Address {
        self.state.governor().unwrap_or(self.creator)
    }

    pub fn authorize(&self, sender: &Address) -> PoolResult<()> {
        if *sender != self.governor() {
            return Err(PoolError::Unauthorized { sender: *sender });
        }
        Ok(())
    }

    /// Re-initialization guard, checked before any other bootstrap rule
    pub fn ensure_uninitialized(&self) -> PoolResult<()> {
        match self.state.pool_asset() {
            Some(existing) => Err(PoolError::AlreadyBootstrapped(existing)),
            None => Ok(()),
        }
    }

    /// Gate a lifecycle call on the application itself
    pub fn authorize_completion(
        &self,
        on_completion: OnCompletion,
        sender: &Address,
    ) -> PoolResult<()> {
        match on_completion {
            OnCompletion::NoOp | OnCompletion::CloseOut | OnCompletion::ClearState => Ok(()),
            OnCompletion::OptIn => Err(PoolError::OptInRejected),
            OnCompletion::UpdateApplication | OnCompletion::DeleteApplication => {
                self.authorize(sender)
            }
        }
    }
}
