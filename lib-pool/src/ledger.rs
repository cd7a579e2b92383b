//! Ledger Collaborator
//!
//! The pool never owns balances. It reads holdings through [`Ledger`] and
//! issues instructions back through it. [`MemoryLedger`] is a complete
//! in-memory ledger used for simulation and tests.

use std::collections::BTreeMap;

use lib_pricing::PricingError;
use lib_types::{Address, Amount, AssetId};
use thiserror::Error;
use tracing::debug;

use crate::config::PoolConfig;
use crate::engine::PoolEngine;
use crate::errors::{PoolError, PoolResult};
use crate::types::{AssetParams, Group, Holding, Instruction, Receipt};

/// Error raised by the ledger while applying a transfer or creation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Unknown asset: {0}")]
    UnknownAsset(AssetId),

    #[error("Account {account:?} has not opted in to asset {asset}")]
    NotOptedIn { account: Address, asset: AssetId },

    #[error("Insufficient balance of {asset} for {account:?}: have {have}, need {need}")]
    InsufficientBalance {
        account: Address,
        asset: AssetId,
        have: Amount,
        need: Amount,
    },

    #[error("Balance overflow")]
    Overflow,
}

/// Balance queries and single-instruction issuance
pub trait Ledger {
    /// Holding of `asset` by `account`; not opted in reads as zero
    fn holding(&self, account: &Address, asset: AssetId) -> Holding;

    fn unit_name(&self, asset: AssetId) -> Result<String, LedgerError>;

    /// Apply one instruction sent by `sender`
    ///
    /// Returns the new asset id for `CreateAsset`.
    fn issue(
        &mut self,
        sender: &Address,
        instruction: &Instruction,
    ) -> Result<Option<AssetId>, LedgerError>;
}

// ============================================================================
// RESERVES
// ============================================================================

/// Application account holdings at the start of an invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reserves {
    pub a: Amount,
    pub b: Amount,
    pub pool: Amount,
}

impl Reserves {
    pub fn observe(
        ledger: &dyn Ledger,
        app: &Address,
        config: &PoolConfig,
        pool_asset: AssetId,
    ) -> PoolResult<Self> {
        let read = |asset: AssetId| -> PoolResult<Amount> {
            let holding = ledger.holding(app, asset);
            if !holding.opted_in {
                return Err(PoolError::MissingHolding { asset });
            }
            Ok(holding.amount)
        };

        Ok(Self {
            a: read(config.asset_a)?,
            b: read(config.asset_b)?,
            pool: read(pool_asset)?,
        })
    }

    /// Circulating pool shares: `total_supply - pool`
    pub fn issued(&self, total_supply: Amount) -> PoolResult<Amount> {
        total_supply
            .checked_sub(self.pool)
            .ok_or(PoolError::Arithmetic(PricingError::Underflow {
                operation: "issued supply",
            }))
    }

    /// Reserve of one side of the pair
    pub fn of(&self, asset: AssetId, config: &PoolConfig) -> PoolResult<Amount> {
        if asset == config.asset_a {
            Ok(self.a)
        } else if asset == config.asset_b {
            Ok(self.b)
        } else {
            Err(PoolError::AssetMismatch {
                slot: "reserve",
                expected: config.asset_a,
                actual: asset,
            })
        }
    }
}

// ============================================================================
// IN-MEMORY LEDGER
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct MemoryLedger {
    assets: BTreeMap<AssetId, AssetParams>,
    holdings: BTreeMap<(Address, AssetId), Amount>,
    next_asset: u64,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an asset; the whole supply lands with `creator`
    pub fn create_asset(&mut self, creator: Address, params: AssetParams) -> AssetId {
        self.next_asset += 1;
        let id = AssetId::new(self.next_asset);
        self.holdings.insert((creator, id), params.total);
        self.assets.insert(id, params);
        id
    }

    pub fn asset(&self, asset: AssetId) -> Option<&AssetParams> {
        self.assets.get(&asset)
    }

    pub fn opt_in(&mut self, account: Address, asset: AssetId) -> Result<(), LedgerError> {
        if !self.assets.contains_key(&asset) {
            return Err(LedgerError::UnknownAsset(asset));
        }
        self.holdings.entry((account, asset)).or_insert(0);
        Ok(())
    }

    pub fn is_opted_in(&self, account: &Address, asset: AssetId) -> bool {
        self.holdings.contains_key(&(*account, asset))
    }

    pub fn balance(&self, account: &Address, asset: AssetId) -> Amount {
        self.holdings.get(&(*account, asset)).copied().unwrap_or(0)
    }

    /// Move `amount` of `asset`; a zero transfer to oneself is an opt-in
    pub fn transfer(
        &mut self,
        sender: Address,
        receiver: Address,
        asset: AssetId,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        if sender == receiver && amount == 0 {
            return self.opt_in(sender, asset);
        }
        if !self.assets.contains_key(&asset) {
            return Err(LedgerError::UnknownAsset(asset));
        }
        if !self.is_opted_in(&receiver, asset) {
            return Err(LedgerError::NotOptedIn {
                account: receiver,
                asset,
            });
        }

        let have = self
            .holdings
            .get(&(sender, asset))
            .copied()
            .ok_or(LedgerError::NotOptedIn {
                account: sender,
                asset,
            })?;
        let remaining = have
            .checked_sub(amount)
            .ok_or(LedgerError::InsufficientBalance {
                account: sender,
                asset,
                have,
                need: amount,
            })?;
        self.holdings.insert((sender, asset), remaining);

        let credited = self
            .balance(&receiver, asset)
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;
        self.holdings.insert((receiver, asset), credited);
        Ok(())
    }

    /// Evaluate and settle one group atomically
    ///
    /// The application call is evaluated against balances as of the start of
    /// the group, then the group's inbound transfers settle. If any step
    /// fails, both the ledger and the engine state are restored.
    pub fn submit_group(&mut self, engine: &mut PoolEngine, group: &Group) -> PoolResult<Receipt> {
        let ledger_snapshot = self.clone();
        let state_snapshot = engine.state().clone();

        match self.apply_group(engine, group) {
            Ok(receipt) => Ok(receipt),
            Err(e) => {
                debug!("Group rolled back: {}", e);
                *self = ledger_snapshot;
                engine.restore_state(state_snapshot);
                Err(e)
            }
        }
    }

    fn apply_group(&mut self, engine: &mut PoolEngine, group: &Group) -> PoolResult<Receipt> {
        let receipt = engine.execute(self, group)?;
        for transfer in group.transfers() {
            self.transfer(transfer.sender, transfer.receiver, transfer.asset, transfer.amount)?;
        }
        Ok(receipt)
    }
}

impl Ledger for MemoryLedger {
    fn holding(&self, account: &Address, asset: AssetId) -> Holding {
        match self.holdings.get(&(*account, asset)) {
            Some(amount) => Holding {
                opted_in: true,
                amount: *amount,
            },
            None => Holding::default(),
        }
    }

    fn unit_name(&self, asset: AssetId) -> Result<String, LedgerError> {
        self.assets
            .get(&asset)
            .map(|params| params.unit_name.clone())
            .ok_or(LedgerError::UnknownAsset(asset))
    }

    fn issue(
        &mut self,
        sender: &Address,
        instruction: &Instruction,
    ) -> Result<Option<AssetId>, LedgerError> {
        match instruction {
            Instruction::Transfer {
                receiver,
                asset,
                amount,
            } => {
                self.transfer(*sender, *receiver, *asset, *amount)?;
                Ok(None)
            }
            Instruction::CreateAsset(params) => {
                Ok(Some(self.create_asset(*sender, params.clone())))
            }
        }
    }
}
