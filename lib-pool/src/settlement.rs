//! Settlement Staging
//!
//! Handlers never touch the ledger or the state directly. They stage
//! outgoing instructions and state writes in a [`Settlement`], and a single
//! [`Settlement::commit`] applies them once every check has passed.

use lib_types::{Address, Amount, AssetId};
use tracing::info;

use crate::errors::{PoolError, PoolResult};
use crate::ledger::Ledger;
use crate::state::PoolState;
use crate::types::{AssetParams, Instruction};

/// Proposed change to [`PoolState`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateWrite {
    Governor(Address),
    /// Record the asset created by this settlement as the pool asset
    PoolAssetFromCreation,
    LiquiditySeeded,
    Destroy,
}

/// Result of a successful commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Committed {
    pub instructions: Vec<Instruction>,
    pub created_asset: Option<AssetId>,
}

#[derive(Debug, Clone)]
pub struct Settlement {
    app: Address,
    instructions: Vec<Instruction>,
    writes: Vec<StateWrite>,
}

impl Settlement {
    pub fn new(app: Address) -> Self {
        Self {
            app,
            instructions: Vec::new(),
            writes: Vec::new(),
        }
    }

    /// Pay `amount` of `asset` from the application account; zero is allowed
    pub fn transfer(&mut self, receiver: Address, asset: AssetId, amount: Amount) {
        self.instructions.push(Instruction::Transfer {
            receiver,
            asset,
            amount,
        });
    }

    /// Zero-amount transfer from the application account to itself
    pub fn opt_in(&mut self, asset: AssetId) {
        self.transfer(self.app, asset, 0);
    }

    pub fn create_asset(&mut self, params: AssetParams) {
        self.instructions.push(Instruction::CreateAsset(params));
    }

    pub fn write(&mut self, write: StateWrite) {
        self.writes.push(write);
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn writes(&self) -> &[StateWrite] {
        &self.writes
    }

    /// Issue every instruction in order, then apply the state writes
    ///
    /// State writes go to a copy that replaces `state` only when every step
    /// succeeded. Ledger-side effects of a failed commit are left to the
    /// surrounding ledger to discard.
    pub fn commit(self, ledger: &mut dyn Ledger, state: &mut PoolState) -> PoolResult<Committed> {
        let mut created_asset = None;
        for instruction in &self.instructions {
            if let Some(id) = ledger.issue(&self.app, instruction)? {
                if created_asset.replace(id).is_some() {
                    return Err(PoolError::Internal(
                        "settlement created more than one asset".to_string(),
                    ));
                }
            }
        }

        let mut staged = state.clone();
        for write in &self.writes {
            match write {
                StateWrite::Governor(governor) => staged.set_governor(*governor),
                StateWrite::PoolAssetFromCreation => {
                    let id = created_asset.ok_or_else(|| {
                        PoolError::Internal("no asset created for pool asset write".to_string())
                    })?;
                    staged.set_pool_asset(id)?;
                }
                StateWrite::LiquiditySeeded => staged.mark_seeded(),
                StateWrite::Destroy => staged.destroy(),
            }
        }
        *state = staged;

        info!(
            "Settlement committed: {} instructions, {} state writes",
            self.instructions.len(),
            self.writes.len()
        );

        Ok(Committed {
            instructions: self.instructions,
            created_asset,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::MemoryLedger;

    fn app() -> Address {
        Address::for_application(5)
    }

    fn params() -> AssetParams {
        AssetParams {
            name: "DPT-A-B".to_string(),
            unit_name: "dpt".to_string(),
            total: 1_000,
            decimals: 3,
            manager: app(),
            reserve: app(),
        }
    }

    #[test]
    fn test_commit_creates_and_records_pool_asset() {
        let mut ledger = MemoryLedger::new();
        let mut state = PoolState::new();

        let mut settlement = Settlement::new(app());
        settlement.create_asset(params());
        settlement.write(StateWrite::PoolAssetFromCreation);

        let committed = settlement.commit(&mut ledger, &mut state).unwrap();
        let id = committed.created_asset.unwrap();
        assert_eq!(state.pool_asset(), Some(id));
        assert_eq!(ledger.balance(&app(), id), 1_000);
    }

    #[test]
    fn test_reseed_write_is_accepted() {
        let mut ledger = MemoryLedger::new();
        let mut state = PoolState::new();
        state.mark_seeded();

        let mut settlement = Settlement::new(app());
        settlement.write(StateWrite::LiquiditySeeded);
        assert!(settlement.commit(&mut ledger, &mut state).is_ok());
        assert!(state.liquidity_seeded());
    }

    #[test]
    fn test_opt_in_is_zero_self_transfer() {
        let mut settlement = Settlement::new(app());
        settlement.opt_in(AssetId::new(4));
        assert_eq!(
            settlement.instructions(),
            &[Instruction::Transfer {
                receiver: app(),
                asset: AssetId::new(4),
                amount: 0,
            }]
        );
    }

    #[test]
    fn test_failed_write_leaves_state_untouched() {
        let mut ledger = MemoryLedger::new();
        let mut state = PoolState::new();
        state.mark_seeded();
        let before = state.clone();

        // Pool asset write with nothing created
        let mut settlement = Settlement::new(app());
        settlement.write(StateWrite::Governor(Address::new([4u8; 32])));
        settlement.write(StateWrite::PoolAssetFromCreation);

        assert!(matches!(
            settlement.commit(&mut ledger, &mut state),
            Err(PoolError::Internal(_))
        ));
        assert_eq!(state, before);
    }

    #[test]
    fn test_failed_instruction_leaves_state_untouched() {
        let mut ledger = MemoryLedger::new();
        let mut state = PoolState::new();

        let mut settlement = Settlement::new(app());
        settlement.write(StateWrite::Governor(Address::new([4u8; 32])));
        settlement.transfer(Address::new([4u8; 32]), AssetId::new(99), 10);

        assert!(matches!(
            settlement.commit(&mut ledger, &mut state),
            Err(PoolError::Ledger(_))
        ));
        assert_eq!(state.governor(), None);
    }

    #[test]
    fn test_pool_asset_write_without_creation() {
        let mut ledger = MemoryLedger::new();
        let mut state = PoolState::new();
        let mut settlement = Settlement::new(app());
        settlement.write(StateWrite::PoolAssetFromCreation);

        assert!(matches!(
            settlement.commit(&mut ledger, &mut state),
            Err(PoolError::Internal(_))
        ));
    }
}
