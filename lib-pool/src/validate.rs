//! Group Validation
//!
//! Checks the shape of a group against the decoded action before any
//! pricing happens. Output is a fully validated [`Action`] or an error;
//! nothing downstream ever sees a partially checked group.
//!
//! # Rules
//!
//! 1. **Exact size**: group length is fixed per action
//! 2. **Asset identity**: every referenced asset equals the pool's asset for its slot
//! 3. **Inbound only**: every transfer pays the application account
//! 4. **Positive amounts**: no zero-amount deposits
//! 5. **One depositor**: every transfer has the same sender as the app call

use lib_types::{Address, AssetId};

use crate::action::{
    Action, ActionKind, BootstrapPayload, BurnPayload, CallArgs, FundPayload, MintPayload,
    SetGovernorPayload, SwapPayload,
};
use crate::config::PoolConfig;
use crate::errors::{PoolError, PoolResult};
use crate::types::{AssetTransfer, Group};

pub struct GroupValidator<'a> {
    config: &'a PoolConfig,
    app: Address,
    pool_asset: Option<AssetId>,
}

impl<'a> GroupValidator<'a> {
    pub fn new(config: &'a PoolConfig, app: Address, pool_asset: Option<AssetId>) -> Self {
        Self {
            config,
            app,
            pool_asset,
        }
    }

    pub fn validate(&self, group: &Group, args: &CallArgs) -> PoolResult<Action> {
        let kind = args.kind;

        // =====================================================================
        // Rule 1: Exact group size
        // =====================================================================
        if group.len() != kind.group_size() {
            return Err(PoolError::GroupSize {
                action: kind,
                expected: kind.group_size(),
                actual: group.len(),
            });
        }
        let caller = group.app_call()?.sender;

        // =====================================================================
        // Rule 2: Referenced assets match their slots
        // =====================================================================
        if args.assets.len() != kind.asset_refs() {
            return Err(PoolError::ReferenceCount {
                action: kind,
                expected: kind.asset_refs(),
                actual: args.assets.len(),
            });
        }
        if args.accounts.len() != kind.account_refs() {
            return Err(PoolError::AccountCount {
                action: kind,
                expected: kind.account_refs(),
                actual: args.accounts.len(),
            });
        }
        match kind {
            ActionKind::Boot | ActionKind::Swap => self.check_pair(&args.assets[..])?,
            ActionKind::Fund | ActionKind::Mint | ActionKind::Burn => {
                let pool = self.pool_asset.ok_or(PoolError::NotBootstrapped)?;
                expect_asset("pool", pool, args.assets[0])?;
                self.check_pair(&args.assets[1..])?;
            }
            ActionKind::Update => {}
        }

        // =====================================================================
        // Rules 3-5: Deposits
        // =====================================================================
        let action = match kind {
            ActionKind::Boot => Action::Bootstrap(BootstrapPayload {
                asset_a: self.config.asset_a,
                asset_b: self.config.asset_b,
            }),
            ActionKind::Update => Action::SetGovernor(SetGovernorPayload {
                new_governor: args.accounts[0],
            }),
            ActionKind::Fund => {
                let a = self.deposit(group, 1, &caller)?;
                let b = self.deposit(group, 2, &caller)?;
                expect_asset("asset_a", self.config.asset_a, a.asset)?;
                expect_asset("asset_b", self.config.asset_b, b.asset)?;
                Action::Fund(FundPayload {
                    a_amount: a.amount,
                    b_amount: b.amount,
                })
            }
            ActionKind::Mint => {
                let a = self.deposit(group, 1, &caller)?;
                let b = self.deposit(group, 2, &caller)?;
                expect_asset("asset_a", self.config.asset_a, a.asset)?;
                expect_asset("asset_b", self.config.asset_b, b.asset)?;
                Action::Mint(MintPayload {
                    a_amount: a.amount,
                    b_amount: b.amount,
                })
            }
            ActionKind::Burn => {
                let shares = self.deposit(group, 1, &caller)?;
                let pool = self.pool_asset.ok_or(PoolError::NotBootstrapped)?;
                expect_asset("pool", pool, shares.asset)?;
                Action::Burn(BurnPayload {
                    pool_amount: shares.amount,
                })
            }
            ActionKind::Swap => {
                let input = self.deposit(group, 1, &caller)?;
                let out_asset = if input.asset == self.config.asset_a {
                    self.config.asset_b
                } else if input.asset == self.config.asset_b {
                    self.config.asset_a
                } else {
                    return Err(PoolError::AssetMismatch {
                        slot: "swap input",
                        expected: self.config.asset_a,
                        actual: input.asset,
                    });
                };
                Action::Swap(SwapPayload {
                    in_asset: input.asset,
                    out_asset,
                    in_amount: input.amount,
                })
            }
        };

        Ok(action)
    }

    /// `[a, b]` references in pool order
    fn check_pair(&self, assets: &[AssetId]) -> PoolResult<()> {
        match assets {
            [a, b] => {
                expect_asset("asset_a", self.config.asset_a, *a)?;
                expect_asset("asset_b", self.config.asset_b, *b)
            }
            _ => Err(PoolError::Internal(format!(
                "expected two pair references, got {}",
                assets.len()
            ))),
        }
    }

    /// Sub-operation `index` as an inbound, positive deposit from `caller`
    fn deposit<'g>(
        &self,
        group: &'g Group,
        index: usize,
        caller: &Address,
    ) -> PoolResult<&'g AssetTransfer> {
        let transfer = group.transfer(index)?;
        if transfer.receiver != self.app {
            return Err(PoolError::ReceiverMismatch {
                index,
                receiver: transfer.receiver,
            });
        }
        if transfer.amount == 0 {
            return Err(PoolError::NonPositiveAmount { index });
        }
        if transfer.sender != *caller {
            return Err(PoolError::SenderMismatch {
                index,
                sender: transfer.sender,
            });
        }
        Ok(transfer)
    }
}

fn expect_asset(slot: &'static str, expected: AssetId, actual: AssetId) -> PoolResult<()> {
    if expected != actual {
        return Err(PoolError::AssetMismatch {
            slot,
            expected,
            actual,
        });
    }
    Ok(())
}
