//! Request and Response Types
//!
//! A request is a [`Group`]: an ordered batch of sub-operations the ledger
//! commits or aborts as one. Sub-operation 0 is always the call into the
//! pool application; the rest are asset transfers into its account.

use lib_types::{Address, Amount, AppId, AssetId};
use serde::{Deserialize, Serialize};

use crate::action::ActionKind;
use crate::errors::{PoolError, PoolResult};

// ============================================================================
// SUB-OPERATIONS
// ============================================================================

/// What the application call asks of the application itself
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum OnCompletion {
    /// Plain method call carrying action arguments
    #[default]
    NoOp,
    OptIn,
    CloseOut,
    ClearState,
    UpdateApplication,
    DeleteApplication,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppCall {
    pub sender: Address,
    pub app_id: AppId,
    pub on_completion: OnCompletion,
    /// Encoded [`crate::action::CallArgs`]; empty for bare completions
    pub args: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetTransfer {
    pub sender: Address,
    pub receiver: Address,
    pub asset: AssetId,
    pub amount: Amount,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubOperationKind {
    AppCall,
    AssetTransfer,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubOperation {
    AppCall(AppCall),
    AssetTransfer(AssetTransfer),
}

impl SubOperation {
    /// Method call with encoded arguments
    pub fn app_call(sender: Address, app_id: AppId, args: Vec<u8>) -> Self {
        SubOperation::AppCall(AppCall {
            sender,
            app_id,
            on_completion: OnCompletion::NoOp,
            args,
        })
    }

    /// Bare lifecycle call with no arguments
    pub fn completion(sender: Address, app_id: AppId, on_completion: OnCompletion) -> Self {
        SubOperation::AppCall(AppCall {
            sender,
            app_id,
            on_completion,
            args: Vec::new(),
        })
    }

    pub fn transfer(sender: Address, receiver: Address, asset: AssetId, amount: Amount) -> Self {
        SubOperation::AssetTransfer(AssetTransfer {
            sender,
            receiver,
            asset,
            amount,
        })
    }
}

// ============================================================================
// GROUP
// ============================================================================

/// Atomic batch of sub-operations
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Group {
    ops: Vec<SubOperation>,
}

impl Group {
    pub fn new(ops: Vec<SubOperation>) -> Self {
        Self { ops }
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&SubOperation> {
        self.ops.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SubOperation> {
        self.ops.iter()
    }

    /// Sub-operation 0, which must be the application call
    pub fn app_call(&self) -> PoolResult<&AppCall> {
        match self.ops.first() {
            Some(SubOperation::AppCall(call)) => Ok(call),
            _ => Err(PoolError::WrongKind {
                index: 0,
                expected: SubOperationKind::AppCall,
            }),
        }
    }

    /// Sub-operation `index`, which must be an asset transfer
    pub fn transfer(&self, index: usize) -> PoolResult<&AssetTransfer> {
        match self.ops.get(index) {
            Some(SubOperation::AssetTransfer(transfer)) => Ok(transfer),
            _ => Err(PoolError::WrongKind {
                index,
                expected: SubOperationKind::AssetTransfer,
            }),
        }
    }

    /// Every asset transfer in the group, in order
    pub fn transfers(&self) -> impl Iterator<Item = &AssetTransfer> {
        self.ops.iter().filter_map(|op| match op {
            SubOperation::AssetTransfer(transfer) => Some(transfer),
            SubOperation::AppCall(_) => None,
        })
    }
}

impl From<Vec<SubOperation>> for Group {
    fn from(ops: Vec<SubOperation>) -> Self {
        Self::new(ops)
    }
}

// ============================================================================
// LEDGER VIEW AND INSTRUCTIONS
// ============================================================================

/// Account holding of one asset as reported by the ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Holding {
    pub opted_in: bool,
    pub amount: Amount,
}

/// Parameters of an asset created by the pool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetParams {
    pub name: String,
    pub unit_name: String,
    pub total: Amount,
    pub decimals: u32,
    pub manager: Address,
    pub reserve: Address,
}

/// Outgoing instruction issued from the application account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Instruction {
    /// Debit the application account, credit `receiver`
    Transfer {
        receiver: Address,
        asset: AssetId,
        amount: Amount,
    },
    CreateAsset(AssetParams),
}

/// Outcome of one accepted group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    /// `None` for bare lifecycle calls
    pub action: Option<ActionKind>,
    pub instructions: Vec<Instruction>,
    /// New pool asset id on bootstrap
    pub return_value: Option<AssetId>,
}

impl Receipt {
    pub fn empty() -> Self {
        Self {
            action: None,
            instructions: Vec::new(),
            return_value: None,
        }
    }

    /// Amounts sent to `receiver`, in issue order
    pub fn payouts_to(&self, receiver: &Address) -> Vec<(AssetId, Amount)> {
        self.instructions
            .iter()
            .filter_map(|instruction| match instruction {
                Instruction::Transfer {
                    receiver: to,
                    asset,
                    amount,
                } if to == receiver => Some((*asset, *amount)),
                _ => None,
            })
            .collect()
    }
}
