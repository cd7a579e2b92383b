//! Action Dispatch
//!
//! The action token in a call's arguments is resolved exactly once, at the
//! boundary, into [`ActionKind`]. Everything downstream matches on the enum.
//!
//! # Wire Format
//!
//! ```text
//! uvarint(len) token bytes
//! uvarint(n)   n x uvarint asset id
//! uvarint(m)   m x 32-byte account address
//! ```

use std::fmt;

use lib_types::{encode_uvarint, Address, Amount, AssetId, ByteReader};
use serde::{Deserialize, Serialize};

use crate::errors::{PoolError, PoolResult};

/// Longest accepted action token
pub const MAX_TOKEN_LEN: usize = 16;

/// Most references of either kind a call may carry
pub const MAX_REFERENCES: usize = 8;

// ============================================================================
// ACTION KIND
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    Boot,
    Fund,
    Mint,
    Burn,
    Swap,
    /// Governor reassignment
    Update,
}

impl ActionKind {
    pub const ALL: [ActionKind; 6] = [
        ActionKind::Boot,
        ActionKind::Fund,
        ActionKind::Mint,
        ActionKind::Burn,
        ActionKind::Swap,
        ActionKind::Update,
    ];

    pub fn token(&self) -> &'static str {
        match self {
            ActionKind::Boot => "boot",
            ActionKind::Fund => "fund",
            ActionKind::Mint => "mint",
            ActionKind::Burn => "burn",
            ActionKind::Swap => "swap",
            ActionKind::Update => "update",
        }
    }

    pub fn from_token(token: &[u8]) -> PoolResult<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.token().as_bytes() == token)
            .ok_or_else(|| PoolError::UnknownAction(String::from_utf8_lossy(token).into_owned()))
    }

    /// Exact number of sub-operations in the group, app call included
    pub fn group_size(&self) -> usize {
        match self {
            ActionKind::Boot | ActionKind::Update => 1,
            ActionKind::Burn | ActionKind::Swap => 2,
            ActionKind::Fund | ActionKind::Mint => 3,
        }
    }

    /// Exact number of asset references
    pub fn asset_refs(&self) -> usize {
        match self {
            ActionKind::Boot | ActionKind::Swap => 2,
            ActionKind::Fund | ActionKind::Mint | ActionKind::Burn => 3,
            ActionKind::Update => 0,
        }
    }

    /// Exact number of account references
    pub fn account_refs(&self) -> usize {
        match self {
            ActionKind::Update => 1,
            _ => 0,
        }
    }

    /// Governor-only actions
    pub fn is_admin(&self) -> bool {
        matches!(self, ActionKind::Boot | ActionKind::Update)
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

// ============================================================================
// CALL ARGUMENTS
// ============================================================================

/// Decoded arguments of a method call
///
/// Reference layouts:
/// - `boot`, `swap`: assets `[a, b]`
/// - `fund`, `mint`, `burn`: assets `[pool, a, b]`
/// - `update`: accounts `[new_governor]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallArgs {
    pub kind: ActionKind,
    pub assets: Vec<AssetId>,
    pub accounts: Vec<Address>,
}

impl CallArgs {
    pub fn bootstrap(asset_a: AssetId, asset_b: AssetId) -> Self {
        Self::with_assets(ActionKind::Boot, vec![asset_a, asset_b])
    }

    pub fn fund(pool: AssetId, asset_a: AssetId, asset_b: AssetId) -> Self {
        Self::with_assets(ActionKind::Fund, vec![pool, asset_a, asset_b])
    }

    pub fn mint(pool: AssetId, asset_a: AssetId, asset_b: AssetId) -> Self {
        Self::with_assets(ActionKind::Mint, vec![pool, asset_a, asset_b])
    }

    pub fn burn(pool: AssetId, asset_a: AssetId, asset_b: AssetId) -> Self {
        Self::with_assets(ActionKind::Burn, vec![pool, asset_a, asset_b])
    }

    pub fn swap(asset_a: AssetId, asset_b: AssetId) -> Self {
        Self::with_assets(ActionKind::Swap, vec![asset_a, asset_b])
    }

    pub fn set_governor(new_governor: Address) -> Self {
        Self {
            kind: ActionKind::Update,
            assets: Vec::new(),
            accounts: vec![new_governor],
        }
    }

    fn with_assets(kind: ActionKind, assets: Vec<AssetId>) -> Self {
        Self {
            kind,
            assets,
            accounts: Vec::new(),
        }
    }

    pub fn encode(&self) -> Vec<u8> {
        let token = self.kind.token().as_bytes();
        let capacity = 1 + token.len() + 2 + self.assets.len() * 4 + self.accounts.len() * 32;
        let mut out = Vec::with_capacity(capacity);

        encode_uvarint(token.len() as u64, &mut out);
        out.extend_from_slice(token);

        encode_uvarint(self.assets.len() as u64, &mut out);
        for asset in &self.assets {
            encode_uvarint(asset.get(), &mut out);
        }

        encode_uvarint(self.accounts.len() as u64, &mut out);
        for account in &self.accounts {
            out.extend_from_slice(account.as_bytes());
        }
        out
    }

    /// Decode a payload; reference counts are checked by the validator
    pub fn decode(bytes: &[u8]) -> PoolResult<Self> {
        let mut reader = ByteReader::new(bytes);

        let token_len = reader.length(MAX_TOKEN_LEN)?;
        let kind = ActionKind::from_token(reader.take(token_len)?)?;

        let asset_count = reader.length(MAX_REFERENCES)?;
        let assets = (0..asset_count)
            .map(|_| reader.uvarint().map(AssetId::new))
            .collect::<Result<Vec<_>, _>>()?;

        let account_count = reader.length(MAX_REFERENCES)?;
        let accounts = (0..account_count)
            .map(|_| reader.take_array::<32>().map(Address::new))
            .collect::<Result<Vec<_>, _>>()?;

        reader.finish()?;

        Ok(Self {
            kind,
            assets,
            accounts,
        })
    }
}

// ============================================================================
// VALIDATED ACTIONS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BootstrapPayload {
    pub asset_a: AssetId,
    pub asset_b: AssetId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FundPayload {
    pub a_amount: Amount,
    pub b_amount: Amount,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MintPayload {
    pub a_amount: Amount,
    pub b_amount: Amount,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BurnPayload {
    pub pool_amount: Amount,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapPayload {
    pub in_asset: AssetId,
    pub out_asset: AssetId,
    pub in_amount: Amount,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetGovernorPayload {
    pub new_governor: Address,
}

/// A fully validated action, ready for pricing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Bootstrap(BootstrapPayload),
    Fund(FundPayload),
    Mint(MintPayload),
    Burn(BurnPayload),
    Swap(SwapPayload),
    SetGovernor(SetGovernorPayload),
}

impl Action {
    pub fn kind(&self) -> ActionKind {
        match self {
            Action::Bootstrap(_) => ActionKind::Boot,
            Action::Fund(_) => ActionKind::Fund,
            Action::Mint(_) => ActionKind::Mint,
            Action::Burn(_) => ActionKind::Burn,
            Action::Swap(_) => ActionKind::Swap,
            Action::SetGovernor(_) => ActionKind::Update,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lib_types::CodecError;

    #[test]
    fn test_token_resolution() {
        for kind in ActionKind::ALL {
            assert_eq!(ActionKind::from_token(kind.token().as_bytes()).unwrap(), kind);
        }
        assert_eq!(
            ActionKind::from_token(b"drain"),
            Err(PoolError::UnknownAction("drain".to_string()))
        );
        // Tokens are case sensitive
        assert!(ActionKind::from_token(b"SWAP").is_err());
    }

    #[test]
    fn test_group_sizes() {
        assert_eq!(ActionKind::Boot.group_size(), 1);
        assert_eq!(ActionKind::Update.group_size(), 1);
        assert_eq!(ActionKind::Burn.group_size(), 2);
        assert_eq!(ActionKind::Swap.group_size(), 2);
        assert_eq!(ActionKind::Mint.group_size(), 3);
        assert_eq!(ActionKind::Fund.group_size(), 3);
    }

    #[test]
    fn test_encoding_layout() {
        let bytes = CallArgs::swap(AssetId::new(1), AssetId::new(300)).encode();
        assert_eq!(bytes, vec![4, b's', b'w', b'a', b'p', 2, 1, 0xac, 0x02, 0]);
    }

    #[test]
    fn test_set_governor_carries_account() {
        let governor = Address::new([7u8; 32]);
        let bytes = CallArgs::set_governor(governor).encode();
        assert_eq!(bytes.len(), 1 + 6 + 1 + 1 + 32);

        let decoded = CallArgs::decode(&bytes).unwrap();
        assert_eq!(decoded.kind, ActionKind::Update);
        assert_eq!(decoded.accounts, vec![governor]);
    }

    #[test]
    fn test_decode_keeps_reference_lists() {
        let args = CallArgs {
            kind: ActionKind::Mint,
            assets: vec![AssetId::new(1), AssetId::new(2)],
            accounts: vec![Address::new([3u8; 32])],
        };
        assert_eq!(CallArgs::decode(&args.encode()).unwrap(), args);
    }

    #[test]
    fn test_decode_rejects_malformed_payloads() {
        assert_eq!(
            CallArgs::decode(&[]),
            Err(PoolError::Codec(CodecError::Truncated { needed: 1 }))
        );

        let mut bytes = CallArgs::bootstrap(AssetId::new(1), AssetId::new(2)).encode();
        bytes.push(0);
        assert_eq!(
            CallArgs::decode(&bytes),
            Err(PoolError::Codec(CodecError::TrailingBytes(1)))
        );

        // Token length beyond the cap
        assert!(matches!(
            CallArgs::decode(&[200, 1]),
            Err(PoolError::Codec(CodecError::LengthLimit { len: 200, .. }))
        ));
    }
}
