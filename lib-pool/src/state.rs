//! Application-Scoped Pool State
//!
//! The pool's durable record: governor, pool asset and the seeded flag.
//! Reserves are never stored here; they are read from the ledger.

use lib_types::{Address, AssetId};
use serde::{Deserialize, Serialize};

use crate::errors::{PoolError, PoolResult};

/// Key of the governor address
pub const GOVERNOR_KEY: &str = "gov";

/// Key of the pool asset id
pub const POOL_ASSET_KEY: &str = "p";

/// Key of the first-funding flag
pub const SEEDED_KEY: &str = "seeded";

/// A value as seen through the key/value view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateValue {
    Bytes([u8; 32]),
    Uint(u64),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolState {
    governor: Option<Address>,
    pool_asset: Option<AssetId>,
    liquidity_seeded: bool,
    destroyed: bool,
}

impl PoolState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Explicitly stored governor, if any
    pub fn governor(&self) -> Option<Address> {
        self.governor
    }

    pub fn pool_asset(&self) -> Option<AssetId> {
        self.pool_asset
    }

    pub fn liquidity_seeded(&self) -> bool {
        self.liquidity_seeded
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub fn set_governor(&mut self, governor: Address) {
        self.governor = Some(governor);
    }

    /// Record the pool asset; a second write is rejected
    pub fn set_pool_asset(&mut self, asset: AssetId) -> PoolResult<()> {
        if let Some(existing) = self.pool_asset {
            return Err(PoolError::AlreadyBootstrapped(existing));
        }
        self.pool_asset = Some(asset);
        Ok(())
    }

    /// Record that liquidity was seeded; reseeding a drained pool keeps the flag
    pub fn mark_seeded(&mut self) {
        self.liquidity_seeded = true;
    }

    /// Drop every stored field and refuse further use
    pub fn destroy(&mut self) {
        *self = Self {
            destroyed: true,
            ..Self::default()
        };
    }

    /// Key/value view of the record
    pub fn get(&self, key: &str) -> Option<StateValue> {
        match key {
            GOVERNOR_KEY => self.governor.map(|gov| StateValue::Bytes(gov.0)),
            POOL_ASSET_KEY => self.pool_asset.map(|asset| StateValue::Uint(asset.get())),
            SEEDED_KEY => self.liquidity_seeded.then_some(StateValue::Uint(1)),
            _ => None,
        }
    }

    pub fn to_bytes(&self) -> PoolResult<Vec<u8>> {
        bincode::serialize(self).map_err(|e| PoolError::StateEncoding(e.to_string()))
    }

    pub fn from_bytes(bytes: &[u8]) -> PoolResult<Self> {
        bincode::deserialize(bytes).map_err(|e| PoolError::StateEncoding(e.to_string()))
    }
}
