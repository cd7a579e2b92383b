//! Canonical Primitive Types for the Pool Ledger
//!
//! These types are the foundational building blocks for every request,
//! instruction and state record handled by the pool:
//! - Fixed-size (no dynamic allocation)
//! - Deterministically serializable
//! - Cheap to copy and compare

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// TYPE ALIASES
// ============================================================================

/// Asset amounts, in base units of the asset
pub type Amount = u64;

/// Application identifier assigned by the ledger at deployment
pub type AppId = u64;

/// Domain separator for application account derivation
pub const APP_ADDRESS_DOMAIN: &[u8] = b"POOL_APP_ACCOUNT_V1";

// ============================================================================
// IDENTITY TYPES
// ============================================================================

/// 32-byte account address
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize, Default)]
pub struct Address(pub [u8; 32]);

impl Address {
    /// Create a new Address from raw bytes
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Create a zeroed Address
    pub const fn zero() -> Self {
        Self([0u8; 32])
    }

    /// Get the underlying bytes
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Check if this is the zero address
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }

    /// Address of the account controlled by an application
    ///
    /// Address = Blake3(APP_ADDRESS_DOMAIN || app_id as big-endian u64)
    pub fn for_application(app_id: AppId) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(APP_ADDRESS_DOMAIN);
        hasher.update(&app_id.to_be_bytes());
        Self(*hasher.finalize().as_bytes())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", hex::encode(&self.0[..8]))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl From<[u8; 32]> for Address {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

// ============================================================================
// ASSET TYPES
// ============================================================================

/// Ledger-assigned asset identifier
///
/// Identifiers are totally ordered; a pool's two reserve assets are stored
/// in ascending order.
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize, Default)]
pub struct AssetId(pub u64);

impl AssetId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub const fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Debug for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AssetId({})", self.0)
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for AssetId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

// ============================================================================
// TESTS
// ============================================================================
