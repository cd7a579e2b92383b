//! Deployment configuration for a pool.
//!
//! Everything here is fixed when the pool application is deployed and never
//! changes afterwards.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use lib_pricing::FeeSchedule;
use lib_types::{Address, Amount, AssetId};
use serde::{Deserialize, Serialize};

use crate::errors::{PoolError, PoolResult};
use crate::types::AssetParams;

/// 10^10 base units
pub const DEFAULT_TOTAL_SUPPLY: Amount = 10_000_000_000;
pub const DEFAULT_DECIMALS: u32 = 3;
pub const DEFAULT_UNIT_NAME: &str = "dpt";
pub const DEFAULT_NAME_PREFIX: &str = "DPT";

/// Parameters of the liquidity-share asset created at bootstrap
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolTokenParams {
    pub total_supply: Amount,
    pub decimals: u32,
    pub unit_name: String,
    pub name_prefix: String,
}

impl Default for PoolTokenParams {
    fn default() -> Self {
        Self {
            total_supply: DEFAULT_TOTAL_SUPPLY,
            decimals: DEFAULT_DECIMALS,
            unit_name: DEFAULT_UNIT_NAME.to_string(),
            name_prefix: DEFAULT_NAME_PREFIX.to_string(),
        }
    }
}

impl PoolTokenParams {
    /// `{prefix}-{unit_a}-{unit_b}`
    pub fn asset_name(&self, unit_a: &str, unit_b: &str) -> String {
        format!("{}-{}-{}", self.name_prefix, unit_a, unit_b)
    }

    /// Creation parameters with the application account as manager and reserve
    pub fn asset_params(&self, app: Address, unit_a: &str, unit_b: &str) -> AssetParams {
        AssetParams {
            name: self.asset_name(unit_a, unit_b),
            unit_name: self.unit_name.clone(),
            total: self.total_supply,
            decimals: self.decimals,
            manager: app,
            reserve: app,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolConfig {
    pub asset_a: AssetId,
    pub asset_b: AssetId,
    #[serde(default)]
    pub fees: FeeSchedule,
    #[serde(default)]
    pub pool_token: PoolTokenParams,
}

impl PoolConfig {
    /// Config with default fees and pool-token parameters
    pub fn new(asset_a: AssetId, asset_b: AssetId) -> PoolResult<Self> {
        let config = Self {
            asset_a,
            asset_b,
            fees: FeeSchedule::default(),
            pool_token: PoolTokenParams::default(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> PoolResult<()> {
        if self.asset_a >= self.asset_b {
            return Err(PoolError::InvalidConfig(format!(
                "asset_a ({}) must be below asset_b ({})",
                self.asset_a, self.asset_b
            )));
        }
        self.fees
            .validate()
            .map_err(|e| PoolError::InvalidConfig(e.to_string()))?;
        if self.pool_token.total_supply == 0 {
            return Err(PoolError::InvalidConfig(
                "pool token total_supply must be non-zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw).context("Failed to parse pool config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read pool config {}", path.display()))?;
        Self::from_toml_str(&raw).with_context(|| format!("Invalid pool config {}", path.display()))
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).context("Failed to serialize pool config")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = PoolConfig::new(AssetId::new(10), AssetId::new(20)).unwrap();
        assert_eq!(
            config.fees,
            FeeSchedule {
                fee_bps: 5,
                scale: 1_000,
            }
        );
        assert_eq!(config.pool_token.total_supply, 10_000_000_000);
        assert_eq!(config.pool_token.decimals, 3);
        assert_eq!(config.pool_token.unit_name, "dpt");
        assert_eq!(config.pool_token.asset_name("ALGO", "USDC"), "DPT-ALGO-USDC");
    }

    #[test]
    fn test_rejects_unordered_assets() {
        assert!(matches!(
            PoolConfig::new(AssetId::new(20), AssetId::new(10)),
            Err(PoolError::InvalidConfig(_))
        ));
        assert!(PoolConfig::new(AssetId::new(10), AssetId::new(10)).is_err());
    }

    #[test]
    fn test_rejects_bad_fees_and_supply() {
        let mut config = PoolConfig::new(AssetId::new(1), AssetId::new(2)).unwrap();
        config.fees = FeeSchedule {
            fee_bps: 1_000,
            scale: 1_000,
        };
        assert!(config.validate().is_err());

        let mut config = PoolConfig::new(AssetId::new(1), AssetId::new(2)).unwrap();
        config.pool_token.total_supply = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_minimal() {
        let config = PoolConfig::from_toml_str("asset_a = 5\nasset_b = 9\n").unwrap();
        assert_eq!(config.asset_a, AssetId::new(5));
        assert_eq!(config.asset_b, AssetId::new(9));
        assert_eq!(config.fees, FeeSchedule::default());
        assert_eq!(config.pool_token, PoolTokenParams::default());
    }

    #[test]
    fn test_toml_overrides() {
        let raw = r#"
            asset_a = 5
            asset_b = 9

            [fees]
            fee_bps = 3
            scale = 1000

            [pool_token]
            unit_name = "lp"
        "#;
        let config = PoolConfig::from_toml_str(raw).unwrap();
        assert_eq!(config.fees.fee_bps, 3);
        assert_eq!(config.pool_token.unit_name, "lp");
        assert_eq!(config.pool_token.decimals, 3);
    }

    #[test]
    fn test_toml_rejects_invalid() {
        assert!(PoolConfig::from_toml_str("asset_a = 9\nasset_b = 5\n").is_err());
        assert!(PoolConfig::from_toml_str("asset_a = \"x\"").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let config = PoolConfig::new(AssetId::new(3), AssetId::new(4)).unwrap();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(config.to_toml_string().unwrap().as_bytes()).unwrap();

        let loaded = PoolConfig::load(file.path()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = PoolConfig::load(&dir.path().join("absent.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read pool config"));
    }
}
