//! Simulation configuration loading.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use marketsim_catalog::CatalogConfig;
use marketsim_core::DomainError;
use marketsim_sales::GeneratorConfig;

/// Environment variable that overrides the configured seed.
pub const SEED_ENV: &str = "MARKETSIM_SEED";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot parse config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{SEED_ENV} is not an unsigned integer: {0:?}")]
    InvalidSeed(String),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Everything one simulation run needs.
///
/// A partial JSON file only overrides the fields it names:
///
/// ```json
/// { "seed": 7, "orders": { "order_volume": 200 } }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// `None` draws a fresh seed per run.
    pub seed: Option<u64>,
    pub catalog: CatalogConfig,
    pub orders: GeneratorConfig,
}

impl SimulationConfig {
    /// Read `path` (defaults when `None`), then apply `MARKETSIM_SEED`.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        let config = config.with_seed_override(std::env::var(SEED_ENV).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply a raw seed override, as read from the environment.
    pub fn with_seed_override(mut self, raw: Option<String>) -> Result<Self, ConfigError> {
        let Some(raw) = raw else {
            return Ok(self);
        };
        let seed = raw
            .trim()
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidSeed(raw.clone()))?;
        if let Some(previous) = self.seed {
            tracing::info!(previous, seed, "seed overridden from environment");
        }
        self.seed = Some(seed);
        Ok(self)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.catalog.validate()?;
        self.orders.validate()?;
        Ok(())
    }
}
