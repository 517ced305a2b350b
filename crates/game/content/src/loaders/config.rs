//! Tactics configuration loader.

use std::path::Path;

use tactics_core::TacticsConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for tactics configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    ///
    /// Missing keys fall back to [`TacticsConfig::default`]. Values that would
    /// break grid math (non-positive cell size or costs, negative limits) are
    /// rejected.
    pub fn load(path: &Path) -> LoadResult<TacticsConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    /// Parse config data from a TOML string.
    pub fn parse(content: &str) -> LoadResult<TacticsConfig> {
        let config: TacticsConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;

        if config.cell_size.is_nan() || config.cell_size <= 0.0 {
            anyhow::bail!("cell_size must be positive, got {}", config.cell_size);
        }
        if config.climb_limit < 0.0 || config.drop_limit < 0.0 {
            anyhow::bail!(
                "slope limits must not be negative (climb {}, drop {})",
                config.climb_limit,
                config.drop_limit
            );
        }
        if config.cardinal_cost <= 0.0 || config.diagonal_cost <= 0.0 {
            anyhow::bail!("step costs must be positive");
        }

        Ok(config)
    }
}
