//! Combat configuration loader.

use std::path::Path;

use combat_core::CombatConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for combat tunables from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load a [`CombatConfig`] from a TOML file.
    ///
    /// Fields missing from the file keep their defaults.
    pub fn load(path: &Path) -> LoadResult<CombatConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<CombatConfig> {
        let config: CombatConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse combat config TOML: {}", e))?;

        if config.cards_per_draw > CombatConfig::MAX_HAND_SIZE {
            anyhow::bail!(
                "cards_per_draw {} exceeds the hand limit of {}",
                config.cards_per_draw,
                CombatConfig::MAX_HAND_SIZE
            );
        }
        if config.minor_speed_threshold > config.major_speed_threshold {
            anyhow::bail!(
                "minor_speed_threshold {} is above major_speed_threshold {}",
                config.minor_speed_threshold,
                config.major_speed_threshold
            );
        }
        if !(config.weight_tolerance.is_finite() && config.weight_tolerance >= 0.0) {
            anyhow::bail!("weight_tolerance must be a non-negative number");
        }

        Ok(config)
    }
}
