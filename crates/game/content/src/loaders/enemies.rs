//! Enemy catalog loader.

use std::path::Path;

use combat_core::EnemyDefinition;
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Enemy catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyCatalog {
    pub enemies: Vec<EnemyDefinition>,
}

/// Loader for enemy catalog from RON files.
pub struct EnemyLoader;

impl EnemyLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<EnemyDefinition>> {
        let content = read_file(path)?;
        let catalog: EnemyCatalog = ron::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse enemy catalog RON: {}", e))?;

        let mut seen = std::collections::BTreeSet::new();
        for enemy in &catalog.enemies {
            if !seen.insert(enemy.id.as_str()) {
                anyhow::bail!("Duplicate enemy id '{}' in {}", enemy.id, path.display());
            }
        }

        Ok(catalog.enemies)
    }
}
