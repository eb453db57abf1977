//! Card catalog loader.

use std::path::Path;

use combat_core::CardDefinition;
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Card catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardCatalog {
    pub cards: Vec<CardDefinition>,
}

/// Loader for card catalog from RON files.
pub struct CardLoader;

impl CardLoader {
    /// Load card catalog from a RON file.
    ///
    /// Unknown status kinds or categories fail here, before any validation.
    pub fn load(path: &Path) -> LoadResult<Vec<CardDefinition>> {
        let content = read_file(path)?;
        let catalog: CardCatalog = ron::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse card catalog RON: {}", e))?;

        let mut seen = std::collections::BTreeSet::new();
        for card in &catalog.cards {
            if !seen.insert(card.id.as_str()) {
                anyhow::bail!("Duplicate card id '{}' in {}", card.id, path.display());
            }
        }

        Ok(catalog.cards)
    }
}
