//! Content loaders for reading combat data from files.
//!
//! This module converts RON/TOML files into combat-core definitions and
//! assembles them into a validated [`combat_core::Catalog`].

pub mod cards;
pub mod config;
pub mod enemies;
pub mod factory;
pub mod player;

pub use cards::CardLoader;
pub use config::ConfigLoader;
pub use enemies::EnemyLoader;
pub use factory::{ContentBundle, ContentFactory};
pub use player::PlayerLoader;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
