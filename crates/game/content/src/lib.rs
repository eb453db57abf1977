//! Data-driven combat content and loaders.
//!
//! This crate houses the static combat catalogs and provides loaders for
//! RON/TOML data files:
//! - Card definitions (RON)
//! - Enemy definitions with scripted and pooled patterns (RON)
//! - The player profile and equipment (RON)
//! - Combat tunables (TOML)
//!
//! Content is consumed by the engine through [`combat_core::CatalogOracle`]
//! and never appears in encounter state. Every bundle is validated before
//! it is handed out.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    CardLoader, ConfigLoader, ContentBundle, ContentFactory, EnemyLoader, LoadResult,
    PlayerLoader,
};
