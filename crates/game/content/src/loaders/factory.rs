//! Content factory for building a catalog from data files.

use std::path::{Path, PathBuf};

use combat_core::env::validate_catalog;
use combat_core::{
    CardDefinition, Catalog, CatalogWarning, CombatConfig, EnemyDefinition, PlayerProfile,
};

use crate::loaders::{CardLoader, ConfigLoader, EnemyLoader, LoadResult, PlayerLoader};

/// Everything an encounter needs, validated.
#[derive(Debug, Clone)]
pub struct ContentBundle {
    pub config: CombatConfig,
    pub catalog: Catalog,
    /// Authoring issues that did not block loading.
    pub warnings: Vec<CatalogWarning>,
}

/// Content factory that loads all combat content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── combat.toml   (optional, defaults when absent)
/// ├── cards.ron
/// ├── enemies.ron
/// └── player.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub const CONFIG_FILE: &'static str = "combat.toml";
    pub const CARDS_FILE: &'static str = "cards.ron";
    pub const ENEMIES_FILE: &'static str = "enemies.ron";
    pub const PLAYER_FILE: &'static str = "player.ron";

    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Data shipped with this crate.
    pub fn bundled() -> Self {
        Self::new(Path::new(env!("CARGO_MANIFEST_DIR")).join("data"))
    }

    /// Load combat tunables from `combat.toml`, or defaults when absent.
    pub fn load_config(&self) -> LoadResult<CombatConfig> {
        let path = self.data_dir.join(Self::CONFIG_FILE);
        if !path.exists() {
            tracing::info!(path = %path.display(), "no combat config found; using defaults");
            return Ok(CombatConfig::default());
        }
        ConfigLoader::load(&path)
    }

    pub fn load_cards(&self) -> LoadResult<Vec<CardDefinition>> {
        CardLoader::load(&self.data_dir.join(Self::CARDS_FILE))
    }

    pub fn load_enemies(&self) -> LoadResult<Vec<EnemyDefinition>> {
        EnemyLoader::load(&self.data_dir.join(Self::ENEMIES_FILE))
    }

    pub fn load_player(&self) -> LoadResult<PlayerProfile> {
        PlayerLoader::load(&self.data_dir.join(Self::PLAYER_FILE))
    }

    /// Load every file and validate the result as a whole.
    ///
    /// Structural errors fail the load; authoring warnings are returned in
    /// the bundle.
    pub fn load_bundle(&self) -> LoadResult<ContentBundle> {
        let config = self.load_config()?;
        let catalog = Catalog::new(self.load_cards()?, self.load_enemies()?, self.load_player()?);

        let warnings = validate_catalog(&catalog, &config).map_err(|e| {
            anyhow::anyhow!(
                "Invalid content in {}: {}",
                self.data_dir.display(),
                e
            )
        })?;

        tracing::info!(
            cards = catalog.cards().count(),
            enemies = catalog.enemies().count(),
            warnings = warnings.len(),
            "content loaded"
        );

        Ok(ContentBundle {
            config,
            catalog,
            warnings,
        })
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat_core::{CatalogOracle, StatusKind};
    use tempfile::TempDir;

    const CARDS: &str = r#"(
        cards: [
            (id: "strike", cost: 1, action: (name: "Strike", category: Offense, base_power: Some(6))),
            (id: "guard", cost: 1, action: (name: "Guard", category: Defense, guard: Some(5))),
        ],
    )"#;

    const ENEMIES: &str = r#"(
        enemies: [
            (
                id: "slime",
                name: "Slime",
                max_health: 30,
                speed: 80,
                patterns: [
                    Scripted(phase: 1, action: (name: "Ooze", category: Special, target_effects: [
                        (kind: Poison, duration: Turns(2)),
                    ])),
                    Pooled(weight: Some(0.7), action: (name: "Bite", category: Offense, base_power: Some(4))),
                    Pooled(weight: Some(0.7), action: (name: "Harden", category: Defense, guard: Some(3))),
                ],
            ),
        ],
    )"#;

    const PLAYER: &str = r#"(
        name: "Warden",
        max_health: 60,
        speed: 100,
        equipment: [(name: "Mail", secondary_armor: 6)],
        deck: ["strike", "strike", "guard"],
    )"#;

    fn write_content(dir: &Path, cards: &str, enemies: &str, player: &str) {
        std::fs::write(dir.join(ContentFactory::CARDS_FILE), cards).unwrap();
        std::fs::write(dir.join(ContentFactory::ENEMIES_FILE), enemies).unwrap();
        std::fs::write(dir.join(ContentFactory::PLAYER_FILE), player).unwrap();
    }

    #[test]
    fn test_factory_paths() {
        let factory = ContentFactory::new("/tmp/data");
        assert_eq!(factory.data_dir(), Path::new("/tmp/data"));
    }

    #[test]
    fn loads_and_validates_a_directory() {
        let dir = TempDir::new().unwrap();
        write_content(dir.path(), CARDS, ENEMIES, PLAYER);
        std::fs::write(dir.path().join(ContentFactory::CONFIG_FILE), "energy_per_turn = 4\n")
            .unwrap();

        let bundle = ContentFactory::new(dir.path()).load_bundle().unwrap();

        assert_eq!(bundle.config.energy_per_turn, 4);
        assert_eq!(bundle.catalog.player_deck().unwrap().len(), 3);
        assert_eq!(bundle.catalog.player().to_combatant().secondary_armor, 6);

        let slime = bundle.catalog.enemy("slime").unwrap();
        let ooze = slime.patterns[0].action();
        assert_eq!(ooze.target_effects[0].kind, StatusKind::Poison);
        assert_eq!(ooze.target_effects[0].stacks, 1);

        // 0.7 + 0.7 deviates from 1.0
        assert_eq!(bundle.warnings.len(), 1);
    }

    #[test]
    fn missing_config_falls_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        write_content(dir.path(), CARDS, ENEMIES, PLAYER);

        let bundle = ContentFactory::new(dir.path()).load_bundle().unwrap();
        assert_eq!(bundle.config, CombatConfig::default());
    }

    #[test]
    fn unknown_status_kind_fails_to_parse() {
        let dir = TempDir::new().unwrap();
        let cards = r#"(cards: [(id: "hex", cost: 1, action: (name: "Hex", category: Special,
            target_effects: [(kind: Doom, duration: Turns(2))]))])"#;
        write_content(dir.path(), cards, ENEMIES, PLAYER);

        let err = ContentFactory::new(dir.path()).load_bundle().unwrap_err();
        assert!(err.to_string().contains("card catalog"));
    }

    #[test]
    fn structural_errors_fail_the_load() {
        let dir = TempDir::new().unwrap();
        let cards = r#"(cards: [(id: "strike", cost: 1, action: (name: "Strike", category: Offense))])"#;
        write_content(dir.path(), cards, ENEMIES, PLAYER);

        let err = ContentFactory::new(dir.path()).load_bundle().unwrap_err();
        assert!(err.to_string().contains("needs a base power"));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let dir = TempDir::new().unwrap();
        let cards = r#"(cards: [
            (id: "strike", cost: 1, action: (name: "Strike", category: Offense, base_power: Some(6))),
            (id: "strike", cost: 2, action: (name: "Heavy", category: Offense, base_power: Some(9))),
        ])"#;
        write_content(dir.path(), cards, ENEMIES, PLAYER);

        assert!(ContentFactory::new(dir.path()).load_cards().is_err());
    }

    #[test]
    fn bundled_content_is_valid() {
        let bundle = ContentFactory::bundled().load_bundle().unwrap();
        assert!(!bundle.catalog.enemy_ids().is_empty());
        assert!(bundle.catalog.player_deck().is_ok());
        assert_eq!(bundle.config.minor_speed_threshold, 30);
        assert_eq!(bundle.config.major_speed_threshold, 50);
    }
}
