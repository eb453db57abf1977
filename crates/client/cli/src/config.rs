//! CLI configuration structures and loaders.
use std::env;
use std::path::PathBuf;

/// Configuration required to run one encounter from the command line.
#[derive(Clone, Debug)]
pub struct CliConfig {
    /// Directory holding `cards.ron`, `enemies.ron`, `player.ron` and
    /// optionally `combat.toml`. Bundled content when unset.
    pub content_dir: Option<PathBuf>,
    /// Enemy id; the first catalog enemy when unset.
    pub enemy: Option<String>,
    pub seed: u64,
    pub max_rounds: u32,
    /// JSON-lines event journal.
    pub journal: Option<PathBuf>,
    /// Print the summary as JSON instead of text.
    pub json: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            content_dir: None,
            enemy: None,
            seed: 0,
            max_rounds: 100,
            journal: None,
            json: false,
        }
    }
}

impl CliConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `COMBAT_CONTENT_DIR` - Content directory (default: bundled data)
    /// - `COMBAT_ENEMY` - Enemy id to fight (default: first in catalog)
    /// - `COMBAT_SEED` - Encounter seed (default: 0)
    /// - `COMBAT_MAX_ROUNDS` - Rounds before giving up (default: 100)
    /// - `COMBAT_JOURNAL` - Path of a JSON-lines event journal (default: none)
    /// - `COMBAT_JSON` - Print the summary as JSON (default: false)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        config.content_dir = env::var("COMBAT_CONTENT_DIR").ok().map(PathBuf::from);
        config.enemy = env::var("COMBAT_ENEMY").ok().filter(|id| !id.is_empty());

        if let Some(seed) = read_env::<u64>("COMBAT_SEED") {
            config.seed = seed;
        }
        if let Some(rounds) = read_env::<u32>("COMBAT_MAX_ROUNDS") {
            config.max_rounds = rounds.max(1);
        }

        config.journal = env::var("COMBAT_JOURNAL").ok().map(PathBuf::from);

        if let Some(json) = read_env::<bool>("COMBAT_JSON") {
            config.json = json;
        } else if env::var("COMBAT_JSON").is_ok() {
            // Also accept just setting the variable without value as "true"
            config.json = true;
        }

        config
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
