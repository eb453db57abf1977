//! High-level runtime orchestrator.
//!
//! The runtime owns background workers, wires up command/event channels, and
//! exposes a builder-based API for clients to drive an encounter.

use std::path::PathBuf;

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

use combat_content::ContentBundle;
use combat_core::{CatalogOracle, CombatConfig, CombatEngine, EncounterSummary, Phase};

use crate::api::{ActionProvider, PlayerChoice, Result, RuntimeError, RuntimeHandle};
use crate::events::{Event, EventBus, EventJournal, Topic};
use crate::workers::{Command, SimulationWorker};

/// Runtime configuration shared across the orchestrator and workers.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub combat: CombatConfig,
    /// Seed for every roll in the encounter.
    pub seed: u64,
    /// Rounds [`Runtime::run`] allows before giving up.
    pub max_rounds: u32,
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
    /// Write every bus event to this JSON-lines file when set.
    pub journal_path: Option<PathBuf>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            combat: CombatConfig::default(),
            seed: 0,
            max_rounds: 100,
            event_buffer_size: 256,
            command_buffer_size: 32,
            journal_path: None,
        }
    }
}

/// Main runtime that orchestrates one encounter.
///
/// Runtime owns workers and coordinates player decisions.
/// [`RuntimeHandle`] provides a cloneable façade for clients.
pub struct Runtime {
    handle: RuntimeHandle,
    player_provider: Option<Box<dyn ActionProvider>>,
    max_rounds: u32,

    sim_worker_handle: JoinHandle<()>,
    journal_handle: Option<JoinHandle<()>>,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Get a cloneable handle to this runtime
    pub fn handle(&self) -> RuntimeHandle {
        self.handle.clone()
    }

    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.handle.subscribe(topic)
    }

    /// Execute a single decision step.
    ///
    /// Starts the encounter when needed, otherwise asks the player provider
    /// for one choice and applies it. Returns the summary once the
    /// encounter has finished.
    pub async fn step(&mut self) -> Result<Option<EncounterSummary>> {
        let provider = self
            .player_provider
            .as_ref()
            .ok_or(RuntimeError::ProviderNotSet)?;

        let snapshot = self.handle.snapshot().await?;
        if snapshot.is_finished() {
            return self.handle.summary().await.map(Some);
        }

        if snapshot.phase() == Phase::NotStarted {
            self.handle.start().await?;
        } else {
            if snapshot.state.turn.round > self.max_rounds {
                return Err(RuntimeError::RoundLimitExceeded {
                    max_rounds: self.max_rounds,
                });
            }

            match provider.choose(&snapshot).await? {
                PlayerChoice::Play(index) => {
                    self.handle.play_card(index).await?;
                }
                PlayerChoice::EndTurn => {
                    self.handle.end_turn().await?;
                }
            }
        }

        let summary = self.handle.summary().await?;
        Ok(summary.outcome.map(|_| summary))
    }

    /// Run the encounter to completion.
    pub async fn run(&mut self) -> Result<EncounterSummary> {
        loop {
            if let Some(summary) = self.step().await? {
                return Ok(summary);
            }
        }
    }

    /// Set the player action provider
    pub fn set_player_provider(&mut self, provider: impl ActionProvider + 'static) {
        self.player_provider = Some(Box::new(provider));
    }

    /// Shutdown the runtime gracefully
    ///
    /// Waits for the worker to drain its queue and the journal to flush.
    pub async fn shutdown(self) -> Result<()> {
        drop(self.handle);

        self.sim_worker_handle
            .await
            .map_err(RuntimeError::WorkerJoin)?;

        if let Some(journal) = self.journal_handle {
            journal.await.map_err(RuntimeError::WorkerJoin)?;
        }

        Ok(())
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    catalog: Option<Box<dyn CatalogOracle>>,
    enemy: Option<String>,
    player_provider: Option<Box<dyn ActionProvider>>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            catalog: None,
            enemy: None,
            player_provider: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    /// Set the catalog cards, enemies and the player are read from
    pub fn catalog(mut self, catalog: impl CatalogOracle + 'static) -> Self {
        self.catalog = Some(Box::new(catalog));
        self
    }

    /// Use a loaded content bundle for both the catalog and combat tunables
    pub fn content(mut self, bundle: ContentBundle) -> Self {
        self.config.combat = bundle.config;
        self.catalog = Some(Box::new(bundle.catalog));
        self
    }

    /// Enemy to fight, by catalog id
    pub fn enemy(mut self, enemy_id: impl Into<String>) -> Self {
        self.enemy = Some(enemy_id.into());
        self
    }

    /// Set player action provider (optional)
    pub fn player_provider(mut self, provider: impl ActionProvider + 'static) -> Self {
        self.player_provider = Some(Box::new(provider));
        self
    }

    /// Record every bus event to a JSON-lines file
    pub fn journal(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.journal_path = Some(path.into());
        self
    }

    /// Build the runtime
    ///
    /// Validates the enemy and the player's deck before any worker starts.
    pub async fn build(self) -> Result<Runtime> {
        let catalog = self.catalog.ok_or(RuntimeError::MissingCatalog)?;
        let enemy = self.enemy.ok_or(RuntimeError::MissingEnemy)?;

        let engine = CombatEngine::from_catalog(
            catalog.as_ref(),
            &enemy,
            self.config.seed,
            self.config.combat.clone(),
        )?;

        let (command_tx, command_rx) = mpsc::channel::<Command>(self.config.command_buffer_size);
        let event_bus = EventBus::with_capacity(self.config.event_buffer_size);

        // Subscribe the journal before the worker can publish anything.
        let journal_handle = match &self.config.journal_path {
            Some(path) => {
                let journal = EventJournal::create(path).map_err(RuntimeError::Journal)?;
                tracing::info!(path = %journal.path().display(), "journaling encounter events");
                Some(journal.spawn(&event_bus))
            }
            None => None,
        };

        let handle = RuntimeHandle::new(command_tx, event_bus.clone());

        let sim_worker = SimulationWorker::new(engine, command_rx, event_bus);
        let sim_worker_handle = tokio::spawn(async move {
            sim_worker.run().await;
        });

        Ok(Runtime {
            handle,
            player_provider: self.player_provider,
            max_rounds: self.config.max_rounds,
            sim_worker_handle,
            journal_handle,
        })
    }
}
