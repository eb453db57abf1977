//! Simulation worker that owns the authoritative [`combat_core::CombatEngine`].
//!
//! Receives commands from [`RuntimeHandle`](crate::RuntimeHandle), runs them
//! against the engine one at a time, and publishes the engine's events to
//! the EventBus. The command channel is the only way to reach the engine, so
//! it doubles as the encounter's turn queue.

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

use combat_core::{ActionResolution, Advance, CombatEngine, EncounterSummary, PlayError};

use crate::api::{EncounterSnapshot, Result};
use crate::events::{Event, EventBus, LifecycleEvent};

/// Commands that can be sent to the simulation worker
pub enum Command {
    /// Begin round 1 and run to the first player decision point.
    Start {
        reply: oneshot::Sender<Result<Advance>>,
    },
    PlayCard {
        hand_index: usize,
        reply: oneshot::Sender<Result<ActionResolution>>,
    },
    /// End the player phase and run until the next decision point.
    EndTurn {
        reply: oneshot::Sender<Result<Advance>>,
    },
    /// Query the current encounter (read-only).
    Snapshot {
        reply: oneshot::Sender<EncounterSnapshot>,
    },
    Summary {
        reply: oneshot::Sender<EncounterSummary>,
    },
}

impl Command {
    fn label(&self) -> String {
        match self {
            Command::Start { .. } => "start".into(),
            Command::PlayCard { hand_index, .. } => format!("play_card({hand_index})"),
            Command::EndTurn { .. } => "end_turn".into(),
            Command::Snapshot { .. } => "snapshot".into(),
            Command::Summary { .. } => "summary".into(),
        }
    }
}

/// Background task that processes encounter commands.
///
/// The worker is a pure rules executor: it does not own providers or handle
/// I/O. Provider orchestration is done by [`Runtime`](crate::Runtime).
pub struct SimulationWorker {
    engine: CombatEngine,
    command_rx: mpsc::Receiver<Command>,
    event_bus: EventBus,
    finish_announced: bool,
}

impl SimulationWorker {
    pub fn new(
        engine: CombatEngine,
        command_rx: mpsc::Receiver<Command>,
        event_bus: EventBus,
    ) -> Self {
        tracing::info!(
            enemy = %engine.enemy_definition().id,
            seed = engine.state().seed,
            deck = engine.state().deck.len(),
            "SimulationWorker initialized"
        );

        Self {
            engine,
            command_rx,
            event_bus,
            finish_announced: false,
        }
    }

    /// Main worker loop.
    pub async fn run(mut self) {
        while let Some(cmd) = self.command_rx.recv().await {
            self.handle_command(cmd);
        }
        debug!("SimulationWorker command channel closed; exiting");
    }

    fn handle_command(&mut self, cmd: Command) {
        let label = cmd.label();
        match cmd {
            Command::Start { reply } => {
                let result = self.engine.start();
                if result.is_ok() {
                    self.event_bus
                        .publish(Event::Lifecycle(LifecycleEvent::EncounterStarted {
                            enemy: self.engine.enemy_definition().id.clone(),
                            seed: self.engine.state().seed,
                        }));
                }
                let result = self.settle(&label, result);
                if reply.send(result).is_err() {
                    debug!("Start reply channel closed (caller dropped)");
                }
            }
            Command::PlayCard { hand_index, reply } => {
                let result = self.engine.play_card(hand_index);
                let result = self.settle(&label, result);
                if reply.send(result).is_err() {
                    debug!("PlayCard reply channel closed (caller dropped)");
                }
            }
            Command::EndTurn { reply } => {
                let result = self.engine.end_turn();
                let result = self.settle(&label, result);
                if reply.send(result).is_err() {
                    debug!("EndTurn reply channel closed (caller dropped)");
                }
            }
            Command::Snapshot { reply } => {
                if reply.send(self.snapshot()).is_err() {
                    debug!("Snapshot reply channel closed (caller dropped)");
                }
            }
            Command::Summary { reply } => {
                if reply.send(self.engine.summary()).is_err() {
                    debug!("Summary reply channel closed (caller dropped)");
                }
            }
        }
    }

    fn snapshot(&self) -> EncounterSnapshot {
        EncounterSnapshot {
            enemy: self.engine.enemy_definition().id.clone(),
            state: self.engine.state().clone(),
            playable: self.engine.playable_cards(),
        }
    }

    /// Publishes buffered engine events and lifecycle notifications for a
    /// finished command.
    fn settle<T>(&mut self, label: &str, result: std::result::Result<T, PlayError>) -> Result<T> {
        for event in self.engine.drain_events() {
            self.event_bus.publish(Event::Combat(event));
        }

        if let Err(error) = &result {
            warn!(command = label, %error, "command rejected");
            self.event_bus
                .publish(Event::Lifecycle(LifecycleEvent::PlayRejected {
                    command: label.to_owned(),
                    error: error.clone(),
                }));
        }

        if self.engine.outcome().is_some() && !self.finish_announced {
            self.finish_announced = true;
            self.event_bus
                .publish(Event::Lifecycle(LifecycleEvent::EncounterFinished {
                    summary: self.engine.summary(),
                }));
        }

        result.map_err(Into::into)
    }
}
