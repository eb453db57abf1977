//! Cloneable façade for issuing commands to the runtime.
//!
//! [`RuntimeHandle`] hides channel plumbing and offers async helpers for
//! driving the encounter or streaming events from specific topics. Every
//! call is queued on the single simulation worker, so concurrent callers
//! are served strictly one at a time.
use tokio::sync::{broadcast, mpsc, oneshot};

use combat_core::{ActionResolution, Advance, EncounterSummary};

use super::errors::{Result, RuntimeError};
use super::snapshot::EncounterSnapshot;
use crate::events::{Event, EventBus, Topic};
use crate::workers::Command;

/// Client-facing handle to interact with the runtime
#[derive(Clone)]
pub struct RuntimeHandle {
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
}

impl RuntimeHandle {
    pub(crate) fn new(command_tx: mpsc::Sender<Command>, event_bus: EventBus) -> Self {
        Self {
            command_tx,
            event_bus,
        }
    }

    async fn request<T>(&self, command: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(command(reply_tx))
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Begin the encounter and run to the first player decision point.
    pub async fn start(&self) -> Result<Advance> {
        self.request(|reply| Command::Start { reply }).await?
    }

    /// Play the card at `hand_index`.
    pub async fn play_card(&self, hand_index: usize) -> Result<ActionResolution> {
        self.request(|reply| Command::PlayCard { hand_index, reply })
            .await?
    }

    /// End the player phase; the enemy acts before this returns.
    pub async fn end_turn(&self) -> Result<Advance> {
        self.request(|reply| Command::EndTurn { reply }).await?
    }

    /// Query the current encounter (read-only snapshot)
    pub async fn snapshot(&self) -> Result<EncounterSnapshot> {
        self.request(|reply| Command::Snapshot { reply }).await
    }

    pub async fn summary(&self) -> Result<EncounterSummary> {
        self.request(|reply| Command::Summary { reply }).await
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Topics
    ///
    /// - `Topic::Combat` - Engine events in the order they happened
    /// - `Topic::Lifecycle` - Encounter start/finish and rejected commands
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }
}
