//! Append-only JSON-lines journal of bus events.
//!
//! The journal subscribes to every topic and writes one serialized
//! [`Event`] per line, which is enough to replay what a client observed.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;

use super::bus::{Event, EventBus, Topic};

/// Writes bus events to a file until the bus closes.
pub struct EventJournal {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl EventJournal {
    /// Create a new journal file, refusing to overwrite an existing one.
    pub fn create(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new().create_new(true).write(true).open(path)?;
        tracing::debug!("Created event journal: {}", path.display());

        Ok(Self {
            path: path.to_path_buf(),
            writer: BufWriter::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&mut self, event: &Event) -> std::io::Result<()> {
        serde_json::to_writer(&mut self.writer, event)?;
        self.writer.write_all(b"\n")
    }

    /// Spawn a task that drains every topic into this journal.
    ///
    /// The task ends once all bus senders are dropped.
    pub fn spawn(self, bus: &EventBus) -> JoinHandle<()> {
        let receivers = Topic::ALL.map(|topic| bus.subscribe(topic));
        tokio::spawn(self.run(receivers))
    }

    async fn run(mut self, [mut combat, mut lifecycle]: [broadcast::Receiver<Event>; 2]) {
        let mut combat_open = true;
        let mut lifecycle_open = true;

        while combat_open || lifecycle_open {
            let received = tokio::select! {
                event = combat.recv(), if combat_open => (Topic::Combat, event),
                event = lifecycle.recv(), if lifecycle_open => (Topic::Lifecycle, event),
            };

            match received {
                (_, Ok(event)) => {
                    if let Err(error) = self.append(&event) {
                        tracing::error!(path = %self.path.display(), %error, "journal write failed");
                        return;
                    }
                }
                (topic, Err(RecvError::Lagged(skipped))) => {
                    tracing::warn!(?topic, skipped, "journal lagged behind the event bus");
                }
                (Topic::Combat, Err(RecvError::Closed)) => combat_open = false,
                (Topic::Lifecycle, Err(RecvError::Closed)) => lifecycle_open = false,
            }
        }

        if let Err(error) = self.writer.flush() {
            tracing::error!(path = %self.path.display(), %error, "journal flush failed");
        }
    }
}
