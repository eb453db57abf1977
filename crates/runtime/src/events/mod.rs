//! Topic-based event bus for runtime events.
//!
//! Engine events are forwarded on [`Topic::Combat`]; the runtime's own
//! notifications go to [`Topic::Lifecycle`]. Consumers subscribe only to the
//! topics they need.

mod bus;
mod journal;
mod types;

pub use bus::{Event, EventBus, Topic};
pub use journal::EventJournal;
pub use types::LifecycleEvent;
