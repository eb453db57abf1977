//! Async runtime orchestration for combat encounters.
//!
//! This crate wires together the action provider abstraction, catalog
//! access, and the simulation worker into a cohesive runtime API. Consumers
//! embed [`Runtime`] to drive an encounter, subscribe to events, and issue
//! commands through [`RuntimeHandle`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides the topic-based event bus and journal
//! - `workers` keeps background tasks internal to the crate
pub mod api;
pub mod events;
pub mod runtime;

mod workers;

pub use api::{
    ActionProvider, AutoPlayProvider, EncounterSnapshot, EndTurnProvider, PlayerChoice, Result,
    RuntimeError, RuntimeHandle, ScriptedProvider,
};
pub use events::{Event, EventBus, EventJournal, LifecycleEvent, Topic};
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig};
