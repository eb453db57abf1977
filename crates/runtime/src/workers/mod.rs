//! Worker tasks that back the runtime orchestration.
//!
//! The simulation worker executes encounter commands; the event journal
//! lives with the event bus.

mod simulation;

pub use simulation::{Command, SimulationWorker};
