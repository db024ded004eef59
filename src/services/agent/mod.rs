//! Agent
//!
//! The run-level state machine that sequences planning, execution,
//! reflection and generation.

pub mod coordinator;

pub use coordinator::{AgentCoordinator, RunReport};
