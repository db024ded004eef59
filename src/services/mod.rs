//! Services
//!
//! The agent proper. `agent` drives a run; `plan_mode` holds the planner,
//! step executor and reflector it sequences.

pub mod agent;
pub mod events;
pub mod generator;
pub mod plan_mode;
pub mod state;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use agent::{AgentCoordinator, RunReport};
pub use events::{AgentEvent, AgentPhase, EventEmitter};
pub use generator::{MarkdownSiteGenerator, SiteGenerator};
pub use state::{FileStateSink, NullStateSink, StateSink};
