//! Docsmith
//!
//! An autonomous documentation agent. Given a source tree it plans an
//! exploration, runs a bounded ReAct loop over a fixed set of tools for each
//! plan step, reflects on the accumulated knowledge, and finally renders a
//! Markdown documentation site.
//!
//! - `config` - Layered agent configuration
//! - `services` - Planner, step executor, reflector, coordinator and outputs
//! - `utils` - Error types

pub mod config;
pub mod services;
pub mod utils;

pub use config::{AgentConfig, LlmSettings};
pub use services::agent::{AgentCoordinator, RunReport};
pub use services::events::{AgentEvent, AgentPhase, EventEmitter};
pub use services::plan_mode::{Plan, PlanStep, ReflectionResult, StepStatus};
pub use utils::error::{AppError, AppResult};

pub use docsmith_core::KnowledgeStore;
