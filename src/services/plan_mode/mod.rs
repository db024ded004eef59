//! Plan Mode Service
//!
//! The exploration half of the agent:
//! - Filtered directory scan and LLM-generated exploration plan
//! - Bounded ReAct execution of each plan step against the tool registry
//! - Completeness reflection and gap-driven re-planning

pub mod parsing;
pub mod planner;
pub mod prompts;
pub mod reflector;
pub mod step_executor;
pub mod types;

pub use planner::Planner;
pub use reflector::{ReflectionResult, Reflector};
pub use step_executor::{LoopExit, StepExecutor, StepOutcome};
pub use types::{FileTree, Plan, PlanStep, StepStatus};
