//! Agent Events
//!
//! Observable side effects of a run (phase changes, thoughts, tool calls and
//! observations), delivered to an optional listener such as the CLI printer.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// Coordinator state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentPhase {
    Planning,
    Executing,
    Reflecting,
    Generating,
    Done,
}

impl std::fmt::Display for AgentPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AgentPhase::Planning => write!(f, "planning"),
            AgentPhase::Executing => write!(f, "executing"),
            AgentPhase::Reflecting => write!(f, "reflecting"),
            AgentPhase::Generating => write!(f, "generating"),
            AgentPhase::Done => write!(f, "done"),
        }
    }
}

/// Event emitted while the agent runs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AgentEvent {
    PhaseChanged {
        phase: AgentPhase,
        iteration: usize,
    },
    PlanCreated {
        overview: String,
        steps: usize,
    },
    StepStarted {
        step_id: u32,
        action: String,
        target: String,
    },
    /// Free-text reasoning from the model
    Thought {
        step_id: u32,
        content: String,
    },
    ToolCall {
        step_id: u32,
        tool_id: String,
        tool_name: String,
        arguments: serde_json::Value,
    },
    /// Rendered tool result, as fed back to the model
    Observation {
        step_id: u32,
        tool_id: String,
        success: bool,
        content: String,
    },
    StepCompleted {
        step_id: u32,
        iterations: usize,
        /// False when the ReAct turn cap cut the step off
        clean_stop: bool,
    },
    Reflection {
        completeness: u8,
        is_complete: bool,
        should_continue: bool,
        missing_areas: Vec<String>,
    },
    PlanAdjusted {
        added_steps: usize,
    },
    /// The run-level iteration cap forced generation
    ForcedTermination {
        iterations: usize,
    },
    Finished {
        iterations: usize,
        sections: usize,
    },
}

/// Fire-and-forget sender. Without a listener every emit is a no-op.
#[derive(Debug, Clone, Default)]
pub struct EventEmitter {
    tx: Option<mpsc::UnboundedSender<AgentEvent>>,
}

impl EventEmitter {
    pub fn new(tx: mpsc::UnboundedSender<AgentEvent>) -> Self {
        Self { tx: Some(tx) }
    }

    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn emit(&self, event: AgentEvent) {
        if let Some(tx) = &self.tx {
            // The listener going away must not stop the run
            let _ = tx.send(event);
        }
    }
}
