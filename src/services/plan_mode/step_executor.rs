//! Step Executor
//!
//! Runs the plan one step at a time. Each step gets a fresh conversation and
//! a bounded think-act-observe loop against the LLM and the tool registry.
//!
//! A step's loop ends in one of two ways, both of which complete the step:
//! the model finishes its turn without calling a tool, or the turn cap runs out.

use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use docsmith_core::{KnowledgeStore, ToolContext};
use docsmith_llm::{LlmProvider, LlmRequestOptions, Message};
use docsmith_tools::ToolRegistry;

use crate::config::AgentConfig;
use crate::services::events::{AgentEvent, EventEmitter};
use crate::services::state::StateSink;
use crate::utils::error::AppResult;

use super::prompts::{step_prompt, EXECUTOR_SYSTEM_PROMPT};
use super::types::{Plan, PlanStep, StepStatus};

/// How a step's ReAct loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoopExit {
    /// Finish signal with no tool calls
    CleanStop,
    /// Turn cap reached
    CapExhausted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepOutcome {
    pub exit: LoopExit,
    /// LLM turns taken
    pub iterations: usize,
}

pub struct StepExecutor {
    provider: Arc<dyn LlmProvider>,
    registry: ToolRegistry,
    project_root: PathBuf,
    max_iterations: usize,
    language: Option<String>,
    events: EventEmitter,
}

impl StepExecutor {
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        project_root: impl Into<PathBuf>,
        config: &AgentConfig,
    ) -> Self {
        Self {
            provider,
            registry: ToolRegistry::new(),
            project_root: project_root.into(),
            max_iterations: config.max_react_iterations,
            language: config.language.clone(),
            events: EventEmitter::disabled(),
        }
    }

    pub fn with_events(mut self, events: EventEmitter) -> Self {
        self.events = events;
        self
    }

    /// Run every remaining step from the cursor onwards.
    ///
    /// Steps that are not pending are passed over. A gateway failure aborts
    /// immediately and leaves the failing step `in_progress`.
    pub async fn execute(
        &self,
        plan: &mut Plan,
        memory: &mut KnowledgeStore,
        sink: &dyn StateSink,
    ) -> AppResult<()> {
        while let Some(step) = plan.current().cloned() {
            let index = plan.cursor();
            if step.status != StepStatus::Pending {
                debug!(step_id = step.id, status = %step.status, "passing over step");
                plan.advance();
                continue;
            }

            plan.set_status(index, StepStatus::InProgress);
            sink.save_plan(plan);
            info!(step_id = step.id, action = %step.action, target = %step.target, "step started");
            self.events.emit(AgentEvent::StepStarted {
                step_id: step.id,
                action: step.action.clone(),
                target: step.target.clone(),
            });

            let outcome = self.run_step(&step, memory).await?;

            plan.set_status(index, StepStatus::Completed);
            plan.advance();
            info!(
                step_id = step.id,
                iterations = outcome.iterations,
                exit = ?outcome.exit,
                "step completed"
            );
            self.events.emit(AgentEvent::StepCompleted {
                step_id: step.id,
                iterations: outcome.iterations,
                clean_stop: outcome.exit == LoopExit::CleanStop,
            });

            sink.save_plan(plan);
            sink.save_memory(memory);
            sink.log_progress(&format!(
                "Step {} completed after {} turn(s): {} ({})",
                step.id, outcome.iterations, step.action, step.target
            ));
        }
        Ok(())
    }

    /// The bounded ReAct loop for one step.
    pub async fn run_step(
        &self,
        step: &PlanStep,
        memory: &mut KnowledgeStore,
    ) -> AppResult<StepOutcome> {
        let tools = self.registry.definitions();
        let mut conversation = vec![Message::user(step_prompt(
            &memory.summary(),
            step,
            self.language.as_deref(),
        ))];

        for iteration in 1..=self.max_iterations {
            debug!(
                step_id = step.id,
                iteration,
                messages = conversation.len(),
                "sending ReAct turn"
            );
            let response = self
                .provider
                .send_message(
                    conversation.clone(),
                    Some(EXECUTOR_SYSTEM_PROMPT.to_string()),
                    tools.clone(),
                    LlmRequestOptions::default(),
                )
                .await?;

            let thought = response.text();
            if let Some(text) = thought {
                debug!(step_id = step.id, chars = text.len(), "model thought");
                self.events.emit(AgentEvent::Thought {
                    step_id: step.id,
                    content: text.to_string(),
                });
            }

            if !response.has_tool_calls() {
                if let Some(text) = thought {
                    conversation.push(Message::assistant(text));
                }
                if response.is_final() {
                    if let Some(text) = thought {
                        memory.append_understanding(&format!(
                            "### {} ({})\n{}",
                            step.action, step.target, text
                        ));
                    }
                    return Ok(StepOutcome {
                        exit: LoopExit::CleanStop,
                        iterations: iteration,
                    });
                }
                continue;
            }

            conversation.push(Message::assistant_tool_calls(None, &response.tool_calls));
            for call in &response.tool_calls {
                debug!(step_id = step.id, tool = %call.name, id = %call.id, "tool call");
                self.events.emit(AgentEvent::ToolCall {
                    step_id: step.id,
                    tool_id: call.id.clone(),
                    tool_name: call.name.clone(),
                    arguments: call.arguments.clone(),
                });

                let mut ctx = ToolContext::new(&self.project_root, &mut *memory);
                let result = self
                    .registry
                    .execute(&call.name, &mut ctx, call.arguments.clone())
                    .await;
                let content = result.to_content();
                if !result.success {
                    debug!(tool = %call.name, error = %content, "tool returned an error");
                }

                self.events.emit(AgentEvent::Observation {
                    step_id: step.id,
                    tool_id: call.id.clone(),
                    success: result.success,
                    content: content.clone(),
                });
                conversation.push(Message::tool_result(&call.id, content, !result.success));
            }
        }

        warn!(
            step_id = step.id,
            cap = self.max_iterations,
            "ReAct turn cap reached, completing step"
        );
        Ok(StepOutcome {
            exit: LoopExit::CapExhausted,
            iterations: self.max_iterations,
        })
    }
}
