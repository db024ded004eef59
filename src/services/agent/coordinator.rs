//! Agent Coordinator
//!
//! Top-level state machine of a run:
//!
//! ```text
//! planning -> executing -> reflecting -> (executing | generating) -> done
//! ```
//!
//! Every phase executed counts as one iteration. When only one iteration is
//! left the coordinator jumps straight to generation, so a run never executes
//! more than `max_iterations` phases.

use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use tracing::{error, info, info_span, warn, Instrument};

use docsmith_core::KnowledgeStore;
use docsmith_llm::LlmProvider;

use crate::config::AgentConfig;
use crate::services::events::{AgentEvent, AgentPhase, EventEmitter};
use crate::services::generator::{MarkdownSiteGenerator, SiteGenerator};
use crate::services::plan_mode::{Plan, Planner, ReflectionResult, Reflector, StepExecutor};
use crate::services::state::{FileStateSink, StateSink};
use crate::utils::error::{AppError, AppResult};

/// Outcome of a completed run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    pub run_id: String,
    /// Phases in execution order
    pub phases: Vec<AgentPhase>,
    pub iterations: usize,
    /// True when the iteration cap forced generation
    pub forced_termination: bool,
    pub plan: Option<Plan>,
    pub memory: KnowledgeStore,
    pub reflections: Vec<ReflectionResult>,
}

pub struct AgentCoordinator {
    provider: Arc<dyn LlmProvider>,
    config: AgentConfig,
    target: PathBuf,
    generator: Box<dyn SiteGenerator>,
    state: Box<dyn StateSink>,
    events: EventEmitter,
}

/// Mutable state threaded through the phases.
struct RunState {
    phase: AgentPhase,
    iterations: usize,
    forced_termination: bool,
    phases: Vec<AgentPhase>,
    plan: Option<Plan>,
    memory: KnowledgeStore,
    reflections: Vec<ReflectionResult>,
}

impl AgentCoordinator {
    /// Coordinator writing Markdown to `config.output_dir` and state files
    /// to `config.state_dir`.
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        config: AgentConfig,
        target: impl Into<PathBuf>,
    ) -> Self {
        let target = target.into();
        let project_name = target
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "Project".to_string());
        Self {
            generator: Box::new(MarkdownSiteGenerator::new(
                config.output_dir.clone(),
                project_name,
            )),
            state: Box::new(FileStateSink::new(config.state_dir.clone())),
            provider,
            config,
            target,
            events: EventEmitter::disabled(),
        }
    }

    pub fn with_generator(mut self, generator: impl SiteGenerator + 'static) -> Self {
        self.generator = Box::new(generator);
        self
    }

    pub fn with_state_sink(mut self, state: impl StateSink + 'static) -> Self {
        self.state = Box::new(state);
        self
    }

    pub fn with_events(mut self, events: EventEmitter) -> Self {
        self.events = events;
        self
    }

    /// Drive the run to `done`. Any phase failure aborts the run.
    pub async fn run(self) -> AppResult<RunReport> {
        let run_id = uuid::Uuid::new_v4().to_string();
        let span = info_span!("run", run_id = %run_id, path = %self.target.display());

        let result = self.run_phases().instrument(span).await;
        match result {
            Ok(state) => Ok(RunReport {
                run_id,
                phases: state.phases,
                iterations: state.iterations,
                forced_termination: state.forced_termination,
                plan: state.plan,
                memory: state.memory,
                reflections: state.reflections,
            }),
            Err(e) => {
                error!(run_id = %run_id, error = %e, "run aborted");
                self.state.log_progress(&format!("Run aborted: {}", e));
                Err(e)
            }
        }
    }

    async fn run_phases(&self) -> AppResult<RunState> {
        let planner = Planner::new(self.provider.clone(), &self.config);
        let executor = StepExecutor::new(self.provider.clone(), &self.target, &self.config)
            .with_events(self.events.clone());
        let reflector = Reflector::new(self.provider.clone());

        let mut run = RunState {
            phase: AgentPhase::Planning,
            iterations: 0,
            forced_termination: false,
            phases: Vec::new(),
            plan: None,
            memory: KnowledgeStore::new(),
            reflections: Vec::new(),
        };

        while run.phase != AgentPhase::Done {
            if run.iterations + 1 >= self.config.max_iterations
                && run.phase != AgentPhase::Generating
            {
                warn!(
                    iterations = run.iterations,
                    max = self.config.max_iterations,
                    skipped_phase = %run.phase,
                    "iteration cap reached, forcing generation"
                );
                self.events.emit(AgentEvent::ForcedTermination {
                    iterations: run.iterations,
                });
                run.forced_termination = true;
                run.phase = AgentPhase::Generating;
            }

            run.iterations += 1;
            run.phases.push(run.phase);
            info!(phase = %run.phase, iteration = run.iterations, "entering phase");
            self.events.emit(AgentEvent::PhaseChanged {
                phase: run.phase,
                iteration: run.iterations,
            });
            self.state
                .log_progress(&format!("Iteration {}: {}", run.iterations, run.phase));

            let current = run.phase;
            run.phase = match current {
                AgentPhase::Planning => self.plan(&planner, &mut run).await?,
                AgentPhase::Executing => self.execute(&executor, &mut run).await?,
                AgentPhase::Reflecting => self.reflect(&planner, &reflector, &mut run).await?,
                AgentPhase::Generating => {
                    self.generator.generate(&run.memory).await?;
                    AgentPhase::Done
                }
                AgentPhase::Done => AgentPhase::Done,
            };
        }

        info!(
            iterations = run.iterations,
            sections = run.memory.sections().len(),
            files = run.memory.analyzed_file_count(),
            "run finished"
        );
        self.events.emit(AgentEvent::Finished {
            iterations: run.iterations,
            sections: run.memory.sections().len(),
        });
        self.state.log_progress("Run finished");
        Ok(run)
    }

    async fn plan(&self, planner: &Planner, run: &mut RunState) -> AppResult<AgentPhase> {
        let plan = planner.create_plan(&self.target).await?;
        run.memory.set_directory_structure(plan.overview());
        self.events.emit(AgentEvent::PlanCreated {
            overview: plan.overview().to_string(),
            steps: plan.steps().len(),
        });
        self.state.save_plan(&plan);
        self.state.save_memory(&run.memory);
        run.plan = Some(plan);
        Ok(AgentPhase::Executing)
    }

    async fn execute(&self, executor: &StepExecutor, run: &mut RunState) -> AppResult<AgentPhase> {
        let plan = run
            .plan
            .as_mut()
            .ok_or_else(|| AppError::internal("no plan to execute"))?;
        executor
            .execute(plan, &mut run.memory, self.state.as_ref())
            .await?;
        Ok(AgentPhase::Reflecting)
    }

    async fn reflect(
        &self,
        planner: &Planner,
        reflector: &Reflector,
        run: &mut RunState,
    ) -> AppResult<AgentPhase> {
        let reflection = reflector.reflect(&run.memory).await?;
        self.events.emit(AgentEvent::Reflection {
            completeness: reflection.completeness,
            is_complete: reflection.is_complete,
            should_continue: reflection.should_continue,
            missing_areas: reflection.missing_areas.clone(),
        });
        self.state.log_progress(&format!(
            "Reflection: {}% complete, continue = {}",
            reflection.completeness, reflection.should_continue
        ));

        let next = match run.plan.as_mut() {
            Some(plan) if reflection.should_continue => {
                let added = planner.adjust_plan(plan, &reflection);
                info!(added, "plan adjusted");
                self.events.emit(AgentEvent::PlanAdjusted { added_steps: added });
                self.state.save_plan(plan);
                AgentPhase::Executing
            }
            _ => AgentPhase::Generating,
        };
        run.reflections.push(reflection);
        Ok(next)
    }
}
