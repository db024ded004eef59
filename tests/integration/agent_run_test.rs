//! Agent Run Integration Tests
//!
//! Whole runs through `AgentCoordinator` against a scripted LLM:
//! - The single-step scenario from plan to generated site
//! - Tool calls that write documentation into the site
//! - Forced termination when reflection never converges
//! - Reflection fallback on unreadable verdicts
//! - Re-planning cap and the per-step ReAct turn cap

use std::path::Path;
use std::sync::Arc;

use serde_json::json;
use tempfile::TempDir;
use tokio::sync::mpsc;

use docsmith::config::AgentConfig;
use docsmith::services::events::{AgentEvent, AgentPhase, EventEmitter};
use docsmith::services::plan_mode::{ReflectionResult, StepStatus};
use docsmith::AgentCoordinator;
use docsmith_llm::{LlmResponse, LlmResult};

use crate::mock_provider::{
    stop, text, tool_call, Role, RoutingProvider, COMPLETE, ONE_STEP_PLAN,
};

// ============================================================================
// Helpers
// ============================================================================

/// Target with the filtered listing `{index.ts, lib/parse.ts}` plus noise.
fn target() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    std::fs::create_dir_all(root.join("lib")).unwrap();
    std::fs::create_dir_all(root.join("node_modules/dep")).unwrap();
    std::fs::write(
        root.join("index.ts"),
        "import { parse } from './lib/parse';\nexport const run = (s: string) => parse(s);\n",
    )
    .unwrap();
    std::fs::write(
        root.join("lib/parse.ts"),
        "export function parse(input: string): string[] {\n  return input.split(' ');\n}\n",
    )
    .unwrap();
    std::fs::write(root.join("lib/parse.test.ts"), "test('parse', () => {});\n").unwrap();
    std::fs::write(root.join("node_modules/dep/index.js"), "module.exports = 1;\n").unwrap();
    std::fs::write(root.join("package-lock.json"), "{}\n").unwrap();
    dir
}

fn config_for(root: &Path) -> AgentConfig {
    let mut config = AgentConfig::default();
    config.resolve_dirs(root);
    config
}

fn route(
    f: impl Fn(Role, usize) -> LlmResult<LlmResponse> + Send + Sync + 'static,
) -> Arc<RoutingProvider> {
    Arc::new(RoutingProvider::new(f))
}

// ============================================================================
// Scenarios
// ============================================================================

#[tokio::test]
async fn test_single_step_run_end_to_end() {
    let dir = target();
    let provider = route(|role, _| match role {
        Role::Planner => text(ONE_STEP_PLAN),
        Role::Executor => stop(),
        Role::Reflector => text(COMPLETE),
    });

    let report = AgentCoordinator::new(provider.clone(), config_for(dir.path()), dir.path())
        .run()
        .await
        .unwrap();

    assert_eq!(
        report.phases,
        vec![
            AgentPhase::Planning,
            AgentPhase::Executing,
            AgentPhase::Reflecting,
            AgentPhase::Generating,
        ]
    );
    assert!(!report.forced_termination);

    let plan = report.plan.unwrap();
    assert_eq!(plan.steps().len(), 1);
    assert_eq!(plan.steps()[0].status, StepStatus::Completed);
    assert_eq!(plan.cursor(), 1);
    assert_eq!(
        plan.tree().files(),
        &["index.ts".to_string(), "lib/parse.ts".to_string()]
    );
    assert_eq!(report.memory.directory_structure(), "X");
    assert_eq!(provider.count(Role::Executor), 1);

    let docs = dir.path().join("docs");
    assert!(std::fs::read_to_string(docs.join("index.md"))
        .unwrap()
        .contains("## Overview\n\nX"));
    assert!(docs.join("insights.md").is_file());

    let state = dir.path().join(".docsmith");
    assert!(std::fs::read_to_string(state.join("plan.md"))
        .unwrap()
        .contains("✅ 1. **Analyze entry**"));
    assert!(state.join("memory.json").is_file());
    let log = std::fs::read_to_string(state.join("progress.log")).unwrap();
    assert!(log.contains("Step 1 completed"));
    assert!(log.trim_end().ends_with("Run finished"));
}

#[tokio::test]
async fn test_tool_calls_populate_site() {
    let dir = target();
    let provider = route(|role, n| match (role, n) {
        (Role::Planner, _) => text(ONE_STEP_PLAN),
        (Role::Executor, 0) => tool_call("c1", "read_file", json!({"path": "index.ts"})),
        (Role::Executor, 1) => tool_call(
            "c2",
            "mark_file_analyzed",
            json!({"path": "index.ts", "summary": "Entry point", "exports": ["run"]}),
        ),
        (Role::Executor, 2) => tool_call(
            "c3",
            "write_documentation",
            json!({
                "title": "Getting Started",
                "content": "Call `run` with a string.",
                "category": "Overview"
            }),
        ),
        (Role::Executor, 3) => tool_call("c4", "record_insight", json!({"insight": "Tiny API"})),
        (Role::Executor, _) => text("index.ts wraps the parser."),
        (Role::Reflector, _) => text(COMPLETE),
    });

    let report = AgentCoordinator::new(provider.clone(), config_for(dir.path()), dir.path())
        .run()
        .await
        .unwrap();

    assert_eq!(provider.count(Role::Executor), 5);
    assert!(report.memory.is_file_analyzed("index.ts"));
    assert_eq!(report.memory.insights(), &["Tiny API".to_string()]);
    assert!(report
        .memory
        .codebase_understanding()
        .contains("index.ts wraps the parser."));

    let page = dir.path().join("docs/overview/00-getting-started.md");
    assert_eq!(
        std::fs::read_to_string(page).unwrap(),
        "# Getting Started\n\nCall `run` with a string.\n"
    );

    // The read_file observation reached the model on the next turn
    let second = &provider.requests(Role::Executor)[1];
    assert!(second
        .last()
        .unwrap()
        .content
        .iter()
        .any(|c| serde_json::to_string(c).unwrap().contains("parse(s)")));
}

#[tokio::test]
async fn test_forced_termination_when_reflection_never_converges() {
    let dir = target();
    let provider = route(|role, n| match role {
        Role::Planner => text(ONE_STEP_PLAN),
        Role::Executor => stop(),
        Role::Reflector => text(&format!(
            r#"{{"isComplete":false,"completeness":30,"missingAreas":["area {}"],"suggestions":[],"shouldContinue":true}}"#,
            n
        )),
    });
    let (tx, mut rx) = mpsc::unbounded_channel();

    let report = AgentCoordinator::new(provider.clone(), config_for(dir.path()), dir.path())
        .with_events(EventEmitter::new(tx))
        .run()
        .await
        .unwrap();

    assert!(report.forced_termination);
    assert_eq!(report.iterations, 10);
    assert!(report.phases.len() <= 10);
    assert_eq!(report.phases.last(), Some(&AgentPhase::Generating));
    assert!(dir.path().join("docs/index.md").is_file());

    let mut forced = 0;
    let mut finished = false;
    while let Ok(event) = rx.try_recv() {
        match event {
            AgentEvent::ForcedTermination { .. } => forced += 1,
            AgentEvent::Finished { .. } => finished = true,
            _ => {}
        }
    }
    assert_eq!(forced, 1);
    assert!(finished);
}

#[tokio::test]
async fn test_reflection_fallback_finishes_run() {
    let cases: Vec<fn() -> LlmResult<LlmResponse>> = vec![
        stop,
        || text("The documentation looks fine."),
        || text(r#"{"isComplete": false, "completeness": 20, "missingAreas": ["cli"#),
    ];

    for case in cases {
        let dir = target();
        let provider = route(move |role, _| match role {
            Role::Planner => text(ONE_STEP_PLAN),
            Role::Executor => stop(),
            Role::Reflector => case(),
        });

        let report = AgentCoordinator::new(provider, config_for(dir.path()), dir.path())
            .run()
            .await
            .unwrap();

        assert_eq!(report.reflections, vec![ReflectionResult::fallback()]);
        assert_eq!(report.reflections[0].completeness, 70);
        assert_eq!(report.phases.last(), Some(&AgentPhase::Generating));
        assert!(!report.forced_termination);
    }
}

#[tokio::test]
async fn test_replanning_adds_at_most_three_steps() {
    let dir = target();
    let provider = route(|role, n| match (role, n) {
        (Role::Planner, _) => text(ONE_STEP_PLAN),
        (Role::Executor, _) => stop(),
        (Role::Reflector, 0) => text(
            r#"{"isComplete":false,"completeness":40,"missingAreas":["parser","cli","config","errors","tests"],"shouldContinue":true}"#,
        ),
        (Role::Reflector, _) => text(COMPLETE),
    });

    let report = AgentCoordinator::new(provider.clone(), config_for(dir.path()), dir.path())
        .run()
        .await
        .unwrap();

    let plan = report.plan.unwrap();
    let steps: Vec<(u32, &str)> = plan
        .steps()
        .iter()
        .map(|s| (s.id, s.target.as_str()))
        .collect();
    assert_eq!(
        steps,
        vec![(1, "index.ts"), (2, "parser"), (3, "cli"), (4, "config")]
    );
    assert!(plan
        .steps()
        .iter()
        .all(|s| s.status == StepStatus::Completed));
    assert_eq!(plan.cursor(), 4);
    assert_eq!(provider.count(Role::Executor), 4);
    assert_eq!(provider.count(Role::Reflector), 2);
}

#[tokio::test]
async fn test_step_turn_cap_with_endless_tool_calls() {
    let dir = target();
    let provider = route(|role, n| match role {
        Role::Planner => text(ONE_STEP_PLAN),
        Role::Executor => tool_call(&format!("call_{}", n), "list_files", json!({})),
        Role::Reflector => text(COMPLETE),
    });

    let report = AgentCoordinator::new(provider.clone(), config_for(dir.path()), dir.path())
        .run()
        .await
        .unwrap();

    assert_eq!(provider.count(Role::Executor), 20);
    assert_eq!(
        report.plan.unwrap().steps()[0].status,
        StepStatus::Completed
    );
    assert!(!report.forced_termination);
}

#[tokio::test]
async fn test_planner_failure_is_fatal() {
    let dir = target();
    let provider = route(|role, _| match role {
        Role::Planner => text("Sorry, I can't help with that."),
        _ => stop(),
    });

    let result = AgentCoordinator::new(provider.clone(), config_for(dir.path()), dir.path())
        .run()
        .await;

    assert!(matches!(result, Err(docsmith::AppError::PlanningFailed(_))));
    assert_eq!(provider.count(Role::Executor), 0);
    assert!(!dir.path().join("docs/index.md").exists());
    let log = std::fs::read_to_string(dir.path().join(".docsmith/progress.log")).unwrap();
    assert!(log.contains("Run aborted: Planning failed"));
}
