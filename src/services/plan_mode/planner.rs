//! Planner
//!
//! Scans the target directory into a filtered `FileTree`, asks the model for
//! an exploration plan, and extends the plan with steps for the gaps a
//! reflection reports.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, info};

use docsmith_llm::{LlmProvider, LlmRequestOptions, Message};
use docsmith_tools::scan_utils::DEFAULT_SCAN_EXCLUDES;

use crate::config::AgentConfig;
use crate::utils::error::{AppError, AppResult};

use super::parsing::parse_json_object;
use super::prompts::{planner_prompt, PLANNER_SYSTEM_PROMPT};
use super::reflector::ReflectionResult;
use super::types::{FileTree, Plan, PlanStep};

/// Files listed in the planning prompt.
const TREE_MAX_ENTRIES: usize = 500;

/// Reason attached to steps created from reflection gaps.
const REPLAN_REASON: &str = "Identified as missing during reflection";

/// Test directories, pruned on top of the shared scan excludes.
const EXCLUDED_TEST_DIRS: &[&str] = &["tests", "test", "__tests__", "__mocks__", "spec"];

/// File-name globs that carry no signal for documentation.
const EXCLUDED_FILE_PATTERNS: &[&str] = &[
    // lock files
    "*.lock",
    "package-lock.json",
    "pnpm-lock.yaml",
    "go.sum",
    // non-source config
    ".eslintrc*",
    ".prettierrc*",
    ".babelrc*",
    ".editorconfig",
    "tsconfig*.json",
    "jsconfig*.json",
    "*.config.js",
    "*.config.cjs",
    "*.config.mjs",
    "*.config.ts",
    // tests
    "*.test.*",
    "*.spec.*",
    "*_test.*",
    "test_*.py",
    // generated
    "*.min.js",
    "*.map",
];

// ============================================================================
// Plan Parsing
// ============================================================================

#[derive(Debug, Deserialize)]
struct RawPlan {
    #[serde(default)]
    overview: String,
    #[serde(default, rename = "focusAreas", alias = "focus_areas")]
    focus_areas: Vec<String>,
    steps: Vec<RawStep>,
}

#[derive(Debug, Deserialize)]
struct RawStep {
    #[serde(default)]
    action: String,
    #[serde(default)]
    target: String,
    #[serde(default)]
    reason: String,
}

/// Parse a planning response into a `Plan` over `tree`.
///
/// Step ids are reassigned 1..n in response order. Steps without an action
/// are dropped and anything past `max_steps` is truncated.
pub fn parse_plan(text: &str, tree: FileTree, max_steps: usize) -> AppResult<Plan> {
    let value = parse_json_object(text)
        .map_err(|e| AppError::planning_failed(format!("plan response: {}", e)))?;
    let raw: RawPlan = serde_json::from_value(value)
        .map_err(|e| AppError::planning_failed(format!("unexpected plan shape: {}", e)))?;

    let steps: Vec<PlanStep> = raw
        .steps
        .into_iter()
        .filter(|s| !s.action.trim().is_empty())
        .take(max_steps)
        .zip(1u32..)
        .map(|(s, id)| PlanStep::new(id, s.action.trim(), s.target.trim(), s.reason.trim()))
        .collect();

    if steps.is_empty() {
        return Err(AppError::planning_failed("plan contains no steps"));
    }

    let focus_areas = raw
        .focus_areas
        .into_iter()
        .map(|a| a.trim().to_string())
        .filter(|a| !a.is_empty())
        .collect();

    Ok(Plan::new(raw.overview.trim(), focus_areas, steps, tree))
}

// ============================================================================
// Planner
// ============================================================================

pub struct Planner {
    provider: Arc<dyn LlmProvider>,
    max_steps: usize,
    max_replan_steps: usize,
    /// Agent output locations, never part of the listing
    skip_paths: Vec<PathBuf>,
}

impl Planner {
    pub fn new(provider: Arc<dyn LlmProvider>, config: &AgentConfig) -> Self {
        Self {
            provider,
            max_steps: config.max_plan_steps,
            max_replan_steps: config.max_replan_steps,
            skip_paths: vec![config.output_dir.clone(), config.state_dir.clone()],
        }
    }

    /// Build the filtered listing of `root`.
    pub fn scan_tree(&self, root: &Path) -> AppResult<FileTree> {
        if !root.is_dir() {
            return Err(AppError::planning_failed(format!(
                "target is not a directory: {}",
                root.display()
            )));
        }

        let file_patterns: Vec<glob::Pattern> = EXCLUDED_FILE_PATTERNS
            .iter()
            .filter_map(|p| glob::Pattern::new(p).ok())
            .collect();
        let skip_paths = self.skip_paths.clone();

        let walker = ignore::WalkBuilder::new(root)
            .hidden(true)
            .git_ignore(true)
            .git_global(false)
            .require_git(false)
            .sort_by_file_path(|a, b| a.cmp(b))
            .filter_entry(move |entry| {
                if entry.depth() == 0 || !entry.file_type().is_some_and(|t| t.is_dir()) {
                    return true;
                }
                let name = entry.file_name().to_string_lossy();
                !DEFAULT_SCAN_EXCLUDES.contains(&name.as_ref())
                    && !EXCLUDED_TEST_DIRS.contains(&name.as_ref())
                    && !skip_paths.iter().any(|p| p == entry.path())
            })
            .build();

        let mut files = Vec::new();
        let mut truncated = false;
        for entry in walker {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    debug!(error = %e, "skipping unreadable entry");
                    continue;
                }
            };
            if !entry.file_type().is_some_and(|t| t.is_file()) {
                continue;
            }
            let name = entry.file_name().to_string_lossy();
            if file_patterns.iter().any(|p| p.matches(&name)) {
                continue;
            }
            if files.len() >= TREE_MAX_ENTRIES {
                truncated = true;
                break;
            }
            let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
            files.push(relative.to_string_lossy().replace('\\', "/"));
        }

        let root_name = root
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| ".".to_string());
        Ok(FileTree::new(root_name, files, truncated))
    }

    /// Scan `target` and ask the model for an exploration plan.
    pub async fn create_plan(&self, target: &Path) -> AppResult<Plan> {
        let tree = self.scan_tree(target)?;
        if tree.is_empty() {
            return Err(AppError::planning_failed(format!(
                "no source files found under {}",
                target.display()
            )));
        }
        info!(files = tree.len(), truncated = tree.truncated, "scanned target");

        let messages = vec![Message::user(planner_prompt(&tree, self.max_steps))];
        let response = self
            .provider
            .send_message(
                messages,
                Some(PLANNER_SYSTEM_PROMPT.to_string()),
                vec![],
                LlmRequestOptions::default(),
            )
            .await?;

        let text = response.content.as_deref().unwrap_or("");
        let plan = parse_plan(text, tree, self.max_steps)?;
        info!(
            steps = plan.steps().len(),
            focus_areas = plan.focus_areas().len(),
            "plan created"
        );
        Ok(plan)
    }

    /// Append one step per missing area (at most `max_replan_steps`) and move
    /// the cursor to the first pending step. Returns the number of steps added.
    pub fn adjust_plan(&self, plan: &mut Plan, reflection: &ReflectionResult) -> usize {
        let mut added = 0;
        for area in reflection.missing_areas.iter().take(self.max_replan_steps) {
            let area = area.trim();
            if area.is_empty() {
                continue;
            }
            let id = plan.push_step(format!("Analyze {}", area), area, REPLAN_REASON);
            debug!(id, area, "appended step for missing area");
            added += 1;
        }

        let next = plan.first_pending_index().unwrap_or(plan.steps().len());
        plan.seek(next);
        added
    }
}
