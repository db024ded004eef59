//! State Visibility
//!
//! Write-only snapshots of a run for humans: the rendered plan, the raw
//! Knowledge Store and a timestamped progress log. Nothing here is read back.

use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::warn;

use docsmith_core::KnowledgeStore;

use super::plan_mode::types::Plan;

pub const PLAN_FILE: &str = "plan.md";
pub const MEMORY_FILE: &str = "memory.json";
pub const PROGRESS_FILE: &str = "progress.log";

/// Destination for run snapshots. Implementations must not fail the run.
pub trait StateSink: Send + Sync {
    fn save_plan(&self, plan: &Plan);
    fn save_memory(&self, memory: &KnowledgeStore);
    fn log_progress(&self, message: &str);
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullStateSink;

impl StateSink for NullStateSink {
    fn save_plan(&self, _plan: &Plan) {}
    fn save_memory(&self, _memory: &KnowledgeStore) {}
    fn log_progress(&self, _message: &str) {}
}

/// Human-readable Markdown rendering of a plan.
pub fn render_plan_markdown(plan: &Plan) -> String {
    let mut out = String::from("# Documentation Plan\n\n## Overview\n\n");
    out.push_str(plan.overview());
    out.push_str("\n\n## Focus Areas\n\n");
    if plan.focus_areas().is_empty() {
        out.push_str("(none)\n");
    }
    for area in plan.focus_areas() {
        out.push_str(&format!("- {}\n", area));
    }
    out.push_str("\n## Steps\n\n");
    for step in plan.steps() {
        out.push_str(&format!(
            "{} {}. **{}** `{}` - {} ({})\n",
            step.status.glyph(),
            step.id,
            step.action,
            step.target,
            step.reason,
            step.status
        ));
    }
    out
}

/// Writes snapshots under a state directory.
pub struct FileStateSink {
    dir: PathBuf,
}

impl FileStateSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn write_file(&self, name: &str, content: &str) {
        let result = std::fs::create_dir_all(&self.dir)
            .and_then(|_| std::fs::write(self.dir.join(name), content));
        if let Err(e) = result {
            warn!(file = name, error = %e, "failed to write state file");
        }
    }
}

impl StateSink for FileStateSink {
    fn save_plan(&self, plan: &Plan) {
        self.write_file(PLAN_FILE, &render_plan_markdown(plan));
    }

    fn save_memory(&self, memory: &KnowledgeStore) {
        match serde_json::to_string_pretty(memory) {
            Ok(json) => self.write_file(MEMORY_FILE, &json),
            Err(e) => warn!(error = %e, "failed to serialize knowledge store"),
        }
    }

    fn log_progress(&self, message: &str) {
        let line = format!("[{}] {}\n", chrono::Utc::now().to_rfc3339(), message);
        let result = std::fs::create_dir_all(&self.dir).and_then(|_| {
            std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(self.dir.join(PROGRESS_FILE))?
                .write_all(line.as_bytes())
        });
        if let Err(e) = result {
            warn!(error = %e, "failed to append progress log");
        }
    }
}
