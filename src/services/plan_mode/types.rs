//! Plan Types
//!
//! The exploration plan produced by the planner and consumed by the step
//! executor. Steps are append-only and the cursor only moves forward; both
//! are enforced by keeping the fields private.

use serde::Serialize;

// ============================================================================
// Step Types
// ============================================================================

/// Lifecycle of a plan step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Pending,
    InProgress,
    Completed,
    /// Administrative: never entered by the executor
    Skipped,
}

impl StepStatus {
    /// Glyph used in the human-readable plan rendering.
    pub fn glyph(&self) -> &'static str {
        match self {
            StepStatus::Pending => "⏳",
            StepStatus::InProgress => "🔄",
            StepStatus::Completed => "✅",
            StepStatus::Skipped => "⏭️",
        }
    }
}

impl std::fmt::Display for StepStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StepStatus::Pending => write!(f, "pending"),
            StepStatus::InProgress => write!(f, "in_progress"),
            StepStatus::Completed => write!(f, "completed"),
            StepStatus::Skipped => write!(f, "skipped"),
        }
    }
}

/// A single unit of directed exploration.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanStep {
    /// Run-unique, monotonically increasing id
    pub id: u32,
    /// What to do
    pub action: String,
    /// File, directory or area under examination
    pub target: String,
    /// Why this step matters
    pub reason: String,
    pub status: StepStatus,
}

impl PlanStep {
    pub fn new(
        id: u32,
        action: impl Into<String>,
        target: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            id,
            action: action.into(),
            target: target.into(),
            reason: reason.into(),
            status: StepStatus::Pending,
        }
    }
}

// ============================================================================
// File Tree
// ============================================================================

/// Filtered listing of the target directory, as computed by the planner.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FileTree {
    /// Display name of the root directory
    pub root_name: String,
    /// Root-relative file paths with `/` separators, grouped by directory
    files: Vec<String>,
    /// True when the scan stopped at its entry cap
    pub truncated: bool,
}

impl FileTree {
    pub fn new(root_name: impl Into<String>, mut files: Vec<String>, truncated: bool) -> Self {
        files.sort_by(|a, b| a.split('/').cmp(b.split('/')));
        files.dedup();
        Self {
            root_name: root_name.into(),
            files,
            truncated,
        }
    }

    pub fn files(&self) -> &[String] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Indented tree rendering, two spaces per level, directories suffixed with `/`.
    pub fn render(&self) -> String {
        let mut out = format!("{}/\n", self.root_name);
        let mut open_dirs: Vec<&str> = Vec::new();

        for file in &self.files {
            let parts: Vec<&str> = file.split('/').collect();
            let (dirs, name) = parts.split_at(parts.len() - 1);

            let shared = open_dirs
                .iter()
                .zip(dirs.iter())
                .take_while(|(a, b)| a == b)
                .count();
            open_dirs.truncate(shared);

            for dir in &dirs[shared..] {
                out.push_str(&"  ".repeat(open_dirs.len() + 1));
                out.push_str(dir);
                out.push_str("/\n");
                open_dirs.push(*dir);
            }

            out.push_str(&"  ".repeat(dirs.len() + 1));
            out.push_str(name[0]);
            out.push('\n');
        }

        if self.truncated {
            out.push_str("  ... (listing truncated)\n");
        }
        out
    }
}

// ============================================================================
// Plan
// ============================================================================

/// One run's exploration plan.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    overview: String,
    focus_areas: Vec<String>,
    steps: Vec<PlanStep>,
    cursor: usize,
    #[serde(skip)]
    tree: FileTree,
}

impl Plan {
    pub fn new(
        overview: impl Into<String>,
        focus_areas: Vec<String>,
        steps: Vec<PlanStep>,
        tree: FileTree,
    ) -> Self {
        Self {
            overview: overview.into(),
            focus_areas,
            steps,
            cursor: 0,
            tree,
        }
    }

    pub fn overview(&self) -> &str {
        &self.overview
    }

    pub fn focus_areas(&self) -> &[String] {
        &self.focus_areas
    }

    pub fn steps(&self) -> &[PlanStep] {
        &self.steps
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// The filtered directory listing the plan was made from.
    pub fn tree(&self) -> &FileTree {
        &self.tree
    }

    /// Step under the cursor, if the plan is not exhausted.
    pub fn current(&self) -> Option<&PlanStep> {
        self.steps.get(self.cursor)
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.steps.len()
    }

    /// Next id to hand out: one past the largest id ever assigned.
    pub fn next_step_id(&self) -> u32 {
        self.steps.iter().map(|s| s.id).max().unwrap_or(0) + 1
    }

    /// Append a new pending step and return its id.
    pub fn push_step(
        &mut self,
        action: impl Into<String>,
        target: impl Into<String>,
        reason: impl Into<String>,
    ) -> u32 {
        let id = self.next_step_id();
        self.steps.push(PlanStep::new(id, action, target, reason));
        id
    }

    pub fn first_pending_index(&self) -> Option<usize> {
        self.steps
            .iter()
            .position(|s| s.status == StepStatus::Pending)
    }

    /// Move the cursor one step forward.
    pub fn advance(&mut self) {
        if self.cursor < self.steps.len() {
            self.cursor += 1;
        }
    }

    /// Move the cursor to `index`, never backwards.
    pub fn seek(&mut self, index: usize) {
        self.cursor = self.cursor.max(index.min(self.steps.len()));
    }

    /// Set the status of the step at `index`.
    pub fn set_status(&mut self, index: usize, status: StepStatus) {
        if let Some(step) = self.steps.get_mut(index) {
            step.status = status;
        }
    }

    /// Administratively skip a pending step. Returns false if the step is
    /// unknown or already started.
    pub fn skip_step(&mut self, id: u32) -> bool {
        match self.steps.iter_mut().find(|s| s.id == id) {
            Some(step) if step.status == StepStatus::Pending => {
                step.status = StepStatus::Skipped;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_plan() -> Plan {
        Plan::new(
            "A parser",
            vec!["core".to_string()],
            vec![
                PlanStep::new(1, "Analyze entry", "index.ts", "entry point"),
                PlanStep::new(2, "Analyze parser", "lib/parse.ts", "core logic"),
            ],
            FileTree::default(),
        )
    }

    #[test]
    fn test_push_step_ids_are_monotonic() {
        let mut plan = sample_plan();
        let id = plan.push_step("Analyze cli", "bin/", "gap");
        assert_eq!(id, 3);
        assert_eq!(plan.steps().len(), 3);
        assert_eq!(plan.steps()[2].status, StepStatus::Pending);
    }

    #[test]
    fn test_cursor_never_moves_back() {
        let mut plan = sample_plan();
        plan.advance();
        plan.advance();
        plan.advance();
        assert_eq!(plan.cursor(), 2);
        assert!(plan.is_exhausted());

        plan.seek(0);
        assert_eq!(plan.cursor(), 2);
    }

    #[test]
    fn test_skip_step_only_when_pending() {
        let mut plan = sample_plan();
        plan.set_status(0, StepStatus::Completed);
        assert!(!plan.skip_step(1));
        assert!(plan.skip_step(2));
        assert_eq!(plan.steps()[1].status, StepStatus::Skipped);
        assert!(!plan.skip_step(99));
        assert_eq!(plan.first_pending_index(), None);
    }

    #[test]
    fn test_plan_serializes_camel_case() {
        let json = serde_json::to_value(sample_plan()).unwrap();
        assert_eq!(json["focusAreas"][0], "core");
        assert_eq!(json["steps"][0]["status"], "pending");
        assert!(json.get("tree").is_none());
    }

    #[test]
    fn test_file_tree_render() {
        let tree = FileTree::new(
            "app",
            vec![
                "lib/parse.ts".to_string(),
                "index.ts".to_string(),
                "lib/util/str.ts".to_string(),
                "lib/ast.ts".to_string(),
            ],
            false,
        );
        assert_eq!(
            tree.render(),
            "app/\n  index.ts\n  lib/\n    ast.ts\n    parse.ts\n    util/\n      str.ts\n"
        );
        assert_eq!(tree.len(), 4);
    }

    #[test]
    fn test_status_glyphs() {
        assert_eq!(StepStatus::Pending.glyph(), "⏳");
        assert_eq!(StepStatus::Completed.to_string(), "completed");
    }
}
