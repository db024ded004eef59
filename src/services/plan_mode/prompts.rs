//! Prompt Builders
//!
//! Every prompt the agent sends lives here so the wording can be reviewed in
//! one place. The JSON shapes requested must stay in sync with `planner.rs`
//! and `reflector.rs`.

use docsmith_core::KnowledgeStore;

use super::types::{FileTree, PlanStep};

/// System prompt for the planning call.
pub const PLANNER_SYSTEM_PROMPT: &str = "You are a senior software engineer preparing to write \
documentation for an unfamiliar codebase. You plan the exploration before reading any code.";

/// System prompt for every ReAct turn.
pub const EXECUTOR_SYSTEM_PROMPT: &str = "You are a documentation agent exploring a codebase \
with tools. Think step by step, call tools to gather facts, and never invent code that you \
have not read. When you have nothing left to do for the current step, reply without calling \
any tool.";

/// System prompt for the reflection call.
pub const REFLECTOR_SYSTEM_PROMPT: &str = "You are a strict technical reviewer assessing \
whether generated documentation covers a codebase well enough to be published.";

/// Planning request embedding the filtered file tree.
pub fn planner_prompt(tree: &FileTree, max_steps: usize) -> String {
    let min_steps = max_steps.min(5);
    format!(
        r#"Here is the directory structure of the project to document:

```
{tree}```

Create an exploration plan for understanding this codebase and writing its documentation.
Prefer entry points and core modules over helpers. Each step must target a concrete file,
directory or area from the listing above.

Respond with a single JSON object and nothing else:
{{
  "overview": "One paragraph describing what this project appears to be",
  "steps": [
    {{"id": 1, "action": "What to do", "target": "path/or/area", "reason": "Why it matters"}}
  ],
  "focusAreas": ["area 1", "area 2"]
}}

Provide between {min_steps} and {max_steps} steps."#,
        tree = tree.render(),
        min_steps = min_steps,
        max_steps = max_steps,
    )
}

/// Seed message for one plan step.
pub fn step_prompt(summary: &str, step: &PlanStep, language: Option<&str>) -> String {
    let mut prompt = format!(
        r#"{summary}

## Current Step
- Action: {action}
- Target: {target}
- Reason: {reason}

## Instructions
1. Use list_files, read_file and search_code to explore the target.
2. Record notable facts with record_insight and summarize each file you read with mark_file_analyzed.
3. Once you understand the target well enough, call write_documentation with a Markdown section.
4. Focus on this step only; other steps will be handled separately.
5. Do not re-analyze files already listed under Analyzed Files unless this step requires it."#,
        summary = summary.trim_end(),
        action = step.action,
        target = step.target,
        reason = step.reason,
    );
    if let Some(directive) = language.map(language_directive) {
        prompt.push_str("\n\n");
        prompt.push_str(&directive);
    }
    prompt
}

/// Instruction pinning the output language of generated documentation.
pub fn language_directive(language: &str) -> String {
    format!(
        "## Output Language\nWrite all documentation content in {}. Keep code identifiers and file paths unchanged.",
        language
    )
}

/// Reflection request embedding the full Knowledge Store.
pub fn reflector_prompt(memory: &KnowledgeStore) -> String {
    let mut files = String::new();
    for analysis in memory.analyzed_files() {
        files.push_str(&format!("- {}: {}\n", analysis.path, analysis.summary));
    }
    let mut sections = String::new();
    for section in memory.sections() {
        sections.push_str(&format!("- [{}] {}\n", section.category, section.title));
    }
    let mut insights = String::new();
    for insight in memory.insights() {
        insights.push_str(&format!("- {}\n", insight));
    }
    let or_none = |s: &str| {
        if s.trim().is_empty() {
            "(none)\n".to_string()
        } else {
            s.to_string()
        }
    };

    format!(
        r#"Evaluate the documentation produced so far.

## Directory Structure
{structure}

## Codebase Understanding
{understanding}

## Analyzed Files ({file_count})
{files}
## Documentation Sections ({section_count})
{sections}
## Insights ({insight_count})
{insights}
## Evaluation Criteria
1. Are all core modules documented?
2. Is there an overview or architecture section?
3. Are the main APIs and entry points covered?
4. Are there obvious gaps?

If completeness is at least 80 and there are no critical gaps, set isComplete to true.

Respond with a single JSON object and nothing else:
{{
  "isComplete": true,
  "completeness": 85,
  "missingAreas": ["area not yet documented"],
  "suggestions": ["what to improve"],
  "shouldContinue": false
}}"#,
        structure = or_none(memory.directory_structure()).trim_end(),
        understanding = or_none(memory.codebase_understanding()).trim_end(),
        file_count = memory.analyzed_file_count(),
        files = or_none(&files),
        section_count = memory.sections().len(),
        sections = or_none(&sections),
        insight_count = memory.insights().len(),
        insights = or_none(&insights),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_planner_prompt_embeds_tree() {
        let tree = FileTree::new("app", vec!["index.ts".into(), "lib/parse.ts".into()], false);
        let prompt = planner_prompt(&tree, 8);
        assert!(prompt.contains("app/\n  index.ts\n  lib/\n    parse.ts\n```"));
        assert!(prompt.contains("between 5 and 8 steps"));
    }

    #[test]
    fn test_step_prompt_language_directive() {
        let step = PlanStep::new(1, "Analyze entry", "index.ts", "entry point");
        let plain = step_prompt("## Current Knowledge", &step, None);
        assert!(plain.contains("- Target: index.ts"));
        assert!(!plain.contains("Output Language"));

        let localized = step_prompt("## Current Knowledge", &step, Some("中文"));
        assert!(localized.ends_with(&language_directive("中文")));
    }

    #[test]
    fn test_reflector_prompt_lists_knowledge() {
        let mut memory = KnowledgeStore::new();
        memory.set_directory_structure("A parser library");
        memory.mark_file_analyzed("lib/parse.ts", "Parses input", None, None);
        memory.add_section("Overview", "# Overview", "overview");

        let prompt = reflector_prompt(&memory);
        assert!(prompt.contains("A parser library"));
        assert!(prompt.contains("- lib/parse.ts: Parses input"));
        assert!(prompt.contains("- [overview] Overview"));
        assert!(prompt.contains("## Insights (0)\n(none)"));
    }
}
