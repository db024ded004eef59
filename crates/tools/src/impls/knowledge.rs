//! Knowledge Tools
//!
//! The three tools that write into the run's Knowledge Store:
//! `record_insight`, `mark_file_analyzed` and `write_documentation`.

use async_trait::async_trait;
use serde_json::json;
use std::collections::HashMap;

use docsmith_core::ToolContext;
use docsmith_llm::ParameterSchema;

use crate::executor::ToolResult;
use crate::input::{MarkFileAnalyzedArgs, RecordInsightArgs, WriteDocumentationArgs};
use crate::trait_def::Tool;

fn require_non_empty(field: &str, value: &str) -> Result<(), ToolResult> {
    if value.trim().is_empty() {
        Err(ToolResult::err(format!("{} must not be empty", field)))
    } else {
        Ok(())
    }
}

// ============================================================================
// record_insight
// ============================================================================

pub struct RecordInsightTool;

#[async_trait]
impl Tool for RecordInsightTool {
    type Args = RecordInsightArgs;

    fn name(&self) -> &'static str {
        "record_insight"
    }

    fn description(&self) -> &'static str {
        "Record a notable fact about the codebase (architecture decision, convention, \
         important pattern) for later documentation. Duplicate insights are ignored."
    }

    fn parameters_schema(&self) -> ParameterSchema {
        let mut properties = HashMap::new();
        properties.insert(
            "insight".to_string(),
            ParameterSchema::string(Some("One self-contained sentence describing the insight")),
        );
        ParameterSchema::object(
            Some("Record insight parameters"),
            properties,
            vec!["insight".to_string()],
        )
    }

    async fn execute(&self, ctx: &mut ToolContext<'_>, args: RecordInsightArgs) -> ToolResult {
        if let Err(e) = require_non_empty("insight", &args.insight) {
            return e;
        }
        let added = ctx.memory_mut().add_insight(args.insight.trim());
        let total = ctx.memory().insights().len();
        if added {
            ToolResult::ok(format!("Insight recorded ({} total)", total))
        } else {
            ToolResult::ok(format!("Insight already recorded ({} total)", total))
        }
    }
}

// ============================================================================
// mark_file_analyzed
// ============================================================================

pub struct MarkFileAnalyzedTool;

#[async_trait]
impl Tool for MarkFileAnalyzedTool {
    type Args = MarkFileAnalyzedArgs;

    fn name(&self) -> &'static str {
        "mark_file_analyzed"
    }

    fn description(&self) -> &'static str {
        "Mark a file as analyzed with a short summary of its purpose, its main exports and \
         its dependencies. Marking the same file again replaces the previous entry."
    }

    fn parameters_schema(&self) -> ParameterSchema {
        let mut properties = HashMap::new();
        properties.insert(
            "path".to_string(),
            ParameterSchema::string(Some("File path relative to the project root")),
        );
        properties.insert(
            "summary".to_string(),
            ParameterSchema::string(Some("What the file does, in one or two sentences")),
        );
        properties.insert(
            "exports".to_string(),
            ParameterSchema::array(
                Some("Public symbols exported by the file"),
                ParameterSchema::string(None),
            ),
        );
        properties.insert(
            "dependencies".to_string(),
            ParameterSchema::array(
                Some("Modules or packages the file depends on"),
                ParameterSchema::string(None),
            ),
        );
        ParameterSchema::object(
            Some("Mark file analyzed parameters"),
            properties,
            vec!["path".to_string(), "summary".to_string()],
        )
    }

    async fn execute(&self, ctx: &mut ToolContext<'_>, args: MarkFileAnalyzedArgs) -> ToolResult {
        if let Err(e) = require_non_empty("path", &args.path) {
            return e;
        }
        if let Err(e) = require_non_empty("summary", &args.summary) {
            return e;
        }
        let resolved = match ctx.resolve_path(&args.path) {
            Ok(p) => p,
            Err(e) => return ToolResult::err(e.to_string()),
        };
        let key = ctx.relative_display(&resolved);
        if key == "." || resolved.is_dir() {
            return ToolResult::err(format!(
                "{} is a directory; mark individual files instead",
                args.path
            ));
        }

        let analysis = ctx.memory_mut().mark_file_analyzed(
            &key,
            args.summary.trim(),
            args.exports,
            args.dependencies,
        );
        ToolResult::ok_json(analysis)
    }
}

// ============================================================================
// write_documentation
// ============================================================================

pub struct WriteDocumentationTool;

#[async_trait]
impl Tool for WriteDocumentationTool {
    type Args = WriteDocumentationArgs;

    fn name(&self) -> &'static str {
        "write_documentation"
    }

    fn description(&self) -> &'static str {
        "Write a documentation section in Markdown once you understand the code under study. \
         Sections are grouped by category (e.g. 'overview', 'architecture', 'modules', 'api')."
    }

    fn parameters_schema(&self) -> ParameterSchema {
        let mut properties = HashMap::new();
        properties.insert(
            "title".to_string(),
            ParameterSchema::string(Some("Section title")),
        );
        properties.insert(
            "content".to_string(),
            ParameterSchema::string(Some("Section body in Markdown")),
        );
        properties.insert(
            "category".to_string(),
            ParameterSchema::string(Some(
                "Category the section belongs to, e.g. 'overview', 'architecture', 'modules', 'api'",
            )),
        );
        ParameterSchema::object(
            Some("Write documentation parameters"),
            properties,
            vec![
                "title".to_string(),
                "content".to_string(),
                "category".to_string(),
            ],
        )
    }

    async fn execute(
        &self,
        ctx: &mut ToolContext<'_>,
        args: WriteDocumentationArgs,
    ) -> ToolResult {
        for (field, value) in [
            ("title", &args.title),
            ("content", &args.content),
            ("category", &args.category),
        ] {
            if let Err(e) = require_non_empty(field, value) {
                return e;
            }
        }

        let section =
            ctx.memory_mut()
                .add_section(args.title.trim(), args.content, args.category.trim());
        ToolResult::ok(json!({
            "id": section.id,
            "title": section.title,
            "category": section.category,
            "order": section.order,
        }))
    }
}
