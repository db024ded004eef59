//! Tool Registry
//!
//! Maps a tool name to its typed handler. The set of tools is closed: the
//! registry holds one instance of each and dispatches on the decoded
//! `ToolInput` variant.

use serde_json::Value;
use tracing::debug;

use docsmith_core::ToolContext;
use docsmith_llm::ToolDefinition;

use crate::executor::ToolResult;
use crate::impls::{
    ListFilesTool, MarkFileAnalyzedTool, ReadFileTool, RecordInsightTool, SearchCodeTool,
    WriteDocumentationTool,
};
use crate::input::ToolInput;
use crate::trait_def::Tool;

/// The documentation agent's tool capability set.
pub struct ToolRegistry {
    list_files: ListFilesTool,
    read_file: ReadFileTool,
    search_code: SearchCodeTool,
    record_insight: RecordInsightTool,
    mark_file_analyzed: MarkFileAnalyzedTool,
    write_documentation: WriteDocumentationTool,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            list_files: ListFilesTool,
            read_file: ReadFileTool,
            search_code: SearchCodeTool,
            record_insight: RecordInsightTool,
            mark_file_analyzed: MarkFileAnalyzedTool,
            write_documentation: WriteDocumentationTool,
        }
    }

    /// Tool catalog for the LLM, in a stable order.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        vec![
            self.list_files.definition(),
            self.read_file.definition(),
            self.search_code.definition(),
            self.record_insight.definition(),
            self.mark_file_analyzed.definition(),
            self.write_documentation.definition(),
        ]
    }

    /// All tool names, in catalog order.
    pub fn names(&self) -> Vec<&'static str> {
        ToolInput::NAMES.to_vec()
    }

    /// Decode and run one tool invocation.
    ///
    /// Never fails: decoding problems and tool faults come back as
    /// `ToolResult::err` so the model can read them and adapt.
    pub async fn execute(&self, name: &str, ctx: &mut ToolContext<'_>, args: Value) -> ToolResult {
        let input = match ToolInput::parse(name, args) {
            Ok(input) => input,
            Err(e) => {
                debug!(tool = name, error = %e, "rejected tool invocation");
                return ToolResult::err(e.to_string());
            }
        };
        self.dispatch(ctx, input).await
    }

    /// Run an already-decoded invocation.
    pub async fn dispatch(&self, ctx: &mut ToolContext<'_>, input: ToolInput) -> ToolResult {
        match input {
            ToolInput::ListFiles(args) => self.list_files.execute(ctx, args).await,
            ToolInput::ReadFile(args) => self.read_file.execute(ctx, args).await,
            ToolInput::SearchCode(args) => self.search_code.execute(ctx, args).await,
            ToolInput::RecordInsight(args) => self.record_insight.execute(ctx, args).await,
            ToolInput::MarkFileAnalyzed(args) => self.mark_file_analyzed.execute(ctx, args).await,
            ToolInput::WriteDocumentation(args) => {
                self.write_documentation.execute(ctx, args).await
            }
        }
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
