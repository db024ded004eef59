//! read_file Tool
//!
//! Reads a UTF-8 text file with line numbers, optionally sliced to a
//! 1-indexed inclusive line range.

use async_trait::async_trait;
use std::collections::HashMap;

use docsmith_core::ToolContext;
use docsmith_llm::ParameterSchema;

use crate::executor::ToolResult;
use crate::input::ReadFileArgs;
use crate::scan_utils::looks_binary;
use crate::trait_def::Tool;

/// Lines returned when no explicit range is requested.
const READ_DEFAULT_MAX_LINES: usize = 2000;

pub struct ReadFileTool;

#[async_trait]
impl Tool for ReadFileTool {
    type Args = ReadFileArgs;

    fn name(&self) -> &'static str {
        "read_file"
    }

    fn description(&self) -> &'static str {
        "Read a text file from the project. Returns the content with line numbers. \
         Use start_line/end_line (1-indexed, inclusive) to read part of a large file."
    }

    fn parameters_schema(&self) -> ParameterSchema {
        let mut properties = HashMap::new();
        properties.insert(
            "path".to_string(),
            ParameterSchema::string(Some("File path relative to the project root")),
        );
        properties.insert(
            "start_line".to_string(),
            ParameterSchema::integer(Some("First line to read (1-indexed, inclusive)")),
        );
        properties.insert(
            "end_line".to_string(),
            ParameterSchema::integer(Some("Last line to read (1-indexed, inclusive)")),
        );
        ParameterSchema::object(
            Some("Read file parameters"),
            properties,
            vec!["path".to_string()],
        )
    }

    async fn execute(&self, ctx: &mut ToolContext<'_>, args: ReadFileArgs) -> ToolResult {
        let path = match ctx.resolve_path(&args.path) {
            Ok(p) => p,
            Err(e) => return ToolResult::err(e.to_string()),
        };

        if !path.exists() {
            return ToolResult::err(format!("File not found: {}", args.path));
        }
        if path.is_dir() {
            return ToolResult::err(format!(
                "{} is a directory; use list_files instead",
                args.path
            ));
        }

        if let (Some(start), Some(end)) = (args.start_line, args.end_line) {
            if start > end {
                return ToolResult::err(format!(
                    "start_line ({}) is greater than end_line ({})",
                    start, end
                ));
            }
        }

        let bytes = match std::fs::read(&path) {
            Ok(b) => b,
            Err(e) => return ToolResult::err(format!("Failed to read {}: {}", args.path, e)),
        };
        if looks_binary(&bytes) {
            return ToolResult::err(format!("{} appears to be a binary file", args.path));
        }
        let content = match String::from_utf8(bytes) {
            Ok(c) => c,
            Err(_) => return ToolResult::err(format!("{} is not valid UTF-8 text", args.path)),
        };

        let relative = ctx.relative_display(&path);
        let lines: Vec<&str> = content.lines().collect();
        let total = lines.len();
        if total == 0 {
            return ToolResult::ok(format!("File: {} (empty)", relative));
        }

        let start = args.start_line.unwrap_or(1).max(1);
        if start > total {
            return ToolResult::err(format!(
                "start_line ({}) is beyond the end of {} ({} lines)",
                start, relative, total
            ));
        }
        let ranged = args.start_line.is_some() || args.end_line.is_some();
        let end = match args.end_line {
            Some(end) => end.min(total),
            None if ranged => total,
            None => total.min(READ_DEFAULT_MAX_LINES),
        };

        let mut output = format!("File: {} (lines {}-{} of {})\n", relative, start, end, total);
        for (idx, line) in lines[start - 1..end].iter().enumerate() {
            output.push_str(&format!("{:>6}\t{}\n", start + idx, line));
        }
        if end < total && !ranged {
            output.push_str(&format!(
                "\n... ({} more lines. Use start_line/end_line to read further.)",
                total - end
            ));
        }
        ToolResult::ok(output)
    }
}
