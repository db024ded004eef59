//! search_code Tool
//!
//! Regex (or literal) search over project files with .gitignore-aware
//! traversal. Bounded to the first 50 candidate files and 20 result lines.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;

use docsmith_core::ToolContext;
use docsmith_llm::ParameterSchema;

use crate::executor::ToolResult;
use crate::input::SearchCodeArgs;
use crate::scan_utils::{is_default_scan_excluded, looks_binary, walker};
use crate::trait_def::Tool;

/// Files scanned per search.
const SEARCH_MAX_FILES: usize = 50;
/// Result lines returned per search.
const SEARCH_MAX_RESULTS: usize = 20;
/// Matched line text is cut to this many characters.
const SEARCH_MAX_LINE_CHARS: usize = 200;

pub struct SearchCodeTool;

impl SearchCodeTool {
    /// Build the matcher; an invalid regex degrades to a literal search.
    fn build_regex(pattern: &str, case_insensitive: bool) -> Result<regex::Regex, String> {
        regex::RegexBuilder::new(pattern)
            .case_insensitive(case_insensitive)
            .build()
            .or_else(|_| {
                regex::RegexBuilder::new(&regex::escape(pattern))
                    .case_insensitive(case_insensitive)
                    .build()
            })
            .map_err(|e| format!("Invalid search pattern: {}", e))
    }

    /// Append `path:line: text` entries for one file until the result cap.
    fn search_file(
        ctx: &ToolContext<'_>,
        path: &Path,
        regex: &regex::Regex,
        results: &mut Vec<String>,
        total_matches: &mut usize,
    ) {
        let bytes = match std::fs::read(path) {
            Ok(b) => b,
            Err(_) => return,
        };
        if looks_binary(&bytes) {
            return;
        }
        let content = String::from_utf8_lossy(&bytes);
        let relative = ctx.relative_display(path);

        for (idx, line) in content.lines().enumerate() {
            if !regex.is_match(line) {
                continue;
            }
            *total_matches += 1;
            if results.len() < SEARCH_MAX_RESULTS {
                let text: String = line.trim().chars().take(SEARCH_MAX_LINE_CHARS).collect();
                results.push(format!("{}:{}: {}", relative, idx + 1, text));
            }
        }
    }
}

#[async_trait]
impl Tool for SearchCodeTool {
    type Args = SearchCodeArgs;

    fn name(&self) -> &'static str {
        "search_code"
    }

    fn description(&self) -> &'static str {
        "Search file contents for a regular expression (falls back to a literal match if the \
         pattern is not a valid regex). Returns up to 20 matching lines as 'path:line: text'."
    }

    fn parameters_schema(&self) -> ParameterSchema {
        let mut properties = HashMap::new();
        properties.insert(
            "pattern".to_string(),
            ParameterSchema::string(Some("Regular expression or literal text to search for")),
        );
        properties.insert(
            "path".to_string(),
            ParameterSchema::string(Some(
                "File or directory to search, relative to the project root (default: '.')",
            )),
        );
        properties.insert(
            "file_pattern".to_string(),
            ParameterSchema::string(Some("Glob restricting searched files, e.g. '*.ts'")),
        );
        properties.insert(
            "case_insensitive".to_string(),
            ParameterSchema::boolean(Some("Case insensitive search (default false)")),
        );
        ParameterSchema::object(
            Some("Search code parameters"),
            properties,
            vec!["pattern".to_string()],
        )
    }

    async fn execute(&self, ctx: &mut ToolContext<'_>, args: SearchCodeArgs) -> ToolResult {
        if args.pattern.is_empty() {
            return ToolResult::err("pattern must not be empty");
        }
        let raw_path = args.path.as_deref().unwrap_or(".");
        let search_path = match ctx.resolve_path(raw_path) {
            Ok(p) => p,
            Err(e) => return ToolResult::err(e.to_string()),
        };
        if !search_path.exists() {
            return ToolResult::err(format!("Path not found: {}", raw_path));
        }

        let regex = match Self::build_regex(&args.pattern, args.case_insensitive) {
            Ok(r) => r,
            Err(e) => return ToolResult::err(e),
        };
        let file_matcher = match args
            .file_pattern
            .as_deref()
            .map(glob::Pattern::new)
            .transpose()
        {
            Ok(m) => m,
            Err(e) => return ToolResult::err(format!("Invalid file_pattern: {}", e)),
        };

        let mut results = Vec::new();
        let mut total_matches = 0usize;

        if search_path.is_file() {
            Self::search_file(ctx, &search_path, &regex, &mut results, &mut total_matches);
        } else {
            let root = ctx.project_root().to_path_buf();
            let mut scanned = 0usize;
            for entry in walker(&search_path).flatten() {
                if scanned >= SEARCH_MAX_FILES {
                    break;
                }
                if !entry.file_type().map(|ft| ft.is_file()).unwrap_or(false) {
                    continue;
                }
                let path = entry.path();
                if is_default_scan_excluded(&root, path) {
                    continue;
                }
                if let Some(ref m) = file_matcher {
                    let file_name = path
                        .file_name()
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_default();
                    if !m.matches(&file_name) && !m.matches(&ctx.relative_display(path)) {
                        continue;
                    }
                }
                scanned += 1;
                Self::search_file(ctx, path, &regex, &mut results, &mut total_matches);
            }
        }

        if results.is_empty() {
            return ToolResult::ok(format!("No matches found for '{}'", args.pattern));
        }

        let mut output = results.join("\n");
        if total_matches > results.len() {
            output.push_str(&format!(
                "\n\n... ({} matches total, showing first {})",
                total_matches,
                results.len()
            ));
        }
        ToolResult::ok(output)
    }
}
