//! list_files Tool
//!
//! Gitignore-aware recursive listing of files under a directory, optionally
//! filtered by a glob over root-relative paths.

use async_trait::async_trait;
use std::collections::HashMap;

use docsmith_core::ToolContext;
use docsmith_llm::ParameterSchema;

use crate::executor::ToolResult;
use crate::input::ListFilesArgs;
use crate::scan_utils::{is_default_scan_excluded, walker};
use crate::trait_def::Tool;

/// Maximum number of paths returned in one listing.
const LIST_MAX_ENTRIES: usize = 500;

pub struct ListFilesTool;

#[async_trait]
impl Tool for ListFilesTool {
    type Args = ListFilesArgs;

    fn name(&self) -> &'static str {
        "list_files"
    }

    fn description(&self) -> &'static str {
        "List files under a directory of the project (recursively, respecting .gitignore). \
         Optionally filter with a glob pattern matched against project-relative paths, \
         e.g. 'src/**/*.ts' or '*.rs'."
    }

    fn parameters_schema(&self) -> ParameterSchema {
        let mut properties = HashMap::new();
        properties.insert(
            "path".to_string(),
            ParameterSchema::string(Some(
                "Directory to list, relative to the project root (default: '.')",
            )),
        );
        properties.insert(
            "pattern".to_string(),
            ParameterSchema::string(Some("Glob pattern to filter files, e.g. '**/*.py'")),
        );
        ParameterSchema::object(Some("List files parameters"), properties, vec![])
    }

    async fn execute(&self, ctx: &mut ToolContext<'_>, args: ListFilesArgs) -> ToolResult {
        let raw_path = args.path.as_deref().unwrap_or(".");
        let dir = match ctx.resolve_path(raw_path) {
            Ok(p) => p,
            Err(e) => return ToolResult::err(e.to_string()),
        };

        if !dir.exists() {
            return ToolResult::err(format!("Directory not found: {}", raw_path));
        }
        if !dir.is_dir() {
            return ToolResult::err(format!("Not a directory: {}", raw_path));
        }

        let matcher = match args.pattern.as_deref().map(glob::Pattern::new).transpose() {
            Ok(m) => m,
            Err(e) => return ToolResult::err(format!("Invalid glob pattern: {}", e)),
        };

        let root = ctx.project_root().to_path_buf();
        let mut files = Vec::new();
        let mut total = 0usize;

        for entry in walker(&dir).flatten() {
            if !entry.file_type().map(|ft| ft.is_file()).unwrap_or(false) {
                continue;
            }
            let path = entry.path();
            if is_default_scan_excluded(&root, path) {
                continue;
            }
            let relative = ctx.relative_display(path);
            if let Some(ref m) = matcher {
                let file_name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_default();
                if !m.matches(&relative) && !m.matches(&file_name) {
                    continue;
                }
            }
            total += 1;
            if files.len() < LIST_MAX_ENTRIES {
                files.push(relative);
            }
        }

        if files.is_empty() {
            return ToolResult::ok(format!("No files found under {}", raw_path));
        }

        files.sort();
        let mut output = format!("{} files under {}:\n", total, ctx.relative_display(&dir));
        output.push_str(&files.join("\n"));
        if total > LIST_MAX_ENTRIES {
            output.push_str(&format!(
                "\n\n... ({} more files not shown. Narrow the path or pattern.)",
                total - LIST_MAX_ENTRIES
            ));
        }
        ToolResult::ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docsmith_core::KnowledgeStore;
    use tempfile::TempDir;

    fn fixture() -> TempDir {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("src/util")).unwrap();
        std::fs::create_dir_all(dir.path().join("node_modules/pkg")).unwrap();
        std::fs::write(dir.path().join("README.md"), "# hi").unwrap();
        std::fs::write(dir.path().join("src/main.rs"), "fn main() {}").unwrap();
        std::fs::write(dir.path().join("src/util/fmt.rs"), "pub fn f() {}").unwrap();
        std::fs::write(dir.path().join("node_modules/pkg/index.js"), "x").unwrap();
        dir
    }

    #[tokio::test]
    async fn test_list_all_files() {
        let dir = fixture();
        let mut memory = KnowledgeStore::new();
        let mut ctx = ToolContext::new(dir.path(), &mut memory);

        let result = ListFilesTool.execute(&mut ctx, ListFilesArgs::default()).await;
        assert!(result.success);
        let output = result.to_content();
        assert!(output.contains("src/main.rs"));
        assert!(output.contains("src/util/fmt.rs"));
        assert!(output.contains("README.md"));
        assert!(!output.contains("node_modules"));
    }

    #[tokio::test]
    async fn test_list_with_pattern() {
        let dir = fixture();
        let mut memory = KnowledgeStore::new();
        let mut ctx = ToolContext::new(dir.path(), &mut memory);

        let args = ListFilesArgs {
            path: Some("src".to_string()),
            pattern: Some("*.rs".to_string()),
        };
        let output = ListFilesTool.execute(&mut ctx, args).await.to_content();
        assert!(output.starts_with("2 files under src:"));
        assert!(!output.contains("README.md"));
    }

    #[tokio::test]
    async fn test_list_not_a_directory() {
        let dir = fixture();
        let mut memory = KnowledgeStore::new();
        let mut ctx = ToolContext::new(dir.path(), &mut memory);

        let args = ListFilesArgs {
            path: Some("README.md".to_string()),
            pattern: None,
        };
        let result = ListFilesTool.execute(&mut ctx, args).await;
        assert!(!result.success);
        assert!(result.to_content().starts_with("Error: Not a directory"));
    }

    #[tokio::test]
    async fn test_list_rejects_escape() {
        let dir = fixture();
        let mut memory = KnowledgeStore::new();
        let mut ctx = ToolContext::new(dir.path(), &mut memory);

        let args = ListFilesArgs {
            path: Some("../..".to_string()),
            pattern: None,
        };
        assert!(!ListFilesTool.execute(&mut ctx, args).await.success);
    }
}
