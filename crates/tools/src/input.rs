//! Tool Input
//!
//! The closed set of tool invocations the reasoning loop may issue. A raw
//! `(name, arguments)` pair from the model is decoded into exactly one
//! variant; unknown tool names, missing required fields and unexpected
//! fields are all rejected here, before any handler runs.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Why a model-issued invocation could not be decoded.
#[derive(Error, Debug)]
pub enum InputError {
    #[error("Unknown tool: '{name}'. Available tools: {available}")]
    UnknownTool { name: String, available: String },

    #[error("Invalid arguments for '{name}': expected a JSON object, got {got}")]
    NotAnObject { name: String, got: Value },

    #[error("Invalid arguments for '{name}': {source}")]
    InvalidArguments {
        name: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Arguments for `list_files`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ListFilesArgs {
    /// Directory to list, relative to the project root (default: root).
    #[serde(default)]
    pub path: Option<String>,
    /// Glob applied to root-relative paths (e.g. `src/**/*.rs`).
    #[serde(default)]
    pub pattern: Option<String>,
}

/// Arguments for `read_file`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReadFileArgs {
    pub path: String,
    /// First line to return (1-indexed, inclusive).
    #[serde(default)]
    pub start_line: Option<usize>,
    /// Last line to return (1-indexed, inclusive).
    #[serde(default)]
    pub end_line: Option<usize>,
}

/// Arguments for `search_code`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SearchCodeArgs {
    pub pattern: String,
    #[serde(default)]
    pub path: Option<String>,
    /// Glob restricting which files are searched (e.g. `*.ts`).
    #[serde(default)]
    pub file_pattern: Option<String>,
    #[serde(default)]
    pub case_insensitive: bool,
}

/// Arguments for `record_insight`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RecordInsightArgs {
    pub insight: String,
}

/// Arguments for `mark_file_analyzed`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MarkFileAnalyzedArgs {
    pub path: String,
    pub summary: String,
    #[serde(default)]
    pub exports: Option<Vec<String>>,
    #[serde(default)]
    pub dependencies: Option<Vec<String>>,
}

/// Arguments for `write_documentation`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WriteDocumentationArgs {
    pub title: String,
    pub content: String,
    pub category: String,
}

/// One decoded tool invocation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "tool", content = "arguments", rename_all = "snake_case")]
pub enum ToolInput {
    ListFiles(ListFilesArgs),
    ReadFile(ReadFileArgs),
    SearchCode(SearchCodeArgs),
    RecordInsight(RecordInsightArgs),
    MarkFileAnalyzed(MarkFileAnalyzedArgs),
    WriteDocumentation(WriteDocumentationArgs),
}

impl ToolInput {
    /// Every tool name, in catalog order.
    pub const NAMES: [&'static str; 6] = [
        "list_files",
        "read_file",
        "search_code",
        "record_insight",
        "mark_file_analyzed",
        "write_documentation",
    ];

    /// Decode a model-issued invocation.
    ///
    /// `null` arguments are treated as an empty object so that tools whose
    /// parameters are all optional can be called bare.
    pub fn parse(name: &str, arguments: Value) -> Result<Self, InputError> {
        if !Self::NAMES.contains(&name) {
            return Err(InputError::UnknownTool {
                name: name.to_string(),
                available: Self::NAMES.join(", "),
            });
        }
        let arguments = match arguments {
            Value::Null => Value::Object(Default::default()),
            Value::Object(map) => Value::Object(map),
            other => {
                return Err(InputError::NotAnObject {
                    name: name.to_string(),
                    got: other,
                })
            }
        };

        serde_json::from_value(serde_json::json!({ "tool": name, "arguments": arguments }))
            .map_err(|source| InputError::InvalidArguments {
                name: name.to_string(),
                source,
            })
    }

    /// Name of the tool this input targets.
    pub fn name(&self) -> &'static str {
        match self {
            ToolInput::ListFiles(_) => Self::NAMES[0],
            ToolInput::ReadFile(_) => Self::NAMES[1],
            ToolInput::SearchCode(_) => Self::NAMES[2],
            ToolInput::RecordInsight(_) => Self::NAMES[3],
            ToolInput::MarkFileAnalyzed(_) => Self::NAMES[4],
            ToolInput::WriteDocumentation(_) => Self::NAMES[5],
        }
    }
}
