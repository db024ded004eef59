//! Tool Implementations
//!
//! File-system tools observe the project; knowledge tools mutate the
//! Knowledge Store through the tool context.

mod knowledge;
mod list_files;
mod read_file;
mod search_code;

pub use knowledge::{MarkFileAnalyzedTool, RecordInsightTool, WriteDocumentationTool};
pub use list_files::ListFilesTool;
pub use read_file::ReadFileTool;
pub use search_code::SearchCodeTool;
