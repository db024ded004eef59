//! Docsmith Tools
//!
//! The tool capability set the reasoning loop invokes: a closed set of typed
//! tools behind a single `ToolRegistry`.
//!
//! ## Module Organization
//!
//! - `executor` - Uniform tool outcome (`ToolResult`)
//! - `input` - Decoded tool invocations (`ToolInput`) and per-tool argument structs
//! - `trait_def` - The `Tool` trait
//! - `registry` - Name-to-handler dispatch (`ToolRegistry`)
//! - `impls` - list_files, read_file, search_code and the knowledge tools
//! - `scan_utils` - Shared traversal filters

pub mod executor;
pub mod impls;
pub mod input;
pub mod registry;
pub mod scan_utils;
pub mod trait_def;

pub use executor::ToolResult;
pub use input::{InputError, ToolInput};
pub use registry::ToolRegistry;
pub use trait_def::Tool;
