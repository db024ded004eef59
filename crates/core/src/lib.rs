//! Docsmith Core
//!
//! Foundational types shared by every crate in the docsmith workspace. This
//! crate has no dependency on the LLM transport or on the tool implementations.
//!
//! ## Module Organization
//!
//! - `error` - Core error types (`CoreError`, `CoreResult`)
//! - `memory` - The Knowledge Store accumulated during a run (`KnowledgeStore`)
//! - `context` - Tool execution context (`ToolContext`)
//!
//! ## Design Principles
//!
//! 1. **Minimal dependencies** - serde and thiserror only
//! 2. **Single owner** - the coordinator owns the `KnowledgeStore`; everything else borrows it
//! 3. **Unidirectional dependency** - this crate depends on nothing else in the workspace

pub mod context;
pub mod error;
pub mod memory;

// ── Error Types ────────────────────────────────────────────────────────
pub use error::{CoreError, CoreResult};

// ── Knowledge Store ────────────────────────────────────────────────────
pub use memory::{normalize_path, slugify, DocumentSection, FileAnalysis, KnowledgeStore};

// ── Tool Context ───────────────────────────────────────────────────────
pub use context::ToolContext;
