//! Tool Context
//!
//! The context handed to a tool for exactly one invocation. It carries the
//! project root (for path resolution) and an exclusive borrow of the run's
//! `KnowledgeStore`, so tools that record insights, file analyses or
//! documentation sections mutate the one store the coordinator owns.
//!
//! Nothing here is shared across invocations; the executor builds a fresh
//! context per tool call.

use std::path::{Component, Path, PathBuf};

use crate::error::{CoreError, CoreResult};
use crate::memory::KnowledgeStore;

/// Context for a single tool invocation.
pub struct ToolContext<'a> {
    project_root: &'a Path,
    memory: &'a mut KnowledgeStore,
}

impl<'a> ToolContext<'a> {
    /// Create a new ToolContext.
    pub fn new(project_root: &'a Path, memory: &'a mut KnowledgeStore) -> Self {
        Self {
            project_root,
            memory,
        }
    }

    /// Returns the project root directory path.
    pub fn project_root(&self) -> &Path {
        self.project_root
    }

    /// Read access to the Knowledge Store.
    pub fn memory(&self) -> &KnowledgeStore {
        self.memory
    }

    /// Write access to the Knowledge Store.
    pub fn memory_mut(&mut self) -> &mut KnowledgeStore {
        self.memory
    }

    /// Resolve a user-supplied path against the project root.
    ///
    /// Relative paths are joined onto the root; absolute paths are accepted
    /// only when they lie under it. `..` components are folded lexically, and
    /// any path that climbs out of the root is rejected. The deepest existing
    /// ancestor is then canonicalized, so a symlink pointing outside the root
    /// is rejected as well.
    pub fn resolve_path(&self, raw: &str) -> CoreResult<PathBuf> {
        let raw = raw.trim();
        let candidate = Path::new(if raw.is_empty() { "." } else { raw });
        let joined = if candidate.is_absolute() {
            candidate.to_path_buf()
        } else {
            self.project_root.join(candidate)
        };

        let resolved = lexical_normalize(&joined);
        let root = lexical_normalize(self.project_root);
        let climbs = resolved
            .components()
            .any(|c| matches!(c, Component::ParentDir));
        if climbs || !resolved.starts_with(&root) || escapes_through_link(&resolved, &root) {
            return Err(CoreError::outside_root(raw));
        }
        Ok(resolved)
    }

    /// Express an absolute path relative to the project root with `/` separators.
    pub fn relative_display(&self, path: &Path) -> String {
        let root = lexical_normalize(self.project_root);
        let rel = path.strip_prefix(&root).unwrap_or(path);
        let text = rel.to_string_lossy().replace('\\', "/");
        if text.is_empty() {
            ".".to_string()
        } else {
            text
        }
    }
}

/// True when the real location of `path` lies outside the real root.
///
/// Checks the deepest ancestor that exists, so paths that do not exist yet
/// are still caught when they sit under a linked directory. A root that
/// cannot be canonicalized leaves the lexical check in charge.
fn escapes_through_link(path: &Path, root: &Path) -> bool {
    let real_root = match root.canonicalize() {
        Ok(p) => p,
        Err(_) => return false,
    };
    path.ancestors()
        .find_map(|p| p.canonicalize().ok())
        .is_some_and(|real| !real.starts_with(&real_root))
}

/// Fold `.` and `..` components without touching the filesystem.
fn lexical_normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push(component);
                }
            }
            other => out.push(other),
        }
    }
    out
}
