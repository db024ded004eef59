//! Shared scan/traversal utilities for the listing and search tools.

use std::path::Path;

/// Directories never worth descending into.
pub const DEFAULT_SCAN_EXCLUDES: &[&str] = &[
    ".git",
    ".hg",
    ".svn",
    "node_modules",
    "target",
    "dist",
    "build",
    "out",
    "coverage",
    "vendor",
    "__pycache__",
    ".venv",
    "venv",
    ".pytest_cache",
    ".mypy_cache",
    ".next",
    ".nuxt",
    ".docsmith",
];

/// True when any component of `candidate` below `base` is a default exclusion.
pub fn is_default_scan_excluded(base: &Path, candidate: &Path) -> bool {
    let relative = candidate.strip_prefix(base).unwrap_or(candidate);
    relative.components().any(|c| {
        let name = c.as_os_str().to_string_lossy();
        DEFAULT_SCAN_EXCLUDES.contains(&name.as_ref())
    })
}

/// Gitignore-aware walker over `root` that also honors hidden-file rules.
pub fn walker(root: &Path) -> ignore::Walk {
    ignore::WalkBuilder::new(root)
        .hidden(true)
        .git_ignore(true)
        .git_global(false)
        .git_exclude(true)
        .require_git(false)
        .sort_by_file_path(|a, b| a.cmp(b))
        .build()
}

/// Heuristic binary check: a NUL byte in the first 8 KiB.
pub fn looks_binary(bytes: &[u8]) -> bool {
    bytes.iter().take(8192).any(|b| *b == 0)
}
