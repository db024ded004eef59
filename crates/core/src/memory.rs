//! Knowledge Store
//!
//! The accumulating record of everything learned and produced during one
//! documentation run: free-text understanding, per-file analyses, insights,
//! and generated documentation sections.
//!
//! Every collection only grows. `analyzed_files` is an upsert map (last write
//! wins per normalized path), `document_sections` and `insights` are
//! append-only, and `codebase_understanding` is concatenated, never replaced.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Separator placed between appended understanding fragments.
const UNDERSTANDING_SEPARATOR: &str = "\n\n";

/// Maximum characters of understanding included in the prompt summary.
const SUMMARY_MAX_UNDERSTANDING_CHARS: usize = 4_000;
/// Maximum analyzed files listed in the prompt summary.
const SUMMARY_MAX_FILES: usize = 50;
/// Maximum (most recent) insights listed in the prompt summary.
const SUMMARY_MAX_INSIGHTS: usize = 20;
/// Maximum section titles listed in the prompt summary.
const SUMMARY_MAX_SECTIONS: usize = 50;

// ============================================================================
// Data Types
// ============================================================================

/// Analysis summary recorded for a single file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileAnalysis {
    /// Normalized, project-relative path
    pub path: String,
    /// What the file does
    pub summary: String,
    /// Public items the file exposes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exports: Option<Vec<String>>,
    /// Modules or packages the file depends on
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<Vec<String>>,
}

/// A generated documentation section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSection {
    /// `<category-slug>-<sequence length at insertion>`
    pub id: String,
    pub title: String,
    /// Markdown body
    pub content: String,
    pub category: String,
    /// Number of sections already in the same category at insertion time
    pub order: usize,
}

/// The single, mutable Knowledge Store of a run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeStore {
    codebase_understanding: String,
    analyzed_files: BTreeMap<String, FileAnalysis>,
    document_sections: Vec<DocumentSection>,
    insights: Vec<String>,
    directory_structure: String,
}

// ============================================================================
// Mutation
// ============================================================================

impl KnowledgeStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a fragment to the accumulated understanding.
    ///
    /// Blank fragments are ignored.
    pub fn append_understanding(&mut self, fragment: &str) {
        let fragment = fragment.trim();
        if fragment.is_empty() {
            return;
        }
        if !self.codebase_understanding.is_empty() {
            self.codebase_understanding.push_str(UNDERSTANDING_SEPARATOR);
        }
        self.codebase_understanding.push_str(fragment);
    }

    /// Record (or overwrite) the analysis of a file.
    ///
    /// The path is normalized before use as the key, so `./src/a.rs` and
    /// `src/a.rs` refer to the same entry.
    pub fn mark_file_analyzed(
        &mut self,
        path: &str,
        summary: impl Into<String>,
        exports: Option<Vec<String>>,
        dependencies: Option<Vec<String>>,
    ) -> &FileAnalysis {
        let key = normalize_path(path);
        let analysis = FileAnalysis {
            path: key.clone(),
            summary: summary.into(),
            exports,
            dependencies,
        };
        self.analyzed_files.insert(key.clone(), analysis);
        &self.analyzed_files[&key]
    }

    /// Append a documentation section, assigning its `id` and per-category `order`.
    pub fn add_section(
        &mut self,
        title: impl Into<String>,
        content: impl Into<String>,
        category: impl Into<String>,
    ) -> &DocumentSection {
        let category = category.into();
        let order = self
            .document_sections
            .iter()
            .filter(|s| s.category == category)
            .count();
        let slug = slugify(&category);
        let prefix = if slug.is_empty() { "section" } else { slug.as_str() };
        let id = format!("{}-{}", prefix, self.document_sections.len());

        self.document_sections.push(DocumentSection {
            id,
            title: title.into(),
            content: content.into(),
            category,
            order,
        });
        &self.document_sections[self.document_sections.len() - 1]
    }

    /// Record an insight. Returns `false` when the exact text was already present.
    pub fn add_insight(&mut self, insight: impl Into<String>) -> bool {
        let insight = insight.into();
        if self.insights.iter().any(|i| *i == insight) {
            return false;
        }
        self.insights.push(insight);
        true
    }

    /// Set the directory-structure snapshot.
    pub fn set_directory_structure(&mut self, structure: impl Into<String>) {
        self.directory_structure = structure.into();
    }
}

// ============================================================================
// Queries
// ============================================================================

impl KnowledgeStore {
    pub fn codebase_understanding(&self) -> &str {
        &self.codebase_understanding
    }

    pub fn directory_structure(&self) -> &str {
        &self.directory_structure
    }

    /// Analyzed files ordered by normalized path.
    pub fn analyzed_files(&self) -> impl Iterator<Item = &FileAnalysis> {
        self.analyzed_files.values()
    }

    pub fn analyzed_file(&self, path: &str) -> Option<&FileAnalysis> {
        self.analyzed_files.get(&normalize_path(path))
    }

    pub fn is_file_analyzed(&self, path: &str) -> bool {
        self.analyzed_files.contains_key(&normalize_path(path))
    }

    pub fn analyzed_file_count(&self) -> usize {
        self.analyzed_files.len()
    }

    pub fn sections(&self) -> &[DocumentSection] {
        &self.document_sections
    }

    pub fn insights(&self) -> &[String] {
        &self.insights
    }

    /// Sections grouped by category, categories in first-appearance order and
    /// sections within a category in `order`.
    pub fn sections_by_category(&self) -> Vec<(&str, Vec<&DocumentSection>)> {
        let mut groups: Vec<(&str, Vec<&DocumentSection>)> = Vec::new();
        for section in &self.document_sections {
            match groups.iter_mut().find(|(c, _)| *c == section.category) {
                Some((_, list)) => list.push(section),
                None => groups.push((section.category.as_str(), vec![section])),
            }
        }
        for (_, list) in &mut groups {
            list.sort_by_key(|s| s.order);
        }
        groups
    }

    /// Bounded textual summary for prompt injection.
    ///
    /// Pure function of the current field values: two calls without an
    /// intervening mutation return identical text.
    pub fn summary(&self) -> String {
        let mut out = String::from("## Current Knowledge\n\n");

        out.push_str("### Codebase Understanding\n");
        if self.codebase_understanding.is_empty() {
            out.push_str("(nothing recorded yet)\n");
        } else {
            out.push_str(tail_chars(
                &self.codebase_understanding,
                SUMMARY_MAX_UNDERSTANDING_CHARS,
            ));
            out.push('\n');
        }

        out.push_str(&format!(
            "\n### Analyzed Files ({})\n",
            self.analyzed_files.len()
        ));
        for analysis in self.analyzed_files.values().take(SUMMARY_MAX_FILES) {
            out.push_str(&format!("- {}\n", analysis.path));
        }
        if self.analyzed_files.len() > SUMMARY_MAX_FILES {
            out.push_str(&format!(
                "- ... and {} more\n",
                self.analyzed_files.len() - SUMMARY_MAX_FILES
            ));
        }

        out.push_str(&format!(
            "\n### Documentation Sections ({})\n",
            self.document_sections.len()
        ));
        for section in self.document_sections.iter().take(SUMMARY_MAX_SECTIONS) {
            out.push_str(&format!("- [{}] {}\n", section.category, section.title));
        }
        if self.document_sections.len() > SUMMARY_MAX_SECTIONS {
            out.push_str(&format!(
                "- ... and {} more\n",
                self.document_sections.len() - SUMMARY_MAX_SECTIONS
            ));
        }

        out.push_str(&format!("\n### Insights ({})\n", self.insights.len()));
        let skip = self.insights.len().saturating_sub(SUMMARY_MAX_INSIGHTS);
        for insight in self.insights.iter().skip(skip) {
            out.push_str(&format!("- {}\n", insight));
        }

        out
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Normalize a project-relative path used as a Knowledge Store key.
///
/// Backslashes become `/`, and leading `./`, duplicate slashes and trailing
/// `/` are removed.
pub fn normalize_path(path: &str) -> String {
    let unified = path.trim().replace('\\', "/");
    let parts: Vec<&str> = unified
        .split('/')
        .filter(|p| !p.is_empty() && *p != ".")
        .collect();
    let joined = parts.join("/");
    if unified.starts_with('/') {
        format!("/{}", joined)
    } else {
        joined
    }
}

/// Lowercase, alphanumeric-and-dash form of a name. Empty when `text` has
/// no alphanumeric characters.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut last_dash = true;
    for ch in text.chars() {
        if ch.is_alphanumeric() {
            slug.extend(ch.to_lowercase());
            last_dash = false;
        } else if !last_dash {
            slug.push('-');
            last_dash = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

/// Last `max` characters of `text`, on a char boundary.
fn tail_chars(text: &str, max: usize) -> &str {
    let count = text.chars().count();
    if count <= max {
        return text;
    }
    let skip = count - max;
    match text.char_indices().nth(skip) {
        Some((idx, _)) => &text[idx..],
        None => text,
    }
}
