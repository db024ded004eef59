//! Site Generator
//!
//! Renders the final Knowledge Store to disk. The bundled implementation
//! writes a plain Markdown tree:
//!
//! ```text
//! <output>/index.md
//! <output>/<category-slug>/00-<title-slug>.md
//! <output>/insights.md
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, info};

use docsmith_core::{slugify, KnowledgeStore};

use crate::utils::error::{AppError, AppResult};

pub const INDEX_FILE: &str = "index.md";
pub const INSIGHTS_FILE: &str = "insights.md";

/// Consumes the finished Knowledge Store.
#[async_trait]
pub trait SiteGenerator: Send + Sync {
    async fn generate(&self, memory: &KnowledgeStore) -> AppResult<()>;
}

/// One section file in the generated tree.
#[derive(Debug, Clone, PartialEq)]
struct PageEntry {
    title: String,
    /// Path relative to the output directory
    path: String,
}

/// Writes a Markdown documentation tree.
pub struct MarkdownSiteGenerator {
    output_dir: PathBuf,
    project_name: String,
}

impl MarkdownSiteGenerator {
    pub fn new(output_dir: impl Into<PathBuf>, project_name: impl Into<String>) -> Self {
        Self {
            output_dir: output_dir.into(),
            project_name: project_name.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    async fn write(&self, relative: &str, content: &str) -> AppResult<()> {
        let path = self.output_dir.join(relative);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, content).await.map_err(|e| {
            AppError::generation(format!("failed to write {}: {}", path.display(), e))
        })?;
        debug!(path = %path.display(), "wrote page");
        Ok(())
    }

    fn render_index(&self, memory: &KnowledgeStore, toc: &[(String, Vec<PageEntry>)]) -> String {
        let mut out = format!("# {}\n\n## Overview\n\n", self.project_name);
        let overview = memory.directory_structure().trim();
        out.push_str(if overview.is_empty() {
            "_No overview available._"
        } else {
            overview
        });
        out.push('\n');

        let understanding = memory.codebase_understanding().trim();
        if !understanding.is_empty() {
            out.push_str("\n## Codebase Understanding\n\n");
            out.push_str(understanding);
            out.push('\n');
        }

        out.push_str("\n## Contents\n\n");
        for (category, pages) in toc {
            out.push_str(&format!("### {}\n\n", category));
            for page in pages {
                out.push_str(&format!("- [{}]({})\n", page.title, page.path));
            }
            out.push('\n');
        }
        out.push_str(&format!("- [Insights]({})\n", INSIGHTS_FILE));
        out
    }
}

fn render_page(title: &str, content: &str) -> String {
    let body = content.trim();
    if body.starts_with('#') {
        format!("{}\n", body)
    } else {
        format!("# {}\n\n{}\n", title, body)
    }
}

fn render_insights(insights: &[String]) -> String {
    let mut out = String::from("# Insights\n\n");
    if insights.is_empty() {
        out.push_str("_No insights recorded._\n");
    }
    for insight in insights {
        out.push_str(&format!("- {}\n", insight));
    }
    out
}

fn or_default(slug: String, fallback: &str) -> String {
    if slug.is_empty() {
        fallback.to_string()
    } else {
        slug
    }
}

#[async_trait]
impl SiteGenerator for MarkdownSiteGenerator {
    async fn generate(&self, memory: &KnowledgeStore) -> AppResult<()> {
        tokio::fs::create_dir_all(&self.output_dir).await?;

        // Categories whose names slug to the same directory share one counter
        let mut counters: HashMap<String, usize> = HashMap::new();
        let mut toc = Vec::new();

        for (category, sections) in memory.sections_by_category() {
            let dir = or_default(slugify(category), "general");
            let mut pages = Vec::with_capacity(sections.len());
            for section in sections {
                let counter = counters.entry(dir.clone()).or_insert(0);
                let file = format!(
                    "{}/{:02}-{}.md",
                    dir,
                    counter,
                    or_default(slugify(&section.title), "section")
                );
                *counter += 1;

                self.write(&file, &render_page(&section.title, &section.content))
                    .await?;
                pages.push(PageEntry {
                    title: section.title.clone(),
                    path: file,
                });
            }
            toc.push((category.to_string(), pages));
        }

        self.write(INSIGHTS_FILE, &render_insights(memory.insights()))
            .await?;
        self.write(INDEX_FILE, &self.render_index(memory, &toc)).await?;

        info!(
            output = %self.output_dir.display(),
            sections = memory.sections().len(),
            "documentation generated"
        );
        Ok(())
    }
}
