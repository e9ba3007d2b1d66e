//! Export tools: export_citations.

use serde_json::json;

use super::{McpTool, ToolContext};
use crate::error::ToolResult;
use crate::models::{ExportCitationsInput, ExportFormat, Paper};

/// Citation export tool.
pub struct ExportCitationsTool;

#[async_trait::async_trait]
impl McpTool for ExportCitationsTool {
    fn name(&self) -> &'static str {
        "export_citations"
    }

    fn description(&self) -> &'static str {
        "Export the open project's reference list ordered by citation number, \
         as numbered plain text or BibTeX keyed by citation number."
    }

    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "format": {
                    "type": "string",
                    "enum": ["plain", "bibtex"],
                    "default": "plain"
                }
            }
        })
    }

    async fn execute(&self, ctx: &ToolContext, input: serde_json::Value) -> ToolResult<String> {
        let params: ExportCitationsInput = serde_json::from_value(input)?;

        let session = ctx.session().await;
        let registry = session.registry()?;

        let papers = by_citation_id(registry.papers());
        if papers.is_empty() {
            return Ok(format!("No papers in '{}' to export.", registry.project()));
        }

        let output = match params.format {
            ExportFormat::Plain => format_plain(&papers),
            ExportFormat::Bibtex => format_bibtex(&papers),
        };

        Ok(output)
    }
}

/// Papers ordered by citation number, unassigned last.
fn by_citation_id(papers: &[Paper]) -> Vec<&Paper> {
    let mut sorted: Vec<&Paper> = papers.iter().collect();
    sorted.sort_by_key(|p| (p.citation_id.is_none(), p.citation_id));
    sorted
}

/// Format papers as a numbered reference list.
fn format_plain(papers: &[&Paper]) -> String {
    let mut output = String::new();

    for paper in papers {
        let label = paper.citation_id.map_or_else(|| "-".to_string(), |id| id.to_string());
        let authors = paper.short_authors();
        output.push_str(&format!(
            "[{label}] {}. {}.",
            authors.trim_end_matches('.'),
            paper.title_or_default().trim_end_matches('.')
        ));

        if let Some(year) = paper.year() {
            output.push_str(&format!(" {year}."));
        }
        if !paper.link.is_empty() {
            output.push_str(&format!(" {}", paper.link));
        }
        output.push('\n');
    }

    output
}

/// Format papers as BibTeX, keyed `ref<citation number>`.
fn format_bibtex(papers: &[&Paper]) -> String {
    let mut output = String::new();

    for paper in papers {
        let key = paper.citation_id.map_or_else(
            || paper.id.chars().filter(char::is_ascii_alphanumeric).collect(),
            |id| format!("ref{id}"),
        );

        output.push_str(&format!("@article{{{key},\n"));
        output.push_str(&format!("  title = {{{}}},\n", escape_bibtex(paper.title_or_default())));

        let authors = paper.author_list().join(" and ");
        if !authors.is_empty() {
            output.push_str(&format!("  author = {{{}}},\n", escape_bibtex(&authors)));
        }

        if let Some(year) = paper.year() {
            output.push_str(&format!("  year = {{{year}}},\n"));
        }

        if !paper.id.is_empty() && paper.link.contains("arxiv.org") {
            output.push_str(&format!("  eprint = {{{}}},\n", paper.id));
            output.push_str("  archivePrefix = {arXiv},\n");
        }

        if !paper.link.is_empty() {
            output.push_str(&format!("  url = {{{}}},\n", paper.link));
        }

        output.push_str("}\n\n");
    }

    output
}

/// Escape a string for BibTeX output.
fn escape_bibtex(s: &str) -> String {
    s.replace('\\', "\\textbackslash{}")
        .replace('{', "\\{")
        .replace('}', "\\}")
        .replace('&', "\\&")
        .replace('%', "\\%")
        .replace('$', "\\$")
        .replace('#', "\\#")
        .replace('_', "\\_")
}
