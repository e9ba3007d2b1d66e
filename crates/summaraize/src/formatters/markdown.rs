//! Markdown output formatting.

use std::borrow::Cow;

use crate::models::{Paper, ProjectConfig, SummaryState};
use crate::services::SearchHit;

/// Shown under paper lists whose citation numbers are not exactly `1..=N`.
pub const GAP_WARNING: &str =
    "> **Warning**: citation numbers have gaps. Use set_citation_id to renumber if needed.";

const ABSTRACT_PREVIEW_CHARS: usize = 300;

fn truncate_chars(text: &str, max: usize) -> Cow<'_, str> {
    match text.char_indices().nth(max) {
        Some((end, _)) => Cow::Owned(format!("{}...", &text[..end])),
        None => Cow::Borrowed(text),
    }
}

fn citation_label(paper: &Paper) -> String {
    paper.citation_id.map_or_else(|| "[-]".to_string(), |id| format!("[{id}]"))
}

/// Format the open project's paper list as Markdown.
#[must_use]
pub fn format_papers_markdown(project: &str, papers: &[Paper], has_gaps: bool) -> String {
    if papers.is_empty() {
        return format!("No papers in '{project}' yet.");
    }

    let mut output = format!("# {project} ({} papers)\n\n", papers.len());

    for paper in papers {
        output.push_str(&format!(
            "- {} **{}** | {} | {} | `{}`\n",
            citation_label(paper),
            paper.title_or_default(),
            paper.short_authors(),
            paper.published_date(),
            paper.id
        ));
    }

    if has_gaps {
        output.push('\n');
        output.push_str(GAP_WARNING);
        output.push('\n');
    }

    output
}

/// Format one paper with its summary state as Markdown.
#[must_use]
pub fn format_paper_markdown(paper: &Paper, state: &SummaryState) -> String {
    let mut output = format!("## {} {}\n\n", citation_label(paper), paper.title_or_default());

    if !paper.authors.is_empty() {
        output.push_str(&format!("**Authors**: {}\n\n", paper.authors));
    }

    output.push_str(&format!("**Published**: {} | **ID**: `{}`\n\n", paper.published_date(), paper.id));

    if !paper.link.is_empty() {
        output.push_str(&format!("**Link**: {}\n\n", paper.link));
    }

    match state {
        SummaryState::Ready(entry) => {
            output.push_str(&format!("> **Summary**: {}\n>\n> **Keywords**: {}\n\n", entry.summary, entry.keywords));
        }
        SummaryState::Pending => output.push_str("_Summary pending. Run summarize_papers._\n\n"),
        SummaryState::Failed(reason) => output.push_str(&format!("_Summary failed: {reason}_\n\n")),
        SummaryState::Idle => {}
    }

    if !paper.summary.is_empty() {
        output.push_str(&format!(
            "**Abstract**: {}\n",
            truncate_chars(&paper.summary, ABSTRACT_PREVIEW_CHARS)
        ));
    }

    output
}

/// Format project names, marking the open one.
#[must_use]
pub fn format_projects_markdown(names: &[String], open: Option<&str>) -> String {
    if names.is_empty() {
        return "No projects yet. Use create_project to start one.".to_string();
    }

    let mut output = format!("# Projects ({})\n\n", names.len());
    for name in names {
        if open == Some(name.as_str()) {
            output.push_str(&format!("- **{name}** (open)\n"));
        } else {
            output.push_str(&format!("- {name}\n"));
        }
    }
    output
}

/// Format project metadata.
#[must_use]
pub fn format_project_markdown(config: &ProjectConfig, paper_count: usize) -> String {
    let mut output = format!("# {}\n\n", config.title);
    if !config.description.is_empty() {
        output.push_str(&format!("{}\n\n", config.description));
    }
    if !config.keywords.is_empty() {
        output.push_str(&format!("**Keywords**: {}\n\n", config.keywords_joined()));
    }
    output.push_str(&format!("**Papers**: {paper_count}\n"));
    output
}

/// Format a suggestion list, numbered for accept_suggestion.
#[must_use]
pub fn format_suggestions_markdown(papers: &[Paper]) -> String {
    if papers.is_empty() {
        return "No relevant papers found.".to_string();
    }

    let mut output = format!("# Suggestions ({})\n\n", papers.len());
    for (i, paper) in papers.iter().enumerate() {
        output.push_str(&format!("## {}. {}\n\n", i + 1, paper.title_or_default()));
        output.push_str(&format!("{} | {}\n\n", paper.short_authors(), paper.published_date()));
        if !paper.link.is_empty() {
            output.push_str(&format!("{}\n\n", paper.link));
        }
        if !paper.summary.is_empty() {
            output.push_str(&format!("{}\n\n", truncate_chars(&paper.summary, ABSTRACT_PREVIEW_CHARS)));
        }
    }
    output.push_str("Use accept_suggestion with the number to add a paper.\n");
    output
}

/// Format semantic search answers.
#[must_use]
pub fn format_search_hits_markdown(query: &str, hits: &[SearchHit]) -> String {
    if hits.is_empty() {
        return format!("No passages found for \"{query}\".");
    }

    let mut output = format!("# Results for \"{query}\"\n\n");
    for (i, hit) in hits.iter().enumerate() {
        output.push_str(&format!(
            "## {}. {} (page {}, score {:.3})\n\n",
            i + 1,
            hit.paper.title_or_default(),
            hit.page,
            hit.score
        ));
        output.push_str(&format!("**Answer**: {}\n\n", hit.answer));
        output.push_str(&format!("> {}\n\n", truncate_chars(&hit.chunk, ABSTRACT_PREVIEW_CHARS)));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SummaryEntry;

    fn paper(id: &str, citation_id: Option<u32>) -> Paper {
        Paper {
            id: id.to_string(),
            title: format!("Paper {id}"),
            authors: "Alice, Bob, Carol".to_string(),
            published: "2023-01-17T18:58:21Z".to_string(),
            citation_id,
            ..Default::default()
        }
    }

    #[test]
    fn test_papers_list_with_gap_warning() {
        let papers = vec![paper("a", Some(1)), paper("b", Some(3))];
        let output = format_papers_markdown("Quantum", &papers, true);

        assert!(output.contains("# Quantum (2 papers)"));
        assert!(output.contains("- [1] **Paper a** | Alice, Bob, et al. | 2023-01-17 | `a`"));
        assert!(output.contains(GAP_WARNING));

        let output = format_papers_markdown("Quantum", &papers, false);
        assert!(!output.contains(GAP_WARNING));
    }

    #[test]
    fn test_empty_list() {
        assert_eq!(format_papers_markdown("Q", &[], false), "No papers in 'Q' yet.");
    }

    #[test]
    fn test_paper_details_states() {
        let p = paper("a", Some(2));
        let entry = SummaryEntry { summary: "Short.".to_string(), keywords: "x, y".to_string() };

        let ready = format_paper_markdown(&p, &SummaryState::Ready(entry));
        assert!(ready.starts_with("## [2] Paper a"));
        assert!(ready.contains("**Summary**: Short."));

        let pending = format_paper_markdown(&p, &SummaryState::Pending);
        assert!(pending.contains("pending"));

        let failed = format_paper_markdown(&p, &SummaryState::Failed("boom".to_string()));
        assert!(failed.contains("Summary failed: boom"));
    }

    #[test]
    fn test_truncate_is_char_safe() {
        let text = "é".repeat(10);
        assert_eq!(truncate_chars(&text, 3), "ééé...");
        assert_eq!(truncate_chars(&text, 10), text);
    }

    #[test]
    fn test_projects_marks_open() {
        let names = vec!["A".to_string(), "B".to_string()];
        let output = format_projects_markdown(&names, Some("B"));
        assert!(output.contains("- A\n"));
        assert!(output.contains("- **B** (open)"));
    }
}
