//! Paper summaries from the local language model.

use std::sync::Arc;

use crate::client::LanguageModel;
use crate::error::ClientResult;
use crate::models::SummaryEntry;
use crate::store::SummaryCache;

/// Value used for a field the model did not produce.
pub const PLACEHOLDER: &str = "...";

/// Model output split into fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedSummary {
    /// Parsed fields, placeholders where missing.
    pub entry: SummaryEntry,
    /// Names of fields whose line prefix was absent or empty.
    pub missing: Vec<&'static str>,
}

/// Summary prompt for one abstract.
#[must_use]
pub fn summary_prompt(abstract_text: &str) -> String {
    format!(
        "Summarize this research abstract in 1-2 concise sentences and give 3-5 key terms:\n\n\
         {abstract_text}\n\n\
         Return only the summary followed by keywords in this format:\n\
         Summary: ...\n\
         Keywords: ..."
    )
}

/// Pick the `Summary:` and `Keywords:` lines out of free-text output.
///
/// Prefixes match case-insensitively and may be wrapped in Markdown bold.
/// The first matching line wins. A missing or empty field becomes [`PLACEHOLDER`].
#[must_use]
pub fn parse_summary_output(output: &str) -> ParsedSummary {
    let mut missing = Vec::new();

    let mut field = |prefix: &str, name: &'static str| {
        let value = output.lines().find_map(|line| strip_field_prefix(line, prefix));
        match value {
            Some(v) if !v.is_empty() => v.to_string(),
            _ => {
                missing.push(name);
                PLACEHOLDER.to_string()
            }
        }
    };

    let summary = field("summary:", "summary");
    let keywords = field("keywords:", "keywords");

    ParsedSummary { entry: SummaryEntry { summary, keywords }, missing }
}

fn strip_field_prefix<'a>(line: &'a str, prefix: &str) -> Option<&'a str> {
    let line = line.trim().trim_start_matches(['*', '#', ' ']);
    let head = line.get(..prefix.len())?;
    if !head.eq_ignore_ascii_case(prefix) {
        return None;
    }
    Some(line[prefix.len()..].trim_start_matches(['*', ' ']).trim())
}

/// Generates and caches summaries.
#[derive(Clone)]
pub struct Summarizer {
    llm: Arc<dyn LanguageModel>,
}

impl Summarizer {
    /// Create a summarizer backed by `llm`.
    #[must_use]
    pub fn new(llm: Arc<dyn LanguageModel>) -> Self {
        Self { llm }
    }

    /// Cached summary for `paper_id`, generating and caching it on first use.
    pub async fn summarize(
        &self,
        paper_id: &str,
        abstract_text: &str,
        cache: &mut SummaryCache,
    ) -> ClientResult<SummaryEntry> {
        if let Some(entry) = cache.get(paper_id) {
            return Ok(entry.clone());
        }

        tracing::info!(paper = %paper_id, "Generating summary");
        let output = self.llm.complete(&summary_prompt(abstract_text)).await?;

        let parsed = parse_summary_output(output.trim());
        if !parsed.missing.is_empty() {
            tracing::warn!(paper = %paper_id, missing = ?parsed.missing, "Model output lacked expected fields");
        }

        cache.insert(paper_id.to_string(), parsed.entry.clone());
        Ok(parsed.entry)
    }
}

impl std::fmt::Debug for Summarizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Summarizer").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_well_formed_output() {
        let parsed = parse_summary_output(
            "Here you go.\nSummary: FHE can be verified cheaply.\nKeywords: FHE, verification, ZKP",
        );
        assert_eq!(parsed.entry.summary, "FHE can be verified cheaply.");
        assert_eq!(parsed.entry.keywords, "FHE, verification, ZKP");
        assert!(parsed.missing.is_empty());
    }

    #[test]
    fn test_parse_case_and_bold_markers() {
        let parsed = parse_summary_output("**SUMMARY:** A result.\n**keywords:** a, b");
        assert_eq!(parsed.entry.summary, "A result.");
        assert_eq!(parsed.entry.keywords, "a, b");
    }

    #[test]
    fn test_parse_missing_fields_fall_back() {
        let parsed = parse_summary_output("I cannot help with that.");
        assert_eq!(parsed.entry.summary, PLACEHOLDER);
        assert_eq!(parsed.entry.keywords, PLACEHOLDER);
        assert_eq!(parsed.missing, vec!["summary", "keywords"]);

        let parsed = parse_summary_output("Summary: only this\nKeywords:");
        assert_eq!(parsed.entry.summary, "only this");
        assert_eq!(parsed.entry.keywords, PLACEHOLDER);
        assert_eq!(parsed.missing, vec!["keywords"]);
    }

    #[test]
    fn test_prompt_embeds_abstract() {
        let prompt = summary_prompt("We study FHE.");
        assert!(prompt.contains("We study FHE."));
        assert!(prompt.ends_with("Keywords: ..."));
    }
}
