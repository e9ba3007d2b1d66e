//! Paper suggestions from project metadata.
//!
//! 1. Ask the model for 3-5 search queries from the project's title, description and keywords.
//! 2. Run each query against the paper source.
//! 3. Keep candidates the model judges relevant ("yes" anywhere in its answer).

use std::collections::HashSet;
use std::sync::{Arc, LazyLock};

use regex::Regex;

use crate::client::{LanguageModel, PaperSource};
use crate::error::ClientResult;
use crate::models::{Paper, ProjectConfig};

/// Queries kept from the model's answer.
pub const MAX_QUERIES: usize = 5;

static LIST_MARKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:[-*•]|\d+[.)])\s*").expect("valid list marker regex"));

/// Query-generation prompt.
#[must_use]
pub fn query_prompt(config: &ProjectConfig, focus: Option<&str>) -> String {
    let mut prompt = format!(
        "You are helping find academic research papers for a project.\n\
         Project Title: {}\n\
         Project Description: {}\n\
         Keywords: {}\n",
        config.title,
        config.description,
        config.keywords_joined()
    );
    if let Some(focus) = focus.map(str::trim).filter(|f| !f.is_empty()) {
        prompt.push_str(&format!("Current focus: {focus}\n"));
    }
    prompt.push_str(
        "\nBased on this information, generate 3 to 5 concise search queries that could be used \
         to find relevant papers on arXiv or the web.\n\
         Only output the queries, one per line, no numbering.",
    );
    prompt
}

/// Non-empty lines of the model's answer, list markers and quotes removed, at most [`MAX_QUERIES`].
#[must_use]
pub fn parse_queries(output: &str) -> Vec<String> {
    output
        .lines()
        .map(|line| LIST_MARKER_RE.replace(line.trim(), "").trim().trim_matches('"').trim().to_string())
        .filter(|line| !line.is_empty())
        .take(MAX_QUERIES)
        .collect()
}

/// Relevance-judgement prompt for one candidate.
#[must_use]
pub fn relevance_prompt(config: &ProjectConfig, paper: &Paper) -> String {
    format!(
        "Project: {}\n\
         Description: {}\n\n\
         Candidate Paper Title: {}\n\
         Abstract: {}\n\n\
         Is this paper directly relevant to the project described above? Only answer YES or NO.",
        config.title, config.description, paper.title, paper.summary
    )
}

/// A judgement counts as relevant when it contains "yes" in any case.
#[must_use]
pub fn is_relevant(judgement: &str) -> bool {
    judgement.to_lowercase().contains("yes")
}

/// Stable ID for a candidate: its own ID, else its link, else an MD5 of its title.
#[must_use]
pub fn fallback_id(paper: &Paper) -> String {
    use md5::{Digest, Md5};

    if !paper.id.is_empty() {
        return paper.id.clone();
    }
    if !paper.link.is_empty() {
        return paper.link.clone();
    }
    format!("{:x}", Md5::digest(paper.title.as_bytes()))
}

/// Suggests papers for a project.
#[derive(Clone)]
pub struct Suggester {
    llm: Arc<dyn LanguageModel>,
    source: Arc<dyn PaperSource>,
    per_query: usize,
}

impl Suggester {
    /// Create a suggester fetching `per_query` candidates per generated query.
    #[must_use]
    pub fn new(llm: Arc<dyn LanguageModel>, source: Arc<dyn PaperSource>, per_query: usize) -> Self {
        Self { llm, source, per_query }
    }

    /// Relevant, deduplicated candidates not among `exclude`.
    ///
    /// A failed source query is logged and skipped; model failures abort.
    pub async fn suggest(
        &self,
        config: &ProjectConfig,
        focus: Option<&str>,
        exclude: &HashSet<String>,
    ) -> ClientResult<Vec<Paper>> {
        let output = self.llm.complete(&query_prompt(config, focus)).await?;
        let queries = parse_queries(&output);
        tracing::info!(project = %config.title, ?queries, "Generated suggestion queries");

        let mut seen: HashSet<String> = exclude.clone();
        let mut suggested = Vec::new();

        for query in &queries {
            let candidates = match self.source.search(query, self.per_query).await {
                Ok(candidates) => candidates,
                Err(e) => {
                    tracing::warn!(query = %query, error = %e, "Suggestion query failed");
                    continue;
                }
            };

            for candidate in candidates {
                let mut paper = candidate.cleaned();
                paper.id = fallback_id(&paper);
                paper.citation_id = None;

                if !seen.insert(paper.id.clone()) {
                    continue;
                }

                let judgement = self.llm.complete(&relevance_prompt(config, &paper)).await?;
                if is_relevant(&judgement) {
                    tracing::debug!(paper = %paper.id, "Candidate judged relevant");
                    suggested.push(paper);
                }
            }
        }

        Ok(suggested)
    }
}

impl std::fmt::Debug for Suggester {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Suggester").field("per_query", &self.per_query).finish_non_exhaustive()
    }
}
