//! Semantic search over the full text of a project's papers.
//!
//! Pages come from the project's page cache, or are extracted from the
//! cached PDF (downloaded on first use). Each page is split into
//! paragraph chunks, chunks are ranked by cosine similarity to the query
//! embedding, and the model extracts the answering sentence from each of
//! the top chunks.

use std::sync::Arc;

use serde::Serialize;

use crate::client::{Embedder, LanguageModel, PageExtractor, PaperSource};
use crate::error::ClientResult;
use crate::models::Paper;
use crate::store::{PageText, ProjectStore};

/// Chunks shorter than this are headers, captions and page furniture.
pub const MIN_CHUNK_CHARS: usize = 50;

/// Texts per embedding request.
const EMBED_BATCH: usize = 32;

/// One answered passage.
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    /// Sentence(s) the model extracted, or "Not found.".
    pub answer: String,
    /// Passage the answer came from.
    pub chunk: String,
    /// Paper containing the passage.
    pub paper: Paper,
    /// 1-based page number.
    pub page: u32,
    /// Cosine similarity to the query.
    pub score: f32,
}

#[derive(Debug, Clone)]
struct Candidate<'a> {
    chunk: String,
    paper: &'a Paper,
    page: u32,
}

/// Paragraph chunks of a page worth embedding.
#[must_use]
pub fn chunk_page(text: &str) -> Vec<String> {
    text.split("\n\n")
        .map(str::trim)
        .filter(|chunk| chunk.chars().count() > MIN_CHUNK_CHARS)
        .map(String::from)
        .collect()
}

/// Compute cosine similarity between two vectors.
#[must_use]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

/// Answer-extraction prompt for one passage.
#[must_use]
pub fn answer_prompt(query: &str, chunk: &str, paper: &Paper, page: u32) -> String {
    format!(
        "You are an academic research assistant. Given a question and a passage from a paper,\n\
         extract the exact sentence(s) from the passage that best answer the question.\n\
         If no answer is found in the passage, reply: \"Not found.\"\n\n\
         Question:\n{query}\n\n\
         Paper: {} (Page {page})\n\n\
         Passage:\n{chunk}\n\n\
         Answer:\n",
        paper.title
    )
}

/// Semantic search service.
#[derive(Clone)]
pub struct Searcher {
    llm: Arc<dyn LanguageModel>,
    embedder: Arc<dyn Embedder>,
    source: Arc<dyn PaperSource>,
    extractor: Arc<dyn PageExtractor>,
}

impl Searcher {
    /// Create a searcher from its collaborators.
    #[must_use]
    pub fn new(
        llm: Arc<dyn LanguageModel>,
        embedder: Arc<dyn Embedder>,
        source: Arc<dyn PaperSource>,
        extractor: Arc<dyn PageExtractor>,
    ) -> Self {
        Self { llm, embedder, source, extractor }
    }

    /// Answer `query` from the `top_k` best-matching passages of `papers`.
    ///
    /// Papers whose text cannot be obtained are logged and skipped.
    pub async fn search(
        &self,
        store: &ProjectStore,
        project: &str,
        query: &str,
        papers: &[Paper],
        top_k: usize,
    ) -> ClientResult<Vec<SearchHit>> {
        let mut candidates = Vec::new();
        for paper in papers {
            let Some(pages) = self.pages_for(store, project, paper).await else {
                continue;
            };
            for (page, text) in pages {
                candidates.extend(chunk_page(&text).into_iter().map(|chunk| Candidate {
                    chunk,
                    paper,
                    page,
                }));
            }
        }

        if candidates.is_empty() || top_k == 0 {
            return Ok(Vec::new());
        }

        let query_vec = self.embedder.embed(&[query.to_string()]).await?.pop().unwrap_or_default();

        let texts: Vec<String> = candidates.iter().map(|c| c.chunk.clone()).collect();
        let mut vectors = Vec::with_capacity(texts.len());
        for batch in texts.chunks(EMBED_BATCH) {
            vectors.extend(self.embedder.embed(batch).await?);
        }

        let mut scored: Vec<(f32, Candidate<'_>)> = candidates
            .into_iter()
            .zip(vectors.iter())
            .map(|(candidate, vec)| (cosine_similarity(&query_vec, vec), candidate))
            .collect();
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(top_k);

        tracing::info!(project = %project, query = %query, hits = scored.len(), "Ranked passages");

        let mut hits = Vec::with_capacity(scored.len());
        for (score, candidate) in scored {
            let prompt = answer_prompt(query, &candidate.chunk, candidate.paper, candidate.page);
            let answer = self.llm.complete(&prompt).await?.trim().to_string();
            hits.push(SearchHit {
                answer,
                chunk: candidate.chunk,
                paper: candidate.paper.clone(),
                page: candidate.page,
                score,
            });
        }

        Ok(hits)
    }

    /// Page text for a paper: page cache, else cached PDF, else download.
    ///
    /// A cached PDF that cannot be read is deleted and downloaded again.
    async fn pages_for(&self, store: &ProjectStore, project: &str, paper: &Paper) -> Option<PageText> {
        match store.load_page_cache(project, &paper.id) {
            Ok(Some(pages)) => return Some(pages),
            Ok(None) => {}
            Err(e) => tracing::warn!(paper = %paper.id, error = %e, "Ignoring unreadable page cache"),
        }

        let pdf = match store.pdf_path(project, &paper.id) {
            Ok(path) => path,
            Err(e) => {
                tracing::warn!(paper = %paper.id, error = %e, "No PDF location");
                return None;
            }
        };

        let pages = if pdf.exists() {
            match self.extractor.extract_pages(&pdf).await {
                Ok(pages) => pages,
                Err(e) => {
                    tracing::warn!(paper = %paper.id, error = %e, "Discarding unreadable PDF");
                    discard_pdf(&pdf);
                    self.download_and_extract(store, project, paper).await?
                }
            }
        } else {
            self.download_and_extract(store, project, paper).await?
        };

        if let Err(e) = store.save_page_cache(project, &paper.id, &pages) {
            tracing::warn!(paper = %paper.id, error = %e, "Failed to cache page text");
        }
        Some(pages)
    }

    async fn download_and_extract(
        &self,
        store: &ProjectStore,
        project: &str,
        paper: &Paper,
    ) -> Option<PageText> {
        let bytes = match self.source.download_pdf(paper).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(paper = %paper.id, error = %e, "PDF download failed");
                return None;
            }
        };
        let pdf = match store.save_pdf(project, &paper.id, &bytes) {
            Ok(path) => path,
            Err(e) => {
                tracing::warn!(paper = %paper.id, error = %e, "Failed to save PDF");
                return None;
            }
        };

        match self.extractor.extract_pages(&pdf).await {
            Ok(pages) => Some(pages),
            Err(e) => {
                tracing::warn!(paper = %paper.id, error = %e, "Text extraction failed");
                discard_pdf(&pdf);
                None
            }
        }
    }
}

fn discard_pdf(path: &std::path::Path) {
    if let Err(e) = std::fs::remove_file(path) {
        tracing::warn!(path = %path.display(), error = %e, "Failed to remove PDF");
    }
}

impl std::fmt::Debug for Searcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Searcher").finish_non_exhaustive()
    }
}
