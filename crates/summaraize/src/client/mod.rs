//! Collaborator clients.
//!
//! - [`ArxivClient`]: arXiv Atom API (metadata, search, PDF download)
//! - [`OllamaClient`]: local LLM runtime (generation, embeddings, startup probe)
//! - [`PdftotextExtractor`]: page text via the poppler `pdftotext` tool
//!
//! Services depend on the traits below so tests can swap in fakes.

mod arxiv;
mod atom;
mod ollama;
mod pdf;

use async_trait::async_trait;

pub use arxiv::{ArxivClient, arxiv_id_from_url};
pub use atom::parse_atom_feed;
pub use ollama::OllamaClient;
pub use pdf::{PdftotextExtractor, split_pages};

use crate::error::ClientResult;
use crate::models::Paper;
use crate::store::PageText;

/// A text-generation model.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Complete a prompt, returning the raw model output.
    async fn complete(&self, prompt: &str) -> ClientResult<String>;
}

/// A sentence-embedding model.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed each input text.
    async fn embed(&self, texts: &[String]) -> ClientResult<Vec<Vec<f32>>>;
}

/// A searchable paper catalogue.
#[async_trait]
pub trait PaperSource: Send + Sync {
    /// Fetch one paper from its abstract page URL.
    async fn fetch_by_url(&self, url: &str) -> ClientResult<Paper>;

    /// Search the catalogue, best matches first.
    async fn search(&self, query: &str, max_results: usize) -> ClientResult<Vec<Paper>>;

    /// Download a paper's PDF.
    async fn download_pdf(&self, paper: &Paper) -> ClientResult<Vec<u8>>;
}

/// Extracts per-page text from a PDF file.
#[async_trait]
pub trait PageExtractor: Send + Sync {
    /// Page number (1-based) to page text.
    async fn extract_pages(&self, pdf: &std::path::Path) -> ClientResult<PageText>;
}
