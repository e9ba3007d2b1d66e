//! Shared fakes for integration tests.
#![allow(dead_code)]

use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use tempfile::TempDir;

use summaraize::client::{Embedder, LanguageModel, PageExtractor, PaperSource};
use summaraize::error::{ClientError, ClientResult};
use summaraize::models::{Paper, ProjectConfig};
use summaraize::store::{PageText, ProjectStore};

type Responder = Box<dyn Fn(&str) -> ClientResult<String> + Send + Sync>;

/// Language model answering prompts through a closure and recording them.
pub struct FakeModel {
    respond: Responder,
    prompts: Mutex<Vec<String>>,
}

impl FakeModel {
    pub fn new(respond: impl Fn(&str) -> ClientResult<String> + Send + Sync + 'static) -> Self {
        Self { respond: Box::new(respond), prompts: Mutex::new(Vec::new()) }
    }

    /// Always answers `text`.
    pub fn constant(text: &str) -> Self {
        let text = text.to_string();
        Self::new(move |_| Ok(text.clone()))
    }

    /// Always fails as if the runtime were down.
    pub fn unavailable() -> Self {
        Self::new(|_| Err(ClientError::unavailable("http://localhost:11434", "connection refused")))
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl LanguageModel for FakeModel {
    async fn complete(&self, prompt: &str) -> ClientResult<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        (self.respond)(prompt)
    }
}

/// Embeds texts as word counts over a fixed vocabulary.
pub struct VocabEmbedder {
    vocab: Vec<String>,
}

impl VocabEmbedder {
    pub fn new(vocab: &[&str]) -> Self {
        Self { vocab: vocab.iter().map(|w| (*w).to_string()).collect() }
    }
}

#[async_trait]
impl Embedder for VocabEmbedder {
    async fn embed(&self, texts: &[String]) -> ClientResult<Vec<Vec<f32>>> {
        Ok(texts
            .iter()
            .map(|text| {
                let lower = text.to_lowercase();
                self.vocab.iter().map(|w| lower.matches(w.as_str()).count() as f32).collect()
            })
            .collect())
    }
}

/// Paper source with canned search results and PDFs.
#[derive(Default)]
pub struct FakeSource {
    pub papers: Vec<Paper>,
    pub fail_queries: Vec<String>,
    pub pdf_downloads: Mutex<Vec<String>>,
}

#[async_trait]
impl PaperSource for FakeSource {
    async fn fetch_by_url(&self, url: &str) -> ClientResult<Paper> {
        self.papers
            .iter()
            .find(|p| url.ends_with(&p.id))
            .cloned()
            .ok_or_else(|| ClientError::not_found(url))
    }

    async fn search(&self, query: &str, max_results: usize) -> ClientResult<Vec<Paper>> {
        if self.fail_queries.iter().any(|q| q == query) {
            return Err(ClientError::server(503, "unavailable"));
        }
        Ok(self.papers.iter().take(max_results).cloned().collect())
    }

    async fn download_pdf(&self, paper: &Paper) -> ClientResult<Vec<u8>> {
        self.pdf_downloads.lock().unwrap().push(paper.id.clone());
        Ok(format!("%PDF {}", paper.id).into_bytes())
    }
}

/// Extractor returning fixed pages per PDF file name. Files that do not
/// start with the PDF magic are unreadable.
#[derive(Default)]
pub struct FakeExtractor {
    pub pages: Vec<(String, PageText)>,
    pub extractions: Mutex<usize>,
}

#[async_trait]
impl PageExtractor for FakeExtractor {
    async fn extract_pages(&self, pdf: &Path) -> ClientResult<PageText> {
        *self.extractions.lock().unwrap() += 1;
        let bytes = std::fs::read(pdf).map_err(|e| ClientError::process("pdftotext", e.to_string()))?;
        if !bytes.starts_with(b"%PDF") {
            return Err(ClientError::process("pdftotext", "not a PDF"));
        }
        let name = pdf.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
        self.pages
            .iter()
            .find(|(stem, _)| stem == name)
            .map(|(_, pages)| pages.clone())
            .ok_or_else(|| ClientError::process("pdftotext", format!("cannot read {name}")))
    }
}

pub fn paper(id: &str) -> Paper {
    Paper {
        id: id.to_string(),
        title: format!("Paper {id}"),
        authors: "Alice Smith, Bob Jones".to_string(),
        summary: format!("Abstract of {id}."),
        published: "2023-01-17T18:58:21Z".to_string(),
        link: format!("http://arxiv.org/abs/{id}v1"),
        citation_id: None,
    }
}

/// Temporary store holding one empty project.
pub fn store_with_project(title: &str) -> (TempDir, ProjectStore) {
    let dir = tempfile::tempdir().unwrap();
    let store = ProjectStore::open(dir.path()).unwrap();
    store.create_project(&ProjectConfig::new(title)).unwrap();
    (dir, store)
}
