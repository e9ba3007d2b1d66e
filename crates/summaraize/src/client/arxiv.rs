//! arXiv API client.
//!
//! Metadata and search go through the Atom endpoint
//! (`http://export.arxiv.org/api/query`); PDFs come from `arxiv.org/pdf`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use super::PaperSource;
use super::atom::parse_atom_feed;
use crate::config::Config;
use crate::error::{ClientError, ClientResult};
use crate::models::{Paper, strip_arxiv_version};

/// arXiv API client.
#[derive(Clone)]
pub struct ArxivClient {
    /// HTTP client.
    client: Client,

    /// Atom query endpoint.
    api_url: String,

    /// PDF base URL.
    pdf_url: String,

    /// Delay before each request.
    rate_limit_delay: Duration,

    /// Request timeout, reported on timeouts.
    request_timeout: Duration,
}

impl ArxivClient {
    /// Create a new client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("summaraize/", env!("CARGO_PKG_VERSION")))
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .gzip(true)
            .build()?;

        Ok(Self {
            client,
            api_url: config.arxiv_api_url.clone(),
            pdf_url: config.arxiv_pdf_url.clone(),
            rate_limit_delay: config.rate_limit_delay,
            request_timeout: config.request_timeout,
        })
    }

    /// Fetch metadata for one arXiv ID (version suffix ignored).
    pub async fn fetch_by_id(&self, arxiv_id: &str) -> ClientResult<Paper> {
        let id = strip_arxiv_version(arxiv_id.trim());
        let params = [("id_list", id.to_string()), ("max_results", "1".to_string())];

        let body = self.get_text(&self.api_url, &params).await?;
        let papers = parse_atom_feed(&body)?;

        papers.into_iter().next().ok_or_else(|| ClientError::not_found(format!("arXiv paper {id}")))
    }

    /// Make a GET request and return the body text.
    async fn get_text(&self, url: &str, params: &[(&str, String)]) -> ClientResult<String> {
        // Rate limit
        tokio::time::sleep(self.rate_limit_delay).await;

        tracing::debug!(url = %url, ?params, "arXiv request");

        let response =
            self.client.get(url).query(params).send().await.map_err(|e| self.map_send(e))?;
        let response = handle_response(response).await?;

        response.text().await.map_err(|e| self.map_send(e))
    }

    fn map_send(&self, e: reqwest::Error) -> ClientError {
        if e.is_timeout() { ClientError::Timeout(self.request_timeout) } else { ClientError::Http(e) }
    }
}

#[async_trait]
impl PaperSource for ArxivClient {
    async fn fetch_by_url(&self, url: &str) -> ClientResult<Paper> {
        if !url.contains("arxiv.org/abs") {
            return Err(ClientError::invalid_url(url, "expected an arxiv.org/abs/ URL"));
        }
        let id = arxiv_id_from_url(url)
            .ok_or_else(|| ClientError::invalid_url(url, "no arXiv identifier in URL"))?;

        let paper = self.fetch_by_id(&id).await?;
        tracing::info!(paper = %paper.id, title = %paper.title, "Fetched arXiv metadata");
        Ok(paper)
    }

    async fn search(&self, query: &str, max_results: usize) -> ClientResult<Vec<Paper>> {
        let params = [
            ("search_query", format!("all:{query}")),
            ("start", "0".to_string()),
            ("max_results", max_results.to_string()),
            ("sortBy", "relevance".to_string()),
            ("sortOrder", "descending".to_string()),
        ];

        let body = self.get_text(&self.api_url, &params).await?;
        parse_atom_feed(&body)
    }

    async fn download_pdf(&self, paper: &Paper) -> ClientResult<Vec<u8>> {
        let url = if paper.link.ends_with(".pdf") {
            paper.link.clone()
        } else {
            format!("{}/{}.pdf", self.pdf_url, paper.id)
        };

        tokio::time::sleep(self.rate_limit_delay).await;
        tracing::info!(paper = %paper.id, url = %url, "Downloading PDF");

        let response = self.client.get(&url).send().await.map_err(|e| self.map_send(e))?;
        let response = handle_response(response).await?;
        let bytes = response.bytes().await.map_err(|e| self.map_send(e))?;

        Ok(bytes.to_vec())
    }
}

impl std::fmt::Debug for ArxivClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArxivClient").field("api_url", &self.api_url).finish()
    }
}

/// Map non-success status codes to errors.
pub(super) async fn handle_response(response: reqwest::Response) -> ClientResult<reqwest::Response> {
    let status = response.status();

    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    match status.as_u16() {
        404 => Err(ClientError::not_found(text)),
        500..=599 => Err(ClientError::server(status.as_u16(), text)),
        _ => Err(ClientError::UnexpectedStatus { status: status.as_u16(), message: text }),
    }
}

/// Identifier part of an `arxiv.org/abs/<id>` URL, version suffix kept.
///
/// Handles new-style (`2301.07041v2`) and old-style (`hep-th/9901001`) IDs.
#[must_use]
pub fn arxiv_id_from_url(url: &str) -> Option<String> {
    let parsed = Url::parse(url.trim()).ok()?;
    if !parsed.host_str()?.ends_with("arxiv.org") {
        return None;
    }

    let id = parsed.path().strip_prefix("/abs/")?.trim_matches('/');
    (!id.is_empty()).then(|| id.to_string())
}
