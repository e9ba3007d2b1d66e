//! Ollama client for local generation and embeddings.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use reqwest::Client;
use serde::Deserialize;

use super::arxiv::handle_response;
use super::{Embedder, LanguageModel};
use crate::config::Config;
use crate::error::{ClientError, ClientResult};

/// Local Ollama runtime.
#[derive(Clone)]
pub struct OllamaClient {
    /// HTTP client.
    client: Client,

    /// Runtime endpoint.
    base_url: String,

    /// Generation model.
    model: String,

    /// Embedding model.
    embed_model: String,

    /// Embedding vectors keyed by model + text digest.
    embeddings: Cache<String, Vec<f32>>,

    /// Request timeout, reported on timeouts.
    request_timeout: Duration,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

#[derive(Deserialize)]
struct EmbedResponse {
    #[serde(default)]
    embeddings: Vec<Vec<f32>>,
}

impl OllamaClient {
    /// Create a new client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .build()?;

        let embeddings = Cache::builder()
            .max_capacity(config.cache_max_size)
            .time_to_live(config.cache_ttl)
            .build();

        Ok(Self {
            client,
            base_url: config.llm_url.trim_end_matches('/').to_string(),
            model: config.llm_model.clone(),
            embed_model: config.embed_model.clone(),
            embeddings,
            request_timeout: config.request_timeout,
        })
    }

    /// Runtime endpoint.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Check whether the runtime answers `GET /api/tags`.
    pub async fn is_reachable(&self) -> bool {
        let url = format!("{}/api/tags", self.base_url);
        match self.client.get(&url).timeout(Duration::from_secs(2)).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::debug!(url = %url, error = %e, "LLM runtime probe failed");
                false
            }
        }
    }

    /// Make sure the runtime is reachable, spawning `ollama serve` if allowed.
    ///
    /// After spawning, waits `startup_wait` once and probes again.
    pub async fn ensure_running(&self, auto_start: bool, startup_wait: Duration) -> ClientResult<()> {
        if self.is_reachable().await {
            return Ok(());
        }

        if !auto_start {
            return Err(ClientError::unavailable(&self.base_url, "not reachable"));
        }

        tracing::info!(endpoint = %self.base_url, "Starting LLM runtime");
        tokio::process::Command::new("ollama")
            .arg("serve")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| ClientError::unavailable(&self.base_url, format!("cannot start ollama: {e}")))?;

        tokio::time::sleep(startup_wait).await;

        if self.is_reachable().await {
            tracing::info!(endpoint = %self.base_url, "LLM runtime is up");
            Ok(())
        } else {
            Err(ClientError::unavailable(&self.base_url, "still not reachable after start"))
        }
    }

    async fn post_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> ClientResult<T> {
        let url = format!("{}{}", self.base_url, path);

        let response = self.client.post(&url).json(body).send().await.map_err(|e| {
            if e.is_connect() {
                ClientError::unavailable(&self.base_url, e.to_string())
            } else if e.is_timeout() {
                ClientError::Timeout(self.request_timeout)
            } else {
                ClientError::Http(e)
            }
        })?;

        let response = handle_response(response).await?;
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(ClientError::from)
    }

    fn cache_key(&self, text: &str) -> String {
        use md5::{Digest, Md5};

        let mut hasher = Md5::new();
        hasher.update(self.embed_model.as_bytes());
        hasher.update(b"|");
        hasher.update(text.as_bytes());

        format!("{:x}", hasher.finalize())
    }
}

#[async_trait]
impl LanguageModel for OllamaClient {
    async fn complete(&self, prompt: &str) -> ClientResult<String> {
        let body = serde_json::json!({
            "model": self.model,
            "prompt": prompt,
            "stream": false,
        });

        let result: GenerateResponse = self.post_json("/api/generate", &body).await?;
        tracing::debug!(chars = result.response.len(), "LLM completion");
        Ok(result.response)
    }
}

#[async_trait]
impl Embedder for OllamaClient {
    async fn embed(&self, texts: &[String]) -> ClientResult<Vec<Vec<f32>>> {
        let keys: Vec<String> = texts.iter().map(|t| self.cache_key(t)).collect();

        let mut vectors: Vec<Option<Vec<f32>>> = Vec::with_capacity(texts.len());
        for key in &keys {
            vectors.push(self.embeddings.get(key).await);
        }

        let missing: Vec<usize> = (0..texts.len()).filter(|&i| vectors[i].is_none()).collect();
        if !missing.is_empty() {
            let input: Vec<&str> = missing.iter().map(|&i| texts[i].as_str()).collect();
            let body = serde_json::json!({ "model": self.embed_model, "input": input });

            let result: EmbedResponse = self.post_json("/api/embed", &body).await?;
            if result.embeddings.len() != missing.len() {
                return Err(ClientError::UnexpectedStatus {
                    status: 200,
                    message: format!(
                        "expected {} embeddings, got {}",
                        missing.len(),
                        result.embeddings.len()
                    ),
                });
            }

            for (&i, vector) in missing.iter().zip(result.embeddings) {
                self.embeddings.insert(keys[i].clone(), vector.clone()).await;
                vectors[i] = Some(vector);
            }
        }

        Ok(vectors.into_iter().map(Option::unwrap_or_default).collect())
    }
}

impl std::fmt::Debug for OllamaClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OllamaClient")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish()
    }
}
