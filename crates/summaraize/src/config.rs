//! Configuration for SummarAIze.

use std::path::PathBuf;
use std::time::Duration;

/// Service configuration constants.
pub mod api {
    use std::time::Duration;

    /// arXiv Atom query endpoint.
    pub const ARXIV_API: &str = "http://export.arxiv.org/api/query";

    /// arXiv PDF base URL (`{base}/{id}.pdf`).
    pub const ARXIV_PDF: &str = "https://arxiv.org/pdf";

    /// Default Ollama endpoint.
    pub const OLLAMA_URL: &str = "http://localhost:11434";

    /// Default generation model.
    pub const LLM_MODEL: &str = "llama3";

    /// Default embedding model.
    pub const EMBED_MODEL: &str = "all-minilm";

    /// Request timeout. Local generation on a laptop is slow.
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

    /// Connection timeout.
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Delay before each arXiv request (arXiv asks for spaced-out calls).
    pub const RATE_LIMIT_DELAY: Duration = Duration::from_millis(500);

    /// Wait after spawning the LLM runtime before probing it again.
    pub const LLM_STARTUP_WAIT: Duration = Duration::from_secs(3);

    /// Embedding cache TTL (1 hour).
    pub const CACHE_TTL: Duration = Duration::from_secs(3600);

    /// Maximum embedding cache entries.
    pub const CACHE_MAX_SIZE: u64 = 10_000;

    /// Results fetched per generated suggestion query.
    pub const SUGGESTIONS_PER_QUERY: usize = 5;

    /// Chunks passed to answer extraction per search.
    pub const SEARCH_TOP_K: usize = 3;

    /// Upper bound on `topK`; each passage costs one model call.
    pub const MAX_SEARCH_TOP_K: usize = 20;

    /// Data directory name under the user's home.
    pub const DATA_DIR_NAME: &str = ".summaraize";
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Root directory holding one folder per project.
    pub data_dir: PathBuf,

    /// arXiv query endpoint (for testing with mock servers).
    pub arxiv_api_url: String,

    /// arXiv PDF base URL (for testing with mock servers).
    pub arxiv_pdf_url: String,

    /// Ollama endpoint.
    pub llm_url: String,

    /// Generation model name.
    pub llm_model: String,

    /// Embedding model name.
    pub embed_model: String,

    /// Spawn `ollama serve` when the runtime is not reachable.
    pub auto_start_llm: bool,

    /// Request timeout.
    pub request_timeout: Duration,

    /// Connection timeout.
    pub connect_timeout: Duration,

    /// Delay before each arXiv request.
    pub rate_limit_delay: Duration,

    /// Wait after spawning the LLM runtime.
    pub llm_startup_wait: Duration,

    /// Embedding cache TTL.
    pub cache_ttl: Duration,

    /// Maximum embedding cache entries.
    pub cache_max_size: u64,

    /// Results fetched per suggestion query.
    pub suggestions_per_query: usize,

    /// Chunks answered per search.
    pub search_top_k: usize,
}

impl Config {
    /// Create a configuration rooted at `data_dir` with default endpoints.
    #[must_use]
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            arxiv_api_url: api::ARXIV_API.to_string(),
            arxiv_pdf_url: api::ARXIV_PDF.to_string(),
            llm_url: api::OLLAMA_URL.to_string(),
            llm_model: api::LLM_MODEL.to_string(),
            embed_model: api::EMBED_MODEL.to_string(),
            auto_start_llm: true,
            request_timeout: api::REQUEST_TIMEOUT,
            connect_timeout: api::CONNECT_TIMEOUT,
            rate_limit_delay: api::RATE_LIMIT_DELAY,
            llm_startup_wait: api::LLM_STARTUP_WAIT,
            cache_ttl: api::CACHE_TTL,
            cache_max_size: api::CACHE_MAX_SIZE,
            suggestions_per_query: api::SUGGESTIONS_PER_QUERY,
            search_top_k: api::SEARCH_TOP_K,
        }
    }

    /// Create a test configuration with every endpoint on one mock server.
    #[must_use]
    pub fn for_testing(base_url: &str, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            arxiv_api_url: format!("{}/api/query", base_url),
            arxiv_pdf_url: format!("{}/pdf", base_url),
            llm_url: base_url.to_string(),
            llm_model: "test-model".to_string(),
            embed_model: "test-embed".to_string(),
            auto_start_llm: false,
            request_timeout: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(2),
            rate_limit_delay: Duration::from_millis(0), // No delay in tests
            llm_startup_wait: Duration::from_millis(0),
            cache_ttl: Duration::from_secs(60),
            cache_max_size: 100,
            suggestions_per_query: api::SUGGESTIONS_PER_QUERY,
            search_top_k: api::SEARCH_TOP_K,
        }
    }

    /// Create configuration from environment variables.
    ///
    /// - `SUMMARAIZE_HOME`: data directory (default `~/.summaraize`)
    /// - `OLLAMA_HOST`: Ollama endpoint
    /// - `SUMMARAIZE_MODEL` / `SUMMARAIZE_EMBED_MODEL`: model names
    ///
    /// # Errors
    ///
    /// Returns error if no data directory can be determined.
    pub fn from_env() -> anyhow::Result<Self> {
        let data_dir = match std::env::var_os("SUMMARAIZE_HOME") {
            Some(dir) => PathBuf::from(dir),
            None => default_data_dir()?,
        };

        let mut config = Self::new(data_dir);
        if let Ok(url) = std::env::var("OLLAMA_HOST") {
            config.llm_url = normalize_ollama_host(&url);
        }
        if let Ok(model) = std::env::var("SUMMARAIZE_MODEL") {
            config.llm_model = model;
        }
        if let Ok(model) = std::env::var("SUMMARAIZE_EMBED_MODEL") {
            config.embed_model = model;
        }
        Ok(config)
    }
}

/// `~/.summaraize`, from `HOME` (or `USERPROFILE` on Windows).
fn default_data_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .ok_or_else(|| anyhow::anyhow!("cannot determine home directory; set SUMMARAIZE_HOME"))?;
    Ok(PathBuf::from(home).join(api::DATA_DIR_NAME))
}

/// `OLLAMA_HOST` is often given as `host:port` without a scheme.
#[must_use]
pub fn normalize_ollama_host(host: &str) -> String {
    let host = host.trim().trim_end_matches('/');
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("http://{host}")
    }
}
