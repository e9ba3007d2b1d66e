//! MCP server implementation.
//!
//! The chat client drives the organizer through MCP tool calls over stdio.

pub mod protocol;
pub mod stdio;

use std::sync::Arc;

use crate::client::{ArxivClient, LanguageModel, OllamaClient, PdftotextExtractor};
use crate::config::Config;
use crate::store::ProjectStore;
use crate::tools::{self, McpTool, ToolContext};

/// MCP server for the paper organizer.
pub struct McpServer {
    /// Tool execution context.
    ctx: ToolContext,

    /// Registered tools.
    tools: Vec<Box<dyn McpTool>>,
}

impl McpServer {
    /// Create a server backed by arXiv, the given LLM runtime and `pdftotext`.
    ///
    /// # Errors
    ///
    /// Returns error if the data directory or HTTP client cannot be set up.
    pub fn new(config: Config, ollama: OllamaClient) -> anyhow::Result<Self> {
        let store = ProjectStore::open(&config.data_dir)?;
        let arxiv = Arc::new(ArxivClient::new(&config)?);
        let ollama = Arc::new(ollama);
        let llm: Arc<dyn LanguageModel> = ollama.clone();

        let ctx =
            ToolContext::new(config, store, arxiv, llm, ollama, Arc::new(PdftotextExtractor::new()));

        Ok(Self::with_context(ctx))
    }

    /// Create a server around an existing context.
    #[must_use]
    pub fn with_context(ctx: ToolContext) -> Self {
        Self { ctx, tools: tools::register_all_tools() }
    }

    /// Run the server in stdio mode.
    ///
    /// # Errors
    ///
    /// Returns error on I/O failure.
    pub async fn run_stdio(self) -> anyhow::Result<()> {
        tracing::info!("Starting MCP server in stdio mode");
        tracing::info!("Registered {} tools", self.tools.len());

        stdio::run_stdio(&self.tools, &self.ctx).await
    }

    /// Get tool by name.
    #[must_use]
    pub fn get_tool(&self, name: &str) -> Option<&dyn McpTool> {
        self.tools.iter().find(|t| t.name() == name).map(AsRef::as_ref)
    }

    /// List all available tools.
    #[must_use]
    pub fn list_tools(&self) -> Vec<(&str, &str)> {
        self.tools.iter().map(|t| (t.name(), t.description())).collect()
    }

    /// Get tool context for execution.
    #[must_use]
    pub const fn context(&self) -> &ToolContext {
        &self.ctx
    }

    /// Registered tools.
    #[must_use]
    pub fn tools(&self) -> &[Box<dyn McpTool>] {
        &self.tools
    }
}

impl std::fmt::Debug for McpServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("McpServer").field("tools", &self.tools.len()).finish()
    }
}
