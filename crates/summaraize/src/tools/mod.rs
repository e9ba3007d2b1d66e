//! MCP tool implementations.
//!
//! Each tool module provides tools that:
//! 1. Parse and validate input parameters
//! 2. Act on the project store, the open paper registry or a service
//! 3. Format results as Markdown or JSON
//!
//! Branching outcomes (duplicate add, citation conflict, rename conflict)
//! return `Ok` with informational or warning text; only faults are `Err`.

mod discovery;
mod export;
mod papers;
mod projects;

pub use discovery::*;
pub use export::*;
pub use papers::*;
pub use projects::*;

use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};

use crate::client::{Embedder, LanguageModel, PageExtractor, PaperSource};
use crate::config::Config;
use crate::error::{ToolError, ToolResult};
use crate::models::Paper;
use crate::registry::PaperRegistry;
use crate::services::{Searcher, Suggester, Summarizer};
use crate::store::ProjectStore;

/// Per-process chat session: the open project and the last suggestions shown.
#[derive(Debug, Default)]
pub struct Session {
    /// Registry of the open project.
    pub registry: Option<PaperRegistry>,

    /// Last suggestion list, addressed 1-based by accept_suggestion.
    pub suggestions: Vec<Paper>,
}

impl Session {
    /// The open project's registry.
    pub fn registry(&self) -> ToolResult<&PaperRegistry> {
        self.registry.as_ref().ok_or(ToolError::NoOpenProject)
    }

    /// The open project's registry, mutably.
    pub fn registry_mut(&mut self) -> ToolResult<&mut PaperRegistry> {
        self.registry.as_mut().ok_or(ToolError::NoOpenProject)
    }

    /// Name of the open project.
    #[must_use]
    pub fn open_project(&self) -> Option<&str> {
        self.registry.as_ref().map(PaperRegistry::project)
    }

    /// Make `registry` the open project, dropping stale suggestions.
    pub fn open(&mut self, registry: PaperRegistry) {
        self.registry = Some(registry);
        self.suggestions.clear();
    }

    /// Close the open project, if any.
    pub fn close(&mut self) {
        self.registry = None;
        self.suggestions.clear();
    }
}

/// Tool execution context.
pub struct ToolContext {
    /// Runtime configuration.
    pub config: Config,

    /// Project store.
    pub store: ProjectStore,

    /// Paper metadata source.
    pub source: Arc<dyn PaperSource>,

    /// Summary service.
    pub summarizer: Summarizer,

    /// Suggestion service.
    pub suggester: Suggester,

    /// Semantic search service.
    pub searcher: Searcher,

    session: Mutex<Session>,
}

impl ToolContext {
    /// Create a new tool context from its collaborators.
    #[must_use]
    pub fn new(
        config: Config,
        store: ProjectStore,
        source: Arc<dyn PaperSource>,
        llm: Arc<dyn LanguageModel>,
        embedder: Arc<dyn Embedder>,
        extractor: Arc<dyn PageExtractor>,
    ) -> Self {
        let summarizer = Summarizer::new(Arc::clone(&llm));
        let suggester = Suggester::new(Arc::clone(&llm), Arc::clone(&source), config.suggestions_per_query);
        let searcher = Searcher::new(llm, embedder, Arc::clone(&source), extractor);

        Self {
            config,
            store,
            source,
            summarizer,
            suggester,
            searcher,
            session: Mutex::new(Session::default()),
        }
    }

    /// Lock the session for the duration of one tool call.
    pub async fn session(&self) -> MutexGuard<'_, Session> {
        self.session.lock().await
    }
}

impl std::fmt::Debug for ToolContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolContext")
            .field("data_dir", &self.config.data_dir)
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}

/// Trait for MCP tools.
#[async_trait::async_trait]
pub trait McpTool: Send + Sync {
    /// Tool name (e.g., "add_paper").
    fn name(&self) -> &'static str;

    /// Tool description for LLM.
    fn description(&self) -> &'static str;

    /// JSON Schema for input parameters.
    fn input_schema(&self) -> serde_json::Value;

    /// Execute the tool with given input.
    async fn execute(&self, ctx: &ToolContext, input: serde_json::Value) -> ToolResult<String>;
}

/// Register all tools.
#[must_use]
pub fn register_all_tools() -> Vec<Box<dyn McpTool>> {
    vec![
        // Project tools (6)
        Box::new(projects::CreateProjectTool),
        Box::new(projects::ListProjectsTool),
        Box::new(projects::OpenProjectTool),
        Box::new(projects::UpdateProjectTool),
        Box::new(projects::RenameProjectTool),
        Box::new(projects::DeleteProjectTool),

        // Paper tools (6)
        Box::new(papers::AddPaperTool),
        Box::new(papers::ListPapersTool),
        Box::new(papers::PaperDetailsTool),
        Box::new(papers::DeletePaperTool),
        Box::new(papers::SetCitationIdTool),
        Box::new(papers::SummarizePapersTool),

        // Discovery tools (3)
        Box::new(discovery::SuggestPapersTool),
        Box::new(discovery::AcceptSuggestionTool),
        Box::new(discovery::SearchPapersTool),

        // Export tools (1)
        Box::new(export::ExportCitationsTool),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_names_are_unique() {
        let tools = register_all_tools();
        let mut names: Vec<&str> = tools.iter().map(|t| t.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), tools.len());
    }

    #[test]
    fn test_schemas_are_objects() {
        for tool in register_all_tools() {
            assert_eq!(tool.input_schema()["type"], "object", "{}", tool.name());
        }
    }

    #[test]
    fn test_session_without_project() {
        let session = Session::default();
        assert!(matches!(session.registry(), Err(ToolError::NoOpenProject)));
        assert!(session.open_project().is_none());
    }
}
