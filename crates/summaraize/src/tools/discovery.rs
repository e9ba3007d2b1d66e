//! Discovery tools: suggest_papers, accept_suggestion, search_papers.

use std::collections::HashSet;

use serde_json::json;

use super::{McpTool, ToolContext};
use crate::config::api;
use crate::error::{ToolError, ToolResult};
use crate::formatters;
use crate::models::{AcceptSuggestionInput, ResponseFormat, SearchPapersInput, SuggestPapersInput};
use crate::registry::AddOutcome;

/// Paper suggestion tool.
pub struct SuggestPapersTool;

#[async_trait::async_trait]
impl McpTool for SuggestPapersTool {
    fn name(&self) -> &'static str {
        "suggest_papers"
    }

    fn description(&self) -> &'static str {
        "Suggest new arXiv papers for the open project. The language model writes search queries \
         from the project's title, description and keywords, then keeps only candidates it judges relevant."
    }

    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "Optional extra focus for this round of suggestions"
                },
                "responseFormat": {
                    "type": "string",
                    "enum": ["markdown", "json"],
                    "default": "markdown"
                }
            }
        })
    }

    async fn execute(&self, ctx: &ToolContext, input: serde_json::Value) -> ToolResult<String> {
        let params: SuggestPapersInput = serde_json::from_value(input)?;

        let mut session = ctx.session().await;
        let registry = session.registry()?;

        let config = ctx.store.load_config(registry.project())?;
        let exclude: HashSet<String> = registry.papers().iter().map(|p| p.id.clone()).collect();

        let suggestions = ctx.suggester.suggest(&config, params.query.as_deref(), &exclude).await?;
        tracing::info!(project = %config.title, count = suggestions.len(), "Suggested papers");

        let output = match params.response_format {
            ResponseFormat::Markdown => formatters::format_suggestions_markdown(&suggestions),
            ResponseFormat::Json => {
                let items = suggestions
                    .iter()
                    .enumerate()
                    .map(|(i, p)| {
                        let mut obj = formatters::compact_paper(p);
                        obj["index"] = json!(i + 1);
                        obj["abstract"] = json!(p.summary);
                        obj
                    })
                    .collect::<Vec<_>>();
                serde_json::to_string_pretty(&json!({ "suggestions": items }))?
            }
        };

        session.suggestions = suggestions;
        Ok(output)
    }
}

/// Suggestion acceptance tool.
pub struct AcceptSuggestionTool;

#[async_trait::async_trait]
impl McpTool for AcceptSuggestionTool {
    fn name(&self) -> &'static str {
        "accept_suggestion"
    }

    fn description(&self) -> &'static str {
        "Add a paper from the last suggest_papers list to the open project, by its number in that list."
    }

    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "index": {
                    "type": "integer",
                    "minimum": 1,
                    "description": "Suggestion number as shown by suggest_papers"
                }
            },
            "required": ["index"]
        })
    }

    async fn execute(&self, ctx: &ToolContext, input: serde_json::Value) -> ToolResult<String> {
        let params: AcceptSuggestionInput = serde_json::from_value(input)?;

        let mut session = ctx.session().await;
        session.registry()?;

        let paper = params
            .index
            .checked_sub(1)
            .and_then(|i| session.suggestions.get(i))
            .cloned()
            .ok_or_else(|| {
                ToolError::validation(
                    "index",
                    format!("expected 1..={} from the last suggestion list", session.suggestions.len()),
                )
            })?;

        let title = paper.title_or_default().to_string();
        let paper_id = paper.id.clone();
        let registry = session.registry_mut()?;

        match registry.add(paper)? {
            AddOutcome::Added { citation_id } => {
                Ok(format!("Added [{citation_id}] {title} (`{paper_id}`)."))
            }
            AddOutcome::Duplicate => {
                Ok(format!("Paper `{paper_id}` is already in '{}'.", registry.project()))
            }
        }
    }
}

/// Semantic search tool.
pub struct SearchPapersTool;

#[async_trait::async_trait]
impl McpTool for SearchPapersTool {
    fn name(&self) -> &'static str {
        "search_papers"
    }

    fn description(&self) -> &'static str {
        "Answer a question from the full text of the open project's papers. \
         Downloads and caches PDFs on first use, ranks passages by embedding similarity \
         and quotes the sentences that answer the question."
    }

    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "Question to answer"
                },
                "topK": {
                    "type": "integer",
                    "minimum": 1,
                    "maximum": api::MAX_SEARCH_TOP_K,
                    "default": api::SEARCH_TOP_K,
                    "description": "Number of passages to answer from"
                },
                "responseFormat": {
                    "type": "string",
                    "enum": ["markdown", "json"],
                    "default": "markdown"
                }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, ctx: &ToolContext, input: serde_json::Value) -> ToolResult<String> {
        let params: SearchPapersInput = serde_json::from_value(input)?;

        let query = params.query.trim();
        if query.is_empty() {
            return Err(ToolError::validation("query", "must not be empty"));
        }
        let top_k = params.top_k.unwrap_or(ctx.config.search_top_k);
        if !(1..=api::MAX_SEARCH_TOP_K).contains(&top_k) {
            return Err(ToolError::validation(
                "topK",
                format!("must be between 1 and {}", api::MAX_SEARCH_TOP_K),
            ));
        }

        let session = ctx.session().await;
        let registry = session.registry()?;

        if registry.is_empty() {
            return Ok(format!("No papers in '{}' to search.", registry.project()));
        }

        let hits = ctx
            .searcher
            .search(&ctx.store, registry.project(), query, registry.papers(), top_k)
            .await?;

        match params.response_format {
            ResponseFormat::Markdown => Ok(formatters::format_search_hits_markdown(query, &hits)),
            ResponseFormat::Json => {
                let results = hits.iter().map(formatters::compact_hit).collect::<Vec<_>>();
                Ok(serde_json::to_string_pretty(&json!({ "query": query, "results": results }))?)
            }
        }
    }
}
