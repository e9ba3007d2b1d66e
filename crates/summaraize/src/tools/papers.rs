//! Paper tools: add_paper, list_papers, paper_details, delete_paper,
//! set_citation_id, summarize_papers.

use serde_json::json;

use super::{McpTool, ToolContext};
use crate::error::{ToolError, ToolResult};
use crate::formatters;
use crate::models::{
    AddPaperInput, ListPapersInput, PaperIdInput, ResponseFormat, SetCitationIdInput,
    SummarizePapersInput,
};
use crate::registry::{AddOutcome, CitationUpdate, PaperRegistry};

fn with_gap_warning(mut output: String, registry: &PaperRegistry) -> String {
    if registry.has_gaps() {
        output.push_str("\n\n");
        output.push_str(formatters::GAP_WARNING);
    }
    output
}

/// Add-paper-by-URL tool.
pub struct AddPaperTool;

#[async_trait::async_trait]
impl McpTool for AddPaperTool {
    fn name(&self) -> &'static str {
        "add_paper"
    }

    fn description(&self) -> &'static str {
        "Fetch an arXiv paper from its abstract page URL and add it to the open project \
         with the next free citation number."
    }

    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "url": {
                    "type": "string",
                    "description": "arXiv abstract URL, e.g. https://arxiv.org/abs/2301.07041"
                }
            },
            "required": ["url"]
        })
    }

    async fn execute(&self, ctx: &ToolContext, input: serde_json::Value) -> ToolResult<String> {
        let params: AddPaperInput = serde_json::from_value(input)?;

        let mut session = ctx.session().await;
        let registry = session.registry_mut()?;

        let paper = ctx.source.fetch_by_url(params.url.trim()).await.map_err(|e| {
            tracing::warn!(url = %params.url, error = %e, "Metadata fetch failed");
            ToolError::from(e)
        })?;

        let title = paper.title_or_default().to_string();
        let paper_id = paper.id.clone();

        match registry.add(paper)? {
            AddOutcome::Added { citation_id } => Ok(with_gap_warning(
                format!("Added [{citation_id}] {title} (`{paper_id}`)."),
                registry,
            )),
            AddOutcome::Duplicate => {
                Ok(format!("Paper `{paper_id}` is already in '{}'.", registry.project()))
            }
        }
    }
}

/// Paper listing tool.
pub struct ListPapersTool;

#[async_trait::async_trait]
impl McpTool for ListPapersTool {
    fn name(&self) -> &'static str {
        "list_papers"
    }

    fn description(&self) -> &'static str {
        "List the open project's papers with citation numbers. Warns when citation numbers have gaps."
    }

    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "responseFormat": {
                    "type": "string",
                    "enum": ["markdown", "json"],
                    "default": "markdown"
                }
            }
        })
    }

    async fn execute(&self, ctx: &ToolContext, input: serde_json::Value) -> ToolResult<String> {
        let params: ListPapersInput = serde_json::from_value(input)?;

        let session = ctx.session().await;
        let registry = session.registry()?;

        match params.response_format {
            ResponseFormat::Markdown => Ok(formatters::format_papers_markdown(
                registry.project(),
                registry.papers(),
                registry.has_gaps(),
            )),
            ResponseFormat::Json => {
                let papers = registry.papers().iter().map(formatters::compact_paper).collect::<Vec<_>>();
                Ok(serde_json::to_string_pretty(&json!({
                    "project": registry.project(),
                    "papers": papers,
                    "citationGaps": registry.has_gaps()
                }))?)
            }
        }
    }
}

/// Paper details tool.
pub struct PaperDetailsTool;

#[async_trait::async_trait]
impl McpTool for PaperDetailsTool {
    fn name(&self) -> &'static str {
        "paper_details"
    }

    fn description(&self) -> &'static str {
        "Show one paper of the open project with its abstract and summary status."
    }

    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "paperId": {
                    "type": "string",
                    "description": "Paper ID (arXiv identifier)"
                },
                "responseFormat": {
                    "type": "string",
                    "enum": ["markdown", "json"],
                    "default": "markdown"
                }
            },
            "required": ["paperId"]
        })
    }

    async fn execute(&self, ctx: &ToolContext, input: serde_json::Value) -> ToolResult<String> {
        let params: PaperIdInput = serde_json::from_value(input)?;

        let session = ctx.session().await;
        let registry = session.registry()?;

        let paper = registry.get(&params.paper_id).ok_or_else(|| {
            ToolError::validation("paperId", format!("no paper '{}' in this project", params.paper_id))
        })?;
        let state = registry.summary_state(&paper.id);

        match params.response_format {
            ResponseFormat::Markdown => Ok(formatters::format_paper_markdown(paper, &state)),
            ResponseFormat::Json => {
                let mut obj = formatters::compact_paper(paper);
                obj["abstract"] = json!(paper.summary);
                obj["summary"] = formatters::summary_state_json(&state);
                Ok(serde_json::to_string_pretty(&obj)?)
            }
        }
    }
}

/// Paper deletion tool.
pub struct DeletePaperTool;

#[async_trait::async_trait]
impl McpTool for DeletePaperTool {
    fn name(&self) -> &'static str {
        "delete_paper"
    }

    fn description(&self) -> &'static str {
        "Remove a paper from the open project. Other citation numbers are not renumbered."
    }

    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "paperId": {
                    "type": "string",
                    "description": "Paper ID"
                }
            },
            "required": ["paperId"]
        })
    }

    async fn execute(&self, ctx: &ToolContext, input: serde_json::Value) -> ToolResult<String> {
        let params: PaperIdInput = serde_json::from_value(input)?;

        let mut session = ctx.session().await;
        let registry = session.registry_mut()?;

        match registry.delete(&params.paper_id)? {
            Some(paper) => Ok(with_gap_warning(
                format!("Deleted `{}` {}.", paper.id, paper.title_or_default()),
                registry,
            )),
            None => Ok(format!("No paper `{}` in this project; nothing deleted.", params.paper_id)),
        }
    }
}

/// Manual citation number edit tool.
pub struct SetCitationIdTool;

#[async_trait::async_trait]
impl McpTool for SetCitationIdTool {
    fn name(&self) -> &'static str {
        "set_citation_id"
    }

    fn description(&self) -> &'static str {
        "Change a paper's citation number. Refused when another paper already uses the number."
    }

    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "paperId": {
                    "type": "string",
                    "description": "Paper ID"
                },
                "citationId": {
                    "type": "integer",
                    "minimum": 1,
                    "description": "New citation number"
                }
            },
            "required": ["paperId", "citationId"]
        })
    }

    async fn execute(&self, ctx: &ToolContext, input: serde_json::Value) -> ToolResult<String> {
        let params: SetCitationIdInput = serde_json::from_value(input)?;

        let new_id = u32::try_from(params.citation_id)
            .ok()
            .filter(|id| *id >= 1)
            .ok_or_else(|| ToolError::validation("citationId", "must be a positive integer"))?;

        let mut session = ctx.session().await;
        let registry = session.registry_mut()?;

        match registry.update_citation_id(&params.paper_id, new_id)? {
            CitationUpdate::Updated { previous } => {
                let from = previous.map_or_else(|| "unassigned".to_string(), |p| format!("[{p}]"));
                Ok(with_gap_warning(
                    format!("Citation number of `{}` changed from {from} to [{new_id}].", params.paper_id),
                    registry,
                ))
            }
            CitationUpdate::Conflict { holder } => Ok(format!(
                "Warning: citation number [{new_id}] is already used by `{holder}`. No change made."
            )),
            CitationUpdate::NotFound => {
                Ok(format!("No paper `{}` in this project; nothing changed.", params.paper_id))
            }
        }
    }
}

/// Summary generation tool.
pub struct SummarizePapersTool;

#[async_trait::async_trait]
impl McpTool for SummarizePapersTool {
    fn name(&self) -> &'static str {
        "summarize_papers"
    }

    fn description(&self) -> &'static str {
        "Generate (or show cached) short summaries and keywords for papers of the open project \
         using the local language model."
    }

    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "paperIds": {
                    "type": "array",
                    "items": {"type": "string"},
                    "description": "Papers to summarize (default: all papers)"
                }
            }
        })
    }

    async fn execute(&self, ctx: &ToolContext, input: serde_json::Value) -> ToolResult<String> {
        let params: SummarizePapersInput = serde_json::from_value(input)?;

        let mut session = ctx.session().await;
        let registry = session.registry_mut()?;

        let ids: Vec<String> = params
            .paper_ids
            .unwrap_or_else(|| registry.papers().iter().map(|p| p.id.clone()).collect());

        let mut unknown = Vec::new();
        for id in &ids {
            if registry.request_summary(id).is_none() {
                unknown.push(id.as_str());
            }
        }

        let generated = registry.advance_summaries(&ctx.summarizer).await?;
        tracing::info!(project = %registry.project(), generated, "Summaries advanced");

        let sections: Vec<String> = ids
            .iter()
            .filter_map(|id| registry.get(id))
            .map(|paper| formatters::format_paper_markdown(paper, &registry.summary_state(&paper.id)))
            .collect();

        let mut output = if sections.is_empty() {
            "No papers to summarize.".to_string()
        } else {
            sections.join("\n---\n\n")
        };

        if !unknown.is_empty() {
            output.push_str(&format!("\n\n**Not in project ({}):** {}\n", unknown.len(), unknown.join(", ")));
        }

        Ok(output)
    }
}
