//! Project tools: create_project, list_projects, open_project, update_project,
//! rename_project, delete_project.

use serde_json::json;

use super::{McpTool, ToolContext};
use crate::error::{ToolError, ToolResult};
use crate::formatters;
use crate::models::{
    CreateProjectInput, ProjectConfig, ProjectNameInput, RenameProjectInput, UpdateProjectInput,
};
use crate::registry::PaperRegistry;
use crate::store::RenameOutcome;

fn clean_keywords(keywords: Vec<String>) -> Vec<String> {
    keywords.into_iter().map(|k| k.trim().to_string()).filter(|k| !k.is_empty()).collect()
}

fn opened_message(registry: &PaperRegistry, config: &ProjectConfig) -> String {
    let mut output = formatters::format_project_markdown(config, registry.len());
    if registry.has_gaps() {
        output.push('\n');
        output.push_str(formatters::GAP_WARNING);
        output.push('\n');
    }
    output
}

/// Project creation tool.
pub struct CreateProjectTool;

#[async_trait::async_trait]
impl McpTool for CreateProjectTool {
    fn name(&self) -> &'static str {
        "create_project"
    }

    fn description(&self) -> &'static str {
        "Create a new research project and open it. The title is also the project's folder name."
    }

    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "title": {
                    "type": "string",
                    "description": "Project title"
                },
                "description": {
                    "type": "string",
                    "description": "What the project is about (used for suggestions)"
                },
                "keywords": {
                    "type": "array",
                    "items": {"type": "string"},
                    "description": "Project keywords"
                }
            },
            "required": ["title"]
        })
    }

    async fn execute(&self, ctx: &ToolContext, input: serde_json::Value) -> ToolResult<String> {
        let params: CreateProjectInput = serde_json::from_value(input)?;

        let title = params.title.trim();
        if title.is_empty() {
            return Err(ToolError::validation("title", "must not be empty"));
        }

        let config = ProjectConfig {
            title: title.to_string(),
            description: params.description.trim().to_string(),
            keywords: clean_keywords(params.keywords),
        };

        ctx.store.create_project(&config)?;
        let registry = PaperRegistry::open(ctx.store.clone(), title)?;

        let output = format!("Created and opened project.\n\n{}", opened_message(&registry, &config));
        ctx.session().await.open(registry);

        Ok(output)
    }
}

/// Project listing tool.
pub struct ListProjectsTool;

#[async_trait::async_trait]
impl McpTool for ListProjectsTool {
    fn name(&self) -> &'static str {
        "list_projects"
    }

    fn description(&self) -> &'static str {
        "List all projects and show which one is open."
    }

    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {}
        })
    }

    async fn execute(&self, ctx: &ToolContext, _input: serde_json::Value) -> ToolResult<String> {
        let names = ctx.store.list_projects()?;
        let session = ctx.session().await;

        Ok(formatters::format_projects_markdown(&names, session.open_project()))
    }
}

/// Project opening tool.
pub struct OpenProjectTool;

#[async_trait::async_trait]
impl McpTool for OpenProjectTool {
    fn name(&self) -> &'static str {
        "open_project"
    }

    fn description(&self) -> &'static str {
        "Open an existing project. Paper, summary, suggestion and search tools act on the open project."
    }

    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "title": {
                    "type": "string",
                    "description": "Project title"
                }
            },
            "required": ["title"]
        })
    }

    async fn execute(&self, ctx: &ToolContext, input: serde_json::Value) -> ToolResult<String> {
        let params: ProjectNameInput = serde_json::from_value(input)?;

        let registry = PaperRegistry::open(ctx.store.clone(), &params.title)?;
        let config = ctx.store.load_config(&params.title)?;

        let output = opened_message(&registry, &config);
        ctx.session().await.open(registry);

        Ok(output)
    }
}

/// Project metadata edit tool.
pub struct UpdateProjectTool;

#[async_trait::async_trait]
impl McpTool for UpdateProjectTool {
    fn name(&self) -> &'static str {
        "update_project"
    }

    fn description(&self) -> &'static str {
        "Edit the open project's description and/or keywords."
    }

    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "description": {
                    "type": "string",
                    "description": "New description"
                },
                "keywords": {
                    "type": "array",
                    "items": {"type": "string"},
                    "description": "New keyword list (replaces the old one)"
                }
            }
        })
    }

    async fn execute(&self, ctx: &ToolContext, input: serde_json::Value) -> ToolResult<String> {
        let params: UpdateProjectInput = serde_json::from_value(input)?;

        let session = ctx.session().await;
        let registry = session.registry()?;
        let project = registry.project();

        let mut config = ctx.store.load_config(project)?;
        if let Some(description) = params.description {
            config.description = description.trim().to_string();
        }
        if let Some(keywords) = params.keywords {
            config.keywords = clean_keywords(keywords);
        }
        ctx.store.save_config(project, &config)?;

        tracing::info!(project = %project, "Updated project metadata");
        Ok(formatters::format_project_markdown(&config, registry.len()))
    }
}

/// Project rename tool.
pub struct RenameProjectTool;

#[async_trait::async_trait]
impl McpTool for RenameProjectTool {
    fn name(&self) -> &'static str {
        "rename_project"
    }

    fn description(&self) -> &'static str {
        "Rename a project. Fails without changes if a project with the new title exists."
    }

    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "title": {
                    "type": "string",
                    "description": "Current project title"
                },
                "newTitle": {
                    "type": "string",
                    "description": "New project title"
                }
            },
            "required": ["title", "newTitle"]
        })
    }

    async fn execute(&self, ctx: &ToolContext, input: serde_json::Value) -> ToolResult<String> {
        let params: RenameProjectInput = serde_json::from_value(input)?;
        let new_title = params.new_title.trim();

        let mut session = ctx.session().await;

        match ctx.store.rename_project(&params.title, new_title)? {
            RenameOutcome::Conflict => Ok(format!(
                "Warning: a project named '{new_title}' already exists. '{}' was not renamed.",
                params.title
            )),
            RenameOutcome::Renamed => {
                if let Some(registry) =
                    session.registry.as_mut().filter(|r| r.project() == params.title)
                {
                    registry.set_project(new_title);
                }
                Ok(format!("Renamed '{}' to '{new_title}'.", params.title))
            }
        }
    }
}

/// Project deletion tool.
pub struct DeleteProjectTool;

#[async_trait::async_trait]
impl McpTool for DeleteProjectTool {
    fn name(&self) -> &'static str {
        "delete_project"
    }

    fn description(&self) -> &'static str {
        "Delete a project with all its papers, summaries, PDFs and caches."
    }

    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "title": {
                    "type": "string",
                    "description": "Project title"
                }
            },
            "required": ["title"]
        })
    }

    async fn execute(&self, ctx: &ToolContext, input: serde_json::Value) -> ToolResult<String> {
        let params: ProjectNameInput = serde_json::from_value(input)?;

        let mut session = ctx.session().await;
        ctx.store.delete_project(&params.title)?;

        if session.open_project() == Some(params.title.as_str()) {
            session.close();
        }

        Ok(format!("Deleted project '{}'.", params.title))
    }
}
