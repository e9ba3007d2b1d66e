//! Input models for MCP tool parameters.

use serde::{Deserialize, Serialize};

use super::{ExportFormat, ResponseFormat};

/// Input for creating a project.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectInput {
    /// Project title (also its folder name).
    pub title: String,

    /// Free-text description.
    #[serde(default)]
    pub description: String,

    /// Keywords.
    #[serde(default)]
    pub keywords: Vec<String>,
}

/// Input for tools addressing a project by name.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectNameInput {
    /// Project title.
    pub title: String,
}

/// Input for editing the open project's metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProjectInput {
    /// New description (unchanged if absent).
    #[serde(default)]
    pub description: Option<String>,

    /// New keywords (unchanged if absent).
    #[serde(default)]
    pub keywords: Option<Vec<String>>,
}

/// Input for renaming a project.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameProjectInput {
    /// Current title.
    pub title: String,

    /// Desired title.
    pub new_title: String,
}

/// Input for adding a paper by URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddPaperInput {
    /// arXiv abstract page URL (e.g., "https://arxiv.org/abs/2301.07041").
    pub url: String,
}

/// Input for listing papers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPapersInput {
    /// Output format.
    #[serde(default)]
    pub response_format: ResponseFormat,
}

/// Input for tools addressing one paper.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaperIdInput {
    /// Paper ID.
    pub paper_id: String,

    /// Output format.
    #[serde(default)]
    pub response_format: ResponseFormat,
}

/// Input for a manual citation ID edit.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetCitationIdInput {
    /// Paper ID.
    pub paper_id: String,

    /// Requested citation number (must be positive).
    pub citation_id: i64,
}

/// Input for summary generation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummarizePapersInput {
    /// Papers to summarize (all papers if absent).
    #[serde(default)]
    pub paper_ids: Option<Vec<String>>,
}

/// Input for paper suggestions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestPapersInput {
    /// Extra free-text focus added to the project metadata.
    #[serde(default)]
    pub query: Option<String>,

    /// Output format.
    #[serde(default)]
    pub response_format: ResponseFormat,
}

/// Input for accepting a suggestion.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcceptSuggestionInput {
    /// 1-based position in the last suggestion list.
    pub index: usize,
}

/// Input for semantic search.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPapersInput {
    /// Question to answer from the project's papers.
    pub query: String,

    /// Number of passages to answer (default from config).
    #[serde(default)]
    pub top_k: Option<usize>,

    /// Output format.
    #[serde(default)]
    pub response_format: ResponseFormat,
}

/// Input for citation export.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportCitationsInput {
    /// Export format.
    #[serde(default)]
    pub format: ExportFormat,
}
