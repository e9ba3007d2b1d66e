//! Data models for projects, papers and summaries.
//!
//! Persisted models keep the snake_case field names of the on-disk JSON files;
//! tool inputs use `#[serde(rename_all = "camelCase")]` like the MCP schemas.

mod enums;
mod inputs;
mod paper;
mod project;
mod summary;

pub use enums::{ExportFormat, ResponseFormat};
pub use inputs::*;
pub use paper::{Paper, clean_text, format_authors, strip_arxiv_version};
pub use project::{ProjectConfig, parse_keywords};
pub use summary::{SummaryEntry, SummaryState};
