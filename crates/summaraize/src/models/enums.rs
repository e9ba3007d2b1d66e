//! Enumeration types for tool parameters.

use serde::{Deserialize, Serialize};

/// Output format for tool responses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseFormat {
    /// Human-readable Markdown format.
    #[default]
    Markdown,
    /// Machine-readable JSON format.
    Json,
}

impl ResponseFormat {
    /// Check if this is JSON format.
    #[must_use]
    pub const fn is_json(self) -> bool {
        matches!(self, Self::Json)
    }
}

/// Export format for the citation list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Numbered plain-text references.
    #[default]
    Plain,
    /// BibTeX entries keyed by citation ID.
    Bibtex,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enums_deserialize_lowercase() {
        let format: ResponseFormat = serde_json::from_str(r#""json""#).unwrap();
        assert!(format.is_json());

        let export: ExportFormat = serde_json::from_str(r#""bibtex""#).unwrap();
        assert_eq!(export, ExportFormat::Bibtex);
        assert_eq!(ExportFormat::default(), ExportFormat::Plain);
    }
}
