//! Project metadata as persisted in `project_config.json`.

use serde::{Deserialize, Serialize};

/// Project metadata. The title doubles as the project's folder name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Project title.
    pub title: String,

    /// Free-text description.
    #[serde(default)]
    pub description: String,

    /// Ordered keywords.
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl ProjectConfig {
    /// Create a config with the given title and no metadata.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self { title: title.into(), ..Default::default() }
    }

    /// Keywords joined for prompts and display.
    #[must_use]
    pub fn keywords_joined(&self) -> String {
        self.keywords.join(", ")
    }
}

/// Split a comma-separated keyword string, dropping blanks.
#[must_use]
pub fn parse_keywords(input: &str) -> Vec<String> {
    input.split(',').map(str::trim).filter(|k| !k.is_empty()).map(String::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_config_missing_fields_default() {
        let config: ProjectConfig = serde_json::from_str(r#"{"title": "Quantum"}"#).unwrap();
        assert_eq!(config.title, "Quantum");
        assert!(config.description.is_empty());
        assert!(config.keywords.is_empty());
    }

    #[test]
    fn test_parse_keywords() {
        assert_eq!(parse_keywords(" qubits, ,entanglement "), vec!["qubits", "entanglement"]);
        assert!(parse_keywords("").is_empty());
    }
}
