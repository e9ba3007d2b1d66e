//! Paper data model as persisted in `saved_papers.json`.

use std::sync::LazyLock;

use chrono::{DateTime, Datelike};
use regex::Regex;
use serde::{Deserialize, Serialize};

static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

static ARXIV_VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"v\d+$").expect("valid version regex"));

/// A research paper accepted into a project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paper {
    /// arXiv identifier without version suffix, or a content hash.
    pub id: String,

    /// Paper title.
    #[serde(default)]
    pub title: String,

    /// Authors as one comma-joined string.
    #[serde(default)]
    pub authors: String,

    /// Abstract text.
    #[serde(default)]
    pub summary: String,

    /// Publication timestamp as given by the source feed.
    #[serde(default)]
    pub published: String,

    /// Canonical URL.
    #[serde(default)]
    pub link: String,

    /// Citation number within the project, once assigned.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub citation_id: Option<u32>,
}

impl Paper {
    /// Get the paper title, falling back to "Untitled" if empty.
    #[must_use]
    pub fn title_or_default(&self) -> &str {
        if self.title.trim().is_empty() { "Untitled" } else { &self.title }
    }

    /// Authors shortened to at most two names plus "et al.".
    #[must_use]
    pub fn short_authors(&self) -> String {
        format_authors(&self.authors)
    }

    /// Publication date (first 10 characters of the timestamp).
    #[must_use]
    pub fn published_date(&self) -> &str {
        self.published.get(..10).unwrap_or(&self.published)
    }

    /// Publication year, from an RFC 3339 timestamp or a leading `YYYY`.
    #[must_use]
    pub fn year(&self) -> Option<i32> {
        if let Ok(ts) = DateTime::parse_from_rfc3339(self.published.trim()) {
            return Some(ts.year());
        }
        self.published.get(..4)?.parse().ok()
    }

    /// Split the author string into names.
    #[must_use]
    pub fn author_list(&self) -> Vec<&str> {
        self.authors.split(',').map(str::trim).filter(|a| !a.is_empty()).collect()
    }

    /// Collapse whitespace runs in title, abstract and authors.
    #[must_use]
    pub fn cleaned(mut self) -> Self {
        self.title = clean_text(&self.title);
        self.summary = clean_text(&self.summary);
        self.authors = clean_text(&self.authors);
        self
    }
}

/// Format an author string: two or fewer names verbatim, otherwise the first two and "et al.".
#[must_use]
pub fn format_authors(authors: &str) -> String {
    let names: Vec<&str> = authors.split(',').map(str::trim).collect();
    if names.len() <= 2 {
        names.join(", ")
    } else {
        format!("{}, et al.", names[..2].join(", "))
    }
}

/// Trim and collapse whitespace runs to single spaces.
#[must_use]
pub fn clean_text(text: &str) -> String {
    WHITESPACE_RE.replace_all(text.trim(), " ").into_owned()
}

/// Drop a trailing arXiv version suffix (`2301.07041v2` -> `2301.07041`).
#[must_use]
pub fn strip_arxiv_version(id: &str) -> &str {
    match ARXIV_VERSION_RE.find(id) {
        Some(m) => &id[..m.start()],
        None => id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paper_deserialize_minimal() {
        let json = r#"{"id": "2301.07041"}"#;
        let paper: Paper = serde_json::from_str(json).unwrap();
        assert_eq!(paper.id, "2301.07041");
        assert!(paper.title.is_empty());
        assert!(paper.citation_id.is_none());
        assert_eq!(paper.title_or_default(), "Untitled");
    }

    #[test]
    fn test_paper_unassigned_citation_not_serialized() {
        let paper = Paper { id: "x".to_string(), ..Default::default() };
        let json = serde_json::to_value(&paper).unwrap();
        assert!(json.get("citation_id").is_none());

        let paper = Paper { citation_id: Some(3), ..paper };
        let json = serde_json::to_value(&paper).unwrap();
        assert_eq!(json["citation_id"], 3);
    }

    #[test]
    fn test_format_authors() {
        assert_eq!(format_authors("Alice"), "Alice");
        assert_eq!(format_authors("Alice,  Bob"), "Alice, Bob");
        assert_eq!(format_authors("Alice, Bob, Carol"), "Alice, Bob, et al.");
    }

    #[test]
    fn test_published_date_and_year() {
        let paper = Paper { published: "2023-01-17T18:58:21Z".to_string(), ..Default::default() };
        assert_eq!(paper.published_date(), "2023-01-17");
        assert_eq!(paper.year(), Some(2023));

        let paper = Paper { published: "?".to_string(), ..Default::default() };
        assert_eq!(paper.published_date(), "?");
        assert_eq!(paper.year(), None);
    }

    #[test]
    fn test_strip_arxiv_version() {
        assert_eq!(strip_arxiv_version("2301.07041v2"), "2301.07041");
        assert_eq!(strip_arxiv_version("2301.07041"), "2301.07041");
        assert_eq!(strip_arxiv_version("hep-th/9901001v1"), "hep-th/9901001");
    }

    #[test]
    fn test_cleaned() {
        let paper = Paper {
            title: "  Attention\n  Is All\tYou Need ".to_string(),
            authors: "A,\n B".to_string(),
            ..Default::default()
        }
        .cleaned();
        assert_eq!(paper.title, "Attention Is All You Need");
        assert_eq!(paper.authors, "A, B");
    }
}
