//! JSON output formatting.

use serde_json::{Value, json};

use crate::models::{Paper, SummaryState};
use crate::services::SearchHit;

/// Create a compact paper representation for JSON output.
#[must_use]
pub fn compact_paper(paper: &Paper) -> Value {
    let mut obj = json!({
        "id": paper.id,
        "title": paper.title_or_default(),
        "authors": paper.author_list(),
        "published": paper.published_date(),
    });

    if let Some(citation_id) = paper.citation_id {
        obj["citationId"] = json!(citation_id);
    }

    if !paper.link.is_empty() {
        obj["link"] = json!(paper.link);
    }

    obj
}

/// Summary state as `{"status": ..., ...}`.
#[must_use]
pub fn summary_state_json(state: &SummaryState) -> Value {
    match state {
        SummaryState::Idle => json!({ "status": "idle" }),
        SummaryState::Pending => json!({ "status": "pending" }),
        SummaryState::Ready(entry) => json!({
            "status": "ready",
            "summary": entry.summary,
            "keywords": entry.keywords,
        }),
        SummaryState::Failed(reason) => json!({ "status": "failed", "reason": reason }),
    }
}

/// One search answer with its paper in compact form.
#[must_use]
pub fn compact_hit(hit: &SearchHit) -> Value {
    json!({
        "answer": hit.answer,
        "chunk": hit.chunk,
        "paper": compact_paper(&hit.paper),
        "page": hit.page,
        "score": hit.score,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SummaryEntry;

    #[test]
    fn test_compact_paper() {
        let paper = Paper {
            id: "2301.07041".to_string(),
            title: "Test Paper".to_string(),
            authors: "John Doe, Jane Roe".to_string(),
            published: "2023-01-17T18:58:21Z".to_string(),
            citation_id: Some(4),
            ..Default::default()
        };

        let compact = compact_paper(&paper);

        assert_eq!(compact["id"], "2301.07041");
        assert_eq!(compact["title"], "Test Paper");
        assert_eq!(compact["authors"], json!(["John Doe", "Jane Roe"]));
        assert_eq!(compact["published"], "2023-01-17");
        assert_eq!(compact["citationId"], 4);
        assert!(compact.get("link").is_none());
    }

    #[test]
    fn test_summary_state_json() {
        let entry = SummaryEntry { summary: "S".to_string(), keywords: "K".to_string() };
        assert_eq!(summary_state_json(&SummaryState::Ready(entry))["status"], "ready");
        assert_eq!(summary_state_json(&SummaryState::Failed("x".to_string()))["reason"], "x");
    }
}
