//! Citation number assignment and gap detection.
//!
//! Numbers freed by deletion are handed out again before the sequence grows;
//! existing numbers are never compacted.

use std::collections::BTreeSet;

use crate::models::Paper;

/// Smallest positive citation number not held by any paper.
#[must_use]
pub fn next_citation_id(papers: &[Paper]) -> u32 {
    let used: BTreeSet<u32> = papers.iter().filter_map(|p| p.citation_id).collect();
    (1..=used.len() as u32 + 1).find(|id| !used.contains(id)).unwrap_or(1)
}

/// Assigned citation numbers in ascending order.
#[must_use]
pub fn assigned_citation_ids(papers: &[Paper]) -> Vec<u32> {
    let mut ids: Vec<u32> = papers.iter().filter_map(|p| p.citation_id).collect();
    ids.sort_unstable();
    ids
}

/// True when the assigned numbers are not exactly `1..=count`.
#[must_use]
pub fn has_citation_gaps(papers: &[Paper]) -> bool {
    let ids = assigned_citation_ids(papers);
    !ids.iter().copied().eq(1..=ids.len() as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_ids(ids: &[Option<u32>]) -> Vec<Paper> {
        ids.iter()
            .enumerate()
            .map(|(i, id)| Paper { id: format!("p{i}"), citation_id: *id, ..Default::default() })
            .collect()
    }

    #[test]
    fn test_next_citation_id_examples() {
        assert_eq!(next_citation_id(&[]), 1);
        assert_eq!(next_citation_id(&with_ids(&[Some(1), Some(2), Some(3)])), 4);
        assert_eq!(next_citation_id(&with_ids(&[Some(1), Some(3)])), 2);
        assert_eq!(next_citation_id(&with_ids(&[Some(2), Some(3)])), 1);
    }

    #[test]
    fn test_next_citation_id_ignores_unassigned() {
        assert_eq!(next_citation_id(&with_ids(&[None, Some(1), None])), 2);
    }

    #[test]
    fn test_gap_detection() {
        assert!(!has_citation_gaps(&[]));
        assert!(!has_citation_gaps(&with_ids(&[Some(3), Some(1), Some(2)])));
        assert!(has_citation_gaps(&with_ids(&[Some(1), Some(2), Some(4)])));
        assert!(has_citation_gaps(&with_ids(&[Some(2)])));
        assert!(!has_citation_gaps(&with_ids(&[None, Some(1)])));
    }
}
