//! Summary cache entries and per-paper generation state.

use serde::{Deserialize, Serialize};

/// Generated summary and keywords for one paper.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryEntry {
    /// One or two sentence summary.
    pub summary: String,

    /// Key terms as produced by the model.
    pub keywords: String,
}

/// Where a paper's summary stands.
///
/// `Pending` papers are generated by the next `advance_summaries` call and
/// are never resubmitted while pending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryState {
    /// Nothing requested yet.
    Idle,
    /// Requested, waiting for generation.
    Pending,
    /// Cached result available.
    Ready(SummaryEntry),
    /// The last attempt failed; a new request moves it back to `Pending`.
    Failed(String),
}

impl SummaryState {
    /// The summary, if ready.
    #[must_use]
    pub const fn entry(&self) -> Option<&SummaryEntry> {
        match self {
            Self::Ready(entry) => Some(entry),
            _ => None,
        }
    }

    /// Check if generation is outstanding.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }
}
