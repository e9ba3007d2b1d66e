//! Paper registry for the open project.
//!
//! # Invariants
//! - Paper IDs are unique: adding an existing ID reports [`AddOutcome::Duplicate`].
//! - Assigned citation numbers are unique: an edit colliding with another
//!   paper reports [`CitationUpdate::Conflict`] and changes nothing.
//! - Deleting never renumbers; the freed number is reused by the next add.
//!
//! Every successful mutation rewrites `saved_papers.json`. When that write
//! fails the error is returned and the in-memory list stays authoritative
//! until the next successful persist.

mod citation;

use std::collections::HashMap;

pub use citation::{assigned_citation_ids, has_citation_gaps, next_citation_id};

use crate::error::{ClientError, StoreResult};
use crate::models::{Paper, SummaryEntry, SummaryState};
use crate::services::Summarizer;
use crate::store::{ProjectStore, SummaryCache};

/// Result of adding a paper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// Appended with this citation number.
    Added {
        /// Assigned citation number
        citation_id: u32,
    },
    /// A paper with the same ID is already present.
    Duplicate,
}

/// Result of a manual citation number edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CitationUpdate {
    /// Number changed.
    Updated {
        /// Number held before the edit
        previous: Option<u32>,
    },
    /// Another paper holds the number; nothing changed.
    Conflict {
        /// ID of the paper holding it
        holder: String,
    },
    /// No paper with this ID.
    NotFound,
}

/// Authoritative paper list and summary state for one open project.
#[derive(Debug)]
pub struct PaperRegistry {
    store: ProjectStore,
    project: String,
    papers: Vec<Paper>,
    summaries: SummaryCache,
    states: HashMap<String, SummaryState>,
}

impl PaperRegistry {
    /// Load the registry of an existing project.
    pub fn open(store: ProjectStore, project: &str) -> StoreResult<Self> {
        let papers = store.load_papers(project)?;
        let summaries = store.load_summary_cache(project)?;

        tracing::debug!(project = %project, papers = papers.len(), "Opened paper registry");

        Ok(Self { store, project: project.to_string(), papers, summaries, states: HashMap::new() })
    }

    /// Name of the project this registry belongs to.
    #[must_use]
    pub fn project(&self) -> &str {
        &self.project
    }

    /// Store backing this registry.
    #[must_use]
    pub const fn store(&self) -> &ProjectStore {
        &self.store
    }

    /// Papers in insertion order.
    #[must_use]
    pub fn papers(&self) -> &[Paper] {
        &self.papers
    }

    /// Look up a paper by ID.
    #[must_use]
    pub fn get(&self, paper_id: &str) -> Option<&Paper> {
        self.papers.iter().find(|p| p.id == paper_id)
    }

    /// Check whether a paper ID is present.
    #[must_use]
    pub fn contains(&self, paper_id: &str) -> bool {
        self.get(paper_id).is_some()
    }

    /// Number of papers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.papers.len()
    }

    /// Check if the project has no papers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.papers.is_empty()
    }

    /// Add a paper, assigning the next free citation number.
    pub fn add(&mut self, mut paper: Paper) -> StoreResult<AddOutcome> {
        if self.contains(&paper.id) {
            tracing::info!(project = %self.project, paper = %paper.id, "Paper already added");
            return Ok(AddOutcome::Duplicate);
        }

        let citation_id = next_citation_id(&self.papers);
        paper.citation_id = Some(citation_id);

        tracing::info!(project = %self.project, paper = %paper.id, citation_id, "Adding paper");
        self.papers.push(paper);
        self.persist()?;

        Ok(AddOutcome::Added { citation_id })
    }

    /// Remove a paper. Other citation numbers are left as they are.
    pub fn delete(&mut self, paper_id: &str) -> StoreResult<Option<Paper>> {
        let Some(pos) = self.papers.iter().position(|p| p.id == paper_id) else {
            return Ok(None);
        };

        let removed = self.papers.remove(pos);
        self.states.remove(paper_id);

        tracing::info!(project = %self.project, paper = %paper_id, "Deleted paper");
        self.persist()?;

        Ok(Some(removed))
    }

    /// Change a paper's citation number unless another paper holds it.
    pub fn update_citation_id(
        &mut self,
        paper_id: &str,
        new_id: u32,
    ) -> StoreResult<CitationUpdate> {
        if !self.contains(paper_id) {
            return Ok(CitationUpdate::NotFound);
        }

        if let Some(holder) =
            self.papers.iter().find(|p| p.id != paper_id && p.citation_id == Some(new_id))
        {
            tracing::warn!(
                project = %self.project,
                paper = %paper_id,
                citation_id = new_id,
                holder = %holder.id,
                "Citation number already in use"
            );
            return Ok(CitationUpdate::Conflict { holder: holder.id.clone() });
        }

        let Some(paper) = self.papers.iter_mut().find(|p| p.id == paper_id) else {
            return Ok(CitationUpdate::NotFound);
        };

        let previous = paper.citation_id.replace(new_id);
        self.persist()?;

        Ok(CitationUpdate::Updated { previous })
    }

    /// True when assigned citation numbers are not exactly `1..=count`.
    #[must_use]
    pub fn has_gaps(&self) -> bool {
        has_citation_gaps(&self.papers)
    }

    /// Follow a rename of the underlying project folder.
    pub(crate) fn set_project(&mut self, project: &str) {
        self.project = project.to_string();
    }

    /// Rewrite `saved_papers.json` from memory.
    pub fn persist(&self) -> StoreResult<()> {
        self.store.save_papers(&self.project, &self.papers)
    }

    /// Current summary state of a paper. Cached summaries are always `Ready`.
    #[must_use]
    pub fn summary_state(&self, paper_id: &str) -> SummaryState {
        if let Some(entry) = self.summaries.get(paper_id) {
            return SummaryState::Ready(entry.clone());
        }
        self.states.get(paper_id).cloned().unwrap_or(SummaryState::Idle)
    }

    /// Cached summary of a paper.
    #[must_use]
    pub fn cached_summary(&self, paper_id: &str) -> Option<&SummaryEntry> {
        self.summaries.get(paper_id)
    }

    /// Ask for a paper's summary. Returns the resulting state, or `None` for an unknown paper.
    ///
    /// Idle and failed papers become `Pending`; pending and ready ones are unchanged.
    pub fn request_summary(&mut self, paper_id: &str) -> Option<SummaryState> {
        if !self.contains(paper_id) {
            return None;
        }

        let state = self.summary_state(paper_id);
        match state {
            SummaryState::Idle | SummaryState::Failed(_) => {
                self.states.insert(paper_id.to_string(), SummaryState::Pending);
                Some(SummaryState::Pending)
            }
            SummaryState::Pending | SummaryState::Ready(_) => Some(state),
        }
    }

    /// IDs of papers waiting for generation, in paper order.
    #[must_use]
    pub fn pending_summaries(&self) -> Vec<String> {
        self.papers
            .iter()
            .filter(|p| self.states.get(&p.id).is_some_and(SummaryState::is_pending))
            .map(|p| p.id.clone())
            .collect()
    }

    /// Generate every pending summary, one at a time, and persist the cache.
    ///
    /// Returns how many papers left the `Pending` state. Unreachable-model
    /// errors stop the pass and are returned; other failures mark the paper
    /// `Failed` and the pass continues.
    pub async fn advance_summaries(&mut self, summarizer: &Summarizer) -> Result<usize, ClientError> {
        let mut advanced = 0;

        for paper_id in self.pending_summaries() {
            let Some(paper) = self.get(&paper_id) else {
                continue;
            };
            let abstract_text = paper.summary.clone();

            match summarizer.summarize(&paper_id, &abstract_text, &mut self.summaries).await {
                Ok(_) => {
                    self.states.remove(&paper_id);
                    if let Err(e) = self.store.save_summary_cache(&self.project, &self.summaries) {
                        tracing::warn!(project = %self.project, error = %e, "Failed to save summary cache");
                    }
                }
                Err(e) if e.is_unavailable() => return Err(e),
                Err(e) => {
                    tracing::warn!(paper = %paper_id, error = %e, "Summary generation failed");
                    self.states.insert(paper_id.clone(), SummaryState::Failed(e.to_string()));
                }
            }
            advanced += 1;
        }

        Ok(advanced)
    }
}
