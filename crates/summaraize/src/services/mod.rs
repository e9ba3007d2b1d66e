//! Model-backed services: summaries, suggestions and semantic search.
//!
//! Each service holds its collaborators behind the traits in [`crate::client`].

mod searcher;
mod suggester;
mod summarizer;

pub use searcher::{SearchHit, Searcher, answer_prompt, chunk_page, cosine_similarity};
pub use suggester::{Suggester, fallback_id, is_relevant, parse_queries, query_prompt, relevance_prompt};
pub use summarizer::{ParsedSummary, PLACEHOLDER, Summarizer, parse_summary_output, summary_prompt};
