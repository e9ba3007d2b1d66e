//! Fuzzing library for summaraize.
//!
//! Targets cover the parsers that see untrusted input: arXiv Atom feeds,
//! free-text model output and the persisted paper list.
//!
//! # Usage
//!
//! ```bash
//! cd crates/summaraize-fuzz
//! cargo +nightly fuzz run fuzz_atom_feed -- -max_total_time=60
//! ```

pub use summaraize::client::parse_atom_feed;
pub use summaraize::models;
pub use summaraize::services::parse_summary_output;
