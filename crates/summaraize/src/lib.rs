//! SummarAIze
//!
//! A research-paper organizer driven from a chat client over MCP. Papers from
//! arXiv are grouped into projects, numbered for citation, summarized by a
//! local language model, searched semantically and extended with suggested
//! papers.
//!
//! # Features
//!
//! - **Citation registry**: unique paper IDs, smallest-free citation numbers
//!   that are reused and never renumbered, gap detection
//! - **Flat-file projects**: one folder per project, atomic JSON writes
//! - **Local LLM**: summaries, suggestion queries, relevance judgements and
//!   passage answers through Ollama
//! - **16 MCP tools** over stdio
//!
//! # Example
//!
//! ```no_run
//! use summaraize::{config::Config, registry::PaperRegistry, store::ProjectStore};
//! use summaraize::models::{Paper, ProjectConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let store = ProjectStore::open(&config.data_dir)?;
//!     store.create_project(&ProjectConfig::new("Quantum"))?;
//!
//!     let mut registry = PaperRegistry::open(store, "Quantum")?;
//!     registry.add(Paper { id: "2301.07041".to_string(), ..Default::default() })?;
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod formatters;
pub mod models;
pub mod registry;
pub mod server;
pub mod services;
pub mod store;
pub mod tools;

pub use client::{ArxivClient, OllamaClient};
pub use config::Config;
pub use error::{ClientError, StoreError, ToolError};
pub use registry::PaperRegistry;
pub use store::ProjectStore;
