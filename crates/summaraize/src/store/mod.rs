//! Flat-file project store.
//!
//! One directory per project under the data root:
//!
//! ```text
//! <root>/<title>/project_config.json
//!               /saved_papers.json
//!               /summary_cache.json
//!               /pdfs/<id>.pdf
//!               /cache/<id>.json
//! ```
//!
//! The store is single-writer. Every file is replaced atomically, but two
//! processes writing the same project still race and the last writer wins.

mod atomic;

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{StoreError, StoreResult};
use crate::models::{Paper, ProjectConfig, SummaryEntry};

pub(crate) use atomic::{read_json, write_bytes, write_json};

/// Project metadata file name.
pub const CONFIG_FILE: &str = "project_config.json";

/// Paper list file name.
pub const PAPERS_FILE: &str = "saved_papers.json";

/// Summary cache file name.
pub const SUMMARY_FILE: &str = "summary_cache.json";

/// Downloaded PDFs directory.
pub const PDF_DIR: &str = "pdfs";

/// Extracted page text directory.
pub const PAGE_CACHE_DIR: &str = "cache";

/// Page number to page text.
pub type PageText = BTreeMap<u32, String>;

/// Summary cache keyed by paper ID.
pub type SummaryCache = BTreeMap<String, SummaryEntry>;

/// Result of a rename request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenameOutcome {
    /// Folder moved and config title rewritten.
    Renamed,
    /// A project with the destination name exists; nothing changed.
    Conflict,
}

/// Flat-file namespace with one folder per project.
#[derive(Debug, Clone)]
pub struct ProjectStore {
    root: PathBuf,
}

impl ProjectStore {
    /// Open a store rooted at `root`, creating the directory if needed.
    pub fn open(root: impl Into<PathBuf>) -> StoreResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|e| StoreError::io(&root, e))?;
        Ok(Self { root })
    }

    /// Data root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory of the named project (not checked for existence).
    pub fn project_dir(&self, name: &str) -> StoreResult<PathBuf> {
        validate_name(name)?;
        Ok(self.root.join(name))
    }

    /// Check whether a project folder exists.
    #[must_use]
    pub fn exists(&self, name: &str) -> bool {
        self.project_dir(name).is_ok_and(|dir| dir.is_dir())
    }

    /// Project names, sorted.
    pub fn list_projects(&self) -> StoreResult<Vec<String>> {
        let entries = fs::read_dir(&self.root).map_err(|e| StoreError::io(&self.root, e))?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| StoreError::io(&self.root, e))?;
            if !entry.path().is_dir() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                if !name.starts_with('.') {
                    names.push(name.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    /// Create a project folder with its config.
    pub fn create_project(&self, config: &ProjectConfig) -> StoreResult<()> {
        let dir = self.project_dir(&config.title)?;
        if dir.exists() {
            return Err(StoreError::ProjectExists(config.title.clone()));
        }
        fs::create_dir_all(&dir).map_err(|e| StoreError::io(&dir, e))?;
        write_json(&dir.join(CONFIG_FILE), config)?;

        tracing::info!(project = %config.title, "Created project");
        Ok(())
    }

    /// Load a project's config. A folder without a config gets a bare one titled after the folder.
    pub fn load_config(&self, name: &str) -> StoreResult<ProjectConfig> {
        let dir = self.existing_dir(name)?;
        Ok(read_json(&dir.join(CONFIG_FILE))?.unwrap_or_else(|| ProjectConfig::new(name)))
    }

    /// Overwrite a project's config.
    pub fn save_config(&self, name: &str, config: &ProjectConfig) -> StoreResult<()> {
        let dir = self.existing_dir(name)?;
        write_json(&dir.join(CONFIG_FILE), config)
    }

    /// Rename a project: move the folder, then rewrite the config title.
    ///
    /// Returns [`RenameOutcome::Conflict`] without touching anything when the
    /// destination exists.
    pub fn rename_project(&self, name: &str, new_name: &str) -> StoreResult<RenameOutcome> {
        let from = self.existing_dir(name)?;
        let to = self.project_dir(new_name)?;

        if to.exists() {
            tracing::warn!(project = %name, target = %new_name, "Rename target exists");
            return Ok(RenameOutcome::Conflict);
        }

        let mut config = self.load_config(name)?;
        fs::rename(&from, &to).map_err(|e| StoreError::io(&from, e))?;

        config.title = new_name.to_string();
        write_json(&to.join(CONFIG_FILE), &config)?;

        tracing::info!(project = %name, renamed_to = %new_name, "Renamed project");
        Ok(RenameOutcome::Renamed)
    }

    /// Remove a project folder recursively.
    pub fn delete_project(&self, name: &str) -> StoreResult<()> {
        let dir = self.existing_dir(name)?;
        fs::remove_dir_all(&dir).map_err(|e| StoreError::io(&dir, e))?;

        tracing::info!(project = %name, "Deleted project");
        Ok(())
    }

    /// Load the saved paper list (empty if none saved yet).
    pub fn load_papers(&self, name: &str) -> StoreResult<Vec<Paper>> {
        let dir = self.existing_dir(name)?;
        Ok(read_json(&dir.join(PAPERS_FILE))?.unwrap_or_default())
    }

    /// Replace the saved paper list.
    pub fn save_papers(&self, name: &str, papers: &[Paper]) -> StoreResult<()> {
        let dir = self.existing_dir(name)?;
        write_json(&dir.join(PAPERS_FILE), papers)
    }

    /// Load the summary cache. A corrupt cache is logged and treated as empty.
    pub fn load_summary_cache(&self, name: &str) -> StoreResult<SummaryCache> {
        let dir = self.existing_dir(name)?;
        match read_json(&dir.join(SUMMARY_FILE)) {
            Ok(cache) => Ok(cache.unwrap_or_default()),
            Err(StoreError::Json { path, source }) => {
                tracing::warn!(path = %path.display(), error = %source, "Failed to load summary cache");
                Ok(SummaryCache::new())
            }
            Err(e) => Err(e),
        }
    }

    /// Replace the summary cache.
    pub fn save_summary_cache(&self, name: &str, cache: &SummaryCache) -> StoreResult<()> {
        let dir = self.existing_dir(name)?;
        write_json(&dir.join(SUMMARY_FILE), cache)
    }

    /// Path of a paper's downloaded PDF.
    pub fn pdf_path(&self, name: &str, paper_id: &str) -> StoreResult<PathBuf> {
        let dir = self.existing_dir(name)?;
        Ok(dir.join(PDF_DIR).join(format!("{}.pdf", file_stem(paper_id))))
    }

    /// Store a downloaded PDF, replacing any earlier copy in one step.
    pub fn save_pdf(&self, name: &str, paper_id: &str, bytes: &[u8]) -> StoreResult<PathBuf> {
        let path = self.pdf_path(name, paper_id)?;
        write_bytes(&path, bytes)?;
        Ok(path)
    }

    /// Load cached page text for a paper.
    pub fn load_page_cache(&self, name: &str, paper_id: &str) -> StoreResult<Option<PageText>> {
        read_json(&self.page_cache_path(name, paper_id)?)
    }

    /// Cache extracted page text for a paper.
    pub fn save_page_cache(&self, name: &str, paper_id: &str, pages: &PageText) -> StoreResult<()> {
        write_json(&self.page_cache_path(name, paper_id)?, pages)
    }

    fn page_cache_path(&self, name: &str, paper_id: &str) -> StoreResult<PathBuf> {
        let dir = self.existing_dir(name)?;
        Ok(dir.join(PAGE_CACHE_DIR).join(format!("{}.json", file_stem(paper_id))))
    }

    fn existing_dir(&self, name: &str) -> StoreResult<PathBuf> {
        let dir = self.project_dir(name)?;
        if dir.is_dir() { Ok(dir) } else { Err(StoreError::ProjectNotFound(name.to_string())) }
    }
}

/// Project titles are folder names; reject anything that escapes the root.
fn validate_name(name: &str) -> StoreResult<()> {
    let reason = if name.trim().is_empty() {
        Some("must not be empty")
    } else if name != name.trim() {
        Some("must not start or end with whitespace")
    } else if name == "." || name == ".." || name.starts_with('.') {
        Some("must not start with '.'")
    } else if name.contains(['/', '\\', '\0']) {
        Some("must not contain path separators")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(StoreError::InvalidName { name: name.to_string(), reason }),
        None => Ok(()),
    }
}

/// Old-style arXiv IDs contain '/', which cannot appear in a file name.
fn file_stem(paper_id: &str) -> String {
    paper_id.replace(['/', '\\'], "_")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (tempfile::TempDir, ProjectStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = ProjectStore::open(dir.path()).unwrap();
        (dir, store)
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("Quantum Foundations").is_ok());
        assert!(validate_name("").is_err());
        assert!(validate_name("..").is_err());
        assert!(validate_name("a/b").is_err());
        assert!(validate_name(" padded").is_err());
    }

    #[test]
    fn test_create_and_list_projects() {
        let (_dir, store) = store();
        store.create_project(&ProjectConfig::new("B")).unwrap();
        store.create_project(&ProjectConfig::new("A")).unwrap();

        assert_eq!(store.list_projects().unwrap(), vec!["A", "B"]);
        assert!(matches!(
            store.create_project(&ProjectConfig::new("A")),
            Err(StoreError::ProjectExists(_))
        ));
    }

    #[test]
    fn test_missing_project() {
        let (_dir, store) = store();
        assert!(matches!(store.load_papers("nope"), Err(StoreError::ProjectNotFound(_))));
        assert!(!store.exists("nope"));
    }

    #[test]
    fn test_config_defaults_to_folder_name() {
        let (dir, store) = store();
        fs::create_dir(dir.path().join("Legacy")).unwrap();
        assert_eq!(store.load_config("Legacy").unwrap(), ProjectConfig::new("Legacy"));
    }

    #[test]
    fn test_corrupt_summary_cache_is_empty() {
        let (dir, store) = store();
        store.create_project(&ProjectConfig::new("P")).unwrap();
        fs::write(dir.path().join("P").join(SUMMARY_FILE), "[1, 2").unwrap();

        assert!(store.load_summary_cache("P").unwrap().is_empty());
    }

    #[test]
    fn test_page_cache_round_trip_with_slashed_id() {
        let (_dir, store) = store();
        store.create_project(&ProjectConfig::new("P")).unwrap();

        let pages = PageText::from([(1, "first".to_string()), (2, "second".to_string())]);
        store.save_page_cache("P", "hep-th/9901001", &pages).unwrap();

        assert_eq!(store.load_page_cache("P", "hep-th/9901001").unwrap(), Some(pages));
        assert!(store.pdf_path("P", "hep-th/9901001").unwrap().ends_with("pdfs/hep-th_9901001.pdf"));
    }

    #[test]
    fn test_save_pdf_replaces_partial_file() {
        let (_dir, store) = store();
        store.create_project(&ProjectConfig::new("P")).unwrap();

        let path = store.pdf_path("P", "2301.07041").unwrap();
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, b"%PD").unwrap();

        assert_eq!(store.save_pdf("P", "2301.07041", b"%PDF-1.5 full").unwrap(), path);
        assert_eq!(fs::read(&path).unwrap(), b"%PDF-1.5 full");
        assert_eq!(fs::read_dir(path.parent().unwrap()).unwrap().count(), 1);
    }
}
