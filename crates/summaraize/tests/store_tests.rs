//! Project store tests: lifecycle, rename with conflict check, file layout.

mod common;

use std::fs;

use summaraize::error::StoreError;
use summaraize::models::{ProjectConfig, SummaryEntry};
use summaraize::registry::PaperRegistry;
use summaraize::store::{
    CONFIG_FILE, PAPERS_FILE, PageText, ProjectStore, RenameOutcome, SUMMARY_FILE, SummaryCache,
};

use common::{paper, store_with_project};

fn populated(store: &ProjectStore, title: &str) {
    let mut registry = PaperRegistry::open(store.clone(), title).unwrap();
    registry.add(paper("2301.07041")).unwrap();

    let cache = SummaryCache::from([(
        "2301.07041".to_string(),
        SummaryEntry { summary: "s".to_string(), keywords: "k".to_string() },
    )]);
    store.save_summary_cache(title, &cache).unwrap();
    store.save_page_cache(title, "2301.07041", &PageText::from([(1, "text".to_string())])).unwrap();

    let pdf = store.pdf_path(title, "2301.07041").unwrap();
    fs::create_dir_all(pdf.parent().unwrap()).unwrap();
    fs::write(&pdf, b"%PDF").unwrap();
}

// =============================================================================
// Lifecycle
// =============================================================================

#[test]
fn test_create_writes_config() {
    let dir = tempfile::tempdir().unwrap();
    let store = ProjectStore::open(dir.path().join("nested")).unwrap();

    let config = ProjectConfig {
        title: "Quantum".to_string(),
        description: "Foundations".to_string(),
        keywords: vec!["bell".to_string(), "epr".to_string()],
    };
    store.create_project(&config).unwrap();

    let raw = fs::read_to_string(dir.path().join("nested/Quantum").join(CONFIG_FILE)).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(json["title"], "Quantum");
    assert_eq!(json["keywords"], serde_json::json!(["bell", "epr"]));

    assert_eq!(store.load_config("Quantum").unwrap(), config);
    assert!(store.exists("Quantum"));
}

#[test]
fn test_invalid_project_names_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let store = ProjectStore::open(dir.path()).unwrap();

    for name in ["", "../escape", "a/b", ".hidden", "  "] {
        let result = store.create_project(&ProjectConfig::new(name));
        assert!(matches!(result, Err(StoreError::InvalidName { .. })), "{name:?}");
    }
    assert!(store.list_projects().unwrap().is_empty());
}

#[test]
fn test_delete_project_removes_everything() {
    let (dir, store) = store_with_project("Quantum");
    populated(&store, "Quantum");

    store.delete_project("Quantum").unwrap();

    assert!(!dir.path().join("Quantum").exists());
    assert!(store.list_projects().unwrap().is_empty());
    assert!(matches!(store.delete_project("Quantum"), Err(StoreError::ProjectNotFound(_))));
}

#[test]
fn test_writes_leave_no_temp_files() {
    let (dir, store) = store_with_project("Quantum");
    populated(&store, "Quantum");

    let leftovers: Vec<_> = fs::read_dir(dir.path().join("Quantum"))
        .unwrap()
        .filter_map(Result::ok)
        .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty());
}

// =============================================================================
// Rename
// =============================================================================

#[test]
fn test_rename_to_existing_name_is_noop() {
    let (dir, store) = store_with_project("Quantum");
    store.create_project(&ProjectConfig::new("Gravity")).unwrap();
    populated(&store, "Quantum");

    let before = fs::read_to_string(dir.path().join("Quantum").join(PAPERS_FILE)).unwrap();

    assert_eq!(store.rename_project("Quantum", "Gravity").unwrap(), RenameOutcome::Conflict);

    assert_eq!(store.load_config("Quantum").unwrap().title, "Quantum");
    assert_eq!(store.load_config("Gravity").unwrap().title, "Gravity");
    assert_eq!(fs::read_to_string(dir.path().join("Quantum").join(PAPERS_FILE)).unwrap(), before);
    assert!(store.load_papers("Gravity").unwrap().is_empty());
}

#[test]
fn test_rename_moves_all_files() {
    let (dir, store) = store_with_project("Quantum");
    populated(&store, "Quantum");

    assert_eq!(store.rename_project("Quantum", "Quantum Foundations").unwrap(), RenameOutcome::Renamed);

    let moved = dir.path().join("Quantum Foundations");
    assert!(moved.join(PAPERS_FILE).is_file());
    assert!(moved.join(SUMMARY_FILE).is_file());
    assert!(store.pdf_path("Quantum Foundations", "2301.07041").unwrap().is_file());
    assert!(store.load_page_cache("Quantum Foundations", "2301.07041").unwrap().is_some());

    assert_eq!(store.load_config("Quantum Foundations").unwrap().title, "Quantum Foundations");
    assert_eq!(store.load_papers("Quantum Foundations").unwrap().len(), 1);

    // The old name no longer resolves
    assert!(!store.exists("Quantum"));
    assert!(matches!(store.load_papers("Quantum"), Err(StoreError::ProjectNotFound(_))));
    assert_eq!(store.list_projects().unwrap(), vec!["Quantum Foundations"]);
}

#[test]
fn test_rename_missing_project() {
    let (_dir, store) = store_with_project("Quantum");
    assert!(matches!(store.rename_project("Nope", "Other"), Err(StoreError::ProjectNotFound(_))));
}
