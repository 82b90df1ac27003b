#![cfg(feature = "serde")]

use sheet_compose::*;
use tempfile::NamedTempFile;

#[tokio::test]
async fn test_save_and_load_project() {
    let mut doc = MemoryDocument::new();
    doc.add_title_block_type("A1", TitleBlockSize::ISO_A1);
    let view = doc.add_view("Level 1", ViewKind::FloorPlan);
    doc.add_view("Roof", ViewKind::Elevation);

    let request = ComposeRequest::new(vec![view], ComposeMode::SingleSheetGrid);
    compose(&mut doc, &request, &ComposeOptions::default()).unwrap();

    let temp_file = NamedTempFile::new().unwrap();
    save_project(&doc, temp_file.path()).await.unwrap();
    let loaded = load_project(temp_file.path()).await.unwrap();

    let ids = |d: &MemoryDocument| -> Vec<(ElementId, ElementKind)> {
        d.elements().iter().map(|e| (e.id(), e.kind())).collect()
    };
    assert_eq!(ids(&loaded), ids(&doc));
    assert_eq!(loaded.view(view).unwrap().scale, 200);
    assert_eq!(loaded.sheets().len(), 1);
    assert_eq!(loaded.sheet_hosting_view(view), Some(loaded.sheets()[0].id));
}

#[tokio::test]
async fn test_loaded_project_keeps_allocating_ids() {
    let mut doc = MemoryDocument::new();
    doc.add_title_block_type("A1", TitleBlockSize::ISO_A1);
    let first = doc.add_view("Level 1", ViewKind::FloorPlan);

    let temp_file = NamedTempFile::new().unwrap();
    save_project(&doc, temp_file.path()).await.unwrap();
    let mut loaded = load_project(temp_file.path()).await.unwrap();

    let second = loaded.add_view("Level 2", ViewKind::FloorPlan);
    assert_ne!(first, second);
    assert_eq!(loaded.views().len(), 2);
}

#[tokio::test]
async fn test_load_missing_project() {
    let result = load_project("/nonexistent/project.json").await;
    assert!(matches!(result, Err(ComposeError::Io(_))));
}

#[tokio::test]
async fn test_load_malformed_project() {
    let temp_file = NamedTempFile::new().unwrap();
    tokio::fs::write(temp_file.path(), "{ \"elements\": 3 }")
        .await
        .unwrap();

    let result = load_project(temp_file.path()).await;
    assert!(matches!(result, Err(ComposeError::Json(_))));
}
