use sheet_compose::*;

fn document(n: usize) -> (MemoryDocument, Vec<ElementId>) {
    let mut doc = MemoryDocument::new();
    doc.add_title_block_type("A1", TitleBlockSize::ISO_A1);
    let views = (1..=n)
        .map(|i| doc.add_view(&format!("Level {}", i), ViewKind::FloorPlan))
        .collect();
    (doc, views)
}

#[test]
fn test_single_sheet_statistics() {
    let (mut doc, views) = document(6);
    doc.view_mut(views[0]).unwrap().is_template = true;

    let request = ComposeRequest::new(views, ComposeMode::SingleSheetGrid);
    let stats = calculate_statistics(
        &doc,
        &request,
        TitleBlockSize::ISO_A1,
        &ComposeOptions::default(),
    )
    .unwrap();

    assert_eq!(stats.selected_views, 6);
    assert_eq!(stats.eligible_views, 5);
    assert_eq!(stats.views_per_sheet, 4);
    assert_eq!(stats.planned_sheets, 1);
    assert_eq!(stats.planned_views, 4);
    assert_eq!(stats.dropped_views, 2);
}

#[test]
fn test_paginated_statistics() {
    let (doc, views) = document(9);
    let request = ComposeRequest::new(views, ComposeMode::PaginatedGrid);
    let stats = calculate_statistics(
        &doc,
        &request,
        TitleBlockSize::ISO_A1,
        &ComposeOptions::default(),
    )
    .unwrap();

    assert_eq!(stats.planned_sheets, 3);
    assert_eq!(stats.planned_views, 9);
    assert_eq!(stats.dropped_views, 0);
}

#[test]
fn test_sheet_per_view_statistics() {
    let (mut doc, views) = document(3);
    doc.view_mut(views[1]).unwrap().scale = 20;

    let request = ComposeRequest::new(views, ComposeMode::SheetPerView);
    let stats = calculate_statistics(
        &doc,
        &request,
        TitleBlockSize::ISO_A1,
        &ComposeOptions::default(),
    )
    .unwrap();

    assert_eq!(stats.eligible_views, 2);
    assert_eq!(stats.views_per_sheet, 1);
    assert_eq!(stats.planned_sheets, 3);
}

#[test]
fn test_statistics_leave_document_untouched() {
    let (doc, views) = document(2);
    let before = doc.clone();
    let request = ComposeRequest::new(views, ComposeMode::SingleSheetGrid);

    calculate_statistics(
        &doc,
        &request,
        TitleBlockSize::ISO_A1,
        &ComposeOptions::default(),
    )
    .unwrap();
    assert_eq!(doc, before);
}

#[test]
fn test_statistics_without_views() {
    let (doc, _) = document(1);
    let request = ComposeRequest::new(Vec::new(), ComposeMode::SingleSheetGrid);
    let result = calculate_statistics(
        &doc,
        &request,
        TitleBlockSize::ISO_A1,
        &ComposeOptions::default(),
    );
    assert!(matches!(result, Err(ComposeError::NoViews)));
}
