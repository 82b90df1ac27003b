use sheet_compose::layout::*;
use sheet_compose::*;

fn ids(n: u64) -> Vec<ElementId> {
    (1..=n).map(ElementId).collect()
}

#[test]
fn test_a1_grid_dimensions() {
    let options = ComposeOptions::default();
    let plan = plan_grid(&ids(4), TitleBlockSize::ISO_A1, &options);

    assert_eq!(plan.grid.cols, 2);
    assert_eq!(plan.grid.rows, 2);
    assert_eq!(plan.grid.cell_width_mm, 385.5);
    assert_eq!(plan.grid.cell_height_mm, 257.0);
    assert_eq!(plan.placements.len(), 4);
    assert!(plan.placements.iter().all(|p| p.scale == Some(200)));

    let centers: Vec<(f64, f64)> = plan
        .placements
        .iter()
        .map(|p| (p.center_x_mm, p.center_y_mm))
        .collect();
    assert_eq!(
        centers,
        vec![
            (227.75, 143.5),
            (613.25, 143.5),
            (227.75, 440.5),
            (613.25, 440.5),
        ]
    );
}

#[test]
fn test_third_row_never_fits() {
    let options = ComposeOptions::default();
    let plan = plan_grid(&ids(5), TitleBlockSize::ISO_A1, &options);

    assert_eq!(plan.placements.len(), 4);
    assert_eq!(plan.capacity, 4);
    assert_eq!(plan.overflow, vec![ElementId(5)]);
    assert!(plan.is_truncated());
}

#[test]
fn test_placements_stay_in_usable_area() {
    let options = ComposeOptions::default();
    for sheet in [
        TitleBlockSize::ISO_A1,
        TitleBlockSize::new(1189.0, 841.0),
        TitleBlockSize::new(420.0, 297.0),
    ] {
        let plan = plan_grid(&ids(8), sheet, &options);
        for p in &plan.placements {
            assert!(is_within_usable_area(
                sheet,
                &options.margins,
                p.center_x_mm,
                p.center_y_mm
            ));
        }
    }
}

#[test]
fn test_centered_placement_keeps_view_settings() {
    let p = plan_centered(ElementId(7));
    assert!(p.center_only);
    assert_eq!(p.scale, None);
    assert_eq!(p.max_width_mm, None);
    assert_eq!(p.max_height_mm, None);
}
