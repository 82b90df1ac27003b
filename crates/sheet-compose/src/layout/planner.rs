//! Placement planning
//!
//! Turns a list of selected views into placement intents: grid cells for
//! the grid modes, a plain centered intent for one sheet per view.

use crate::options::ComposeOptions;
use crate::types::{ElementId, ManualOverride, TitleBlockSize};

use super::{
    GridLayout, GridPlan, GridPosition, ViewPlacement, cell_center, create_grid_layout, row_fits,
};

/// Plan one grid sheet.
///
/// Views fill the grid row by row. Planning stops at the first view whose
/// cell would cross the bottom margin; that view and all following ones
/// end up in [`GridPlan::overflow`]. Every placement forces the grid scale
/// and may use `grid_fill_ratio` of its cell.
pub fn plan_grid(views: &[ElementId], sheet: TitleBlockSize, options: &ComposeOptions) -> GridPlan {
    let grid = create_grid_layout(sheet, options.columns, options.margins);
    let capacity = super::grid_capacity(&grid);

    let mut placements = Vec::with_capacity(views.len().min(capacity));
    let mut fitted = 0;

    for (index, &view) in views.iter().enumerate() {
        let pos = GridPosition::from_index(index, grid.cols.max(1));
        if !row_fits(&grid, pos.row) {
            break;
        }
        placements.push(grid_placement(&grid, view, pos, options));
        fitted = index + 1;
    }

    let overflow = views[fitted..].to_vec();
    if !overflow.is_empty() {
        log::info!(
            "Maximum of {} views fit on the sheet; {} left over",
            capacity,
            overflow.len()
        );
    }

    GridPlan {
        grid,
        placements,
        overflow,
        capacity,
    }
}

fn grid_placement(
    grid: &GridLayout,
    view: ElementId,
    pos: GridPosition,
    options: &ComposeOptions,
) -> ViewPlacement {
    let (center_x_mm, center_y_mm) = cell_center(grid, pos);
    ViewPlacement {
        view,
        center_x_mm,
        center_y_mm,
        scale: Some(options.grid_scale),
        max_width_mm: Some(grid.cell_width_mm * options.grid_fill_ratio),
        max_height_mm: Some(grid.cell_height_mm * options.grid_fill_ratio),
        center_only: false,
    }
}

/// Plan grid sheets until every view has a cell.
///
/// Returns an empty list when the sheet cannot hold a single view.
pub fn paginate(
    views: &[ElementId],
    sheet: TitleBlockSize,
    options: &ComposeOptions,
) -> Vec<GridPlan> {
    let mut pages = Vec::new();
    let mut remaining = views.to_vec();

    while !remaining.is_empty() {
        let plan = plan_grid(&remaining, sheet, options);
        if plan.placements.is_empty() {
            break;
        }
        remaining = plan.overflow.clone();
        pages.push(plan);
    }

    pages
}

/// Intent for one view on its own sheet
pub fn plan_centered(view: ElementId) -> ViewPlacement {
    ViewPlacement::centered(view)
}

/// Replace planned positions with explicit ones.
///
/// Overrides for views that are not part of the plan are ignored.
pub fn apply_overrides(placements: &mut [ViewPlacement], overrides: &[ManualOverride]) {
    for manual in overrides {
        if let Some(placement) = placements.iter_mut().find(|p| p.view == manual.view) {
            placement.center_x_mm = manual.center_x_mm;
            placement.center_y_mm = manual.center_y_mm;
            placement.center_only = false;
            if manual.scale.is_some() {
                placement.scale = manual.scale;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(n: u64) -> Vec<ElementId> {
        (1..=n).map(ElementId).collect()
    }

    #[test]
    fn test_four_views_two_by_two() {
        let options = ComposeOptions::default();
        let plan = plan_grid(&ids(4), TitleBlockSize::ISO_A1, &options);

        assert_eq!(plan.placements.len(), 4);
        assert!(!plan.is_truncated());
        assert_eq!(plan.capacity, 4);

        let rows: Vec<f64> = plan.placements.iter().map(|p| p.center_y_mm).collect();
        assert_eq!(rows[0], rows[1]);
        assert_eq!(rows[2], rows[3]);
        assert!(rows[2] > rows[0]);
    }

    #[test]
    fn test_fill_ratio_and_scale() {
        let options = ComposeOptions::default();
        let plan = plan_grid(&ids(1), TitleBlockSize::ISO_A1, &options);
        let p = &plan.placements[0];

        assert_eq!(p.scale, Some(200));
        assert!((p.max_width_mm.unwrap() - 385.5 * 0.85).abs() < 1e-9);
        assert!((p.max_height_mm.unwrap() - 257.0 * 0.85).abs() < 1e-9);
        assert!(!p.center_only);
    }

    #[test]
    fn test_overflow_keeps_order() {
        let options = ComposeOptions::default();
        let plan = plan_grid(&ids(7), TitleBlockSize::ISO_A1, &options);

        assert_eq!(plan.placements.len(), 4);
        assert_eq!(plan.overflow, vec![ElementId(5), ElementId(6), ElementId(7)]);
    }

    #[test]
    fn test_no_cell_crosses_bottom_margin() {
        let options = ComposeOptions::default();
        for (w, h) in [(841.0, 594.0), (594.0, 420.0), (420.0, 297.0), (1189.0, 841.0)] {
            let plan = plan_grid(&ids(10), TitleBlockSize::new(w, h), &options);
            for p in &plan.placements {
                let lower = p.center_y_mm + plan.grid.cell_height_mm / 2.0;
                assert!(lower <= h - options.margins.bottom_mm + 1e-9);
            }
        }
    }

    #[test]
    fn test_paginate() {
        let options = ComposeOptions::default();
        let pages = paginate(&ids(9), TitleBlockSize::ISO_A1, &options);

        assert_eq!(pages.len(), 3);
        assert_eq!(pages[0].placements.len(), 4);
        assert_eq!(pages[1].placements.len(), 4);
        assert_eq!(pages[2].placements.len(), 1);
        assert_eq!(pages[2].placements[0].view, ElementId(9));
    }

    #[test]
    fn test_paginate_unusable_sheet() {
        let options = ComposeOptions::default();
        let pages = paginate(&ids(3), TitleBlockSize::new(50.0, 50.0), &options);
        assert!(pages.is_empty());
    }

    #[test]
    fn test_overrides() {
        let options = ComposeOptions::default();
        let mut plan = plan_grid(&ids(2), TitleBlockSize::ISO_A1, &options);
        apply_overrides(
            &mut plan.placements,
            &[
                ManualOverride {
                    view: ElementId(2),
                    center_x_mm: 400.0,
                    center_y_mm: 300.0,
                    scale: Some(100),
                },
                ManualOverride {
                    view: ElementId(42),
                    center_x_mm: 1.0,
                    center_y_mm: 1.0,
                    scale: None,
                },
            ],
        );

        assert_eq!(plan.placements[1].center_x_mm, 400.0);
        assert_eq!(plan.placements[1].center_y_mm, 300.0);
        assert_eq!(plan.placements[1].scale, Some(100));
        assert_eq!(plan.placements[0].scale, Some(200));
    }
}
