//! Grid layout calculation
//!
//! This module handles the geometric layout of the view grid on a sheet:
//! cell dimensions, cell centers and the usable area inside the margins.

use crate::constants::{GRID_ROWS, LAYOUT_EPSILON_MM};
use crate::options::LayoutMargins;
use crate::types::TitleBlockSize;

use super::{GridLayout, GridPosition};

// =============================================================================
// Grid Creation
// =============================================================================

/// Create the grid for a sheet.
///
/// The usable height (sheet minus top and bottom margins) holds two rows
/// separated by the row spacing; the width between the side margins is
/// split evenly into `columns`.
pub fn create_grid_layout(
    sheet: TitleBlockSize,
    columns: usize,
    margins: LayoutMargins,
) -> GridLayout {
    let usable_height = sheet.height_mm - margins.top_mm - margins.bottom_mm;
    let cell_height_mm =
        (usable_height - margins.row_spacing_mm * (GRID_ROWS - 1) as f64) / GRID_ROWS as f64;

    let cell_width_mm = if columns > 0 {
        (sheet.width_mm - 2.0 * margins.side_mm) / columns as f64
    } else {
        0.0
    };

    GridLayout {
        cols: columns,
        rows: GRID_ROWS,
        cell_width_mm,
        cell_height_mm,
        margins,
        sheet,
    }
}

// =============================================================================
// Cell Calculations
// =============================================================================

/// Center of the cell at `pos`, in millimeters from the top-left corner
pub fn cell_center(grid: &GridLayout, pos: GridPosition) -> (f64, f64) {
    let m = &grid.margins;
    let x = m.side_mm + pos.col as f64 * grid.cell_width_mm + grid.cell_width_mm / 2.0;
    let y = m.top_mm
        + pos.row as f64 * (grid.cell_height_mm + m.row_spacing_mm)
        + grid.cell_height_mm / 2.0;
    (x, y)
}

/// Lower edge of a row's cells
pub fn row_lower_edge(grid: &GridLayout, row: usize) -> f64 {
    let (_, center_y) = cell_center(grid, GridPosition::new(row, 0));
    center_y + grid.cell_height_mm / 2.0
}

/// Whether a row stays above the bottom margin
pub fn row_fits(grid: &GridLayout, row: usize) -> bool {
    grid.is_valid() && row_lower_edge(grid, row) <= grid.bottom_limit_mm() + LAYOUT_EPSILON_MM
}

/// Number of rows that fit on the sheet
pub fn fitting_rows(grid: &GridLayout) -> usize {
    let mut rows = 0;
    while row_fits(grid, rows) {
        rows += 1;
    }
    rows
}

/// Most views one sheet of this grid can hold
pub fn grid_capacity(grid: &GridLayout) -> usize {
    fitting_rows(grid) * grid.cols
}

// =============================================================================
// Usable Area
// =============================================================================

/// Whether a target center lies inside the sheet minus its margins
pub fn is_within_usable_area(
    sheet: TitleBlockSize,
    margins: &LayoutMargins,
    x_mm: f64,
    y_mm: f64,
) -> bool {
    let eps = LAYOUT_EPSILON_MM;
    x_mm.is_finite()
        && y_mm.is_finite()
        && x_mm >= margins.side_mm - eps
        && x_mm <= sheet.width_mm - margins.side_mm + eps
        && y_mm >= margins.top_mm - eps
        && y_mm <= sheet.height_mm - margins.bottom_mm + eps
}

// =============================================================================
// Tests
// =============================================================================
