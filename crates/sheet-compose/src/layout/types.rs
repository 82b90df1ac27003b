//! Layout data types for sheet composition
//!
//! These types carry the planner's decisions to the placement resolver.
//! They live only for the duration of one composition call.

use crate::options::LayoutMargins;
use crate::types::{ElementId, TitleBlockSize};

/// Position within the grid (row, column)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridPosition {
    /// Row index (0 = top row)
    pub row: usize,
    /// Column index (0 = leftmost column)
    pub col: usize,
}

impl GridPosition {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Position of the `index`-th view when filling rows left to right
    pub fn from_index(index: usize, cols: usize) -> Self {
        Self::new(index / cols, index % cols)
    }
}

/// Grid of equally sized cells on a sheet
///
/// All measurements are millimeters from the sheet's top-left corner,
/// y growing downwards.
#[derive(Debug, Clone, PartialEq)]
pub struct GridLayout {
    pub cols: usize,
    /// Rows the cell height was computed for
    pub rows: usize,
    pub cell_width_mm: f64,
    pub cell_height_mm: f64,
    pub margins: LayoutMargins,
    pub sheet: TitleBlockSize,
}

impl GridLayout {
    /// Lowest y a cell edge may reach
    pub fn bottom_limit_mm(&self) -> f64 {
        self.sheet.height_mm - self.margins.bottom_mm
    }

    /// Cells have a positive, finite size
    pub fn is_valid(&self) -> bool {
        self.cols > 0
            && self.cell_width_mm.is_finite()
            && self.cell_height_mm.is_finite()
            && self.cell_width_mm > 0.0
            && self.cell_height_mm > 0.0
    }
}

/// Placement intent for one view
#[derive(Debug, Clone, PartialEq)]
pub struct ViewPlacement {
    pub view: ElementId,
    /// Target center, millimeters from the sheet's left edge
    pub center_x_mm: f64,
    /// Target center, millimeters from the sheet's top edge
    pub center_y_mm: f64,
    /// Scale denominator to force onto the view
    pub scale: Option<u32>,
    /// Largest on-sheet width the view may occupy
    pub max_width_mm: Option<f64>,
    /// Largest on-sheet height the view may occupy
    pub max_height_mm: Option<f64>,
    /// Center the view on the sheet outline instead of using the target
    pub center_only: bool,
}

impl ViewPlacement {
    /// Intent for a view that is simply centered on its own sheet
    pub fn centered(view: ElementId) -> Self {
        Self {
            view,
            center_x_mm: 0.0,
            center_y_mm: 0.0,
            scale: None,
            max_width_mm: None,
            max_height_mm: None,
            center_only: true,
        }
    }
}

/// Result of planning one grid sheet
#[derive(Debug, Clone, PartialEq)]
pub struct GridPlan {
    pub grid: GridLayout,
    pub placements: Vec<ViewPlacement>,
    /// Views that did not fit, in request order
    pub overflow: Vec<ElementId>,
    /// Most views this sheet can hold
    pub capacity: usize,
}

impl GridPlan {
    pub fn is_truncated(&self) -> bool {
        !self.overflow.is_empty()
    }
}
