//! Shared constants for sheet composition
//!
//! This module centralizes magic numbers and constants used throughout
//! the composition process. Most of them are the defaults behind
//! [`ComposeOptions`](crate::ComposeOptions).

// =============================================================================
// Unit Conversion
// =============================================================================

/// Millimeters per host internal length unit (the host measures in feet)
pub const MM_PER_INTERNAL_UNIT: f64 = 304.8;

/// Tolerance used when comparing computed layout edges against limits (mm)
pub const LAYOUT_EPSILON_MM: f64 = 1e-9;

// =============================================================================
// Sheet Sizes
// =============================================================================

/// ISO A1 width in millimeters, used when a title block cannot be measured
pub const ISO_A1_WIDTH_MM: f64 = 841.0;

/// ISO A1 height in millimeters
pub const ISO_A1_HEIGHT_MM: f64 = 594.0;

/// Nominal sheet height the viewport anchor correction is measured against
pub const STANDARD_SHEET_HEIGHT_MM: f64 = 594.0;

// =============================================================================
// Grid Layout
// =============================================================================

/// Space kept free above the first grid row
pub const GRID_TOP_MARGIN_MM: f64 = 15.0;

/// Space kept free below the last grid row (title block strip)
pub const GRID_BOTTOM_MARGIN_MM: f64 = 25.0;

/// Space kept free on the left and right of the grid
pub const GRID_SIDE_MARGIN_MM: f64 = 35.0;

/// Vertical gap between grid rows
pub const GRID_ROW_SPACING_MM: f64 = 40.0;

/// Default number of grid columns
pub const GRID_COLUMNS: usize = 2;

/// Rows per sheet. The cell height formula splits the usable height in two.
pub const GRID_ROWS: usize = 2;

/// Scale denominator forced onto every view placed by the grid planner (1:200)
pub const GRID_VIEW_SCALE: u32 = 200;

/// Share of a grid cell a view may occupy
pub const GRID_FILL_RATIO: f64 = 0.85;

/// Share of the allowed footprint a rescaled crop box may occupy.
/// Independent of [`GRID_FILL_RATIO`].
pub const CROP_FILL_RATIO: f64 = 0.90;

// =============================================================================
// Eligibility
// =============================================================================

/// Smallest scale denominator accepted when views keep their own scale (1:50)
pub const MIN_VIEW_SCALE: u32 = 50;

/// Largest scale denominator accepted when views keep their own scale (1:200)
pub const MAX_VIEW_SCALE: u32 = 200;

// =============================================================================
// Sheet Creation
// =============================================================================

/// Prefix of generated sheet numbers
pub const SHEET_NUMBER_PREFIX: &str = "A";

/// Number added to the existing sheet count when numbering a new sheet
pub const SHEET_NUMBER_BASE: usize = 101;

/// Name given to grid-composed sheets
pub const COMPOSITE_SHEET_NAME: &str = "Composite Sheet";

/// Name of the host transaction opened for each sheet
pub const TRANSACTION_NAME: &str = "Compose sheet with views";
