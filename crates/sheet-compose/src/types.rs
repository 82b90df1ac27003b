use crate::constants::{ISO_A1_HEIGHT_MM, ISO_A1_WIDTH_MM};
use crate::geometry::{BoundingBox, Point, to_millimeters};
use crate::host::HostError;
use std::fmt;
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Error, Debug)]
pub enum ComposeError {
    #[error("Host error: {0}")]
    Host(#[from] HostError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[cfg(feature = "serde")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
    #[error("Document has no title block type to create sheets from")]
    NoTitleBlockType,
    #[error("No views selected")]
    NoViews,
}

pub type Result<T, E = ComposeError> = std::result::Result<T, E>;

// =============================================================================
// Element Model
// =============================================================================

/// Identity of any element in the host document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct ElementId(pub u64);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Drawing view classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ViewKind {
    FloorPlan,
    EngineeringPlan,
    Section,
    Elevation,
    Other,
}

impl ViewKind {
    /// Upper-case label used when naming per-view sheets
    pub fn label(self) -> &'static str {
        match self {
            ViewKind::FloorPlan => "FLOOR PLAN",
            ViewKind::EngineeringPlan => "ENGINEERING PLAN",
            ViewKind::Section => "SECTION",
            ViewKind::Elevation => "ELEVATION",
            ViewKind::Other => "VIEW",
        }
    }
}

impl fmt::Display for ViewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How the host stores a parameter value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ParameterStorage {
    #[default]
    Integer,
    Double,
    String,
    /// Parameter missing or read-only
    None,
}

/// A drawing view as read from the host
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct View {
    pub id: ElementId,
    pub name: String,
    pub kind: ViewKind,
    pub is_template: bool,
    pub printable: bool,
    /// Scale denominator (100 means 1:100)
    pub scale: u32,
    /// Storage type of the view's scale parameter
    #[cfg_attr(feature = "serde", serde(default))]
    pub scale_storage: ParameterStorage,
    /// Model extent shown by the view; `None` when cropping is unsupported
    #[cfg_attr(feature = "serde", serde(default))]
    pub crop_box: Option<BoundingBox>,
}

/// A drawing sheet
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Sheet {
    pub id: ElementId,
    pub number: String,
    pub name: String,
    /// Sheet outline in internal units
    pub outline: BoundingBox,
}

/// Placement of one view onto one sheet
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Viewport {
    pub id: ElementId,
    pub sheet: ElementId,
    pub view: ElementId,
    pub anchor: Point,
}

/// A title block family type that sheets are created from
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TitleBlockType {
    pub id: ElementId,
    pub name: String,
    pub size: TitleBlockSize,
}

/// A title block instance placed on a sheet
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TitleBlock {
    pub id: ElementId,
    pub sheet: ElementId,
    pub type_id: ElementId,
    /// Bounds in sheet internal units
    pub bounds: BoundingBox,
}

/// Discriminant of [`Element`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    View,
    Sheet,
    Viewport,
    TitleBlockType,
    TitleBlock,
}

/// Any element stored in a host document, tagged with its payload
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Element {
    View(View),
    Sheet(Sheet),
    Viewport(Viewport),
    TitleBlockType(TitleBlockType),
    TitleBlock(TitleBlock),
}

impl Element {
    pub fn id(&self) -> ElementId {
        match self {
            Element::View(v) => v.id,
            Element::Sheet(s) => s.id,
            Element::Viewport(vp) => vp.id,
            Element::TitleBlockType(t) => t.id,
            Element::TitleBlock(t) => t.id,
        }
    }

    pub fn kind(&self) -> ElementKind {
        match self {
            Element::View(_) => ElementKind::View,
            Element::Sheet(_) => ElementKind::Sheet,
            Element::Viewport(_) => ElementKind::Viewport,
            Element::TitleBlockType(_) => ElementKind::TitleBlockType,
            Element::TitleBlock(_) => ElementKind::TitleBlock,
        }
    }
}

// =============================================================================
// Sheet Geometry
// =============================================================================

/// Printable size of a sheet's title block in millimeters
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TitleBlockSize {
    pub width_mm: f64,
    pub height_mm: f64,
}

impl TitleBlockSize {
    /// Fallback used whenever a title block cannot be measured
    pub const ISO_A1: Self = Self {
        width_mm: ISO_A1_WIDTH_MM,
        height_mm: ISO_A1_HEIGHT_MM,
    };

    pub fn new(width_mm: f64, height_mm: f64) -> Self {
        Self {
            width_mm,
            height_mm,
        }
    }

    /// Measure a bounding box given in internal units
    pub fn from_bounds(bounds: &BoundingBox) -> Self {
        Self::new(
            to_millimeters(bounds.width()),
            to_millimeters(bounds.height()),
        )
    }

    pub fn is_valid(&self) -> bool {
        self.width_mm.is_finite()
            && self.height_mm.is_finite()
            && self.width_mm > 0.0
            && self.height_mm > 0.0
    }
}

impl Default for TitleBlockSize {
    fn default() -> Self {
        Self::ISO_A1
    }
}

// =============================================================================
// Requests
// =============================================================================

/// How selected views are distributed over sheets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ComposeMode {
    /// All views in a grid on one sheet; views that do not fit are dropped
    #[default]
    SingleSheetGrid,
    /// One sheet per view, the view centered and keeping its own scale
    SheetPerView,
    /// Grid sheets, carrying overflow to further sheets
    PaginatedGrid,
}

impl ComposeMode {
    /// Whether views keep their own scale, which must then lie in the accepted range
    pub fn enforces_scale_range(self) -> bool {
        matches!(self, ComposeMode::SheetPerView)
    }
}

/// Explicit position for one view, replacing the planned one
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ManualOverride {
    pub view: ElementId,
    pub center_x_mm: f64,
    pub center_y_mm: f64,
    pub scale: Option<u32>,
}

/// What the caller asks to compose
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ComposeRequest {
    pub views: Vec<ElementId>,
    pub mode: ComposeMode,
    #[cfg_attr(feature = "serde", serde(default))]
    pub overrides: Vec<ManualOverride>,
}

impl ComposeRequest {
    pub fn new(views: Vec<ElementId>, mode: ComposeMode) -> Self {
        Self {
            views,
            mode,
            overrides: Vec::new(),
        }
    }
}

// =============================================================================
// Outcomes
// =============================================================================

/// Why a view is not a placement candidate
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Ineligibility {
    #[error("view is a template")]
    Template,
    #[error("view cannot be printed")]
    NotPrintable,
    #[error("{0} views cannot be placed")]
    KindNotAllowed(ViewKind),
    #[error("scale 1:{scale} is outside 1:{min} to 1:{max}")]
    ScaleOutOfRange { scale: u32, min: u32, max: u32 },
}

/// Why a single view could not be placed
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlacementFailure {
    #[error("view {0} not found")]
    ViewNotFound(ElementId),
    #[error("not placeable: {0}")]
    Ineligible(#[from] Ineligibility),
    #[error("target ({x_mm:.1}, {y_mm:.1}) mm lies outside the usable sheet area")]
    OutOfBounds { x_mm: f64, y_mm: f64 },
    #[error("sheet is full: at most {capacity} views fit")]
    SheetFull { capacity: usize },
    #[error("could not set view scale: {0}")]
    Scale(HostError),
    #[error("could not rescale crop box: {0}")]
    CropBox(HostError),
    #[error("could not create viewport: {0}")]
    Viewport(HostError),
}

/// Result of placing one view
#[derive(Debug, Clone, PartialEq)]
pub enum PlacementOutcome {
    Placed {
        /// The view that was requested
        view: ElementId,
        /// The view actually on the sheet (a duplicate when `duplicated`)
        placed_view: ElementId,
        viewport: ElementId,
        duplicated: bool,
    },
    Failed {
        view: ElementId,
        reason: PlacementFailure,
    },
}

impl PlacementOutcome {
    pub fn view(&self) -> ElementId {
        match self {
            PlacementOutcome::Placed { view, .. } | PlacementOutcome::Failed { view, .. } => *view,
        }
    }

    pub fn is_placed(&self) -> bool {
        matches!(self, PlacementOutcome::Placed { .. })
    }

    pub fn failure(&self) -> Option<&PlacementFailure> {
        match self {
            PlacementOutcome::Failed { reason, .. } => Some(reason),
            PlacementOutcome::Placed { .. } => None,
        }
    }
}

/// Whether a sheet's transaction was kept
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetStatus {
    Committed,
    RolledBack,
}

/// Everything that happened while building one sheet
#[derive(Debug, Clone, PartialEq)]
pub struct SheetOutcome {
    /// Sheet id, present only when the sheet was committed
    pub sheet: Option<ElementId>,
    pub number: String,
    pub name: String,
    pub title_block: TitleBlockSize,
    pub status: SheetStatus,
    pub outcomes: Vec<PlacementOutcome>,
}

impl SheetOutcome {
    pub fn placed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_placed()).count()
    }
}

/// Aggregate state of a composition call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchStatus {
    /// Every requested view was placed
    Succeeded,
    /// Some views were placed, some failed
    PartiallySucceeded,
    /// Nothing was placed; nothing was persisted
    Failed,
    /// The caller aborted before any transaction opened
    Cancelled,
}

/// Result of a composition call
#[derive(Debug, Clone, PartialEq)]
pub struct ComposeReport {
    pub mode: ComposeMode,
    pub cancelled: bool,
    pub sheets: Vec<SheetOutcome>,
}

impl ComposeReport {
    pub fn cancelled(mode: ComposeMode) -> Self {
        Self {
            mode,
            cancelled: true,
            sheets: Vec::new(),
        }
    }

    pub fn outcomes(&self) -> impl Iterator<Item = &PlacementOutcome> {
        self.sheets.iter().flat_map(|s| s.outcomes.iter())
    }

    pub fn placed_count(&self) -> usize {
        self.outcomes().filter(|o| o.is_placed()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes().filter(|o| !o.is_placed()).count()
    }

    /// Sheets whose transaction was committed
    pub fn committed_sheets(&self) -> impl Iterator<Item = &SheetOutcome> {
        self.sheets
            .iter()
            .filter(|s| s.status == SheetStatus::Committed)
    }

    pub fn failures(&self) -> impl Iterator<Item = (ElementId, &PlacementFailure)> {
        self.outcomes()
            .filter_map(|o| o.failure().map(|reason| (o.view(), reason)))
    }

    pub fn status(&self) -> BatchStatus {
        if self.cancelled {
            return BatchStatus::Cancelled;
        }
        match (self.placed_count(), self.failed_count()) {
            (0, _) => BatchStatus::Failed,
            (_, 0) => BatchStatus::Succeeded,
            _ => BatchStatus::PartiallySucceeded,
        }
    }

    /// One-line summary suitable for a single aggregate message
    pub fn summary(&self) -> String {
        if self.cancelled {
            return "Composition cancelled".to_string();
        }
        let sheets = self.committed_sheets().count();
        let placed = self.placed_count();
        let failed = self.failed_count();
        let mut summary = format!(
            "{} of {} views placed on {} sheet(s)",
            placed,
            placed + failed,
            sheets
        );
        if failed > 0 {
            summary.push_str(&format!("; {} failed", failed));
        }
        summary
    }
}

/// Prediction of a composition without touching the document
#[derive(Debug, Clone, PartialEq)]
pub struct CompositionStatistics {
    /// Views in the request
    pub selected_views: usize,
    /// Views that pass the placeable filter for the requested mode
    pub eligible_views: usize,
    /// Views per sheet in the grid modes (1 for one sheet per view)
    pub views_per_sheet: usize,
    /// Sheets that would be created
    pub planned_sheets: usize,
    /// Selected views that get a placement intent
    pub planned_views: usize,
    /// Selected views dropped because the sheet is full
    pub dropped_views: usize,
}
