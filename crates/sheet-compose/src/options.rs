use crate::constants::*;
use crate::eligibility::ScaleRange;
use crate::types::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Fixed margins around the view grid, in millimeters
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LayoutMargins {
    /// Space above the first row
    pub top_mm: f64,
    /// Space below the last row, kept clear for the title block strip
    pub bottom_mm: f64,
    /// Space on the left and right of the grid
    pub side_mm: f64,
    /// Gap between rows
    pub row_spacing_mm: f64,
}

impl Default for LayoutMargins {
    fn default() -> Self {
        Self {
            top_mm: GRID_TOP_MARGIN_MM,
            bottom_mm: GRID_BOTTOM_MARGIN_MM,
            side_mm: GRID_SIDE_MARGIN_MM,
            row_spacing_mm: GRID_ROW_SPACING_MM,
        }
    }
}

/// Composition configuration
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct ComposeOptions {
    // Grid
    pub margins: LayoutMargins,
    pub columns: usize,
    pub grid_scale: u32,
    pub grid_fill_ratio: f64,

    // Per-view adjustments
    pub crop_fill_ratio: f64,
    pub scale_range: ScaleRange,

    // Sheet creation
    pub sheet_number_prefix: String,
    pub sheet_number_base: usize,
    pub composite_sheet_name: String,

    // Title block handling
    pub standard_sheet_height_mm: f64,
    pub fallback_title_block: TitleBlockSize,
}

impl Default for ComposeOptions {
    fn default() -> Self {
        Self {
            margins: LayoutMargins::default(),
            columns: GRID_COLUMNS,
            grid_scale: GRID_VIEW_SCALE,
            grid_fill_ratio: GRID_FILL_RATIO,
            crop_fill_ratio: CROP_FILL_RATIO,
            scale_range: ScaleRange::default(),
            sheet_number_prefix: SHEET_NUMBER_PREFIX.to_string(),
            sheet_number_base: SHEET_NUMBER_BASE,
            composite_sheet_name: COMPOSITE_SHEET_NAME.to_string(),
            standard_sheet_height_mm: STANDARD_SHEET_HEIGHT_MM,
            fallback_title_block: TitleBlockSize::ISO_A1,
        }
    }
}

impl ComposeOptions {
    /// Load options from JSON file
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let options = serde_json::from_slice(&bytes)
            .map_err(|e| ComposeError::Config(format!("Failed to parse config: {}", e)))?;
        Ok(options)
    }

    /// Save options to JSON file
    #[cfg(feature = "serde")]
    pub async fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ComposeError::Config(format!("Failed to serialize config: {}", e)))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    /// Validate the options
    pub fn validate(&self) -> Result<()> {
        if self.columns == 0 {
            return Err(ComposeError::Config(
                "Grid needs at least one column".to_string(),
            ));
        }

        for (name, ratio) in [
            ("grid_fill_ratio", self.grid_fill_ratio),
            ("crop_fill_ratio", self.crop_fill_ratio),
        ] {
            if !(ratio > 0.0 && ratio <= 1.0) {
                return Err(ComposeError::Config(format!(
                    "{} must be in (0, 1], got {}",
                    name, ratio
                )));
            }
        }

        let m = &self.margins;
        if [m.top_mm, m.bottom_mm, m.side_mm, m.row_spacing_mm]
            .iter()
            .any(|v| !v.is_finite() || *v < 0.0)
        {
            return Err(ComposeError::Config(
                "Margins must be finite and non-negative".to_string(),
            ));
        }

        if self.grid_scale == 0 {
            return Err(ComposeError::Config(
                "Grid scale must be positive".to_string(),
            ));
        }

        if self.scale_range.min == 0 || self.scale_range.min > self.scale_range.max {
            return Err(ComposeError::Config(format!(
                "Invalid scale range 1:{} to 1:{}",
                self.scale_range.min, self.scale_range.max
            )));
        }

        if !self.fallback_title_block.is_valid() {
            return Err(ComposeError::Config(
                "Fallback title block size must be positive".to_string(),
            ));
        }

        if !(self.standard_sheet_height_mm.is_finite() && self.standard_sheet_height_mm > 0.0) {
            return Err(ComposeError::Config(
                "Standard sheet height must be positive".to_string(),
            ));
        }

        Ok(())
    }
}
