//! Sheet-level helpers: numbering, naming, title block measurement and
//! viewport anchors

use crate::geometry::{BoundingBox, Point, to_internal};
use crate::host::HostDocument;
use crate::options::ComposeOptions;
use crate::types::{ElementId, Sheet, TitleBlockSize, View};

/// Number for the next sheet: prefix followed by base + existing sheet count.
///
/// When that number is already taken (a sheet was deleted earlier), the
/// next free number above it is used instead. Two sheets created against
/// the same sheet set get the same number; callers create sheets one at a
/// time and recount in between.
pub fn next_sheet_number(existing: &[Sheet], options: &ComposeOptions) -> String {
    let number = |n: usize| format!("{}{}", options.sheet_number_prefix, n);
    let taken = |candidate: &str| existing.iter().any(|s| s.number == candidate);

    let first = existing.len() + options.sheet_number_base;
    let mut n = first;
    while taken(&number(n)) {
        n += 1;
    }

    if n != first {
        log::warn!(
            "Sheet number {} is already in use; using {}",
            number(first),
            number(n)
        );
    }
    number(n)
}

/// Name of a sheet holding a single view
pub fn per_view_sheet_name(view: &View) -> String {
    format!("{} - {}", view.kind.label(), view.name)
}

/// Measure the title block on `sheet`, falling back when it cannot be measured
pub fn title_block_size<D: HostDocument + ?Sized>(
    doc: &D,
    sheet: ElementId,
    fallback: TitleBlockSize,
) -> TitleBlockSize {
    match doc.title_block_bounds(sheet) {
        Ok(Some(bounds)) => {
            let size = TitleBlockSize::from_bounds(&bounds);
            if size.is_valid() {
                size
            } else {
                log::warn!(
                    "Title block on sheet {} has an invalid size; assuming {} × {} mm",
                    sheet,
                    fallback.width_mm,
                    fallback.height_mm
                );
                fallback
            }
        }
        Ok(None) => {
            log::warn!(
                "No title block found on sheet {}; assuming {} × {} mm",
                sheet,
                fallback.width_mm,
                fallback.height_mm
            );
            fallback
        }
        Err(e) => {
            log::warn!(
                "Could not measure title block on sheet {} ({}); assuming {} × {} mm",
                sheet,
                e,
                fallback.width_mm,
                fallback.height_mm
            );
            fallback
        }
    }
}

/// Convert a target center (mm from the top-left corner) to a sheet anchor.
///
/// The host's y axis points up, so y is flipped against the outline top.
/// Title blocks shorter than the standard height sit centered inside it,
/// hence the shift by half the height difference.
pub fn viewport_anchor(
    outline: &BoundingBox,
    title_block: TitleBlockSize,
    x_mm: f64,
    y_mm: f64,
    standard_sheet_height_mm: f64,
) -> Point {
    let correction_mm = (standard_sheet_height_mm - title_block.height_mm) / 2.0;
    Point::new(
        outline.min.x + to_internal(x_mm),
        outline.max.y - to_internal(y_mm + correction_mm),
    )
}
