//! Per-view placement
//!
//! Each placement either ends in a viewport or in a recorded failure; no
//! failure here aborts the batch. Steps, in order:
//! 1. resolve the view and check it is placeable and inside the usable area
//! 2. duplicate it when another sheet already hosts it
//! 3. force the planned scale (integer scale parameters only)
//! 4. rescale the crop box to the allowed footprint
//! 5. compute the viewport anchor
//! 6. create the viewport

use super::sheet::viewport_anchor;
use crate::eligibility::check_placeable;
use crate::geometry::{scale_and_center_box, to_millimeters};
use crate::host::HostDocument;
use crate::layout::{ViewPlacement, is_within_usable_area};
use crate::options::ComposeOptions;
use crate::types::*;

/// Everything the resolver needs to know about the sheet being built
#[derive(Debug, Clone, Copy)]
pub struct PlacementContext<'a> {
    pub sheet: &'a Sheet,
    pub title_block: TitleBlockSize,
    pub mode: ComposeMode,
    pub options: &'a ComposeOptions,
}

/// Place one view on the context's sheet
pub fn place<D: HostDocument + ?Sized>(
    doc: &mut D,
    ctx: &PlacementContext<'_>,
    placement: &ViewPlacement,
) -> PlacementOutcome {
    match resolve(doc, ctx, placement) {
        Ok(outcome) => outcome,
        Err(reason) => {
            log::warn!(
                "Could not add view {} to sheet {}: {}",
                placement.view,
                ctx.sheet.number,
                reason
            );
            PlacementOutcome::Failed {
                view: placement.view,
                reason,
            }
        }
    }
}

fn resolve<D: HostDocument + ?Sized>(
    doc: &mut D,
    ctx: &PlacementContext<'_>,
    placement: &ViewPlacement,
) -> Result<PlacementOutcome, PlacementFailure> {
    let view = doc
        .view(placement.view)
        .ok_or(PlacementFailure::ViewNotFound(placement.view))?;
    check_placeable(&view, ctx.mode, &ctx.options.scale_range)?;

    if !placement.center_only
        && !is_within_usable_area(
            ctx.title_block,
            &ctx.options.margins,
            placement.center_x_mm,
            placement.center_y_mm,
        )
    {
        return Err(PlacementFailure::OutOfBounds {
            x_mm: placement.center_x_mm,
            y_mm: placement.center_y_mm,
        });
    }

    let (view, duplicated) = take_view(doc, ctx.sheet.id, view);
    let scale = apply_scale(doc, &view, placement.scale)?;
    rescale_crop(doc, &view, placement, scale, ctx.options.crop_fill_ratio)?;

    let anchor = if placement.center_only {
        ctx.sheet.outline.center()
    } else {
        viewport_anchor(
            &ctx.sheet.outline,
            ctx.title_block,
            placement.center_x_mm,
            placement.center_y_mm,
            ctx.options.standard_sheet_height_mm,
        )
    };

    log::debug!(
        "Placing '{}' at ({:.4}, {:.4}) ft, scale 1:{}, sheet outline ({:.4}, {:.4})-({:.4}, {:.4})",
        view.name,
        anchor.x,
        anchor.y,
        scale,
        ctx.sheet.outline.min.x,
        ctx.sheet.outline.min.y,
        ctx.sheet.outline.max.x,
        ctx.sheet.outline.max.y
    );

    let viewport = doc
        .create_viewport(ctx.sheet.id, view.id, anchor)
        .map_err(PlacementFailure::Viewport)?;
    log::info!("Viewport created for '{}' on sheet {}", view.name, ctx.sheet.number);

    Ok(PlacementOutcome::Placed {
        view: placement.view,
        placed_view: view.id,
        viewport: viewport.id,
        duplicated,
    })
}

/// Return the view to place, duplicating it when another sheet hosts it.
///
/// A failed duplication falls back to the original view.
fn take_view<D: HostDocument + ?Sized>(doc: &mut D, sheet: ElementId, view: View) -> (View, bool) {
    match doc.sheet_hosting_view(view.id) {
        Some(host) if host != sheet => {}
        _ => return (view, false),
    }

    if !doc.is_modifiable() {
        log::warn!(
            "Document is not modifiable; placing '{}' without duplicating it",
            view.name
        );
        return (view, false);
    }

    match doc.duplicate_view(view.id) {
        Ok(id) => match doc.view(id) {
            Some(duplicate) => {
                log::debug!("Duplicated '{}' as '{}'", view.name, duplicate.name);
                (duplicate, true)
            }
            None => {
                log::warn!("Duplicate of '{}' vanished; placing the original", view.name);
                (view, false)
            }
        },
        Err(e) => {
            log::warn!(
                "Could not duplicate '{}' ({}); placing the original",
                view.name,
                e
            );
            (view, false)
        }
    }
}

/// Force the planned scale and return the scale the view ends up with
fn apply_scale<D: HostDocument + ?Sized>(
    doc: &mut D,
    view: &View,
    scale: Option<u32>,
) -> Result<u32, PlacementFailure> {
    let Some(scale) = scale else {
        return Ok(view.scale);
    };

    if view.scale_storage != ParameterStorage::Integer {
        log::debug!(
            "Scale parameter of '{}' is not an integer; keeping 1:{}",
            view.name,
            view.scale
        );
        return Ok(view.scale);
    }

    doc.set_view_scale(view.id, scale)
        .map_err(PlacementFailure::Scale)?;
    Ok(scale)
}

/// Shrink or grow the crop box so the view fits its allowed footprint.
///
/// The footprint is on-sheet millimeters; multiplying by the scale gives
/// the model extent the crop box may cover. An unusable crop box is left
/// as it is.
fn rescale_crop<D: HostDocument + ?Sized>(
    doc: &mut D,
    view: &View,
    placement: &ViewPlacement,
    scale: u32,
    fill_ratio: f64,
) -> Result<(), PlacementFailure> {
    let (Some(crop), Some(max_w), Some(max_h)) =
        (view.crop_box, placement.max_width_mm, placement.max_height_mm)
    else {
        return Ok(());
    };

    let model_w = max_w * scale as f64;
    let model_h = max_h * scale as f64;

    match scale_and_center_box(&crop, model_w, model_h, fill_ratio) {
        Some(scaled) => {
            log::debug!(
                "Crop of '{}' rescaled from {:.0} × {:.0} mm to {:.0} × {:.0} mm",
                view.name,
                to_millimeters(crop.width()),
                to_millimeters(crop.height()),
                to_millimeters(scaled.width()),
                to_millimeters(scaled.height())
            );
            doc.set_crop_box(view.id, scaled)
                .map_err(PlacementFailure::CropBox)
        }
        None => {
            log::warn!("Crop box of '{}' is degenerate; left unchanged", view.name);
            Ok(())
        }
    }
}
