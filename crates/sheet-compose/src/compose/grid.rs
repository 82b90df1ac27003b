//! Grid composition (one sheet, or paginated over several)

use super::{SheetPlan, compose_sheet};
use crate::host::HostDocument;
use crate::layout::{apply_overrides, plan_grid};
use crate::options::ComposeOptions;
use crate::types::*;

fn sheet_full(views: &[ElementId], capacity: usize) -> Vec<PlacementOutcome> {
    views
        .iter()
        .map(|&view| PlacementOutcome::Failed {
            view,
            reason: PlacementFailure::SheetFull { capacity },
        })
        .collect()
}

/// Place all views on one grid sheet; views beyond its capacity are dropped
pub(crate) fn compose_grid_sheet<D: HostDocument + ?Sized>(
    doc: &mut D,
    request: &ComposeRequest,
    options: &ComposeOptions,
) -> Result<SheetOutcome> {
    let (outcome, _) = compose_sheet(
        doc,
        &options.composite_sheet_name,
        request.mode,
        options,
        |title_block| {
            let mut plan = plan_grid(&request.views, title_block, options);
            apply_overrides(&mut plan.placements, &request.overrides);
            SheetPlan {
                rejected: sheet_full(&plan.overflow, plan.capacity),
                placements: plan.placements,
                carry_over: Vec::new(),
            }
        },
    )?;
    Ok(outcome)
}

/// Place views on as many grid sheets as needed, one transaction per sheet
pub(crate) fn compose_paginated<D: HostDocument + ?Sized>(
    doc: &mut D,
    request: &ComposeRequest,
    options: &ComposeOptions,
) -> Result<Vec<SheetOutcome>> {
    let mut sheets = Vec::new();
    let mut remaining = request.views.clone();

    while !remaining.is_empty() {
        let batch = std::mem::take(&mut remaining);
        let name = if sheets.is_empty() {
            options.composite_sheet_name.clone()
        } else {
            format!("{} ({})", options.composite_sheet_name, sheets.len() + 1)
        };

        let (outcome, carry_over) =
            compose_sheet(doc, &name, request.mode, options, |title_block| {
                let mut plan = plan_grid(&batch, title_block, options);
                apply_overrides(&mut plan.placements, &request.overrides);

                if plan.placements.is_empty() {
                    // The sheet cannot hold a single view; further sheets would not either
                    SheetPlan {
                        rejected: sheet_full(&plan.overflow, plan.capacity),
                        placements: Vec::new(),
                        carry_over: Vec::new(),
                    }
                } else {
                    SheetPlan {
                        placements: plan.placements,
                        rejected: Vec::new(),
                        carry_over: plan.overflow,
                    }
                }
            })?;

        sheets.push(outcome);
        remaining = carry_over;
    }

    Ok(sheets)
}
