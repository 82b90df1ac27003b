//! Sheet composition - laying views out onto drawing sheets
//!
//! This module orchestrates the composition process:
//! 1. Open a transaction and create the sheet
//! 2. Measure the title block and plan placements
//! 3. Resolve each placement into a viewport or a recorded failure
//! 4. Commit when at least one view was placed, otherwise roll back

mod grid;
mod io;
mod per_view;
pub mod resolver;
pub mod sheet;

#[cfg(feature = "serde")]
pub use io::{load_project, save_project};
pub use resolver::{PlacementContext, place};
pub use sheet::{next_sheet_number, per_view_sheet_name, title_block_size, viewport_anchor};

use crate::constants::TRANSACTION_NAME;
use crate::host::{HostDocument, Transaction};
use crate::layout::ViewPlacement;
use crate::options::ComposeOptions;
use crate::types::*;

/// Compose the requested views onto new sheets.
///
/// Per-view problems are reported in the returned [`ComposeReport`]; a
/// sheet on which nothing could be placed is rolled back. Only host
/// failures outside the per-view steps (opening the transaction, creating
/// the sheet, committing) are returned as errors, after rolling back the
/// sheet being built.
pub fn compose<D: HostDocument + ?Sized>(
    doc: &mut D,
    request: &ComposeRequest,
    options: &ComposeOptions,
) -> Result<ComposeReport> {
    options.validate()?;

    if request.views.is_empty() {
        log::info!("No views selected; nothing to compose");
        return Ok(ComposeReport::cancelled(request.mode));
    }

    let sheets = match request.mode {
        ComposeMode::SingleSheetGrid => vec![grid::compose_grid_sheet(doc, request, options)?],
        ComposeMode::PaginatedGrid => grid::compose_paginated(doc, request, options)?,
        ComposeMode::SheetPerView => per_view::compose_sheet_per_view(doc, request, options)?,
    };

    let report = ComposeReport {
        mode: request.mode,
        cancelled: false,
        sheets,
    };
    log::info!("{}", report.summary());
    Ok(report)
}

/// Compose on a blocking thread, handing the document back afterwards
pub async fn compose_owned<D>(
    mut doc: D,
    request: ComposeRequest,
    options: ComposeOptions,
) -> Result<(D, ComposeReport)>
where
    D: HostDocument + Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let report = compose(&mut doc, &request, &options)?;
        Ok::<_, ComposeError>((doc, report))
    })
    .await?
}

/// Planned content of one sheet
pub(crate) struct SheetPlan {
    pub placements: Vec<ViewPlacement>,
    /// Views refused before resolution
    pub rejected: Vec<PlacementOutcome>,
    /// Views left for a following sheet
    pub carry_over: Vec<ElementId>,
}

/// Build one sheet inside its own transaction.
///
/// `plan` runs once the sheet exists and its title block is measured.
pub(crate) fn compose_sheet<D, P>(
    doc: &mut D,
    name: &str,
    mode: ComposeMode,
    options: &ComposeOptions,
    plan: P,
) -> Result<(SheetOutcome, Vec<ElementId>)>
where
    D: HostDocument + ?Sized,
    P: FnOnce(TitleBlockSize) -> SheetPlan,
{
    let mut tx = Transaction::start(doc, TRANSACTION_NAME)?;

    let title_block_type = tx
        .default_title_block_type()
        .ok_or(ComposeError::NoTitleBlockType)?;
    let number = next_sheet_number(&tx.sheets(), options);
    let sheet = tx.create_sheet(title_block_type, &number, name)?;
    let title_block = title_block_size(&*tx, sheet.id, options.fallback_title_block);

    let SheetPlan {
        placements,
        rejected,
        carry_over,
    } = plan(title_block);

    let ctx = PlacementContext {
        sheet: &sheet,
        title_block,
        mode,
        options,
    };
    let mut outcomes: Vec<PlacementOutcome> = placements
        .iter()
        .map(|placement| place(&mut *tx, &ctx, placement))
        .collect();
    outcomes.extend(rejected);

    let placed = outcomes.iter().any(PlacementOutcome::is_placed);
    let status = if placed {
        tx.commit()?;
        log::info!("Sheet {} '{}' created", sheet.number, sheet.name);
        SheetStatus::Committed
    } else {
        tx.roll_back()?;
        log::warn!("No view could be added to sheet {}; rolled back", sheet.number);
        SheetStatus::RolledBack
    };

    let outcome = SheetOutcome {
        sheet: placed.then_some(sheet.id),
        number: sheet.number,
        name: sheet.name,
        title_block,
        status,
        outcomes,
    };
    Ok((outcome, carry_over))
}
