//! One sheet per view, each in its own transaction

use super::{SheetPlan, compose_sheet, per_view_sheet_name};
use crate::host::HostDocument;
use crate::layout::plan_centered;
use crate::options::ComposeOptions;
use crate::types::*;

pub(crate) fn compose_sheet_per_view<D: HostDocument + ?Sized>(
    doc: &mut D,
    request: &ComposeRequest,
    options: &ComposeOptions,
) -> Result<Vec<SheetOutcome>> {
    let mut sheets = Vec::with_capacity(request.views.len());

    for &view in &request.views {
        let name = doc
            .view(view)
            .map(|v| per_view_sheet_name(&v))
            .unwrap_or_else(|| options.composite_sheet_name.clone());

        let (outcome, _) = compose_sheet(doc, &name, ComposeMode::SheetPerView, options, |_| {
            SheetPlan {
                placements: vec![plan_centered(view)],
                rejected: Vec::new(),
                carry_over: Vec::new(),
            }
        })?;
        sheets.push(outcome);
    }

    Ok(sheets)
}
