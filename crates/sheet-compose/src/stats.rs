use crate::eligibility::is_eligible;
use crate::host::HostDocument;
use crate::layout::{paginate, plan_grid};
use crate::options::ComposeOptions;
use crate::types::*;

/// Predict a composition without touching the document.
///
/// `sheet` is the title block size new sheets will have. Ineligible views
/// still take a grid cell, exactly as they do during composition.
pub fn calculate_statistics<D: HostDocument + ?Sized>(
    doc: &D,
    request: &ComposeRequest,
    sheet: TitleBlockSize,
    options: &ComposeOptions,
) -> Result<CompositionStatistics> {
    options.validate()?;

    let selected_views = request.views.len();
    if selected_views == 0 {
        return Err(ComposeError::NoViews);
    }

    let eligible_views = request
        .views
        .iter()
        .filter_map(|&id| doc.view(id))
        .filter(|view| is_eligible(view, request.mode, &options.scale_range))
        .count();

    match request.mode {
        ComposeMode::SingleSheetGrid => {
            let plan = plan_grid(&request.views, sheet, options);
            Ok(CompositionStatistics {
                selected_views,
                eligible_views,
                views_per_sheet: plan.capacity,
                planned_sheets: 1,
                planned_views: plan.placements.len(),
                dropped_views: plan.overflow.len(),
            })
        }
        ComposeMode::PaginatedGrid => {
            let pages = paginate(&request.views, sheet, options);
            let planned_views: usize = pages.iter().map(|p| p.placements.len()).sum();
            let views_per_sheet = pages.first().map(|p| p.capacity).unwrap_or(0);
            Ok(CompositionStatistics {
                selected_views,
                eligible_views,
                views_per_sheet,
                planned_sheets: pages.len().max(1),
                planned_views,
                dropped_views: selected_views - planned_views,
            })
        }
        ComposeMode::SheetPerView => Ok(CompositionStatistics {
            selected_views,
            eligible_views,
            views_per_sheet: 1,
            planned_sheets: selected_views,
            planned_views: selected_views,
            dropped_views: 0,
        }),
    }
}
