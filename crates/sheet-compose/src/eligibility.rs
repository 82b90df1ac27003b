//! View eligibility filtering
//!
//! Two profiles exist on purpose. The selection list offers engineering
//! plans, but the strict check run before placement does not accept them.

use crate::host::HostDocument;
use crate::types::{ComposeMode, Ineligibility, View, ViewKind};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Which view kinds a filter accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EligibilityProfile {
    /// Views offered to the user for selection
    Selectable,
    /// Views the resolver will actually place
    Placeable,
}

impl EligibilityProfile {
    pub fn allowed_kinds(self) -> &'static [ViewKind] {
        match self {
            EligibilityProfile::Selectable => &[
                ViewKind::FloorPlan,
                ViewKind::EngineeringPlan,
                ViewKind::Section,
                ViewKind::Elevation,
            ],
            EligibilityProfile::Placeable => {
                &[ViewKind::FloorPlan, ViewKind::Section, ViewKind::Elevation]
            }
        }
    }

    pub fn allows(self, kind: ViewKind) -> bool {
        self.allowed_kinds().contains(&kind)
    }
}

/// Inclusive range of accepted scale denominators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScaleRange {
    pub min: u32,
    pub max: u32,
}

impl ScaleRange {
    pub fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, scale: u32) -> bool {
        (self.min..=self.max).contains(&scale)
    }
}

impl Default for ScaleRange {
    fn default() -> Self {
        Self::new(
            crate::constants::MIN_VIEW_SCALE,
            crate::constants::MAX_VIEW_SCALE,
        )
    }
}

/// Check a view against a profile, optionally enforcing a scale range.
pub fn check_view(
    view: &View,
    profile: EligibilityProfile,
    scale_range: Option<&ScaleRange>,
) -> Result<(), Ineligibility> {
    if view.is_template {
        return Err(Ineligibility::Template);
    }
    if !view.printable {
        return Err(Ineligibility::NotPrintable);
    }
    if let Some(range) = scale_range {
        if !range.contains(view.scale) {
            log::warn!(
                "View '{}' has scale 1:{}; adjust it to between 1:{} and 1:{}",
                view.name,
                view.scale,
                range.min,
                range.max
            );
            return Err(Ineligibility::ScaleOutOfRange {
                scale: view.scale,
                min: range.min,
                max: range.max,
            });
        }
    }
    if !profile.allows(view.kind) {
        return Err(Ineligibility::KindNotAllowed(view.kind));
    }
    Ok(())
}

/// Strict check run before placing a view in the given mode.
///
/// The scale range only applies when views keep their own scale; the grid
/// modes override every scale uniformly.
pub fn check_placeable(
    view: &View,
    mode: ComposeMode,
    scale_range: &ScaleRange,
) -> Result<(), Ineligibility> {
    let range = mode.enforces_scale_range().then_some(scale_range);
    check_view(view, EligibilityProfile::Placeable, range)
}

pub fn is_eligible(view: &View, mode: ComposeMode, scale_range: &ScaleRange) -> bool {
    check_placeable(view, mode, scale_range).is_ok()
}

/// Views the user may pick from, in document order
pub fn selectable_views<D: HostDocument + ?Sized>(doc: &D) -> Vec<View> {
    doc.views()
        .into_iter()
        .filter(|v| check_view(v, EligibilityProfile::Selectable, None).is_ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ElementId, ParameterStorage};

    fn view(kind: ViewKind, scale: u32) -> View {
        View {
            id: ElementId(1),
            name: "Test".to_string(),
            kind,
            is_template: false,
            printable: true,
            scale,
            scale_storage: ParameterStorage::Integer,
            crop_box: None,
        }
    }

    #[test]
    fn test_rejects_templates_and_unprintable() {
        let range = ScaleRange::default();
        let mut v = view(ViewKind::FloorPlan, 100);
        v.is_template = true;
        assert_eq!(
            check_placeable(&v, ComposeMode::SingleSheetGrid, &range),
            Err(Ineligibility::Template)
        );

        let mut v = view(ViewKind::Section, 100);
        v.printable = false;
        assert_eq!(
            check_placeable(&v, ComposeMode::SheetPerView, &range),
            Err(Ineligibility::NotPrintable)
        );
    }

    #[test]
    fn test_engineering_plan_selectable_but_not_placeable() {
        let v = view(ViewKind::EngineeringPlan, 100);
        assert!(check_view(&v, EligibilityProfile::Selectable, None).is_ok());
        assert_eq!(
            check_view(&v, EligibilityProfile::Placeable, None),
            Err(Ineligibility::KindNotAllowed(ViewKind::EngineeringPlan))
        );
    }

    #[test]
    fn test_other_kinds_never_accepted() {
        let v = view(ViewKind::Other, 100);
        assert!(check_view(&v, EligibilityProfile::Selectable, None).is_err());
        assert!(check_view(&v, EligibilityProfile::Placeable, None).is_err());
    }

    #[test]
    fn test_scale_range_only_for_individual_scale() {
        let range = ScaleRange::default();
        let v = view(ViewKind::FloorPlan, 500);

        assert!(is_eligible(&v, ComposeMode::SingleSheetGrid, &range));
        assert!(is_eligible(&v, ComposeMode::PaginatedGrid, &range));
        assert_eq!(
            check_placeable(&v, ComposeMode::SheetPerView, &range),
            Err(Ineligibility::ScaleOutOfRange {
                scale: 500,
                min: 50,
                max: 200
            })
        );
    }

    #[test]
    fn test_scale_bounds_inclusive() {
        let range = ScaleRange::default();
        for scale in [50, 100, 200] {
            let v = view(ViewKind::Elevation, scale);
            assert!(is_eligible(&v, ComposeMode::SheetPerView, &range));
        }
        for scale in [49, 201] {
            let v = view(ViewKind::Elevation, scale);
            assert!(!is_eligible(&v, ComposeMode::SheetPerView, &range));
        }
    }

    #[test]
    fn test_filter_is_stable() {
        let range = ScaleRange::default();
        let v = view(ViewKind::Section, 150);
        let first = is_eligible(&v, ComposeMode::SheetPerView, &range);
        let second = is_eligible(&v, ComposeMode::SheetPerView, &range);
        assert_eq!(first, second);
    }
}
