//! In-memory host document
//!
//! A small, serializable stand-in for the host application's document.
//! It follows the host's rules where the engine depends on them: changes
//! need an open transaction, rollback restores the state at `start`, and a
//! view cannot be placed twice on the same sheet. [`HostFaults`] lets
//! callers make individual host calls fail.

use crate::constants::STANDARD_SHEET_HEIGHT_MM;
use crate::geometry::{BoundingBox, Point, to_internal};
use crate::host::{HostDocument, HostError};
use crate::types::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Host calls that should fail, keyed by the element they act on
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct HostFaults {
    /// Title block bounds queries fail for every sheet
    pub title_block_bounds: bool,
    pub duplicate_view: Vec<ElementId>,
    pub create_viewport: Vec<ElementId>,
    pub set_crop_box: Vec<ElementId>,
    pub set_view_scale: Vec<ElementId>,
}

#[derive(Debug, Clone, PartialEq)]
struct Snapshot {
    elements: Vec<Element>,
    next_id: u64,
}

/// Host document held entirely in memory
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MemoryDocument {
    elements: Vec<Element>,
    next_id: u64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub read_only: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub faults: HostFaults,
    #[cfg_attr(feature = "serde", serde(skip))]
    transaction: Option<(String, Snapshot)>,
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDocument {
    pub fn new() -> Self {
        Self {
            elements: Vec::new(),
            next_id: 1,
            read_only: false,
            faults: HostFaults::default(),
            transaction: None,
        }
    }

    fn allocate_id(&mut self) -> ElementId {
        let id = ElementId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| e.id() == id)
    }

    fn view_entry_mut(&mut self, id: ElementId) -> Result<&mut View, HostError> {
        self.elements
            .iter_mut()
            .find_map(|e| match e {
                Element::View(v) if v.id == id => Some(v),
                _ => None,
            })
            .ok_or(HostError::ElementNotFound(id))
    }

    /// Mutable access to a view outside the transaction rules, for setup
    pub fn view_mut(&mut self, id: ElementId) -> Option<&mut View> {
        self.view_entry_mut(id).ok()
    }

    pub fn sheet(&self, id: ElementId) -> Option<Sheet> {
        match self.element(id) {
            Some(Element::Sheet(s)) => Some(s.clone()),
            _ => None,
        }
    }

    pub fn viewports_on(&self, sheet: ElementId) -> Vec<Viewport> {
        self.viewports()
            .into_iter()
            .filter(|vp| vp.sheet == sheet)
            .collect()
    }

    pub fn title_block_types(&self) -> Vec<TitleBlockType> {
        self.elements
            .iter()
            .filter_map(|e| match e {
                Element::TitleBlockType(t) => Some(t.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn title_block_type_size(&self, id: ElementId) -> Option<TitleBlockSize> {
        match self.element(id) {
            Some(Element::TitleBlockType(t)) => Some(t.size),
            _ => None,
        }
    }

    pub fn in_transaction(&self) -> bool {
        self.transaction.is_some()
    }

    // =========================================================================
    // Setup
    // =========================================================================

    pub fn add_title_block_type(&mut self, name: &str, size: TitleBlockSize) -> ElementId {
        let id = self.allocate_id();
        self.elements.push(Element::TitleBlockType(TitleBlockType {
            id,
            name: name.to_string(),
            size,
        }));
        id
    }

    /// Add a printable, non-template 1:100 view with a 60ft × 40ft crop box
    pub fn add_view(&mut self, name: &str, kind: ViewKind) -> ElementId {
        let id = self.allocate_id();
        self.elements.push(Element::View(View {
            id,
            name: name.to_string(),
            kind,
            is_template: false,
            printable: true,
            scale: 100,
            scale_storage: ParameterStorage::Integer,
            crop_box: Some(BoundingBox::new(
                Point::new(0.0, 0.0),
                Point::new(60.0, 40.0),
            )),
        }));
        id
    }

    fn ensure_modifiable(&self) -> Result<(), HostError> {
        if self.read_only {
            return Err(HostError::NotModifiable);
        }
        if self.transaction.is_none() {
            return Err(HostError::NoOpenTransaction);
        }
        Ok(())
    }

    fn unique_view_name(&self, base: &str) -> String {
        let taken = |name: &str| self.views().iter().any(|v| v.name == name);
        let mut n = 1;
        loop {
            let candidate = format!("{} Copy {}", base, n);
            if !taken(&candidate) {
                return candidate;
            }
            n += 1;
        }
    }
}

impl HostDocument for MemoryDocument {
    fn view(&self, id: ElementId) -> Option<View> {
        match self.element(id) {
            Some(Element::View(v)) => Some(v.clone()),
            _ => None,
        }
    }

    fn views(&self) -> Vec<View> {
        self.elements
            .iter()
            .filter_map(|e| match e {
                Element::View(v) => Some(v.clone()),
                _ => None,
            })
            .collect()
    }

    fn sheets(&self) -> Vec<Sheet> {
        self.elements
            .iter()
            .filter_map(|e| match e {
                Element::Sheet(s) => Some(s.clone()),
                _ => None,
            })
            .collect()
    }

    fn viewports(&self) -> Vec<Viewport> {
        self.elements
            .iter()
            .filter_map(|e| match e {
                Element::Viewport(vp) => Some(vp.clone()),
                _ => None,
            })
            .collect()
    }

    fn default_title_block_type(&self) -> Option<ElementId> {
        self.elements.iter().find_map(|e| match e {
            Element::TitleBlockType(t) => Some(t.id),
            _ => None,
        })
    }

    fn title_block_bounds(&self, sheet: ElementId) -> Result<Option<BoundingBox>, HostError> {
        if self.faults.title_block_bounds {
            return Err(HostError::Rejected(
                "title block bounds are unavailable".to_string(),
            ));
        }
        if self.sheet(sheet).is_none() {
            return Err(HostError::ElementNotFound(sheet));
        }
        Ok(self.elements.iter().find_map(|e| match e {
            Element::TitleBlock(tb) if tb.sheet == sheet => Some(tb.bounds),
            _ => None,
        }))
    }

    fn is_modifiable(&self) -> bool {
        self.ensure_modifiable().is_ok()
    }

    fn start_transaction(&mut self, name: &str) -> Result<(), HostError> {
        if self.read_only {
            return Err(HostError::NotModifiable);
        }
        if self.transaction.is_some() {
            return Err(HostError::TransactionAlreadyOpen);
        }
        let snapshot = Snapshot {
            elements: self.elements.clone(),
            next_id: self.next_id,
        };
        self.transaction = Some((name.to_string(), snapshot));
        Ok(())
    }

    fn commit_transaction(&mut self) -> Result<(), HostError> {
        self.transaction
            .take()
            .map(|_| ())
            .ok_or(HostError::NoOpenTransaction)
    }

    fn roll_back_transaction(&mut self) -> Result<(), HostError> {
        let (_, snapshot) = self
            .transaction
            .take()
            .ok_or(HostError::NoOpenTransaction)?;
        self.elements = snapshot.elements;
        self.next_id = snapshot.next_id;
        Ok(())
    }

    fn create_sheet(
        &mut self,
        title_block_type: ElementId,
        number: &str,
        name: &str,
    ) -> Result<Sheet, HostError> {
        self.ensure_modifiable()?;
        let size = self
            .title_block_type_size(title_block_type)
            .ok_or(HostError::ElementNotFound(title_block_type))?;

        if self.sheets().iter().any(|s| s.number == number) {
            return Err(HostError::Rejected(format!(
                "sheet number {} is already in use",
                number
            )));
        }

        // Sheets have the nominal height; the title block sits vertically centered
        let outline = BoundingBox::from_size_mm(size.width_mm, STANDARD_SHEET_HEIGHT_MM);
        let offset = to_internal((STANDARD_SHEET_HEIGHT_MM - size.height_mm) / 2.0);
        let bounds = BoundingBox::new(
            Point::new(outline.min.x, outline.min.y + offset),
            Point::new(outline.max.x, outline.max.y - offset),
        );

        let sheet = Sheet {
            id: self.allocate_id(),
            number: number.to_string(),
            name: name.to_string(),
            outline,
        };
        let title_block = TitleBlock {
            id: self.allocate_id(),
            sheet: sheet.id,
            type_id: title_block_type,
            bounds,
        };
        self.elements.push(Element::Sheet(sheet.clone()));
        self.elements.push(Element::TitleBlock(title_block));
        Ok(sheet)
    }

    fn create_viewport(
        &mut self,
        sheet: ElementId,
        view: ElementId,
        anchor: Point,
    ) -> Result<Viewport, HostError> {
        self.ensure_modifiable()?;
        if self.faults.create_viewport.contains(&view) {
            return Err(HostError::Rejected("viewport creation failed".to_string()));
        }
        if self.sheet(sheet).is_none() {
            return Err(HostError::ElementNotFound(sheet));
        }
        let placed = self.view(view).ok_or(HostError::ElementNotFound(view))?;
        if placed.is_template {
            return Err(HostError::Rejected(
                "template views cannot be placed on sheets".to_string(),
            ));
        }
        if self
            .viewports()
            .iter()
            .any(|vp| vp.view == view && vp.sheet == sheet)
        {
            return Err(HostError::ViewAlreadyOnSheet { view, sheet });
        }

        let viewport = Viewport {
            id: self.allocate_id(),
            sheet,
            view,
            anchor,
        };
        self.elements.push(Element::Viewport(viewport.clone()));
        Ok(viewport)
    }

    fn duplicate_view(&mut self, view: ElementId) -> Result<ElementId, HostError> {
        self.ensure_modifiable()?;
        if self.faults.duplicate_view.contains(&view) {
            return Err(HostError::Rejected("view cannot be duplicated".to_string()));
        }
        let original = self.view(view).ok_or(HostError::ElementNotFound(view))?;
        let name = self.unique_view_name(&original.name);
        let id = self.allocate_id();
        self.elements.push(Element::View(View {
            id,
            name,
            ..original
        }));
        Ok(id)
    }

    fn set_view_scale(&mut self, view: ElementId, scale: u32) -> Result<(), HostError> {
        self.ensure_modifiable()?;
        if self.faults.set_view_scale.contains(&view) {
            return Err(HostError::Rejected("scale parameter is locked".to_string()));
        }
        if scale == 0 {
            return Err(HostError::Rejected("scale must be positive".to_string()));
        }
        let entry = self.view_entry_mut(view)?;
        if entry.scale_storage != ParameterStorage::Integer {
            return Err(HostError::Rejected(
                "scale parameter does not hold an integer".to_string(),
            ));
        }
        entry.scale = scale;
        Ok(())
    }

    fn set_crop_box(&mut self, view: ElementId, crop: BoundingBox) -> Result<(), HostError> {
        self.ensure_modifiable()?;
        if self.faults.set_crop_box.contains(&view) {
            return Err(HostError::Rejected("crop box is locked".to_string()));
        }
        let entry = self.view_entry_mut(view)?;
        match entry.crop_box.as_mut() {
            Some(current) => {
                *current = crop;
                Ok(())
            }
            None => Err(HostError::Rejected(
                "view does not support cropping".to_string(),
            )),
        }
    }
}
