//! Boundary with the host document
//!
//! The composition engine never reaches for an ambient "active document":
//! every operation receives the document handle explicitly. The host allows
//! a single open modification scope at a time, which [`Transaction`] models.

use crate::geometry::{BoundingBox, Point};
use crate::types::{ElementId, Sheet, View, Viewport};
use std::ops::{Deref, DerefMut};
use thiserror::Error;

/// Failure reported by the host document
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HostError {
    #[error("element {0} not found")]
    ElementNotFound(ElementId),
    #[error("document is not modifiable")]
    NotModifiable,
    #[error("a transaction is already open")]
    TransactionAlreadyOpen,
    #[error("no transaction is open")]
    NoOpenTransaction,
    #[error("view {view} is already placed on sheet {sheet}")]
    ViewAlreadyOnSheet { view: ElementId, sheet: ElementId },
    #[error("{0}")]
    Rejected(String),
}

/// Operations the composition engine needs from a host document
pub trait HostDocument {
    // Queries

    /// Look up a view; `None` when the id is unknown or not a view
    fn view(&self, id: ElementId) -> Option<View>;

    fn views(&self) -> Vec<View>;

    fn sheets(&self) -> Vec<Sheet>;

    fn viewports(&self) -> Vec<Viewport>;

    /// Title block type new sheets are created from
    fn default_title_block_type(&self) -> Option<ElementId>;

    /// Bounds of the title block placed on `sheet`, in sheet internal units
    fn title_block_bounds(&self, sheet: ElementId) -> Result<Option<BoundingBox>, HostError>;

    fn is_modifiable(&self) -> bool;

    // Transactions

    fn start_transaction(&mut self, name: &str) -> Result<(), HostError>;

    fn commit_transaction(&mut self) -> Result<(), HostError>;

    fn roll_back_transaction(&mut self) -> Result<(), HostError>;

    // Mutations

    fn create_sheet(
        &mut self,
        title_block_type: ElementId,
        number: &str,
        name: &str,
    ) -> Result<Sheet, HostError>;

    fn create_viewport(
        &mut self,
        sheet: ElementId,
        view: ElementId,
        anchor: Point,
    ) -> Result<Viewport, HostError>;

    /// Create an independent duplicate of a view and return its id
    fn duplicate_view(&mut self, view: ElementId) -> Result<ElementId, HostError>;

    fn set_view_scale(&mut self, view: ElementId, scale: u32) -> Result<(), HostError>;

    fn set_crop_box(&mut self, view: ElementId, crop: BoundingBox) -> Result<(), HostError>;

    /// Sheet currently hosting a viewport of `view`, if any
    fn sheet_hosting_view(&self, view: ElementId) -> Option<ElementId> {
        self.viewports()
            .into_iter()
            .find(|vp| vp.view == view)
            .map(|vp| vp.sheet)
    }
}

/// Lifecycle of a [`Transaction`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionState {
    Open,
    Committed,
    RolledBack,
}

/// Exclusive modification scope over a host document.
///
/// Dropping an open transaction rolls it back, so an early `?` return
/// never leaves partial changes behind.
pub struct Transaction<'a, D: HostDocument + ?Sized> {
    doc: &'a mut D,
    name: String,
    state: TransactionState,
}

impl<'a, D: HostDocument + ?Sized> Transaction<'a, D> {
    pub fn start(doc: &'a mut D, name: &str) -> Result<Self, HostError> {
        doc.start_transaction(name)?;
        log::debug!("Transaction '{}' started", name);
        Ok(Self {
            doc,
            name: name.to_string(),
            state: TransactionState::Open,
        })
    }

    pub fn state(&self) -> TransactionState {
        self.state
    }

    pub fn commit(mut self) -> Result<(), HostError> {
        let result = self.doc.commit_transaction();
        // A failed commit leaves the scope open; Drop rolls it back
        if result.is_ok() {
            self.state = TransactionState::Committed;
            log::debug!("Transaction '{}' committed", self.name);
        }
        result
    }

    pub fn roll_back(mut self) -> Result<(), HostError> {
        self.state = TransactionState::RolledBack;
        log::debug!("Transaction '{}' rolled back", self.name);
        self.doc.roll_back_transaction()
    }
}

impl<D: HostDocument + ?Sized> Deref for Transaction<'_, D> {
    type Target = D;

    fn deref(&self) -> &D {
        self.doc
    }
}

impl<D: HostDocument + ?Sized> DerefMut for Transaction<'_, D> {
    fn deref_mut(&mut self) -> &mut D {
        self.doc
    }
}

impl<D: HostDocument + ?Sized> Drop for Transaction<'_, D> {
    fn drop(&mut self) {
        if self.state == TransactionState::Open {
            self.state = TransactionState::RolledBack;
            log::warn!("Transaction '{}' abandoned; rolling back", self.name);
            if let Err(e) = self.doc.roll_back_transaction() {
                log::warn!("Rollback of '{}' failed: {}", self.name, e);
            }
        }
    }
}
