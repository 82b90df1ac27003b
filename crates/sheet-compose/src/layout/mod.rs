//! Layout calculation modules for sheet composition
//!
//! This module handles all the geometric calculations for placing views:
//! - Grid layout (cell dimensions, usable area)
//! - Planning (which view goes to which cell, pagination, overrides)

mod grid;
mod planner;
mod types;

pub use grid::*;
pub use planner::*;
pub use types::*;
