pub mod compose;
mod constants;
mod eligibility;
mod geometry;
mod host;
pub mod layout;
mod memory;
mod options;
mod stats;
mod types;

pub use compose::{compose, compose_owned};
#[cfg(feature = "serde")]
pub use compose::{load_project, save_project};
pub use constants::*;
pub use eligibility::*;
pub use geometry::*;
pub use host::*;
pub use memory::*;
pub use options::*;
pub use stats::calculate_statistics;
pub use types::*;
