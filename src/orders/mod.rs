//! Order Placement
//!
//! - [`validation`] - pure payload checks, all violations reported at once
//! - [`placement`] - the all-or-nothing placement transaction

pub mod placement;
pub mod validation;

pub use placement::{PlacementError, PlacementService};
pub use validation::validate_order_input;
