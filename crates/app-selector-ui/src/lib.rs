//! Layout level of the app selector.
//!
//! [`CapacityPolicy`] decides how many candidates fit on a page,
//! [`Selection`] implements the tap-to-confirm protocol and
//! [`SelectorLayout`] assembles the widgets, pages and index for one
//! orientation.

pub mod capacity;
pub mod grid;
pub mod layout;

pub use capacity::*;
pub use grid::*;
pub use layout::*;
