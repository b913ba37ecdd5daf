//! Paginated selection list.
//!
//! # Architecture
//!
//! - [`Applier`] - widget construction seam, [`MemoryApplier`] for tests
//! - [`PageItemProvider`] - item source for the partitioner
//! - [`PagePartitioner`] - builds and tears down [`Page`]s
//! - [`PagerState`] - scroll offset, region index and scroll phase
//! - [`IndexIndicator`] - page index entries and current marker
//! - [`Synchronizer`] - wires scroller events to the indicator

mod applier;
mod index_indicator;
mod item_provider;
mod page;
mod pager_state;
mod partition;
mod synchronizer;

pub use applier::*;
pub use index_indicator::*;
pub use item_provider::*;
pub use page::*;
pub use pager_state::*;
pub use partition::*;
pub use synchronizer::*;
