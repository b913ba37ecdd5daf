//! Paging foundation for the app selector.
//!
//! The [`pager`] module splits a ranked candidate list into fixed-capacity
//! pages, tracks the horizontal scroll position over them and keeps the page
//! index indicator in step with it.

pub mod pager;

pub use pager::*;
