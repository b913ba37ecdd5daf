//! Core model of the app selector: candidates, their display ranking and the
//! per-scroller event bus.

pub mod candidate;
pub mod collections;
pub mod error;
pub mod event_bus;
pub mod ranking;

pub use candidate::{AppInfo, Candidate};
pub use collections::{app_id_set, AppIdSet};
pub use error::{Result, SelectorError};
pub use event_bus::{EventBus, EventKind, Listener, ListenerHandle, PageId, ScrollerEvent};
pub use ranking::{apply_usage_scores, base_score, compare, is_ranked, rank, SCORE_STEP};
