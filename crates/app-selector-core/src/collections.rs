//! Hash collections shared by the selector crates.
//!
//! Listener registries and app-id lookups are keyed by small values, so the
//! Fx hasher is used by default. Enable the `std-hash` feature to fall back
//! to the standard SipHash maps.

#[cfg(feature = "std-hash")]
pub mod map {
    pub use std::collections::{HashMap, HashSet};
}

#[cfg(not(feature = "std-hash"))]
pub mod map {
    pub use rustc_hash::{FxHashMap as HashMap, FxHashSet as HashSet};
}

/// Set of application ids seen while collecting candidates.
pub type AppIdSet = map::HashSet<String>;

/// Creates an empty [`AppIdSet`] sized for `capacity` ids.
pub fn app_id_set(capacity: usize) -> AppIdSet {
    let mut set = AppIdSet::default();
    set.reserve(capacity);
    set
}
