//! Page index indicator model.

/// Entries `0..len` of the page index and the marker on the current one.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IndexIndicator {
    entries: usize,
    current: Option<usize>,
}

impl IndexIndicator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries == 0
    }

    pub fn current(&self) -> Option<usize> {
        self.current
    }

    /// Rebuilds the entries for `page_count` pages.
    ///
    /// The previous marker is re-applied, clamped to the last entry. Before
    /// any marker was set the first entry becomes current.
    pub fn update(&mut self, page_count: usize) {
        self.entries = page_count;
        self.current = match page_count {
            0 => None,
            n => Some(self.current.unwrap_or(0).min(n - 1)),
        };
        log::trace!("index rebuilt with {} entries, current {:?}", self.entries, self.current);
    }

    /// Marks entry `index` as current. Unknown entries are ignored.
    pub fn bring_in(&mut self, index: usize) -> bool {
        if index >= self.entries {
            log::debug!("index entry {} not found among {}", index, self.entries);
            return false;
        }
        self.current = Some(index);
        true
    }

    pub fn clear(&mut self) {
        self.entries = 0;
        self.current = None;
    }
}
