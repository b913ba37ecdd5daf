//! Item source for the page partitioner.

use app_selector_core::Candidate;

/// Provides what the partitioner needs to know about the items it pages.
///
/// Implementations should be immutable while a partition is in progress;
/// a changed data source means a rebuild.
pub trait PageItemProvider {
    /// Total number of items, on any page.
    fn item_count(&self) -> usize;

    /// Display label of the item at `index`.
    fn item_label(&self, index: usize) -> &str;
}

impl PageItemProvider for [Candidate] {
    fn item_count(&self) -> usize {
        self.len()
    }

    fn item_label(&self, index: usize) -> &str {
        self.get(index).map_or("", Candidate::name)
    }
}

impl PageItemProvider for Vec<Candidate> {
    fn item_count(&self) -> usize {
        self.as_slice().item_count()
    }

    fn item_label(&self, index: usize) -> &str {
        self.as_slice().item_label(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use app_selector_core::AppInfo;

    #[test]
    fn test_candidates_provide_labels() {
        let items = vec![
            Candidate::new(AppInfo::new("org.example.a", "Alpha"), false),
            Candidate::new(AppInfo::new("org.example.b", "Beta"), false),
        ];

        assert_eq!(items.item_count(), 2);
        assert_eq!(items.item_label(1), "Beta");
        assert_eq!(items.as_slice().item_label(0), "Alpha");
        assert_eq!(items.item_label(7), "");
    }
}
