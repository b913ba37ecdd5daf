//! Splits the ranked list into fixed-capacity pages.

use std::ops::Range;

use app_selector_core::{PageId, Result, ScrollerEvent, SelectorError};
use indexmap::IndexMap;
use smallvec::SmallVec;

use super::applier::{SharedApplier, WidgetId};
use super::item_provider::PageItemProvider;
use super::page::Page;
use super::pager_state::PagerState;

/// Item ranges of the pages for `count` items, `capacity` per page.
///
/// A new page starts whenever the running index is a multiple of
/// `capacity`, so every page but the last is full.
///
/// # Errors
///
/// [`SelectorError::InvalidArgument`] for a zero capacity.
pub fn page_ranges(count: usize, capacity: usize) -> Result<Vec<Range<usize>>> {
    if capacity == 0 {
        return Err(SelectorError::invalid_argument("page capacity must be positive"));
    }
    Ok((0..count)
        .step_by(capacity)
        .map(|start| start..(start + capacity).min(count))
        .collect())
}

/// Number of pages needed for `count` items, `0` for a zero capacity.
pub fn page_count(count: usize, capacity: usize) -> usize {
    if capacity == 0 {
        0
    } else {
        count.div_ceil(capacity)
    }
}

/// Owns the pages inside one scroller.
///
/// Every page appended or removed is announced on the pager's bus after
/// the pager's page count was updated.
pub struct PagePartitioner {
    applier: SharedApplier,
    pager: PagerState,
    scroller: WidgetId,
    pages: IndexMap<PageId, Page>,
    next_page_id: u32,
    capacity: usize,
}

impl PagePartitioner {
    pub fn new(applier: SharedApplier, pager: PagerState, scroller: WidgetId) -> Self {
        Self {
            applier,
            pager,
            scroller,
            pages: IndexMap::new(),
            next_page_id: 0,
            capacity: 0,
        }
    }

    /// Builds pages of at most `capacity` items for everything `provider`
    /// holds.
    ///
    /// All or nothing: if any page cannot be built, the pages built by this
    /// call are removed again and the construction error is returned.
    /// Returns the number of pages.
    ///
    /// # Errors
    ///
    /// [`SelectorError::InvalidArgument`] for a zero capacity or when pages
    /// already exist (use [`PagePartitioner::rebuild`]);
    /// [`SelectorError::ResourceExhaustion`] when a widget cannot be made.
    pub fn partition<P>(
        &mut self,
        provider: &P,
        capacity: usize,
        width: i32,
        height: i32,
    ) -> Result<usize>
    where
        P: PageItemProvider + ?Sized,
    {
        let ranges = page_ranges(provider.item_count(), capacity)?;
        if !self.pages.is_empty() {
            return Err(SelectorError::invalid_argument(
                "partitioner already holds pages",
            ));
        }

        self.capacity = capacity;
        let mut built: SmallVec<[PageId; 4]> = SmallVec::new();
        for range in ranges {
            match self.append_page(provider, range, width, height) {
                Ok(id) => built.push(id),
                Err(err) => {
                    log::error!("page construction failed after {} pages: {}", built.len(), err);
                    for id in built.into_iter().rev() {
                        let _ = self.remove_page(id);
                    }
                    self.capacity = 0;
                    return Err(err);
                }
            }
        }

        log::debug!(
            "partitioned {} items into {} pages of {}",
            provider.item_count(),
            self.pages.len(),
            capacity
        );
        Ok(self.pages.len())
    }

    /// Tears down all pages and partitions again.
    pub fn rebuild<P>(
        &mut self,
        provider: &P,
        capacity: usize,
        width: i32,
        height: i32,
    ) -> Result<usize>
    where
        P: PageItemProvider + ?Sized,
    {
        if capacity == 0 {
            return Err(SelectorError::invalid_argument("page capacity must be positive"));
        }
        self.clear();
        self.partition(provider, capacity, width, height)
    }

    /// Appends one page showing `items`.
    pub fn append_page<P>(
        &mut self,
        provider: &P,
        items: Range<usize>,
        width: i32,
        height: i32,
    ) -> Result<PageId>
    where
        P: PageItemProvider + ?Sized,
    {
        if items.end > provider.item_count() {
            return Err(SelectorError::invalid_argument(format!(
                "page items {:?} exceed {} items",
                items,
                provider.item_count()
            )));
        }

        let id = PageId(self.next_page_id);
        let page = {
            let mut applier = self.applier.borrow_mut();
            Page::build(&mut *applier, self.scroller, id, provider, items, width, height)?
        };
        self.next_page_id += 1;
        self.pages.insert(id, page);
        self.pager.set_page_count(self.pages.len());

        self.pager.bus().publish(ScrollerEvent::PageAppended { page_id: id });
        Ok(id)
    }

    /// Removes page `id` and destroys its widgets.
    ///
    /// # Errors
    ///
    /// [`SelectorError::NotFound`] for an unknown page.
    pub fn remove_page(&mut self, id: PageId) -> Result<()> {
        let page = self
            .pages
            .shift_remove(&id)
            .ok_or_else(|| SelectorError::not_found(id.to_string()))?;
        page.destroy(&mut *self.applier.borrow_mut());
        self.pager.set_page_count(self.pages.len());

        self.pager.bus().publish(ScrollerEvent::PageRemoved { page_id: id });
        Ok(())
    }

    /// Removes every page, last first.
    pub fn clear(&mut self) {
        while let Some(id) = self.pages.last().map(|(id, _)| *id) {
            let _ = self.remove_page(id);
        }
        self.capacity = 0;
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Page at display `index`.
    pub fn page(&self, index: usize) -> Option<&Page> {
        self.pages.get_index(index).map(|(_, page)| page)
    }

    pub fn pages(&self) -> impl Iterator<Item = &Page> {
        self.pages.values()
    }

    /// Display index of the page holding global `position`.
    pub fn page_index_of(&self, position: usize) -> Option<usize> {
        self.pages.values().position(|page| page.contains(position))
    }

    /// Cell widget showing global `position`.
    pub fn cell_for(&self, position: usize) -> Option<WidgetId> {
        self.pages.values().find_map(|page| page.cell_for(position))
    }

    pub fn resize(&self, width: i32, height: i32) {
        let mut applier = self.applier.borrow_mut();
        for page in self.pages.values() {
            page.resize(&mut *applier, width, height);
        }
    }

    pub fn relabel<P>(&self, provider: &P)
    where
        P: PageItemProvider + ?Sized,
    {
        let mut applier = self.applier.borrow_mut();
        for page in self.pages.values() {
            page.relabel(&mut *applier, provider);
        }
    }
}

impl std::fmt::Debug for PagePartitioner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PagePartitioner")
            .field("scroller", &self.scroller)
            .field("pages", &self.pages.len())
            .field("capacity", &self.capacity)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pager::applier::{Applier, MemoryApplier, WidgetKind};
    use app_selector_core::{AppInfo, Candidate, EventBus, EventKind};
    use proptest::prelude::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn candidates(count: usize) -> Vec<Candidate> {
        (0..count)
            .map(|i| Candidate::new(AppInfo::new(format!("app.{i}"), format!("App {i}")), false))
            .collect()
    }

    struct Fixture {
        memory: Rc<RefCell<MemoryApplier>>,
        pager: PagerState,
        partitioner: PagePartitioner,
        events: Rc<RefCell<Vec<ScrollerEvent>>>,
    }

    fn fixture() -> Fixture {
        let memory = MemoryApplier::shared();
        let scroller = memory.borrow_mut().create(WidgetKind::Scroller, None).unwrap();
        let bus = EventBus::new();
        let events = Rc::new(RefCell::new(Vec::new()));
        for kind in [EventKind::PageAppended, EventKind::PageRemoved] {
            let events = Rc::clone(&events);
            bus.register(kind, Rc::new(move |event| events.borrow_mut().push(*event)));
        }
        let pager = PagerState::new(bus);
        let shared: SharedApplier = memory.clone();
        let partitioner = PagePartitioner::new(shared, pager.clone(), scroller);
        Fixture {
            memory,
            pager,
            partitioner,
            events,
        }
    }

    #[test]
    fn test_nine_items_eight_per_page() {
        let mut f = fixture();
        let items = candidates(9);

        let pages = f.partitioner.partition(&items, 8, 720, 468).unwrap();

        assert_eq!(pages, 2);
        assert_eq!(f.partitioner.page(0).unwrap().items(), 0..8);
        assert_eq!(f.partitioner.page(1).unwrap().items(), 8..9);
        assert_eq!(f.pager.page_count(), 2);
        assert_eq!(f.partitioner.page_index_of(8), Some(1));
        assert_eq!(f.memory.borrow().live_count(WidgetKind::Cell), 9);
        assert_eq!(
            *f.events.borrow(),
            [
                ScrollerEvent::PageAppended { page_id: PageId(0) },
                ScrollerEvent::PageAppended { page_id: PageId(1) },
            ]
        );
    }

    #[test]
    fn test_zero_capacity_is_rejected() {
        let mut f = fixture();
        let err = f.partitioner.partition(&candidates(3), 0, 720, 246).unwrap_err();
        assert!(matches!(err, SelectorError::InvalidArgument(_)));
        assert!(f.events.borrow().is_empty());
    }

    #[test]
    fn test_failure_rolls_back_every_page() {
        let mut f = fixture();
        // Page 0 needs page + grid + 4 cells; page 1 fails on its grid.
        f.memory.borrow_mut().fail_after(7);

        let err = f.partitioner.partition(&candidates(6), 4, 720, 246).unwrap_err();

        assert_eq!(err, SelectorError::ResourceExhaustion { what: "grid" });
        assert!(f.partitioner.is_empty());
        assert_eq!(f.pager.page_count(), 0);
        assert_eq!(f.memory.borrow().len(), 1);
        assert_eq!(
            f.events.borrow().last(),
            Some(&ScrollerEvent::PageRemoved { page_id: PageId(0) })
        );
    }

    #[test]
    fn test_rebuild_replaces_pages() {
        let mut f = fixture();
        let items = candidates(9);
        f.partitioner.partition(&items, 8, 720, 468).unwrap();
        assert!(f.partitioner.partition(&items, 4, 720, 246).is_err());

        let pages = f.partitioner.rebuild(&items, 4, 1280, 246).unwrap();

        assert_eq!(pages, 3);
        assert_eq!(f.partitioner.capacity(), 4);
        assert_eq!(f.memory.borrow().live_count(WidgetKind::Page), 3);
        assert_eq!(f.partitioner.page(2).unwrap().items(), 8..9);
    }

    #[test]
    fn test_remove_unknown_page_is_not_found() {
        let mut f = fixture();
        let err = f.partitioner.remove_page(PageId(9)).unwrap_err();
        assert!(err.is_benign());
    }

    #[test]
    fn test_relabel_updates_cells() {
        let mut f = fixture();
        let mut items = candidates(2);
        f.partitioner.partition(&items, 4, 720, 246).unwrap();

        items[1].relabel("Renamed");
        f.partitioner.relabel(&items);

        let cell = f.partitioner.cell_for(1).unwrap();
        assert_eq!(
            f.memory.borrow().record(cell).unwrap().label.as_deref(),
            Some("Renamed")
        );
    }

    proptest! {
        #[test]
        fn ranges_cover_input_in_order(count in 0usize..200, capacity in 1usize..12) {
            let ranges = page_ranges(count, capacity).unwrap();

            prop_assert_eq!(ranges.len(), page_count(count, capacity));
            prop_assert!(ranges.iter().all(|r| !r.is_empty() && r.len() <= capacity));
            let flattened: Vec<usize> = ranges.iter().cloned().flatten().collect();
            prop_assert_eq!(flattened, (0..count).collect::<Vec<_>>());
            if let Some((_, full)) = ranges.split_last() {
                prop_assert!(full.iter().all(|r| r.len() == capacity));
            }
        }
    }
}
