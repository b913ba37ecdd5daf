//! Pager scroll state.
//!
//! Provides [`PagerState`] for controlling and observing the horizontal
//! scroll position over the pages.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use app_selector_core::{EventBus, Result, ScrollerEvent, SelectorError};

/// Scroll phase of the pager.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ScrollPhase {
    #[default]
    Idle,
    /// Animating towards a target offset.
    Scrolling,
    /// Following the user's finger.
    Dragging,
}

/// Page nearest to `offset`.
///
/// `offset / page_width`, plus one when the remainder is more than half a
/// page. The result is clamped into `0..page_count`; an empty pager or a
/// zero width yields `0`.
pub fn region_index_for(offset: i32, page_width: i32, page_count: usize) -> usize {
    if page_count == 0 || page_width <= 0 || offset <= 0 {
        return 0;
    }
    let mut index = (offset / page_width) as usize;
    if offset % page_width > page_width / 2 {
        index += 1;
    }
    index.min(page_count - 1)
}

/// State object for the pager scroll position.
///
/// Cloning yields another handle to the same state. Every change of the
/// offset publishes [`ScrollerEvent::Scroll`] on the pager's bus.
///
/// # Example
///
/// ```rust
/// use app_selector_core::EventBus;
/// use app_selector_foundation::PagerState;
///
/// let pager = PagerState::new(EventBus::new());
/// pager.set_page_width(720);
/// pager.set_page_count(3);
/// pager.show_page(2).unwrap();
/// assert_eq!(pager.offset(), 1440);
/// assert_eq!(pager.region_index(), 2);
/// ```
#[derive(Clone)]
pub struct PagerState {
    inner: Rc<RefCell<PagerStateInner>>,
}

/// Non-owning handle to a [`PagerState`], held by event listeners.
#[derive(Clone)]
pub struct WeakPagerState {
    inner: Weak<RefCell<PagerStateInner>>,
}

#[derive(Debug)]
struct PagerStateInner {
    /// Scroll offset in pixels from the left edge of page 0.
    offset: i32,
    page_width: i32,
    page_count: usize,
    phase: ScrollPhase,
    /// Fractional pixel accumulator to avoid rounding drift.
    accumulator: f32,
    bus: EventBus,
}

impl PagerStateInner {
    fn max_offset(&self) -> i32 {
        let pages = i32::try_from(self.page_count.saturating_sub(1)).unwrap_or(i32::MAX);
        pages.saturating_mul(self.page_width.max(0))
    }

    fn region_index(&self) -> usize {
        region_index_for(self.offset, self.page_width, self.page_count)
    }

    fn offset_of(&self, index: usize) -> i32 {
        i32::try_from(index)
            .unwrap_or(i32::MAX)
            .saturating_mul(self.page_width.max(0))
    }
}

impl PagerState {
    pub fn new(bus: EventBus) -> Self {
        Self {
            inner: Rc::new(RefCell::new(PagerStateInner {
                offset: 0,
                page_width: 0,
                page_count: 0,
                phase: ScrollPhase::Idle,
                accumulator: 0.0,
                bus,
            })),
        }
    }

    pub fn downgrade(&self) -> WeakPagerState {
        WeakPagerState {
            inner: Rc::downgrade(&self.inner),
        }
    }

    pub fn bus(&self) -> EventBus {
        self.inner.borrow().bus.clone()
    }

    pub fn offset(&self) -> i32 {
        self.inner.borrow().offset
    }

    pub fn page_width(&self) -> i32 {
        self.inner.borrow().page_width
    }

    pub fn page_count(&self) -> usize {
        self.inner.borrow().page_count
    }

    pub fn phase(&self) -> ScrollPhase {
        self.inner.borrow().phase
    }

    /// Returns true while animating or dragging.
    pub fn is_scrolling(&self) -> bool {
        self.phase() != ScrollPhase::Idle
    }

    /// Page nearest to the viewport, see [`region_index_for`].
    pub fn region_index(&self) -> usize {
        self.inner.borrow().region_index()
    }

    /// Largest reachable offset, `(page_count - 1) * page_width`.
    pub fn max_offset(&self) -> i32 {
        self.inner.borrow().max_offset()
    }

    /// Updates the page count, pulling the offset back into range.
    ///
    /// Does not publish; structural changes are announced by the
    /// partitioner.
    pub fn set_page_count(&self, page_count: usize) {
        let mut inner = self.inner.borrow_mut();
        inner.page_count = page_count;
        let max = inner.max_offset();
        if inner.offset > max {
            inner.offset = max;
            inner.accumulator = 0.0;
        }
    }

    /// Changes the page width and keeps the current page in view.
    pub fn set_page_width(&self, page_width: i32) {
        let changed = {
            let mut inner = self.inner.borrow_mut();
            let region = inner.region_index();
            inner.page_width = page_width.max(0);
            let offset = inner.offset_of(region);
            let changed = offset != inner.offset;
            inner.offset = offset;
            inner.accumulator = 0.0;
            changed
        };
        if changed {
            self.publish_scroll();
        }
    }

    /// Consumes a drag or fling delta.
    ///
    /// Adds `delta` to the offset, clamps to `[0, max_offset]` and keeps the
    /// fractional remainder for the next call. Returns the consumed amount.
    pub fn dispatch_scroll_delta(&self, delta: f32) -> f32 {
        let consumed = {
            let mut inner = self.inner.borrow_mut();
            let current = inner.offset as f32;
            let absolute = current + delta + inner.accumulator;
            let new_value = absolute.clamp(0.0, inner.max_offset() as f32);

            let consumed = new_value - current;
            let consumed_int = consumed.round() as i32;
            inner.accumulator = consumed - consumed_int as f32;
            inner.offset += consumed_int;
            consumed
        };
        if consumed != 0.0 {
            self.publish_scroll();
        }
        consumed
    }

    /// Jumps to `offset`, clamped into range.
    pub fn scroll_to(&self, offset: i32) {
        {
            let mut inner = self.inner.borrow_mut();
            inner.offset = offset.clamp(0, inner.max_offset());
            inner.accumulator = 0.0;
        }
        self.publish_scroll();
    }

    /// Shows page `index` immediately.
    ///
    /// # Errors
    ///
    /// [`SelectorError::InvalidArgument`] when `index` is not a page.
    pub fn show_page(&self, index: usize) -> Result<()> {
        let target = {
            let inner = self.inner.borrow();
            if index >= inner.page_count {
                return Err(SelectorError::invalid_argument(format!(
                    "page {index} of {}",
                    inner.page_count
                )));
            }
            inner.offset_of(index)
        };
        self.scroll_to(target);
        Ok(())
    }

    /// Snaps to the nearest page and stops scrolling.
    pub fn settle(&self) {
        let target = {
            let mut inner = self.inner.borrow_mut();
            inner.phase = ScrollPhase::Idle;
            let region = inner.region_index();
            inner.offset_of(region)
        };
        if target != self.offset() {
            self.scroll_to(target);
        }
    }

    pub fn drag_start(&self) {
        self.inner.borrow_mut().phase = ScrollPhase::Dragging;
    }

    /// Ends a drag. Without momentum the pager becomes idle; with momentum
    /// it keeps scrolling until [`PagerState::anim_stop`].
    pub fn drag_stop(&self, momentum: bool) {
        self.inner.borrow_mut().phase = if momentum {
            ScrollPhase::Scrolling
        } else {
            ScrollPhase::Idle
        };
    }

    pub fn anim_start(&self) {
        self.inner.borrow_mut().phase = ScrollPhase::Scrolling;
    }

    pub fn anim_stop(&self) {
        self.inner.borrow_mut().phase = ScrollPhase::Idle;
    }

    fn publish_scroll(&self) {
        let (bus, region_index) = {
            let inner = self.inner.borrow();
            (inner.bus.clone(), inner.region_index())
        };
        bus.publish(ScrollerEvent::Scroll { region_index });
    }
}

impl WeakPagerState {
    pub fn upgrade(&self) -> Option<PagerState> {
        self.inner.upgrade().map(|inner| PagerState { inner })
    }
}

impl std::fmt::Debug for PagerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("PagerState")
            .field("offset", &inner.offset)
            .field("page_width", &inner.page_width)
            .field("page_count", &inner.page_count)
            .field("phase", &inner.phase)
            .finish()
    }
}
