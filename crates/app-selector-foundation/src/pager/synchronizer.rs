//! Keeps the page index indicator in step with the pager.
//!
//! Scroll events move the indicator's marker; page append and removal
//! rebuild its entries. The only way back from the indicator to the pager
//! is [`Synchronizer::tap`].

use std::cell::RefCell;
use std::rc::Rc;

use app_selector_core::{EventKind, ListenerHandle, Result, ScrollerEvent};
use smallvec::SmallVec;

use super::index_indicator::IndexIndicator;
use super::pager_state::PagerState;

/// Listener registrations binding one indicator to one pager.
///
/// Dropping the synchronizer unregisters its listeners.
pub struct Synchronizer {
    pager: PagerState,
    indicator: Rc<RefCell<IndexIndicator>>,
    handles: SmallVec<[ListenerHandle; 3]>,
}

impl Synchronizer {
    /// Registers the scroll and page listeners on the pager's bus and
    /// brings the indicator up to date.
    pub fn attach(pager: PagerState, indicator: Rc<RefCell<IndexIndicator>>) -> Self {
        let bus = pager.bus();
        let mut handles = SmallVec::new();

        let on_scroll = {
            let indicator = Rc::clone(&indicator);
            move |event: &ScrollerEvent| {
                if let ScrollerEvent::Scroll { region_index } = *event {
                    indicator.borrow_mut().bring_in(region_index);
                }
            }
        };
        handles.push(bus.register(EventKind::Scroll, Rc::new(on_scroll)));

        for kind in [EventKind::PageAppended, EventKind::PageRemoved] {
            let indicator = Rc::clone(&indicator);
            let pager = pager.downgrade();
            let on_structure = move |_: &ScrollerEvent| {
                if let Some(pager) = pager.upgrade() {
                    indicator.borrow_mut().update(pager.page_count());
                }
            };
            handles.push(bus.register(kind, Rc::new(on_structure)));
        }

        {
            let mut indicator = indicator.borrow_mut();
            indicator.update(pager.page_count());
            indicator.bring_in(pager.region_index());
        }

        Self {
            pager,
            indicator,
            handles,
        }
    }

    pub fn indicator(&self) -> Rc<RefCell<IndexIndicator>> {
        Rc::clone(&self.indicator)
    }

    pub fn pager(&self) -> &PagerState {
        &self.pager
    }

    /// Handles a tap on index entry `index`: shows that page and marks it.
    pub fn tap(&self, index: usize) -> Result<()> {
        self.pager.show_page(index)?;
        self.indicator.borrow_mut().bring_in(index);
        Ok(())
    }

    /// Unregisters all listeners. Safe to call more than once.
    pub fn detach(&mut self) {
        let bus = self.pager.bus();
        for handle in self.handles.drain(..) {
            if let Err(err) = bus.unregister_handle(handle) {
                log::warn!("listener {:?} already gone: {}", handle.kind(), err);
            }
        }
    }
}

impl Drop for Synchronizer {
    fn drop(&mut self) {
        self.detach();
    }
}
