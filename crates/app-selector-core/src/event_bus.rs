//! Typed publish/subscribe registry scoped to one scroller.
//!
//! Layout code subscribes to scroller events here instead of holding a
//! reference to the widget that produces them. The bus is single-threaded:
//! listeners run synchronously on the thread that publishes.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use smallvec::SmallVec;

use crate::collections::map::HashMap;
use crate::error::{Result, SelectorError};

/// Identifier of a page inside one scroller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PageId(pub u32);

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "page#{}", self.0)
    }
}

/// Kind of scroller event a listener subscribes to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    Scroll,
    PageAppended,
    PageRemoved,
}

impl EventKind {
    pub const ALL: [EventKind; 3] = [
        EventKind::Scroll,
        EventKind::PageAppended,
        EventKind::PageRemoved,
    ];
}

/// Converts the platform's numeric event codes.
///
/// Codes follow the platform enumeration: `0` is the invalid marker,
/// `1..=3` are the scroll, append and remove events.
impl TryFrom<i32> for EventKind {
    type Error = SelectorError;

    fn try_from(code: i32) -> Result<Self> {
        match code {
            1 => Ok(Self::Scroll),
            2 => Ok(Self::PageAppended),
            3 => Ok(Self::PageRemoved),
            other => Err(SelectorError::invalid_argument(format!(
                "event kind {other} is outside the scroller enumeration"
            ))),
        }
    }
}

/// Event delivered to listeners.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScrollerEvent {
    /// The scroll offset changed; carries the page nearest to the viewport.
    Scroll { region_index: usize },
    PageAppended { page_id: PageId },
    PageRemoved { page_id: PageId },
}

impl ScrollerEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Scroll { .. } => EventKind::Scroll,
            Self::PageAppended { .. } => EventKind::PageAppended,
            Self::PageRemoved { .. } => EventKind::PageRemoved,
        }
    }
}

/// Callback invoked for each published event. Listener context is whatever
/// the closure captures.
pub type Listener = Rc<dyn Fn(&ScrollerEvent)>;

/// Returned by [`EventBus::register`]; removes exactly that registration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerHandle {
    kind: EventKind,
    id: u64,
}

impl ListenerHandle {
    pub fn kind(&self) -> EventKind {
        self.kind
    }
}

struct Registration {
    id: u64,
    callback: Listener,
}

#[derive(Default)]
struct EventBusInner {
    listeners: HashMap<EventKind, SmallVec<[Registration; 2]>>,
    next_id: u64,
}

/// Per-scroller listener registry.
///
/// Cloning yields another handle to the same registry.
#[derive(Clone, Default)]
pub struct EventBus {
    inner: Rc<RefCell<EventBusInner>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `callback` to the listeners of `kind`.
    ///
    /// Listeners of one kind are invoked in registration order. Raw kind
    /// codes go through `EventKind::try_from` first, which rejects unknown
    /// codes with [`SelectorError::InvalidArgument`].
    pub fn register(&self, kind: EventKind, callback: Listener) -> ListenerHandle {
        let mut inner = self.inner.borrow_mut();
        inner.next_id += 1;
        let id = inner.next_id;
        inner
            .listeners
            .entry(kind)
            .or_default()
            .push(Registration { id, callback });
        ListenerHandle { kind, id }
    }

    /// Removes the first registration of `callback` for `kind`.
    ///
    /// Callbacks are matched by identity, so the caller must pass the same
    /// `Rc` it registered.
    ///
    /// # Errors
    ///
    /// [`SelectorError::NotFound`] when no such registration exists.
    pub fn unregister(&self, kind: EventKind, callback: &Listener) -> Result<()> {
        let target = Rc::as_ptr(callback) as *const ();
        self.remove_where(kind, |registration| {
            Rc::as_ptr(&registration.callback) as *const () == target
        })
    }

    /// Removes the registration identified by `handle`.
    ///
    /// # Errors
    ///
    /// [`SelectorError::NotFound`] when it was already removed.
    pub fn unregister_handle(&self, handle: ListenerHandle) -> Result<()> {
        self.remove_where(handle.kind, |registration| registration.id == handle.id)
    }

    /// Delivers `event` to every listener of its kind.
    ///
    /// Iterates over a snapshot, so listeners may register or unregister
    /// while the event is being dispatched. Returns the number of listeners
    /// invoked.
    pub fn publish(&self, event: ScrollerEvent) -> usize {
        let snapshot: SmallVec<[Listener; 4]> = {
            let inner = self.inner.borrow();
            match inner.listeners.get(&event.kind()) {
                Some(registrations) => registrations
                    .iter()
                    .map(|registration| Rc::clone(&registration.callback))
                    .collect(),
                None => return 0,
            }
        };

        for callback in &snapshot {
            callback(&event);
        }
        snapshot.len()
    }

    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.inner
            .borrow()
            .listeners
            .get(&kind)
            .map_or(0, |registrations| registrations.len())
    }

    /// Drops every registration.
    pub fn clear(&self) {
        self.inner.borrow_mut().listeners.clear();
    }

    fn remove_where<F>(&self, kind: EventKind, matches: F) -> Result<()>
    where
        F: Fn(&Registration) -> bool,
    {
        let mut inner = self.inner.borrow_mut();
        let registrations = inner
            .listeners
            .get_mut(&kind)
            .ok_or_else(|| SelectorError::not_found(format!("no {kind:?} listeners")))?;
        let index = registrations
            .iter()
            .position(matches)
            .ok_or_else(|| SelectorError::not_found(format!("{kind:?} listener")))?;
        registrations.remove(index);
        if registrations.is_empty() {
            inner.listeners.remove(&kind);
        }
        Ok(())
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut counts = f.debug_map();
        for kind in EventKind::ALL {
            counts.entry(&kind, &self.listener_count(kind));
        }
        counts.finish()
    }
}
