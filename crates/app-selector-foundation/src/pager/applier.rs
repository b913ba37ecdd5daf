//! Widget construction seam.
//!
//! Layout code never talks to a toolkit directly. It asks an [`Applier`] to
//! create, resize, label and destroy widgets, so the whole paging engine can
//! run against the in-memory [`MemoryApplier`].

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use app_selector_core::{Result, SelectorError};
use indexmap::IndexMap;
use smallvec::SmallVec;

/// Widget roles used by the selector layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WidgetKind {
    Layout,
    Rect,
    Index,
    Scroller,
    Page,
    Grid,
    Cell,
    Popup,
}

impl WidgetKind {
    pub fn name(self) -> &'static str {
        match self {
            WidgetKind::Layout => "layout",
            WidgetKind::Rect => "rect",
            WidgetKind::Index => "index",
            WidgetKind::Scroller => "scroller",
            WidgetKind::Page => "page",
            WidgetKind::Grid => "grid",
            WidgetKind::Cell => "cell",
            WidgetKind::Popup => "popup",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WidgetId(pub u64);

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Creates and destroys toolkit widgets.
pub trait Applier {
    /// Creates a widget of `kind` under `parent`.
    ///
    /// # Errors
    ///
    /// [`SelectorError::ResourceExhaustion`] when the toolkit cannot allocate
    /// the widget.
    fn create(&mut self, kind: WidgetKind, parent: Option<WidgetId>) -> Result<WidgetId>;

    /// Destroys `id` together with every widget created under it.
    ///
    /// Destroying an unknown id is a no-op.
    fn destroy(&mut self, id: WidgetId);

    fn resize(&mut self, id: WidgetId, width: i32, height: i32) {
        let _ = (id, width, height);
    }

    fn set_label(&mut self, id: WidgetId, label: &str) {
        let _ = (id, label);
    }
}

/// Applier shared by every object of one layout.
pub type SharedApplier = Rc<RefCell<dyn Applier>>;

/// Snapshot of one live widget in a [`MemoryApplier`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WidgetRecord {
    pub kind: WidgetKind,
    pub parent: Option<WidgetId>,
    pub width: i32,
    pub height: i32,
    pub label: Option<String>,
}

/// In-memory applier that records the live widget tree.
///
/// Creation order is preserved, so children of a widget are listed in the
/// order they were created.
#[derive(Default)]
pub struct MemoryApplier {
    widgets: IndexMap<WidgetId, WidgetRecord>,
    next_id: u64,
    created: usize,
    fail_after: Option<usize>,
    fail_once_at: Option<usize>,
    fail_kind: Option<WidgetKind>,
}

impl MemoryApplier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps a new applier into a handle usable as [`SharedApplier`].
    pub fn shared() -> Rc<RefCell<MemoryApplier>> {
        Rc::new(RefCell::new(Self::new()))
    }

    /// Makes every creation fail once `count` more widgets were created.
    pub fn fail_after(&mut self, count: usize) {
        self.fail_after = Some(self.created + count);
    }

    /// Makes only the creation after the next `count` ones fail.
    pub fn fail_once_after(&mut self, count: usize) {
        self.fail_once_at = Some(self.created + count);
    }

    /// Makes every creation of `kind` fail.
    pub fn fail_kind(&mut self, kind: WidgetKind) {
        self.fail_kind = Some(kind);
    }

    /// Clears injected failures.
    pub fn heal(&mut self) {
        self.fail_after = None;
        self.fail_once_at = None;
        self.fail_kind = None;
    }

    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    pub fn is_live(&self, id: WidgetId) -> bool {
        self.widgets.contains_key(&id)
    }

    pub fn live_count(&self, kind: WidgetKind) -> usize {
        self.widgets.values().filter(|w| w.kind == kind).count()
    }

    pub fn record(&self, id: WidgetId) -> Option<&WidgetRecord> {
        self.widgets.get(&id)
    }

    /// Children of `id` in creation order.
    pub fn children(&self, id: WidgetId) -> Vec<WidgetId> {
        self.widgets
            .iter()
            .filter(|(_, record)| record.parent == Some(id))
            .map(|(child, _)| *child)
            .collect()
    }

    /// Live widgets of `kind` in creation order.
    pub fn widgets_of(&self, kind: WidgetKind) -> Vec<WidgetId> {
        self.widgets
            .iter()
            .filter(|(_, record)| record.kind == kind)
            .map(|(id, _)| *id)
            .collect()
    }

    fn should_fail(&self, kind: WidgetKind) -> bool {
        self.fail_kind == Some(kind) || self.fail_after.is_some_and(|limit| self.created >= limit)
    }
}

impl Applier for MemoryApplier {
    fn create(&mut self, kind: WidgetKind, parent: Option<WidgetId>) -> Result<WidgetId> {
        if self.fail_once_at == Some(self.created) {
            self.fail_once_at = None;
            return Err(SelectorError::ResourceExhaustion { what: kind.name() });
        }
        if self.should_fail(kind) {
            return Err(SelectorError::ResourceExhaustion { what: kind.name() });
        }
        if let Some(parent) = parent {
            if !self.widgets.contains_key(&parent) {
                return Err(SelectorError::not_found(format!(
                    "parent {parent} of new {}",
                    kind.name()
                )));
            }
        }

        self.next_id += 1;
        self.created += 1;
        let id = WidgetId(self.next_id);
        self.widgets.insert(
            id,
            WidgetRecord {
                kind,
                parent,
                width: 0,
                height: 0,
                label: None,
            },
        );
        Ok(id)
    }

    fn destroy(&mut self, id: WidgetId) {
        if !self.widgets.contains_key(&id) {
            return;
        }
        let mut doomed: SmallVec<[WidgetId; 16]> = SmallVec::new();
        doomed.push(id);
        let mut cursor = 0;
        while cursor < doomed.len() {
            let current = doomed[cursor];
            doomed.extend(
                self.widgets
                    .iter()
                    .filter(|(_, record)| record.parent == Some(current))
                    .map(|(child, _)| *child),
            );
            cursor += 1;
        }
        // Children first, like a toolkit tearing down its tree.
        for doomed_id in doomed.iter().rev() {
            self.widgets.shift_remove(doomed_id);
        }
    }

    fn resize(&mut self, id: WidgetId, width: i32, height: i32) {
        if let Some(record) = self.widgets.get_mut(&id) {
            record.width = width;
            record.height = height;
        }
    }

    fn set_label(&mut self, id: WidgetId, label: &str) {
        if let Some(record) = self.widgets.get_mut(&id) {
            record.label = Some(label.to_owned());
        }
    }
}

impl fmt::Debug for MemoryApplier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryApplier")
            .field("live", &self.widgets.len())
            .field("created", &self.created)
            .field("fail_after", &self.fail_after)
            .field("fail_kind", &self.fail_kind)
            .finish()
    }
}
