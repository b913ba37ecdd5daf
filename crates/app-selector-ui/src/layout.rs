//! Layout orchestration.
//!
//! A [`SelectorLayout`] owns the widget tree of the selector panel for one
//! orientation: the root layout, a sizing rect, the optional page index, the
//! scroller and its pages. It also owns the session's [`Selection`], which
//! outlives rebuilds so a rotation can bring the selected cell back into
//! view.

use std::cell::RefCell;
use std::rc::Rc;

use app_selector_core::{EventBus, Result, SelectorError};
use app_selector_foundation::{
    IndexIndicator, PageItemProvider, PagePartitioner, PagerState, SharedApplier, Synchronizer,
    WidgetId, WidgetKind,
};

use crate::capacity::{CapacityPolicy, Orientation, ScreenSize};
use crate::grid::{CellLocation, Selection, TapOutcome};

/// How a rotation ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RotationOutcome {
    /// The layout now uses the new orientation.
    Rotated,
    /// The new layout could not be built; the previous one was restored.
    Reverted,
}

/// Widgets and paging state of one build.
struct LayoutParts {
    root: WidgetId,
    rect: WidgetId,
    index: Option<WidgetId>,
    scroller: WidgetId,
    pager: PagerState,
    partitioner: PagePartitioner,
    synchronizer: Option<Synchronizer>,
}

/// The selector panel.
pub struct SelectorLayout {
    applier: SharedApplier,
    parent: Option<WidgetId>,
    screen: ScreenSize,
    scale: f64,
    policy: CapacityPolicy,
    item_count: usize,
    parts: Option<LayoutParts>,
    selection: Selection,
}

impl SelectorLayout {
    /// Builds the panel for `provider`'s items under `parent`.
    ///
    /// # Errors
    ///
    /// Any widget construction failure. Partially built widgets are
    /// destroyed before returning.
    pub fn build<P>(
        applier: SharedApplier,
        parent: Option<WidgetId>,
        provider: &P,
        orientation: Orientation,
        screen: ScreenSize,
        scale: f64,
    ) -> Result<Self>
    where
        P: PageItemProvider + ?Sized,
    {
        let policy = CapacityPolicy::compute(orientation, provider.item_count(), screen, scale);
        let parts = build_parts(&applier, parent, provider, &policy)?;
        log::debug!(
            "layout built: {} items on {} pages",
            provider.item_count(),
            parts.partitioner.page_count()
        );
        Ok(Self {
            applier,
            parent,
            screen,
            scale,
            policy,
            item_count: provider.item_count(),
            parts: Some(parts),
            selection: Selection::None,
        })
    }

    /// Tears the panel down. Safe to call repeatedly.
    pub fn destroy(&mut self) {
        if let Some(parts) = self.parts.take() {
            teardown(&self.applier, parts);
            log::debug!("layout destroyed");
        }
    }

    pub fn is_destroyed(&self) -> bool {
        self.parts.is_none()
    }

    /// Rebuilds the panel for `orientation`.
    ///
    /// A pending selection is kept and its page is shown again, without
    /// confirming it. When the new layout cannot be built the previous
    /// policy is tried once more.
    ///
    /// # Errors
    ///
    /// [`SelectorError::LayoutDestroyed`] on a destroyed layout, or the
    /// construction error when neither layout could be built. The layout is
    /// destroyed in the latter case.
    pub fn rotate<P>(&mut self, provider: &P, orientation: Orientation) -> Result<RotationOutcome>
    where
        P: PageItemProvider + ?Sized,
    {
        let parts = self.parts.take().ok_or(SelectorError::LayoutDestroyed)?;
        teardown(&self.applier, parts);
        self.selection.restore();

        let previous = self.policy;
        let next = CapacityPolicy::compute(orientation, provider.item_count(), self.screen, self.scale);

        let outcome = match build_parts(&self.applier, self.parent, provider, &next) {
            Ok(parts) => {
                self.policy = next;
                self.parts = Some(parts);
                RotationOutcome::Rotated
            }
            Err(err) => {
                log::warn!("rotation to {:?} failed: {}", orientation, err);
                let parts = build_parts(&self.applier, self.parent, provider, &previous)
                    .inspect_err(|retry| log::error!("previous layout not restored: {}", retry))?;
                self.parts = Some(parts);
                RotationOutcome::Reverted
            }
        };
        self.item_count = provider.item_count();
        self.show_selected_page();
        Ok(outcome)
    }

    /// Handles a tap on the cell showing `position`.
    ///
    /// # Errors
    ///
    /// [`SelectorError::LayoutDestroyed`], or
    /// [`SelectorError::InvalidArgument`] for a position without a cell.
    pub fn tap(&mut self, position: usize, extra: bool) -> Result<TapOutcome> {
        if self.parts.is_none() {
            return Err(SelectorError::LayoutDestroyed);
        }
        if position >= self.item_count {
            return Err(SelectorError::invalid_argument(format!(
                "position {position} of {} items",
                self.item_count
            )));
        }
        let outcome = self.selection.tap(position, extra);
        log::debug!("tap on {}: {:?}", position, outcome);
        Ok(outcome)
    }

    /// Handles a tap on page index entry `index`.
    pub fn tap_index(&self, index: usize) -> Result<()> {
        let parts = self.parts.as_ref().ok_or(SelectorError::LayoutDestroyed)?;
        match &parts.synchronizer {
            Some(synchronizer) => synchronizer.tap(index),
            None => Err(SelectorError::invalid_argument("layout has no page index")),
        }
    }

    /// Confirms the pending selection from an action button.
    pub fn confirm(&mut self) -> Option<usize> {
        self.selection.confirm()
    }

    pub fn reset_selection(&mut self) {
        self.selection.reset();
    }

    /// Pushes fresh labels to every cell.
    pub fn relabel<P>(&self, provider: &P) -> Result<()>
    where
        P: PageItemProvider + ?Sized,
    {
        let parts = self.parts.as_ref().ok_or(SelectorError::LayoutDestroyed)?;
        parts.partitioner.relabel(provider);
        Ok(())
    }

    pub fn policy(&self) -> &CapacityPolicy {
        &self.policy
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn item_count(&self) -> usize {
        self.item_count
    }

    pub fn root(&self) -> Option<WidgetId> {
        self.parts.as_ref().map(|parts| parts.root)
    }

    pub fn rect(&self) -> Option<WidgetId> {
        self.parts.as_ref().map(|parts| parts.rect)
    }

    pub fn scroller(&self) -> Option<WidgetId> {
        self.parts.as_ref().map(|parts| parts.scroller)
    }

    pub fn has_index(&self) -> bool {
        self.parts.as_ref().is_some_and(|parts| parts.index.is_some())
    }

    pub fn pager(&self) -> Option<PagerState> {
        self.parts.as_ref().map(|parts| parts.pager.clone())
    }

    pub fn partitioner(&self) -> Option<&PagePartitioner> {
        self.parts.as_ref().map(|parts| &parts.partitioner)
    }

    pub fn page_count(&self) -> usize {
        self.parts
            .as_ref()
            .map_or(0, |parts| parts.partitioner.page_count())
    }

    /// Page currently nearest to the viewport.
    pub fn current_page(&self) -> Option<usize> {
        self.parts
            .as_ref()
            .filter(|parts| !parts.partitioner.is_empty())
            .map(|parts| parts.pager.region_index())
    }

    /// Snapshot of the page index, `None` when the layout has none.
    pub fn indicator(&self) -> Option<IndexIndicator> {
        let synchronizer = self.parts.as_ref()?.synchronizer.as_ref()?;
        let indicator = synchronizer.indicator();
        let snapshot = indicator.borrow().clone();
        Some(snapshot)
    }

    /// Cell widget of the selected candidate.
    pub fn selected_cell(&self) -> Option<WidgetId> {
        let position = self.selection.position()?;
        self.parts.as_ref()?.partitioner.cell_for(position)
    }

    fn show_selected_page(&self) {
        let (Some(parts), Some(position)) = (self.parts.as_ref(), self.selection.position()) else {
            return;
        };
        let Some(location) = CellLocation::locate(position, self.policy.items_per_page) else {
            return;
        };
        match parts.pager.show_page(location.page) {
            Ok(()) => log::debug!(
                "selection {} restored on page {} cell {}",
                position,
                location.page,
                location.cell
            ),
            Err(err) => log::warn!("cannot show page of selection {}: {}", position, err),
        }
    }
}

impl Drop for SelectorLayout {
    fn drop(&mut self) {
        self.destroy();
    }
}

impl std::fmt::Debug for SelectorLayout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectorLayout")
            .field("policy", &self.policy)
            .field("item_count", &self.item_count)
            .field("pages", &self.page_count())
            .field("selection", &self.selection)
            .field("destroyed", &self.is_destroyed())
            .finish()
    }
}

fn build_parts<P>(
    applier: &SharedApplier,
    parent: Option<WidgetId>,
    provider: &P,
    policy: &CapacityPolicy,
) -> Result<LayoutParts>
where
    P: PageItemProvider + ?Sized,
{
    let root = applier.borrow_mut().create(WidgetKind::Layout, parent)?;
    assemble(applier, root, provider, policy).inspect_err(|_| applier.borrow_mut().destroy(root))
}

fn assemble<P>(
    applier: &SharedApplier,
    root: WidgetId,
    provider: &P,
    policy: &CapacityPolicy,
) -> Result<LayoutParts>
where
    P: PageItemProvider + ?Sized,
{
    let (rect, index, scroller) = {
        let mut applier = applier.borrow_mut();
        applier.resize(root, policy.width, policy.height);

        let rect = applier.create(WidgetKind::Rect, Some(root))?;
        applier.resize(rect, policy.width, policy.height);

        let index = if policy.show_index {
            let index = applier.create(WidgetKind::Index, Some(root))?;
            applier.resize(index, policy.width, policy.index_height);
            Some(index)
        } else {
            None
        };

        let scroller = applier.create(WidgetKind::Scroller, Some(root))?;
        applier.resize(scroller, policy.width, policy.page_height());
        (rect, index, scroller)
    };

    let pager = PagerState::new(EventBus::new());
    pager.set_page_width(policy.width);
    let synchronizer = index.map(|_| {
        Synchronizer::attach(pager.clone(), Rc::new(RefCell::new(IndexIndicator::new())))
    });

    let mut partitioner = PagePartitioner::new(Rc::clone(applier), pager.clone(), scroller);
    partitioner.partition(
        provider,
        policy.items_per_page,
        policy.width,
        policy.page_height(),
    )?;

    Ok(LayoutParts {
        root,
        rect,
        index,
        scroller,
        pager,
        partitioner,
        synchronizer,
    })
}

fn teardown(applier: &SharedApplier, mut parts: LayoutParts) {
    if let Some(mut synchronizer) = parts.synchronizer.take() {
        synchronizer.detach();
    }
    parts.partitioner.clear();
    parts.pager.bus().clear();
    applier.borrow_mut().destroy(parts.root);
}
