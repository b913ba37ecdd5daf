//! One swipeable page of the selection list.

use std::ops::Range;

use app_selector_core::{PageId, Result};
use smallvec::SmallVec;

use super::applier::{Applier, WidgetId, WidgetKind};
use super::item_provider::PageItemProvider;

/// A contiguous slice of the ranked list and the widgets that show it.
///
/// The item range never changes after construction; a new capacity means
/// new pages.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Page {
    id: PageId,
    widget: WidgetId,
    grid: WidgetId,
    cells: SmallVec<[WidgetId; 8]>,
    items: Range<usize>,
}

impl Page {
    /// Builds the page, its grid and one cell per item under `scroller`.
    ///
    /// A failure part way through destroys whatever this call created.
    pub fn build<P>(
        applier: &mut dyn Applier,
        scroller: WidgetId,
        id: PageId,
        provider: &P,
        items: Range<usize>,
        width: i32,
        height: i32,
    ) -> Result<Self>
    where
        P: PageItemProvider + ?Sized,
    {
        let widget = applier.create(WidgetKind::Page, Some(scroller))?;
        match Self::fill(applier, widget, provider, &items, width, height) {
            Ok((grid, cells)) => Ok(Self {
                id,
                widget,
                grid,
                cells,
                items,
            }),
            Err(err) => {
                applier.destroy(widget);
                Err(err)
            }
        }
    }

    fn fill<P>(
        applier: &mut dyn Applier,
        widget: WidgetId,
        provider: &P,
        items: &Range<usize>,
        width: i32,
        height: i32,
    ) -> Result<(WidgetId, SmallVec<[WidgetId; 8]>)>
    where
        P: PageItemProvider + ?Sized,
    {
        applier.resize(widget, width, height);
        let grid = applier.create(WidgetKind::Grid, Some(widget))?;
        applier.resize(grid, width, height);

        let mut cells = SmallVec::with_capacity(items.len());
        for index in items.clone() {
            let cell = applier.create(WidgetKind::Cell, Some(grid))?;
            applier.set_label(cell, provider.item_label(index));
            cells.push(cell);
        }
        Ok((grid, cells))
    }

    pub fn id(&self) -> PageId {
        self.id
    }

    pub fn widget(&self) -> WidgetId {
        self.widget
    }

    pub fn grid(&self) -> WidgetId {
        self.grid
    }

    /// Global positions shown on this page.
    pub fn items(&self) -> Range<usize> {
        self.items.clone()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, position: usize) -> bool {
        self.items.contains(&position)
    }

    /// Cell widget showing global `position`.
    pub fn cell_for(&self, position: usize) -> Option<WidgetId> {
        if !self.contains(position) {
            return None;
        }
        self.cells.get(position - self.items.start).copied()
    }

    pub fn resize(&self, applier: &mut dyn Applier, width: i32, height: i32) {
        applier.resize(self.widget, width, height);
        applier.resize(self.grid, width, height);
    }

    /// Pushes fresh labels to the cells, e.g. after a locale change.
    pub fn relabel<P>(&self, applier: &mut dyn Applier, provider: &P)
    where
        P: PageItemProvider + ?Sized,
    {
        for (cell, index) in self.cells.iter().zip(self.items.clone()) {
            applier.set_label(*cell, provider.item_label(index));
        }
    }

    /// Destroys cells, grid and page, innermost first.
    pub fn destroy(self, applier: &mut dyn Applier) {
        for cell in self.cells.iter().rev() {
            applier.destroy(*cell);
        }
        applier.destroy(self.grid);
        applier.destroy(self.widget);
    }
}
