//! Geometry policy: items per page and panel size.

/// Unscaled panel width.
pub const PANEL_WIDTH: i32 = 720;
/// Unscaled height of one row of cells.
pub const ITEM_HEIGHT: i32 = 222;
/// Unscaled padding above and below the rows.
pub const ITEM_PADDING_HEIGHT: i32 = 24;
/// Unscaled height of the page index strip.
pub const INDEX_HEIGHT: i32 = 48;
/// Cells in one row.
pub const ITEMS_PER_ROW: usize = 4;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

impl Orientation {
    /// Maps a window rotation in degrees. Negative angles wrap around.
    pub fn from_rotation(degrees: i32) -> Self {
        match degrees.rem_euclid(360) {
            90 | 270 => Orientation::Landscape,
            _ => Orientation::Portrait,
        }
    }
}

/// Screen size in the device's natural (portrait) orientation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScreenSize {
    pub width: i32,
    pub height: i32,
}

impl ScreenSize {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Horizontal extent when held in `orientation`.
    pub fn width_in(self, orientation: Orientation) -> i32 {
        match orientation {
            Orientation::Portrait => self.width,
            Orientation::Landscape => self.height,
        }
    }
}

impl Default for ScreenSize {
    fn default() -> Self {
        Self::new(720, 1280)
    }
}

fn scaled(value: i32, scale: f64) -> i32 {
    (f64::from(value) * scale) as i32
}

/// Page capacity and panel geometry for one orientation and candidate count.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CapacityPolicy {
    pub orientation: Orientation,
    pub items_per_page: usize,
    pub rows: usize,
    pub show_index: bool,
    /// Scaled panel width, never wider than the screen.
    pub width: i32,
    /// Scaled panel height including paddings and the index strip.
    pub height: i32,
    /// Scaled height of the index strip.
    pub index_height: i32,
}

impl CapacityPolicy {
    /// Computes the policy for `count` candidates.
    ///
    /// Landscape always shows one row of four, plus the index once the
    /// candidates do not fit. Portrait shows one row up to four candidates
    /// and two rows beyond, with the index once more than eight are shown.
    pub fn compute(orientation: Orientation, count: usize, screen: ScreenSize, scale: f64) -> Self {
        let (items_per_page, rows) = match orientation {
            Orientation::Landscape => (ITEMS_PER_ROW, 1),
            Orientation::Portrait if count <= ITEMS_PER_ROW => (ITEMS_PER_ROW, 1),
            Orientation::Portrait => (ITEMS_PER_ROW * 2, 2),
        };
        let show_index = count > items_per_page;

        let rows_height = ITEM_HEIGHT * rows as i32;
        let index_strip = if show_index { INDEX_HEIGHT } else { 0 };
        let height = ITEM_PADDING_HEIGHT + rows_height + index_strip + ITEM_PADDING_HEIGHT;

        let width = scaled(PANEL_WIDTH, scale).min(screen.width_in(orientation));

        let policy = Self {
            orientation,
            items_per_page,
            rows,
            show_index,
            width,
            height: scaled(height, scale),
            index_height: scaled(INDEX_HEIGHT, scale),
        };
        log::debug!("capacity for {} candidates: {:?}", count, policy);
        policy
    }

    /// Height available to the pages.
    pub fn page_height(&self) -> i32 {
        if self.show_index {
            self.height - self.index_height
        } else {
            self.height
        }
    }
}
