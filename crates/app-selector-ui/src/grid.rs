//! Tap-to-confirm selection protocol of the candidate grid.
//!
//! The first tap on a cell selects it; a second tap on the same cell
//! confirms it. Sessions built from an extra list confirm on the first tap.
//! Once confirmed, the selection never changes again.

/// Current selection of one session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    None,
    /// Selected by a tap, waiting for confirmation.
    Unconfirmed(usize),
    /// Re-applied after a relayout. A tap on it selects again rather than
    /// confirming, so a rotation never launches anything by itself.
    Restored(usize),
    /// Confirmed; the launch has been requested.
    Confirmed(usize),
}

/// What a tap did to the selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TapOutcome {
    /// `position` is now selected. `first` is set for the first selection of
    /// the session.
    Selected { position: usize, first: bool },
    /// `position` is confirmed and should be launched.
    Confirmed { position: usize },
    /// The selection was already confirmed.
    Ignored,
}

impl Selection {
    pub fn position(&self) -> Option<usize> {
        match *self {
            Selection::None => None,
            Selection::Unconfirmed(position)
            | Selection::Restored(position)
            | Selection::Confirmed(position) => Some(position),
        }
    }

    pub fn is_confirmed(&self) -> bool {
        matches!(self, Selection::Confirmed(_))
    }

    /// Applies a tap on the cell showing `position`.
    pub fn tap(&mut self, position: usize, extra: bool) -> TapOutcome {
        let next = match *self {
            Selection::Confirmed(_) => return TapOutcome::Ignored,
            _ if extra => Selection::Confirmed(position),
            Selection::Unconfirmed(current) if current == position => Selection::Confirmed(position),
            _ => Selection::Unconfirmed(position),
        };
        let first = *self == Selection::None;
        *self = next;

        match next {
            Selection::Confirmed(position) => TapOutcome::Confirmed { position },
            _ => TapOutcome::Selected { position, first },
        }
    }

    /// Confirms the current selection from an action button.
    ///
    /// Returns the confirmed position, `None` when nothing is selected or it
    /// was confirmed already.
    pub fn confirm(&mut self) -> Option<usize> {
        match *self {
            Selection::Unconfirmed(position) | Selection::Restored(position) => {
                *self = Selection::Confirmed(position);
                Some(position)
            }
            Selection::None | Selection::Confirmed(_) => None,
        }
    }

    /// Marks a pending selection as restored after a relayout.
    pub fn restore(&mut self) {
        if let Selection::Unconfirmed(position) = *self {
            *self = Selection::Restored(position);
        }
    }

    pub fn reset(&mut self) {
        *self = Selection::None;
    }
}

/// Page and cell showing a global position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellLocation {
    pub page: usize,
    pub cell: usize,
}

impl CellLocation {
    /// Locates `position` on pages of `per_page` cells. `None` for an empty
    /// page capacity.
    pub fn locate(position: usize, per_page: usize) -> Option<Self> {
        if per_page == 0 {
            return None;
        }
        Some(Self {
            page: position / per_page,
            cell: position % per_page,
        })
    }
}
