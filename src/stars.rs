//! Interactive five-star control.

use crate::ratings::MAX_STARS;

/// Hover/selection state of one star row.
///
/// A star at position `p` (1..=5) is drawn filled when `p` is at or below the
/// hovered position, or the selected value when nothing is hovered. Selecting
/// a star never persists anything; the owner forwards [`StarControl::submit`]
/// to its rating store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StarControl {
    /// Star currently under the pointer/cursor
    hover: Option<u8>,
    /// Clicked but not necessarily submitted value
    selected: u8,
}

impl StarControl {
    /// Create a control with `selected` already chosen.
    pub fn new(selected: u8) -> Self {
        Self {
            hover: None,
            selected: selected.min(MAX_STARS),
        }
    }

    /// Selected value (0 when nothing is chosen).
    pub fn selected(&self) -> u8 {
        self.selected
    }

    /// Hovered star, if any.
    pub fn hovered(&self) -> Option<u8> {
        self.hover
    }

    /// Level to draw: the hovered star, else the selected value.
    pub fn active(&self) -> u8 {
        self.hover.unwrap_or(self.selected)
    }

    /// Pointer entered the star at `position`.
    pub fn hover(&mut self, position: u8) {
        self.hover = Some(position.clamp(1, MAX_STARS));
    }

    /// Pointer left the star row.
    pub fn leave(&mut self) {
        self.hover = None;
    }

    /// Move the hover one star to the right, starting after the selection.
    pub fn hover_next(&mut self) {
        let from = self.hover.unwrap_or(self.selected);
        self.hover(from.saturating_add(1));
    }

    /// Move the hover one star to the left, starting at the selection.
    pub fn hover_prev(&mut self) {
        let from = self.hover.unwrap_or(self.selected.max(1));
        self.hover(from.saturating_sub(1));
    }

    /// Click the star at `position`.
    pub fn click(&mut self, position: u8) {
        self.selected = position.clamp(1, MAX_STARS);
    }

    /// Click whichever star is hovered; no-op without a hover.
    pub fn click_hovered(&mut self) {
        if let Some(position) = self.hover {
            self.click(position);
        }
    }

    /// Finish a submit: clears the hover and yields the value to store.
    pub fn submit(&mut self) -> u8 {
        self.hover = None;
        self.selected
    }

    /// Replace the selection with a newly saved value.
    pub fn reseed(&mut self, saved: u8) {
        self.selected = saved.min(MAX_STARS);
    }
}
