//! Navigation state for the interactive board.
//!
//! Created once when the app starts and passed by reference to the key
//! handler and the renderer. It only stores positions; the deals and stages
//! they point at always come from the board.

use crate::models::ClientType;

/// Cursor, drag hover and view selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavState {
    /// Which pipeline is shown.
    pub view: ClientType,
    /// Selected column.
    pub column: usize,
    /// Selected card within the column.
    pub row: usize,
    /// Column the dragged card is hovering over, while a drag is active.
    pub hover: Option<usize>,
    /// First visible card row, shared by all columns.
    pub scroll: usize,
}

impl NavState {
    pub fn new(view: ClientType) -> Self {
        Self {
            view,
            ..Self::default()
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.hover.is_some()
    }

    /// Keep the cursor inside the board after it changed shape.
    ///
    /// `column_lens` holds the number of cards in each visible column.
    pub fn clamp(&mut self, column_lens: &[usize]) {
        if column_lens.is_empty() {
            self.column = 0;
            self.row = 0;
            self.hover = None;
            return;
        }
        self.column = self.column.min(column_lens.len() - 1);
        self.row = self.row.min(column_lens[self.column].saturating_sub(1));
        if let Some(hover) = self.hover {
            self.hover = Some(hover.min(column_lens.len() - 1));
        }
    }

    pub fn left(&mut self, column_lens: &[usize]) {
        if let Some(hover) = self.hover.as_mut() {
            *hover = hover.saturating_sub(1);
        } else {
            self.column = self.column.saturating_sub(1);
        }
        self.clamp(column_lens);
    }

    pub fn right(&mut self, column_lens: &[usize]) {
        if let Some(hover) = self.hover.as_mut() {
            *hover += 1;
        } else {
            self.column += 1;
        }
        self.clamp(column_lens);
    }

    pub fn up(&mut self, column_lens: &[usize]) {
        if self.is_dragging() {
            return;
        }
        self.row = self.row.saturating_sub(1);
        self.clamp(column_lens);
        self.scroll = self.scroll.min(self.row);
    }

    pub fn down(&mut self, column_lens: &[usize]) {
        if self.is_dragging() {
            return;
        }
        self.row += 1;
        self.clamp(column_lens);
    }

    /// Start hovering from the selected column.
    pub fn begin_drag(&mut self) {
        self.hover = Some(self.column);
    }

    /// Stop hovering and return the column the card was released over.
    /// The cursor follows the card.
    pub fn finish_drag(&mut self) -> Option<usize> {
        let hover = self.hover.take()?;
        self.column = hover;
        Some(hover)
    }

    /// Abandon a drag, leaving the cursor where it was.
    pub fn cancel_drag(&mut self) {
        self.hover = None;
    }

    /// Switch between the buyer and seller pipelines.
    pub fn toggle_view(&mut self) {
        self.view = self.view.toggled();
        self.column = 0;
        self.row = 0;
        self.hover = None;
        self.scroll = 0;
    }

    /// Adjust `scroll` so the selected row is inside a window of `visible`
    /// card rows.
    pub fn ensure_visible(&mut self, visible: usize) {
        if visible == 0 {
            return;
        }
        if self.row < self.scroll {
            self.scroll = self.row;
        } else if self.row >= self.scroll + visible {
            self.scroll = self.row + 1 - visible;
        }
    }
}
