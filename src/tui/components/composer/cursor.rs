//! Cursor and horizontal scroll for the single-line draft editor.
//!
//! The draft itself lives in `core::composer::Composer`; this only tracks
//! where the caret sits in it (a byte offset) and which display column is
//! the first one visible.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(super) struct CursorState {
    /// Byte offset into the draft (0..=draft.len()), always on a char boundary
    pub pos: usize,
    /// First visible display column. Columns are `usize` since a pasted
    /// draft can be wider than `u16::MAX`.
    pub scroll: usize,
}

impl CursorState {
    /// Pull the cursor back inside `text` after the draft changed underneath it
    /// (submit clears it, for example).
    pub fn clamp(&mut self, text: &str) {
        if self.pos > text.len() {
            self.pos = text.len();
        }
        while !text.is_char_boundary(self.pos) {
            self.pos -= 1;
        }
        if text.is_empty() {
            self.scroll = 0;
        }
    }

    /// Display column of the caret from the start of the draft.
    pub fn column(&self, text: &str) -> usize {
        text[..self.pos].width()
    }

    /// Caret offset from the left edge of the viewport.
    pub fn screen_column(&self, text: &str) -> u16 {
        let offset = self.column(text).saturating_sub(self.scroll);
        u16::try_from(offset).unwrap_or(u16::MAX)
    }

    /// Keep the caret inside a viewport of `width` columns.
    pub fn update_scroll(&mut self, text: &str, width: u16) {
        if width == 0 {
            self.scroll = 0;
            return;
        }
        let width = usize::from(width);
        let column = self.column(text);
        if column < self.scroll {
            self.scroll = column;
        } else if column >= self.scroll.saturating_add(width) {
            // Leave the last cell free for the caret
            self.scroll = column + 1 - width;
        }
    }

    /// Slice of `text` that fits in `width` columns starting at `scroll`.
    pub fn visible<'t>(&self, text: &'t str, width: u16) -> &'t str {
        let limit = self.scroll.saturating_add(usize::from(width));
        let mut column = 0usize;
        let mut start = text.len();
        let mut end = text.len();
        for (i, c) in text.char_indices() {
            if column >= self.scroll && start == text.len() {
                start = i;
            }
            let next = column + c.width().unwrap_or(0);
            if next > limit {
                end = i;
                break;
            }
            column = next;
        }
        if start > end { "" } else { &text[start..end] }
    }
}

/// Byte offset of the character before `pos`.
pub(super) fn prev_char_boundary(text: &str, pos: usize) -> usize {
    text[..pos]
        .char_indices()
        .next_back()
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Byte offset just past the character at `pos`.
pub(super) fn next_char_boundary(text: &str, pos: usize) -> usize {
    text[pos..]
        .chars()
        .next()
        .map(|c| pos + c.len_utf8())
        .unwrap_or(text.len())
}
