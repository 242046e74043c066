//! # MessageList Component
//!
//! Scrollable view of the conversation, newest message at the top.
//!
//! ## Responsibilities
//!
//! - Display every message as a bubble
//! - Keyboard selection and scrolling
//! - Hit testing for mouse press / long-press
//! - Cache bubble heights per message id
//!
//! ## Architecture
//!
//! `MessageList` is a transient component (created each frame) that wraps
//! `&'a mut MessageListState` (persistent state) and the `MessageStore`
//! (props). Press and long-press leave the list as `MessageListEvent`s
//! carrying the message id; the screen root turns them into actions.

use std::collections::HashMap;

use ratatui::Frame;
use ratatui::layout::{Alignment, Position, Rect, Size};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::Paragraph;
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::core::message::MessageId;
use crate::core::store::MessageStore;
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::message::Bubble;
use crate::tui::event::TuiEvent;

/// High-level events emitted by the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageListEvent {
    Press(MessageId),
    LongPress(MessageId),
}

/// Layout, scroll and selection state for the message list.
/// Persisted by the screen across frames.
#[derive(Default)]
pub struct MessageListState {
    pub scroll_state: ScrollViewState,
    pub layout: LayoutCache,
    /// Selected message, tracked by id so it survives inserts at the head.
    pub selected: Option<MessageId>,
    /// Screen area of the last render (for hit testing between frames)
    pub viewport: Rect,
}

impl MessageListState {
    pub fn new() -> Self {
        Self::default()
    }

    fn selected_index(&self) -> Option<usize> {
        let selected = self.selected.as_ref()?;
        self.layout.ids.iter().position(|id| id == selected)
    }

    fn max_scroll(&self) -> u16 {
        self.layout
            .total_height()
            .saturating_sub(self.viewport.height)
    }

    /// Clamp scroll offset so it never exceeds the content bounds.
    pub fn clamp_scroll(&mut self) {
        let max_y = self.max_scroll();
        let current = self.scroll_state.offset();
        if current.y > max_y {
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }

    /// Scroll the viewport so the selected bubble is fully visible.
    /// If the bubble is taller than the viewport, align its top edge.
    pub fn scroll_to_selected(&mut self) {
        let Some(idx) = self.selected_index() else {
            return;
        };
        let Some((item_top, item_bottom)) = self.layout.span(idx) else {
            return;
        };
        let offset_y = self.scroll_state.offset().y;

        if item_top < offset_y {
            self.scroll_state.set_offset(Position { x: 0, y: item_top });
        } else if item_bottom > offset_y.saturating_add(self.viewport.height) {
            let new_y = item_bottom
                .saturating_sub(self.viewport.height)
                .min(item_top);
            self.scroll_state.set_offset(Position { x: 0, y: new_y });
        }
    }

    /// Move the selection by `delta` rows, starting at the top when nothing
    /// is selected yet.
    fn move_selection(&mut self, delta: isize) {
        let count = self.layout.ids.len();
        if count == 0 {
            self.selected = None;
            return;
        }
        let next = match self.selected_index() {
            None => 0,
            Some(idx) => idx.saturating_add_signed(delta).min(count - 1),
        };
        self.selected = Some(self.layout.ids[next].clone());
        self.scroll_to_selected();
    }

    /// Message under the screen cell `(column, row)`, if any.
    pub fn hit_test(&self, column: u16, row: u16) -> Option<MessageId> {
        if !self.viewport.contains(Position { x: column, y: row }) {
            return None;
        }
        let content_y = (row - self.viewport.y).saturating_add(self.scroll_state.offset().y);
        self.layout
            .index_at(content_y)
            .map(|idx| self.layout.ids[idx].clone())
    }
}

/// Scrollable conversation view component.
/// Created fresh each frame with references to state and data.
pub struct MessageList<'a> {
    pub state: &'a mut MessageListState,
    pub store: &'a MessageStore,
}

impl<'a> MessageList<'a> {
    pub fn new(state: &'a mut MessageListState, store: &'a MessageStore) -> Self {
        Self { state, store }
    }
}

impl<'a> Component for MessageList<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        self.state.viewport = area;

        if self.store.is_empty() {
            self.state.layout.measure(self.store, area.width);
            self.state.selected = None;
            let hint = Paragraph::new("No messages yet")
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC));
            frame.render_widget(hint, area);
            return;
        }

        let content_width = area.width.saturating_sub(1); // -1 for scrollbar safe area
        self.state.layout.measure(self.store, content_width);

        // Deleted messages can't stay selected
        if self.state.selected_index().is_none() {
            self.state.selected = None;
        }
        self.state.clamp_scroll();

        let total_height = self.state.layout.total_height();
        let scroll_offset = self.state.scroll_state.offset().y;
        let visible_range = self.state.layout.visible_range(scroll_offset, area.height);

        let mut scroll_view = ScrollView::new(Size::new(content_width, total_height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Automatic)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);

        for i in visible_range {
            let Some(message) = self.store.get(i) else {
                continue;
            };
            let Some((top, bottom)) = self.state.layout.span(i) else {
                continue;
            };
            let is_selected = self.state.selected.as_ref() == Some(message.id());
            let rect = Rect::new(0, top, content_width, bottom.saturating_sub(top));
            scroll_view.render_widget(Bubble::new(message, is_selected), rect);
        }

        frame.render_stateful_widget(scroll_view, area, &mut self.state.scroll_state);
    }
}

/// EventHandler lives on `MessageListState` because the transient
/// `MessageList` is rebuilt every frame and can't hold the selection.
impl EventHandler for MessageListState {
    type Event = MessageListEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::CursorUp => {
                self.move_selection(-1);
                None
            }
            TuiEvent::CursorDown => {
                self.move_selection(1);
                None
            }
            TuiEvent::Submit => self.selected.clone().map(MessageListEvent::Press),
            TuiEvent::Delete | TuiEvent::InputChar('d') => {
                self.selected.clone().map(MessageListEvent::LongPress)
            }
            TuiEvent::MouseClick(column, row) => {
                let id = self.hit_test(*column, *row)?;
                self.selected = Some(id.clone());
                Some(MessageListEvent::Press(id))
            }
            TuiEvent::MouseRightClick(column, row) => {
                let id = self.hit_test(*column, *row)?;
                self.selected = Some(id.clone());
                Some(MessageListEvent::LongPress(id))
            }
            TuiEvent::ScrollUp => {
                self.scroll_state.scroll_up();
                None
            }
            TuiEvent::ScrollDown => {
                self.scroll_state.scroll_down();
                self.clamp_scroll();
                None
            }
            _ => None,
        }
    }
}

/// Bubble heights, in display order, for the last rendered width.
///
/// Messages never change after creation, so a height is cached per id and
/// only thrown away when the width changes.
#[derive(Default)]
pub struct LayoutCache {
    pub ids: Vec<MessageId>,
    pub heights: Vec<u16>,
    pub prefix_heights: Vec<u16>,
    by_id: HashMap<MessageId, u16>,
    content_width: u16,
}

impl LayoutCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the row layout for `store` at `content_width`.
    pub fn measure(&mut self, store: &MessageStore, content_width: u16) {
        if self.content_width != content_width {
            self.by_id.clear();
            self.content_width = content_width;
        }

        self.ids.clear();
        self.heights.clear();
        for message in store.iter() {
            let height = *self
                .by_id
                .entry(message.id().clone())
                .or_insert_with(|| Bubble::calculate_height(message, content_width));
            self.ids.push(message.id().clone());
            self.heights.push(height);
        }
        self.by_id.retain(|id, _| self.ids.contains(id));
        self.rebuild_prefix_heights();
    }

    pub fn rebuild_prefix_heights(&mut self) {
        self.prefix_heights = self
            .heights
            .iter()
            // Past u16::MAX rows the scroll view can't address anything anyway
            .scan(0u16, |acc, &h| {
                *acc = acc.saturating_add(h);
                Some(*acc)
            })
            .collect();
    }

    pub fn total_height(&self) -> u16 {
        self.prefix_heights.last().copied().unwrap_or(0)
    }

    /// `(top, bottom)` content rows of item `idx`.
    pub fn span(&self, idx: usize) -> Option<(u16, u16)> {
        let bottom = *self.prefix_heights.get(idx)?;
        let top = if idx == 0 {
            0
        } else {
            self.prefix_heights[idx - 1]
        };
        Some((top, bottom))
    }

    /// Item covering content row `y`.
    pub fn index_at(&self, y: u16) -> Option<usize> {
        let idx = self.prefix_heights.partition_point(|&end| end <= y);
        (idx < self.prefix_heights.len()).then_some(idx)
    }

    pub fn visible_range(&self, scroll_offset: u16, viewport_height: u16) -> std::ops::Range<usize> {
        let buffer = viewport_height / 2;
        let buffered_start = scroll_offset.saturating_sub(buffer);
        let buffered_end = scroll_offset
            .saturating_add(viewport_height)
            .saturating_add(buffer);

        let start = self
            .prefix_heights
            .partition_point(|&end| end <= buffered_start);
        let end = self
            .prefix_heights
            .partition_point(|&end| end < buffered_end)
            .saturating_add(1)
            .min(self.prefix_heights.len());

        start..end
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::message::{Message, demo_conversation};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn render(state: &mut MessageListState, store: &MessageStore, width: u16, height: u16) -> String {
        let backend = TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| {
                let mut list = MessageList::new(state, store);
                list.render(f, f.area());
            })
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    fn demo_store() -> MessageStore {
        MessageStore::from_newest_first(demo_conversation())
    }

    #[test]
    fn renders_newest_first() {
        let mut store = demo_store();
        store.append(Message::text("Hi"));
        let mut state = MessageListState::new();

        let text = render(&mut state, &store, 40, 30);

        let hi = text.find("Hi").unwrap();
        let image = text.find("[image]").unwrap();
        let world = text.find("World").unwrap();
        let hello = text.find("Hello").unwrap();
        let map = text.find("[map]").unwrap();
        assert!(hi < image && image < world && world < hello && hello < map);
    }

    #[test]
    fn empty_store_shows_hint() {
        let store = MessageStore::new();
        let mut state = MessageListState::new();
        let text = render(&mut state, &store, 40, 5);
        assert!(text.contains("No messages yet"));
    }

    #[test]
    fn click_and_right_click_hit_rows() {
        let store = demo_store();
        let mut state = MessageListState::new();
        render(&mut state, &store, 40, 20);

        // Image wraps to two lines at this width: heights [4, 3, 3, 3]
        assert_eq!(state.layout.heights, vec![4, 3, 3, 3]);

        let world = store.get(1).unwrap().id().clone();
        let hello = store.get(2).unwrap().id().clone();
        assert_eq!(
            state.handle_event(&TuiEvent::MouseClick(30, 5)),
            Some(MessageListEvent::Press(world))
        );
        assert_eq!(
            state.handle_event(&TuiEvent::MouseRightClick(30, 8)),
            Some(MessageListEvent::LongPress(hello.clone()))
        );
        assert_eq!(state.selected, Some(hello));

        // Below the last bubble
        assert_eq!(state.handle_event(&TuiEvent::MouseClick(30, 15)), None);
    }

    #[test]
    fn keyboard_select_then_press_and_delete() {
        let store = demo_store();
        let mut state = MessageListState::new();
        render(&mut state, &store, 40, 20);

        assert_eq!(state.handle_event(&TuiEvent::Submit), None);

        state.handle_event(&TuiEvent::CursorDown);
        state.handle_event(&TuiEvent::CursorDown);
        let world = store.get(1).unwrap().id().clone();
        assert_eq!(
            state.handle_event(&TuiEvent::Submit),
            Some(MessageListEvent::Press(world.clone()))
        );
        assert_eq!(
            state.handle_event(&TuiEvent::InputChar('d')),
            Some(MessageListEvent::LongPress(world))
        );

        // Selection stops at the ends
        for _ in 0..10 {
            state.handle_event(&TuiEvent::CursorUp);
        }
        assert_eq!(state.selected.as_ref(), Some(store.get(0).unwrap().id()));
    }

    #[test]
    fn deleted_selection_is_dropped() {
        let mut store = demo_store();
        let mut state = MessageListState::new();
        render(&mut state, &store, 40, 20);
        let first = store.get(0).unwrap().id().clone();
        state.selected = Some(first.clone());

        store.remove(&first);
        render(&mut state, &store, 40, 20);

        assert!(state.selected.is_none());
        assert_eq!(state.layout.ids.len(), 3);
    }

    #[test]
    fn scroll_is_clamped_to_content() {
        let store = demo_store();
        let mut state = MessageListState::new();
        render(&mut state, &store, 40, 6);

        for _ in 0..50 {
            state.handle_event(&TuiEvent::ScrollDown);
        }
        // 13 rows of content in a 6-row viewport
        assert_eq!(state.scroll_state.offset().y, 7);
    }

    #[test]
    fn very_tall_conversation_saturates_heights() {
        let mut store = MessageStore::new();
        store.append(Message::text("ab ".repeat(500_000)));
        store.append(Message::text("ab ".repeat(500_000)));
        let mut cache = LayoutCache::new();

        cache.measure(&store, 40);

        let first = cache.heights[0];
        assert!(first > 30_000);
        assert_eq!(cache.prefix_heights[0], first);
        assert_eq!(cache.total_height(), u16::MAX);
        assert!(cache.prefix_heights.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(cache.span(1), Some((first, u16::MAX)));
    }

    #[test]
    fn layout_cache_ranges() {
        let mut cache = LayoutCache::new();
        cache.heights = vec![3, 4, 2];
        cache.rebuild_prefix_heights();

        assert_eq!(cache.prefix_heights, vec![3, 7, 9]);
        assert_eq!(cache.total_height(), 9);
        assert_eq!(cache.span(1), Some((3, 7)));
        assert_eq!(cache.index_at(0), Some(0));
        assert_eq!(cache.index_at(3), Some(1));
        assert_eq!(cache.index_at(9), None);
        assert_eq!(cache.visible_range(0, 2), 0..1);
    }
}
