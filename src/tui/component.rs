//! Traits shared by every piece of the two screens.
//!
//! Drawing and input are split: a bubble or a dialog only draws, while the
//! message list, composer and goal list also turn `TuiEvent`s into their
//! own events. Those events carry ids or text upward; the screen decides
//! what they mean (`Action`s on the messaging screen, `GoalBoard` calls on
//! the goal screen).

use ratatui::Frame;
use ratatui::layout::Rect;

use crate::tui::event::TuiEvent;

/// Something that draws itself into an area of the frame.
///
/// Most implementors are built fresh each frame from borrowed state, e.g.
/// `MessageList { state: &mut MessageListState, store: &MessageStore }`.
/// `render` takes `&mut self` so they can write back what the next event
/// needs: cached bubble heights, the scroll offset, button hit rects.
pub trait Component {
    fn render(&mut self, frame: &mut Frame, area: Rect);
}

/// Turns terminal input into a component-level event.
///
/// Returning `None` means the event was ignored or only moved local state
/// (cursor, selection, scroll).
pub trait EventHandler {
    type Event;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event>;
}
