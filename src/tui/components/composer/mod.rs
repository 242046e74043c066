//! # Composer Component
//!
//! The toolbar at the bottom of the messaging screen: a single-line draft
//! editor plus the camera, location, microphone and send buttons.
//!
//! ## State Management
//!
//! The draft and the focus/recording flags are props from
//! `core::composer::Composer`. Edits don't touch them directly; they come
//! back out as `ComposerEvent::Changed(new_draft)` and the screen root feeds
//! that through `update()`. Only the caret, horizontal scroll and the
//! button hit areas live here in `ComposerState`.

mod cursor;

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Paragraph};
use unicode_width::UnicodeWidthStr;

use crate::core::composer::Composer;
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

use cursor::{CursorState, next_char_boundary, prev_char_boundary};

/// Rows the composer occupies (borders included).
pub const HEIGHT: u16 = 3;

/// High-level events emitted by the composer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComposerEvent {
    /// The draft should become this text.
    Changed(String),
    Submit,
    /// A click landed in the editor field.
    Focused,
    Camera,
    Location,
    ToggleRecording,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Button {
    Camera,
    Location,
    Mic,
    Send,
}

impl Button {
    const ALL: [Button; 4] = [Button::Camera, Button::Location, Button::Mic, Button::Send];

    fn label(self, recording: bool, send_label: &'static str) -> &'static str {
        match self {
            Button::Camera => "[Cam]",
            Button::Location => "[Loc]",
            Button::Mic if recording => "[Stop]",
            Button::Mic => "[Mic]",
            Button::Send => send_label,
        }
    }

    fn event(self) -> ComposerEvent {
        match self {
            Button::Camera => ComposerEvent::Camera,
            Button::Location => ComposerEvent::Location,
            Button::Mic => ComposerEvent::ToggleRecording,
            Button::Send => ComposerEvent::Submit,
        }
    }
}

/// Persistent editor state. Lives next to `MessageListState` in the screen.
#[derive(Debug, Default)]
pub struct ComposerState {
    cursor: CursorState,
    /// Editor area from the last render
    input_area: Rect,
    /// Button hit areas from the last render
    buttons: Vec<(Button, Rect)>,
}

impl ComposerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when `(column, row)` falls inside the composer's editor field.
    pub fn hits_input(&self, column: u16, row: u16) -> bool {
        self.input_area.contains(Position { x: column, y: row })
    }

    fn button_at(&self, column: u16, row: u16) -> Option<Button> {
        self.buttons
            .iter()
            .find(|(_, rect)| rect.contains(Position { x: column, y: row }))
            .map(|(button, _)| *button)
    }
}

/// Transient editor component wrapping the persistent `ComposerState`.
pub struct ComposerInput<'a> {
    pub state: &'a mut ComposerState,
    pub composer: &'a Composer,
    /// A start/stop request is still in flight
    pub recorder_busy: bool,
    /// Show the camera, location and microphone buttons
    pub media: bool,
    pub title: &'static str,
    pub placeholder: &'static str,
    pub send_label: &'static str,
}

impl<'a> ComposerInput<'a> {
    pub fn new(state: &'a mut ComposerState, composer: &'a Composer, recorder_busy: bool) -> Self {
        Self {
            state,
            composer,
            recorder_busy,
            media: true,
            title: "Message",
            placeholder: "Type a message...",
            send_label: "[Send]",
        }
    }

    /// Plain text field with a single submit button, for the goal screen.
    pub fn plain(
        state: &'a mut ComposerState,
        composer: &'a Composer,
        title: &'static str,
        placeholder: &'static str,
        send_label: &'static str,
    ) -> Self {
        Self {
            state,
            composer,
            recorder_busy: false,
            media: false,
            title,
            placeholder,
            send_label,
        }
    }

    fn draft(&self) -> &str {
        &self.composer.draft
    }

    fn edited(&mut self, text: String, pos: usize) -> Option<ComposerEvent> {
        self.state.cursor.pos = pos;
        Some(ComposerEvent::Changed(text))
    }

    fn toolbar_line(&self) -> (Line<'static>, Vec<(Button, u16, u16)>) {
        let recording = self.composer.is_recording();
        let mut spans = Vec::new();
        let mut spots = Vec::new();
        let mut x = 0u16;
        let buttons = Button::ALL
            .into_iter()
            .filter(|button| self.media || *button == Button::Send);
        for button in buttons {
            let label = button.label(recording, self.send_label);
            let style = match button {
                Button::Mic if recording => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                Button::Mic if self.recorder_busy => Style::default().fg(Color::DarkGray),
                Button::Send if !self.composer.can_submit() => {
                    Style::default().fg(Color::DarkGray)
                }
                _ => Style::default().fg(Color::Cyan),
            };
            let width = label.width() as u16;
            spots.push((button, x, width));
            spans.push(Span::styled(label, style));
            spans.push(Span::raw(" "));
            x += width + 1;
        }
        spans.pop();
        (Line::from(spans), spots)
    }
}

impl<'a> Component for ComposerInput<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let focused = self.composer.is_focused;
        let border_style = if focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let title = if self.composer.is_recording() {
            "Recording..."
        } else {
            self.title
        };
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title(title);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let (toolbar, spots) = self.toolbar_line();
        let toolbar_width = toolbar.width() as u16;
        let [input_area, _, toolbar_area] = Layout::horizontal([
            Constraint::Fill(1),
            Constraint::Length(1),
            Constraint::Length(toolbar_width),
        ])
        .areas(inner);

        self.state.input_area = input_area;
        self.state.buttons = spots
            .into_iter()
            .map(|(button, x, width)| {
                (button, Rect::new(toolbar_area.x + x, toolbar_area.y, width, 1))
            })
            .collect();
        frame.render_widget(Paragraph::new(toolbar), toolbar_area);

        let draft = self.composer.draft.as_str();
        self.state.cursor.clamp(draft);
        if draft.is_empty() && !focused {
            let placeholder = Paragraph::new(self.placeholder)
                .style(Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC));
            frame.render_widget(placeholder, input_area);
            return;
        }

        self.state.cursor.update_scroll(draft, input_area.width);
        let visible = self.state.cursor.visible(draft, input_area.width);
        frame.render_widget(
            Paragraph::new(visible).style(Style::default().fg(Color::Green)),
            input_area,
        );

        if focused {
            let column = self.state.cursor.screen_column(draft);
            frame.set_cursor_position((input_area.x.saturating_add(column), input_area.y));
        }
    }
}

impl<'a> EventHandler for ComposerInput<'a> {
    type Event = ComposerEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        self.state.cursor.clamp(&self.composer.draft);
        let pos = self.state.cursor.pos;

        match event {
            TuiEvent::InputChar(c) => {
                let mut text = self.draft().to_string();
                text.insert(pos, *c);
                self.edited(text, pos + c.len_utf8())
            }
            TuiEvent::Paste(pasted) => {
                // Single-line editor
                let pasted = pasted.replace(['\r', '\n'], " ");
                let mut text = self.draft().to_string();
                text.insert_str(pos, &pasted);
                self.edited(text, pos + pasted.len())
            }
            TuiEvent::Backspace if pos > 0 => {
                let prev = prev_char_boundary(self.draft(), pos);
                let mut text = self.draft().to_string();
                text.drain(prev..pos);
                self.edited(text, prev)
            }
            TuiEvent::Delete if pos < self.draft().len() => {
                let next = next_char_boundary(self.draft(), pos);
                let mut text = self.draft().to_string();
                text.drain(pos..next);
                self.edited(text, pos)
            }
            TuiEvent::CursorLeft => {
                self.state.cursor.pos = prev_char_boundary(self.draft(), pos);
                None
            }
            TuiEvent::CursorRight => {
                self.state.cursor.pos = next_char_boundary(self.draft(), pos);
                None
            }
            TuiEvent::CursorHome => {
                self.state.cursor.pos = 0;
                None
            }
            TuiEvent::CursorEnd => {
                self.state.cursor.pos = self.draft().len();
                None
            }
            TuiEvent::Submit => Some(ComposerEvent::Submit),
            TuiEvent::Camera if self.media => Some(ComposerEvent::Camera),
            TuiEvent::Location if self.media => Some(ComposerEvent::Location),
            TuiEvent::Record if self.media => Some(ComposerEvent::ToggleRecording),
            TuiEvent::MouseClick(column, row) => {
                if let Some(button) = self.state.button_at(*column, *row) {
                    return Some(button.event());
                }
                if self.state.hits_input(*column, *row) {
                    let offset = usize::from(column - self.state.input_area.x)
                        .saturating_add(self.state.cursor.scroll);
                    self.state.cursor.pos = byte_at_column(self.draft(), offset);
                    return Some(ComposerEvent::Focused);
                }
                None
            }
            _ => None,
        }
    }
}

/// Byte offset of the char boundary closest to display column `column`.
fn byte_at_column(text: &str, column: usize) -> usize {
    let mut width = 0usize;
    for (i, c) in text.char_indices() {
        if width >= column {
            return i;
        }
        width += unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
    }
    text.len()
}
