//! Fullscreen and modal surfaces drawn over the messaging screen.
//!
//! - [`Fullscreen`]: image or map view of a single message
//! - [`Dialog`]: centered box for the delete confirmation and alerts
//!
//! All of them clear what's underneath before drawing.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Clear, Padding, Paragraph, Wrap};

use crate::core::message::Message;
use crate::core::state::Alert;
use crate::tui::component::Component;

pub const DELETE_TITLE: &str = "Delete Message";
pub const DELETE_BODY: &str = "Are you sure you want to delete this message?";

/// Image or map view covering the whole screen.
pub struct Fullscreen<'a> {
    pub message: &'a Message,
}

impl<'a> Fullscreen<'a> {
    pub fn new(message: &'a Message) -> Self {
        Self { message }
    }

    fn body(&self, height: u16) -> Vec<Line<'static>> {
        let pad = height.saturating_sub(3) / 2;
        let mut lines: Vec<Line<'static>> = (0..pad).map(|_| Line::default()).collect();
        match self.message {
            Message::Image { uri, .. } => {
                lines.push(Line::styled(
                    "▣",
                    Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
                ));
                lines.push(Line::default());
                lines.push(Line::raw(uri.clone()));
            }
            Message::Location { coordinate, .. } => {
                lines.push(Line::styled(
                    "◉",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ));
                lines.push(Line::default());
                lines.push(Line::raw(coordinate.to_string()));
            }
            // Only images and locations open fullscreen
            Message::Text { .. } | Message::Audio { .. } => {}
        }
        lines
    }
}

impl<'a> Component for Fullscreen<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let title = match self.message {
            Message::Location { .. } => " Map ",
            _ => " Image ",
        };
        let block = Block::bordered()
            .border_type(BorderType::Thick)
            .title(title)
            .title_top(Line::from(" ✕ Close (Esc) ").right_aligned())
            .border_style(Style::default().fg(Color::White));
        let inner = block.inner(area);

        frame.render_widget(Clear, area);
        frame.render_widget(block, area);
        frame.render_widget(
            Paragraph::new(self.body(inner.height))
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true }),
            inner,
        );
    }
}

/// Centered dialog with a title, body and a row of key hints.
pub struct Dialog<'a> {
    pub title: &'a str,
    pub body: &'a str,
    pub hints: &'a [(&'a str, &'a str)],
    pub accent: Color,
}

impl<'a> Dialog<'a> {
    pub fn confirm_delete() -> Self {
        Self {
            title: DELETE_TITLE,
            body: DELETE_BODY,
            hints: &[("Esc/n", "Cancel"), ("Enter/y", "Delete")],
            accent: Color::Red,
        }
    }

    pub fn alert(alert: &'a Alert) -> Self {
        Self {
            title: &alert.title,
            body: &alert.body,
            hints: &[("Enter", "OK")],
            accent: Color::Yellow,
        }
    }
}

impl<'a> Component for Dialog<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let dialog = centered_rect(60, 40, area);
        frame.render_widget(Clear, dialog);

        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(self.accent))
            .title(Span::styled(
                format!(" {} ", self.title),
                Style::default().fg(self.accent).add_modifier(Modifier::BOLD),
            ))
            .padding(Padding::uniform(1));
        let inner = block.inner(dialog);
        frame.render_widget(block, dialog);

        let [body_area, hint_area] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(inner);

        frame.render_widget(
            Paragraph::new(self.body).wrap(Wrap { trim: true }),
            body_area,
        );

        let mut spans = Vec::new();
        for (key, label) in self.hints {
            spans.push(Span::styled(
                format!(" {key} "),
                Style::default().fg(Color::Black).bg(self.accent),
            ));
            spans.push(Span::raw(format!(" {label}  ")));
        }
        frame.render_widget(Line::from(spans).right_aligned(), hint_area);
    }
}

/// A `percent_x` by `percent_y` rect centered in `outer`.
pub fn centered_rect(percent_x: u16, percent_y: u16, outer: Rect) -> Rect {
    let [_, center_v, _] = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .areas(outer);
    let [_, center, _] = Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .areas(center_v);
    center
}
