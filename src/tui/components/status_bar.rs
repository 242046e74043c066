//! # StatusBar Component
//!
//! Top line of the messaging screen.
//!
//! Normally shows the app name, the last status message and a small
//! connectivity dot colored by the last known state. While the connectivity
//! banner is visible the whole line turns into the banner instead
//! ("Connected" on green, "No network connection" on red).
//!
//! Purely presentational: the screen decides whether the banner is visible
//! at render time and passes the result in as props.

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::core::status::StatusBanner;
use crate::tui::component::Component;

pub struct StatusBar<'a> {
    /// Last known connectivity (`None` until the first report)
    pub connected: Option<bool>,
    /// Banner text, present only while the banner is showing
    pub banner: Option<&'a str>,
    pub status_message: &'a str,
}

impl<'a> StatusBar<'a> {
    pub fn new(banner: &'a StatusBanner, banner_visible: bool, status_message: &'a str) -> Self {
        Self {
            connected: banner.connected,
            banner: banner_visible.then(|| banner.label()),
            status_message,
        }
    }

    fn color(&self) -> Color {
        match self.connected {
            Some(true) => Color::Green,
            Some(false) => Color::Red,
            None => Color::DarkGray,
        }
    }
}

impl<'a> Component for StatusBar<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        if let Some(banner) = self.banner {
            let line = Paragraph::new(banner)
                .alignment(Alignment::Center)
                .style(
                    Style::default()
                        .bg(self.color())
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                );
            frame.render_widget(line, area);
            return;
        }

        let mut spans = vec![
            Span::styled("●", Style::default().fg(self.color())),
            Span::raw(" Bubbles"),
        ];
        if !self.status_message.is_empty() {
            spans.push(Span::styled(
                format!(" | {}", self.status_message),
                Style::default().fg(Color::DarkGray),
            ));
        }
        frame.render_widget(Line::from(spans), area);
    }
}
