use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Padding, Paragraph, Widget, Wrap};

use crate::core::message::Message;
use crate::tui::component::Component;

/// Horizontal padding (per side) between the border and text content.
const CONTENT_PAD_H: u16 = 1;
/// Total horizontal space consumed by borders (1 left + 1 right) and padding.
const HORIZONTAL_OVERHEAD: u16 = 2 + CONTENT_PAD_H * 2;
/// Total vertical space consumed by borders (1 top + 1 bottom).
const VERTICAL_OVERHEAD: u16 = 2;
/// Bubbles hug the right edge; this fraction of the row stays empty on the left.
const GUTTER_DIVISOR: u16 = 5;

/// A single chat bubble.
///
/// Transient: built each frame by `MessageList` with the selection flag it
/// tracks. Each message kind gets its own title and color; selection turns
/// the border cyan and bold.
#[derive(Clone, Copy)]
pub struct Bubble<'a> {
    pub message: &'a Message,
    pub is_selected: bool,
}

impl<'a> Bubble<'a> {
    pub fn new(message: &'a Message, is_selected: bool) -> Self {
        Self {
            message,
            is_selected,
        }
    }

    /// Text shown inside the bubble.
    pub fn body(message: &Message) -> String {
        match message {
            Message::Text { text, .. } => text.trim().to_string(),
            Message::Image { uri, .. } => format!("[image] {uri}"),
            Message::Location { coordinate, .. } => format!("[map] {coordinate}"),
            Message::Audio { audio_uri, .. } => {
                let name = audio_uri.rsplit('/').next().unwrap_or(audio_uri);
                format!("▶ Voice message ({name})")
            }
        }
    }

    fn title(message: &Message) -> &'static str {
        match message {
            Message::Text { .. } => "you",
            Message::Image { .. } => "image",
            Message::Location { .. } => "location",
            Message::Audio { .. } => "audio",
        }
    }

    fn style(message: &Message) -> Style {
        match message {
            Message::Text { .. } => Style::default().fg(Color::Green),
            Message::Image { .. } => Style::default().fg(Color::Magenta),
            Message::Location { .. } => Style::default().fg(Color::Yellow),
            Message::Audio { .. } => Style::default().fg(Color::Blue),
        }
    }

    /// Width of the bubble inside a row of `row_width` columns.
    pub fn bubble_width(row_width: u16) -> u16 {
        row_width.saturating_sub(row_width / GUTTER_DIVISOR)
    }

    /// Rows this message needs in a list of `row_width` columns.
    ///
    /// Wrapping options match `Paragraph` with `Wrap { trim: true }` so the
    /// list can lay out rows without rendering them first.
    pub fn calculate_height(message: &Message, row_width: u16) -> u16 {
        let content_width = Self::bubble_width(row_width).saturating_sub(HORIZONTAL_OVERHEAD);
        if content_width == 0 {
            return 1;
        }

        let body = Self::body(message);
        if body.is_empty() {
            return VERTICAL_OVERHEAD;
        }

        let options = textwrap::Options::new(content_width as usize)
            .break_words(true)
            .word_separator(textwrap::WordSeparator::AsciiSpace);

        let lines = textwrap::wrap(&body, options);
        u16::try_from(lines.len())
            .unwrap_or(u16::MAX)
            .max(1)
            .saturating_add(VERTICAL_OVERHEAD)
    }
}

impl<'a> Widget for Bubble<'a> {
    fn render(self, area: Rect, buf: &mut ratatui::buffer::Buffer) {
        let width = Self::bubble_width(area.width);
        let area = Rect {
            x: area.x + area.width - width,
            width,
            ..area
        };

        let style = Self::style(self.message);
        let border_style = if self.is_selected {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            style.add_modifier(Modifier::DIM)
        };

        let block = Block::bordered()
            .title(Self::title(self.message))
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title_style(border_style)
            .padding(Padding::horizontal(CONTENT_PAD_H));

        let inner_area = block.inner(area);
        block.render(area, buf);

        Paragraph::new(Self::body(self.message))
            .style(style)
            .wrap(Wrap { trim: true })
            .render(inner_area, buf);
    }
}

impl<'a> Component for Bubble<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(*self, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::message::Coordinate;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    #[test]
    fn calculate_height_single_line() {
        let message = Message::text("Hello");
        assert_eq!(Bubble::calculate_height(&message, 80), 1 + VERTICAL_OVERHEAD);
    }

    #[test]
    fn calculate_height_wraps_long_text() {
        // Row 15 → bubble 12 → content 8
        let message = Message::text("Hello there world");
        assert_eq!(Bubble::calculate_height(&message, 15), 3 + VERTICAL_OVERHEAD);
    }

    #[test]
    fn calculate_height_degenerate_width() {
        let message = Message::text("Hello");
        assert_eq!(Bubble::calculate_height(&message, 3), 1);
    }

    #[test]
    fn body_per_kind() {
        let location = Message::location(Coordinate {
            latitude: 37.5,
            longitude: -122.25,
        });
        assert_eq!(Bubble::body(&location), "[map] 37.5000, -122.2500");
        assert_eq!(
            Bubble::body(&Message::audio("file:///tmp/rec-1.wav")),
            "▶ Voice message (rec-1.wav)"
        );
        assert_eq!(Bubble::body(&Message::text("  hi  ")), "hi");
    }

    #[test]
    fn renders_right_aligned_with_title() {
        let backend = TestBackend::new(20, 3);
        let mut terminal = Terminal::new(backend).unwrap();
        let message = Message::text("Hi");

        terminal
            .draw(|f| {
                let mut bubble = Bubble::new(&message, false);
                Component::render(&mut bubble, f, f.area());
            })
            .unwrap();

        let buffer = terminal.backend().buffer();
        // Gutter is 20 / 5 = 4 columns
        assert_eq!(buffer[(0, 0)].symbol(), " ");
        assert_eq!(buffer[(4, 0)].symbol(), "╭");
        let top: String = (0..20).map(|x| buffer[(x, 0)].symbol()).collect();
        assert!(top.contains("you"));
    }
}
