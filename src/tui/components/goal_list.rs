//! # GoalList Component
//!
//! The whole goal screen: navbar, "New goal" field, the goal rows with their
//! delete buttons, the three "Show Modal" buttons and the props modal.
//!
//! `GoalList` is transient and wraps `&mut GoalListState` (selection, modal
//! animation clock, hit areas) plus the `GoalBoard` (props). Everything the
//! user does comes out as a `GoalEvent`; the screen applies it to the board.

use std::time::{Duration, Instant};

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Clear, Paragraph, Row, Table};

use crate::core::goals::{GoalBoard, MODAL_PROPS, ModalAnimation};
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::composer::{self, ComposerEvent, ComposerInput, ComposerState};
use crate::tui::event::TuiEvent;

/// How long the slide and fade animations run.
pub const MODAL_ANIMATION: Duration = Duration::from_millis(300);

const NAVBAR_BG: Color = Color::Rgb(0x62, 0x00, 0xee);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GoalEvent {
    Changed(String),
    Add,
    Focus(bool),
    Delete(String),
    ShowModal(ModalAnimation),
    CloseModal,
}

#[derive(Default)]
pub struct GoalListState {
    pub input: ComposerState,
    /// Selected row when the list has focus
    pub selected: Option<usize>,
    /// First visible row
    offset: usize,
    /// When the current modal started animating in
    modal_opened_at: Option<Instant>,
    delete_buttons: Vec<(String, Rect)>,
    modal_buttons: Vec<(ModalAnimation, Rect)>,
    close_button: Rect,
}

impl GoalListState {
    pub fn new() -> Self {
        Self::default()
    }

    /// True while the modal is still moving in and needs fast redraws.
    pub fn is_animating(&self, now: Instant) -> bool {
        self.modal_opened_at
            .is_some_and(|opened| now.duration_since(opened) < MODAL_ANIMATION)
    }
}

pub struct GoalList<'a> {
    pub state: &'a mut GoalListState,
    pub board: &'a GoalBoard,
    pub now: Instant,
}

impl<'a> GoalList<'a> {
    pub fn new(state: &'a mut GoalListState, board: &'a GoalBoard, now: Instant) -> Self {
        Self { state, board, now }
    }

    fn render_navbar(&self, frame: &mut Frame, area: Rect) {
        let style = Style::default().bg(NAVBAR_BG).fg(Color::White);
        frame.render_widget(Block::default().style(style), area);
        let [title, icon] =
            Layout::horizontal([Constraint::Fill(1), Constraint::Length(3)]).areas(area);
        frame.render_widget(
            Paragraph::new(" Goal List").style(style.add_modifier(Modifier::BOLD)),
            title,
        );
        frame.render_widget(Paragraph::new("☺").style(style), icon);
    }

    fn render_goals(&mut self, frame: &mut Frame, area: Rect) {
        let goals = &self.board.goals;
        self.state.delete_buttons.clear();

        if let Some(selected) = self.state.selected {
            let height = area.height as usize;
            if selected < self.state.offset {
                self.state.offset = selected;
            } else if height > 0 && selected >= self.state.offset + height {
                self.state.offset = selected + 1 - height;
            }
        }
        self.state.offset = self.state.offset.min(goals.len().saturating_sub(1));

        let list_focused = !self.board.input.is_focused;
        for (row, (i, goal)) in goals
            .iter()
            .enumerate()
            .skip(self.state.offset)
            .take(area.height as usize)
            .enumerate()
        {
            let row_area = Rect::new(area.x, area.y + row as u16, area.width, 1);
            let [label_area, delete_area] =
                Layout::horizontal([Constraint::Fill(1), Constraint::Length(8)]).areas(row_area);

            let is_selected = list_focused && self.state.selected == Some(i);
            let style = if is_selected {
                Style::default().fg(Color::Black).bg(Color::Cyan)
            } else {
                Style::default()
            };
            frame.render_widget(
                Paragraph::new(format!(" {}", goal.value)).style(style),
                label_area,
            );
            frame.render_widget(
                Paragraph::new("[Delete]").style(Style::default().fg(Color::Red)),
                delete_area,
            );
            self.state.delete_buttons.push((goal.id.clone(), delete_area));
        }
    }

    fn render_modal_buttons(&mut self, frame: &mut Frame, area: Rect) {
        let animations = [ModalAnimation::Slide, ModalAnimation::Fade, ModalAnimation::None];
        let areas: [Rect; 3] = Layout::horizontal([Constraint::Fill(1); 3]).areas(area);
        self.state.modal_buttons.clear();
        for (n, (animation, button_area)) in animations.into_iter().zip(areas).enumerate() {
            let label = Line::from(vec![
                Span::styled(
                    format!("F{} ", n + 1),
                    Style::default().fg(Color::Black).bg(Color::Cyan),
                ),
                Span::styled(
                    format!(" Show Modal ({})", animation.label()),
                    Style::default().fg(Color::Cyan),
                ),
            ]);
            frame.render_widget(
                Paragraph::new(label).alignment(Alignment::Center),
                button_area,
            );
            self.state.modal_buttons.push((animation, button_area));
        }
    }

    fn modal_progress(&mut self, animation: ModalAnimation) -> f32 {
        let opened = *self.state.modal_opened_at.get_or_insert(self.now);
        if animation == ModalAnimation::None {
            return 1.0;
        }
        let elapsed = self.now.saturating_duration_since(opened);
        (elapsed.as_secs_f32() / MODAL_ANIMATION.as_secs_f32()).min(1.0)
    }
}

impl<'a> Component for GoalList<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let [navbar, _, input, list, buttons] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(composer::HEIGHT),
            Constraint::Fill(1),
            Constraint::Length(1),
        ])
        .areas(area);

        self.render_navbar(frame, navbar);
        ComposerInput::plain(
            &mut self.state.input,
            &self.board.input,
            "Goal",
            "New goal",
            "[Add]",
        )
        .render(frame, input);
        self.render_goals(frame, list);
        self.render_modal_buttons(frame, buttons);

        match self.board.modal {
            Some(animation) => {
                let progress = self.modal_progress(animation);
                let mut modal = PropsModal {
                    animation,
                    progress,
                    close_button: Rect::default(),
                };
                modal.render(frame, area);
                self.state.close_button = modal.close_button;
            }
            None => {
                self.state.modal_opened_at = None;
                self.state.close_button = Rect::default();
            }
        }
    }
}

impl<'a> EventHandler for GoalList<'a> {
    type Event = GoalEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        if self.board.modal.is_some() {
            return match event {
                TuiEvent::Submit => Some(GoalEvent::CloseModal),
                TuiEvent::MouseClick(x, y)
                    if self.state.close_button.contains(Position { x: *x, y: *y }) =>
                {
                    Some(GoalEvent::CloseModal)
                }
                _ => None,
            };
        }

        match event {
            TuiEvent::ShowModal(animation) => return Some(GoalEvent::ShowModal(*animation)),
            TuiEvent::ToggleFocus => return Some(GoalEvent::Focus(!self.board.input.is_focused)),
            TuiEvent::MouseClick(x, y) => {
                let position = Position { x: *x, y: *y };
                if let Some((id, _)) = self
                    .state
                    .delete_buttons
                    .iter()
                    .find(|(_, rect)| rect.contains(position))
                {
                    return Some(GoalEvent::Delete(id.clone()));
                }
                if let Some((animation, _)) = self
                    .state
                    .modal_buttons
                    .iter()
                    .find(|(_, rect)| rect.contains(position))
                {
                    return Some(GoalEvent::ShowModal(*animation));
                }
            }
            _ => {}
        }

        if self.board.input.is_focused || matches!(event, TuiEvent::MouseClick(..)) {
            let mut input = ComposerInput::plain(
                &mut self.state.input,
                &self.board.input,
                "Goal",
                "New goal",
                "[Add]",
            );
            return match input.handle_event(event)? {
                ComposerEvent::Changed(text) => Some(GoalEvent::Changed(text)),
                ComposerEvent::Submit => Some(GoalEvent::Add),
                ComposerEvent::Focused => Some(GoalEvent::Focus(true)),
                _ => None,
            };
        }

        let count = self.board.goals.len();
        match event {
            TuiEvent::CursorUp if count > 0 => {
                self.state.selected = Some(self.state.selected.map_or(0, |i| i.saturating_sub(1)));
                None
            }
            TuiEvent::CursorDown if count > 0 => {
                self.state.selected =
                    Some(self.state.selected.map_or(0, |i| (i + 1).min(count - 1)));
                None
            }
            TuiEvent::Delete | TuiEvent::InputChar('d') => {
                let goal = self.board.goals.get(self.state.selected?)?;
                Some(GoalEvent::Delete(goal.id.clone()))
            }
            TuiEvent::Submit | TuiEvent::InputChar(_) => Some(GoalEvent::Focus(true)),
            _ => None,
        }
    }
}

/// The "Modal Props Table" sheet.
///
/// `progress` runs from 0.0 to 1.0 over the entrance animation: `slide`
/// moves the sheet up from the bottom edge, `fade` brings the text up from
/// dim, `none` is always drawn at 1.0.
pub struct PropsModal {
    pub animation: ModalAnimation,
    pub progress: f32,
    /// Hit area of the close button, filled in by `render`
    pub close_button: Rect,
}

impl PropsModal {
    fn sheet(&self, area: Rect) -> Rect {
        match self.animation {
            ModalAnimation::Slide => {
                let hidden = (area.height as f32 * (1.0 - self.progress)).round() as u16;
                Rect {
                    y: area.y + hidden,
                    height: area.height - hidden,
                    ..area
                }
            }
            ModalAnimation::Fade | ModalAnimation::None => area,
        }
    }

    fn text_style(&self) -> Style {
        match self.animation {
            ModalAnimation::Fade if self.progress < 0.5 => Style::default().fg(Color::DarkGray),
            ModalAnimation::Fade if self.progress < 1.0 => {
                Style::default().fg(Color::Gray).add_modifier(Modifier::DIM)
            }
            _ => Style::default(),
        }
    }
}

impl Component for PropsModal {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let sheet = self.sheet(area);
        frame.render_widget(Clear, sheet);
        if sheet.height < 3 {
            self.close_button = Rect::default();
            return;
        }

        let style = self.text_style();
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .title(Span::styled(
                " Modal Props Table ",
                style.add_modifier(Modifier::BOLD),
            ))
            .border_style(style);
        let inner = block.inner(sheet);
        frame.render_widget(block, sheet);

        let [table_area, close_area] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(inner);

        let header = Row::new(["Prop", "Description", "Syntax"])
            .style(style.add_modifier(Modifier::BOLD))
            .bottom_margin(1);
        let rows = MODAL_PROPS
            .iter()
            .map(|row| Row::new([row.prop, row.description, row.syntax]).style(style));
        let table = Table::new(
            rows,
            [
                Constraint::Percentage(25),
                Constraint::Percentage(40),
                Constraint::Percentage(35),
            ],
        )
        .header(header)
        .column_spacing(1);
        frame.render_widget(table, table_area);

        let label = "[Close Modal]";
        let width = label.len() as u16;
        self.close_button = Rect::new(
            close_area.x + close_area.width.saturating_sub(width) / 2,
            close_area.y,
            width.min(close_area.width),
            close_area.height,
        );
        frame.render_widget(
            Paragraph::new(label).style(style.fg(Color::Cyan)),
            self.close_button,
        );
    }
}
