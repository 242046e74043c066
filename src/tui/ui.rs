//! Screen layouts. Each `draw_*` function lays out one screen and renders
//! its components, then stacks any overlay or dialog on top.

use std::time::Instant;

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::core::goals::GoalBoard;
use crate::core::state::App;
use crate::tui::MessagingView;
use crate::tui::component::Component;
use crate::tui::components::composer::{self, ComposerInput};
use crate::tui::components::goal_list::{GoalList, GoalListState};
use crate::tui::components::message_list::MessageList;
use crate::tui::components::overlay::{Dialog, Fullscreen};
use crate::tui::components::status_bar::StatusBar;

const MESSAGING_HINTS: &[(&str, &str)] = &[
    ("Tab", "focus"),
    ("Enter", "send/open"),
    ("d", "delete (list)"),
    ("^P", "camera"),
    ("^L", "location"),
    ("^R", "record"),
    ("Esc", "back"),
];

const GOAL_HINTS: &[(&str, &str)] = &[
    ("Tab", "focus"),
    ("Enter", "add"),
    ("d", "delete (list)"),
    ("F1-F3", "modal"),
    ("Esc", "back"),
];

fn hint_line(hints: &[(&'static str, &'static str)]) -> Line<'static> {
    let mut spans = Vec::with_capacity(hints.len() * 2);
    for (key, label) in hints {
        spans.push(Span::styled(*key, Style::default().fg(Color::Cyan)));
        spans.push(Span::styled(
            format!(" {label}  "),
            Style::default().fg(Color::DarkGray),
        ));
    }
    Line::from(spans)
}

pub fn draw_messaging(frame: &mut Frame, app: &App, view: &mut MessagingView, now: Instant) {
    use Constraint::{Fill, Length};
    let [status_area, list_area, composer_area, hint_area] =
        Layout::vertical([Length(1), Fill(1), Length(composer::HEIGHT), Length(1)])
            .areas(frame.area());

    StatusBar::new(&app.banner, app.banner.is_visible(now), &app.status_message)
        .render(frame, status_area);
    MessageList::new(&mut view.message_list, &app.store).render(frame, list_area);
    ComposerInput::new(&mut view.composer, &app.composer, app.pending.recording)
        .render(frame, composer_area);
    frame.render_widget(hint_line(MESSAGING_HINTS), hint_area);

    if let Some(message) = app.overlay_message() {
        Fullscreen::new(message).render(frame, frame.area());
    }
    if app.confirm_delete.is_some() {
        Dialog::confirm_delete().render(frame, frame.area());
    }
    if let Some(alert) = &app.alert {
        Dialog::alert(alert).render(frame, frame.area());
    }
}

pub fn draw_goals(frame: &mut Frame, board: &GoalBoard, state: &mut GoalListState, now: Instant) {
    let [main_area, hint_area] =
        Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(frame.area());

    GoalList::new(state, board, now).render(frame, main_area);
    frame.render_widget(hint_line(GOAL_HINTS), hint_area);

    if let Some(alert) = &board.alert {
        Dialog::alert(alert).render(frame, frame.area());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::action::{Action, update};
    use crate::core::state::Alert;
    use crate::test_support::test_app;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn messaging_layout_has_all_regions() {
        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        let app = test_app();
        let mut view = MessagingView::new();

        terminal
            .draw(|f| draw_messaging(f, &app, &mut view, Instant::now()))
            .unwrap();

        let text = screen_text(&terminal);
        assert!(text.contains("Bubbles | Type something!"));
        assert!(text.contains("World"));
        assert!(text.contains("[Cam] [Loc] [Mic] [Send]"));
        assert!(text.contains("^R record"));
        // 'd' only deletes while the list has focus; in the composer it types
        assert!(text.contains("d delete (list)"));
    }

    #[test]
    fn confirm_prompt_drawn_over_list() {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        let mut app = test_app();
        let id = app.store.get(2).unwrap().id().clone();
        update(&mut app, Action::LongPressMessage(id));
        let mut view = MessagingView::new();

        terminal
            .draw(|f| draw_messaging(f, &app, &mut view, Instant::now()))
            .unwrap();

        let text = screen_text(&terminal);
        assert!(text.contains("Delete Message"));
        assert!(text.contains("Are you sure you want to delete this message?"));
    }

    #[test]
    fn image_overlay_covers_screen() {
        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
        let mut app = test_app();
        let id = app.store.get(0).unwrap().id().clone();
        update(&mut app, Action::PressMessage(id));
        let mut view = MessagingView::new();

        terminal
            .draw(|f| draw_messaging(f, &app, &mut view, Instant::now()))
            .unwrap();

        let text = screen_text(&terminal);
        assert!(text.contains("Close (Esc)"));
        assert!(!text.contains("World"));
    }

    #[test]
    fn goal_alert_drawn_on_top() {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        let mut board = GoalBoard::new();
        board.alert = Some(Alert::new("Invalid input", "Please enter a goal."));
        let mut state = GoalListState::new();

        terminal
            .draw(|f| draw_goals(f, &board, &mut state, Instant::now()))
            .unwrap();

        let text = screen_text(&terminal);
        assert!(text.contains("Invalid input"));
        assert!(text.contains("Please enter a goal."));
        assert!(text.contains("F1-F3 modal"));
    }
}
