//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the screens,
//! and translates terminal events into `core::Action` values (messaging) or
//! goal board calls (goal list).
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Event Loop
//!
//! - Terminal events are polled with a timeout and drained in batches before
//!   the next draw.
//! - Capability calls (location, recorder, player) run on tokio tasks and
//!   report back as `Action`s over an `mpsc` channel, so `update()` stays the
//!   only writer of `App`.
//! - Idle screens sleep up to 500ms between polls. The messaging screen wakes
//!   early when the connectivity banner is due to fade; the goal screen polls
//!   fast while the modal animates in.

mod component;
mod components;
mod event;
mod ui;

use std::future::Future;
use std::io::stdout;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::cursor::{SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
};
use crossterm::execute;
use log::{debug, info, warn};
use ratatui::DefaultTerminal;

use crate::Screen;
use crate::core::action::{Action, Effect, update};
use crate::core::config::ResolvedConfig;
use crate::core::goals::GoalBoard;
use crate::core::state::App;
use crate::platform::{self, Platform, desktop};
use crate::tui::component::EventHandler;
use crate::tui::components::composer::{ComposerEvent, ComposerInput, ComposerState};
use crate::tui::components::goal_list::{GoalEvent, GoalList, GoalListState};
use crate::tui::components::message_list::{MessageListEvent, MessageListState};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

const IDLE_POLL: Duration = Duration::from_millis(500);
const ANIMATION_POLL: Duration = Duration::from_millis(16);

/// Presentation state of the messaging screen (not part of `App`).
#[derive(Default)]
pub struct MessagingView {
    pub message_list: MessageListState,
    pub composer: ComposerState,
}

impl MessagingView {
    pub fn new() -> Self {
        Self::default()
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,
            SetCursorStyle::SteadyBlock
        )?;
        info!("Terminal modes enabled (mouse, bracketed paste, steady block cursor)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), DisableMouseCapture, DisableBracketedPaste);
    }
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let mut terminal = ratatui::init();
    let terminal_mode_guard = match TerminalModeGuard::new() {
        Ok(guard) => Some(guard),
        Err(e) => {
            warn!("Could not enable terminal modes: {}", e);
            None
        }
    };

    info!("Opening {:?} screen", config.screen);
    let result = match config.screen {
        Screen::Messaging => run_messaging(&mut terminal, &config),
        Screen::Goals => run_goals(&mut terminal),
    };

    drop(terminal_mode_guard);
    ratatui::restore();
    result
}

fn run_messaging(terminal: &mut DefaultTerminal, config: &ResolvedConfig) -> std::io::Result<()> {
    let platform = desktop::from_config(config);
    let mut app = App::new(config.seed.clone(), config.banner_window);
    let mut view = MessagingView::new();

    // Channel for actions from background tasks
    let (tx, rx) = mpsc::channel();

    // Also unsubscribes on drop if the loop bails out early
    let listener_tx = tx.clone();
    let connectivity = platform.connectivity.subscribe(Box::new(move |connected| {
        let action = Action::ConnectivityChanged {
            connected,
            at: Instant::now(),
        };
        if listener_tx.send(action).is_err() {
            warn!("Connectivity change dropped: receiver gone");
        }
    }));

    let mut needs_redraw = true;
    let mut banner_drawn = false;

    loop {
        let now = Instant::now();
        if app.banner.is_visible(now) != banner_drawn {
            needs_redraw = true;
        }
        if needs_redraw {
            banner_drawn = app.banner.is_visible(now);
            terminal.draw(|f| ui::draw_messaging(f, &app, &mut view, now))?;
            needs_redraw = false;
        }

        let timeout = app
            .banner
            .remaining(now)
            .map_or(IDLE_POLL, |left| left.min(IDLE_POLL));
        let first_event = poll_event_timeout(timeout);
        if first_event.is_some() {
            needs_redraw = true;
        }

        let mut should_quit = false;
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            for action in route_messaging(&app, &mut view, &event) {
                if dispatch(&mut app, action, &platform, &tx) {
                    should_quit = true;
                }
            }
        }
        if should_quit {
            break;
        }

        // Results of capability calls and connectivity changes
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            if dispatch(&mut app, action, &platform, &tx) {
                should_quit = true;
            }
        }
        if should_quit {
            break;
        }
    }

    connectivity.unsubscribe();
    info!("Messaging screen closed with {} messages", app.store.len());
    Ok(())
}

/// Apply an action and start whatever effect it asks for.
/// Returns true when the screen should close.
fn dispatch(app: &mut App, action: Action, platform: &Platform, tx: &mpsc::Sender<Action>) -> bool {
    execute_effect(update(app, action), platform, tx)
}

fn execute_effect(effect: Effect, platform: &Platform, tx: &mpsc::Sender<Action>) -> bool {
    match effect {
        Effect::None => {}
        Effect::Quit => return true,
        Effect::RequestLocation => {
            let platform = platform.clone();
            spawn_capability(tx, async move {
                Action::LocationResolved(platform::fetch_location(&platform).await)
            });
        }
        Effect::StartRecording => {
            let platform = platform.clone();
            spawn_capability(tx, async move {
                Action::RecordingStarted(platform::start_recording(&platform).await)
            });
        }
        Effect::StopRecording => {
            let recorder = platform.recorder.clone();
            spawn_capability(tx, async move { Action::RecordingFinished(recorder.stop().await) });
        }
        Effect::PlayAudio(uri) => {
            info!("Playing {}", uri);
            let player = platform.player.clone();
            spawn_capability(tx, async move { Action::PlaybackFinished(player.play(&uri).await) });
        }
    }
    false
}

/// Run a capability call on the runtime and feed its result back to the loop.
fn spawn_capability<F>(tx: &mpsc::Sender<Action>, task: F)
where
    F: Future<Output = Action> + Send + 'static,
{
    let tx = tx.clone();
    tokio::spawn(async move {
        let action = task.await;
        if tx.send(action).is_err() {
            warn!("Capability result dropped: receiver gone");
        }
    });
}

/// Translate one terminal event on the messaging screen into actions.
///
/// Modal surfaces swallow input innermost first: alert, then the delete
/// prompt, then the fullscreen overlay. Esc always maps to `Back`, which
/// unwinds them in the same order.
fn route_messaging(app: &App, view: &mut MessagingView, event: &TuiEvent) -> Vec<Action> {
    match event {
        TuiEvent::ForceQuit => return vec![Action::Quit],
        TuiEvent::Escape => return vec![Action::Back],
        TuiEvent::Resize | TuiEvent::MouseMove(..) => return Vec::new(),
        _ => {}
    }

    if app.is_modal() {
        return modal_action(app, event).into_iter().collect();
    }

    match event {
        TuiEvent::ToggleFocus => return vec![Action::FocusChanged(!app.composer.is_focused)],
        TuiEvent::Camera => return vec![Action::PressCamera],
        TuiEvent::Location => return vec![Action::PressLocation],
        TuiEvent::Record => return vec![Action::ToggleRecording],
        TuiEvent::ScrollUp | TuiEvent::ScrollDown => {
            view.message_list.handle_event(event);
            return Vec::new();
        }
        TuiEvent::MouseClick(column, row) | TuiEvent::MouseRightClick(column, row)
            if !view.message_list.viewport.contains((*column, *row).into()) =>
        {
            return composer_actions(app, view, event);
        }
        TuiEvent::MouseClick(..) | TuiEvent::MouseRightClick(..) => {
            let mut actions = Vec::new();
            if app.composer.is_focused {
                actions.push(Action::FocusChanged(false));
            }
            actions.extend(list_action(view, event));
            return actions;
        }
        _ => {}
    }

    if app.composer.is_focused {
        return composer_actions(app, view, event);
    }

    match event {
        // Typing while the list has focus moves into the composer
        TuiEvent::InputChar(c) if *c != 'd' => {
            let mut actions = vec![Action::FocusChanged(true)];
            actions.extend(composer_actions(app, view, event));
            actions
        }
        TuiEvent::Paste(_) => {
            let mut actions = vec![Action::FocusChanged(true)];
            actions.extend(composer_actions(app, view, event));
            actions
        }
        _ => list_action(view, event).into_iter().collect(),
    }
}

fn modal_action(app: &App, event: &TuiEvent) -> Option<Action> {
    if app.alert.is_some() {
        return matches!(event, TuiEvent::Submit | TuiEvent::MouseClick(..))
            .then_some(Action::DismissAlert);
    }
    if app.confirm_delete.is_some() {
        return match event {
            TuiEvent::Submit | TuiEvent::InputChar('y') => Some(Action::ConfirmDelete),
            TuiEvent::InputChar('n') => Some(Action::CancelDelete),
            _ => None,
        };
    }
    matches!(event, TuiEvent::Submit | TuiEvent::MouseClick(..)).then_some(Action::DismissOverlay)
}

fn list_action(view: &mut MessagingView, event: &TuiEvent) -> Option<Action> {
    match view.message_list.handle_event(event)? {
        MessageListEvent::Press(id) => Some(Action::PressMessage(id)),
        MessageListEvent::LongPress(id) => Some(Action::LongPressMessage(id)),
    }
}

fn composer_actions(app: &App, view: &mut MessagingView, event: &TuiEvent) -> Vec<Action> {
    let mut input = ComposerInput::new(&mut view.composer, &app.composer, app.pending.recording);
    let Some(composer_event) = input.handle_event(event) else {
        return Vec::new();
    };
    let action = match composer_event {
        ComposerEvent::Changed(text) => Action::ChangeText(text),
        ComposerEvent::Submit => Action::Submit,
        ComposerEvent::Focused => Action::FocusChanged(true),
        ComposerEvent::Camera => Action::PressCamera,
        ComposerEvent::Location => Action::PressLocation,
        ComposerEvent::ToggleRecording => Action::ToggleRecording,
    };
    vec![action]
}

fn run_goals(terminal: &mut DefaultTerminal) -> std::io::Result<()> {
    let mut board = GoalBoard::new();
    let mut state = GoalListState::new();
    let mut needs_redraw = true;

    loop {
        let now = Instant::now();
        let animating = state.is_animating(now);
        if needs_redraw || animating {
            terminal.draw(|f| ui::draw_goals(f, &board, &mut state, now))?;
            needs_redraw = false;
        }

        let timeout = if animating { ANIMATION_POLL } else { IDLE_POLL };
        let first_event = poll_event_timeout(timeout);
        if first_event.is_some() {
            needs_redraw = true;
        }

        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            if route_goals(&mut board, &mut state, &event, Instant::now()) {
                info!("Goal screen closed with {} goals", board.goals.len());
                return Ok(());
            }
        }
    }
}

/// Apply one terminal event to the goal screen. Returns true to quit.
fn route_goals(board: &mut GoalBoard, state: &mut GoalListState, event: &TuiEvent, now: Instant) -> bool {
    match event {
        TuiEvent::ForceQuit => return true,
        TuiEvent::Escape => {
            if board.alert.take().is_some() {
                return false;
            }
            if board.modal.is_some() {
                board.close_modal();
                return false;
            }
            if board.input.is_focused {
                board.input.set_focus(false);
                return false;
            }
            return true;
        }
        _ => {}
    }

    if board.alert.is_some() {
        if matches!(event, TuiEvent::Submit | TuiEvent::MouseClick(..)) {
            board.alert = None;
        }
        return false;
    }

    let Some(goal_event) = GoalList::new(state, board, now).handle_event(event) else {
        return false;
    };
    debug!("Goal event: {:?}", goal_event);
    match goal_event {
        GoalEvent::Changed(text) => board.input.on_change_text(text),
        GoalEvent::Add => {
            board.add_goal();
        }
        GoalEvent::Focus(focused) => board.input.set_focus(focused),
        GoalEvent::Delete(id) => {
            board.delete_goal(&id);
            state.selected = state
                .selected
                .filter(|_| !board.goals.is_empty())
                .map(|i| i.min(board.goals.len() - 1));
        }
        GoalEvent::ShowModal(animation) => board.show_modal(animation),
        GoalEvent::CloseModal => board.close_modal(),
    }
    false
}
