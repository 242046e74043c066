//! # Actions
//!
//! Everything that can happen on the messaging screen becomes an `Action`.
//! User presses Enter? That's `Action::Submit`.
//! The locator answers? That's `Action::LocationResolved(result)`.
//!
//! The `update()` function applies an action to the state and returns an
//! `Effect`. No side effects here. Capability calls happen in the TUI
//! runtime, which feeds their results back in as new actions.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```

use std::time::Instant;

use log::{debug, info, warn};

use crate::core::composer::RecordingState;
use crate::core::message::{Coordinate, Message, MessageId};
use crate::core::state::{Alert, App, Overlay};
use crate::platform::{Capability, CapabilityError};

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Replace the composer draft.
    ChangeText(String),
    /// Turn the draft into a text message.
    Submit,
    FocusChanged(bool),
    PressMessage(MessageId),
    LongPressMessage(MessageId),
    ConfirmDelete,
    CancelDelete,
    DismissOverlay,
    DismissAlert,
    /// Hardware-back style dismissal, innermost surface first.
    Back,
    PressCamera,
    PressLocation,
    LocationResolved(Result<Coordinate, CapabilityError>),
    ToggleRecording,
    RecordingStarted(Result<(), CapabilityError>),
    RecordingFinished(Result<String, CapabilityError>),
    PlaybackFinished(Result<(), CapabilityError>),
    ConnectivityChanged { connected: bool, at: Instant },
    Quit,
}

/// What the runtime should do after an update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    Quit,
    RequestLocation,
    StartRecording,
    StopRecording,
    PlayAudio(String),
}

pub fn update(app: &mut App, action: Action) -> Effect {
    debug!("update: {:?}", action);
    match action {
        Action::ChangeText(text) => {
            app.composer.on_change_text(text);
            Effect::None
        }
        Action::Submit => {
            if let Some(text) = app.composer.submit() {
                let message = Message::text(text);
                info!("Appending text message {}", message.id());
                app.store.append(message);
                app.status_message = String::from("Sent");
            }
            Effect::None
        }
        Action::FocusChanged(focused) => {
            app.composer.set_focus(focused);
            Effect::None
        }
        Action::PressMessage(id) => press_message(app, &id),
        Action::LongPressMessage(id) => {
            if app.store.find_by_id(&id).is_some() {
                app.confirm_delete = Some(id);
            }
            Effect::None
        }
        Action::ConfirmDelete => {
            if let Some(id) = app.confirm_delete.take() {
                if let Some(removed) = app.delete_message(&id) {
                    info!("Deleted {} message {}", removed.kind(), id);
                    app.status_message = String::from("Message deleted");
                }
            }
            Effect::None
        }
        Action::CancelDelete => {
            app.confirm_delete = None;
            Effect::None
        }
        Action::DismissOverlay => {
            app.overlay = Overlay::None;
            Effect::None
        }
        Action::DismissAlert => {
            app.alert = None;
            Effect::None
        }
        Action::Back => back(app),
        Action::PressCamera => {
            app.alert = Some(Alert::new("Camera", "Camera button pressed"));
            Effect::None
        }
        Action::PressLocation => {
            if app.pending.location {
                debug!("Location request already in flight");
                return Effect::None;
            }
            app.pending.location = true;
            app.status_message = String::from("Locating...");
            Effect::RequestLocation
        }
        Action::LocationResolved(result) => {
            app.pending.location = false;
            match result {
                Ok(coordinate) => {
                    info!("Location fix: {}", coordinate);
                    app.store.append(Message::location(coordinate));
                    app.status_message = String::from("Location shared");
                }
                Err(e) => fail(app, e),
            }
            Effect::None
        }
        Action::ToggleRecording => toggle_recording(app),
        Action::RecordingStarted(result) => {
            app.pending.recording = false;
            match result {
                Ok(()) => {
                    app.composer.recording = RecordingState::Recording;
                    app.status_message = String::from("Recording...");
                }
                Err(e) => {
                    app.composer.recording = RecordingState::Idle;
                    fail(app, e);
                }
            }
            Effect::None
        }
        Action::RecordingFinished(result) => {
            app.pending.recording = false;
            if app.composer.recording != RecordingState::Recording {
                warn!("Recording finished while not recording, ignoring");
                return Effect::None;
            }
            app.composer.recording = RecordingState::Idle;
            match result {
                Ok(uri) => {
                    info!("Appending audio message for {}", uri);
                    app.store.append(Message::audio(uri));
                    app.status_message = String::from("Voice message sent");
                }
                Err(e) => fail(app, e),
            }
            Effect::None
        }
        Action::PlaybackFinished(result) => {
            if let Err(e) = result {
                warn!("Error playing audio: {}", e);
            }
            Effect::None
        }
        Action::ConnectivityChanged { connected, at } => {
            app.banner.on_change(connected, at);
            Effect::None
        }
        Action::Quit => Effect::Quit,
    }
}

fn press_message(app: &mut App, id: &MessageId) -> Effect {
    let Some(message) = app.store.find_by_id(id) else {
        return Effect::None;
    };
    match message {
        Message::Text { .. } => Effect::None,
        Message::Image { .. } => {
            app.overlay = Overlay::Image(id.clone());
            app.composer.set_focus(false);
            Effect::None
        }
        Message::Location { .. } => {
            app.overlay = Overlay::Map(id.clone());
            app.composer.set_focus(false);
            Effect::None
        }
        Message::Audio { audio_uri, .. } => Effect::PlayAudio(audio_uri.clone()),
    }
}

fn back(app: &mut App) -> Effect {
    if app.alert.take().is_some() {
        return Effect::None;
    }
    if app.confirm_delete.take().is_some() {
        return Effect::None;
    }
    if app.overlay.is_active() {
        app.overlay = Overlay::None;
        return Effect::None;
    }
    if app.composer.is_focused {
        app.composer.set_focus(false);
        return Effect::None;
    }
    Effect::Quit
}

fn toggle_recording(app: &mut App) -> Effect {
    if app.pending.recording {
        debug!("Recorder busy, ignoring toggle");
        return Effect::None;
    }
    app.pending.recording = true;
    match app.composer.recording {
        RecordingState::Idle => Effect::StartRecording,
        RecordingState::Recording => Effect::StopRecording,
    }
}

/// Surfaces a capability failure as a one-shot alert.
fn fail(app: &mut App, error: CapabilityError) {
    warn!("Capability failed: {}", error);
    app.status_message = error.to_string();
    app.alert = Some(alert_for(&error));
}

pub fn alert_for(error: &CapabilityError) -> Alert {
    match error {
        CapabilityError::PermissionDenied(Capability::Microphone) => Alert::new(
            "Permission denied",
            "Audio recording permission is required to use voice input.",
        ),
        CapabilityError::PermissionDenied(Capability::Location) => Alert::new(
            "Permission denied",
            "Location permission is required to use this feature.",
        ),
        CapabilityError::CaptureFailed(_) => {
            Alert::new("Error", "Unable to record voice. Please try again.")
        }
        CapabilityError::PositionUnavailable(_) => {
            Alert::new("Error", "Unable to get location. Please try again.")
        }
        CapabilityError::PlaybackFailed(_) => {
            Alert::new("Error", "Unable to play audio. Please try again.")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{test_app, texts};

    fn id_of_text(app: &App, wanted: &str) -> MessageId {
        app.store
            .iter()
            .find(|m| matches!(m, Message::Text { text, .. } if text == wanted))
            .map(|m| m.id().clone())
            .unwrap()
    }

    #[test]
    fn submit_prepends_text_and_clears_composer() {
        let mut app = test_app();
        update(&mut app, Action::FocusChanged(true));
        update(&mut app, Action::ChangeText("Hi".into()));

        assert_eq!(update(&mut app, Action::Submit), Effect::None);

        assert_eq!(app.store.len(), 5);
        assert_eq!(texts(&app)[0], "Hi");
        assert!(app.composer.draft.is_empty());
        assert!(!app.composer.is_focused);
    }

    #[test]
    fn whitespace_submit_changes_nothing() {
        let mut app = test_app();
        update(&mut app, Action::FocusChanged(true));
        update(&mut app, Action::ChangeText("  ".into()));

        update(&mut app, Action::Submit);

        assert_eq!(app.store.len(), 4);
        assert!(app.composer.is_focused);
        assert_eq!(app.composer.draft, "  ");
    }

    #[test]
    fn long_press_then_confirm_deletes() {
        let mut app = test_app();
        let hello = id_of_text(&app, "Hello");

        update(&mut app, Action::LongPressMessage(hello.clone()));
        assert_eq!(app.confirm_delete, Some(hello.clone()));

        update(&mut app, Action::ConfirmDelete);
        assert!(app.confirm_delete.is_none());
        assert!(app.store.find_by_id(&hello).is_none());
        assert_eq!(app.store.len(), 3);
    }

    #[test]
    fn long_press_then_cancel_keeps_message() {
        let mut app = test_app();
        let hello = id_of_text(&app, "Hello");

        update(&mut app, Action::LongPressMessage(hello.clone()));
        update(&mut app, Action::CancelDelete);

        assert!(app.store.find_by_id(&hello).is_some());
        assert!(app.confirm_delete.is_none());
    }

    #[test]
    fn long_press_unknown_id_opens_nothing() {
        let mut app = test_app();
        update(&mut app, Action::LongPressMessage(MessageId::from("ghost")));
        assert!(app.confirm_delete.is_none());
    }

    #[test]
    fn press_image_opens_image_overlay_and_blurs() {
        let mut app = test_app();
        app.composer.set_focus(true);
        let image = app.store.get(0).unwrap().id().clone();

        update(&mut app, Action::PressMessage(image.clone()));

        assert_eq!(app.overlay, Overlay::Image(image));
        assert!(!app.composer.is_focused);
    }

    #[test]
    fn press_location_opens_map_overlay() {
        let mut app = test_app();
        let location = app.store.get(3).unwrap().id().clone();

        update(&mut app, Action::PressMessage(location.clone()));

        assert_eq!(app.overlay, Overlay::Map(location));
    }

    #[test]
    fn opening_map_replaces_image_overlay() {
        let mut app = test_app();
        let image = app.store.get(0).unwrap().id().clone();
        let location = app.store.get(3).unwrap().id().clone();

        update(&mut app, Action::PressMessage(image));
        update(&mut app, Action::PressMessage(location.clone()));

        assert_eq!(app.overlay, Overlay::Map(location));
    }

    #[test]
    fn press_text_does_nothing() {
        let mut app = test_app();
        let hello = id_of_text(&app, "Hello");
        assert_eq!(update(&mut app, Action::PressMessage(hello)), Effect::None);
        assert_eq!(app.overlay, Overlay::None);
    }

    #[test]
    fn press_audio_requests_playback() {
        let mut app = test_app();
        app.store.append(Message::audio("file:///tmp/a.wav"));
        let audio = app.store.get(0).unwrap().id().clone();

        assert_eq!(
            update(&mut app, Action::PressMessage(audio)),
            Effect::PlayAudio("file:///tmp/a.wav".into())
        );
    }

    #[test]
    fn playback_failure_is_not_an_alert() {
        let mut app = test_app();
        update(
            &mut app,
            Action::PlaybackFinished(Err(CapabilityError::PlaybackFailed("boom".into()))),
        );
        assert!(app.alert.is_none());
    }

    #[test]
    fn recording_round_trip_appends_one_audio_message() {
        let mut app = test_app();

        assert_eq!(update(&mut app, Action::ToggleRecording), Effect::StartRecording);
        update(&mut app, Action::RecordingStarted(Ok(())));
        assert!(app.composer.is_recording());

        assert_eq!(update(&mut app, Action::ToggleRecording), Effect::StopRecording);
        update(
            &mut app,
            Action::RecordingFinished(Ok("file:///tmp/rec.wav".into())),
        );

        assert_eq!(app.composer.recording, RecordingState::Idle);
        assert_eq!(app.store.len(), 5);
        assert!(matches!(
            app.store.get(0),
            Some(Message::Audio { audio_uri, .. }) if audio_uri == "file:///tmp/rec.wav"
        ));
    }

    #[test]
    fn toggle_while_start_in_flight_is_ignored() {
        let mut app = test_app();
        assert_eq!(update(&mut app, Action::ToggleRecording), Effect::StartRecording);
        assert_eq!(update(&mut app, Action::ToggleRecording), Effect::None);
    }

    #[test]
    fn microphone_denied_stays_idle_with_alert() {
        let mut app = test_app();
        update(&mut app, Action::ToggleRecording);
        update(
            &mut app,
            Action::RecordingStarted(Err(CapabilityError::PermissionDenied(
                Capability::Microphone,
            ))),
        );

        assert_eq!(app.composer.recording, RecordingState::Idle);
        assert_eq!(app.alert.as_ref().unwrap().title, "Permission denied");
        assert_eq!(app.store.len(), 4);
        // Next attempt starts fresh
        assert_eq!(update(&mut app, Action::ToggleRecording), Effect::StartRecording);
    }

    #[test]
    fn failed_stop_discards_capture() {
        let mut app = test_app();
        update(&mut app, Action::ToggleRecording);
        update(&mut app, Action::RecordingStarted(Ok(())));
        update(&mut app, Action::ToggleRecording);
        update(
            &mut app,
            Action::RecordingFinished(Err(CapabilityError::CaptureFailed("disk full".into()))),
        );

        assert_eq!(app.composer.recording, RecordingState::Idle);
        assert_eq!(app.store.len(), 4);
        assert_eq!(
            app.alert,
            Some(Alert::new("Error", "Unable to record voice. Please try again."))
        );
    }

    #[test]
    fn location_success_appends() {
        let mut app = test_app();
        assert_eq!(update(&mut app, Action::PressLocation), Effect::RequestLocation);
        let here = Coordinate {
            latitude: 1.0,
            longitude: 2.0,
        };
        update(&mut app, Action::LocationResolved(Ok(here)));

        assert_eq!(app.store.len(), 5);
        assert!(matches!(
            app.store.get(0),
            Some(Message::Location { coordinate, .. }) if *coordinate == here
        ));
        assert!(!app.pending.location);
    }

    #[test]
    fn location_denied_appends_nothing() {
        let mut app = test_app();
        update(&mut app, Action::PressLocation);
        update(
            &mut app,
            Action::LocationResolved(Err(CapabilityError::PermissionDenied(Capability::Location))),
        );

        assert_eq!(app.store.len(), 4);
        assert_eq!(
            app.alert.as_ref().unwrap().body,
            "Location permission is required to use this feature."
        );
    }

    #[test]
    fn repeated_location_press_is_ignored_while_pending() {
        let mut app = test_app();
        assert_eq!(update(&mut app, Action::PressLocation), Effect::RequestLocation);
        assert_eq!(update(&mut app, Action::PressLocation), Effect::None);
    }

    #[test]
    fn camera_is_a_placeholder() {
        let mut app = test_app();
        update(&mut app, Action::PressCamera);
        assert_eq!(app.store.len(), 4);
        assert_eq!(app.alert.as_ref().unwrap().body, "Camera button pressed");
    }

    #[test]
    fn back_dismisses_innermost_first() {
        let mut app = test_app();
        let image = app.store.get(0).unwrap().id().clone();
        update(&mut app, Action::PressMessage(image));
        update(&mut app, Action::PressCamera);
        app.composer.set_focus(true);

        assert_eq!(update(&mut app, Action::Back), Effect::None);
        assert!(app.alert.is_none());
        assert!(app.overlay.is_active());

        assert_eq!(update(&mut app, Action::Back), Effect::None);
        assert!(!app.overlay.is_active());

        assert_eq!(update(&mut app, Action::Back), Effect::None);
        assert!(!app.composer.is_focused);

        assert_eq!(update(&mut app, Action::Back), Effect::Quit);
    }

    #[test]
    fn connectivity_change_shows_banner() {
        let mut app = test_app();
        let now = Instant::now();
        update(
            &mut app,
            Action::ConnectivityChanged {
                connected: false,
                at: now,
            },
        );
        assert!(app.banner.is_visible(now));
        assert_eq!(app.banner.connected, Some(false));
    }

    #[test]
    fn quit_returns_quit_effect() {
        let mut app = test_app();
        assert_eq!(update(&mut app, Action::Quit), Effect::Quit);
    }
}
