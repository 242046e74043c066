//! # Application State
//!
//! Screen-root state of the messaging demo. Domain data only; presentation
//! state (selection, scroll, cursor) lives in the `tui` module.
//!
//! ```text
//! App
//! ├── store: MessageStore           // conversation, newest first
//! ├── composer: Composer            // draft, focus, recording flag
//! ├── overlay: Overlay              // fullscreen image or map
//! ├── confirm_delete: Option<Id>    // long-press prompt
//! ├── alert: Option<Alert>          // one-shot user-facing alert
//! ├── banner: StatusBanner          // connectivity banner
//! ├── pending: Pending              // capability calls in flight
//! └── status_message: String        // last thing that happened
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.

use std::time::Duration;

use crate::core::composer::Composer;
use crate::core::message::{Message, MessageId};
use crate::core::status::StatusBanner;
use crate::core::store::MessageStore;

/// Fullscreen presentation of a single message. At most one at a time.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Overlay {
    #[default]
    None,
    Image(MessageId),
    Map(MessageId),
}

impl Overlay {
    pub fn references(&self, id: &MessageId) -> bool {
        match self {
            Overlay::None => false,
            Overlay::Image(current) | Overlay::Map(current) => current == id,
        }
    }

    pub fn is_active(&self) -> bool {
        !matches!(self, Overlay::None)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub title: String,
    pub body: String,
}

impl Alert {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }
}

/// Capability calls that have been handed to the runtime but haven't
/// reported back yet. Used to ignore repeated button presses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pending {
    pub location: bool,
    pub recording: bool,
}

pub struct App {
    pub store: MessageStore,
    pub composer: Composer,
    pub overlay: Overlay,
    pub confirm_delete: Option<MessageId>,
    pub alert: Option<Alert>,
    pub banner: StatusBanner,
    pub pending: Pending,
    pub status_message: String,
}

impl App {
    /// `seed` is ordered newest first.
    pub fn new(seed: Vec<Message>, banner_window: Duration) -> Self {
        Self {
            store: MessageStore::from_newest_first(seed),
            composer: Composer::new(),
            overlay: Overlay::None,
            confirm_delete: None,
            alert: None,
            banner: StatusBanner::new(banner_window),
            pending: Pending::default(),
            status_message: String::from("Type something!"),
        }
    }

    /// Removes a message and anything on screen that still points at it.
    pub fn delete_message(&mut self, id: &MessageId) -> Option<Message> {
        if self.overlay.references(id) {
            self.overlay = Overlay::None;
        }
        if self.confirm_delete.as_ref() == Some(id) {
            self.confirm_delete = None;
        }
        self.store.remove(id)
    }

    /// The message behind the active overlay, if it still exists.
    pub fn overlay_message(&self) -> Option<&Message> {
        match &self.overlay {
            Overlay::None => None,
            Overlay::Image(id) | Overlay::Map(id) => self.store.find_by_id(id),
        }
    }

    /// True when a modal surface (alert, confirmation, overlay) is up.
    pub fn is_modal(&self) -> bool {
        self.alert.is_some() || self.confirm_delete.is_some() || self.overlay.is_active()
    }
}
