//! # Composer
//!
//! Draft text plus the focus and recording flags of the toolbar.
//!
//! Recording is a two-state machine:
//!
//! ```text
//!         toggle (mic granted, recorder started)
//!   Idle ───────────────────────────────────────► Recording
//!    ▲                                                │
//!    └──────────── toggle (stop, success or fail) ────┘
//! ```
//!
//! A denied permission or a failed start leaves the composer `Idle`.
//! Nothing about a failed attempt is remembered.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecordingState {
    #[default]
    Idle,
    Recording,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Composer {
    pub draft: String,
    pub is_focused: bool,
    pub recording: RecordingState,
}

impl Composer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_change_text(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    /// Takes the draft if it has visible content.
    ///
    /// An empty or whitespace-only draft is left alone and focus is kept.
    /// On success the draft is emptied and focus is cleared.
    pub fn submit(&mut self) -> Option<String> {
        if self.draft.trim().is_empty() {
            return None;
        }
        self.is_focused = false;
        Some(std::mem::take(&mut self.draft))
    }

    pub fn set_focus(&mut self, focused: bool) {
        self.is_focused = focused;
    }

    pub fn is_recording(&self) -> bool {
        self.recording == RecordingState::Recording
    }

    pub fn can_submit(&self) -> bool {
        !self.draft.trim().is_empty()
    }
}
