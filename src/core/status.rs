//! # Connectivity Banner
//!
//! Remembers the last connectivity signal and when the banner should fade.
//!
//! Every change pushes the fade deadline to `at + window`. A change that
//! arrives before the previous deadline replaces it, which is how the old
//! timer gets cancelled: there is only ever one deadline.

use std::time::{Duration, Instant};

pub const DEFAULT_BANNER_WINDOW: Duration = Duration::from_secs(3);

#[derive(Debug, Clone)]
pub struct StatusBanner {
    /// `None` until the first signal arrives.
    pub connected: Option<bool>,
    fade_at: Option<Instant>,
    window: Duration,
}

impl Default for StatusBanner {
    fn default() -> Self {
        Self::new(DEFAULT_BANNER_WINDOW)
    }
}

impl StatusBanner {
    pub fn new(window: Duration) -> Self {
        Self {
            connected: None,
            fade_at: None,
            window,
        }
    }

    pub fn on_change(&mut self, connected: bool, at: Instant) {
        self.connected = Some(connected);
        self.fade_at = Some(at + self.window);
    }

    pub fn is_visible(&self, now: Instant) -> bool {
        self.fade_at.is_some_and(|deadline| now < deadline)
    }

    /// Time left before the banner hides, if it is showing.
    /// The event loop uses this to wake up for the fade.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.fade_at
            .and_then(|deadline| deadline.checked_duration_since(now))
            .filter(|d| !d.is_zero())
    }

    pub fn label(&self) -> &'static str {
        match self.connected {
            Some(true) => "Connected",
            Some(false) => "No network connection",
            None => "Checking network...",
        }
    }
}
