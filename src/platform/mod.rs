//! # Platform Capabilities
//!
//! Narrow request/response and subscribe/notify interfaces to the services
//! the messaging screen needs from the host: permission grants, a position
//! fix, an audio recorder, an audio player and a connectivity signal.
//!
//! The core never calls these directly. The reducer returns an `Effect`,
//! and the TUI runtime calls the matching capability on a tokio task.
//!
//! Desktop implementations live in [`desktop`].

pub mod desktop;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::core::message::Coordinate;

/// A platform resource that needs the user's consent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Microphone,
    Location,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capability::Microphone => f.write_str("microphone"),
            Capability::Location => f.write_str("location"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    Granted,
    Denied,
}

/// Failures surfaced by capability calls. Each one is shown to the user
/// once and then dropped.
#[derive(Debug, Clone, PartialEq)]
pub enum CapabilityError {
    /// The user (or config) refused access.
    PermissionDenied(Capability),
    /// The recorder couldn't start or finalize a capture.
    CaptureFailed(String),
    /// No position fix could be produced.
    PositionUnavailable(String),
    /// Playback failed. Logged only.
    PlaybackFailed(String),
}

impl fmt::Display for CapabilityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CapabilityError::PermissionDenied(cap) => write!(f, "{cap} permission denied"),
            CapabilityError::CaptureFailed(msg) => write!(f, "capture failed: {msg}"),
            CapabilityError::PositionUnavailable(msg) => write!(f, "position unavailable: {msg}"),
            CapabilityError::PlaybackFailed(msg) => write!(f, "playback failed: {msg}"),
        }
    }
}

impl std::error::Error for CapabilityError {}

#[async_trait]
pub trait Permissions: Send + Sync {
    async fn request(&self, capability: Capability) -> PermissionStatus;
}

#[async_trait]
pub trait Locator: Send + Sync {
    /// One-shot current position.
    async fn current_position(&self) -> Result<Coordinate, CapabilityError>;
}

#[async_trait]
pub trait Recorder: Send + Sync {
    async fn start(&self) -> Result<(), CapabilityError>;

    /// Finalizes the capture and returns a playable resource locator.
    async fn stop(&self) -> Result<String, CapabilityError>;
}

#[async_trait]
pub trait AudioPlayer: Send + Sync {
    async fn play(&self, uri: &str) -> Result<(), CapabilityError>;
}

/// Callback invoked with `true` (connected) or `false` on every change.
pub type ConnectivityListener = Box<dyn Fn(bool) + Send + Sync>;

pub trait Connectivity: Send + Sync {
    /// Starts observing. The first notification carries the initial state.
    /// Observation stops when the returned guard is dropped.
    fn subscribe(&self, listener: ConnectivityListener) -> Subscription;
}

/// Live connectivity subscription. Unsubscribes on drop.
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    pub fn unsubscribe(mut self) {
        self.cancel_now();
    }

    fn cancel_now(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel_now();
    }
}

/// Every capability the messaging screen calls into, bundled so the
/// runtime can hand clones to background tasks.
#[derive(Clone)]
pub struct Platform {
    pub permissions: Arc<dyn Permissions>,
    pub locator: Arc<dyn Locator>,
    pub recorder: Arc<dyn Recorder>,
    pub player: Arc<dyn AudioPlayer>,
    pub connectivity: Arc<dyn Connectivity>,
}

/// Asks for `capability`, mapping a denial to `PermissionDenied`.
pub async fn require(
    permissions: &dyn Permissions,
    capability: Capability,
) -> Result<(), CapabilityError> {
    match permissions.request(capability).await {
        PermissionStatus::Granted => Ok(()),
        PermissionStatus::Denied => Err(CapabilityError::PermissionDenied(capability)),
    }
}

/// Location flow: permission, then a one-shot fix.
pub async fn fetch_location(platform: &Platform) -> Result<Coordinate, CapabilityError> {
    require(platform.permissions.as_ref(), Capability::Location).await?;
    platform.locator.current_position().await
}

/// Recording start flow: microphone permission, then the recorder.
pub async fn start_recording(platform: &Platform) -> Result<(), CapabilityError> {
    require(platform.permissions.as_ref(), Capability::Microphone).await?;
    platform.recorder.start().await
}
