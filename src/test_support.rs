//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::core::message::{Coordinate, Message, demo_conversation};
use crate::core::state::App;
use crate::platform::{
    AudioPlayer, Capability, CapabilityError, Connectivity, ConnectivityListener, Locator,
    PermissionStatus, Permissions, Platform, Recorder, Subscription,
};

/// Creates a test App seeded with the demo conversation:
/// `[Img, "World", "Hello", Loc]`.
pub fn test_app() -> App {
    App::new(demo_conversation(), Duration::from_secs(3))
}

/// Texts of the text messages, newest first.
pub fn texts(app: &App) -> Vec<String> {
    app.store
        .iter()
        .filter_map(|m| match m {
            Message::Text { text, .. } => Some(text.clone()),
            _ => None,
        })
        .collect()
}

/// Scripted capabilities with call counters.
pub struct FakePlatform {
    denied: Mutex<Vec<Capability>>,
    coordinate: Coordinate,
    locator_calls: Arc<AtomicUsize>,
    listeners: Arc<Mutex<Vec<ConnectivityListener>>>,
}

impl FakePlatform {
    pub fn new() -> Self {
        Self {
            denied: Mutex::new(Vec::new()),
            coordinate: Coordinate {
                latitude: 51.5,
                longitude: -0.12,
            },
            locator_calls: Arc::new(AtomicUsize::new(0)),
            listeners: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn deny(self, capability: Capability) -> Self {
        self.denied.lock().unwrap().push(capability);
        self
    }

    pub fn coordinate(&self) -> Coordinate {
        self.coordinate
    }

    pub fn locator_calls(&self) -> usize {
        self.locator_calls.load(Ordering::SeqCst)
    }

    pub fn platform(&self) -> Platform {
        let denied = self.denied.lock().unwrap().clone();
        Platform {
            permissions: Arc::new(FakePermissions { denied }),
            locator: Arc::new(FakeLocator {
                coordinate: self.coordinate,
                calls: self.locator_calls.clone(),
            }),
            recorder: Arc::new(FakeRecorder::default()),
            player: Arc::new(FakePlayer),
            connectivity: Arc::new(FakeConnectivity {
                listeners: self.listeners.clone(),
            }),
        }
    }
}

struct FakePermissions {
    denied: Vec<Capability>,
}

#[async_trait]
impl Permissions for FakePermissions {
    async fn request(&self, capability: Capability) -> PermissionStatus {
        if self.denied.contains(&capability) {
            PermissionStatus::Denied
        } else {
            PermissionStatus::Granted
        }
    }
}

struct FakeLocator {
    coordinate: Coordinate,
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl Locator for FakeLocator {
    async fn current_position(&self) -> Result<Coordinate, CapabilityError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.coordinate)
    }
}

#[derive(Default)]
struct FakeRecorder {
    takes: AtomicUsize,
}

#[async_trait]
impl Recorder for FakeRecorder {
    async fn start(&self) -> Result<(), CapabilityError> {
        Ok(())
    }

    async fn stop(&self) -> Result<String, CapabilityError> {
        let n = self.takes.fetch_add(1, Ordering::SeqCst);
        Ok(format!("file:///fake/take-{n}.wav"))
    }
}

struct FakePlayer;

#[async_trait]
impl AudioPlayer for FakePlayer {
    async fn play(&self, _uri: &str) -> Result<(), CapabilityError> {
        Ok(())
    }
}

struct FakeConnectivity {
    listeners: Arc<Mutex<Vec<ConnectivityListener>>>,
}

impl Connectivity for FakeConnectivity {
    fn subscribe(&self, listener: ConnectivityListener) -> Subscription {
        listener(true);
        self.listeners.lock().unwrap().push(listener);
        let listeners = self.listeners.clone();
        Subscription::new(move || listeners.lock().unwrap().clear())
    }
}
