//! Desktop stand-ins for the mobile platform services.
//!
//! - Permissions come from config instead of a system prompt.
//! - The position fix is a configured coordinate.
//! - The recorder writes a silent WAV whose length matches the time spent
//!   recording. There is no microphone capture on the terminal.
//! - Playback shells out to a configured command (`aplay`, `afplay`, ...).
//! - Connectivity is a periodic TCP probe.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use log::{debug, info, warn};

use super::{
    AudioPlayer, Capability, CapabilityError, Connectivity, ConnectivityListener, Locator,
    PermissionStatus, Permissions, Platform, Recorder, Subscription,
};
use crate::core::config::ResolvedConfig;
use crate::core::message::Coordinate;

/// Sample rate of the generated recordings.
const WAV_SAMPLE_RATE: u32 = 8_000;
/// Longest recording we are willing to write, in seconds.
const MAX_RECORDING_SECS: u64 = 600;

/// Build the desktop platform from resolved settings.
pub fn from_config(config: &ResolvedConfig) -> Platform {
    Platform {
        permissions: Arc::new(ConfiguredPermissions {
            microphone: config.allow_microphone,
            location: config.allow_location,
        }),
        locator: Arc::new(FixedLocator {
            coordinate: config.location,
        }),
        recorder: Arc::new(WavRecorder::new(config.recordings_dir.clone())),
        player: Arc::new(CommandPlayer {
            command: config.player_command.clone(),
        }),
        connectivity: Arc::new(ProbeConnectivity {
            addr: config.probe_addr.clone(),
            interval: config.probe_interval,
            timeout: config.probe_timeout,
        }),
    }
}

pub struct ConfiguredPermissions {
    pub microphone: bool,
    pub location: bool,
}

#[async_trait]
impl Permissions for ConfiguredPermissions {
    async fn request(&self, capability: Capability) -> PermissionStatus {
        let granted = match capability {
            Capability::Microphone => self.microphone,
            Capability::Location => self.location,
        };
        debug!("Permission request for {capability}: granted={granted}");
        if granted {
            PermissionStatus::Granted
        } else {
            PermissionStatus::Denied
        }
    }
}

pub struct FixedLocator {
    pub coordinate: Option<Coordinate>,
}

#[async_trait]
impl Locator for FixedLocator {
    async fn current_position(&self) -> Result<Coordinate, CapabilityError> {
        self.coordinate.ok_or_else(|| {
            CapabilityError::PositionUnavailable("no location configured".to_string())
        })
    }
}

struct ActiveRecording {
    started: Instant,
    path: PathBuf,
}

pub struct WavRecorder {
    dir: PathBuf,
    active: Mutex<Option<ActiveRecording>>,
}

impl WavRecorder {
    pub fn new(dir: PathBuf) -> Self {
        Self {
            dir,
            active: Mutex::new(None),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Option<ActiveRecording>>, CapabilityError> {
        self.active
            .lock()
            .map_err(|_| CapabilityError::CaptureFailed("recorder state poisoned".to_string()))
    }
}

#[async_trait]
impl Recorder for WavRecorder {
    async fn start(&self) -> Result<(), CapabilityError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| CapabilityError::CaptureFailed(e.to_string()))?;

        let mut active = self.lock()?;
        if active.is_some() {
            return Err(CapabilityError::CaptureFailed(
                "a recording is already in progress".to_string(),
            ));
        }
        let path = self
            .dir
            .join(format!("recording-{}.wav", uuid::Uuid::new_v4()));
        info!("Recording started: {}", path.display());
        *active = Some(ActiveRecording {
            started: Instant::now(),
            path,
        });
        Ok(())
    }

    async fn stop(&self) -> Result<String, CapabilityError> {
        let recording = self
            .lock()?
            .take()
            .ok_or_else(|| CapabilityError::CaptureFailed("not recording".to_string()))?;

        let elapsed = recording.started.elapsed();
        let bytes = silent_wav(elapsed);
        if let Err(e) = tokio::fs::write(&recording.path, bytes).await {
            // Partial capture is discarded
            let _ = tokio::fs::remove_file(&recording.path).await;
            return Err(CapabilityError::CaptureFailed(e.to_string()));
        }
        info!(
            "Recording saved: {} ({:.1}s)",
            recording.path.display(),
            elapsed.as_secs_f32()
        );
        Ok(file_uri(&recording.path))
    }
}

fn file_uri(path: &Path) -> String {
    format!("file://{}", path.display())
}

/// Mono 16-bit PCM WAV of silence lasting `duration`.
fn silent_wav(duration: Duration) -> Vec<u8> {
    let secs = duration.as_secs_f64().min(MAX_RECORDING_SECS as f64);
    let samples = (secs * WAV_SAMPLE_RATE as f64) as u32;
    let data_len = samples * 2;
    let byte_rate = WAV_SAMPLE_RATE * 2;

    let mut out = Vec::with_capacity(44 + data_len as usize);
    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&(36 + data_len).to_le_bytes());
    out.extend_from_slice(b"WAVE");
    out.extend_from_slice(b"fmt ");
    out.extend_from_slice(&16u32.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes()); // PCM
    out.extend_from_slice(&1u16.to_le_bytes()); // mono
    out.extend_from_slice(&WAV_SAMPLE_RATE.to_le_bytes());
    out.extend_from_slice(&byte_rate.to_le_bytes());
    out.extend_from_slice(&2u16.to_le_bytes()); // block align
    out.extend_from_slice(&16u16.to_le_bytes()); // bits per sample
    out.extend_from_slice(b"data");
    out.extend_from_slice(&data_len.to_le_bytes());
    out.resize(44 + data_len as usize, 0);
    out
}

pub struct CommandPlayer {
    pub command: Option<String>,
}

#[async_trait]
impl AudioPlayer for CommandPlayer {
    async fn play(&self, uri: &str) -> Result<(), CapabilityError> {
        let command = self.command.as_deref().ok_or_else(|| {
            CapabilityError::PlaybackFailed("no audio player configured".to_string())
        })?;
        let target = uri.strip_prefix("file://").unwrap_or(uri);
        info!("Playing {} with {}", target, command);

        let status = tokio::process::Command::new(command)
            .arg(target)
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .status()
            .await
            .map_err(|e| CapabilityError::PlaybackFailed(e.to_string()))?;

        if status.success() {
            Ok(())
        } else {
            Err(CapabilityError::PlaybackFailed(format!(
                "{command} exited with {status}"
            )))
        }
    }
}

pub struct ProbeConnectivity {
    pub addr: String,
    pub interval: Duration,
    pub timeout: Duration,
}

impl ProbeConnectivity {
    async fn is_connected(&self) -> bool {
        matches!(
            tokio::time::timeout(self.timeout, tokio::net::TcpStream::connect(&self.addr)).await,
            Ok(Ok(_))
        )
    }
}

impl Connectivity for ProbeConnectivity {
    fn subscribe(&self, listener: ConnectivityListener) -> Subscription {
        let probe = ProbeConnectivity {
            addr: self.addr.clone(),
            interval: self.interval,
            timeout: self.timeout,
        };
        info!("Watching connectivity via {}", probe.addr);

        let handle = tokio::spawn(async move {
            let mut last: Option<bool> = None;
            loop {
                let connected = probe.is_connected().await;
                if last != Some(connected) {
                    debug!("Connectivity changed: connected={connected}");
                    listener(connected);
                    last = Some(connected);
                }
                tokio::time::sleep(probe.interval).await;
            }
        });

        Subscription::new(move || {
            warn!("Connectivity watch stopped");
            handle.abort();
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn configured_permissions() {
        let perms = ConfiguredPermissions {
            microphone: true,
            location: false,
        };
        assert_eq!(
            perms.request(Capability::Microphone).await,
            PermissionStatus::Granted
        );
        assert_eq!(
            perms.request(Capability::Location).await,
            PermissionStatus::Denied
        );
    }

    #[tokio::test]
    async fn fixed_locator_without_coordinate_is_unavailable() {
        let locator = FixedLocator { coordinate: None };
        assert!(matches!(
            locator.current_position().await,
            Err(CapabilityError::PositionUnavailable(_))
        ));
    }

    #[test]
    fn silent_wav_header_and_length() {
        let bytes = silent_wav(Duration::from_millis(500));
        assert_eq!(&bytes[0..4], b"RIFF");
        assert_eq!(&bytes[8..12], b"WAVE");
        // 0.5s * 8000 samples * 2 bytes
        assert_eq!(bytes.len(), 44 + 8_000);
        assert!(bytes[44..].iter().all(|b| *b == 0));
    }

    #[tokio::test]
    async fn recorder_writes_file_and_returns_uri() {
        let dir = tempfile::tempdir().unwrap();
        let recorder = WavRecorder::new(dir.path().join("recordings"));

        recorder.start().await.unwrap();
        let uri = recorder.stop().await.unwrap();

        assert!(uri.starts_with("file://"));
        let path = uri.strip_prefix("file://").unwrap();
        assert!(Path::new(path).exists());
    }

    #[tokio::test]
    async fn recorder_rejects_double_start_and_stray_stop() {
        let dir = tempfile::tempdir().unwrap();
        let recorder = WavRecorder::new(dir.path().to_path_buf());

        assert!(matches!(
            recorder.stop().await,
            Err(CapabilityError::CaptureFailed(_))
        ));
        recorder.start().await.unwrap();
        assert!(matches!(
            recorder.start().await,
            Err(CapabilityError::CaptureFailed(_))
        ));
    }

    #[tokio::test]
    async fn player_without_command_fails() {
        let player = CommandPlayer { command: None };
        assert!(matches!(
            player.play("file:///tmp/x.wav").await,
            Err(CapabilityError::PlaybackFailed(_))
        ));
    }

    #[tokio::test]
    async fn probe_reports_listening_socket_as_connected() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        let probe = ProbeConnectivity {
            addr,
            interval: Duration::from_millis(50),
            timeout: Duration::from_millis(500),
        };
        assert!(probe.is_connected().await);
    }

    #[tokio::test]
    async fn subscription_emits_initial_state() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let probe = ProbeConnectivity {
            addr: listener.local_addr().unwrap().to_string(),
            interval: Duration::from_millis(50),
            timeout: Duration::from_millis(500),
        };
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let sub = probe.subscribe(Box::new(move |connected| {
            let _ = tx.send(connected);
        }));

        let first = tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .unwrap();
        assert_eq!(first, Some(true));
        drop(sub);
    }
}
