//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.bubbles/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::Screen;
use crate::core::message::{Coordinate, Message, demo_conversation};

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct BubblesConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub permissions: PermissionsConfig,
    #[serde(default)]
    pub location: LocationConfig,
    #[serde(default)]
    pub connectivity: ConnectivityConfig,
    #[serde(default)]
    pub audio: AudioConfig,
    /// Initial conversation, newest first. Empty = built-in demo.
    #[serde(default)]
    pub seed: Vec<Message>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub default_screen: Option<Screen>,
    pub banner_seconds: Option<u64>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct PermissionsConfig {
    pub microphone: Option<bool>,
    pub location: Option<bool>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct LocationConfig {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ConnectivityConfig {
    pub probe_addr: Option<String>,
    pub interval_ms: Option<u64>,
    pub timeout_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct AudioConfig {
    pub recordings_dir: Option<String>,
    pub player: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_BANNER_SECONDS: u64 = 3;
pub const DEFAULT_PROBE_ADDR: &str = "1.1.1.1:53";
pub const DEFAULT_PROBE_INTERVAL_MS: u64 = 5_000;
pub const DEFAULT_PROBE_TIMEOUT_MS: u64 = 1_500;
pub const MIN_PROBE_INTERVAL_MS: u64 = 250;
pub const MIN_PROBE_TIMEOUT_MS: u64 = 100;
pub const DEFAULT_COORDINATE: Coordinate = Coordinate {
    latitude: 37.78825,
    longitude: -122.4324,
};

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub screen: Screen,
    pub banner_window: Duration,
    pub allow_microphone: bool,
    pub allow_location: bool,
    /// `None` makes every position request fail.
    pub location: Option<Coordinate>,
    pub probe_addr: String,
    pub probe_interval: Duration,
    pub probe_timeout: Duration,
    pub recordings_dir: PathBuf,
    pub player_command: Option<String>,
    pub seed: Vec<Message>,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

fn bubbles_home() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".bubbles"))
}

/// Returns the path to `~/.bubbles/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    bubbles_home().map(|dir| dir.join("config.toml"))
}

/// Load config from `~/.bubbles/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `BubblesConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<BubblesConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(BubblesConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(BubblesConfig::default());
    }

    load_config_from(&path)
}

pub fn load_config_from(path: &Path) -> Result<BubblesConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: BubblesConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

fn generate_default_config(path: &Path) {
    let default_content = r#"# Bubbles Configuration
# All settings are optional. Defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# default_screen = "messaging"       # "messaging" or "goals"
# banner_seconds = 3                 # how long the connectivity banner stays up

# [permissions]
# microphone = true                  # answer to the microphone prompt
# location = true                    # answer to the location prompt

# [location]
# latitude = 37.78825                # position returned by the locator
# longitude = -122.4324

# [connectivity]
# probe_addr = "1.1.1.1:53"          # TCP address used to detect connectivity
# interval_ms = 5000
# timeout_ms = 1500

# [audio]
# recordings_dir = "recordings"      # relative to ~/.bubbles/
# player = "aplay"                   # command used to play recordings

# [[seed]]                           # initial messages, newest first
# type = "text"
# text = "Hello"

# [[seed]]
# type = "image"
# uri = "https://unsplash.it/300/300"
"#;

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("Failed to create config directory: {}", e);
            return;
        }
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
///
/// `cli_screen` is from the `--screen` flag (None = not specified).
pub fn resolve(config: &BubblesConfig, cli_screen: Option<Screen>) -> ResolvedConfig {
    // Screen: CLI → env → config → default
    let screen = cli_screen
        .or_else(|| {
            std::env::var("BUBBLES_SCREEN")
                .ok()
                .and_then(|s| s.parse().ok())
        })
        .or(config.general.default_screen)
        .unwrap_or_default();

    // Location: a partial coordinate in config is ignored
    let location = match (config.location.latitude, config.location.longitude) {
        (Some(latitude), Some(longitude)) => Some(Coordinate {
            latitude,
            longitude,
        }),
        (None, None) => Some(DEFAULT_COORDINATE),
        _ => {
            warn!("Ignoring incomplete [location] section, position requests will fail");
            None
        }
    };

    // Probe address: env → config → default
    let probe_addr = std::env::var("BUBBLES_PROBE_ADDR")
        .ok()
        .or_else(|| config.connectivity.probe_addr.clone())
        .unwrap_or_else(|| DEFAULT_PROBE_ADDR.to_string());

    // Player: env → config
    let player_command = std::env::var("BUBBLES_PLAYER")
        .ok()
        .or_else(|| config.audio.player.clone());

    let recordings_dir = resolve_recordings_dir(config.audio.recordings_dir.as_deref());

    let seed = if config.seed.is_empty() {
        demo_conversation()
    } else {
        config.seed.clone()
    };

    ResolvedConfig {
        screen,
        banner_window: Duration::from_secs(
            config
                .general
                .banner_seconds
                .unwrap_or(DEFAULT_BANNER_SECONDS),
        ),
        allow_microphone: config.permissions.microphone.unwrap_or(true),
        allow_location: config.permissions.location.unwrap_or(true),
        location,
        probe_addr,
        probe_interval: probe_millis(
            "interval_ms",
            config.connectivity.interval_ms,
            DEFAULT_PROBE_INTERVAL_MS,
            MIN_PROBE_INTERVAL_MS,
        ),
        probe_timeout: probe_millis(
            "timeout_ms",
            config.connectivity.timeout_ms,
            DEFAULT_PROBE_TIMEOUT_MS,
            MIN_PROBE_TIMEOUT_MS,
        ),
        recordings_dir,
        player_command,
        seed,
    }
}

/// Probe timings below `min` would spin the probe or always time out.
fn probe_millis(key: &str, configured: Option<u64>, default: u64, min: u64) -> Duration {
    let millis = configured.unwrap_or(default);
    if millis < min {
        warn!("[connectivity] {} = {} is too small, using {}", key, millis, min);
        return Duration::from_millis(min);
    }
    Duration::from_millis(millis)
}

/// Relative paths are anchored at `~/.bubbles/`, absolute ones are kept.
fn resolve_recordings_dir(configured: Option<&str>) -> PathBuf {
    let base = bubbles_home().unwrap_or_else(std::env::temp_dir);
    match configured {
        Some(dir) if Path::new(dir).is_absolute() => PathBuf::from(dir),
        Some(dir) => base.join(dir),
        None => base.join("recordings"),
    }
}
