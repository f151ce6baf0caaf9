//! Configuration and CLI argument handling

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use clap::Parser;
use serde::Deserialize;
use thiserror::Error;

use crate::devices::Rgb;

/// Number of physical keys on the device
pub const MAX_CHANNELS: usize = 4;

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "tiny-timer")]
#[command(about = "A four-channel countdown timer with short/long press keys")]
#[command(version)]
pub struct Cli {
    /// Path to the JSON device configuration
    #[arg(short, long, default_value = "config.json")]
    pub config: PathBuf,

    /// Serve a read-only status page on this address (e.g. 127.0.0.1:20554)
    #[arg(long)]
    pub status_addr: Option<String>,

    /// Sleep between key polls in milliseconds. 0 only yields, which polls
    /// fastest but keeps one core busy
    #[arg(long, default_value = "1")]
    pub poll_interval_ms: u64,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Static device configuration, loaded once before the loops start
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_title")]
    pub title: String,
    /// Per-channel duration in seconds
    pub timers: Vec<u64>,
    #[serde(default)]
    pub reverse_keys: bool,
    #[serde(default)]
    pub key_press: KeyPressConfig,
    pub sound: SoundConfig,
    /// Seconds between render/alert iterations
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval: f64,
    #[serde(default)]
    pub display_colors: DisplayColors,
    #[serde(default)]
    pub key_colors: KeyColors,
}

#[derive(Debug, Clone, Deserialize)]
pub struct KeyPressConfig {
    /// Long-press threshold in seconds
    #[serde(default = "default_long_press")]
    pub long: f64,
    /// Polls per sampling-rate window
    #[serde(default = "default_refresh_every")]
    pub refresh_every: u32,
    #[serde(default = "default_initial_sampling_rate")]
    pub initial_sampling_rate: f64,
}

impl Default for KeyPressConfig {
    fn default() -> Self {
        Self {
            long: default_long_press(),
            refresh_every: default_refresh_every(),
            initial_sampling_rate: default_initial_sampling_rate(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SoundConfig {
    pub end: String,
    /// Maximum alert plays per out-of-time episode
    #[serde(default = "default_stop_after")]
    pub stop_after: u32,
    /// External command that plays `end`; the terminal bell is used without one
    #[serde(default)]
    pub player: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct StatusColors {
    pub fill: Rgb,
    pub border: Rgb,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DisplayColors {
    pub background: Rgb,
    pub header: Rgb,
    pub text: Rgb,
    pub ready: StatusColors,
    pub running: StatusColors,
    pub paused: StatusColors,
    pub out_of_time: StatusColors,
}

impl Default for DisplayColors {
    fn default() -> Self {
        let green = StatusColors {
            fill: Rgb(169, 206, 128),
            border: Rgb::from_hex(0x96c95b),
        };
        Self {
            background: Rgb::from_hex(0x9E6E57),
            header: Rgb::from_hex(0xDAAE46),
            text: Rgb::from_hex(0xFFFFFF),
            ready: green,
            running: green,
            paused: StatusColors {
                fill: Rgb(251, 221, 4),
                border: Rgb::from_hex(0xc4ad00),
            },
            out_of_time: StatusColors {
                fill: Rgb(252, 118, 121),
                border: Rgb::from_hex(0xe35456),
            },
        }
    }
}

/// Key light colours per channel status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct KeyColors {
    pub ready: Rgb,
    pub running: Rgb,
    pub paused: Rgb,
    pub out_of_time: Rgb,
    /// Shown while the key is held down
    pub pressed: Rgb,
}

impl Default for KeyColors {
    fn default() -> Self {
        Self {
            ready: Rgb(36, 200, 36),
            running: Rgb(253, 164, 119),
            paused: Rgb(122, 122, 6),
            out_of_time: Rgb(200, 24, 15),
            pressed: Rgb::OFF,
        }
    }
}

fn default_title() -> String {
    "tiny timer".to_string()
}

fn default_refresh_interval() -> f64 {
    0.8
}

fn default_long_press() -> f64 {
    0.5
}

fn default_refresh_every() -> u32 {
    crate::state::sampling::DEFAULT_REFRESH_EVERY
}

fn default_initial_sampling_rate() -> f64 {
    0.01
}

fn default_stop_after() -> u32 {
    3
}

impl AppConfig {
    /// Read, parse and validate a config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Parse and validate config JSON
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timers.is_empty() || self.timers.len() > MAX_CHANNELS {
            return Err(ConfigError::Invalid(format!(
                "expected 1 to {} timers, got {}",
                MAX_CHANNELS,
                self.timers.len()
            )));
        }
        if let Some(channel) = self.timers.iter().position(|&length| length == 0) {
            return Err(ConfigError::Invalid(format!(
                "timer {} has zero length",
                channel
            )));
        }
        if !is_positive(self.key_press.long) {
            return Err(ConfigError::Invalid(format!(
                "key_press.long must be a positive number of seconds, got {}",
                self.key_press.long
            )));
        }
        if self.key_press.refresh_every == 0 {
            return Err(ConfigError::Invalid(
                "key_press.refresh_every must be at least 1".to_string(),
            ));
        }
        if !self.key_press.initial_sampling_rate.is_finite()
            || self.key_press.initial_sampling_rate < 0.0
        {
            return Err(ConfigError::Invalid(format!(
                "key_press.initial_sampling_rate must be >= 0, got {}",
                self.key_press.initial_sampling_rate
            )));
        }
        if !is_positive(self.refresh_interval) {
            return Err(ConfigError::Invalid(format!(
                "refresh_interval must be a positive number of seconds, got {}",
                self.refresh_interval
            )));
        }
        Ok(())
    }

    pub fn channel_count(&self) -> usize {
        self.timers.len()
    }

    pub fn timer_lengths(&self) -> Vec<Duration> {
        self.timers.iter().map(|&secs| Duration::from_secs(secs)).collect()
    }

    /// Physical key index for each channel
    pub fn key_indices(&self) -> Vec<usize> {
        let mut keys: Vec<usize> = (0..self.channel_count()).collect();
        if self.reverse_keys {
            keys.reverse();
        }
        keys
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs_f64(self.refresh_interval)
    }

    pub fn long_press(&self) -> Duration {
        Duration::from_secs_f64(self.key_press.long)
    }
}

/// Positive and representable as a `Duration`
fn is_positive(value: f64) -> bool {
    value > 0.0 && Duration::try_from_secs_f64(value).is_ok()
}
