//! API response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::{ChannelStatus, TimerState};

/// One channel as seen from the outside
#[derive(Debug, Clone, Serialize)]
pub struct ChannelResponse {
    pub channel: usize,
    /// Physical key bound to the channel
    pub key: usize,
    pub remaining_seconds: f64,
    pub length_seconds: f64,
    pub running: bool,
    pub out_of_time: bool,
    pub status: ChannelStatus,
}

impl ChannelResponse {
    pub fn new(channel: usize, key: usize, state: &TimerState) -> Self {
        Self {
            channel,
            key,
            remaining_seconds: state.remaining.as_secs_f64(),
            length_seconds: state.length.as_secs_f64(),
            running: state.running,
            out_of_time: state.out_of_time,
            status: ChannelStatus::of(state),
        }
    }
}

/// Full device status
#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    pub title: String,
    pub channels: Vec<ChannelResponse>,
    /// Average seconds per key poll
    pub sampling_rate: f64,
    pub uptime: String,
    pub timestamp: DateTime<Utc>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
