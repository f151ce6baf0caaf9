//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use chrono::Utc;
use tracing::debug;

use crate::state::AppState;
use super::responses::{ChannelResponse, HealthResponse, StatusResponse};

/// Handle GET /status - Return every channel's snapshot
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let channels = state
        .states()
        .iter()
        .zip(state.key_indices())
        .enumerate()
        .map(|(channel, (timer_state, &key))| ChannelResponse::new(channel, key, timer_state))
        .collect();

    Json(StatusResponse {
        title: state.title.clone(),
        channels,
        sampling_rate: state.sampling_rate(),
        uptime: state.get_uptime(),
        timestamp: Utc::now(),
    })
}

/// Handle GET /status/:channel - Return one channel's snapshot
pub async fn channel_handler(
    State(state): State<Arc<AppState>>,
    Path(channel): Path<usize>,
) -> Result<Json<ChannelResponse>, StatusCode> {
    match state.get_state(channel).zip(state.key_index(channel)) {
        Some((timer_state, key)) => Ok(Json(ChannelResponse::new(channel, key, &timer_state))),
        None => {
            debug!("Status requested for unknown channel {}", channel);
            Err(StatusCode::NOT_FOUND)
        }
    }
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
