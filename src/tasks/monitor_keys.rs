//! Key sampling background task

use std::{sync::Arc, time::Duration};
use tokio::time::sleep;
use tracing::{info, trace};

use crate::{config::AppConfig, devices::InputDevice, state::{AppState, SampleScheduler}};

/// Pacing for the key loop
#[derive(Debug, Clone)]
pub struct KeyLoopSettings {
    /// Polls per sampling-rate window
    pub refresh_every: u32,
    pub initial_sampling_rate: f64,
    /// Pause between passes; zero only yields to the other task
    pub poll_interval: Duration,
}

impl KeyLoopSettings {
    pub fn from_config(config: &AppConfig, poll_interval: Duration) -> Self {
        Self {
            refresh_every: config.key_press.refresh_every,
            initial_sampling_rate: config.key_press.initial_sampling_rate,
            poll_interval,
        }
    }
}

/// Background task that samples every key once per pass and feeds the
/// classifiers, measuring the pass period as it goes
pub async fn monitor_keys_task<I: InputDevice>(
    state: Arc<AppState>,
    mut input: I,
    settings: KeyLoopSettings,
) {
    info!("Starting key monitor task");

    let mut scheduler = SampleScheduler::new(settings.refresh_every, settings.initial_sampling_rate);

    loop {
        let sampling_rate = scheduler.sampling_rate();
        for (channel, &key) in state.key_indices().iter().enumerate() {
            let pressed = input.poll(key);
            state.poll_channel(channel, pressed, sampling_rate);
        }

        if let Some(rate) = scheduler.record_poll() {
            trace!("Sampling rate now {:.5}s per poll", rate);
            state.publish_sampling_rate(rate);
        }

        if state.stop_requested() {
            break;
        }

        if settings.poll_interval.is_zero() {
            tokio::task::yield_now().await;
        } else {
            sleep(settings.poll_interval).await;
        }
    }

    info!("Key monitor task stopped");
}
