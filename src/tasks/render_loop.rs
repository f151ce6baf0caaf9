//! Render and alert background task

use std::{sync::Arc, time::Duration};
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};

use crate::{
    config::AppConfig,
    devices::{AlertPlayer, DisplayRenderer},
    state::{AppState, ChannelStatus},
};

/// Render loop configuration
#[derive(Debug, Clone)]
pub struct RenderSettings {
    pub refresh_interval: Duration,
    /// Sound identifier handed to the alert player
    pub sound: String,
    /// Maximum plays per out-of-time episode
    pub stop_after: u32,
}

impl RenderSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            refresh_interval: config.refresh_interval(),
            sound: config.sound.end.clone(),
            stop_after: config.sound.stop_after,
        }
    }
}

/// Caps alert plays per out-of-time episode.
///
/// The cap is shared by every channel. An episode lasts while at least one
/// timer is out of time and ends once none are.
#[derive(Debug, Clone)]
pub struct AlertGate {
    cap: u32,
    fired: u32,
}

impl AlertGate {
    pub fn new(cap: u32) -> Self {
        Self { cap, fired: 0 }
    }

    pub fn fired(&self) -> u32 {
        self.fired
    }

    /// Returns true when the alert should play this tick
    pub fn check(&mut self, any_out_of_time: bool) -> bool {
        if !any_out_of_time {
            if self.fired > 0 {
                debug!("Out-of-time episode over, alert count cleared");
            }
            self.fired = 0;
            return false;
        }
        if self.fired < self.cap {
            self.fired += 1;
            return true;
        }
        false
    }
}

/// One render iteration: lights, screen, then the alert check
pub fn render_tick<D, A>(
    state: &AppState,
    display: &mut D,
    alert: &mut A,
    gate: &mut AlertGate,
    sound: &str,
) where
    D: DisplayRenderer + ?Sized,
    A: AlertPlayer + ?Sized,
{
    for (channel, &key) in state.key_indices().iter().enumerate() {
        let Some(timer_state) = state.get_state(channel) else { continue };
        let status = ChannelStatus::of(&timer_state);
        state.set_light(key, state.status_light(status));
        display.update(&timer_state, channel);
    }
    display.show_sampling_rate(state.sampling_rate());
    display.render_frame();

    if gate.check(state.any_out_of_time()) {
        info!("Timer out of time, playing alert ({}/{})", gate.fired(), gate.cap);
        alert.play(sound);
    }
}

/// Background task that refreshes the screen and lights and plays the alert
pub async fn render_loop_task<D, A>(
    state: Arc<AppState>,
    mut display: D,
    mut alert: A,
    settings: RenderSettings,
) where
    D: DisplayRenderer,
    A: AlertPlayer,
{
    info!(
        "Starting render task, refresh every {:?}",
        settings.refresh_interval
    );

    let mut gate = AlertGate::new(settings.stop_after);
    let mut shutdown_rx = state.subscribe_shutdown();
    let mut ticker = interval(settings.refresh_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        // a stop request cuts the wait short but never an iteration
        tokio::select! {
            _ = ticker.tick() => {}
            _ = shutdown_rx.changed() => {}
        }
        if state.stop_requested() {
            break;
        }
        render_tick(&state, &mut display, &mut alert, &mut gate, &settings.sound);
    }

    info!("Render task stopped");
}
