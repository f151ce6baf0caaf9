//! Main application state shared by the key and render loops

use std::{
    sync::{Mutex, MutexGuard, PoisonError},
    time::Instant,
};
use tokio::sync::watch;
use tracing::{info, warn};

use super::{ChannelStatus, PressAction, PressClassifier, Timer, TimerState};
use crate::{
    config::{AppConfig, KeyColors},
    devices::{Indicators, Rgb},
};

/// One timer together with the classifier that drives it
#[derive(Debug)]
struct Channel {
    timer: Timer,
    classifier: PressClassifier,
}

/// Application state owning every timer, classifier and the key lights.
///
/// Each channel sits behind its own lock. No lock is held across an await
/// point, so a mutation from one loop is never observed half-applied by the
/// other.
pub struct AppState {
    pub title: String,
    channels: Vec<Mutex<Channel>>,
    /// Physical key index per channel
    key_indices: Vec<usize>,
    key_colors: KeyColors,
    lights: Mutex<Box<dyn Indicators>>,
    /// Server metadata
    pub start_time: Instant,
    /// Live sampling-rate estimate published by the key loop
    sampling_rate_tx: watch::Sender<f64>,
    /// Keep the receiver alive to prevent channel closure
    _sampling_rate_rx: watch::Receiver<f64>,
    /// Clean-stop flag watched by both loops
    shutdown_tx: watch::Sender<bool>,
    _shutdown_rx: watch::Receiver<bool>,
}

impl AppState {
    /// Build the timers and classifiers described by `config`
    pub fn new(config: &AppConfig, lights: Box<dyn Indicators>) -> Self {
        let channels = config
            .timer_lengths()
            .into_iter()
            .enumerate()
            .map(|(channel, length)| {
                Mutex::new(Channel {
                    timer: Timer::new(length),
                    classifier: PressClassifier::new(channel, config.key_press.long),
                })
            })
            .collect();
        let (sampling_rate_tx, sampling_rate_rx) =
            watch::channel(config.key_press.initial_sampling_rate);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        Self {
            title: config.title.clone(),
            channels,
            key_indices: config.key_indices(),
            key_colors: config.key_colors,
            lights: Mutex::new(lights),
            start_time: Instant::now(),
            sampling_rate_tx,
            _sampling_rate_rx: sampling_rate_rx,
            shutdown_tx,
            _shutdown_rx: shutdown_rx,
        }
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Physical key bound to `channel`, `None` for an unknown channel
    pub fn key_index(&self, channel: usize) -> Option<usize> {
        self.key_indices.get(channel).copied()
    }

    /// Physical key per channel, in channel order
    pub fn key_indices(&self) -> &[usize] {
        &self.key_indices
    }

    /// Snapshot of one channel's timer, `None` for an unknown channel
    pub fn get_state(&self, channel: usize) -> Option<TimerState> {
        self.channels
            .get(channel)
            .map(|slot| lock(slot).timer.state())
    }

    /// Snapshots of every channel, in channel order
    pub fn states(&self) -> Vec<TimerState> {
        self.channels
            .iter()
            .map(|slot| lock(slot).timer.state())
            .collect()
    }

    pub fn any_out_of_time(&self) -> bool {
        self.channels.iter().any(|slot| lock(slot).timer.out_of_time())
    }

    /// Run `f` against one channel's timer under its lock
    pub fn with_timer<R>(&self, channel: usize, f: impl FnOnce(&mut Timer) -> R) -> Option<R> {
        self.channels
            .get(channel)
            .map(|slot| f(&mut lock(slot).timer))
    }

    /// Feed one key sample to `channel`'s classifier, `None` for an
    /// unknown channel
    pub fn poll_channel(
        &self,
        channel: usize,
        pressed: bool,
        sampling_rate: f64,
    ) -> Option<PressAction> {
        let slot = self.channels.get(channel)?;
        let key = self.key_index(channel)?;
        let action = {
            let mut slot = lock(slot);
            let Channel { timer, classifier } = &mut *slot;
            classifier.observe(pressed, sampling_rate, timer)
        };

        if pressed {
            self.set_light(key, self.key_colors.pressed);
        }
        match action {
            PressAction::Reset => info!("Channel {} reset", channel),
            PressAction::Toggled(outcome) => info!("Channel {} toggled: {:?}", channel, outcome),
            PressAction::Released | PressAction::Held => {}
        }
        Some(action)
    }

    pub fn set_light(&self, key: usize, color: Rgb) {
        lock(&self.lights).set_pixel(key, color);
    }

    /// Light colour for a channel status
    pub fn status_light(&self, status: ChannelStatus) -> Rgb {
        match status {
            ChannelStatus::OutOfTime => self.key_colors.out_of_time,
            ChannelStatus::Running => self.key_colors.running,
            ChannelStatus::Paused => self.key_colors.paused,
            ChannelStatus::Ready => self.key_colors.ready,
        }
    }

    /// Current seconds-per-poll estimate
    pub fn sampling_rate(&self) -> f64 {
        *self.sampling_rate_tx.borrow()
    }

    pub fn publish_sampling_rate(&self, rate: f64) {
        if let Err(e) = self.sampling_rate_tx.send(rate) {
            warn!("Failed to publish sampling rate: {}", e);
        }
    }

    /// Ask both loops to exit after their current iteration
    pub fn request_stop(&self) {
        if !self.stop_requested() {
            info!("Stop requested");
        }
        self.shutdown_tx.send_replace(true);
    }

    pub fn stop_requested(&self) -> bool {
        *self.shutdown_tx.borrow()
    }

    pub fn subscribe_shutdown(&self) -> watch::Receiver<bool> {
        self.shutdown_tx.subscribe()
    }

    /// Resolve once a stop has been requested
    pub async fn wait_for_stop(&self) {
        let mut rx = self.subscribe_shutdown();
        // the sender lives in `self`, so the channel cannot close first
        let _ = rx.wait_for(|stopped| *stopped).await;
    }

    /// Calculate uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }
}

fn lock<T: ?Sized>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::devices::SharedLights;
    use std::time::Duration;

    fn app(json: &str) -> (AppState, SharedLights) {
        let config = AppConfig::from_json(json).unwrap();
        let lights = SharedLights::new(config.channel_count());
        (AppState::new(&config, Box::new(lights.clone())), lights)
    }

    #[test]
    fn builds_one_channel_per_timer() {
        let (state, _) = app(r#"{ "timers": [10, 20, 30, 40], "sound": { "end": "x" } }"#);

        assert_eq!(state.channel_count(), 4);
        assert_eq!(state.get_state(3).unwrap().length, Duration::from_secs(40));
        assert!(state.get_state(4).is_none());
        assert_eq!(state.sampling_rate(), 0.01);
    }

    #[test]
    fn reversed_keys_remap_channels_and_lights() {
        let (state, lights) = app(
            r#"{ "timers": [10, 20, 30, 40], "reverse_keys": true, "sound": { "end": "x" } }"#,
        );
        lights.set_all(Rgb(1, 1, 1));

        assert_eq!(state.key_index(0), Some(3));
        state.poll_channel(0, true, 0.01);

        assert!(state.get_state(0).unwrap().running);
        assert_eq!(lights.get(3), Some(Rgb::OFF));
        assert_eq!(lights.get(0), Some(Rgb(1, 1, 1)));
    }

    #[test]
    fn unknown_channel_is_rejected_without_panicking() {
        let (state, lights) = app(r#"{ "timers": [10, 20], "sound": { "end": "x" } }"#);
        lights.set_all(Rgb(1, 1, 1));

        assert_eq!(state.key_index(2), None);
        assert_eq!(state.poll_channel(2, true, 0.01), None);
        assert_eq!(state.poll_channel(9, false, 0.01), None);
        assert_eq!(lights.snapshot(), vec![Rgb(1, 1, 1); 2]);
        assert!(!state.get_state(0).unwrap().running);
    }

    #[test]
    fn publishes_sampling_rate() {
        let (state, _) = app(r#"{ "timers": [10], "sound": { "end": "x" } }"#);
        state.publish_sampling_rate(0.0042);
        assert_eq!(state.sampling_rate(), 0.0042);
    }

    #[tokio::test]
    async fn stop_request_wakes_waiters() {
        let (state, _) = app(r#"{ "timers": [10], "sound": { "end": "x" } }"#);
        assert!(!state.stop_requested());

        state.request_stop();
        state.wait_for_stop().await;
        assert!(state.stop_requested());
    }
}
