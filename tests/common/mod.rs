//! Recording collaborators shared by the integration tests

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use tiny_timer::{
    config::AppConfig,
    devices::{AlertPlayer, DisplayRenderer, SharedLights},
    state::{AppState, TimerState},
};

/// Build an app from inline config JSON, returning the lights it drives
pub fn app(json: &str) -> (Arc<AppState>, SharedLights) {
    let config = AppConfig::from_json(json).expect("test config should be valid");
    let lights = SharedLights::new(config.channel_count());
    let state = Arc::new(AppState::new(&config, Box::new(lights.clone())));
    (state, lights)
}

/// Config with the given timer lengths and alert cap
pub fn config_json(timers: &[u64], stop_after: u32) -> String {
    let timers: Vec<String> = timers.iter().map(u64::to_string).collect();
    format!(
        r#"{{ "timers": [{}], "key_press": {{ "long": 0.5 }}, "sound": {{ "end": "end.wav", "stop_after": {} }} }}"#,
        timers.join(", "),
        stop_after
    )
}

#[derive(Debug, Default)]
pub struct Frame {
    pub states: Vec<(usize, TimerState)>,
    pub sampling_rate: f64,
}

/// Display that keeps every rendered frame
#[derive(Debug, Clone, Default)]
pub struct RecordingDisplay {
    pending: Arc<Mutex<Frame>>,
    pub frames: Arc<Mutex<Vec<Frame>>>,
}

impl RecordingDisplay {
    pub fn frame_count(&self) -> usize {
        self.frames.lock().unwrap().len()
    }
}

impl DisplayRenderer for RecordingDisplay {
    fn update(&mut self, state: &TimerState, channel: usize) {
        self.pending.lock().unwrap().states.push((channel, *state));
    }

    fn show_sampling_rate(&mut self, sampling_rate: f64) {
        self.pending.lock().unwrap().sampling_rate = sampling_rate;
    }

    fn render_frame(&mut self) {
        let frame = std::mem::take(&mut *self.pending.lock().unwrap());
        self.frames.lock().unwrap().push(frame);
    }
}

/// Alert player that records every sound it was asked to play
#[derive(Debug, Clone, Default)]
pub struct RecordingAlert {
    pub played: Arc<Mutex<Vec<String>>>,
}

impl RecordingAlert {
    pub fn play_count(&self) -> usize {
        self.played.lock().unwrap().len()
    }
}

impl AlertPlayer for RecordingAlert {
    fn play(&mut self, sound: &str) {
        self.played.lock().unwrap().push(sound.to_string());
    }
}
