//! Hardware collaborators
//!
//! The timer core talks to keys, lights, the screen and the speaker only
//! through the traits below. Host implementations live in the submodules.

pub mod color;
pub mod keys;
pub mod lights;
pub mod sound;
pub mod terminal;

use crate::state::TimerState;

pub use color::Rgb;
pub use keys::{spawn_console_reader, KeyCommand, SharedKeys};
pub use lights::SharedLights;
pub use sound::CommandAlertPlayer;
pub use terminal::TerminalDisplay;

/// Source of raw key signals, sampled once per poll cycle
pub trait InputDevice: Send {
    /// Whether physical key `key` currently reads as pressed
    fn poll(&mut self, key: usize) -> bool;
}

/// Per-key status lights
pub trait Indicators: Send {
    fn set_pixel(&mut self, key: usize, color: Rgb);
}

/// Screen showing every channel
pub trait DisplayRenderer: Send {
    /// Stage the latest snapshot for `channel`
    fn update(&mut self, state: &TimerState, channel: usize);

    /// Stage the diagnostic poll-period readout
    fn show_sampling_rate(&mut self, sampling_rate: f64);

    /// Push everything staged since the last frame to the screen
    fn render_frame(&mut self);
}

/// Plays the out-of-time sound
pub trait AlertPlayer: Send {
    fn play(&mut self, sound: &str);
}
