//! State management module
//!
//! This module contains the timers, the key press classifiers that drive them
//! and the shared application state both loops work on.

pub mod app_state;
pub mod press;
pub mod sampling;
pub mod status;
pub mod timer;

// Re-export main types
pub use app_state::AppState;
pub use press::{PressAction, PressClassifier};
pub use sampling::SampleScheduler;
pub use status::ChannelStatus;
pub use timer::{Timer, TimerError, TimerState, ToggleOutcome};
