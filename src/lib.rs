//! Tiny Timer - a four-channel countdown timer appliance
//!
//! Each key starts, pauses or resets its own timer with short and long
//! presses. A fast key sampling loop and a slower render/alert loop share
//! the timers through `AppState`.

pub mod config;
pub mod state;
pub mod api;
pub mod devices;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::{AppConfig, Cli};
pub use state::{AppState, Timer, TimerState};
pub use api::create_router;
pub use utils::signals::shutdown_signal;
