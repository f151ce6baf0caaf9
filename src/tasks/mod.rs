//! Background tasks module
//!
//! The key sampling loop and the render/alert loop run as two tasks over
//! the same `AppState`.

pub mod monitor_keys;
pub mod render_loop;

// Re-export main functions
pub use monitor_keys::{monitor_keys_task, KeyLoopSettings};
pub use render_loop::{render_loop_task, render_tick, AlertGate, RenderSettings};
