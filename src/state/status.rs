//! Display/indicator status derived from a timer snapshot

use serde::Serialize;

use super::TimerState;

/// Visual status of one channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelStatus {
    /// Fresh or reset, full length remaining
    Ready,
    Running,
    /// Stopped with part of the length consumed
    Paused,
    OutOfTime,
}

impl ChannelStatus {
    pub fn of(state: &TimerState) -> Self {
        if state.out_of_time {
            ChannelStatus::OutOfTime
        } else if state.running {
            ChannelStatus::Running
        } else if state.is_partially_consumed() {
            ChannelStatus::Paused
        } else {
            ChannelStatus::Ready
        }
    }
}
