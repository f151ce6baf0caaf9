//! Countdown timer state machine and its snapshot type

use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;

/// Contract violations raised by direct `start`/`pause` calls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TimerError {
    #[error("timer is already running, pause it first")]
    AlreadyRunning,
    #[error("timer is not running, start it first")]
    NotRunning,
}

/// Immutable snapshot of a timer at one instant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimerState {
    pub remaining: Duration,
    pub running: bool,
    pub out_of_time: bool,
    pub length: Duration,
}

impl TimerState {
    /// Whether some of the configured length has been consumed
    pub fn is_partially_consumed(&self) -> bool {
        self.remaining < self.length
    }
}

/// What a `toggle` call ended up doing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Started,
    Paused,
    /// The timer had already run out; nothing changed
    Ignored,
}

/// Single countdown timer.
///
/// Remaining time is derived from wall-clock deltas on every read instead of
/// being decremented on a tick, so irregular polling never causes drift.
#[derive(Debug, Clone)]
pub struct Timer {
    length: Duration,
    working_length: Duration,
    start_time: Option<Instant>,
    running: bool,
}

impl Timer {
    /// Create a fresh, paused timer
    pub fn new(length: Duration) -> Self {
        Self {
            length,
            working_length: length,
            start_time: None,
            running: false,
        }
    }

    pub fn length(&self) -> Duration {
        self.length
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Begin a run segment
    pub fn start(&mut self) -> Result<(), TimerError> {
        if self.start_time.is_some() {
            return Err(TimerError::AlreadyRunning);
        }
        self.begin_segment();
        Ok(())
    }

    /// End the active run segment, banking the elapsed time
    pub fn pause(&mut self) -> Result<(), TimerError> {
        match self.start_time {
            Some(started) => {
                self.end_segment(started);
                Ok(())
            }
            None => Err(TimerError::NotRunning),
        }
    }

    /// Start when paused, pause when running. A finished timer is left alone
    /// so that a short press cannot restart it.
    pub fn toggle(&mut self) -> ToggleOutcome {
        if self.out_of_time() {
            return ToggleOutcome::Ignored;
        }
        match self.start_time {
            Some(started) => {
                self.end_segment(started);
                ToggleOutcome::Paused
            }
            None => {
                self.begin_segment();
                ToggleOutcome::Started
            }
        }
    }

    /// Return to the full configured length, stopped, from any state
    pub fn reset(&mut self) {
        self.start_time = None;
        self.working_length = self.length;
        self.running = false;
    }

    /// Take a snapshot of the timer
    pub fn state(&self) -> TimerState {
        let remaining = self.remaining();
        assert!(
            remaining <= self.length,
            "remaining {:?} exceeds timer length {:?}",
            remaining,
            self.length
        );
        TimerState {
            remaining,
            running: self.running,
            out_of_time: remaining.is_zero(),
            length: self.length,
        }
    }

    /// Cheaper than `state()` when only expiry matters
    pub fn out_of_time(&self) -> bool {
        self.remaining().is_zero()
    }

    fn remaining(&self) -> Duration {
        match self.start_time {
            None => self.working_length,
            Some(started) => self.working_length.saturating_sub(started.elapsed()),
        }
    }

    fn begin_segment(&mut self) {
        self.start_time = Some(Instant::now());
        self.running = true;
    }

    fn end_segment(&mut self, started: Instant) {
        self.working_length = self.working_length.saturating_sub(started.elapsed());
        self.start_time = None;
        self.running = false;
    }
}
