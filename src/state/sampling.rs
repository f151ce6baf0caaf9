//! Rolling measurement of the input poll period

use tokio::time::Instant;

/// Default number of polls per measurement window
pub const DEFAULT_REFRESH_EVERY: u32 = 64;

/// Measures the average seconds per input poll over fixed-size windows.
///
/// The estimate only changes when a window completes, so consumers see a
/// stable value between windows.
#[derive(Debug, Clone)]
pub struct SampleScheduler {
    refresh_every: u32,
    counter: u32,
    window_start: Instant,
    sampling_rate: f64,
}

impl SampleScheduler {
    /// `initial_rate` is used until the first window completes
    pub fn new(refresh_every: u32, initial_rate: f64) -> Self {
        Self {
            refresh_every: refresh_every.max(1),
            counter: 0,
            window_start: Instant::now(),
            sampling_rate: initial_rate,
        }
    }

    /// Current estimate in seconds per poll
    pub fn sampling_rate(&self) -> f64 {
        self.sampling_rate
    }

    /// Record that one poll cycle finished. Returns the new estimate when
    /// this poll closed a window.
    pub fn record_poll(&mut self) -> Option<f64> {
        self.counter += 1;
        if self.counter < self.refresh_every {
            return None;
        }

        let now = Instant::now();
        let elapsed = now.duration_since(self.window_start).as_secs_f64();
        self.sampling_rate = elapsed / f64::from(self.refresh_every);
        self.window_start = now;
        self.counter = 0;
        Some(self.sampling_rate)
    }
}

impl Default for SampleScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_REFRESH_EVERY, 0.01)
    }
}
