//! ANSI terminal rendition of the timer screen

use std::{fmt::Write as _, io::Write};

use tracing::warn;

use super::{DisplayRenderer, SharedLights};
use crate::{
    config::{DisplayColors, StatusColors},
    state::{ChannelStatus, TimerState},
    utils::format_hms,
};

const GAUGE_WIDTH: usize = 20;
const RESET: &str = "\x1b[0m";

/// Draws the header, one gauge row per channel and the key lights.
pub struct TerminalDisplay {
    out: Box<dyn Write + Send>,
    title: String,
    colors: DisplayColors,
    lights: SharedLights,
    staged: Vec<Option<TimerState>>,
    sampling_rate: f64,
    clear_screen: bool,
}

impl TerminalDisplay {
    pub fn new(out: Box<dyn Write + Send>, title: String, colors: DisplayColors, lights: SharedLights) -> Self {
        Self {
            out,
            title,
            colors,
            lights,
            staged: Vec::new(),
            sampling_rate: 0.0,
            clear_screen: true,
        }
    }

    /// Display on stdout
    pub fn stdout(title: String, colors: DisplayColors, lights: SharedLights) -> Self {
        Self::new(Box::new(std::io::stdout()), title, colors, lights)
    }

    /// Append frames instead of redrawing in place
    pub fn without_clearing(mut self) -> Self {
        self.clear_screen = false;
        self
    }

    fn status_colors(&self, status: ChannelStatus) -> StatusColors {
        match status {
            ChannelStatus::OutOfTime => self.colors.out_of_time,
            ChannelStatus::Running => self.colors.running,
            ChannelStatus::Paused => self.colors.paused,
            ChannelStatus::Ready => self.colors.ready,
        }
    }

    fn compose(&self) -> String {
        let mut frame = String::new();
        if self.clear_screen {
            frame.push_str("\x1b[2J\x1b[H");
        }

        let background = self.colors.background.ansi_bg();
        let text = self.colors.text.ansi_fg();
        let _ = writeln!(
            frame,
            "{}{} FR: {:0.4}   {} {}",
            self.colors.header.ansi_bg(),
            text,
            self.sampling_rate,
            self.title,
            RESET
        );

        for (channel, state) in self.staged.iter().enumerate() {
            let Some(state) = state else { continue };
            let status = ChannelStatus::of(state);
            let palette = self.status_colors(status);
            let _ = writeln!(
                frame,
                "{}{} [{}] {} {}\u{2595}{}{}{}\u{258f}{} {}{}",
                background,
                text,
                channel + 1,
                format_hms(state.remaining),
                palette.border.ansi_fg(),
                palette.fill.ansi_fg(),
                gauge(state),
                palette.border.ansi_fg(),
                text,
                status_label(status),
                RESET,
            );
        }

        frame.push_str(" keys:");
        for color in self.lights.snapshot() {
            let _ = write!(frame, " {}\u{25cf}{}", color.ansi_fg(), RESET);
        }
        frame.push('\n');
        frame
    }
}

impl DisplayRenderer for TerminalDisplay {
    fn update(&mut self, state: &TimerState, channel: usize) {
        if self.staged.len() <= channel {
            self.staged.resize(channel + 1, None);
        }
        self.staged[channel] = Some(*state);
    }

    fn show_sampling_rate(&mut self, sampling_rate: f64) {
        self.sampling_rate = sampling_rate;
    }

    fn render_frame(&mut self) {
        let frame = self.compose();
        if let Err(e) = self
            .out
            .write_all(frame.as_bytes())
            .and_then(|_| self.out.flush())
        {
            warn!("Failed to draw frame: {}", e);
        }
    }
}

/// Remaining-time gauge, full when the timer is fresh
fn gauge(state: &TimerState) -> String {
    let filled = if state.length.is_zero() {
        0
    } else {
        let fraction = state.remaining.as_secs_f64() / state.length.as_secs_f64();
        ((fraction * GAUGE_WIDTH as f64).round() as usize).min(GAUGE_WIDTH)
    };
    let mut bar = "\u{2588}".repeat(filled);
    bar.push_str(&"\u{2591}".repeat(GAUGE_WIDTH - filled));
    bar
}

fn status_label(status: ChannelStatus) -> &'static str {
    match status {
        ChannelStatus::Ready => "ready",
        ChannelStatus::Running => "running",
        ChannelStatus::Paused => "paused",
        ChannelStatus::OutOfTime => "out of time",
    }
}
