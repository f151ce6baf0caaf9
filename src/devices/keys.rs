//! Console-driven key input
//!
//! Each typed line presses a key: `2` taps key 2, `2!` holds it past the
//! long-press threshold, `q` stops the device. Keys are numbered from 1.

use std::{
    io::BufRead,
    sync::{
        atomic::{AtomicBool, AtomicU64, Ordering},
        Arc,
    },
    time::Duration,
};
use tokio::{sync::mpsc, time::sleep};
use tracing::{debug, info, warn};

use super::InputDevice;
use crate::state::AppState;

/// How long a tap keeps the key down
pub const TAP_DURATION: Duration = Duration::from_millis(100);
/// Extra hold time beyond the long-press threshold
const LONG_PRESS_MARGIN: Duration = Duration::from_millis(250);

/// Pressed flags shared between whoever presses keys and the key loop
#[derive(Debug, Clone)]
pub struct SharedKeys {
    pressed: Arc<Vec<AtomicBool>>,
    /// Latest hold per key; only that hold may release the key
    holds: Arc<Vec<AtomicU64>>,
}

impl SharedKeys {
    pub fn new(keys: usize) -> Self {
        Self {
            pressed: Arc::new((0..keys).map(|_| AtomicBool::new(false)).collect()),
            holds: Arc::new((0..keys).map(|_| AtomicU64::new(0)).collect()),
        }
    }

    pub fn key_count(&self) -> usize {
        self.pressed.len()
    }

    pub fn set(&self, key: usize, pressed: bool) {
        if let Some(flag) = self.pressed.get(key) {
            flag.store(pressed, Ordering::Release);
        }
    }

    pub fn is_pressed(&self, key: usize) -> bool {
        self.pressed
            .get(key)
            .is_some_and(|flag| flag.load(Ordering::Acquire))
    }

    /// Hold `key` down for `duration`, then release it. A newer hold on the
    /// same key extends the press instead of being cut short by this one.
    pub async fn hold(&self, key: usize, duration: Duration) {
        let Some(latest) = self.holds.get(key) else { return };
        let this_hold = latest.fetch_add(1, Ordering::AcqRel) + 1;

        self.set(key, true);
        sleep(duration).await;
        if latest.load(Ordering::Acquire) == this_hold {
            self.set(key, false);
        }
    }
}

impl InputDevice for SharedKeys {
    fn poll(&mut self, key: usize) -> bool {
        self.is_pressed(key)
    }
}

/// One console command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    Tap(usize),
    LongPress(usize),
    Quit,
}

impl KeyCommand {
    /// Parse a console line against a device with `keys` keys. Returned key
    /// indices are zero-based.
    pub fn parse(line: &str, keys: usize) -> Result<Self, String> {
        let line = line.trim();
        if line.eq_ignore_ascii_case("q") || line.eq_ignore_ascii_case("quit") {
            return Ok(KeyCommand::Quit);
        }

        let (digits, long) = match line.strip_suffix('!') {
            Some(digits) => (digits.trim_end(), true),
            None => (line, false),
        };
        let number: usize = digits
            .parse()
            .map_err(|_| format!("unrecognised command '{}'", line))?;
        if number == 0 || number > keys {
            return Err(format!("key {} out of range 1..={}", number, keys));
        }

        let key = number - 1;
        Ok(if long { KeyCommand::LongPress(key) } else { KeyCommand::Tap(key) })
    }
}

/// Read key commands from stdin and apply them to `keys`.
///
/// Stdin is read on a plain thread so a pending read never holds up runtime
/// shutdown.
pub fn spawn_console_reader(keys: SharedKeys, state: Arc<AppState>, long_press: Duration) {
    let (tx, mut rx) = mpsc::channel::<String>(16);

    let reader = std::thread::Builder::new()
        .name("console-keys".to_string())
        .spawn(move || {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                match line {
                    Ok(line) => {
                        if tx.blocking_send(line).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        warn!("Failed to read console input: {}", e);
                        break;
                    }
                }
            }
        });
    if let Err(e) = reader {
        warn!("Failed to start console reader: {}", e);
        return;
    }

    tokio::spawn(async move {
        info!("Console keys ready: N taps key N, N! long-presses it, q quits");
        while let Some(line) = rx.recv().await {
            if line.trim().is_empty() {
                continue;
            }
            match KeyCommand::parse(&line, keys.key_count()) {
                Ok(KeyCommand::Quit) => {
                    state.request_stop();
                    break;
                }
                Ok(KeyCommand::Tap(key)) => {
                    debug!("Console tap on key {}", key);
                    let keys = keys.clone();
                    tokio::spawn(async move { keys.hold(key, TAP_DURATION).await });
                }
                Ok(KeyCommand::LongPress(key)) => {
                    debug!("Console long press on key {}", key);
                    let keys = keys.clone();
                    let duration = long_press + LONG_PRESS_MARGIN;
                    tokio::spawn(async move { keys.hold(key, duration).await });
                }
                Err(e) => warn!("{}", e),
            }
        }
    });
}
