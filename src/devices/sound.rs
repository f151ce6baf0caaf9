//! Alert sound playback through an external player command

use std::io::Write;

use tokio::process::Command;
use tracing::{debug, info, warn};

use super::AlertPlayer;

/// Plays the alert with `player <sound>`, or rings the terminal bell when no
/// player is configured. Playback runs detached from the render loop.
#[derive(Debug, Clone, Default)]
pub struct CommandAlertPlayer {
    player: Option<String>,
}

impl CommandAlertPlayer {
    pub fn new(player: Option<String>) -> Self {
        Self { player }
    }
}

impl AlertPlayer for CommandAlertPlayer {
    fn play(&mut self, sound: &str) {
        let Some(player) = self.player.as_deref() else {
            info!("Alert: {}", sound);
            let mut stdout = std::io::stdout();
            if let Err(e) = stdout.write_all(b"\x07").and_then(|_| stdout.flush()) {
                warn!("Failed to ring terminal bell: {}", e);
            }
            return;
        };

        debug!("Playing {} with {}", sound, player);
        match Command::new(player).arg(sound).kill_on_drop(false).spawn() {
            Ok(child) => {
                tokio::spawn(async move {
                    let mut child = child;
                    match child.wait().await {
                        Ok(status) if !status.success() => {
                            warn!("Alert player exited with {}", status);
                        }
                        Ok(_) => {}
                        Err(e) => warn!("Failed to wait for alert player: {}", e),
                    }
                });
            }
            Err(e) => warn!("Failed to execute alert player '{}': {}", player, e),
        }
    }
}
