//! Tiny Timer - a four-channel countdown timer appliance
//!
//! This is the main entry point for the tiny-timer application.

use std::sync::Arc;
use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{error, info};

use tiny_timer::{
    config::{AppConfig, Cli},
    devices::{spawn_console_reader, CommandAlertPlayer, SharedKeys, SharedLights, TerminalDisplay},
    state::AppState,
    api::create_router,
    tasks::{monitor_keys_task, render_loop_task, KeyLoopSettings, RenderSettings},
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr, the timer screen owns stdout
    tracing_subscriber::fmt()
        .with_env_filter(format!("tiny_timer={},tower_http=info", cli.log_level()))
        .with_writer(std::io::stderr)
        .init();

    let config = AppConfig::load(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;

    info!("Starting tiny-timer v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration: timers={:?}s, reverse_keys={}, long_press={}s, stop_after={}",
        config.timers, config.reverse_keys, config.key_press.long, config.sound.stop_after
    );

    let lights = SharedLights::new(config.channel_count());
    let keys = SharedKeys::new(config.channel_count());
    let state = Arc::new(AppState::new(&config, Box::new(lights.clone())));

    spawn_console_reader(keys.clone(), Arc::clone(&state), config.long_press());

    let key_task = tokio::spawn(monitor_keys_task(
        Arc::clone(&state),
        keys,
        KeyLoopSettings::from_config(&config, cli.poll_interval()),
    ));
    let render_task = tokio::spawn(render_loop_task(
        Arc::clone(&state),
        TerminalDisplay::stdout(config.title.clone(), config.display_colors.clone(), lights),
        CommandAlertPlayer::new(config.sound.player.clone()),
        RenderSettings::from_config(&config),
    ));

    if let Some(addr) = cli.status_addr.as_deref() {
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("binding status server to {}", addr))?;
        info!("Status server running on http://{}", addr);

        let app = create_router(Arc::clone(&state));
        let server_state = Arc::clone(&state);
        tokio::spawn(async move {
            let server = axum::serve(listener, app)
                .with_graceful_shutdown(async move { server_state.wait_for_stop().await });
            if let Err(e) = server.await {
                error!("Status server error: {}", e);
            }
        });
    }

    tokio::select! {
        result = shutdown_signal() => match result {
            Ok(()) => {
                info!("Shutdown signal received");
                state.request_stop();
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
                state.wait_for_stop().await;
            }
        },
        _ = state.wait_for_stop() => {}
    }

    for (name, task) in [("key monitor", key_task), ("render", render_task)] {
        if let Err(e) = task.await {
            error!("{} task failed: {}", name, e);
        }
    }

    info!("Shutdown complete");
    Ok(())
}
