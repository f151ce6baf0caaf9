mod common;

use std::time::Duration;

use common::{app, config_json, RecordingAlert, RecordingDisplay};
use tiny_timer::{
    config::KeyColors,
    tasks::{render_tick, AlertGate},
};
use tokio::time::advance;

#[tokio::test(start_paused = true)]
async fn alert_fires_at_most_stop_after_times_per_episode() {
    let (state, _) = app(&config_json(&[1, 1], 2));
    for channel in 0..2 {
        state.with_timer(channel, |timer| timer.toggle());
    }
    advance(Duration::from_secs(2)).await;

    let mut display = RecordingDisplay::default();
    let mut alert = RecordingAlert::default();
    let mut gate = AlertGate::new(2);
    for _ in 0..5 {
        render_tick(&state, &mut display, &mut alert, &mut gate, "end.wav");
    }

    assert_eq!(alert.play_count(), 2);
    assert_eq!(alert.played.lock().unwrap()[0], "end.wav");
    assert_eq!(display.frame_count(), 5);
}

#[tokio::test(start_paused = true)]
async fn new_episode_after_all_timers_clear_alerts_again() {
    let (state, _) = app(&config_json(&[1, 5], 1));
    let mut display = RecordingDisplay::default();
    let mut alert = RecordingAlert::default();
    let mut gate = AlertGate::new(1);

    state.with_timer(0, |timer| timer.toggle());
    advance(Duration::from_secs(1)).await;
    render_tick(&state, &mut display, &mut alert, &mut gate, "end.wav");
    render_tick(&state, &mut display, &mut alert, &mut gate, "end.wav");
    assert_eq!(alert.play_count(), 1);

    // a second timer expiring during the same episode stays silent
    state.with_timer(1, |timer| timer.toggle());
    advance(Duration::from_secs(5)).await;
    render_tick(&state, &mut display, &mut alert, &mut gate, "end.wav");
    assert_eq!(alert.play_count(), 1);

    for channel in 0..2 {
        state.with_timer(channel, |timer| timer.reset());
    }
    render_tick(&state, &mut display, &mut alert, &mut gate, "end.wav");
    assert_eq!(gate.fired(), 0);

    state.with_timer(1, |timer| timer.toggle());
    advance(Duration::from_secs(6)).await;
    render_tick(&state, &mut display, &mut alert, &mut gate, "end.wav");
    assert_eq!(alert.play_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn lights_follow_status_precedence() {
    let (state, lights) = app(&config_json(&[10, 10, 10, 1], 3));
    let colors = KeyColors::default();

    state.with_timer(1, |timer| timer.toggle());
    state.with_timer(2, |timer| timer.toggle());
    state.with_timer(3, |timer| timer.toggle());
    advance(Duration::from_secs(2)).await;
    state.with_timer(2, |timer| timer.toggle());

    let mut display = RecordingDisplay::default();
    let mut alert = RecordingAlert::default();
    render_tick(&state, &mut display, &mut alert, &mut AlertGate::new(3), "end.wav");

    assert_eq!(
        lights.snapshot(),
        vec![colors.ready, colors.running, colors.paused, colors.out_of_time]
    );
    let frames = display.frames.lock().unwrap();
    assert_eq!(frames[0].states.len(), 4);
    assert_eq!(frames[0].sampling_rate, 0.01);
}
