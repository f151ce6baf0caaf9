//! Debounced short/long press interpretation for one key channel

use tracing::debug;

use super::timer::{Timer, ToggleOutcome};

/// What a single poll of the key did to the bound timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressAction {
    /// Key is up; the classifier is armed for the next press
    Released,
    /// Key is down but this poll issued nothing
    Held,
    Toggled(ToggleOutcome),
    Reset,
}

/// Turns a raw per-poll "pressed" signal into timer commands.
///
/// The first pressed poll of a press toggles the timer. Holding the key for
/// longer than `long_press_threshold` resets it, and keeps resetting it once
/// per threshold interval while the key stays down.
#[derive(Debug, Clone)]
pub struct PressClassifier {
    channel: usize,
    consecutive_press_count: u32,
    debounce_latched: bool,
    long_press_threshold: f64,
}

impl PressClassifier {
    /// `long_press_threshold` is in seconds
    pub fn new(channel: usize, long_press_threshold: f64) -> Self {
        Self {
            channel,
            consecutive_press_count: 0,
            debounce_latched: false,
            long_press_threshold,
        }
    }

    pub fn channel(&self) -> usize {
        self.channel
    }

    pub fn consecutive_press_count(&self) -> u32 {
        self.consecutive_press_count
    }

    pub fn is_latched(&self) -> bool {
        self.debounce_latched
    }

    /// Feed one poll sample. `sampling_rate` is the current estimate of
    /// seconds per poll and may be zero before the first measurement.
    pub fn observe(&mut self, pressed: bool, sampling_rate: f64, timer: &mut Timer) -> PressAction {
        if !pressed {
            self.consecutive_press_count = 0;
            self.debounce_latched = false;
            return PressAction::Released;
        }

        self.consecutive_press_count += 1;
        let held_for = f64::from(self.consecutive_press_count) * sampling_rate;

        // long press wins over toggle and only one of them fires per poll
        let action = if held_for > self.long_press_threshold {
            debug!(
                "Channel {} long press ({:.3}s), resetting timer",
                self.channel, held_for
            );
            timer.reset();
            self.consecutive_press_count = 0;
            PressAction::Reset
        } else if !self.debounce_latched {
            let outcome = timer.toggle();
            debug!("Channel {} short press, toggle {:?}", self.channel, outcome);
            PressAction::Toggled(outcome)
        } else {
            PressAction::Held
        };

        self.debounce_latched = true;
        action
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    const RATE: f64 = 0.01;

    fn feed(
        classifier: &mut PressClassifier,
        timer: &mut Timer,
        pressed: bool,
        polls: usize,
    ) -> Vec<PressAction> {
        (0..polls)
            .map(|_| classifier.observe(pressed, RATE, timer))
            .collect()
    }

    #[test]
    fn short_press_toggles_exactly_once() {
        let mut timer = Timer::new(Duration::from_secs(30));
        let mut classifier = PressClassifier::new(0, 0.5);

        let actions = feed(&mut classifier, &mut timer, true, 3);
        assert_eq!(
            actions,
            vec![
                PressAction::Toggled(ToggleOutcome::Started),
                PressAction::Held,
                PressAction::Held,
            ]
        );
        assert_eq!(classifier.observe(false, RATE, &mut timer), PressAction::Released);
        assert!(timer.is_running());
        assert!(!classifier.is_latched());
        assert_eq!(classifier.consecutive_press_count(), 0);
    }

    #[test]
    fn each_new_press_toggles_again() {
        let mut timer = Timer::new(Duration::from_secs(30));
        let mut classifier = PressClassifier::new(2, 0.5);

        feed(&mut classifier, &mut timer, true, 2);
        feed(&mut classifier, &mut timer, false, 1);
        let actions = feed(&mut classifier, &mut timer, true, 2);

        assert_eq!(actions[0], PressAction::Toggled(ToggleOutcome::Paused));
        assert!(!timer.is_running());
    }

    #[test]
    fn long_press_resets_the_timer() {
        let mut timer = Timer::new(Duration::from_secs(30));
        let mut classifier = PressClassifier::new(0, 0.5);

        let actions = feed(&mut classifier, &mut timer, true, 60);
        let resets: Vec<usize> = actions
            .iter()
            .enumerate()
            .filter(|(_, action)| **action == PressAction::Reset)
            .map(|(poll, _)| poll)
            .collect();

        assert_eq!(resets.len(), 1);
        assert!((49..=50).contains(&resets[0]), "reset fired at poll {}", resets[0]);
        let toggles = actions
            .iter()
            .filter(|action| matches!(action, PressAction::Toggled(_)))
            .count();
        assert_eq!(toggles, 1, "only the press-down poll toggles");

        let state = timer.state();
        assert!(!state.running);
        assert_eq!(state.remaining, state.length);
    }

    #[test]
    fn held_key_resets_once_per_threshold_interval() {
        let mut timer = Timer::new(Duration::from_secs(30));
        let mut classifier = PressClassifier::new(1, 0.5);

        let actions = feed(&mut classifier, &mut timer, true, 160);
        let resets = actions.iter().filter(|a| **a == PressAction::Reset).count();
        assert_eq!(resets, 3);
        assert!(actions.iter().skip(1).all(|a| !matches!(a, PressAction::Toggled(_))));
    }

    #[test]
    fn long_press_precedes_toggle_in_the_same_poll() {
        let mut timer = Timer::new(Duration::from_secs(30));
        // a single slow poll already exceeds the threshold
        let mut classifier = PressClassifier::new(0, 0.5);

        assert_eq!(classifier.observe(true, 1.0, &mut timer), PressAction::Reset);
        assert!(!timer.is_running());
        assert!(classifier.is_latched());
        assert_eq!(classifier.observe(true, 0.01, &mut timer), PressAction::Held);
    }

    #[test]
    fn zero_sampling_rate_never_reports_long_press() {
        let mut timer = Timer::new(Duration::from_secs(30));
        let mut classifier = PressClassifier::new(0, 0.5);

        let actions: Vec<PressAction> = (0..500)
            .map(|_| classifier.observe(true, 0.0, &mut timer))
            .collect();
        assert!(actions.iter().all(|a| *a != PressAction::Reset));
    }
}
