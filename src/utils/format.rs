//! Time formatting helpers

use std::time::Duration;

/// Format a duration as `HH:MM:SS`, rounding partial seconds up so a
/// countdown only reads `00:00:00` once it has actually run out
pub fn format_hms(duration: Duration) -> String {
    let mut total = duration.as_secs();
    if duration.subsec_nanos() > 0 {
        total += 1;
    }
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}
