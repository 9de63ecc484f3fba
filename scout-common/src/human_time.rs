//! Human-readable elapsed time formatting

use std::time::Duration;

/// Format selection thresholds (seconds)
const SHORT_FORMAT_MAX: u64 = 100; // < 100s → X.XXs
const MEDIUM_FORMAT_MAX: u64 = 6000; // < 100m → M:SS.Xs
                                     // >= 100m → H:MM:SS

/// Format a wall-clock duration for display
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use scout_common::human_time::format_elapsed;
///
/// assert_eq!(format_elapsed(Duration::from_millis(1500)), "1.50s");
/// assert_eq!(format_elapsed(Duration::from_secs(330)), "5:30.0s");
/// assert_eq!(format_elapsed(Duration::from_secs(7261)), "2:01:01");
/// ```
pub fn format_elapsed(elapsed: Duration) -> String {
    let total_secs = elapsed.as_secs();

    if total_secs < SHORT_FORMAT_MAX {
        format!("{:.2}s", elapsed.as_secs_f64())
    } else if total_secs < MEDIUM_FORMAT_MAX {
        let minutes = total_secs / 60;
        let secs = elapsed.as_secs_f64() - (minutes * 60) as f64;
        format!("{}:{:04.1}s", minutes, secs)
    } else {
        let hours = total_secs / 3600;
        let mins = (total_secs % 3600) / 60;
        let secs = total_secs % 60;
        format!("{}:{:02}:{:02}", hours, mins, secs)
    }
}
