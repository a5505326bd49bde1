//! Utility functions and helpers.

pub mod http;

use std::time::Duration;

/// Sleep for `delay`, skipping the timer entirely when it is zero.
pub async fn pause(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

/// Render a duration for progress lines, e.g. `1.1s` or `30s`.
pub fn format_delay(delay: Duration) -> String {
    let millis = delay.as_millis();
    if millis % 1000 == 0 {
        format!("{}s", millis / 1000)
    } else {
        format!("{:.1}s", delay.as_secs_f64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_delay() {
        assert_eq!(format_delay(Duration::from_secs(30)), "30s");
        assert_eq!(format_delay(Duration::from_millis(1100)), "1.1s");
        assert_eq!(format_delay(Duration::ZERO), "0s");
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_advances_clock() {
        let start = tokio::time::Instant::now();
        pause(Duration::from_secs(5)).await;
        assert!(start.elapsed() >= Duration::from_secs(5));

        let start = tokio::time::Instant::now();
        pause(Duration::ZERO).await;
        assert_eq!(start.elapsed(), Duration::ZERO);
    }
}
