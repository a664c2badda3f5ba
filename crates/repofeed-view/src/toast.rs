//! Transient, auto-dismissing failure notification.

use std::time::Duration;

/// Fixed text shown when a page fetch fails.
const FAILURE_TEXT: &str = "Failed";
/// Default time before the notification auto-dismisses.
const DEFAULT_DURATION: Duration = Duration::from_secs(2);

/// One transient notification for the presentation layer to display and
/// hide after [`duration`](Self::duration) elapses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    text: String,
    duration: Duration,
}

impl Toast {
    /// The standard page-fetch failure toast.
    #[must_use]
    pub fn failure() -> Self {
        Self::failure_with_duration(DEFAULT_DURATION)
    }

    /// Failure toast with a caller-configured dismiss delay.
    #[must_use]
    pub fn failure_with_duration(duration: Duration) -> Self {
        Self {
            text: FAILURE_TEXT.to_string(),
            duration,
        }
    }

    /// Text to display.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// How long the toast stays visible before auto-dismissing.
    #[must_use]
    pub const fn duration(&self) -> Duration {
        self.duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_toast_uses_fixed_text_and_two_second_default() {
        let toast = Toast::failure();
        assert_eq!(toast.text(), "Failed");
        assert_eq!(toast.duration(), Duration::from_secs(2));
    }

    #[test]
    fn dismiss_delay_is_configurable() {
        let toast = Toast::failure_with_duration(Duration::from_millis(500));
        assert_eq!(toast.duration(), Duration::from_millis(500));
    }
}
