use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertLevel {
    Success,
    Info,
    Warning,
    Danger,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub level: AlertLevel,
    pub message: String,
}

impl Alert {
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(AlertLevel::Success, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(AlertLevel::Info, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(AlertLevel::Warning, message)
    }

    pub fn danger(message: impl Into<String>) -> Self {
        Self::new(AlertLevel::Danger, message)
    }

    fn new(level: AlertLevel, message: impl Into<String>) -> Self {
        Alert {
            level,
            message: message.into(),
        }
    }
}

/// Single alert slot. A new alert supersedes the visible one, and an alert
/// is dismissed once `timeout` has elapsed.
#[derive(Debug)]
pub struct Notifier {
    timeout: Duration,
    slot: Option<(Alert, Instant)>,
}

impl Notifier {
    pub fn new(timeout: Duration) -> Self {
        Notifier {
            timeout,
            slot: None,
        }
    }

    pub fn show(&mut self, alert: Alert) {
        debug!(level = ?alert.level, message = %alert.message, "Alert");
        self.slot = Some((alert, Instant::now()));
    }

    pub fn current(&self) -> Option<&Alert> {
        self.slot
            .as_ref()
            .filter(|(_, shown_at)| shown_at.elapsed() < self.timeout)
            .map(|(alert, _)| alert)
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(Duration::from_secs(5))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_alert_auto_dismisses_after_timeout() {
        let mut notifier = Notifier::default();
        notifier.show(Alert::success("Transaction added successfully"));
        assert_eq!(
            notifier.current().map(|a| a.level),
            Some(AlertLevel::Success)
        );

        tokio::time::advance(Duration::from_millis(4999)).await;
        assert!(notifier.current().is_some());

        tokio::time::advance(Duration::from_millis(1)).await;
        assert!(notifier.current().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_alert_supersedes_old_one() {
        let mut notifier = Notifier::default();
        notifier.show(Alert::warning("Please fill in all fields"));
        tokio::time::advance(Duration::from_secs(3)).await;
        notifier.show(Alert::danger("Error adding transaction"));

        tokio::time::advance(Duration::from_secs(3)).await;
        let current = notifier.current().expect("second alert still visible");
        assert_eq!(current.level, AlertLevel::Danger);
        assert_eq!(current.message, "Error adding transaction");

        tokio::time::advance(Duration::from_secs(2)).await;
        assert!(notifier.current().is_none());
    }
}
