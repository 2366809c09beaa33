//! Notification delivery for emitted signals.
//!
//! Delivery is best effort: the driver logs a failed notification and moves on.

use fibscan_core::domain::Notification;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("notification delivery failed: {0}")]
    Delivery(String),
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notification: &Notification) -> Result<(), NotifyError>;
}

/// Emits notifications as structured log events.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        tracing::info!(
            target: "fibscan::notify",
            title = %notification.title,
            body = %notification.body,
            "signal notification"
        );
        Ok(())
    }
}
