//! Transient system notifications.

use log::warn;
use notify_rust::Notification;

/// Fire-and-forget notification. Title and message are passed as data (no
/// shell interpolation layer), so no escaping is needed. Failure is logged
/// and never reaches the schedulers.
pub fn notify(title: &str, message: &str) {
    if let Err(e) = Notification::new().summary(title).body(message).show() {
        warn!("notification failed: {e}");
    }
}
