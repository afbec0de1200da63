use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

/// One user-facing alert. Message keys are opaque at this layer;
/// rendering and translation happen outside the engine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub notification_id: String,
    pub severity: Severity,
    pub message_key: String,
    pub detail: Option<String>,
    pub correlation_id: String,
    pub occurred_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(
        severity: Severity,
        message_key: impl Into<String>,
        correlation_id: impl Into<String>,
    ) -> Self {
        Self {
            notification_id: Uuid::new_v4().to_string(),
            severity,
            message_key: message_key.into(),
            detail: None,
            correlation_id: correlation_id.into(),
            occurred_at: Utc::now(),
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

/// The single surfacing point for every workflow outcome the operator
/// must see.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

#[derive(Clone, Default)]
pub struct InMemoryNotifier {
    notifications: Arc<Mutex<Vec<Notification>>>,
}

impl InMemoryNotifier {
    pub fn notifications(&self) -> Vec<Notification> {
        match self.notifications.lock() {
            Ok(notifications) => notifications.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl Notifier for InMemoryNotifier {
    fn notify(&self, notification: Notification) {
        match self.notifications.lock() {
            Ok(mut notifications) => notifications.push(notification),
            Err(poisoned) => poisoned.into_inner().push(notification),
        }
    }
}

/// Emits notifications as structured log events.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        let detail = notification.detail.as_deref().unwrap_or("");
        match notification.severity {
            Severity::Error => tracing::error!(
                event_name = "notify.user_alert",
                message_key = %notification.message_key,
                correlation_id = %notification.correlation_id,
                detail,
                "workflow error surfaced to operator"
            ),
            Severity::Warning => tracing::warn!(
                event_name = "notify.user_alert",
                message_key = %notification.message_key,
                correlation_id = %notification.correlation_id,
                detail,
                "workflow warning surfaced to operator"
            ),
            Severity::Info | Severity::Success => tracing::info!(
                event_name = "notify.user_alert",
                message_key = %notification.message_key,
                correlation_id = %notification.correlation_id,
                detail,
                "workflow notice surfaced to operator"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{InMemoryNotifier, Notification, Notifier, Severity};

    #[test]
    fn in_memory_sink_records_notifications_with_correlation_fields() {
        let notifier = InMemoryNotifier::default();
        notifier.notify(
            Notification::new(Severity::Error, "fileCorrupt", "req-123")
                .with_detail("attachment service rejected estimate.pdf"),
        );

        let notifications = notifier.notifications();
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].correlation_id, "req-123");
        assert_eq!(notifications[0].message_key, "fileCorrupt");
        assert_eq!(notifications[0].severity, Severity::Error);
        assert!(notifications[0].detail.as_deref().unwrap_or("").contains("estimate.pdf"));
    }
}
