use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::Serialize;
use uuid::Uuid;

const DEFAULT_TTL: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    Success,
    Danger,
    Info,
}

/// Transient user-facing notice.
#[derive(Debug, Clone, Serialize)]
pub struct Alert {
    pub id: Uuid,
    pub message: String,
    pub kind: AlertKind,
}

/// Queue of transient alerts. Each push spawns its own expiry timer, so
/// one alert timing out never touches the lifetime of another. Must be
/// used from within a tokio runtime.
#[derive(Clone, Default)]
pub struct AlertBus {
    inner: Arc<Mutex<Vec<Alert>>>,
}

impl AlertBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, message: impl Into<String>, kind: AlertKind) -> Uuid {
        self.push_with_ttl(message, kind, DEFAULT_TTL)
    }

    pub fn push_with_ttl(
        &self,
        message: impl Into<String>,
        kind: AlertKind,
        ttl: Duration,
    ) -> Uuid {
        let alert = Alert {
            id: Uuid::new_v4(),
            message: message.into(),
            kind,
        };
        let id = alert.id;
        self.inner.lock().expect("alert lock").push(alert);

        let bus = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(ttl).await;
            bus.dismiss(id);
        });
        id
    }

    pub fn dismiss(&self, id: Uuid) {
        self.inner
            .lock()
            .expect("alert lock")
            .retain(|alert| alert.id != id);
    }

    /// Current alerts in insertion order.
    pub fn snapshot(&self) -> Vec<Alert> {
        self.inner.lock().expect("alert lock").clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn alerts_expire_independently() {
        let bus = AlertBus::new();
        let short = bus.push_with_ttl("short", AlertKind::Info, Duration::from_millis(20));
        let long = bus.push_with_ttl("long", AlertKind::Success, Duration::from_millis(200));
        assert_eq!(bus.snapshot().len(), 2);

        tokio::time::sleep(Duration::from_millis(80)).await;
        let remaining = bus.snapshot();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, long);
        assert_ne!(remaining[0].id, short);

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(bus.snapshot().is_empty());
    }

    #[tokio::test]
    async fn dismiss_removes_only_the_matching_alert() {
        let bus = AlertBus::new();
        let first = bus.push_with_ttl("first", AlertKind::Danger, Duration::from_secs(60));
        let _second = bus.push_with_ttl("second", AlertKind::Info, Duration::from_secs(60));
        bus.dismiss(first);

        let remaining = bus.snapshot();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].message, "second");

        // Dismissing an already-gone id is a no-op.
        bus.dismiss(first);
        assert_eq!(bus.snapshot().len(), 1);
    }

    #[tokio::test]
    async fn snapshot_preserves_insertion_order() {
        let bus = AlertBus::new();
        bus.push_with_ttl("a", AlertKind::Info, Duration::from_secs(60));
        bus.push_with_ttl("b", AlertKind::Info, Duration::from_secs(60));
        bus.push_with_ttl("c", AlertKind::Info, Duration::from_secs(60));
        let messages: Vec<_> = bus.snapshot().into_iter().map(|a| a.message).collect();
        assert_eq!(messages, vec!["a", "b", "c"]);
    }
}
