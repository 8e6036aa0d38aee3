use chrono::{DateTime, TimeDelta, Utc};
use mockable::Clock;
use serde::Serialize;
use std::sync::Arc;

/// How long a toast stays visible unless dismissed earlier
pub const TOAST_TTL_SECONDS: i64 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    Success,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ToastId(u64);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Toast {
    pub id: ToastId,
    pub message: String,
    pub kind: ToastKind,
    pub expires_at: DateTime<Utc>,
}

/// User-facing notifications with self-expiry.
///
/// Expiry is evaluated against the injected clock whenever the queue is read,
/// so no timer thread is involved. `dismiss` cancels a toast early.
pub struct ToastQueue {
    clock: Arc<dyn Clock>,
    ttl: TimeDelta,
    next_id: u64,
    toasts: Vec<Toast>,
}

impl ToastQueue {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self::with_ttl(clock, TimeDelta::seconds(TOAST_TTL_SECONDS))
    }

    pub fn with_ttl(clock: Arc<dyn Clock>, ttl: TimeDelta) -> Self {
        Self {
            clock,
            ttl,
            next_id: 0,
            toasts: Vec::new(),
        }
    }

    pub fn push(&mut self, message: impl Into<String>, kind: ToastKind) -> ToastId {
        self.next_id += 1;
        let id = ToastId(self.next_id);
        let message = message.into();
        tracing::debug!(toast = id.0, ?kind, "{}", message);

        self.toasts.push(Toast {
            id,
            message,
            kind,
            expires_at: self.clock.utc() + self.ttl,
        });
        id
    }

    pub fn success(&mut self, message: impl Into<String>) -> ToastId {
        self.push(message, ToastKind::Success)
    }

    pub fn error(&mut self, message: impl Into<String>) -> ToastId {
        self.push(message, ToastKind::Error)
    }

    /// Drops expired toasts and returns the live ones in insertion order
    pub fn active(&mut self) -> &[Toast] {
        let now = self.clock.utc();
        self.toasts.retain(|toast| toast.expires_at > now);
        &self.toasts
    }

    pub fn dismiss(&mut self, id: ToastId) -> bool {
        let before = self.toasts.len();
        self.toasts.retain(|toast| toast.id != id);
        self.toasts.len() != before
    }
}
