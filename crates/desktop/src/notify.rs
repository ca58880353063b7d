//! Toast notifications collected for the UI to poll.

use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tillpoint_restock::Notifier;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    Success,
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// Queue of toasts not yet shown.
#[derive(Debug, Default)]
pub struct ToastNotifier {
    pending: Mutex<Vec<Toast>>,
}

impl ToastNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take every pending toast, oldest first.
    pub fn drain(&self) -> Vec<Toast> {
        match self.pending.lock() {
            Ok(mut pending) => std::mem::take(&mut *pending),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }

    fn push(&self, kind: ToastKind, message: &str) {
        tracing::debug!(?kind, message, "toast");
        let toast = Toast {
            kind,
            message: message.to_string(),
            created_at: Utc::now(),
        };
        match self.pending.lock() {
            Ok(mut pending) => pending.push(toast),
            Err(poisoned) => poisoned.into_inner().push(toast),
        }
    }
}

impl Notifier for ToastNotifier {
    fn success(&self, message: &str) {
        self.push(ToastKind::Success, message);
    }

    fn info(&self, message: &str) {
        self.push(ToastKind::Info, message);
    }

    fn error(&self, message: &str) {
        self.push(ToastKind::Error, message);
    }
}
