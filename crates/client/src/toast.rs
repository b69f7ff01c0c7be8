//! Transient status messages.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToastKind {
    Success,
    Warning,
    Error,
}

/// A short message shown to the user and then dismissed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
}

impl Toast {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Success,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Error,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.kind == ToastKind::Success
    }
}

impl fmt::Display for Toast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Where toasts go.
pub trait Notifier: Send + Sync {
    fn notify(&self, toast: Toast);
}

impl<N: Notifier + ?Sized> Notifier for Arc<N> {
    fn notify(&self, toast: Toast) {
        (**self).notify(toast)
    }
}

/// Emits each toast as a log event at a level matching its kind.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, toast: Toast) {
        match toast.kind {
            ToastKind::Success => info!(text = %toast.message, "Toast"),
            ToastKind::Warning => warn!(text = %toast.message, "Toast"),
            ToastKind::Error => error!(text = %toast.message, "Toast"),
        }
    }
}
