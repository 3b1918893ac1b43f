use tracing::{error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyKind {
    Success,
    Error,
}

/// A toast/snackbar message for the user-facing notification channel.
///
/// Fire-and-forget UI feedback after wishlist operations; outcomes are also
/// returned to callers as `Result` values, so this channel carries no data
/// contract.
#[derive(Debug, Clone)]
pub struct Notification {
    pub kind: NotifyKind,
    pub title: String,
    pub subtitle: Option<String>,
}

impl Notification {
    pub fn success(title: impl Into<String>) -> Self {
        Notification {
            kind: NotifyKind::Success,
            title: title.into(),
            subtitle: None,
        }
    }

    pub fn error(title: impl Into<String>) -> Self {
        Notification {
            kind: NotifyKind::Error,
            title: title.into(),
            subtitle: None,
        }
    }

    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Notifier used by the binaries that routes toasts to the logs.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: Notification) {
        let subtitle = notification.subtitle.unwrap_or_default();
        match notification.kind {
            NotifyKind::Success => {
                info!(title = %notification.title, subtitle = %subtitle, "notification")
            }
            NotifyKind::Error => {
                error!(title = %notification.title, subtitle = %subtitle, "notification")
            }
        }
    }
}
