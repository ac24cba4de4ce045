// ── Transient UI flags shared by every slice ──

use serde::Serialize;
use strum::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum NotificationKind {
    #[default]
    Success,
    Error,
}

/// Dismissible feedback tied to the outcome of the last operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub visible: bool,
    pub message: String,
    pub kind: NotificationKind,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            visible: true,
            message: message.into(),
            kind: NotificationKind::Success,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            visible: true,
            message: message.into(),
            kind: NotificationKind::Error,
        }
    }
}

/// `loading` / `error` / `notification` triple carried by every slice.
///
/// `loading` is set by `begin` and cleared by every terminal helper
/// (`settle`, `succeed`, `fail`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Status {
    pub loading: bool,
    pub error: Option<String>,
    pub notification: Notification,
}

impl Status {
    pub(crate) fn begin(&mut self) {
        self.loading = true;
        self.error = None;
    }

    /// Terminal success without user-facing feedback (fetches).
    pub(crate) fn settle(&mut self) {
        self.loading = false;
    }

    pub(crate) fn succeed(&mut self, message: impl Into<String>) {
        self.loading = false;
        self.notification = Notification::success(message);
    }

    pub(crate) fn fail(&mut self, message: &str) {
        self.loading = false;
        self.error = Some(message.to_owned());
        self.notification = Notification::error(message);
    }

    /// Hide the notification. The error, if any, stays.
    pub(crate) fn dismiss(&mut self) {
        self.notification.visible = false;
    }
}
