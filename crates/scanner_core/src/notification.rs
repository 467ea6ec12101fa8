/// Identifies one issued notification so a dismiss timer can be matched to it.
pub type NotificationToken = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    #[default]
    Success,
    Error,
}

/// Single-slot user-facing notification.
///
/// Hiding keeps `message` and `severity` until the next `notify` overwrites them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NotificationState {
    message: String,
    severity: Severity,
    visible: bool,
    token: NotificationToken,
}

impl NotificationState {
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn token(&self) -> NotificationToken {
        self.token
    }

    pub(crate) fn notify(&mut self, message: String, severity: Severity) -> NotificationToken {
        self.token += 1;
        self.message = message;
        self.severity = severity;
        self.visible = true;
        self.token
    }

    /// Hides the slot. Returns the token of the notification that was hidden,
    /// or `None` if nothing was visible.
    pub(crate) fn dismiss(&mut self) -> Option<NotificationToken> {
        if !self.visible {
            return None;
        }
        self.visible = false;
        Some(self.token)
    }

    /// Timer-driven dismissal; ignored unless `token` is still the live one.
    pub(crate) fn expire(&mut self, token: NotificationToken) -> bool {
        if token != self.token {
            return false;
        }
        self.dismiss().is_some()
    }
}
