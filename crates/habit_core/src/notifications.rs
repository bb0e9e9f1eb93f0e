use std::str::FromStr;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{HabitError, Result};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NotificationRequest {
    pub title: String,
    pub body: String,
}

impl NotificationRequest {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }
}

/// Platform-specific notification adapters implement this trait. Delivery is
/// fire-and-forget: the engine never learns whether a request was shown.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, notification: NotificationRequest);
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PermissionState {
    Granted,
    Denied,
    /// The user has not been asked yet.
    #[default]
    Default,
}

impl FromStr for PermissionState {
    type Err = HabitError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "granted" => Ok(PermissionState::Granted),
            "denied" => Ok(PermissionState::Denied),
            "default" => Ok(PermissionState::Default),
            _ => Err(HabitError::InvalidPermission(value.to_string())),
        }
    }
}

/// Raw platform notification API with its own permission model.
pub trait NotificationBackend: Send + Sync {
    fn permission(&self) -> PermissionState;
    /// Ask the user for permission and return their answer.
    fn request_permission(&self) -> PermissionState;
    fn deliver(&self, notification: NotificationRequest);
}

/// Shows a notification only once the platform permission is granted,
/// asking first when the user has not decided yet. Denied requests are
/// dropped.
pub struct PermissionGatedSink<B> {
    backend: B,
}

impl<B: NotificationBackend> PermissionGatedSink<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}

impl<B: NotificationBackend> NotificationSink for PermissionGatedSink<B> {
    fn notify(&self, notification: NotificationRequest) {
        match self.backend.permission() {
            PermissionState::Granted => self.backend.deliver(notification),
            PermissionState::Denied => {
                debug!(title = %notification.title, "notification permission denied");
            }
            PermissionState::Default => {
                if self.backend.request_permission() == PermissionState::Granted {
                    self.backend.deliver(notification);
                } else {
                    debug!(title = %notification.title, "notification permission not granted");
                }
            }
        }
    }
}

/// Keeps every request in memory, in delivery order.
#[derive(Debug, Default)]
pub struct RecordingSink {
    delivered: Mutex<Vec<NotificationRequest>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn delivered(&self) -> Vec<NotificationRequest> {
        self.delivered.lock().clone()
    }

    pub fn take(&self) -> Vec<NotificationRequest> {
        std::mem::take(&mut *self.delivered.lock())
    }

    pub fn len(&self) -> usize {
        self.delivered.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.delivered.lock().is_empty()
    }
}

impl NotificationSink for RecordingSink {
    fn notify(&self, notification: NotificationRequest) {
        self.delivered.lock().push(notification);
    }
}

impl<S: NotificationSink + ?Sized> NotificationSink for std::sync::Arc<S> {
    fn notify(&self, notification: NotificationRequest) {
        (**self).notify(notification);
    }
}
