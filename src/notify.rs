//! Notification delivery.
//!
//! The sink abstracts whatever alert channel the host environment offers. A
//! permission-gated native channel is preferred; when no such capability
//! exists at all, delivery degrades to a blocking fallback alert rather than
//! going silent. Once permission has been explicitly refused, delivery is
//! best-effort: messages are dropped and no fallback is attempted.
//!
//! Permission state is cached by the host environment, never by this module:
//! the channel is queried fresh on every delivery.

use async_trait::async_trait;
use tracing::{debug, info};

/// Host permission state for the native notification capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionState {
    /// The user has authorized notifications.
    Granted,
    /// The user has explicitly refused notifications.
    Denied,
    /// The user has not been asked yet.
    Undetermined,
}

/// A permission-gated notification capability provided by the host
/// environment.
#[async_trait]
pub trait NotificationChannel: Send + Sync {
    /// Returns the current permission state.
    fn permission(&self) -> PermissionState;

    /// Asks the host to prompt the user for authorization, resolving
    /// asynchronously to the user's decision.
    async fn request_permission(&mut self) -> PermissionState;

    /// Delivers a notification. Only called once permission is granted.
    async fn deliver(&self, message: &str);
}

/// Last-resort alert used when no native capability exists.
pub trait FallbackAlert: Send + Sync {
    /// Presents a blocking, user-visible alert.
    fn alert(&self, message: &str);
}

/// Fallback alert for terminal hosts: rings the bell and writes to stderr.
#[derive(Debug, Default)]
pub struct TerminalAlert;

impl FallbackAlert for TerminalAlert {
    fn alert(&self, message: &str) {
        eprintln!("\x07*** {message} ***");
    }
}

/// Delivers human-readable alerts through the best channel available.
pub struct NotificationSink {
    channel: Option<Box<dyn NotificationChannel>>,
    fallback: Box<dyn FallbackAlert>,
}

impl NotificationSink {
    /// Creates a sink over an optional native channel and a fallback alert.
    #[must_use]
    pub fn new(channel: Option<Box<dyn NotificationChannel>>, fallback: Box<dyn FallbackAlert>) -> Self {
        Self { channel, fallback }
    }

    /// Creates a sink for hosts with no native notification capability.
    /// Every message goes through the fallback alert.
    #[must_use]
    pub fn without_channel(fallback: Box<dyn FallbackAlert>) -> Self {
        Self::new(None, fallback)
    }

    /// Delivers one alert, best-effort.
    ///
    /// - No channel available: the fallback alert fires.
    /// - Permission granted: the channel delivers.
    /// - Permission undetermined: authorization is requested; the channel
    ///   delivers only if the user grants it.
    /// - Permission denied (up front or after the request): the message is
    ///   dropped. No fallback after an explicit refusal.
    pub async fn notify(&mut self, message: &str) {
        let Some(channel) = self.channel.as_mut() else {
            debug!(message, "No native channel, using fallback alert");
            self.fallback.alert(message);
            return;
        };

        match channel.permission() {
            PermissionState::Granted => channel.deliver(message).await,
            PermissionState::Denied => {
                debug!(message, "Notification permission denied, dropping alert");
            }
            PermissionState::Undetermined => {
                info!("Requesting notification permission");
                match channel.request_permission().await {
                    PermissionState::Granted => channel.deliver(message).await,
                    state => {
                        debug!(message, ?state, "Permission not granted, dropping alert");
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Channel double that records deliveries and scripts permission flow.
    struct ScriptedChannel {
        permission: PermissionState,
        on_request: PermissionState,
        requests: Arc<Mutex<usize>>,
        delivered: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl NotificationChannel for ScriptedChannel {
        fn permission(&self) -> PermissionState {
            self.permission
        }

        async fn request_permission(&mut self) -> PermissionState {
            *self.requests.lock().unwrap() += 1;
            self.permission = self.on_request;
            self.permission
        }

        async fn deliver(&self, message: &str) {
            self.delivered.lock().unwrap().push(message.to_string());
        }
    }

    /// Fallback double that records alerts.
    struct RecordingAlert {
        alerts: Arc<Mutex<Vec<String>>>,
    }

    impl FallbackAlert for RecordingAlert {
        fn alert(&self, message: &str) {
            self.alerts.lock().unwrap().push(message.to_string());
        }
    }

    fn recording_alert() -> (Box<RecordingAlert>, Arc<Mutex<Vec<String>>>) {
        let alerts = Arc::new(Mutex::new(Vec::new()));
        (
            Box::new(RecordingAlert {
                alerts: Arc::clone(&alerts),
            }),
            alerts,
        )
    }

    fn scripted_channel(
        permission: PermissionState,
        on_request: PermissionState,
    ) -> (Box<ScriptedChannel>, Arc<Mutex<Vec<String>>>, Arc<Mutex<usize>>) {
        let delivered = Arc::new(Mutex::new(Vec::new()));
        let requests = Arc::new(Mutex::new(0));
        (
            Box::new(ScriptedChannel {
                permission,
                on_request,
                requests: Arc::clone(&requests),
                delivered: Arc::clone(&delivered),
            }),
            delivered,
            requests,
        )
    }

    #[tokio::test]
    async fn missing_channel_falls_back_to_alert() {
        let (fallback, alerts) = recording_alert();
        let mut sink = NotificationSink::without_channel(fallback);

        sink.notify("rent is due").await;

        assert_eq!(alerts.lock().unwrap().as_slice(), ["rent is due"]);
    }

    #[tokio::test]
    async fn granted_permission_delivers_through_channel() {
        let (channel, delivered, requests) =
            scripted_channel(PermissionState::Granted, PermissionState::Granted);
        let (fallback, alerts) = recording_alert();
        let mut sink = NotificationSink::new(Some(channel), fallback);

        sink.notify("rent is due").await;

        assert_eq!(delivered.lock().unwrap().as_slice(), ["rent is due"]);
        assert!(alerts.lock().unwrap().is_empty());
        assert_eq!(*requests.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn denied_permission_drops_without_fallback() {
        let (channel, delivered, _requests) =
            scripted_channel(PermissionState::Denied, PermissionState::Denied);
        let (fallback, alerts) = recording_alert();
        let mut sink = NotificationSink::new(Some(channel), fallback);

        sink.notify("rent is due").await;

        assert!(delivered.lock().unwrap().is_empty());
        assert!(alerts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn undetermined_permission_requests_then_delivers_when_granted() {
        let (channel, delivered, requests) =
            scripted_channel(PermissionState::Undetermined, PermissionState::Granted);
        let (fallback, _alerts) = recording_alert();
        let mut sink = NotificationSink::new(Some(channel), fallback);

        sink.notify("rent is due").await;
        sink.notify("rent is still due").await;

        assert_eq!(
            delivered.lock().unwrap().as_slice(),
            ["rent is due", "rent is still due"]
        );
        // Grant sticks on the channel, so permission is only requested once.
        assert_eq!(*requests.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn undetermined_permission_drops_when_refused() {
        let (channel, delivered, requests) =
            scripted_channel(PermissionState::Undetermined, PermissionState::Denied);
        let (fallback, alerts) = recording_alert();
        let mut sink = NotificationSink::new(Some(channel), fallback);

        sink.notify("rent is due").await;

        assert!(delivered.lock().unwrap().is_empty());
        assert!(alerts.lock().unwrap().is_empty());
        assert_eq!(*requests.lock().unwrap(), 1);
    }
}
