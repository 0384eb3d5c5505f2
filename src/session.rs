//! Session orchestration.
//!
//! [`TodoSession`] wires the components together: raw input runs through the
//! annotation parser, writes go to the store client, the cache is refreshed,
//! and the reminder evaluator fires after every successful refresh as well as
//! on the scheduler's interval. It also owns the three signals the rendering
//! layer needs: the current item sequence, a loading flag, and the last error
//! message.
//!
//! Failure policy: every store failure is caught here and converted into a
//! local, non-fatal signal (a logged diagnostic plus the error message). The
//! cache keeps its last-known-good contents, and nothing is retried
//! automatically; a failed write waits for a new user action.
//! [`ClientError::Unauthorized`] is additionally returned to the caller so
//! the auth collaborator can redirect to login.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::annotate;
use crate::cache::TodoCache;
use crate::client::{BearerToken, ClientError, TodoClient};
use crate::notify::NotificationSink;
use crate::reminder::AckSet;
use crate::schedule::{deliver_due_reminders, ReminderScheduler};
use crate::types::{NewTodo, TodoItem};

/// A user's authenticated todo session.
///
/// The session has process lifetime semantics: the cache is rebuilt from a
/// full fetch on [`login`](Self::login) and discarded on
/// [`logout`](Self::logout), which also cancels the reminder timer and clears
/// the acknowledgment set.
pub struct TodoSession {
    client: TodoClient,
    poll_interval: Duration,
    token: Option<BearerToken>,
    cache: Arc<Mutex<TodoCache>>,
    acks: Arc<Mutex<AckSet>>,
    sink: Arc<Mutex<NotificationSink>>,
    scheduler: Option<ReminderScheduler>,
    loading: bool,
    last_error: Option<String>,
}

impl TodoSession {
    /// Creates an unauthenticated session.
    #[must_use]
    pub fn new(client: TodoClient, poll_interval: Duration, sink: NotificationSink) -> Self {
        Self {
            client,
            poll_interval,
            token: None,
            cache: Arc::new(Mutex::new(TodoCache::new())),
            acks: Arc::new(Mutex::new(AckSet::new())),
            sink: Arc::new(Mutex::new(sink)),
            scheduler: None,
            loading: false,
            last_error: None,
        }
    }

    /// Returns `true` while a credential is held.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Returns `true` while a store request is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Returns the most recent store failure, if the last operation failed.
    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Returns a snapshot of the cached items, in store order.
    pub async fn items(&self) -> Vec<TodoItem> {
        self.cache.lock().await.snapshot()
    }

    /// Stores the credential, rebuilds the cache from a full fetch, and
    /// starts the reminder timer.
    ///
    /// # Errors
    ///
    /// Returns the initial refresh failure. The session stays authenticated
    /// and polling unless the failure was [`ClientError::Unauthorized`], in
    /// which case it tears itself down again.
    pub async fn login(&mut self, token: BearerToken) -> Result<(), ClientError> {
        self.token = Some(token);
        self.scheduler = Some(ReminderScheduler::start(
            self.poll_interval,
            Arc::clone(&self.cache),
            Arc::clone(&self.acks),
            Arc::clone(&self.sink),
        ));
        info!("Session authenticated, reminder polling started");

        match self.refresh().await {
            Err(ClientError::Unauthorized) => {
                self.logout().await;
                Err(ClientError::Unauthorized)
            }
            other => other,
        }
    }

    /// Tears the session down: cancels the reminder timer, empties the cache
    /// and the acknowledgment set, and drops the credential.
    pub async fn logout(&mut self) {
        if let Some(scheduler) = self.scheduler.take() {
            scheduler.stop();
        }
        self.cache.lock().await.clear();
        self.acks.lock().await.clear();
        self.token = None;
        self.loading = false;
        self.last_error = None;
        info!("Session torn down, reminder polling stopped");
    }

    /// Re-fetches the full item list and atomically replaces the cache, then
    /// evaluates reminders immediately.
    ///
    /// # Errors
    ///
    /// On failure the cache keeps its last-known-good contents and the error
    /// is recorded in [`last_error`](Self::last_error).
    pub async fn refresh(&mut self) -> Result<(), ClientError> {
        let token = self.credential()?;

        self.loading = true;
        let result = self.client.list(&token).await;
        self.loading = false;

        match result {
            Ok(items) => {
                self.cache.lock().await.replace(items);
                self.last_error = None;
                self.evaluate_now().await;
                Ok(())
            }
            Err(err) => Err(self.record_failure("refresh", err)),
        }
    }

    /// Creates a todo from raw input.
    ///
    /// Empty (all-whitespace) input is a no-op. Otherwise the input runs
    /// through the annotation parser; on success the store's canonical item
    /// is appended to the cache directly (creation skips the full refetch)
    /// and reminders are evaluated immediately.
    ///
    /// # Errors
    ///
    /// On failure nothing is added locally, so the caller can leave the
    /// user's input in place for another attempt.
    pub async fn add(&mut self, raw: &str) -> Result<Option<TodoItem>, ClientError> {
        if raw.trim().is_empty() {
            return Ok(None);
        }
        let token = self.credential()?;

        let parsed = annotate::parse(raw, Utc::now());
        // An annotation-only input would strip to an empty title; keep the
        // raw text instead so the store never sees an empty one.
        let title = if parsed.title.is_empty() {
            raw.trim().to_string()
        } else {
            parsed.title
        };

        let body = NewTodo::new(title, parsed.due_date);
        match self.client.create(&token, &body).await {
            Ok(item) => {
                info!(id = %item.id, title = %item.title, "Todo created");
                self.cache.lock().await.append(item.clone());
                self.last_error = None;
                self.evaluate_now().await;
                Ok(Some(item))
            }
            Err(err) => Err(self.record_failure("create", err)),
        }
    }

    /// Flips an item's completion flag via a full-item update, then refreshes
    /// the cache from the store.
    ///
    /// Unknown ids are ignored: the item was already removed from under us
    /// and the next refresh will reconcile the view.
    ///
    /// # Errors
    ///
    /// On failure the cache is left untouched.
    pub async fn toggle(&mut self, id: &str) -> Result<(), ClientError> {
        let token = self.credential()?;

        let Some(mut item) = self
            .cache
            .lock()
            .await
            .all()
            .iter()
            .find(|item| item.id == id)
            .cloned()
        else {
            warn!(id, "Toggle requested for unknown item");
            return Ok(());
        };

        item.done = !item.done;
        match self.client.update(&token, &item).await {
            Ok(()) => {
                info!(id = %item.id, done = item.done, "Todo toggled");
                self.refresh().await
            }
            Err(err) => Err(self.record_failure("update", err)),
        }
    }

    /// Deletes an item from the store, then refreshes the cache.
    ///
    /// # Errors
    ///
    /// On failure the item remains present in the cache.
    pub async fn remove(&mut self, id: &str) -> Result<(), ClientError> {
        let token = self.credential()?;

        match self.client.delete(&token, id).await {
            Ok(()) => {
                info!(id, "Todo deleted");
                self.refresh().await
            }
            Err(err) => Err(self.record_failure("delete", err)),
        }
    }

    /// Evaluates reminders over the current cache right now, deduplicated
    /// against the same acknowledgment set the scheduler uses.
    pub async fn evaluate_now(&self) {
        deliver_due_reminders(&self.cache, &self.acks, &self.sink, Utc::now()).await;
    }

    /// Returns the held credential or `Unauthorized` without issuing any
    /// request. The session performs no redirect itself.
    fn credential(&self) -> Result<BearerToken, ClientError> {
        self.token.clone().ok_or(ClientError::Unauthorized)
    }

    /// Logs a store failure and records it for the rendering layer.
    fn record_failure(&mut self, operation: &str, err: ClientError) -> ClientError {
        warn!(operation, error = %err, "Store operation failed");
        self.last_error = Some(err.to_string());
        err
    }
}
