//! Periodic reminder evaluation.
//!
//! The scheduler owns a background task that re-evaluates the cache on a
//! fixed wall-clock interval for as long as the session is authenticated.
//! Teardown is explicit: [`ReminderScheduler::stop`] (and `Drop`) abort the
//! task, and no evaluation runs after that point. Orphaned timers firing
//! past logout are a bug, not a degradation.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{info, trace};

use crate::cache::TodoCache;
use crate::notify::NotificationSink;
use crate::reminder::{evaluate, AckSet};

/// Default interval between reminder evaluations, in seconds.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 60;

/// Handle to the periodic evaluation task.
///
/// Dropping the handle cancels the task, so whoever tears the session down
/// cannot leave a timer running by accident.
#[derive(Debug)]
pub struct ReminderScheduler {
    handle: JoinHandle<()>,
}

impl ReminderScheduler {
    /// Spawns the periodic evaluation task.
    ///
    /// Every `interval` the task snapshots the cache, evaluates it at the
    /// current wall-clock time, filters the requests through the
    /// acknowledgment set, and delivers what remains through the sink.
    #[must_use]
    pub fn start(
        interval: Duration,
        cache: Arc<Mutex<TodoCache>>,
        acks: Arc<Mutex<AckSet>>,
        sink: Arc<Mutex<NotificationSink>>,
    ) -> Self {
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // The first tick completes immediately; the session already
            // evaluates right after the refresh that precedes start, so
            // consume it and wait a full interval.
            ticker.tick().await;

            loop {
                ticker.tick().await;
                deliver_due_reminders(&cache, &acks, &sink, Utc::now()).await;
            }
        });

        Self { handle }
    }

    /// Cancels the periodic task. Idempotent.
    pub fn stop(&self) {
        self.handle.abort();
    }
}

impl Drop for ReminderScheduler {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Evaluates the cache once at `now` and delivers every request the
/// acknowledgment set has not yet seen.
///
/// Shared between the periodic task and the evaluate-after-refresh trigger,
/// so both paths dedupe against the same acknowledgment state.
pub async fn deliver_due_reminders(
    cache: &Arc<Mutex<TodoCache>>,
    acks: &Arc<Mutex<AckSet>>,
    sink: &Arc<Mutex<NotificationSink>>,
    now: DateTime<Utc>,
) {
    let items = cache.lock().await.snapshot();
    let requests = evaluate(&items, now);
    if requests.is_empty() {
        trace!(items = items.len(), "No items inside a reminder window");
        return;
    }

    let fresh: Vec<_> = {
        let mut acks = acks.lock().await;
        requests.into_iter().filter(|r| acks.accept(r)).collect()
    };
    if fresh.is_empty() {
        trace!("All reminder requests already acknowledged");
        return;
    }

    let mut sink = sink.lock().await;
    for request in fresh {
        info!(
            item_id = %request.item_id,
            threshold = ?request.threshold,
            "Delivering reminder"
        );
        sink.notify(&request.message()).await;
    }
}
