//! Nudge - client-side todo reminder engine.
//!
//! This crate keeps a personal todo list consistent with a remote CRUD store
//! and reminds the user about items that are due soon, at most once per item
//! per threshold crossing, across a long-running session with no persistent
//! local state.
//!
//! # Overview
//!
//! Raw input like `"Pay rent @6 September 2024"` runs through the annotation
//! parser, which splits off the due date. Writes go to the remote store; the
//! in-memory cache is the single source of truth for rendering and for
//! reminder evaluation, refreshed in full after every mutation (create
//! appends the store's canonical item directly). The evaluator scans the
//! cache after each refresh and on a fixed interval, and the notification
//! sink delivers alerts through whatever channel the host offers.
//!
//! # Modules
//!
//! - [`annotate`]: Due-date annotation parsing
//! - [`cache`]: In-memory ordered todo collection
//! - [`client`]: HTTP client for the remote todo store
//! - [`config`]: Configuration from environment variables
//! - [`error`]: Error types for Nudge operations
//! - [`notify`]: Permission-gated notification delivery
//! - [`reminder`]: Threshold evaluation and acknowledgment tracking
//! - [`schedule`]: Cancellable periodic evaluation task
//! - [`session`]: Orchestration and the interface consumed by the UI layer
//! - [`types`]: Wire types shared with the remote store

pub mod annotate;
pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod notify;
pub mod reminder;
pub mod schedule;
pub mod session;
pub mod types;

pub use annotate::{parse, Annotated};
pub use cache::TodoCache;
pub use client::{BearerToken, ClientError, TodoClient};
pub use config::Config;
pub use error::{NudgeError, Result};
pub use notify::{FallbackAlert, NotificationChannel, NotificationSink, PermissionState, TerminalAlert};
pub use reminder::{evaluate, AckSet, NotificationRequest, NotificationThreshold};
pub use schedule::{ReminderScheduler, DEFAULT_POLL_INTERVAL_SECS};
pub use session::TodoSession;
pub use types::{NewTodo, TodoItem};
