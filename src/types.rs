//! Wire types for the remote todo store.
//!
//! This module defines the JSON item schema shared with the remote store.
//! All types serialize to camelCase JSON, matching the store's
//! `{id, title, done, dueDate?}` bodies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user-owned task record.
///
/// Items are created by the remote store; `id` is opaque, unique, and
/// immutable after creation. `title` is stored after date-annotation
/// stripping. `due_date`, when present, is always a valid instant: the
/// annotation parser rejects unparseable dates before one can be attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoItem {
    /// Opaque identifier assigned by the remote store.
    pub id: String,

    /// Display text, non-empty, with any due-date annotation removed.
    pub title: String,

    /// Completion flag, flipped by the user via toggle.
    pub done: bool,

    /// Optional due instant. Absent means no reminder semantics apply.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
}

/// Body of a create request. The store assigns the `id` and returns the
/// canonical [`TodoItem`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTodo {
    pub title: String,
    pub done: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
}

impl NewTodo {
    /// Creates a not-yet-done todo with the given title and optional due date.
    #[must_use]
    pub fn new(title: String, due_date: Option<DateTime<Utc>>) -> Self {
        Self {
            title,
            done: false,
            due_date,
        }
    }
}
