//! HTTP client for the remote todo store.
//!
//! The store is a CRUD service keyed by opaque item IDs: list, create,
//! full-update-by-id, delete-by-id. Every operation takes an explicit bearer
//! credential rather than reading ambient state, which keeps the client pure
//! and testable without a real environment.
//!
//! The client never retries and never redirects. Each failure maps onto a
//! three-variant taxonomy ([`ClientError`]) and is reported to the caller for
//! local handling; the caller's cache simply retains its last-known-good
//! state.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use nudge::client::{BearerToken, TodoClient};
//!
//! #[tokio::main]
//! async fn main() {
//!     let client = TodoClient::new("http://127.0.0.1:8000", Duration::from_secs(30));
//!     let token = BearerToken::new("secret");
//!     let items = client.list(&token).await.unwrap();
//!     println!("{} todos", items.len());
//! }
//! ```

use std::fmt;
use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use thiserror::Error;
use tracing::debug;

use crate::types::{NewTodo, TodoItem};

/// Errors that can occur against the remote todo store.
#[derive(Error, Debug)]
pub enum ClientError {
    /// No credential is available, or the store rejected the one supplied.
    /// The auth collaborator owns the redirect-to-login that follows.
    #[error("unauthorized: credential missing or rejected")]
    Unauthorized,

    /// Transport-level failure (unreachable host, timeout, malformed body).
    #[error("network failure: {0}")]
    Network(#[source] reqwest::Error),

    /// The store answered with a non-success status.
    #[error("remote rejection: {status} - {detail}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Server-supplied detail message, when one was given.
        detail: String,
    },
}

/// Bearer credential for the remote store, sourced from the external session
/// collaborator.
#[derive(Clone)]
pub struct BearerToken(String);

impl BearerToken {
    /// Wraps a raw token string.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Exposes the raw token for the `Authorization` header.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

// Tokens must not leak into logs.
impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken(..)")
    }
}

/// Client for the remote todo store.
#[derive(Debug, Clone)]
pub struct TodoClient {
    base_url: String,
    http: Client,
}

impl TodoClient {
    /// Creates a client for the store at `base_url` with an explicit request
    /// timeout. A stalled request fails with [`ClientError::Network`] instead
    /// of hanging the caller indefinitely.
    #[must_use]
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let http = Client::builder()
            .timeout(timeout)
            .pool_max_idle_per_host(5)
            .build()
            .expect("failed to create HTTP client");

        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        }
    }

    /// Fetches all items for the authenticated user, in store order.
    ///
    /// # Errors
    ///
    /// Returns a [`ClientError`] on transport failure, rejected credential,
    /// or non-success response.
    pub async fn list(&self, token: &BearerToken) -> Result<Vec<TodoItem>, ClientError> {
        let url = format!("{}/todos", self.base_url);
        debug!(url = %url, "Listing todos");

        let response = self
            .http
            .get(&url)
            .bearer_auth(token.expose())
            .send()
            .await
            .map_err(ClientError::Network)?;

        Self::check_status(response)
            .await?
            .json()
            .await
            .map_err(ClientError::Network)
    }

    /// Creates an item and returns the canonical, server-assigned record.
    ///
    /// # Errors
    ///
    /// Returns a [`ClientError`] on transport failure, rejected credential,
    /// or non-success response.
    pub async fn create(
        &self,
        token: &BearerToken,
        todo: &NewTodo,
    ) -> Result<TodoItem, ClientError> {
        let url = format!("{}/todos", self.base_url);
        debug!(url = %url, title = %todo.title, "Creating todo");

        let response = self
            .http
            .post(&url)
            .bearer_auth(token.expose())
            .json(todo)
            .send()
            .await
            .map_err(ClientError::Network)?;

        Self::check_status(response)
            .await?
            .json()
            .await
            .map_err(ClientError::Network)
    }

    /// Sends the complete item representation to the store. The store is the
    /// source of truth for any fields the client does not track, so partial
    /// patches are never sent.
    ///
    /// # Errors
    ///
    /// Returns a [`ClientError`] on transport failure, rejected credential,
    /// or non-success response.
    pub async fn update(&self, token: &BearerToken, item: &TodoItem) -> Result<(), ClientError> {
        let url = format!("{}/todos/{}", self.base_url, item.id);
        debug!(url = %url, done = item.done, "Updating todo");

        let response = self
            .http
            .put(&url)
            .bearer_auth(token.expose())
            .json(item)
            .send()
            .await
            .map_err(ClientError::Network)?;

        Self::check_status(response).await.map(|_| ())
    }

    /// Deletes the item with the given id from the store.
    ///
    /// # Errors
    ///
    /// Returns a [`ClientError`] on transport failure, rejected credential,
    /// or non-success response.
    pub async fn delete(&self, token: &BearerToken, id: &str) -> Result<(), ClientError> {
        let url = format!("{}/todos/{}", self.base_url, id);
        debug!(url = %url, "Deleting todo");

        let response = self
            .http
            .delete(&url)
            .bearer_auth(token.expose())
            .send()
            .await
            .map_err(ClientError::Network)?;

        Self::check_status(response).await.map(|_| ())
    }

    /// Maps non-success responses onto the error taxonomy.
    async fn check_status(response: Response) -> Result<Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::UNAUTHORIZED {
            return Err(ClientError::Unauthorized);
        }

        let body = response.text().await.unwrap_or_default();
        // The store reports failures as {"detail": "..."}; fall back to the
        // raw body for anything else.
        let detail = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|value| value.get("detail")?.as_str().map(String::from))
            .unwrap_or(body);

        Err(ClientError::Rejected {
            status: status.as_u16(),
            detail,
        })
    }
}
