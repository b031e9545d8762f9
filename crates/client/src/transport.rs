//! The persistence transport consumed by the coordinator.
//!
//! [`BoardTransport`] is the seam between the optimistic client and the
//! server: production uses [`HttpTransport`] over reqwest, tests substitute
//! a scripted mock.

use async_trait::async_trait;
use helpdesk_core::board::Board;
use helpdesk_core::reorder::ReorderRequest;
use reqwest::StatusCode;
use serde::Deserialize;

/// Transport-level failures, classified by how the coordinator reports them.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("Ticket not found")]
    NotFound,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Request rejected: {0}")]
    Rejected(String),

    #[error("Transport failure: {0}")]
    Transport(String),
}

/// Async interface to the reorder persistence endpoint and the board read.
#[async_trait]
pub trait BoardTransport: Send + Sync {
    /// Persist one reorder plan. Resolves once the server has committed.
    async fn persist_reorder(&self, request: &ReorderRequest) -> Result<(), TransportError>;

    /// Fetch the authoritative board for initial load and reconciliation.
    async fn fetch_board(&self) -> Result<Board, TransportError>;
}

/// `{ "data": ... }` envelope used by every API response.
#[derive(Debug, Deserialize)]
struct DataEnvelope<T> {
    data: T,
}

/// `{ "error": ... }` envelope used by every API error response.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: String,
}

/// HTTP transport against the helpdesk API.
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    bearer_token: String,
}

impl HttpTransport {
    /// `base_url` without a trailing slash, e.g. `http://localhost:3000`.
    pub fn new(base_url: impl Into<String>, bearer_token: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            bearer_token: bearer_token.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

#[async_trait]
impl BoardTransport for HttpTransport {
    async fn persist_reorder(&self, request: &ReorderRequest) -> Result<(), TransportError> {
        let response = self
            .client
            .patch(self.url("/api/v1/tickets/kanban/reorder"))
            .bearer_auth(&self.bearer_token)
            .json(request)
            .send()
            .await
            .map_err(|e| TransportError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let message = response
            .json::<ErrorEnvelope>()
            .await
            .map(|e| e.error)
            .ok();
        Err(error_from_status(status, message))
    }

    async fn fetch_board(&self) -> Result<Board, TransportError> {
        let response = self
            .client
            .get(self.url("/api/v1/tickets/kanban"))
            .bearer_auth(&self.bearer_token)
            .send()
            .await
            .map_err(|e| TransportError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorEnvelope>()
                .await
                .map(|e| e.error)
                .ok();
            return Err(error_from_status(status, message));
        }

        let envelope = response
            .json::<DataEnvelope<Board>>()
            .await
            .map_err(|e| TransportError::Transport(e.to_string()))?;
        Ok(envelope.data)
    }
}

/// Classify a non-success HTTP status into a [`TransportError`].
fn error_from_status(status: StatusCode, message: Option<String>) -> TransportError {
    match status {
        StatusCode::NOT_FOUND => TransportError::NotFound,
        StatusCode::UNAUTHORIZED => TransportError::Unauthorized,
        s if s.is_client_error() => {
            TransportError::Rejected(message.unwrap_or_else(|| s.to_string()))
        }
        s => TransportError::Transport(message.unwrap_or_else(|| s.to_string())),
    }
}
