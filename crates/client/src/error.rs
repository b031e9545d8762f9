use crate::transport::TransportError;

/// Failures surfaced to the board UI after a reorder attempt.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The ticket vanished server-side between snapshot and persistence.
    #[error("Ticket not found")]
    TicketNotFound,

    /// The session is missing or expired.
    #[error("Unauthorized")]
    Unauthorized,

    /// The server rejected the request (validation or conflict).
    #[error("Request rejected: {0}")]
    Rejected(String),

    /// The persistence request did not settle within the client timeout.
    #[error("Request timed out")]
    Timeout,

    /// Network-level or unexpected server failure.
    #[error("Transport failure: {0}")]
    Transport(String),
}

impl ClientError {
    /// The notification text shown next to the snapped-back card.
    pub fn user_message(&self) -> &'static str {
        match self {
            ClientError::TicketNotFound => "Ticket not found",
            _ => "Could not save changes",
        }
    }
}

impl From<TransportError> for ClientError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::NotFound => ClientError::TicketNotFound,
            TransportError::Unauthorized => ClientError::Unauthorized,
            TransportError::Rejected(msg) => ClientError::Rejected(msg),
            TransportError::Transport(msg) => ClientError::Transport(msg),
        }
    }
}
