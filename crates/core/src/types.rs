/// Opaque, stable ticket identifier.
pub type TicketId = uuid::Uuid;

/// Internal user identifier (JWT subject, audit actor).
pub type UserId = uuid::Uuid;

/// UTC timestamp used across the domain.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
