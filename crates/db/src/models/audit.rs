//! Audit log entity model and DTO.
//!
//! Audit entries are append-only (no `updated_at`); `entity_id` is TEXT so
//! the table can reference any entity id shape.

use helpdesk_core::types::{Timestamp, UserId};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A single audit log entry. Immutable once created.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLog {
    pub id: i64,
    pub entity_type: String,
    pub entity_id: String,
    pub action: String,
    pub changes: Option<serde_json::Value>,
    pub metadata: Option<serde_json::Value>,
    pub user_id: UserId,
    pub created_at: Timestamp,
}

/// DTO for inserting a new audit log entry.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAuditLog {
    pub entity_type: String,
    pub entity_id: String,
    pub action: String,
    pub changes: Option<serde_json::Value>,
    pub metadata: Option<serde_json::Value>,
    pub user_id: UserId,
}
