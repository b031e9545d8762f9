//! Repository for the `audit_logs` table.

use sqlx::PgPool;

use crate::models::audit::{AuditLog, CreateAuditLog};

/// Column list for SELECT/RETURNING.
const COLUMNS: &str = "id, entity_type, entity_id, action, changes, metadata, user_id, created_at";

/// Column list for INSERT (excludes auto-generated `id` and `created_at`).
const INSERT_COLUMNS: &str = "entity_type, entity_id, action, changes, metadata, user_id";

/// Provides insert operations for the append-only audit trail.
pub struct AuditLogRepo;

impl AuditLogRepo {
    /// Insert a single audit log entry, returning the created row.
    pub async fn insert(pool: &PgPool, entry: &CreateAuditLog) -> Result<AuditLog, sqlx::Error> {
        let query = format!(
            "INSERT INTO audit_logs ({INSERT_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AuditLog>(&query)
            .bind(&entry.entity_type)
            .bind(&entry.entity_id)
            .bind(&entry.action)
            .bind(&entry.changes)
            .bind(&entry.metadata)
            .bind(entry.user_id)
            .fetch_one(pool)
            .await
    }

    /// List entries for one entity, newest first. Used by activity views.
    pub async fn list_for_entity(
        pool: &PgPool,
        entity_type: &str,
        entity_id: &str,
        limit: i64,
    ) -> Result<Vec<AuditLog>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM audit_logs \
             WHERE entity_type = $1 AND entity_id = $2 \
             ORDER BY created_at DESC \
             LIMIT $3"
        );
        sqlx::query_as::<_, AuditLog>(&query)
            .bind(entity_type)
            .bind(entity_id)
            .bind(limit.min(500))
            .fetch_all(pool)
            .await
    }
}
