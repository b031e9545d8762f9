//! Fire-and-forget audit trail writes.

use helpdesk_db::models::audit::CreateAuditLog;
use helpdesk_db::repositories::AuditLogRepo;
use helpdesk_db::DbPool;

/// Write an audit entry in the background.
///
/// Audit failures are logged but never surfaced to the caller: the primary
/// mutation has already committed, and a broken audit table must not turn a
/// successful request into an error.
pub fn spawn_audit(pool: DbPool, entry: CreateAuditLog) {
    tokio::spawn(async move {
        if let Err(error) = AuditLogRepo::insert(&pool, &entry).await {
            tracing::error!(
                entity_type = %entry.entity_type,
                entity_id = %entry.entity_id,
                action = %entry.action,
                %error,
                "Audit log write failed",
            );
        }
    });
}
