//! Repository for the `tickets` table: board reads and the atomic reorder.

use helpdesk_core::board::OrderUpdate;
use helpdesk_core::ticket::{StatusTransition, TicketStatus, TimestampDelta, CLOSED_VISIBILITY_DAYS};
use helpdesk_core::types::{TicketId, UserId};
use sqlx::PgPool;

use crate::models::ticket::{BoardTicketRow, CreateTicket, Ticket, TicketPosition};

/// Column list shared across single-table queries.
const COLUMNS: &str = "id, ticket_number, subject, description, status, priority, \
    kanban_order, company_id, assigned_to_id, created_by_id, \
    resolved_at, closed_at, created_at, updated_at";

/// Column list for the board read (joined display fields).
const BOARD_COLUMNS: &str = "\
    t.id, t.ticket_number, t.subject, t.status, t.priority, t.kanban_order, \
    t.created_at, t.company_id, c.name AS company_name, \
    c.short_name AS company_short_name, t.assigned_to_id, \
    u.name AS assignee_name, u.avatar AS assignee_avatar";

/// Result of attempting the atomic reorder transaction.
///
/// Both missing-row cases leave the database untouched: the transaction is
/// rolled back before any partial renumbering can be observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReorderApplied {
    /// Every row was updated and the transaction committed.
    Committed,
    /// The moved ticket vanished between validation and the transaction.
    TicketMissing,
    /// One of the affected siblings vanished mid-flight.
    SiblingMissing(TicketId),
}

/// Provides board queries and mutations for tickets.
pub struct TicketRepo;

impl TicketRepo {
    /// Load every board-visible ticket with its display fields, ordered by
    /// `(kanban_order asc, created_at desc)`.
    ///
    /// Closed tickets are included only while inside the trailing
    /// visibility window; rows closed before `closed_at` existed fall back
    /// to `updated_at`.
    pub async fn list_board(pool: &PgPool) -> Result<Vec<BoardTicketRow>, sqlx::Error> {
        let query = format!(
            "SELECT {BOARD_COLUMNS} \
             FROM tickets t \
             JOIN companies c ON c.id = t.company_id \
             LEFT JOIN users u ON u.id = t.assigned_to_id \
             WHERE t.status <> 'CLOSED' \
                OR t.closed_at >= NOW() - make_interval(days => $1) \
                OR (t.closed_at IS NULL AND t.updated_at >= NOW() - make_interval(days => $1)) \
             ORDER BY t.kanban_order ASC, t.created_at DESC"
        );
        sqlx::query_as::<_, BoardTicketRow>(&query)
            .bind(CLOSED_VISIBILITY_DAYS as i32)
            .fetch_all(pool)
            .await
    }

    /// Find a ticket by its primary key.
    pub async fn find_by_id(pool: &PgPool, id: TicketId) -> Result<Option<Ticket>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tickets WHERE id = $1");
        sqlx::query_as::<_, Ticket>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Load only the current `status`/`kanban_order` of a ticket.
    pub async fn find_position(
        pool: &PgPool,
        id: TicketId,
    ) -> Result<Option<TicketPosition>, sqlx::Error> {
        sqlx::query_as::<_, TicketPosition>(
            "SELECT status, kanban_order FROM tickets WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// The order value a newly created ticket takes in `status`:
    /// one past the current maximum, or 0 for an empty column.
    pub async fn next_order(pool: &PgPool, status: TicketStatus) -> Result<i32, sqlx::Error> {
        sqlx::query_scalar::<_, i32>(
            "SELECT COALESCE(MAX(kanban_order) + 1, 0) FROM tickets WHERE status = $1",
        )
        .bind(status.as_str())
        .fetch_one(pool)
        .await
    }

    /// Insert a new ticket, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateTicket,
        created_by_id: UserId,
        kanban_order: i32,
    ) -> Result<Ticket, sqlx::Error> {
        let query = format!(
            "INSERT INTO tickets \
                (subject, description, priority, company_id, assigned_to_id, \
                 created_by_id, kanban_order) \
             VALUES ($1, $2, COALESCE($3, 'NORMAL'), $4, $5, $6, $7) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Ticket>(&query)
            .bind(&input.subject)
            .bind(&input.description)
            .bind(input.priority.map(|p| p.as_str()))
            .bind(input.company_id)
            .bind(input.assigned_to_id)
            .bind(created_by_id)
            .bind(kanban_order)
            .fetch_one(pool)
            .await
    }

    /// Apply one reorder plan in a single transaction.
    ///
    /// Updates the moved ticket's status, order, and status-driven
    /// timestamps, then renumbers every affected sibling. Any missing row
    /// rolls the whole transaction back -- partial renumbering is never
    /// observable by concurrent readers.
    pub async fn apply_reorder(
        pool: &PgPool,
        id: TicketId,
        new_status: TicketStatus,
        new_order: i32,
        transition: StatusTransition,
        affected: &[OrderUpdate],
    ) -> Result<ReorderApplied, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let mut sets = vec![
            "status = $2".to_string(),
            "kanban_order = $3".to_string(),
            "updated_at = NOW()".to_string(),
        ];
        match transition.resolved_at {
            TimestampDelta::Set => sets.push("resolved_at = NOW()".to_string()),
            TimestampDelta::Clear => sets.push("resolved_at = NULL".to_string()),
            TimestampDelta::Keep => {}
        }
        match transition.closed_at {
            TimestampDelta::Set => sets.push("closed_at = NOW()".to_string()),
            TimestampDelta::Clear => sets.push("closed_at = NULL".to_string()),
            TimestampDelta::Keep => {}
        }

        let query = format!("UPDATE tickets SET {} WHERE id = $1", sets.join(", "));
        let result = sqlx::query(&query)
            .bind(id)
            .bind(new_status.as_str())
            .bind(new_order)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(ReorderApplied::TicketMissing);
        }

        for update in affected {
            let result = sqlx::query(
                "UPDATE tickets SET kanban_order = $2, updated_at = NOW() WHERE id = $1",
            )
            .bind(update.id)
            .bind(update.kanban_order)
            .execute(&mut *tx)
            .await?;
            if result.rows_affected() == 0 {
                tx.rollback().await?;
                return Ok(ReorderApplied::SiblingMissing(update.id));
            }
        }

        tx.commit().await?;
        Ok(ReorderApplied::Committed)
    }
}
