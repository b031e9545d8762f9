//! Handlers for the ticket kanban board: the board read and the reorder
//! persistence endpoint.

use std::collections::HashSet;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use serde_json::{json, Map, Value};

use helpdesk_core::audit::{actions, diff_changes, entities};
use helpdesk_core::board::Board;
use helpdesk_core::error::CoreError;
use helpdesk_core::reorder::ReorderRequest;
use helpdesk_core::ticket::{StatusTransition, TicketStatus};
use helpdesk_db::models::audit::CreateAuditLog;
use helpdesk_db::repositories::{ReorderApplied, TicketRepo};

use crate::audit::spawn_audit;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

/// Response for PATCH /tickets/kanban/reorder. The client reconciles via its
/// own follow-up board read, so there is nothing to return beyond the ack.
#[derive(Debug, Serialize)]
pub struct ReorderResponse {
    pub success: bool,
}

// ---------------------------------------------------------------------------
// Board read
// ---------------------------------------------------------------------------

/// GET /api/v1/tickets/kanban
///
/// Returns all five columns keyed by status, each ordered by
/// `(kanban_order asc, created_at desc)`. Closed tickets appear only inside
/// the trailing visibility window.
pub async fn get_kanban_board(
    _auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let rows = TicketRepo::list_board(&state.pool).await?;

    let cards = rows
        .into_iter()
        .map(|row| row.into_card())
        .collect::<Result<Vec<_>, _>>()
        .map_err(AppError::Core)?;

    let board = Board::from_tickets(cards);

    Ok(Json(DataResponse { data: board }))
}

// ---------------------------------------------------------------------------
// Reorder
// ---------------------------------------------------------------------------

/// PATCH /api/v1/tickets/kanban/reorder
///
/// Atomically persists one drag: the moved ticket's new column and order,
/// the renumbered siblings, and the status-driven timestamps. All row
/// updates happen in a single transaction; the audit entry is written
/// fire-and-forget after commit.
pub async fn reorder_kanban(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<ReorderRequest>,
) -> AppResult<impl IntoResponse> {
    validate_reorder(&input).map_err(AppError::Core)?;

    let position = TicketRepo::find_position(&state.pool, input.ticket_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Ticket",
                id: input.ticket_id.to_string(),
            })
        })?;

    let previous_status = TicketStatus::parse(&position.status).map_err(|_| {
        AppError::InternalError(format!(
            "Ticket {} has invalid stored status '{}'",
            input.ticket_id, position.status
        ))
    })?;

    let transition = StatusTransition::compute(previous_status, input.new_status);

    let applied = TicketRepo::apply_reorder(
        &state.pool,
        input.ticket_id,
        input.new_status,
        input.new_order,
        transition,
        &input.affected_tickets,
    )
    .await?;

    match applied {
        ReorderApplied::Committed => {}
        ReorderApplied::TicketMissing => {
            return Err(AppError::Core(CoreError::NotFound {
                entity: "Ticket",
                id: input.ticket_id.to_string(),
            }));
        }
        ReorderApplied::SiblingMissing(id) => {
            return Err(AppError::Core(CoreError::Conflict(format!(
                "Ticket {id} was removed while reordering"
            ))));
        }
    }

    // Audit only a genuine status/order change; pure same-place renumbers of
    // siblings do not produce an entry for the moved ticket.
    let old_fields = position_fields(previous_status, position.kanban_order);
    let new_fields = position_fields(input.new_status, input.new_order);
    if let Some(changes) = diff_changes(&old_fields, &new_fields) {
        spawn_audit(
            state.pool.clone(),
            CreateAuditLog {
                entity_type: entities::TICKET.to_string(),
                entity_id: input.ticket_id.to_string(),
                action: actions::UPDATE.to_string(),
                changes: Some(changes),
                metadata: Some(json!({
                    "source": "kanban",
                    "affectedCount": input.affected_tickets.len(),
                })),
                user_id: auth.user_id,
            },
        );
    }

    tracing::info!(
        ticket_id = %input.ticket_id,
        new_status = %input.new_status,
        new_order = input.new_order,
        affected = input.affected_tickets.len(),
        user_id = %auth.user_id,
        "Kanban reorder persisted",
    );

    Ok(Json(DataResponse {
        data: ReorderResponse { success: true },
    }))
}

/// Value-level validation of a reorder request.
///
/// Shape errors (missing fields, unknown status) are rejected by the JSON
/// extractor before this runs; this checks the constraints the type system
/// cannot express.
fn validate_reorder(input: &ReorderRequest) -> Result<(), CoreError> {
    if input.new_order < 0 {
        return Err(CoreError::Validation("newOrder must be >= 0".into()));
    }

    let mut seen = HashSet::with_capacity(input.affected_tickets.len());
    for affected in &input.affected_tickets {
        if affected.kanban_order < 0 {
            return Err(CoreError::Validation(format!(
                "kanbanOrder for ticket {} must be >= 0",
                affected.id
            )));
        }
        if affected.id == input.ticket_id {
            return Err(CoreError::Validation(
                "affectedTickets must not contain the moved ticket".into(),
            ));
        }
        if !seen.insert(affected.id) {
            return Err(CoreError::Validation(format!(
                "Duplicate ticket {} in affectedTickets",
                affected.id
            )));
        }
    }

    Ok(())
}

fn position_fields(status: TicketStatus, kanban_order: i32) -> Map<String, Value> {
    let mut fields = Map::new();
    fields.insert("status".to_string(), json!(status.as_str()));
    fields.insert("kanbanOrder".to_string(), json!(kanban_order));
    fields
}
