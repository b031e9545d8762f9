//! Handler for ticket creation -- the board's entry point.
//!
//! New tickets land at the bottom of the OPEN column. Everything else about
//! ticket CRUD lives outside this service.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

use helpdesk_core::audit::{actions, entities};
use helpdesk_core::error::CoreError;
use helpdesk_core::ticket::TicketStatus;
use helpdesk_db::models::audit::CreateAuditLog;
use helpdesk_db::models::ticket::CreateTicket;
use helpdesk_db::repositories::TicketRepo;

use crate::audit::spawn_audit;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/tickets
///
/// Create a ticket in the OPEN column, ordered after every existing open
/// ticket. Unassigned tickets default to the creator.
pub async fn create_ticket(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(mut input): Json<CreateTicket>,
) -> AppResult<impl IntoResponse> {
    if input.subject.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "subject must not be empty".into(),
        )));
    }

    if input.assigned_to_id.is_none() {
        input.assigned_to_id = Some(auth.user_id);
    }

    let kanban_order = TicketRepo::next_order(&state.pool, TicketStatus::Open).await?;
    let ticket = TicketRepo::create(&state.pool, &input, auth.user_id, kanban_order).await?;

    spawn_audit(
        state.pool.clone(),
        CreateAuditLog {
            entity_type: entities::TICKET.to_string(),
            entity_id: ticket.id.to_string(),
            action: actions::CREATE.to_string(),
            changes: None,
            metadata: None,
            user_id: auth.user_id,
        },
    );

    tracing::info!(
        ticket_id = %ticket.id,
        ticket_number = ticket.ticket_number,
        kanban_order,
        user_id = %auth.user_id,
        "Ticket created",
    );

    Ok((
        axum::http::StatusCode::CREATED,
        Json(DataResponse { data: ticket }),
    ))
}
