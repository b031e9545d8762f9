//! Route definitions for tickets and the kanban board.

use axum::routing::{get, patch, post};
use axum::Router;

use crate::handlers::{kanban, tickets};
use crate::state::AppState;

/// Ticket routes mounted at `/tickets`.
///
/// ```text
/// POST  /                 -> create_ticket
/// GET   /kanban           -> get_kanban_board
/// PATCH /kanban/reorder   -> reorder_kanban
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(tickets::create_ticket))
        .route("/kanban", get(kanban::get_kanban_board))
        .route("/kanban/reorder", patch(kanban::reorder_kanban))
}
