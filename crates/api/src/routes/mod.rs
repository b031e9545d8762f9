pub mod health;
pub mod tickets;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /tickets                          create (POST, requires auth)
/// /tickets/kanban                   board read (GET, requires auth)
/// /tickets/kanban/reorder           persist a drag (PATCH, requires auth)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/tickets", tickets::router())
}
