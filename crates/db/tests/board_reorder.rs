//! Integration tests for the board repositories against a real database:
//! - Board read ordering and the closed-ticket visibility window
//! - The atomic reorder transaction (all-or-nothing renumbering)
//! - Status-driven resolved_at / closed_at maintenance

use sqlx::PgPool;

use helpdesk_core::board::OrderUpdate;
use helpdesk_core::ticket::{StatusTransition, TicketStatus};
use helpdesk_core::types::{TicketId, UserId};
use helpdesk_db::models::ticket::CreateTicket;
use helpdesk_db::repositories::{ReorderApplied, TicketRepo};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn seed_company(pool: &PgPool) -> uuid::Uuid {
    sqlx::query_scalar::<_, uuid::Uuid>(
        "INSERT INTO companies (name, short_name) VALUES ($1, $2) RETURNING id",
    )
    .bind("Acme BV")
    .bind(format!("AC{}", &uuid::Uuid::new_v4().simple().to_string()[..6]))
    .fetch_one(pool)
    .await
    .unwrap()
}

async fn seed_user(pool: &PgPool) -> UserId {
    sqlx::query_scalar::<_, uuid::Uuid>(
        "INSERT INTO users (name, email) VALUES ($1, $2) RETURNING id",
    )
    .bind("Test Agent")
    .bind(format!("{}@example.test", uuid::Uuid::new_v4().simple()))
    .fetch_one(pool)
    .await
    .unwrap()
}

fn new_ticket(company_id: uuid::Uuid, subject: &str) -> CreateTicket {
    CreateTicket {
        subject: subject.to_string(),
        description: None,
        company_id,
        priority: None,
        assigned_to_id: None,
    }
}

async fn seed_ticket(pool: &PgPool, company_id: uuid::Uuid, user_id: UserId, subject: &str) -> TicketId {
    let order = TicketRepo::next_order(pool, TicketStatus::Open).await.unwrap();
    TicketRepo::create(pool, &new_ticket(company_id, subject), user_id, order)
        .await
        .unwrap()
        .id
}

async fn ticket_state(pool: &PgPool, id: TicketId) -> (String, i32) {
    let position = TicketRepo::find_position(pool, id).await.unwrap().unwrap();
    (position.status, position.kanban_order)
}

// ---------------------------------------------------------------------------
// Test: creation appends to the OPEN column
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_create_appends_to_open_column(pool: PgPool) {
    let company = seed_company(&pool).await;
    let user = seed_user(&pool).await;

    assert_eq!(TicketRepo::next_order(&pool, TicketStatus::Open).await.unwrap(), 0);

    let first = seed_ticket(&pool, company, user, "Printer on fire").await;
    let second = seed_ticket(&pool, company, user, "VPN down").await;

    assert_eq!(ticket_state(&pool, first).await, ("OPEN".to_string(), 0));
    assert_eq!(ticket_state(&pool, second).await, ("OPEN".to_string(), 1));
}

// ---------------------------------------------------------------------------
// Test: board read groups, orders, and joins display fields
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_list_board_orders_and_joins(pool: PgPool) {
    let company = seed_company(&pool).await;
    let user = seed_user(&pool).await;

    let t1 = seed_ticket(&pool, company, user, "First").await;
    let t2 = seed_ticket(&pool, company, user, "Second").await;

    let rows = TicketRepo::list_board(&pool).await.unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].id, t1);
    assert_eq!(rows[1].id, t2);
    assert_eq!(rows[0].company_name, "Acme BV");
    // Creation defaulted the assignee to the creator.
    assert_eq!(rows[0].assigned_to_id, Some(user));
    assert_eq!(rows[0].assignee_name.as_deref(), Some("Test Agent"));

    let card = rows[0].clone().into_card().unwrap();
    assert_eq!(card.status, TicketStatus::Open);
    assert_eq!(card.kanban_order, 0);
}

// ---------------------------------------------------------------------------
// Test: closed tickets leave the board after the visibility window
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_closed_tickets_age_off_the_board(pool: PgPool) {
    let company = seed_company(&pool).await;
    let user = seed_user(&pool).await;

    let recent = seed_ticket(&pool, company, user, "Recently closed").await;
    let ancient = seed_ticket(&pool, company, user, "Closed weeks ago").await;

    sqlx::query("UPDATE tickets SET status = 'CLOSED', closed_at = NOW() - INTERVAL '2 days' WHERE id = $1")
        .bind(recent)
        .execute(&pool)
        .await
        .unwrap();
    sqlx::query(
        "UPDATE tickets SET status = 'CLOSED', closed_at = NOW() - INTERVAL '30 days', \
         updated_at = NOW() - INTERVAL '30 days' WHERE id = $1",
    )
    .bind(ancient)
    .execute(&pool)
    .await
    .unwrap();

    let rows = TicketRepo::list_board(&pool).await.unwrap();
    let ids: Vec<TicketId> = rows.iter().map(|r| r.id).collect();
    assert!(ids.contains(&recent));
    assert!(!ids.contains(&ancient));
}

// ---------------------------------------------------------------------------
// Test: closed ticket without closed_at falls back to updated_at
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_closed_without_timestamp_uses_updated_at(pool: PgPool) {
    let company = seed_company(&pool).await;
    let user = seed_user(&pool).await;

    let legacy = seed_ticket(&pool, company, user, "Legacy closed row").await;
    sqlx::query("UPDATE tickets SET status = 'CLOSED', closed_at = NULL WHERE id = $1")
        .bind(legacy)
        .execute(&pool)
        .await
        .unwrap();

    // updated_at is recent, so the row stays visible.
    let rows = TicketRepo::list_board(&pool).await.unwrap();
    assert!(rows.iter().any(|r| r.id == legacy));
}

// ---------------------------------------------------------------------------
// Test: the reorder transaction moves and renumbers atomically
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_reorder_moves_and_renumbers(pool: PgPool) {
    let company = seed_company(&pool).await;
    let user = seed_user(&pool).await;

    let t1 = seed_ticket(&pool, company, user, "T1").await;
    let t2 = seed_ticket(&pool, company, user, "T2").await;
    let t3 = seed_ticket(&pool, company, user, "T3").await;

    // Move T3 to the front of OPEN: T1 and T2 shift down.
    let transition = StatusTransition::compute(TicketStatus::Open, TicketStatus::Open);
    let applied = TicketRepo::apply_reorder(
        &pool,
        t3,
        TicketStatus::Open,
        0,
        transition,
        &[
            OrderUpdate { id: t1, kanban_order: 1 },
            OrderUpdate { id: t2, kanban_order: 2 },
        ],
    )
    .await
    .unwrap();

    assert_eq!(applied, ReorderApplied::Committed);
    assert_eq!(ticket_state(&pool, t3).await, ("OPEN".to_string(), 0));
    assert_eq!(ticket_state(&pool, t1).await, ("OPEN".to_string(), 1));
    assert_eq!(ticket_state(&pool, t2).await, ("OPEN".to_string(), 2));
}

// ---------------------------------------------------------------------------
// Test: a vanished sibling aborts the whole transaction
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_missing_sibling_rolls_back_everything(pool: PgPool) {
    let company = seed_company(&pool).await;
    let user = seed_user(&pool).await;

    let t1 = seed_ticket(&pool, company, user, "T1").await;
    let t2 = seed_ticket(&pool, company, user, "T2").await;
    let ghost = uuid::Uuid::new_v4();

    let transition = StatusTransition::compute(TicketStatus::Open, TicketStatus::Waiting);
    let applied = TicketRepo::apply_reorder(
        &pool,
        t1,
        TicketStatus::Waiting,
        0,
        transition,
        &[
            OrderUpdate { id: t2, kanban_order: 0 },
            OrderUpdate { id: ghost, kanban_order: 1 },
        ],
    )
    .await
    .unwrap();

    assert_eq!(applied, ReorderApplied::SiblingMissing(ghost));
    // Nothing moved: the moved ticket's update and T2's renumber were both
    // rolled back with the transaction.
    assert_eq!(ticket_state(&pool, t1).await, ("OPEN".to_string(), 0));
    assert_eq!(ticket_state(&pool, t2).await, ("OPEN".to_string(), 1));
}

// ---------------------------------------------------------------------------
// Test: unknown moved ticket leaves the database untouched
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_missing_ticket_reports_and_changes_nothing(pool: PgPool) {
    let company = seed_company(&pool).await;
    let user = seed_user(&pool).await;
    let t1 = seed_ticket(&pool, company, user, "T1").await;

    let transition = StatusTransition::compute(TicketStatus::Open, TicketStatus::Open);
    let applied = TicketRepo::apply_reorder(
        &pool,
        uuid::Uuid::new_v4(),
        TicketStatus::Open,
        0,
        transition,
        &[OrderUpdate { id: t1, kanban_order: 5 }],
    )
    .await
    .unwrap();

    assert_eq!(applied, ReorderApplied::TicketMissing);
    assert_eq!(ticket_state(&pool, t1).await, ("OPEN".to_string(), 0));
}

// ---------------------------------------------------------------------------
// Test: status transitions maintain resolved_at / closed_at
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_timestamps_follow_status_transitions(pool: PgPool) {
    let company = seed_company(&pool).await;
    let user = seed_user(&pool).await;
    let ticket = seed_ticket(&pool, company, user, "Lifecycle").await;

    // OPEN -> RESOLVED sets resolved_at.
    let transition = StatusTransition::compute(TicketStatus::Open, TicketStatus::Resolved);
    TicketRepo::apply_reorder(&pool, ticket, TicketStatus::Resolved, 0, transition, &[])
        .await
        .unwrap();
    let row = TicketRepo::find_by_id(&pool, ticket).await.unwrap().unwrap();
    let resolved_at = row.resolved_at.expect("resolved_at should be set");
    assert!(row.closed_at.is_none());

    // RESOLVED -> RESOLVED (pure reorder) keeps the original timestamp.
    let transition = StatusTransition::compute(TicketStatus::Resolved, TicketStatus::Resolved);
    TicketRepo::apply_reorder(&pool, ticket, TicketStatus::Resolved, 3, transition, &[])
        .await
        .unwrap();
    let row = TicketRepo::find_by_id(&pool, ticket).await.unwrap().unwrap();
    assert_eq!(row.resolved_at, Some(resolved_at));
    assert_eq!(row.kanban_order, 3);

    // RESOLVED -> CLOSED clears resolved_at and sets closed_at.
    let transition = StatusTransition::compute(TicketStatus::Resolved, TicketStatus::Closed);
    TicketRepo::apply_reorder(&pool, ticket, TicketStatus::Closed, 0, transition, &[])
        .await
        .unwrap();
    let row = TicketRepo::find_by_id(&pool, ticket).await.unwrap().unwrap();
    assert!(row.resolved_at.is_none());
    assert!(row.closed_at.is_some());

    // CLOSED -> OPEN clears closed_at again.
    let transition = StatusTransition::compute(TicketStatus::Closed, TicketStatus::Open);
    TicketRepo::apply_reorder(&pool, ticket, TicketStatus::Open, 0, transition, &[])
        .await
        .unwrap();
    let row = TicketRepo::find_by_id(&pool, ticket).await.unwrap().unwrap();
    assert!(row.resolved_at.is_none());
    assert!(row.closed_at.is_none());
}
