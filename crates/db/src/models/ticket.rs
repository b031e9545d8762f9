//! Ticket entity model and DTOs.
//!
//! `status` and `priority` are stored as TEXT (constrained in the schema)
//! and parsed into the core enums at the query boundary.

use helpdesk_core::board::{AssigneeRef, BoardTicket, CompanyRef};
use helpdesk_core::error::CoreError;
use helpdesk_core::ticket::{TicketPriority, TicketStatus};
use helpdesk_core::types::{TicketId, Timestamp, UserId};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `tickets` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: TicketId,
    pub ticket_number: i64,
    pub subject: String,
    pub description: Option<String>,
    pub status: String,
    pub priority: String,
    pub kanban_order: i32,
    pub company_id: uuid::Uuid,
    pub assigned_to_id: Option<UserId>,
    pub created_by_id: UserId,
    pub resolved_at: Option<Timestamp>,
    pub closed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// The `status`/`kanban_order` projection loaded before a reorder, used for
/// timestamp-delta computation and the audit diff.
#[derive(Debug, Clone, FromRow)]
pub struct TicketPosition {
    pub status: String,
    pub kanban_order: i32,
}

/// One row of the board read query: ticket columns plus denormalized
/// company/assignee display fields from the joined tables.
#[derive(Debug, Clone, FromRow)]
pub struct BoardTicketRow {
    pub id: TicketId,
    pub ticket_number: i64,
    pub subject: String,
    pub status: String,
    pub priority: String,
    pub kanban_order: i32,
    pub created_at: Timestamp,
    pub company_id: uuid::Uuid,
    pub company_name: String,
    pub company_short_name: String,
    pub assigned_to_id: Option<UserId>,
    pub assignee_name: Option<String>,
    pub assignee_avatar: Option<String>,
}

impl BoardTicketRow {
    /// Convert into the core board card, parsing the stored enum strings.
    pub fn into_card(self) -> Result<BoardTicket, CoreError> {
        let status = TicketStatus::parse(&self.status)?;
        let priority = parse_priority(&self.priority)?;
        Ok(BoardTicket {
            id: self.id,
            ticket_number: self.ticket_number,
            subject: self.subject,
            status,
            priority,
            kanban_order: self.kanban_order,
            created_at: self.created_at,
            company: CompanyRef {
                id: self.company_id,
                name: self.company_name,
                short_name: self.company_short_name,
            },
            assignee: match self.assigned_to_id {
                Some(id) => Some(AssigneeRef {
                    id,
                    name: self.assignee_name.unwrap_or_default(),
                    avatar: self.assignee_avatar,
                }),
                None => None,
            },
        })
    }
}

fn parse_priority(value: &str) -> Result<TicketPriority, CoreError> {
    match value {
        "LOW" => Ok(TicketPriority::Low),
        "NORMAL" => Ok(TicketPriority::Normal),
        "HIGH" => Ok(TicketPriority::High),
        "URGENT" => Ok(TicketPriority::Urgent),
        other => Err(CoreError::Internal(format!(
            "Unknown priority '{other}' stored for a ticket"
        ))),
    }
}

/// DTO for creating a new ticket.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTicket {
    pub subject: String,
    pub description: Option<String>,
    pub company_id: uuid::Uuid,
    pub priority: Option<TicketPriority>,
    pub assigned_to_id: Option<UserId>,
}
