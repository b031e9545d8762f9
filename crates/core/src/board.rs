//! The in-memory kanban board: five status columns of ordered ticket cards.
//!
//! All operations are pure -- they take `&self` and return a new [`Board`],
//! so callers can hold a snapshot for rollback by keeping the old value.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::ticket::{TicketPriority, TicketStatus};
use crate::types::{Timestamp, TicketId, UserId};

/// Denormalized company reference shown on a board card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyRef {
    pub id: uuid::Uuid,
    pub name: String,
    pub short_name: String,
}

/// Denormalized assignee reference shown on a board card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssigneeRef {
    pub id: UserId,
    pub name: String,
    pub avatar: Option<String>,
}

/// The board-relevant projection of a ticket.
///
/// Display fields (company, assignee, priority) are read-only here; only
/// `status` and `kanban_order` are ever mutated by the reorder subsystem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardTicket {
    pub id: TicketId,
    pub ticket_number: i64,
    pub subject: String,
    pub status: TicketStatus,
    pub priority: TicketPriority,
    pub kanban_order: i32,
    pub created_at: Timestamp,
    pub company: CompanyRef,
    pub assignee: Option<AssigneeRef>,
}

/// A single `{id, kanbanOrder}` assignment, as sent to the reorder endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderUpdate {
    pub id: TicketId,
    pub kanban_order: i32,
}

/// The client-side board snapshot: each status column's cards, ordered by
/// `(kanban_order asc, created_at desc)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Board {
    /// All five columns are always present, even when empty.
    pub columns: BTreeMap<TicketStatus, Vec<BoardTicket>>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// An empty board with all five columns present.
    pub fn new() -> Self {
        let mut columns = BTreeMap::new();
        for status in TicketStatus::ALL {
            columns.insert(status, Vec::new());
        }
        Self { columns }
    }

    /// Group a flat ticket list into columns and sort each column.
    pub fn from_tickets(tickets: impl IntoIterator<Item = BoardTicket>) -> Self {
        let mut board = Self::new();
        for ticket in tickets {
            board.columns.entry(ticket.status).or_default().push(ticket);
        }
        for column in board.columns.values_mut() {
            sort_column(column);
        }
        board
    }

    /// The cards in one column, in display order.
    pub fn column(&self, status: TicketStatus) -> &[BoardTicket] {
        self.columns
            .get(&status)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Total number of cards across all columns.
    pub fn len(&self) -> usize {
        self.columns.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Locate a ticket: `(column, index within column, card)`.
    pub fn find_ticket(&self, id: TicketId) -> Option<(TicketStatus, usize, &BoardTicket)> {
        for (status, tickets) in &self.columns {
            if let Some(index) = tickets.iter().position(|t| t.id == id) {
                return Some((*status, index, &tickets[index]));
            }
        }
        None
    }

    /// A new board with the ticket removed from whichever column holds it.
    ///
    /// Returns the removed card alongside, or `None` if the ticket is not on
    /// the board (in which case the returned board is an unchanged copy).
    pub fn remove_ticket(&self, id: TicketId) -> (Board, Option<BoardTicket>) {
        let mut board = self.clone();
        for tickets in board.columns.values_mut() {
            if let Some(index) = tickets.iter().position(|t| t.id == id) {
                let removed = tickets.remove(index);
                return (board, Some(removed));
            }
        }
        (board, None)
    }

    /// A new board with `ticket` inserted into `target_status` at
    /// `target_index` (clamped to the column length). The inserted card's
    /// `status` field is rewritten to match the column.
    pub fn insert_ticket(
        &self,
        mut ticket: BoardTicket,
        target_status: TicketStatus,
        target_index: usize,
    ) -> Board {
        let mut board = self.clone();
        ticket.status = target_status;
        let column = board.columns.entry(target_status).or_default();
        let index = target_index.min(column.len());
        column.insert(index, ticket);
        board
    }

    /// A new board with each named ticket's `kanban_order` overwritten and
    /// every touched column re-sorted. Unknown ids are ignored.
    pub fn apply_order_updates(&self, updates: &[OrderUpdate]) -> Board {
        let mut board = self.clone();
        let mut touched: Vec<TicketStatus> = Vec::new();
        for update in updates {
            for (status, tickets) in board.columns.iter_mut() {
                if let Some(ticket) = tickets.iter_mut().find(|t| t.id == update.id) {
                    ticket.kanban_order = update.kanban_order;
                    if !touched.contains(status) {
                        touched.push(*status);
                    }
                    break;
                }
            }
        }
        for status in touched {
            if let Some(column) = board.columns.get_mut(&status) {
                sort_column(column);
            }
        }
        board
    }
}

/// Stable sort by `(kanban_order asc, created_at desc)`.
fn sort_column(column: &mut [BoardTicket]) {
    column.sort_by(|a, b| {
        a.kanban_order
            .cmp(&b.kanban_order)
            .then_with(|| b.created_at.cmp(&a.created_at))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn card(number: i64, status: TicketStatus, order: i32) -> BoardTicket {
        BoardTicket {
            id: uuid::Uuid::new_v4(),
            ticket_number: number,
            subject: format!("Ticket {number}"),
            status,
            priority: TicketPriority::Normal,
            kanban_order: order,
            created_at: chrono::Utc
                .with_ymd_and_hms(2024, 3, 1, 0, 0, number as u32 % 60)
                .unwrap(),
            company: CompanyRef {
                id: uuid::Uuid::new_v4(),
                name: "Acme BV".into(),
                short_name: "ACME".into(),
            },
            assignee: None,
        }
    }

    #[test]
    fn test_new_board_has_all_columns() {
        let board = Board::new();
        assert_eq!(board.columns.len(), 5);
        assert!(board.is_empty());
        for status in TicketStatus::ALL {
            assert!(board.column(status).is_empty());
        }
    }

    #[test]
    fn test_from_tickets_groups_and_sorts() {
        let a = card(1, TicketStatus::Open, 2);
        let b = card(2, TicketStatus::Open, 0);
        let c = card(3, TicketStatus::Waiting, 1);
        let board = Board::from_tickets([a.clone(), b.clone(), c.clone()]);

        assert_eq!(board.column(TicketStatus::Open), &[b, a]);
        assert_eq!(board.column(TicketStatus::Waiting), &[c]);
        assert_eq!(board.len(), 3);
    }

    #[test]
    fn test_order_ties_break_by_created_at_desc() {
        let older = card(1, TicketStatus::Open, 0);
        let newer = card(30, TicketStatus::Open, 0);
        let board = Board::from_tickets([older.clone(), newer.clone()]);
        assert_eq!(board.column(TicketStatus::Open), &[newer, older]);
    }

    #[test]
    fn test_remove_ticket_is_pure() {
        let a = card(1, TicketStatus::Open, 0);
        let board = Board::from_tickets([a.clone()]);
        let (after, removed) = board.remove_ticket(a.id);

        assert_eq!(removed.as_ref(), Some(&a));
        assert!(after.column(TicketStatus::Open).is_empty());
        // The original snapshot is untouched.
        assert_eq!(board.column(TicketStatus::Open), &[a]);
    }

    #[test]
    fn test_remove_unknown_ticket_is_noop() {
        let board = Board::from_tickets([card(1, TicketStatus::Open, 0)]);
        let (after, removed) = board.remove_ticket(uuid::Uuid::new_v4());
        assert!(removed.is_none());
        assert_eq!(after, board);
    }

    #[test]
    fn test_insert_rewrites_status_and_clamps_index() {
        let a = card(1, TicketStatus::Open, 0);
        let board = Board::new();
        let after = board.insert_ticket(a.clone(), TicketStatus::InProgress, 99);

        let column = after.column(TicketStatus::InProgress);
        assert_eq!(column.len(), 1);
        assert_eq!(column[0].id, a.id);
        assert_eq!(column[0].status, TicketStatus::InProgress);
    }

    #[test]
    fn test_insert_shifts_subsequent_entries() {
        let a = card(1, TicketStatus::Open, 0);
        let b = card(2, TicketStatus::Open, 1);
        let c = card(3, TicketStatus::Waiting, 0);
        let board = Board::from_tickets([a.clone(), b.clone()]);

        let after = board.insert_ticket(c.clone(), TicketStatus::Open, 1);
        let ids: Vec<_> = after.column(TicketStatus::Open).iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![a.id, c.id, b.id]);
    }

    #[test]
    fn test_apply_order_updates_resorts_column() {
        let a = card(1, TicketStatus::Open, 0);
        let b = card(2, TicketStatus::Open, 1);
        let board = Board::from_tickets([a.clone(), b.clone()]);

        let after = board.apply_order_updates(&[
            OrderUpdate { id: a.id, kanban_order: 5 },
            OrderUpdate { id: b.id, kanban_order: 0 },
        ]);

        let ids: Vec<_> = after.column(TicketStatus::Open).iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![b.id, a.id]);
        // Snapshot untouched.
        assert_eq!(board.column(TicketStatus::Open)[0].kanban_order, 0);
    }

    #[test]
    fn test_find_ticket() {
        let a = card(1, TicketStatus::Waiting, 3);
        let board = Board::from_tickets([a.clone()]);
        let (status, index, found) = board.find_ticket(a.id).unwrap();
        assert_eq!(status, TicketStatus::Waiting);
        assert_eq!(index, 0);
        assert_eq!(found.id, a.id);
        assert!(board.find_ticket(uuid::Uuid::new_v4()).is_none());
    }
}
