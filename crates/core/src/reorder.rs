//! The reorder planner: translate a drag gesture into persistence
//! instructions.
//!
//! [`plan_reorder`] is a total, pure function over its inputs (the target
//! index is clamped); it never touches I/O and never fails beyond "the
//! ticket is not on this board".

use serde::{Deserialize, Serialize};

use crate::board::{Board, OrderUpdate};
use crate::ticket::TicketStatus;
use crate::types::TicketId;

/// Wire contract of the reorder endpoint, shared by client and server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderRequest {
    pub ticket_id: TicketId,
    pub new_status: TicketStatus,
    pub new_order: i32,
    pub affected_tickets: Vec<OrderUpdate>,
}

/// The concrete outcome of planning one drag gesture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReorderPlan {
    pub ticket_id: TicketId,
    pub source_status: TicketStatus,
    pub new_status: TicketStatus,
    pub new_order: i32,
    pub previous_order: i32,
    /// Order assignments for displaced siblings in the target column.
    /// Excludes the moved ticket; contains only entries whose order
    /// actually changed.
    pub affected_tickets: Vec<OrderUpdate>,
}

impl ReorderPlan {
    /// True when the drop lands the card exactly where it already was and
    /// displaces nothing. The coordinator skips the network call entirely.
    pub fn is_noop(&self) -> bool {
        self.new_status == self.source_status
            && self.new_order == self.previous_order
            && self.affected_tickets.is_empty()
    }

    /// The request body to send to the persistence endpoint.
    pub fn request(&self) -> ReorderRequest {
        ReorderRequest {
            ticket_id: self.ticket_id,
            new_status: self.new_status,
            new_order: self.new_order,
            affected_tickets: self.affected_tickets.clone(),
        }
    }

    /// Apply this plan to a board snapshot: remove, insert at the planned
    /// position with the planned order, then renumber displaced siblings.
    pub fn apply_to(&self, board: &Board) -> Board {
        let (board, removed) = board.remove_ticket(self.ticket_id);
        let Some(mut card) = removed else {
            return board;
        };
        card.kanban_order = self.new_order;
        board
            .insert_ticket(card, self.new_status, self.new_order as usize)
            .apply_order_updates(&self.affected_tickets)
    }
}

/// Compute the minimal order reassignment for dropping `ticket_id` into
/// `target_status` at `target_index` (0-based, relative to the target
/// column's rendered list without the moved ticket; clamped to its length).
///
/// Every ticket in the target column is assigned `order = positional index`;
/// entries already carrying their index are omitted from the affected set.
/// Returns `None` if the ticket is not on the board.
pub fn plan_reorder(
    board: &Board,
    ticket_id: TicketId,
    target_status: TicketStatus,
    target_index: usize,
) -> Option<ReorderPlan> {
    let (source_status, _, card) = board.find_ticket(ticket_id)?;
    let previous_order = card.kanban_order;

    // The target column as rendered, without the moved ticket.
    let mut target: Vec<(TicketId, i32)> = board
        .column(target_status)
        .iter()
        .filter(|t| t.id != ticket_id)
        .map(|t| (t.id, t.kanban_order))
        .collect();

    let index = target_index.min(target.len());
    target.insert(index, (ticket_id, previous_order));

    let affected_tickets: Vec<OrderUpdate> = target
        .iter()
        .enumerate()
        .filter(|(i, (id, order))| *id != ticket_id && *order != *i as i32)
        .map(|(i, (id, _))| OrderUpdate {
            id: *id,
            kanban_order: i as i32,
        })
        .collect();

    Some(ReorderPlan {
        ticket_id,
        source_status,
        new_status: target_status,
        new_order: index as i32,
        previous_order,
        affected_tickets,
    })
}
