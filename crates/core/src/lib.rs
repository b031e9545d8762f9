//! Domain logic for the helpdesk kanban board.
//!
//! This crate has no I/O and no internal dependencies: everything here is
//! pure data and pure functions so it can be used by the API server, the
//! repositories, and the board client alike.

pub mod audit;
pub mod board;
pub mod error;
pub mod reorder;
pub mod ticket;
pub mod types;
