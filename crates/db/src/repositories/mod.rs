//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument.

pub mod audit_repo;
pub mod ticket_repo;

pub use audit_repo::AuditLogRepo;
pub use ticket_repo::{ReorderApplied, TicketRepo};
