//! Client-side kanban board: the optimistic mutation coordinator and its
//! transport abstraction.
//!
//! The coordinator owns an in-memory [`helpdesk_core::board::Board`]
//! snapshot and drives the reorder lifecycle against a pluggable
//! [`transport::BoardTransport`]: apply locally, persist, reconcile on
//! success, roll back on failure.

pub mod coordinator;
pub mod error;
pub mod transport;

pub use coordinator::{BoardCoordinator, ReorderOutcome};
pub use error::ClientError;
pub use transport::{BoardTransport, HttpTransport, TransportError};
