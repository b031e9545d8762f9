pub mod kanban;
pub mod tickets;
