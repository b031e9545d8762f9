//! Audit trail constants and change-diff helpers.
//!
//! Lives in `core` (no internal deps) so the repository layer and any future
//! worker tooling can share the same action vocabulary.

use serde_json::{json, Map, Value};

/// Known audit actions.
pub mod actions {
    pub const CREATE: &str = "CREATE";
    pub const UPDATE: &str = "UPDATE";
    pub const DELETE: &str = "DELETE";
}

/// Known audited entity types.
pub mod entities {
    pub const TICKET: &str = "Ticket";
}

/// Build a `{field: {"old": ..., "new": ...}}` change map from two field
/// snapshots, keeping only fields whose value actually changed.
///
/// Returns `None` when nothing changed, in which case no audit entry should
/// be written.
pub fn diff_changes(old_data: &Map<String, Value>, new_data: &Map<String, Value>) -> Option<Value> {
    let mut changes = Map::new();

    for (key, new_value) in new_data {
        let old_value = old_data.get(key).cloned().unwrap_or(Value::Null);
        if &old_value != new_value {
            changes.insert(
                key.clone(),
                json!({ "old": old_value, "new": new_value }),
            );
        }
    }

    if changes.is_empty() {
        None
    } else {
        Some(Value::Object(changes))
    }
}
