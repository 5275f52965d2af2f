//! Click selection: replace, append and toggle.

use super::SessionState;
use crate::model::ItemRef;

/// Compute the session after clicking `clicked`.
///
/// Clicking an item that is already active deselects it, with or without the
/// append modifier. Otherwise the modifier appends the item and a plain click
/// replaces the whole selection with it.
pub fn resolve_selection(clicked: &ItemRef, append: bool, session: &SessionState) -> SessionState {
    let mut next = session.clone();
    if session.is_active(&clicked.item_id) {
        next.active_items.retain(|item| item.item_id != clicked.item_id);
        log::debug!("Deselected {} '{}'", clicked.item_type.name(), clicked.item_id);
    } else if append {
        next.active_items.push(clicked.clone());
        log::debug!(
            "Added {} '{}' to selection ({} active)",
            clicked.item_type.name(),
            clicked.item_id,
            next.active_items.len()
        );
    } else {
        next.active_items = vec![clicked.clone()];
        log::debug!("Selected {} '{}'", clicked.item_type.name(), clicked.item_id);
    }
    next
}

/// Clear the selection (escape/cancel).
pub fn unset_active(session: &SessionState) -> SessionState {
    SessionState {
        active_items: Vec::new(),
        ..session.clone()
    }
}
