//! Mode transitions triggered by the mode hotkeys.
//!
//! Pressing the key of a mode that is not current switches to it. Pressing it
//! again toggles that mode's view granularity, but only when the current
//! project and selection allow it. Every rejected request is a no-op.

use std::collections::HashSet;

use super::{Mode, SessionState, ViewMode};
use crate::model::{ItemRef, ItemType, Project};

/// Compute the session that results from requesting `requested`.
///
/// Returns `None` when the request does not change anything, so callers can
/// skip publishing (observers never see a no-op).
pub fn resolve_mode_change(
    session: &SessionState,
    project: &Project,
    requested: Mode,
) -> Option<SessionState> {
    let edit = &session.edit_mode;
    let next = match requested {
        Mode::Cab if edit.ru_view != ViewMode::Single => {
            if edit.mode != Mode::Cab {
                switch_mode(session, Mode::Cab)
            } else {
                toggle_cab_view(session, project)?
            }
        }
        Mode::Cab => {
            log::debug!("CAB requested while focused on a single RU, ignoring");
            return None;
        }
        Mode::Ru => {
            if edit.mode != Mode::Ru {
                switch_mode(session, Mode::Ru)
            } else {
                toggle_ru_view(session)?
            }
        }
        Mode::Integrate => {
            if edit.mode == Mode::Integrate {
                return None;
            }
            switch_mode(session, Mode::Integrate)
        }
    };

    log::debug!(
        "Mode change {}: {:?}/{:?} -> {}: {:?}/{:?}",
        edit.mode.name(),
        edit.cab_view,
        edit.ru_view,
        next.edit_mode.mode.name(),
        next.edit_mode.cab_view,
        next.edit_mode.ru_view
    );
    Some(next)
}

fn switch_mode(session: &SessionState, mode: Mode) -> SessionState {
    let mut next = session.clone();
    next.edit_mode.mode = mode;
    next
}

/// Re-press of CAB while already in CAB mode.
fn toggle_cab_view(session: &SessionState, project: &Project) -> Option<SessionState> {
    let mut next = session.clone();
    match session.edit_mode.cab_view {
        ViewMode::Single => {
            if project.elevation_count() <= 1 {
                log::debug!("Multi-cabinet view needs more than one elevation");
                return None;
            }
            next.edit_mode.cab_view = ViewMode::Multi;
            next.edit_mode.single_mode_object = None;
        }
        ViewMode::Multi => {
            let parents = distinct_parents(&session.active_items);
            if parents != 1 {
                log::debug!(
                    "Single-cabinet view needs selections in exactly one cabinet, found {}",
                    parents
                );
                return None;
            }
            next.edit_mode.cab_view = ViewMode::Single;
            next.edit_mode.single_mode_object = session.active_items.first().cloned();
        }
    }
    Some(next)
}

/// Re-press of RU while already in RU mode.
fn toggle_ru_view(session: &SessionState) -> Option<SessionState> {
    let mut next = session.clone();
    match session.edit_mode.ru_view {
        ViewMode::Multi => {
            let [only] = session.active_items.as_slice() else {
                log::debug!(
                    "Single-RU view needs exactly one selection, found {}",
                    session.active_items.len()
                );
                return None;
            };
            if only.item_type != ItemType::Ru {
                log::debug!("Single-RU view needs an RU selection");
                return None;
            }
            next.edit_mode.ru_view = ViewMode::Single;
            next.edit_mode.single_mode_object = Some(only.clone());
        }
        ViewMode::Single => {
            next.edit_mode.ru_view = ViewMode::Multi;
            // Multi-RU view stays nested inside a single-cabinet view
            next.edit_mode.single_mode_object = match session.edit_mode.cab_view {
                ViewMode::Single => session
                    .edit_mode
                    .single_mode_object
                    .as_ref()
                    .map(ItemRef::parent),
                ViewMode::Multi => None,
            };
        }
    }
    Some(next)
}

/// Number of distinct owning cabinets across the selection.
fn distinct_parents(items: &[ItemRef]) -> usize {
    items
        .iter()
        .map(|item| item.parent_id.as_str())
        .collect::<HashSet<_>>()
        .len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Cabinet, RackDimensions};

    fn project(ids: &[&str]) -> Project {
        Project::from_cabinets(
            ids.iter()
                .map(|id| Cabinet::new(id, 42, RackDimensions::new(24.0, 84.0, 42.0)).with_id(id))
                .collect(),
        )
        .unwrap()
    }

    fn with_active(session: &SessionState, items: Vec<ItemRef>) -> SessionState {
        SessionState {
            active_items: items,
            ..session.clone()
        }
    }

    #[test]
    fn test_switching_mode_keeps_granularity() {
        let project = project(&["a", "b"]);
        let session = SessionState::for_project(&project);

        let ru = resolve_mode_change(&session, &project, Mode::Ru).unwrap();
        assert_eq!(ru.edit_mode.mode, Mode::Ru);
        assert_eq!(ru.edit_mode.cab_view, ViewMode::Multi);
        assert_eq!(ru.edit_mode.ru_view, ViewMode::Multi);

        let cab = resolve_mode_change(&ru, &project, Mode::Cab).unwrap();
        assert_eq!(cab.edit_mode.mode, Mode::Cab);
        assert_eq!(cab.edit_mode.cab_view, ViewMode::Multi);
    }

    #[test]
    fn test_cab_multi_to_single_requires_one_parent() {
        let project = project(&["a", "b"]);
        let session = SessionState::for_project(&project);

        // Nothing selected
        assert!(resolve_mode_change(&session, &project, Mode::Cab).is_none());

        // Two cabinets selected
        let spread = with_active(
            &session,
            vec![ItemRef::cabinet("a"), ItemRef::ru("b", "b-ru-1")],
        );
        assert!(resolve_mode_change(&spread, &project, Mode::Cab).is_none());

        // Cabinet and one of its RUs share a parent
        let focused = with_active(
            &session,
            vec![ItemRef::ru("a", "a-ru-3"), ItemRef::cabinet("a")],
        );
        let next = resolve_mode_change(&focused, &project, Mode::Cab).unwrap();
        assert_eq!(next.edit_mode.cab_view, ViewMode::Single);
        assert_eq!(
            next.edit_mode.single_mode_object,
            Some(ItemRef::ru("a", "a-ru-3"))
        );
    }

    #[test]
    fn test_cab_single_to_multi_requires_multiple_elevations() {
        let single = project(&["a"]);
        let session = SessionState::for_project(&single);
        assert_eq!(session.edit_mode.cab_view, ViewMode::Single);
        assert!(resolve_mode_change(&session, &single, Mode::Cab).is_none());

        let double = project(&["a", "b"]);
        let mut focused = SessionState::for_project(&double);
        focused.edit_mode.cab_view = ViewMode::Single;
        focused.edit_mode.single_mode_object = Some(ItemRef::cabinet("a"));
        let next = resolve_mode_change(&focused, &double, Mode::Cab).unwrap();
        assert_eq!(next.edit_mode.cab_view, ViewMode::Multi);
        assert_eq!(next.edit_mode.single_mode_object, None);
    }

    #[test]
    fn test_cab_ignored_while_single_ru() {
        let project = project(&["a", "b"]);
        let mut session = SessionState::for_project(&project);
        session.edit_mode.mode = Mode::Ru;
        session.edit_mode.ru_view = ViewMode::Single;
        session.edit_mode.single_mode_object = Some(ItemRef::ru("a", "a-ru-1"));

        assert!(resolve_mode_change(&session, &project, Mode::Cab).is_none());
    }

    #[test]
    fn test_ru_multi_to_single() {
        let project = project(&["a", "b"]);
        let base = resolve_mode_change(&SessionState::for_project(&project), &project, Mode::Ru)
            .unwrap();

        // A cabinet selection does not qualify
        let cab = with_active(&base, vec![ItemRef::cabinet("a")]);
        assert!(resolve_mode_change(&cab, &project, Mode::Ru).is_none());

        // Two RUs do not qualify
        let two = with_active(
            &base,
            vec![ItemRef::ru("a", "a-ru-1"), ItemRef::ru("a", "a-ru-2")],
        );
        assert!(resolve_mode_change(&two, &project, Mode::Ru).is_none());

        let one = with_active(&base, vec![ItemRef::ru("a", "a-ru-2")]);
        let next = resolve_mode_change(&one, &project, Mode::Ru).unwrap();
        assert_eq!(next.edit_mode.ru_view, ViewMode::Single);
        assert_eq!(
            next.edit_mode.single_mode_object,
            Some(ItemRef::ru("a", "a-ru-2"))
        );
    }

    #[test]
    fn test_ru_single_to_multi_restores_cabinet_focus() {
        let project = project(&["a", "b"]);
        let mut session = SessionState::for_project(&project);
        session.edit_mode.mode = Mode::Ru;
        session.edit_mode.ru_view = ViewMode::Single;
        session.edit_mode.single_mode_object = Some(ItemRef::ru("b", "b-ru-7"));

        // Multi cabinet view: focus is cleared
        let next = resolve_mode_change(&session, &project, Mode::Ru).unwrap();
        assert_eq!(next.edit_mode.ru_view, ViewMode::Multi);
        assert_eq!(next.edit_mode.single_mode_object, None);

        // Single cabinet view: focus goes back to the owning cabinet
        session.edit_mode.cab_view = ViewMode::Single;
        let next = resolve_mode_change(&session, &project, Mode::Ru).unwrap();
        assert_eq!(next.edit_mode.single_mode_object, Some(ItemRef::cabinet("b")));
    }

    #[test]
    fn test_integrate_is_noop_when_current() {
        let project = project(&["a"]);
        let session = SessionState::for_project(&project);

        let next = resolve_mode_change(&session, &project, Mode::Integrate).unwrap();
        assert_eq!(next.edit_mode.mode, Mode::Integrate);
        assert_eq!(next.edit_mode.cab_view, session.edit_mode.cab_view);
        assert!(resolve_mode_change(&next, &project, Mode::Integrate).is_none());
    }
}
