//! Session (view) state: edit mode, view granularity, selection and scale.
//!
//! Session state has its own lifecycle, independent from the project: it is
//! created once per loaded project and then replaced wholesale by the
//! resolvers in [`transition`] and [`selection`].

pub mod selection;
pub mod transition;

use serde::{Deserialize, Serialize};

use crate::model::{ItemRef, ItemType, Project};

pub use selection::{resolve_selection, unset_active};
pub use transition::resolve_mode_change;

/// What kind of object the user is editing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Cab,
    Ru,
    Integrate,
}

impl Mode {
    pub fn name(&self) -> &'static str {
        match self {
            Mode::Cab => "CAB",
            Mode::Ru => "RU",
            Mode::Integrate => "INTEGRATE",
        }
    }
}

/// View granularity: focus on one object or show all of its peers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    Single,
    #[default]
    Multi,
}

/// Which face of the cabinets is being looked at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Front,
    Rear,
}

/// Mode plus per-object-type view granularity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct EditMode {
    pub mode: Mode,
    pub cab_view: ViewMode,
    pub ru_view: ViewMode,
    /// The focused object when either view is `Single`
    pub single_mode_object: Option<ItemRef>,
}

/// Complete session state. Never mutated in place once published.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SessionState {
    /// Scene scale; 0 means "not fitted yet, run the bootstrap pass"
    pub scale: f32,
    pub edit_mode: EditMode,
    /// Selected items in the order they were selected
    pub active_items: Vec<ItemRef>,
    pub orientation: Orientation,
}

impl SessionState {
    /// Initial session for a freshly loaded project.
    ///
    /// A project with more than one elevation starts in multi-cabinet view;
    /// otherwise the single cabinet (if any) is focused.
    pub fn for_project(project: &Project) -> Self {
        let cab_view = if project.elevation_count() > 1 {
            ViewMode::Multi
        } else {
            ViewMode::Single
        };
        let single_mode_object = match cab_view {
            ViewMode::Single => project.cabinets().next().map(|c| ItemRef::cabinet(&c.id)),
            ViewMode::Multi => None,
        };

        Self {
            scale: 0.0,
            edit_mode: EditMode {
                mode: Mode::Cab,
                cab_view,
                ru_view: ViewMode::Multi,
                single_mode_object,
            },
            active_items: Vec::new(),
            orientation: Orientation::Front,
        }
    }

    /// Copy with a different scale.
    pub fn with_scale(&self, scale: f32) -> Self {
        Self {
            scale,
            ..self.clone()
        }
    }

    /// Copy with a different orientation.
    pub fn with_orientation(&self, orientation: Orientation) -> Self {
        Self {
            orientation,
            ..self.clone()
        }
    }

    /// Whether the item with this id is currently selected.
    pub fn is_active(&self, item_id: &str) -> bool {
        self.active_items.iter().any(|item| item.item_id == item_id)
    }

    /// Copy adjusted to a replaced project: selections whose referent no
    /// longer exists are dropped and the focused object is repaired.
    ///
    /// Returns `None` when nothing needed to change.
    pub fn reconciled(&self, project: &Project) -> Option<Self> {
        let mut next = self.clone();
        next.active_items.retain(|item| project.contains(item));

        let edit = &mut next.edit_mode;
        if let Some(focus) = edit.single_mode_object.clone() {
            if !project.contains(&focus) {
                let parent = focus.parent();
                if edit.ru_view == ViewMode::Single {
                    // The focused RU vanished; fall back to the RU listing
                    edit.ru_view = ViewMode::Multi;
                }
                edit.single_mode_object = if edit.cab_view == ViewMode::Single
                    && focus.item_type == ItemType::Ru
                    && project.contains(&parent)
                {
                    Some(parent)
                } else {
                    None
                };
            }
        }
        if edit.cab_view == ViewMode::Single && edit.single_mode_object.is_none() {
            match project.elevation_count() {
                0 => {}
                1 => {
                    edit.single_mode_object =
                        project.cabinets().next().map(|c| ItemRef::cabinet(&c.id));
                }
                _ => {
                    // No cabinet to focus on; show them all
                    edit.cab_view = ViewMode::Multi;
                }
            }
        }

        if next == *self {
            None
        } else {
            let dropped = self.active_items.len() - next.active_items.len();
            if dropped > 0 {
                log::debug!("Dropped {} stale selections", dropped);
            }
            Some(next)
        }
    }

    /// One-line description for logs and the demo binary.
    pub fn summary(&self) -> String {
        format!(
            "mode={} cab={:?} ru={:?} focus={} active={} scale={:.2} facing={:?}",
            self.edit_mode.mode.name(),
            self.edit_mode.cab_view,
            self.edit_mode.ru_view,
            self.edit_mode
                .single_mode_object
                .as_ref()
                .map_or("-", |item| item.item_id.as_str()),
            self.active_items.len(),
            self.scale,
            self.orientation
        )
    }
}
