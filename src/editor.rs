//! Editor facade: owns the stores and the render driver and maps input
//! events onto the resolvers.

use std::rc::Rc;
use std::sync::Arc;

use rackelev_layout::Point;

use crate::config::AppConfig;
use crate::driver::RenderDriver;
use crate::error::ProjectError;
use crate::keybindings::{Action, KeyBindings, KeyCode};
use crate::library::PopulatorLibrary;
use crate::model::{Cabinet, ItemRef, Populator, Project};
use crate::scale;
use crate::scene::Scene;
use crate::session::{
    Mode, Orientation, SessionState, resolve_mode_change, resolve_selection, unset_active,
};
use crate::store::Store;
use crate::viewport::Viewport;

/// Discrete user input.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// A click on a laid out region
    Click { item: ItemRef, append: bool },
    /// A key press
    Key(KeyCode),
}

/// The rack elevation editor.
pub struct Editor<V> {
    project: Store<Project>,
    session: Store<SessionState>,
    driver: RenderDriver<V>,
    keybindings: KeyBindings,
    library: PopulatorLibrary,
    zoom_step: f32,
}

impl<V: Viewport + 'static> Editor<V> {
    /// Create an editor with an empty project.
    pub fn new(viewport: V, config: &AppConfig, library: PopulatorLibrary) -> Self {
        let project = Store::new("project", Project::new());
        let session = Store::new("session", SessionState::default());
        let driver = RenderDriver::new(viewport, &project, &session);
        Self {
            project,
            session,
            driver,
            keybindings: config.keybindings.clone(),
            library,
            zoom_step: config.preferences.zoom_step,
        }
    }

    /// Load a project, starting a fresh session for it.
    pub fn load_project(&self, project: Project) {
        let session = SessionState::for_project(&project);
        log::info!(
            "Loaded project with {} elevations ({})",
            project.elevation_count(),
            session.summary()
        );
        self.driver.batch(|| {
            self.project.replace(project);
            self.session.replace(session);
        });
    }

    /// Replace the project snapshot while keeping the session, dropping
    /// selections that no longer resolve.
    pub fn replace_project(&self, project: Project) {
        self.driver.batch(|| {
            self.project.replace(project);
            let project = self.project.get();
            self.session.update(|session| session.reconciled(&project));
        });
    }

    /// The rendering surface is ready; draws for the first time.
    pub fn attach_surface(&self) {
        self.driver.attach_surface();
    }

    /// Dispatch an input event. Returns whether the session changed.
    pub fn handle(&self, event: InputEvent) -> bool {
        match event {
            InputEvent::Click { item, append } => self.click(&item, append),
            InputEvent::Key(key) => self.key(key),
        }
    }

    /// Click on an item taken from the last laid out scene.
    pub fn click(&self, item: &ItemRef, append: bool) -> bool {
        if !self.project.get().contains(item) {
            log::warn!(
                "Ignoring click on unknown {} '{}'",
                item.item_type.name(),
                item.item_id
            );
            return false;
        }
        let next = resolve_selection(item, append, &self.session.get());
        self.session.replace(next);
        true
    }

    /// Click at a position of the last presented scene.
    pub fn click_at(&self, point: Point, append: bool) -> bool {
        let target = self.driver.last_scene().and_then(|scene| {
            scene
                .hit_test(point)
                .and_then(|region| region.click_target().cloned())
        });
        match target {
            Some(item) => self.click(&item, append),
            None => {
                log::trace!("Nothing clickable at ({}, {})", point.x, point.y);
                false
            }
        }
    }

    pub fn key(&self, key: KeyCode) -> bool {
        match self.keybindings.action_for_key(key) {
            Some(action) => self.perform(action),
            None => {
                log::trace!("Unbound key {}", key);
                false
            }
        }
    }

    pub fn perform(&self, action: Action) -> bool {
        match action {
            Action::Mode(mode) => self.change_mode(mode),
            Action::ZoomIn => self.zoom(self.zoom_step),
            Action::ZoomOut => self.zoom(-self.zoom_step),
            Action::ClearSelection => self.clear_selection(),
            Action::FitToView => self.fit_to_view(),
        }
    }

    /// Request a mode. Rejected requests leave the session untouched.
    pub fn change_mode(&self, mode: Mode) -> bool {
        let project = self.project.get();
        self.session
            .update(|session| resolve_mode_change(session, &project, mode))
    }

    /// Change the scale by a signed delta. Ignored until the scene is fitted.
    pub fn zoom(&self, amount: f32) -> bool {
        self.session.update(|session| {
            if session.scale <= 0.0 {
                log::debug!("Zoom ignored, scale not fitted yet");
                return None;
            }
            let next = scale::zoom(session.scale, amount);
            ((next - session.scale).abs() > f32::EPSILON).then(|| session.with_scale(next))
        })
    }

    pub fn clear_selection(&self) -> bool {
        self.session.update(|session| {
            (!session.active_items.is_empty()).then(|| unset_active(session))
        })
    }

    pub fn set_orientation(&self, orientation: Orientation) -> bool {
        self.session.update(|session| {
            (session.orientation != orientation).then(|| session.with_orientation(orientation))
        })
    }

    /// Drop the current scale so the next pass refits the scene.
    pub fn fit_to_view(&self) -> bool {
        let reset = self
            .session
            .update(|session| (session.scale > 0.0).then(|| session.with_scale(0.0)));
        if !reset {
            // Already unset: a previous bootstrap failed, try again now
            self.driver.refresh();
        }
        reset
    }

    /// The host resized the container.
    pub fn container_resized(&self) {
        log::debug!("Container resized, refitting");
        self.fit_to_view();
    }

    /// Place a library populator into the single active RU.
    pub fn assign_populator(&self, populator_id: &str) -> Result<(), ProjectError> {
        let populator =
            self.library
                .get(populator_id)
                .ok_or_else(|| ProjectError::UnknownPopulator {
                    id: populator_id.to_string(),
                })?;
        self.edit_active_slot(|cabinet, slot| cabinet.place(slot, Arc::clone(&populator)))
    }

    /// Remove the populator starting at the single active RU.
    pub fn clear_active_slot(&self) -> Result<Option<Arc<Populator>>, ProjectError> {
        let mut removed = None;
        self.edit_active_slot(|cabinet, slot| {
            removed = cabinet.clear_slot(slot)?;
            Ok(())
        })?;
        Ok(removed)
    }

    fn edit_active_slot(
        &self,
        edit: impl FnOnce(&mut Cabinet, usize) -> Result<(), ProjectError>,
    ) -> Result<(), ProjectError> {
        let session = self.session.get();
        let rus: Vec<&ItemRef> = session.active_items.iter().filter(|i| i.is_ru()).collect();
        let [ru] = rus.as_slice() else {
            return Err(ProjectError::NoSingleActiveRu { active: rus.len() });
        };

        let mut project = (*self.project.get()).clone();
        let cabinet =
            project
                .cabinet_mut(&ru.parent_id)
                .ok_or_else(|| ProjectError::UnknownCabinet {
                    id: ru.parent_id.clone(),
                })?;
        let slot = cabinet
            .slot_index(&ru.item_id)
            .ok_or_else(|| ProjectError::UnknownRu {
                id: ru.item_id.clone(),
            })?;
        edit(cabinet, slot)?;
        self.replace_project(project);
        Ok(())
    }

    pub fn project(&self) -> Rc<Project> {
        self.project.get()
    }

    pub fn session(&self) -> Rc<SessionState> {
        self.session.get()
    }

    /// The most recently presented scene.
    pub fn scene(&self) -> Option<Scene> {
        self.driver.last_scene()
    }

    pub fn project_store(&self) -> &Store<Project> {
        &self.project
    }

    pub fn session_store(&self) -> &Store<SessionState> {
        &self.session
    }

    pub fn driver(&self) -> &RenderDriver<V> {
        &self.driver
    }

    pub fn library(&self) -> &PopulatorLibrary {
        &self.library
    }

    pub fn keybindings(&self) -> &KeyBindings {
        &self.keybindings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::two_rack_project;
    use crate::scene::RegionKind;
    use crate::session::ViewMode;
    use crate::viewport::HeadlessViewport;

    fn editor() -> Editor<HeadlessViewport> {
        let library = PopulatorLibrary::builtin();
        let project = two_rack_project(&library).unwrap();
        let editor = Editor::new(
            HeadlessViewport::new(1280.0, 720.0),
            &AppConfig::default(),
            library,
        );
        editor.load_project(project);
        editor.attach_surface();
        editor
    }

    fn first_cabinet(editor: &Editor<HeadlessViewport>) -> ItemRef {
        let project = editor.project();
        let id = &project.elevations[0].cabinet.id;
        ItemRef::cabinet(id)
    }

    fn ru_of(cabinet: &ItemRef, location: u32) -> ItemRef {
        ItemRef::ru(
            &cabinet.item_id,
            &crate::model::ru_id(&cabinet.item_id, location),
        )
    }

    #[test]
    fn test_attach_fits_scale() {
        let editor = editor();
        assert!(editor.session().scale > 0.0);
        assert!(editor.scene().is_some());
    }

    #[test]
    fn test_unknown_click_is_ignored() {
        let editor = editor();
        let before = editor.session();
        assert!(!editor.click(&ItemRef::cabinet("missing"), false));
        assert_eq!(editor.session(), before);
    }

    #[test]
    fn test_click_at_uses_last_scene() {
        let editor = editor();
        let rack = first_cabinet(&editor);
        let scene = editor.scene().unwrap();
        let center = scene.find(&rack.item_id).unwrap().bounds.center();

        assert!(editor.click_at(center, false));
        assert_eq!(editor.session().active_items, vec![rack]);
        assert!(!editor.click_at(Point::new(-10.0, -10.0), false));
    }

    #[test]
    fn test_zoom_keys() {
        let editor = editor();
        let fitted = editor.session().scale;

        assert!(editor.key(KeyCode::NumpadAdd));
        assert!((editor.session().scale - (fitted + 0.04)).abs() < 0.0001);
        assert!(editor.key(KeyCode::Minus));
        assert!((editor.session().scale - fitted).abs() < 0.0001);
        assert!(!editor.key(KeyCode::Letter('Q')));
    }

    #[test]
    fn test_escape_clears_selection() {
        let editor = editor();
        let rack = first_cabinet(&editor);
        editor.click(&rack, false);
        assert!(editor.key(KeyCode::Escape));
        assert!(editor.session().active_items.is_empty());
        // Nothing left to clear
        assert!(!editor.key(KeyCode::Escape));
    }

    #[test]
    fn test_fit_to_view_refits() {
        let editor = editor();
        let fitted = editor.session().scale;
        editor.zoom(0.5);
        assert!(editor.fit_to_view());
        assert!((editor.session().scale - fitted).abs() < 0.0001);
    }

    #[test]
    fn test_orientation_is_carried_into_scene() {
        let editor = editor();
        assert!(editor.set_orientation(Orientation::Rear));
        assert!(!editor.set_orientation(Orientation::Rear));
        assert_eq!(editor.scene().unwrap().orientation, Orientation::Rear);
    }

    #[test]
    fn test_assign_populator_to_active_ru() {
        let editor = editor();
        let rack = first_cabinet(&editor);
        editor.change_mode(Mode::Ru);

        // Nothing selected
        assert_eq!(
            editor.assign_populator("blank-1u"),
            Err(ProjectError::NoSingleActiveRu { active: 0 })
        );

        let slot = ru_of(&rack, 20);
        editor.click(&slot, false);
        editor.assign_populator("router-edge").unwrap();

        let scene = editor.scene().unwrap();
        let region = scene.find(&slot.item_id).unwrap();
        assert_eq!(region.kind, RegionKind::Ru);
        assert_eq!(region.span, 2);
        assert_eq!(region.label.as_deref(), Some("Edge Router"));
        assert!(region.active);
        // The covered slot is folded into the router
        assert!(scene.find(&ru_of(&rack, 21).item_id).is_none());

        assert_eq!(
            editor.assign_populator("nope"),
            Err(ProjectError::UnknownPopulator {
                id: "nope".to_string()
            })
        );
    }

    #[test]
    fn test_assign_into_occupied_slot_fails() {
        let editor = editor();
        let rack = first_cabinet(&editor);
        // Slot 2 (location 2) is covered by the sample router at the bottom
        editor.click(&ru_of(&rack, 2), false);
        let result = editor.assign_populator("blank-1u");
        assert!(matches!(result, Err(ProjectError::SlotOccupied { .. })));
    }

    #[test]
    fn test_clear_active_slot() {
        let editor = editor();
        let rack = first_cabinet(&editor);
        editor.click(&ru_of(&rack, 1), false);

        let removed = editor.clear_active_slot().unwrap().unwrap();
        assert_eq!(removed.id(), "router-edge");
        let project = editor.project();
        let cabinet = project.cabinet(&rack.item_id).unwrap();
        assert_eq!(cabinet.slot_runs().len(), 42);
    }

    #[test]
    fn test_replace_project_drops_stale_selection() {
        let editor = editor();
        let rack = first_cabinet(&editor);
        editor.click(&rack, false);
        editor.click(&ru_of(&rack, 5), true);
        assert_eq!(editor.session().active_items.len(), 2);

        let mut project = (*editor.project()).clone();
        project.elevations.remove(0);
        editor.replace_project(project);

        let session = editor.session();
        assert!(session.active_items.is_empty());
        assert_eq!(session.edit_mode.cab_view, ViewMode::Multi);
        // One elevation left, only one cabinet in the scene
        assert_eq!(editor.scene().unwrap().regions.len(), 1);
    }

    #[test]
    fn test_load_after_attach_renders_bootstrap_once() {
        let library = PopulatorLibrary::builtin();
        let project = two_rack_project(&library).unwrap();
        let editor = Editor::new(
            HeadlessViewport::new(1280.0, 720.0),
            &AppConfig::default(),
            library,
        );
        editor.attach_surface();
        assert_eq!(editor.driver().with_viewport(|v| v.presented()), 0);

        editor.load_project(project);
        assert_eq!(editor.driver().with_viewport(|v| v.presented()), 2);
        let scale = editor.session().scale;
        assert!(scale > 0.0);

        // Same scale, so one layout pass for the new snapshot
        editor.replace_project((*editor.project()).clone());
        assert_eq!(editor.driver().with_viewport(|v| v.presented()), 3);
        assert_eq!(editor.scene().unwrap().scale, scale);
    }
}
