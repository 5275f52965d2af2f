//! Render driver: reactive glue between the stores, the layout engine and a
//! host viewport.
//!
//! The driver listens to both the project store and the session store. On
//! every emission it lays out the latest (project, session) pair and presents
//! the result. While the session scale is unset it instead runs the bootstrap
//! pass: lay out at [`NOMINAL_SCALE`], present, measure, and publish the
//! corrected scale to the session store, which in turn triggers the real
//! layout.

use std::cell::RefCell;
use std::rc::Rc;

use web_time::Instant;

use crate::constants::NOMINAL_SCALE;
use crate::model::Project;
use crate::scale::corrected_from_bootstrap;
use crate::scene::{Scene, layout, layout_at};
use crate::session::SessionState;
use crate::store::{Store, Subscription};
use crate::viewport::Viewport;

struct DriverState<V> {
    viewport: V,
    surface_ready: bool,
    /// Open [`RenderDriver::batch`] scopes; nothing is drawn while non-zero
    held: usize,
    last_scene: Option<Scene>,
}

impl<V: Viewport> DriverState<V> {
    /// Draw one pass. Returns a corrected scale when a bootstrap pass
    /// produced one; the caller publishes it once this state is released.
    fn draw(&mut self, project: &Project, session: &SessionState) -> Option<f32> {
        if !self.surface_ready {
            log::trace!("Surface not attached, skipping layout");
            return None;
        }
        if self.held > 0 {
            log::trace!("Batch in progress, deferring layout");
            return None;
        }
        if project.is_empty() {
            log::debug!("Project has no elevations, renderer idle");
            return None;
        }

        if session.scale > 0.0 {
            let start = Instant::now();
            let scene = layout(project, session);
            log::trace!(
                "Laid out {} regions at scale {:.2} in {:?}",
                scene.iter().count(),
                scene.scale,
                start.elapsed()
            );
            self.show(scene);
            None
        } else {
            self.bootstrap(project, session)
        }
    }

    fn bootstrap(&mut self, project: &Project, session: &SessionState) -> Option<f32> {
        let start = Instant::now();
        let nominal = layout_at(project, session, NOMINAL_SCALE);
        self.viewport.present(&nominal);
        let measured = self.viewport.measure(&nominal);
        let container = self.viewport.container_size();
        self.last_scene = Some(nominal);

        let corrected = match (measured, container) {
            (Some(measured), Some(container)) => corrected_from_bootstrap(measured, container),
            _ => None,
        };
        match corrected {
            Some(scale) => {
                log::info!(
                    "Bootstrap pass fitted scale {:.2} ({:?})",
                    scale,
                    start.elapsed()
                );
                Some(scale)
            }
            None => {
                log::debug!(
                    "Bootstrap measurement failed (scene {:?}, container {:?}), retrying on next update",
                    measured,
                    container
                );
                None
            }
        }
    }

    fn show(&mut self, scene: Scene) {
        self.viewport.present(&scene);
        self.last_scene = Some(scene);
    }
}

fn render<V: Viewport>(
    state: &RefCell<DriverState<V>>,
    project: &Project,
    session: &SessionState,
    session_store: &Store<SessionState>,
) {
    let corrected = state.borrow_mut().draw(project, session);
    if let Some(scale) = corrected {
        session_store.replace(session.with_scale(scale));
    }
}

/// Observes a project store and a session store and keeps a viewport up to
/// date. Dropping the driver ends both subscriptions.
pub struct RenderDriver<V> {
    state: Rc<RefCell<DriverState<V>>>,
    project: Store<Project>,
    session: Store<SessionState>,
    _subscriptions: Vec<Subscription>,
}

impl<V: Viewport + 'static> RenderDriver<V> {
    pub fn new(viewport: V, project: &Store<Project>, session: &Store<SessionState>) -> Self {
        let state = Rc::new(RefCell::new(DriverState {
            viewport,
            surface_ready: false,
            held: 0,
            last_scene: None,
        }));

        let on_project = {
            let state = Rc::clone(&state);
            let session = session.clone();
            project.subscribe(move |project| {
                let current = session.get();
                render(&state, project, &current, &session);
            })
        };
        let on_session = {
            let state = Rc::clone(&state);
            let project = project.clone();
            let session_store = session.clone();
            session.subscribe(move |session| {
                let current = project.get();
                render(&state, &current, session, &session_store);
            })
        };

        Self {
            state,
            project: project.clone(),
            session: session.clone(),
            _subscriptions: vec![on_project, on_session],
        }
    }

    /// The rendering surface became ready; draws the current state.
    pub fn attach_surface(&self) {
        self.state.borrow_mut().surface_ready = true;
        log::debug!("Surface attached");
        self.refresh();
    }

    pub fn detach_surface(&self) {
        self.state.borrow_mut().surface_ready = false;
        log::debug!("Surface detached");
    }

    pub fn is_surface_ready(&self) -> bool {
        self.state.borrow().surface_ready
    }

    /// Redraw the current (project, session) pair without waiting for an
    /// emission.
    pub fn refresh(&self) {
        let project = self.project.get();
        let session = self.session.get();
        render(&self.state, &project, &session, &self.session);
    }

    /// Run `f` with drawing suspended, then draw the resulting state once.
    ///
    /// Store writes made inside `f` are seen by the driver as one change, so a
    /// project and its session can be replaced together without a frame
    /// pairing the new project with the old session.
    pub fn batch<R>(&self, f: impl FnOnce() -> R) -> R {
        self.state.borrow_mut().held += 1;
        let result = f();
        let held = {
            let mut state = self.state.borrow_mut();
            state.held -= 1;
            state.held
        };
        if held == 0 {
            self.refresh();
        }
        result
    }

    /// The most recently presented scene.
    pub fn last_scene(&self) -> Option<Scene> {
        self.state.borrow().last_scene.clone()
    }

    pub fn with_viewport<R>(&self, f: impl FnOnce(&V) -> R) -> R {
        f(&self.state.borrow().viewport)
    }

    pub fn with_viewport_mut<R>(&self, f: impl FnOnce(&mut V) -> R) -> R {
        f(&mut self.state.borrow_mut().viewport)
    }
}
