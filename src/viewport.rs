//! Host viewport abstraction.
//!
//! The render driver never draws anything itself; it hands finished scenes to
//! a [`Viewport`] and asks it for the container size and for measurements of
//! what it presented.

use rackelev_layout::Size;

use crate::scene::Scene;

/// A rendering surface owned by the host.
pub trait Viewport {
    /// Available container size in pixels, `None` while detached.
    fn container_size(&self) -> Option<Size>;

    /// Replace whatever is currently shown with `scene`.
    fn present(&mut self, scene: &Scene);

    /// Bounding size of a presented scene.
    ///
    /// The default trusts the laid out size. Surfaces that lay out text or
    /// apply their own padding override this with what they actually drew.
    fn measure(&self, scene: &Scene) -> Option<Size> {
        scene.size.is_measurable().then_some(scene.size)
    }
}

/// In-memory viewport with a fixed container size.
#[derive(Debug, Clone, Default)]
pub struct HeadlessViewport {
    size: Option<Size>,
    presented: usize,
    last: Option<Scene>,
}

impl HeadlessViewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: Some(Size::new(width, height)),
            ..Self::default()
        }
    }

    /// A viewport that reports no container (not attached yet).
    pub fn detached() -> Self {
        Self::default()
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.size = Some(Size::new(width, height));
    }

    /// Number of scenes presented so far.
    pub fn presented(&self) -> usize {
        self.presented
    }

    pub fn last_scene(&self) -> Option<&Scene> {
        self.last.as_ref()
    }
}

impl Viewport for HeadlessViewport {
    fn container_size(&self) -> Option<Size> {
        self.size
    }

    fn present(&mut self, scene: &Scene) {
        self.presented += 1;
        self.last = Some(scene.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Orientation;

    #[test]
    fn test_headless_records_presented_scenes() {
        let mut viewport = HeadlessViewport::new(800.0, 600.0);
        assert_eq!(viewport.container_size(), Some(Size::new(800.0, 600.0)));
        assert_eq!(viewport.presented(), 0);

        let scene = Scene::empty(0.5, Orientation::Rear);
        viewport.present(&scene);
        assert_eq!(viewport.presented(), 1);
        assert_eq!(viewport.last_scene(), Some(&scene));
    }

    #[test]
    fn test_detached_has_no_container() {
        let mut viewport = HeadlessViewport::detached();
        assert!(viewport.container_size().is_none());
        viewport.resize(10.0, 20.0);
        assert_eq!(viewport.container_size(), Some(Size::new(10.0, 20.0)));
    }

    #[test]
    fn test_empty_scene_is_not_measurable() {
        let viewport = HeadlessViewport::new(800.0, 600.0);
        assert!(viewport.measure(&Scene::empty(0.01, Orientation::Front)).is_none());
    }
}
