//! Rackelev - Rack Elevation Editor
//!
//! Core of a rack elevation editor: the project data model, observable
//! project and session stores, the selection and mode transition resolvers,
//! scene scale fitting and the scene layout engine, tied together by a render
//! driver that feeds laid out scenes to a host viewport.

pub mod config;
pub mod constants;
pub mod driver;
pub mod editor;
pub mod error;
pub mod keybindings;
pub mod library;
pub mod model;
pub mod sample;
pub mod scale;
pub mod scene;
pub mod session;
pub mod store;
pub mod viewport;

#[cfg(test)]
mod tests;

pub use config::AppConfig;
pub use driver::RenderDriver;
pub use editor::{Editor, InputEvent};
pub use error::ProjectError;
pub use model::{Cabinet, ItemRef, ItemType, Project};
pub use scene::{Region, RegionKind, Scene};
pub use session::{EditMode, Mode, Orientation, SessionState, ViewMode};
pub use store::{Store, Subscription};
pub use viewport::{HeadlessViewport, Viewport};
