//! Cross-module tests: editor scenarios and whole-pipeline properties.
//!
//! These drive the stores, resolvers, layout engine and render driver
//! together through the [`Editor`](crate::editor::Editor) facade.
