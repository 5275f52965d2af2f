//! rackelev_layout - geometry primitives for laying out rack elevations
//!
//! Plain pixel-space types shared by the scene layout engine and whatever
//! adapter ends up drawing the scene.

mod flex;
mod geometry;

pub use flex::distribute;
pub use geometry::{Point, Rectangle, Size};
