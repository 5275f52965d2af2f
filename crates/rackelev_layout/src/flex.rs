//! Weighted distribution of vertical space, bottom to top.
//!
//! A trimmed-down version of flex layout: every child carries a fill weight
//! and receives a share of the container height proportional to it.
//! There is no spacing and no intrinsic sizing, which is all a rack opening
//! needs (a populator spanning N units gets weight N).

use crate::geometry::Rectangle;

/// Split `container` into one rectangle per weight, stacked from the bottom
/// edge upwards in the same order as `weights`.
///
/// Non-positive or non-finite weights get no space. When all weights are zero
/// every child collapses to an empty rectangle on the container's bottom edge.
pub fn distribute(container: Rectangle, weights: &[f32]) -> Vec<Rectangle> {
    let total: f32 = weights.iter().copied().filter(|w| valid_weight(*w)).sum();
    let per_weight = if total > 0.0 {
        container.height / total
    } else {
        0.0
    };

    let mut offset = 0.0;
    let mut bounds = Vec::with_capacity(weights.len());
    for &weight in weights {
        let extent = if valid_weight(weight) {
            weight * per_weight
        } else {
            0.0
        };
        bounds.push(Rectangle::new(
            container.x,
            container.bottom() - offset - extent,
            container.width,
            extent,
        ));
        offset += extent;
    }
    bounds
}

#[inline]
fn valid_weight(weight: f32) -> bool {
    weight.is_finite() && weight > 0.0
}
