//! Scene scale fitting and zoom mathematics.
//!
//! The pixel size of a laid out scene depends on the scale, but the scene's
//! aspect ratio is only known after laying it out once. The bootstrap pass
//! lays the scene out at [`NOMINAL_SCALE`], measures the result and feeds the
//! measurement to [`corrected_scale`].

use rackelev_layout::Size;

use crate::constants::{FIT_MARGIN, MIN_SCALE, NOMINAL_SCALE};

/// Axis that limits how large the scene can be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitAxis {
    Width,
    Height,
}

/// Round to two decimal places.
pub fn round_hundredths(value: f32) -> f32 {
    (value * 100.0).round() / 100.0
}

/// Convert a size measured at `scale` back to unscaled scene units.
///
/// Returns `None` for degenerate measurements or scales.
pub fn true_size(measured: Size, scale: f32) -> Option<Size> {
    if !measured.is_measurable() || !(scale.is_finite() && scale > 0.0) {
        return None;
    }
    Some(Size::new(measured.width / scale, measured.height / scale))
}

/// The axis whose extent is largest relative to the container.
pub fn limiting_axis(scene: Size, container: Size) -> FitAxis {
    if scene.width / container.width >= scene.height / container.height {
        FitAxis::Width
    } else {
        FitAxis::Height
    }
}

/// Scale at which an unscaled scene of `scene` fits into `container`,
/// leaving a 5% margin, rounded to two decimals.
pub fn fit_scale(scene: Size, container: Size) -> Option<f32> {
    if !scene.is_measurable() || !container.is_measurable() {
        return None;
    }
    let raw = match limiting_axis(scene, container) {
        FitAxis::Width => container.width / scene.width,
        FitAxis::Height => container.height / scene.height,
    };
    let scale = round_hundredths(raw * FIT_MARGIN);
    // Very large scenes would round to zero, which means "unset"
    Some(scale.max(MIN_SCALE))
}

/// Corrected scale from a bootstrap pass measured at `nominal_scale`.
///
/// `None` means no correction is possible this pass (nothing measurable yet);
/// callers retry on the next emission.
pub fn corrected_scale(measured: Size, nominal_scale: f32, container: Size) -> Option<f32> {
    let scene = true_size(measured, nominal_scale)?;
    fit_scale(scene, container)
}

/// Same as [`corrected_scale`] at the standard nominal scale.
pub fn corrected_from_bootstrap(measured: Size, container: Size) -> Option<f32> {
    corrected_scale(measured, NOMINAL_SCALE, container)
}

/// Apply a signed zoom delta, keeping two decimals and never going below
/// [`MIN_SCALE`].
pub fn zoom(current: f32, amount: f32) -> f32 {
    let scale = ((current * 100.0 + amount * 100.0).round()) / 100.0;
    if scale > MIN_SCALE { scale } else { MIN_SCALE }
}
