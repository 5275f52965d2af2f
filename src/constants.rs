//! Global constants for the rack elevation editor

/// Pixels per inch used to convert physical dimensions to device pixels.
pub const PIXELS_PER_INCH: f32 = 96.0;

/// Height of one rack unit in inches.
pub const RU_HEIGHT_INCHES: f32 = 1.75;

/// Width of a standard rack opening in inches.
pub const RACK_OPENING_WIDTH_INCHES: f32 = 19.0;

/// Margin around every laid out cabinet, in inches.
pub const CABINET_MARGIN_INCHES: f32 = 4.0;

/// Scale factor used for the measurement-only bootstrap pass.
pub const NOMINAL_SCALE: f32 = 0.01;

/// Fraction of the container the fitted scene may occupy.
pub const FIT_MARGIN: f32 = 0.95;

/// Lowest scale zooming can reach.
pub const MIN_SCALE: f32 = 0.01;

/// Zoom delta applied per zoom key/button press.
pub const DEFAULT_ZOOM_STEP: f32 = 0.04;

/// Container size assumed by the headless binary when no config overrides it.
pub const DEFAULT_VIEWPORT_SIZE: (f32, f32) = (1280.0, 720.0);
