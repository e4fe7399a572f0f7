//! Real-world to on-screen panel sizing.
//!
//! Converts a panel's physical dimensions (centimetres) into pixels from the
//! map's ground resolution. The ground resolution itself comes from the map
//! collaborator (see [`crate::map_adapter::ground_resolution`]); this module
//! only consumes it.
//!
//! Pixel sizes are clamped so panels stay draggable when zoomed far out and
//! do not fill the screen when zoomed far in:
//!
//! ```text
//! width  ∈ [15, 120] px
//! height ∈ [24, 192] px
//! ```

use serde::{Deserialize, Serialize};

pub const MIN_WIDTH_PX: f64 = 15.0;
pub const MAX_WIDTH_PX: f64 = 120.0;
pub const MIN_HEIGHT_PX: f64 = 24.0;
pub const MAX_HEIGHT_PX: f64 = 192.0;

/// Physical size of one panel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PanelDimensions {
    pub width_cm: f64,
    pub height_cm: f64,
}

impl PanelDimensions {
    pub fn new(width_cm: f64, height_cm: f64) -> Self {
        Self {
            width_cm,
            height_cm,
        }
    }
}

/// On-screen panel size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelSize {
    pub width: f64,
    pub height: f64,
}

/// Where the scale of the layout comes from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GeoSource {
    /// A map view is active; sizes follow its ground resolution.
    Mapped {
        meters_per_pixel: f64,
        latitude: f64,
        zoom: f64,
    },
    /// Plain grid; configured dimensions are already pixels.
    Unmapped,
}

impl GeoSource {
    pub fn is_mapped(&self) -> bool {
        matches!(self, GeoSource::Mapped { .. })
    }
}

/// Converts centimetres to clamped pixels at the given ground resolution.
///
/// Degenerate resolutions (zero, negative, infinite, NaN) still produce a
/// size inside the bounds.
pub fn pixel_size(real_width_cm: f64, real_height_cm: f64, meters_per_pixel: f64) -> PixelSize {
    let width = ((real_width_cm / 100.0) / meters_per_pixel).round();
    let height = ((real_height_cm / 100.0) / meters_per_pixel).round();

    PixelSize {
        width: clamp_px(width, MIN_WIDTH_PX, MAX_WIDTH_PX),
        height: clamp_px(height, MIN_HEIGHT_PX, MAX_HEIGHT_PX),
    }
}

/// Panel size for the current scale source.
///
/// Without a map the configured dimensions are used as pixels, unclamped.
pub fn panel_size(dimensions: PanelDimensions, source: &GeoSource) -> PixelSize {
    match *source {
        GeoSource::Mapped {
            meters_per_pixel, ..
        } => pixel_size(dimensions.width_cm, dimensions.height_cm, meters_per_pixel),
        GeoSource::Unmapped => PixelSize {
            width: dimensions.width_cm,
            height: dimensions.height_cm,
        },
    }
}

fn clamp_px(value: f64, min: f64, max: f64) -> f64 {
    if value.is_nan() {
        min
    } else {
        value.clamp(min, max)
    }
}
