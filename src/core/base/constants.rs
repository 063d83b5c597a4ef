use super::types::Float;

#[cfg(not(feature = "float-as-double"))]
mod detail {
    use super::*;

    pub const PI: Float = std::f32::consts::PI;
    pub const TWO_PI: Float = 2.0 * PI;
}

#[cfg(feature = "float-as-double")]
mod detail {
    use super::*;

    pub const PI: Float = std::f64::consts::PI;
    pub const TWO_PI: Float = 2.0 * PI;
}

pub use detail::*;

/// Distance in pixels between two samples when an area light is expanded
/// into point lights.
pub const AREA_LIGHT_SAMPLE_SPACING: i32 = 25;

/// A mask pixel is selected when every 8-bit channel is below this value.
pub const MASK_THRESHOLD: u8 = 127;

pub const MIN_MULTIPLIER: f64 = 0.0;
pub const MAX_MULTIPLIER: f64 = 10.0;
