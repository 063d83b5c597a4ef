use crate::core::geometry::*;

#[cfg(not(feature = "float-as-double"))]
pub type Float = f32;
#[cfg(feature = "float-as-double")]
pub type Float = f64;

pub type Vector2i = Vector2<i32>;
pub type Point2i = Vector2<i32>;

pub type Bounds2i = Bounds2<i32>;

/// One pixel of a floating-point RGB buffer.
pub type RGB = [Float; 3];

/// Per-condition accumulated energy. Sums over a full map run into the
/// hundreds of thousands of terms, so they are always kept in double precision.
pub type RGBWeight = [f64; 3];
