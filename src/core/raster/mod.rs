pub mod condition_mask;
pub mod float_image;

pub use condition_mask::*;
pub use float_image::*;
