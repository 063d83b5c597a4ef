pub mod read_image;
pub mod read_image_pfm;
pub mod write_image;
pub mod write_image_pfm;

pub use read_image::*;
pub use read_image_pfm::*;
pub use write_image::*;
pub use write_image_pfm::*;
