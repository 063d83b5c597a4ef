pub mod bounds2;
pub mod polygon;
pub mod vector2;

pub use bounds2::*;
pub use polygon::*;
pub use vector2::*;
