pub mod reflectance_field;

pub use reflectance_field::*;
