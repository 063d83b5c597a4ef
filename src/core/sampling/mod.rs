pub mod distribution;
pub mod kmeans;

pub use distribution::*;
pub use kmeans::*;
