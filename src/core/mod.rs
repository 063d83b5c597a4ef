pub mod base;
pub mod basis;
pub mod error;
pub mod geometry;
pub mod identifier;
pub mod imageio;
pub mod integrator;
pub mod optimizer;
pub mod options;
pub mod partition;
pub mod pipeline;
pub mod raster;
pub mod reflectance;
pub mod rng;
pub mod sampling;
