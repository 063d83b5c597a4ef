pub mod light_kernel;
pub mod solid_angle_integrator;

pub use light_kernel::*;
pub use solid_angle_integrator::*;
