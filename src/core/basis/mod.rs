pub mod basis_file;
pub mod lighting_basis;

pub use basis_file::*;
pub use lighting_basis::*;
