pub mod basis_file;
pub mod create_identifier;
pub mod inverse_cdf;
pub mod masks;
pub mod median_energy;

pub use basis_file::*;
pub use create_identifier::*;
pub use inverse_cdf::*;
pub use masks::*;
pub use median_energy::*;
