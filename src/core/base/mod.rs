pub mod constants;
pub mod functions;
pub mod types;

pub use constants::*;
pub use functions::*;
pub use types::*;

pub use crate::core::error::*;
pub use crate::core::geometry::*;
