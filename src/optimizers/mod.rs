pub mod create_optimizer;
pub mod original_space;
pub mod pca_space;

pub use create_optimizer::*;
pub use original_space::*;
pub use pca_space::*;
