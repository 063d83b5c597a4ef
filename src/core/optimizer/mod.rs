pub mod context;
pub mod lbfgsb;
pub mod optimizer;
pub mod pca;

pub use context::*;
pub use lbfgsb::*;
pub use optimizer::*;
pub use pca::*;
