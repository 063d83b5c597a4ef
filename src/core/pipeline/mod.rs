pub mod relighting_pipeline;
pub mod weights_file;

pub use relighting_pipeline::*;
pub use weights_file::*;
