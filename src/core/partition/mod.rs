pub mod condition_mapping;
pub mod diagnostic;
pub mod kdtree;
pub mod spatial_partition;

pub use condition_mapping::*;
pub use diagnostic::*;
pub use kdtree::*;
pub use spatial_partition::*;
