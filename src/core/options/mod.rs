pub mod relight_options;

pub use relight_options::*;
