pub mod core;
pub mod identifiers;
pub mod optimizers;
