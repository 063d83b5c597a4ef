pub mod identifier;
pub mod lighting_conditions;

pub use identifier::*;
pub use lighting_conditions::*;
