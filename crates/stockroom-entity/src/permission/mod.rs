//! Permission catalog entities.

pub mod ability;
pub mod model;

pub use ability::Ability;
pub use model::{DEFAULT_GUARD, NewPermission, Permission, WILDCARD_MODULE, WILDCARD_PERMISSION};
