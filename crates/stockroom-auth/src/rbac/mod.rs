//! Role-based access control: grants and enforcement.

pub mod enforcer;
pub mod grants;

pub use enforcer::RbacEnforcer;
pub use grants::Grants;
