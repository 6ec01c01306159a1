//! Full-replace synchronizers for access-control associations.
//!
//! Both synchronizers normalize their input instead of rejecting it: unknown
//! identifiers are dropped and reserved-role rules are applied before the
//! association is overwritten. Only storage failures surface as errors.

pub mod role_permissions;
pub mod user_roles;

pub use role_permissions::{RolePermissionSync, RolePermissionSynchronizer};
pub use user_roles::{UserRoleSync, UserRoleSynchronizer};
