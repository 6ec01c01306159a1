//! # stockroom-auth
//!
//! Authorization core for Stockroom.
//!
//! ## Modules
//!
//! - `rbac`: an actor's grants and the wildcard-aware permission check
//! - `sync`: full-replace synchronizers for role permissions and user roles
//! - `policy`: declarative per-resource rule tables and the decision procedure
//! - `resolver`: loads grants from storage and decides access for a request

pub mod policy;
pub mod rbac;
pub mod resolver;
pub mod sync;

pub use policy::{Authorizer, Decision, DecisionSource, PolicyRegistry, Rule, Verdict};
pub use rbac::{Grants, RbacEnforcer};
pub use resolver::AccessResolver;
pub use sync::{RolePermissionSync, RolePermissionSynchronizer, UserRoleSync, UserRoleSynchronizer};
