//! # stockroom-service
//!
//! Administrative use cases for Stockroom access control. Every operation
//! takes a [`RequestContext`] and is authorized against the policy tables
//! before it touches storage.

pub mod catalog;
pub mod context;
pub mod role;
pub mod services;
pub mod user;

pub use catalog::{CatalogSeeder, PermissionCatalogService};
pub use context::{Actor, RequestContext};
pub use role::RoleService;
pub use services::Services;
pub use user::UserRoleService;
