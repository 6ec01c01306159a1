//! Role administration.

pub mod service;

pub use service::{CreateRoleRequest, RenameRoleRequest, RoleDetail, RoleService};
