//! User role assignment.

pub mod service;

pub use service::UserRoleService;
