//! Role entities.

pub mod model;

pub use model::{Role, SUPER_ADMIN_ROLE, is_super_admin_name};
