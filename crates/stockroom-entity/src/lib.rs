//! # stockroom-entity
//!
//! Domain entity models for Stockroom access control. Database entities
//! (`Permission`, `Role`, `User`) derive `sqlx::FromRow`; the remaining
//! types describe the resources, actions and lifecycle states that the
//! authorization layer reasons about.

pub mod permission;
pub mod resource;
pub mod role;
pub mod user;
