//! # stockroom-database
//!
//! Storage for the role/permission catalog and its associations.
//!
//! The access-control layer depends only on the [`RbacStore`] trait. Two
//! implementations are provided:
//! - [`PgRbacStore`] (PostgreSQL, transactional full-replace writes)
//! - [`MemoryRbacStore`] (single process, used by tests and tooling)

pub mod connection;
pub mod migration;
pub mod store;

pub use connection::DatabasePool;
pub use store::{MemoryRbacStore, PgRbacStore, RbacStore};
