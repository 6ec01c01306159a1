//! Permission catalog management and seeding.

pub mod defaults;
pub mod seeder;
pub mod service;

pub use seeder::{CatalogSeeder, SeedReport};
pub use service::{CreatePermissionRequest, PermissionCatalogService, UpdatePermissionRequest};
