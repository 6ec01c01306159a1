//! CLI command definitions and dispatch.

pub mod migrate;
pub mod permission;
pub mod role;
pub mod seed;
pub mod user;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use crate::output::OutputFormat;
use stockroom_core::config::AppConfig;
use stockroom_core::error::AppError;
use stockroom_database::{DatabasePool, PgRbacStore};
use stockroom_service::Services;

/// Stockroom: role and permission administration
#[derive(Debug, Parser)]
#[command(name = "stockroom", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Environment overlay loaded from the configuration directory
    #[arg(short, long, env = "STOCKROOM_ENV")]
    pub env: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Apply database migrations
    Migrate(migrate::MigrateArgs),
    /// Install the permission catalog and default roles
    Seed,
    /// Permission catalog
    Permission(permission::PermissionArgs),
    /// Role management
    Role(role::RoleArgs),
    /// User role assignment and access checks
    User(user::UserArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self, config: &AppConfig) -> Result<(), AppError> {
        match &self.command {
            Commands::Migrate(args) => migrate::execute(args, config).await,
            Commands::Seed => seed::execute(config, self.format).await,
            Commands::Permission(args) => permission::execute(args, config, self.format).await,
            Commands::Role(args) => role::execute(args, config, self.format).await,
            Commands::User(args) => user::execute(args, config, self.format).await,
        }
    }
}

/// Helper: create database pool from config
pub async fn create_db_pool(config: &AppConfig) -> Result<DatabasePool, AppError> {
    DatabasePool::connect(&config.database).await
}

/// Helper: build the service layer over PostgreSQL
pub async fn create_services(config: &AppConfig) -> Result<Services, AppError> {
    let pool = create_db_pool(config).await?;
    let store = Arc::new(PgRbacStore::new(pool.into_pool()));
    Ok(Services::new(store, &config.rbac.guard_name))
}
