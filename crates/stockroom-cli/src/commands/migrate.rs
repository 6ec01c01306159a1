//! Database migration command.

use std::sync::Arc;

use clap::Args;
use tracing::info;

use crate::output;
use stockroom_core::config::AppConfig;
use stockroom_core::error::AppError;
use stockroom_database::PgRbacStore;
use stockroom_database::migration::run_migrations;
use stockroom_service::Services;

/// Arguments for the migrate command
#[derive(Debug, Args)]
pub struct MigrateArgs {
    /// Seed the catalog afterwards even if `rbac.seed_on_migrate` is off
    #[arg(long)]
    pub seed: bool,
}

/// Execute the migrate command
pub async fn execute(args: &MigrateArgs, config: &AppConfig) -> Result<(), AppError> {
    let pool = super::create_db_pool(config).await?;

    println!("Running database migrations...");
    run_migrations(pool.pool()).await?;
    output::print_success("All migrations applied successfully.");

    if args.seed || config.rbac.seed_on_migrate {
        let store = Arc::new(PgRbacStore::new(pool.pool().clone()));
        let services = Services::new(store, &config.rbac.guard_name);
        let report = services.seeder.seed().await?;
        info!(roles_created = report.roles_created.len(), "Seed after migrate complete");
        output::print_success(&format!(
            "Catalog seeded: {} permissions, {} new roles",
            report.permissions,
            report.roles_created.len()
        ));
    }

    pool.close().await;
    Ok(())
}
