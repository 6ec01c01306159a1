//! Catalog seeding command.

use crate::output::{self, OutputFormat};
use stockroom_core::config::AppConfig;
use stockroom_core::error::AppError;

/// Execute the seed command
pub async fn execute(config: &AppConfig, format: OutputFormat) -> Result<(), AppError> {
    let services = super::create_services(config).await?;
    let report = services.seeder.seed().await?;

    match format {
        OutputFormat::Json => output::print_json(&report),
        OutputFormat::Table => {
            output::print_success("Catalog seeded");
            output::print_kv("Guard", &config.rbac.guard_name);
            output::print_kv("Permissions", &report.permissions.to_string());
            if report.roles_created.is_empty() {
                output::print_kv("New roles", "none");
            } else {
                output::print_kv("New roles", &report.roles_created.join(", "));
            }
        }
    }
    Ok(())
}
