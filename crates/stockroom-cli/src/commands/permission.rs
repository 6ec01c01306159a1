//! Permission catalog commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use stockroom_core::config::AppConfig;
use stockroom_core::error::AppError;
use stockroom_service::RequestContext;

/// Arguments for permission commands
#[derive(Debug, Args)]
pub struct PermissionArgs {
    /// Permission subcommand
    #[command(subcommand)]
    pub command: PermissionCommand,
}

/// Permission subcommands
#[derive(Debug, Subcommand)]
pub enum PermissionCommand {
    /// List catalog permissions
    List {
        /// Only show one module
        #[arg(short, long)]
        module: Option<String>,
    },
}

/// Permission display row for table output
#[derive(Debug, Serialize, Tabled)]
struct PermissionRow {
    /// Permission ID
    id: i64,
    /// Module
    module: String,
    /// Name
    name: String,
    /// Description
    description: String,
}

/// Execute permission commands
pub async fn execute(
    args: &PermissionArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let services = super::create_services(config).await?;
    let ctx = RequestContext::system();

    match &args.command {
        PermissionCommand::List { module } => {
            let permissions = services.catalog.list(&ctx, module.as_deref()).await?;
            let rows: Vec<PermissionRow> = permissions
                .into_iter()
                .map(|p| PermissionRow {
                    id: p.id.get(),
                    module: p.module,
                    name: p.name,
                    description: p.description.unwrap_or_default(),
                })
                .collect();
            output::print_list(&rows, format);
        }
    }

    Ok(())
}
