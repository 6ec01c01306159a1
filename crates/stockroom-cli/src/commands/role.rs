//! Role management commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use stockroom_core::config::AppConfig;
use stockroom_core::error::AppError;
use stockroom_core::types::PermissionId;
use stockroom_service::RequestContext;
use stockroom_service::role::{CreateRoleRequest, RenameRoleRequest};

/// Arguments for role commands
#[derive(Debug, Args)]
pub struct RoleArgs {
    /// Role subcommand
    #[command(subcommand)]
    pub command: RoleCommand,
}

/// Role subcommands. `ROLE` accepts an ID or a name.
#[derive(Debug, Subcommand)]
pub enum RoleCommand {
    /// List all roles
    List,
    /// Show a role and its permissions
    Show {
        /// Role ID or name
        role: String,
    },
    /// Create a role with no permissions
    Create {
        /// Role name
        name: String,
    },
    /// Rename a role
    Rename {
        /// Role ID or name
        role: String,
        /// New name
        name: String,
    },
    /// Delete a role
    Delete {
        /// Role ID or name
        role: String,
        /// Skip confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Replace a role's permissions
    Sync {
        /// Role ID or name
        role: String,
        /// Permission ID (repeatable)
        #[arg(short, long = "permission", num_args = 0..)]
        permissions: Vec<PermissionId>,
    },
}

/// Role display row for table output
#[derive(Debug, Serialize, Tabled)]
struct RoleRow {
    /// Role ID
    id: i64,
    /// Name
    name: String,
    /// Guard
    guard: String,
    /// Created at
    created_at: String,
}

/// Permission display row for table output
#[derive(Debug, Serialize, Tabled)]
struct RolePermissionRow {
    /// Permission ID
    id: i64,
    /// Module
    module: String,
    /// Name
    name: String,
}

/// Execute role commands
pub async fn execute(args: &RoleArgs, config: &AppConfig, format: OutputFormat) -> Result<(), AppError> {
    let services = super::create_services(config).await?;
    let ctx = RequestContext::system();
    let roles = &services.roles;

    match &args.command {
        RoleCommand::List => {
            let rows: Vec<RoleRow> = roles
                .list(&ctx)
                .await?
                .into_iter()
                .map(|r| RoleRow {
                    id: r.id.get(),
                    name: r.name,
                    guard: r.guard_name,
                    created_at: r.created_at.format("%Y-%m-%d %H:%M").to_string(),
                })
                .collect();
            output::print_list(&rows, format);
        }
        RoleCommand::Show { role } => {
            let role = roles.find(&ctx, role).await?;
            let detail = roles.get(&ctx, role.id).await?;
            match format {
                OutputFormat::Json => output::print_json(&detail),
                OutputFormat::Table => {
                    output::print_kv("ID", &detail.role.id.to_string());
                    output::print_kv("Name", &detail.role.name);
                    output::print_kv("Guard", &detail.role.guard_name);
                    let rows: Vec<RolePermissionRow> = detail
                        .permissions
                        .into_iter()
                        .map(|p| RolePermissionRow {
                            id: p.id.get(),
                            module: p.module,
                            name: p.name,
                        })
                        .collect();
                    output::print_list(&rows, format);
                }
            }
        }
        RoleCommand::Create { name } => {
            let role = roles
                .create(&ctx, CreateRoleRequest { name: name.clone() })
                .await?;
            output::print_success(&format!("Role '{}' created (id {})", role.name, role.id));
        }
        RoleCommand::Rename { role, name } => {
            let role = roles.find(&ctx, role).await?;
            let renamed = roles
                .rename(&ctx, role.id, RenameRoleRequest { name: name.clone() })
                .await?;
            output::print_success(&format!("Role '{}' renamed to '{}'", role.name, renamed.name));
        }
        RoleCommand::Delete { role, yes } => {
            let role = roles.find(&ctx, role).await?;
            if !yes {
                let confirm = dialoguer::Confirm::new()
                    .with_prompt(format!(
                        "Delete role '{}' and remove it from every user?",
                        role.name
                    ))
                    .default(false)
                    .interact()
                    .map_err(|e| AppError::internal(format!("Input error: {e}")))?;

                if !confirm {
                    println!("Cancelled.");
                    return Ok(());
                }
            }
            roles.delete(&ctx, role.id).await?;
            output::print_success(&format!("Role '{}' deleted", role.name));
        }
        RoleCommand::Sync { role, permissions } => {
            let role = roles.find(&ctx, role).await?;
            let outcome = roles.sync_permissions(&ctx, role.id, permissions).await?;
            match format {
                OutputFormat::Json => output::print_json(&outcome),
                OutputFormat::Table => {
                    output::print_success(&format!(
                        "Role '{}' now holds {} permission(s)",
                        role.name,
                        outcome.permissions.len()
                    ));
                    output::print_kv("Permissions", &outcome.permissions.join(", "));
                    if !outcome.dropped.is_empty() {
                        let dropped: Vec<String> =
                            outcome.dropped.iter().map(ToString::to_string).collect();
                        output::print_warning(&format!("Ignored IDs: {}", dropped.join(", ")));
                    }
                    if outcome.repaired {
                        output::print_warning("Duplicate permission rows were collapsed");
                    }
                }
            }
        }
    }

    Ok(())
}
