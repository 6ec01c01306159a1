//! User role assignment and access check commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use stockroom_core::config::AppConfig;
use stockroom_core::error::AppError;
use stockroom_core::types::{RoleId, UserId};
use stockroom_entity::resource::{Action, ResourceKind, ResourceSnapshot, ResourceState};
use stockroom_service::RequestContext;

/// Arguments for user commands
#[derive(Debug, Args)]
pub struct UserArgs {
    /// User subcommand
    #[command(subcommand)]
    pub command: UserCommand,
}

/// User subcommands
#[derive(Debug, Subcommand)]
pub enum UserCommand {
    /// List a user's roles
    Roles {
        /// User ID
        user: UserId,
    },
    /// Replace a user's roles
    SyncRoles {
        /// User ID
        user: UserId,
        /// Role ID (repeatable)
        #[arg(short, long = "role", num_args = 0..)]
        roles: Vec<RoleId>,
    },
    /// Check whether a user may perform an action
    Can {
        /// User ID
        user: UserId,
        /// Resource type (e.g. `atk_request`, `stock_opname`)
        resource: ResourceKind,
        /// Action (e.g. `approve`, `viewAny`)
        action: Action,
        /// Owner of the resource instance
        #[arg(long)]
        owner: Option<UserId>,
        /// Lifecycle state of the resource instance
        #[arg(long)]
        state: Option<ResourceState>,
    },
}

/// Role display row for table output
#[derive(Debug, Serialize, Tabled)]
struct UserRoleRow {
    /// Role ID
    id: i64,
    /// Name
    name: String,
}

/// Access check result row
#[derive(Debug, Serialize, Tabled)]
struct AccessRow {
    /// User ID
    user: i64,
    /// Resource type
    resource: String,
    /// Action
    action: String,
    /// Allow or deny
    decision: String,
    /// Deciding step
    source: String,
}

/// Execute user commands
pub async fn execute(args: &UserArgs, config: &AppConfig, format: OutputFormat) -> Result<(), AppError> {
    let services = super::create_services(config).await?;
    let ctx = RequestContext::system();

    match &args.command {
        UserCommand::Roles { user } => {
            let rows: Vec<UserRoleRow> = services
                .users
                .roles_of(&ctx, *user)
                .await?
                .into_iter()
                .map(|r| UserRoleRow {
                    id: r.id.get(),
                    name: r.name,
                })
                .collect();
            output::print_list(&rows, format);
        }
        UserCommand::SyncRoles { user, roles } => {
            let outcome = services.users.sync_roles(&ctx, *user, roles).await?;
            match format {
                OutputFormat::Json => output::print_json(&outcome),
                OutputFormat::Table => {
                    output::print_success(&format!(
                        "User {} now holds: {}",
                        outcome.user_id,
                        outcome.roles.join(", ")
                    ));
                    if outcome.exclusive {
                        output::print_warning("super_admin is exclusive; other roles were discarded");
                    }
                    if !outcome.dropped.is_empty() {
                        let dropped: Vec<String> =
                            outcome.dropped.iter().map(ToString::to_string).collect();
                        output::print_warning(&format!("Ignored IDs: {}", dropped.join(", ")));
                    }
                }
            }
        }
        UserCommand::Can {
            user,
            resource,
            action,
            owner,
            state,
        } => {
            let snapshot = ResourceSnapshot {
                owner_id: *owner,
                state: *state,
            };
            let instance = (owner.is_some() || state.is_some()).then_some(&snapshot);
            let verdict = services
                .users
                .check(*user, *resource, *action, instance)
                .await?;

            let row = AccessRow {
                user: user.get(),
                resource: resource.to_string(),
                action: action.to_string(),
                decision: if verdict.is_allowed() { "allow" } else { "deny" }.to_string(),
                source: verdict.source.as_str().to_string(),
            };
            output::print_list(&[row], format);
        }
    }

    Ok(())
}
