//! Action vocabulary shared by all resource policies.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An action an actor attempts on a resource type or instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Action {
    /// List resources.
    ViewAny,
    /// View a single resource.
    View,
    /// Create a resource.
    Create,
    /// Update a resource.
    Update,
    /// Soft-delete a resource.
    Delete,
    /// Restore a soft-deleted resource.
    Restore,
    /// Permanently delete a resource.
    ForceDelete,
    /// Approve a workflow item at its current level.
    Approve,
    /// Reject a workflow item.
    Reject,
    /// Hand an approved request over to its requester.
    Distribute,
    /// Confirm receipt of a handed-over request.
    ConfirmReceive,
    /// Submit a draft for approval.
    Submit,
    /// Export resources.
    Export,
    /// Import resources.
    Import,
    /// Replace a user's roles.
    AssignRoles,
    /// Replace a role's permissions.
    SyncPermissions,
    /// Resend a notification.
    Resend,
}

impl Action {
    /// Every action.
    pub const ALL: &'static [Action] = &[
        Self::ViewAny,
        Self::View,
        Self::Create,
        Self::Update,
        Self::Delete,
        Self::Restore,
        Self::ForceDelete,
        Self::Approve,
        Self::Reject,
        Self::Distribute,
        Self::ConfirmReceive,
        Self::Submit,
        Self::Export,
        Self::Import,
        Self::AssignRoles,
        Self::SyncPermissions,
        Self::Resend,
    ];

    /// Return the action name in camelCase.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ViewAny => "viewAny",
            Self::View => "view",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Restore => "restore",
            Self::ForceDelete => "forceDelete",
            Self::Approve => "approve",
            Self::Reject => "reject",
            Self::Distribute => "distribute",
            Self::ConfirmReceive => "confirmReceive",
            Self::Submit => "submit",
            Self::Export => "export",
            Self::Import => "import",
            Self::AssignRoles => "assignRoles",
            Self::SyncPermissions => "syncPermissions",
            Self::Resend => "resend",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Action {
    type Err = stockroom_core::AppError;

    /// Accepts `viewAny`, `view_any` and `view-any` spellings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let folded: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|a| a.as_str().to_lowercase() == folded)
            .ok_or_else(|| stockroom_core::AppError::validation(format!("Invalid action: '{s}'")))
    }
}
