//! Typed catalog of the named permissions checked by the authorization layer.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A named permission that a policy rule can require.
///
/// The string form returned by [`Ability::as_str`] is the identifier stored
/// in the permission catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Ability {
    // -- Assets --
    /// List and view assets.
    AssetsView,
    /// Register new assets.
    AssetsCreate,
    /// Edit asset records.
    AssetsEdit,
    /// Delete, restore or purge assets.
    AssetsDelete,
    /// Export the asset register.
    AssetsExport,
    /// Import assets from a spreadsheet.
    AssetsImport,

    // -- Office supplies (ATK) --
    /// List and view office supply items.
    AtkItemsView,
    /// Create office supply items.
    AtkItemsCreate,
    /// Edit office supply items.
    AtkItemsEdit,
    /// Delete office supply items.
    AtkItemsDelete,
    /// Export office supply items.
    AtkItemsExport,
    /// Import office supply items.
    AtkItemsImport,

    // -- Office supply requests --
    /// View every office supply request.
    AtkRequestsView,
    /// File office supply requests.
    AtkRequestsCreate,
    /// Edit requests filed by others.
    AtkRequestsEdit,
    /// Delete requests filed by others.
    AtkRequestsDelete,
    /// Hand approved requests over to the requester.
    AtkRequestsDistribute,
    /// Export request history.
    AtkRequestsExport,

    // -- Multi-level approval --
    /// First-level approval.
    ApprovalL1,
    /// Second-level approval.
    ApprovalL2,
    /// Third-level approval.
    ApprovalL3,

    // -- Stock opname --
    /// View stock opname sessions.
    StockOpnameView,
    /// Start a stock opname session.
    StockOpnameCreate,
    /// Edit stock opname sessions prepared by others.
    StockOpnameEdit,
    /// Delete stock opname sessions prepared by others.
    StockOpnameDelete,
    /// Submit a draft stock opname for approval.
    StockOpnameSubmit,
    /// Approve or reject a submitted stock opname.
    StockOpnameApprove,
    /// Export stock opname results.
    StockOpnameExport,

    // -- Reports and dashboards --
    /// View and export reports.
    ViewReports,
    /// View the asset dashboard.
    ViewAset,

    // -- Notification logs --
    /// View notification delivery logs.
    NotificationLogsView,
    /// Delete notification delivery logs.
    NotificationLogsDelete,
    /// Resend a failed notification.
    NotificationLogsResend,

    // -- User management --
    /// List and view users.
    UsersView,
    /// Create users.
    UsersCreate,
    /// Edit users.
    UsersEdit,
    /// Delete users.
    UsersDelete,
    /// Change the roles assigned to a user.
    UsersAssignRoles,

    // -- Role management --
    /// List and view roles.
    RolesView,
    /// Create roles and catalog permissions.
    RolesCreate,
    /// Rename roles and change their permissions.
    RolesEdit,
    /// Delete roles.
    RolesDelete,
}

impl Ability {
    /// Every ability, in catalog order.
    pub const ALL: &'static [Ability] = &[
        Self::AssetsView,
        Self::AssetsCreate,
        Self::AssetsEdit,
        Self::AssetsDelete,
        Self::AssetsExport,
        Self::AssetsImport,
        Self::AtkItemsView,
        Self::AtkItemsCreate,
        Self::AtkItemsEdit,
        Self::AtkItemsDelete,
        Self::AtkItemsExport,
        Self::AtkItemsImport,
        Self::AtkRequestsView,
        Self::AtkRequestsCreate,
        Self::AtkRequestsEdit,
        Self::AtkRequestsDelete,
        Self::AtkRequestsDistribute,
        Self::AtkRequestsExport,
        Self::ApprovalL1,
        Self::ApprovalL2,
        Self::ApprovalL3,
        Self::StockOpnameView,
        Self::StockOpnameCreate,
        Self::StockOpnameEdit,
        Self::StockOpnameDelete,
        Self::StockOpnameSubmit,
        Self::StockOpnameApprove,
        Self::StockOpnameExport,
        Self::ViewReports,
        Self::ViewAset,
        Self::NotificationLogsView,
        Self::NotificationLogsDelete,
        Self::NotificationLogsResend,
        Self::UsersView,
        Self::UsersCreate,
        Self::UsersEdit,
        Self::UsersDelete,
        Self::UsersAssignRoles,
        Self::RolesView,
        Self::RolesCreate,
        Self::RolesEdit,
        Self::RolesDelete,
    ];

    /// Return the catalog identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AssetsView => "assets.view",
            Self::AssetsCreate => "assets.create",
            Self::AssetsEdit => "assets.edit",
            Self::AssetsDelete => "assets.delete",
            Self::AssetsExport => "assets.export",
            Self::AssetsImport => "assets.import",
            Self::AtkItemsView => "atk.items.view",
            Self::AtkItemsCreate => "atk.items.create",
            Self::AtkItemsEdit => "atk.items.edit",
            Self::AtkItemsDelete => "atk.items.delete",
            Self::AtkItemsExport => "atk.items.export",
            Self::AtkItemsImport => "atk.items.import",
            Self::AtkRequestsView => "atk.requests.view",
            Self::AtkRequestsCreate => "atk.requests.create",
            Self::AtkRequestsEdit => "atk.requests.edit",
            Self::AtkRequestsDelete => "atk.requests.delete",
            Self::AtkRequestsDistribute => "atk.requests.distribute",
            Self::AtkRequestsExport => "atk.requests.export",
            Self::ApprovalL1 => "approval-l1",
            Self::ApprovalL2 => "approval-l2",
            Self::ApprovalL3 => "approval-l3",
            Self::StockOpnameView => "stock_opname.view",
            Self::StockOpnameCreate => "stock_opname.create",
            Self::StockOpnameEdit => "stock_opname.edit",
            Self::StockOpnameDelete => "stock_opname.delete",
            Self::StockOpnameSubmit => "stock_opname.submit",
            Self::StockOpnameApprove => "stock_opname.approve",
            Self::StockOpnameExport => "stock_opname.export",
            Self::ViewReports => "view-reports",
            Self::ViewAset => "view-aset",
            Self::NotificationLogsView => "notification_logs.view",
            Self::NotificationLogsDelete => "notification_logs.delete",
            Self::NotificationLogsResend => "notification_logs.resend",
            Self::UsersView => "users.view",
            Self::UsersCreate => "users.create",
            Self::UsersEdit => "users.edit",
            Self::UsersDelete => "users.delete",
            Self::UsersAssignRoles => "users.assign_roles",
            Self::RolesView => "roles.view",
            Self::RolesCreate => "roles.create",
            Self::RolesEdit => "roles.edit",
            Self::RolesDelete => "roles.delete",
        }
    }

    /// Return the module tag the ability is grouped under.
    pub fn module(&self) -> &'static str {
        match self {
            Self::AssetsView
            | Self::AssetsCreate
            | Self::AssetsEdit
            | Self::AssetsDelete
            | Self::AssetsExport
            | Self::AssetsImport => "assets",
            Self::AtkItemsView
            | Self::AtkItemsCreate
            | Self::AtkItemsEdit
            | Self::AtkItemsDelete
            | Self::AtkItemsExport
            | Self::AtkItemsImport => "atk",
            Self::AtkRequestsView
            | Self::AtkRequestsCreate
            | Self::AtkRequestsEdit
            | Self::AtkRequestsDelete
            | Self::AtkRequestsDistribute
            | Self::AtkRequestsExport => "atk_requests",
            Self::ApprovalL1 | Self::ApprovalL2 | Self::ApprovalL3 => "approval",
            Self::StockOpnameView
            | Self::StockOpnameCreate
            | Self::StockOpnameEdit
            | Self::StockOpnameDelete
            | Self::StockOpnameSubmit
            | Self::StockOpnameApprove
            | Self::StockOpnameExport => "stock_opname",
            Self::ViewReports => "reports",
            Self::ViewAset => "dashboard",
            Self::NotificationLogsView
            | Self::NotificationLogsDelete
            | Self::NotificationLogsResend => "notifications",
            Self::UsersView
            | Self::UsersCreate
            | Self::UsersEdit
            | Self::UsersDelete
            | Self::UsersAssignRoles => "users",
            Self::RolesView | Self::RolesCreate | Self::RolesEdit | Self::RolesDelete => "roles",
        }
    }

    /// Return a short description for the catalog.
    pub fn description(&self) -> &'static str {
        match self {
            Self::AssetsView => "View assets",
            Self::AssetsCreate => "Register assets",
            Self::AssetsEdit => "Edit assets",
            Self::AssetsDelete => "Delete assets",
            Self::AssetsExport => "Export assets",
            Self::AssetsImport => "Import assets",
            Self::AtkItemsView => "View office supplies",
            Self::AtkItemsCreate => "Create office supplies",
            Self::AtkItemsEdit => "Edit office supplies",
            Self::AtkItemsDelete => "Delete office supplies",
            Self::AtkItemsExport => "Export office supplies",
            Self::AtkItemsImport => "Import office supplies",
            Self::AtkRequestsView => "View all office supply requests",
            Self::AtkRequestsCreate => "Request office supplies",
            Self::AtkRequestsEdit => "Edit office supply requests",
            Self::AtkRequestsDelete => "Delete office supply requests",
            Self::AtkRequestsDistribute => "Hand over approved requests",
            Self::AtkRequestsExport => "Export office supply requests",
            Self::ApprovalL1 => "First-level approval",
            Self::ApprovalL2 => "Second-level approval",
            Self::ApprovalL3 => "Third-level approval",
            Self::StockOpnameView => "View stock opname",
            Self::StockOpnameCreate => "Create stock opname",
            Self::StockOpnameEdit => "Edit stock opname",
            Self::StockOpnameDelete => "Delete stock opname",
            Self::StockOpnameSubmit => "Submit stock opname",
            Self::StockOpnameApprove => "Approve stock opname",
            Self::StockOpnameExport => "Export stock opname",
            Self::ViewReports => "View reports",
            Self::ViewAset => "View asset dashboard",
            Self::NotificationLogsView => "View notification logs",
            Self::NotificationLogsDelete => "Delete notification logs",
            Self::NotificationLogsResend => "Resend notifications",
            Self::UsersView => "View users",
            Self::UsersCreate => "Create users",
            Self::UsersEdit => "Edit users",
            Self::UsersDelete => "Delete users",
            Self::UsersAssignRoles => "Assign roles to users",
            Self::RolesView => "View roles",
            Self::RolesCreate => "Create roles and permissions",
            Self::RolesEdit => "Edit roles and their permissions",
            Self::RolesDelete => "Delete roles",
        }
    }

    /// Look up an ability by its catalog identifier (exact match).
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|a| a.as_str() == name)
    }
}

impl fmt::Display for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Ability {
    type Err = stockroom_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| {
            stockroom_core::AppError::validation(format!("Unknown ability: '{s}'"))
        })
    }
}

impl TryFrom<String> for Ability {
    type Error = stockroom_core::AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Ability> for String {
    fn from(ability: Ability) -> Self {
        ability.as_str().to_string()
    }
}
