//! Per-resource rule tables.

use std::collections::HashMap;

use stockroom_entity::permission::Ability;
use stockroom_entity::resource::{Action, ResourceKind, ResourceState};

use super::rule::Rule;

/// Maps each resource type and action to its authorization rule.
#[derive(Debug, Clone)]
pub struct PolicyRegistry {
    /// Resource type -> action -> rule.
    tables: HashMap<ResourceKind, HashMap<Action, Rule>>,
}

impl PolicyRegistry {
    /// Creates the default rule set.
    pub fn new() -> Self {
        use Ability::*;
        use ResourceState::*;

        let mut tables = HashMap::new();

        // Fixed assets: the dashboard permission also grants read access.
        tables.insert(
            ResourceKind::Asset,
            HashMap::from([
                (Action::ViewAny, Rule::require(AssetsView).or(ViewAset)),
                (Action::View, Rule::require(AssetsView).or(ViewAset)),
                (Action::Create, Rule::require(AssetsCreate)),
                (Action::Update, Rule::require(AssetsEdit)),
                (Action::Delete, Rule::require(AssetsDelete)),
                (Action::Restore, Rule::require(AssetsDelete)),
                (Action::ForceDelete, Rule::require(AssetsDelete)),
                (Action::Export, Rule::require(AssetsExport)),
                (Action::Import, Rule::require(AssetsImport)),
            ]),
        );

        // Office supply items
        tables.insert(
            ResourceKind::OfficeSupply,
            HashMap::from([
                (Action::ViewAny, Rule::require(AtkItemsView)),
                (Action::View, Rule::require(AtkItemsView)),
                (Action::Create, Rule::require(AtkItemsCreate)),
                (Action::Update, Rule::require(AtkItemsEdit)),
                (Action::Delete, Rule::require(AtkItemsDelete)),
                (Action::Restore, Rule::require(AtkItemsDelete)),
                (Action::ForceDelete, Rule::require(AtkItemsDelete)),
                (Action::Export, Rule::require(AtkItemsExport)),
                (Action::Import, Rule::require(AtkItemsImport)),
            ]),
        );

        // Office supply requests: three approval levels, then hand-over.
        tables.insert(
            ResourceKind::AtkRequest,
            HashMap::from([
                (Action::ViewAny, Rule::require(AtkRequestsView)),
                (
                    Action::View,
                    Rule::require(AtkRequestsView).owner_in(&[Pending]),
                ),
                (Action::Create, Rule::require(AtkRequestsCreate)),
                (
                    Action::Update,
                    Rule::require(AtkRequestsEdit).owner_in(&[Pending]),
                ),
                (
                    Action::Delete,
                    Rule::require(AtkRequestsDelete).owner_in(&[Pending]),
                ),
                (
                    Action::Approve,
                    Rule::require_in(&[Pending], ApprovalL1)
                        .or_in(&[Level1Approved], ApprovalL2)
                        .or_in(&[Level2Approved], ApprovalL3),
                ),
                (
                    Action::Reject,
                    Rule::require_in(&[Pending], ApprovalL1)
                        .or_in(&[Level1Approved], ApprovalL2)
                        .or_in(&[Level2Approved], ApprovalL3)
                        .or_in(&[Level3Approved], AtkRequestsDistribute),
                ),
                (
                    Action::Distribute,
                    Rule::require_in(&[Level3Approved], AtkRequestsDistribute),
                ),
                (Action::ConfirmReceive, Rule::owner_only(&[Diserahkan])),
                (Action::Export, Rule::require(AtkRequestsExport)),
            ]),
        );

        // Stock opname: the preparer edits while in draft.
        tables.insert(
            ResourceKind::StockOpname,
            HashMap::from([
                (Action::ViewAny, Rule::require(StockOpnameView)),
                (Action::View, Rule::require(StockOpnameView)),
                (Action::Create, Rule::require(StockOpnameCreate)),
                (
                    Action::Update,
                    Rule::require(StockOpnameEdit).owner_in(&[Draft]),
                ),
                (
                    Action::Delete,
                    Rule::require(StockOpnameDelete).owner_in(&[Draft]),
                ),
                (Action::Submit, Rule::require_in(&[Draft], StockOpnameSubmit)),
                (
                    Action::Approve,
                    Rule::require_in(&[Submitted], StockOpnameApprove),
                ),
                (
                    Action::Reject,
                    Rule::require_in(&[Submitted], StockOpnameApprove),
                ),
                (Action::Export, Rule::require(StockOpnameExport)),
            ]),
        );

        tables.insert(
            ResourceKind::NotificationLog,
            HashMap::from([
                (
                    Action::ViewAny,
                    Rule::require(NotificationLogsView).super_admin_override(),
                ),
                (
                    Action::View,
                    Rule::require(NotificationLogsView).super_admin_override(),
                ),
                (
                    Action::Delete,
                    Rule::require(NotificationLogsDelete).super_admin_override(),
                ),
                (
                    Action::Resend,
                    Rule::require(NotificationLogsResend).super_admin_override(),
                ),
            ]),
        );

        tables.insert(
            ResourceKind::Report,
            HashMap::from([
                (Action::ViewAny, Rule::require(ViewReports)),
                (Action::View, Rule::require(ViewReports)),
                (Action::Export, Rule::require(ViewReports)),
            ]),
        );

        // User management: everyone may view their own account.
        tables.insert(
            ResourceKind::User,
            HashMap::from([
                (Action::ViewAny, Rule::require(UsersView).super_admin_override()),
                (
                    Action::View,
                    Rule::require(UsersView).owner_any().super_admin_override(),
                ),
                (Action::Create, Rule::require(UsersCreate).super_admin_override()),
                (Action::Update, Rule::require(UsersEdit).super_admin_override()),
                (Action::Delete, Rule::require(UsersDelete).super_admin_override()),
                (
                    Action::AssignRoles,
                    Rule::require(UsersAssignRoles).super_admin_override(),
                ),
            ]),
        );

        tables.insert(
            ResourceKind::Role,
            HashMap::from([
                (Action::ViewAny, Rule::require(RolesView).super_admin_override()),
                (Action::View, Rule::require(RolesView).super_admin_override()),
                (Action::Create, Rule::require(RolesCreate).super_admin_override()),
                (Action::Update, Rule::require(RolesEdit).super_admin_override()),
                (Action::Delete, Rule::require(RolesDelete).super_admin_override()),
                (
                    Action::SyncPermissions,
                    Rule::require(RolesEdit).super_admin_override(),
                ),
            ]),
        );

        Self { tables }
    }

    /// Returns the rule for an action on a resource type, if one is defined.
    pub fn rule(&self, kind: ResourceKind, action: Action) -> Option<&Rule> {
        self.tables.get(&kind).and_then(|table| table.get(&action))
    }

    /// Returns the actions defined for a resource type, in declaration order
    /// of [`Action::ALL`].
    pub fn actions(&self, kind: ResourceKind) -> Vec<Action> {
        Action::ALL
            .iter()
            .copied()
            .filter(|action| self.rule(kind, *action).is_some())
            .collect()
    }
}

impl Default for PolicyRegistry {
    fn default() -> Self {
        Self::new()
    }
}
