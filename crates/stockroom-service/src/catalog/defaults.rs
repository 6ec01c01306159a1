//! Default roles installed by the seeder.

use stockroom_entity::permission::Ability;
use stockroom_entity::role::SUPER_ADMIN_ROLE;

/// A role created on first seed together with its initial permissions.
#[derive(Debug, Clone, Copy)]
pub struct DefaultRole {
    /// Role name.
    pub name: &'static str,
    /// Initial permissions. Ignored for `super_admin`, which always holds
    /// the wildcard.
    pub abilities: &'static [Ability],
}

/// Head of office: final approval, reports and the asset dashboard.
const KPA: &[Ability] = &[
    Ability::ApprovalL3,
    Ability::ViewReports,
    Ability::ViewAset,
    Ability::AssetsView,
    Ability::AtkItemsView,
    Ability::AtkRequestsView,
    Ability::StockOpnameView,
    Ability::StockOpnameApprove,
];

/// Sub-division head: second-level approval.
const KASUBAG: &[Ability] = &[
    Ability::ApprovalL2,
    Ability::ViewReports,
    Ability::AssetsView,
    Ability::AtkItemsView,
    Ability::AtkRequestsView,
    Ability::StockOpnameView,
];

/// Warehouse operator: first-level approval, stock keeping and hand-over.
const OPERATOR: &[Ability] = &[
    Ability::ApprovalL1,
    Ability::AssetsView,
    Ability::AssetsCreate,
    Ability::AssetsEdit,
    Ability::AtkItemsView,
    Ability::AtkItemsCreate,
    Ability::AtkItemsEdit,
    Ability::AtkItemsImport,
    Ability::AtkItemsExport,
    Ability::AtkRequestsView,
    Ability::AtkRequestsDistribute,
    Ability::StockOpnameView,
    Ability::StockOpnameCreate,
    Ability::StockOpnameEdit,
    Ability::StockOpnameSubmit,
];

/// Regular employee: files requests.
const PEGAWAI: &[Ability] = &[Ability::AtkRequestsCreate];

/// Roles the seeder creates when missing.
pub const DEFAULT_ROLES: &[DefaultRole] = &[
    DefaultRole {
        name: SUPER_ADMIN_ROLE,
        abilities: &[],
    },
    DefaultRole {
        name: "kpa",
        abilities: KPA,
    },
    DefaultRole {
        name: "kasubag",
        abilities: KASUBAG,
    },
    DefaultRole {
        name: "operator",
        abilities: OPERATOR,
    },
    DefaultRole {
        name: "pegawai",
        abilities: PEGAWAI,
    },
];
