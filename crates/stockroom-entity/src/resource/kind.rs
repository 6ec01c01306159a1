//! Resource type enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The kinds of resources guarded by an authorization policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// A registered fixed asset.
    Asset,
    /// An office supply (ATK) item.
    OfficeSupply,
    /// An office supply request going through multi-level approval.
    AtkRequest,
    /// A stock opname (physical stock count) session.
    StockOpname,
    /// A WhatsApp/push notification delivery log entry.
    NotificationLog,
    /// A generated report.
    Report,
    /// A user account.
    User,
    /// A role.
    Role,
}

impl ResourceKind {
    /// Every resource kind.
    pub const ALL: &'static [ResourceKind] = &[
        Self::Asset,
        Self::OfficeSupply,
        Self::AtkRequest,
        Self::StockOpname,
        Self::NotificationLog,
        Self::Report,
        Self::User,
        Self::Role,
    ];

    /// Return the kind as a snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asset => "asset",
            Self::OfficeSupply => "office_supply",
            Self::AtkRequest => "atk_request",
            Self::StockOpname => "stock_opname",
            Self::NotificationLog => "notification_log",
            Self::Report => "report",
            Self::User => "user",
            Self::Role => "role",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = stockroom_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        Self::ALL
            .iter()
            .copied()
            .find(|k| k.as_str() == normalized)
            .ok_or_else(|| {
                stockroom_core::AppError::validation(format!("Invalid resource type: '{s}'"))
            })
    }
}
