//! Lifecycle states of workflow resources.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle state of a stateful resource.
///
/// Office supply requests move through `pending` and three approval levels
/// before being handed over (`diserahkan`) and received (`diterima`).
/// Stock opname sessions move from `draft` to `submitted` to a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceState {
    /// Filed, awaiting first-level approval.
    #[serde(rename = "pending")]
    Pending,
    /// Approved at level 1.
    #[serde(rename = "level1_approved")]
    Level1Approved,
    /// Approved at level 2.
    #[serde(rename = "level2_approved")]
    Level2Approved,
    /// Approved at level 3.
    #[serde(rename = "level3_approved")]
    Level3Approved,
    /// Rejected; terminal.
    #[serde(rename = "rejected")]
    Rejected,
    /// Handed over to the requester.
    #[serde(rename = "diserahkan")]
    Diserahkan,
    /// Receipt confirmed by the requester; terminal.
    #[serde(rename = "diterima")]
    Diterima,
    /// Being prepared; still editable.
    #[serde(rename = "draft")]
    Draft,
    /// Submitted for approval.
    #[serde(rename = "submitted")]
    Submitted,
    /// Approved; terminal.
    #[serde(rename = "approved")]
    Approved,
}

impl ResourceState {
    /// Every state.
    pub const ALL: &'static [ResourceState] = &[
        Self::Pending,
        Self::Level1Approved,
        Self::Level2Approved,
        Self::Level3Approved,
        Self::Rejected,
        Self::Diserahkan,
        Self::Diterima,
        Self::Draft,
        Self::Submitted,
        Self::Approved,
    ];

    /// Return the stored status string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Level1Approved => "level1_approved",
            Self::Level2Approved => "level2_approved",
            Self::Level3Approved => "level3_approved",
            Self::Rejected => "rejected",
            Self::Diserahkan => "diserahkan",
            Self::Diterima => "diterima",
            Self::Draft => "draft",
            Self::Submitted => "submitted",
            Self::Approved => "approved",
        }
    }

    /// Check whether no further transitions leave this state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Rejected | Self::Diterima | Self::Approved)
    }
}

impl fmt::Display for ResourceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ResourceState {
    type Err = stockroom_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|st| st.as_str() == normalized)
            .ok_or_else(|| {
                stockroom_core::AppError::validation(format!("Invalid resource state: '{s}'"))
            })
    }
}
