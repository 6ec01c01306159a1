//! Workflow state machine for stateful resources.
//!
//! ```text
//! atk_request:  pending -> level1_approved -> level2_approved -> level3_approved
//!               (any non-terminal approval stage) -> rejected
//!               level3_approved -> diserahkan -> diterima
//! stock_opname: draft -> submitted -> approved | rejected
//! ```

use super::action::Action;
use super::kind::ResourceKind;
use super::state::ResourceState;

/// Return the state a resource moves to when `action` is applied in `from`.
///
/// `None` means the transition is not defined; callers treat it as a denial,
/// never as an error.
pub fn transition(kind: ResourceKind, from: ResourceState, action: Action) -> Option<ResourceState> {
    use Action::*;
    use ResourceState::*;

    match (kind, from, action) {
        (ResourceKind::AtkRequest, Pending, Approve) => Some(Level1Approved),
        (ResourceKind::AtkRequest, Level1Approved, Approve) => Some(Level2Approved),
        (ResourceKind::AtkRequest, Level2Approved, Approve) => Some(Level3Approved),
        (
            ResourceKind::AtkRequest,
            Pending | Level1Approved | Level2Approved | Level3Approved,
            Reject,
        ) => Some(Rejected),
        (ResourceKind::AtkRequest, Level3Approved, Distribute) => Some(Diserahkan),
        (ResourceKind::AtkRequest, Diserahkan, ConfirmReceive) => Some(Diterima),

        (ResourceKind::StockOpname, Draft, Submit) => Some(Submitted),
        (ResourceKind::StockOpname, Submitted, Approve) => Some(Approved),
        (ResourceKind::StockOpname, Submitted, Reject) => Some(Rejected),

        _ => None,
    }
}
