//! Point-in-time view of a resource instance used for authorization.

use serde::{Deserialize, Serialize};

use stockroom_core::types::UserId;

use super::state::ResourceState;

/// The facts about a resource instance that a policy may inspect.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceSnapshot {
    /// The user who created (owns) the resource, if tracked.
    pub owner_id: Option<UserId>,
    /// The current lifecycle state, if the resource is stateful.
    pub state: Option<ResourceState>,
}

impl ResourceSnapshot {
    /// A snapshot with neither owner nor state.
    pub fn new() -> Self {
        Self::default()
    }

    /// A snapshot of a resource owned by `owner_id`.
    pub fn owned_by(owner_id: UserId) -> Self {
        Self {
            owner_id: Some(owner_id),
            state: None,
        }
    }

    /// Set the lifecycle state.
    pub fn in_state(mut self, state: ResourceState) -> Self {
        self.state = Some(state);
        self
    }

    /// Check whether `user_id` owns this resource.
    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.owner_id == Some(user_id)
    }
}
