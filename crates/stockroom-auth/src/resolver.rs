//! Request-level access resolution.
//!
//! Loads the actor's committed grants from storage and runs the decision
//! procedure. Nothing is cached, so each call reflects the latest sync.

use std::sync::Arc;

use stockroom_core::error::AppError;
use stockroom_core::result::AppResult;
use stockroom_core::types::UserId;
use stockroom_entity::resource::{Action, ResourceKind, ResourceSnapshot};

use crate::policy::{Authorizer, Verdict};
use crate::rbac::enforcer::DENIED_MESSAGE;
use crate::rbac::{Grants, RbacEnforcer};

/// Chains grant loading and policy evaluation.
#[derive(Debug, Clone)]
pub struct AccessResolver {
    /// Grant loader.
    rbac: Arc<RbacEnforcer>,
    /// Decision procedure.
    authorizer: Arc<Authorizer>,
}

impl AccessResolver {
    /// Creates a new access resolver.
    pub fn new(rbac: Arc<RbacEnforcer>, authorizer: Arc<Authorizer>) -> Self {
        Self { rbac, authorizer }
    }

    /// Returns the grant loader.
    pub fn enforcer(&self) -> &RbacEnforcer {
        &self.rbac
    }

    /// Loads the actor's current grants.
    pub async fn grants(&self, user_id: UserId) -> AppResult<Grants> {
        self.rbac.grants_for(user_id).await
    }

    /// Returns the full verdict for an actor and action.
    ///
    /// A denial is a normal return value; errors come only from storage.
    pub async fn inspect(
        &self,
        user_id: UserId,
        kind: ResourceKind,
        action: Action,
        resource: Option<&ResourceSnapshot>,
    ) -> AppResult<Verdict> {
        let grants = self.rbac.grants_for(user_id).await?;
        Ok(self.authorizer.decide(&grants, kind, action, resource))
    }

    /// Returns whether the actor may perform the action.
    pub async fn allows(
        &self,
        user_id: UserId,
        kind: ResourceKind,
        action: Action,
        resource: Option<&ResourceSnapshot>,
    ) -> AppResult<bool> {
        Ok(self.inspect(user_id, kind, action, resource).await?.is_allowed())
    }

    /// Checks access and converts a denial into an authorization error.
    ///
    /// The error message is fixed and names neither the missing permission
    /// nor the actor's roles.
    pub async fn authorize(
        &self,
        user_id: UserId,
        kind: ResourceKind,
        action: Action,
        resource: Option<&ResourceSnapshot>,
    ) -> AppResult<Verdict> {
        let verdict = self.inspect(user_id, kind, action, resource).await?;
        if !verdict.is_allowed() {
            return Err(AppError::authorization(DENIED_MESSAGE));
        }
        Ok(verdict)
    }
}
