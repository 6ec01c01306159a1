//! Request context carrying the acting user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use stockroom_auth::AccessResolver;
use stockroom_core::result::AppResult;
use stockroom_core::types::UserId;
use stockroom_entity::resource::{Action, ResourceKind, ResourceSnapshot};

/// Who is performing an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type", content = "id")]
pub enum Actor {
    /// An application user, subject to the policy tables.
    User(UserId),
    /// Operator tooling with direct database access (migrations, seeding,
    /// the admin CLI). Not subject to the policy tables.
    System,
}

/// Context for the current operation.
///
/// Passed into service methods so that every operation knows who is
/// acting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The acting party.
    pub actor: Actor,
    /// Display name of the actor, for logs.
    pub username: String,
    /// Correlation ID for log lines of this operation.
    pub request_id: Uuid,
    /// When the operation started.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a context for an application user.
    pub fn new(user_id: UserId, username: impl Into<String>) -> Self {
        Self {
            actor: Actor::User(user_id),
            username: username.into(),
            request_id: Uuid::new_v4(),
            request_time: Utc::now(),
        }
    }

    /// Creates a context for operator tooling.
    pub fn system() -> Self {
        Self {
            actor: Actor::System,
            username: "system".to_string(),
            request_id: Uuid::new_v4(),
            request_time: Utc::now(),
        }
    }

    /// Checks that the actor may perform `action`. System actors always pass.
    pub(crate) async fn authorize(
        &self,
        resolver: &AccessResolver,
        kind: ResourceKind,
        action: Action,
        resource: Option<&ResourceSnapshot>,
    ) -> AppResult<()> {
        let Actor::User(user_id) = self.actor else {
            return Ok(());
        };
        let verdict = resolver.authorize(user_id, kind, action, resource).await?;
        debug!(
            request_id = %self.request_id,
            user_id = %user_id,
            resource = %kind,
            action = %action,
            source = ?verdict.source,
            "Operation authorized"
        );
        Ok(())
    }
}
