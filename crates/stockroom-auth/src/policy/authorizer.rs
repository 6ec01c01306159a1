//! The decision procedure shared by every protected resource type.
//!
//! Evaluation order:
//! 1. Ownership: the owner in an admitted state is allowed. Exclusive
//!    ownership rules deny everyone else here.
//! 2. Super-admin override, for resource types that declare it.
//! 3. Permissions: the clauses whose state gate matches are candidates;
//!    the actor must hold one candidate's permission.
//!
//! An action with no rule for the resource type is denied.

use serde::{Deserialize, Serialize};
use tracing::debug;

use stockroom_entity::resource::{Action, ResourceKind, ResourceSnapshot};

use crate::rbac::Grants;

use super::registry::PolicyRegistry;

/// Allow or deny.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    /// The action may proceed.
    Allow,
    /// The action is refused.
    Deny,
}

/// Which step of the procedure produced the decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionSource {
    /// The actor owns the resource in an admitted state.
    Ownership,
    /// The actor holds the `super_admin` role on an overriding resource type.
    SuperAdmin,
    /// The actor holds a required permission.
    Permission,
    /// No step allowed the action.
    Denied,
}

impl DecisionSource {
    /// Return the source name in snake_case.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ownership => "ownership",
            Self::SuperAdmin => "super_admin",
            Self::Permission => "permission",
            Self::Denied => "denied",
        }
    }
}

/// The result of one authorization decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    /// Allow or deny.
    pub decision: Decision,
    /// The step that decided.
    pub source: DecisionSource,
}

impl Verdict {
    fn allow(source: DecisionSource) -> Self {
        Self {
            decision: Decision::Allow,
            source,
        }
    }

    fn deny() -> Self {
        Self {
            decision: Decision::Deny,
            source: DecisionSource::Denied,
        }
    }

    /// Whether the action is allowed.
    pub fn is_allowed(&self) -> bool {
        self.decision == Decision::Allow
    }
}

/// Pure decision function over an actor's grants and a rule table.
#[derive(Debug, Clone, Default)]
pub struct Authorizer {
    registry: PolicyRegistry,
}

impl Authorizer {
    /// Creates an authorizer with the default rule tables.
    pub fn new() -> Self {
        Self::with_registry(PolicyRegistry::new())
    }

    /// Creates an authorizer with custom rule tables.
    pub fn with_registry(registry: PolicyRegistry) -> Self {
        Self { registry }
    }

    /// Returns the rule tables.
    pub fn registry(&self) -> &PolicyRegistry {
        &self.registry
    }

    /// Decides whether `grants` allow `action` on a resource of type `kind`.
    ///
    /// `resource` is `None` for type-level actions such as `viewAny` or
    /// `create`; ownership and state-gated clauses then cannot match.
    pub fn decide(
        &self,
        grants: &Grants,
        kind: ResourceKind,
        action: Action,
        resource: Option<&ResourceSnapshot>,
    ) -> Verdict {
        let verdict = self.evaluate(grants, kind, action, resource.copied().unwrap_or_default());
        debug!(
            user_id = %grants.user_id,
            resource = %kind,
            action = %action,
            decision = ?verdict.decision,
            source = ?verdict.source,
            "Authorization decided"
        );
        verdict
    }

    fn evaluate(
        &self,
        grants: &Grants,
        kind: ResourceKind,
        action: Action,
        snapshot: ResourceSnapshot,
    ) -> Verdict {
        let Some(rule) = self.registry.rule(kind, action) else {
            return Verdict::deny();
        };

        if let Some(ownership) = &rule.ownership {
            if ownership.admits(&snapshot, grants.user_id) {
                return Verdict::allow(DecisionSource::Ownership);
            }
            if ownership.exclusive {
                return Verdict::deny();
            }
        }

        if rule.super_admin_override && grants.is_super_admin() {
            return Verdict::allow(DecisionSource::SuperAdmin);
        }

        let held = rule
            .clauses
            .iter()
            .filter(|clause| clause.applies_to(snapshot.state))
            .any(|clause| grants.has(clause.ability));

        if held {
            Verdict::allow(DecisionSource::Permission)
        } else {
            Verdict::deny()
        }
    }
}
