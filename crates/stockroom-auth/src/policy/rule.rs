//! Declarative authorization rule for one `(resource, action)` pair.

use stockroom_core::types::UserId;
use stockroom_entity::permission::Ability;
use stockroom_entity::resource::{ResourceSnapshot, ResourceState};

/// Ownership short-circuit: the owner is allowed while the resource is in
/// one of `states`. An empty state list matches any state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ownership {
    /// States in which ownership grants access.
    pub states: Vec<ResourceState>,
    /// When set, a failed ownership check denies without consulting
    /// permissions.
    pub exclusive: bool,
}

impl Ownership {
    /// Whether `snapshot` is owned by `user` in a matching state.
    pub fn admits(&self, snapshot: &ResourceSnapshot, user: UserId) -> bool {
        snapshot.is_owned_by(user) && state_matches(&self.states, snapshot.state)
    }
}

/// A permission requirement, optionally gated on lifecycle states.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause {
    /// States in which the clause applies. Empty means any state.
    pub states: Vec<ResourceState>,
    /// The permission the actor must hold.
    pub ability: Ability,
}

impl Clause {
    /// Whether the clause applies to a resource in `state`.
    pub fn applies_to(&self, state: Option<ResourceState>) -> bool {
        state_matches(&self.states, state)
    }
}

/// The rule applied to one action on one resource type.
///
/// Evaluated as: ownership, then (for exclusive ownership) stop, then the
/// `super_admin` override, then the permission clauses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rule {
    /// Optional ownership short-circuit.
    pub ownership: Option<Ownership>,
    /// Whether the `super_admin` role is allowed regardless of permissions.
    pub super_admin_override: bool,
    /// Alternative permission requirements.
    pub clauses: Vec<Clause>,
}

impl Rule {
    /// A rule requiring `ability` in any state.
    pub fn require(ability: Ability) -> Self {
        Self::default().or(ability)
    }

    /// A rule requiring `ability` while the resource is in one of `states`.
    pub fn require_in(states: &[ResourceState], ability: Ability) -> Self {
        Self::default().or_in(states, ability)
    }

    /// A rule that only the owner satisfies, and only in `states`.
    pub fn owner_only(states: &[ResourceState]) -> Self {
        Self {
            ownership: Some(Ownership {
                states: states.to_vec(),
                exclusive: true,
            }),
            ..Self::default()
        }
    }

    /// Add an alternative ungated requirement.
    pub fn or(mut self, ability: Ability) -> Self {
        self.clauses.push(Clause {
            states: Vec::new(),
            ability,
        });
        self
    }

    /// Add an alternative requirement gated on `states`.
    pub fn or_in(mut self, states: &[ResourceState], ability: Ability) -> Self {
        self.clauses.push(Clause {
            states: states.to_vec(),
            ability,
        });
        self
    }

    /// Allow the owner while the resource is in one of `states`.
    pub fn owner_in(mut self, states: &[ResourceState]) -> Self {
        self.ownership = Some(Ownership {
            states: states.to_vec(),
            exclusive: false,
        });
        self
    }

    /// Allow the owner in any state.
    pub fn owner_any(self) -> Self {
        self.owner_in(&[])
    }

    /// Allow the `super_admin` role unconditionally.
    pub fn super_admin_override(mut self) -> Self {
        self.super_admin_override = true;
        self
    }

    /// Every state named by a state-gated clause or an exclusive ownership gate.
    pub fn gated_states(&self) -> Vec<ResourceState> {
        let mut states: Vec<ResourceState> = self
            .clauses
            .iter()
            .flat_map(|c| c.states.iter().copied())
            .collect();
        if let Some(ownership) = self.ownership.as_ref().filter(|o| o.exclusive) {
            states.extend(ownership.states.iter().copied());
        }
        states
    }
}

fn state_matches(states: &[ResourceState], state: Option<ResourceState>) -> bool {
    states.is_empty() || state.is_some_and(|s| states.contains(&s))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ungated_clause_applies_everywhere() {
        let rule = Rule::require(Ability::AssetsView);
        assert!(rule.clauses[0].applies_to(None));
        assert!(rule.clauses[0].applies_to(Some(ResourceState::Rejected)));
    }

    #[test]
    fn test_gated_clause_needs_state() {
        let rule = Rule::require_in(&[ResourceState::Draft], Ability::StockOpnameSubmit);
        assert!(rule.clauses[0].applies_to(Some(ResourceState::Draft)));
        assert!(!rule.clauses[0].applies_to(Some(ResourceState::Submitted)));
        assert!(!rule.clauses[0].applies_to(None));
    }

    #[test]
    fn test_ownership_admits_owner_in_state() {
        let rule = Rule::require(Ability::AtkRequestsEdit).owner_in(&[ResourceState::Pending]);
        let ownership = rule.ownership.unwrap();
        let pending = ResourceSnapshot::owned_by(UserId(5)).in_state(ResourceState::Pending);
        assert!(ownership.admits(&pending, UserId(5)));
        assert!(!ownership.admits(&pending, UserId(6)));
        let approved = pending.in_state(ResourceState::Level1Approved);
        assert!(!ownership.admits(&approved, UserId(5)));
    }
}
