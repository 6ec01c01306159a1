//! An actor's committed role and permission assignments.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use stockroom_core::types::UserId;
use stockroom_entity::permission::{Ability, WILDCARD_PERMISSION};
use stockroom_entity::role::SUPER_ADMIN_ROLE;

/// The roles and permission names an actor holds at decision time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grants {
    /// The actor.
    pub user_id: UserId,
    /// Names of the roles assigned to the actor.
    pub roles: BTreeSet<String>,
    /// Names of the permissions granted through those roles.
    pub permissions: BTreeSet<String>,
}

impl Grants {
    /// Grants for an actor holding nothing.
    pub fn empty(user_id: UserId) -> Self {
        Self {
            user_id,
            roles: BTreeSet::new(),
            permissions: BTreeSet::new(),
        }
    }

    /// Build grants from role and permission names.
    pub fn new<R, P>(user_id: UserId, roles: R, permissions: P) -> Self
    where
        R: IntoIterator,
        R::Item: Into<String>,
        P: IntoIterator,
        P::Item: Into<String>,
    {
        Self {
            user_id,
            roles: roles.into_iter().map(Into::into).collect(),
            permissions: permissions.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether the actor holds the `super_admin` role.
    pub fn is_super_admin(&self) -> bool {
        self.roles.contains(SUPER_ADMIN_ROLE)
    }

    /// Whether the actor holds the wildcard permission.
    pub fn has_wildcard(&self) -> bool {
        self.permissions.contains(WILDCARD_PERMISSION)
    }

    /// Wildcard-aware permission check.
    ///
    /// Holding `super_admin` or `*` satisfies every name, including names
    /// absent from the catalog. Otherwise the name must match exactly.
    pub fn has_permission(&self, name: &str) -> bool {
        self.is_super_admin() || self.has_wildcard() || self.permissions.contains(name)
    }

    /// Check a catalogued ability.
    pub fn has(&self, ability: Ability) -> bool {
        self.has_permission(ability.as_str())
    }

    /// Whether the actor holds the given role.
    pub fn has_role(&self, name: &str) -> bool {
        self.roles.contains(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match_is_case_sensitive() {
        let grants = Grants::new(UserId(1), ["pegawai"], ["atk.requests.create"]);
        assert!(grants.has_permission("atk.requests.create"));
        assert!(!grants.has_permission("ATK.requests.create"));
        assert!(!grants.has(Ability::AtkRequestsEdit));
        assert!(!grants.is_super_admin());
    }

    #[test]
    fn test_super_admin_role_satisfies_any_name() {
        let grants = Grants::new(UserId(1), ["super_admin"], ["*"]);
        for ability in Ability::ALL {
            assert!(grants.has(*ability));
        }
        assert!(grants.has_permission("not.in.catalog"));
        assert!(grants.has_permission(""));
    }

    #[test]
    fn test_super_admin_role_without_wildcard_row() {
        let grants = Grants::new(UserId(1), ["super_admin"], Vec::<String>::new());
        assert!(grants.has_permission("roles.delete"));
    }

    #[test]
    fn test_wildcard_on_other_role() {
        let grants = Grants::new(UserId(2), ["operator"], ["*"]);
        assert!(!grants.is_super_admin());
        assert!(grants.has(Ability::ApprovalL3));
    }

    #[test]
    fn test_empty_grants_deny() {
        let grants = Grants::empty(UserId(3));
        assert!(Ability::ALL.iter().all(|a| !grants.has(*a)));
    }
}
