//! Wiring of the authorization core and the service layer over one store.

use std::sync::Arc;

use stockroom_auth::{
    AccessResolver, Authorizer, RbacEnforcer, RolePermissionSynchronizer, UserRoleSynchronizer,
};
use stockroom_database::RbacStore;

use crate::catalog::{CatalogSeeder, PermissionCatalogService};
use crate::role::RoleService;
use crate::user::UserRoleService;

/// Every service, sharing one storage collaborator.
#[derive(Debug, Clone)]
pub struct Services {
    /// Access resolver.
    pub access: Arc<AccessResolver>,
    /// Role administration.
    pub roles: Arc<RoleService>,
    /// User role assignment.
    pub users: Arc<UserRoleService>,
    /// Permission catalog.
    pub catalog: Arc<PermissionCatalogService>,
    /// Catalog seeder.
    pub seeder: Arc<CatalogSeeder>,
}

impl Services {
    /// Builds the services over `store` for the given guard scope.
    pub fn new(store: Arc<dyn RbacStore>, guard_name: &str) -> Self {
        let enforcer = Arc::new(RbacEnforcer::new(Arc::clone(&store)));
        let access = Arc::new(AccessResolver::new(enforcer, Arc::new(Authorizer::new())));
        let role_sync = Arc::new(RolePermissionSynchronizer::new(Arc::clone(&store)));
        let user_sync = Arc::new(UserRoleSynchronizer::new(Arc::clone(&store)));

        let roles = Arc::new(RoleService::new(
            Arc::clone(&store),
            Arc::clone(&access),
            Arc::clone(&role_sync),
            guard_name,
        ));
        let users = Arc::new(UserRoleService::new(
            Arc::clone(&store),
            Arc::clone(&access),
            user_sync,
        ));
        let catalog = Arc::new(PermissionCatalogService::new(
            Arc::clone(&store),
            Arc::clone(&access),
            guard_name,
        ));
        let seeder = Arc::new(CatalogSeeder::new(store, role_sync, guard_name));

        Self {
            access,
            roles,
            users,
            catalog,
            seeder,
        }
    }
}
