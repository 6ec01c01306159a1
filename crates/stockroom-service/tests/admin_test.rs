//! Integration tests for role administration, the permission catalog and seeding.

mod helpers;

use stockroom_core::error::ErrorKind;
use stockroom_core::types::{PermissionId, RoleId, UserId};
use stockroom_entity::permission::Ability;
use stockroom_service::catalog::{CreatePermissionRequest, UpdatePermissionRequest};
use stockroom_service::role::{CreateRoleRequest, RenameRoleRequest};

#[tokio::test]
async fn test_seed_is_idempotent() {
    let app = helpers::TestApp::new().await;
    let operator = app.role("operator").await;
    let before = app.role_permission_names(&operator).await;

    // Custom edits to existing roles survive reseeding.
    let view = app.permission_id("assets.view").await;
    app.services
        .roles
        .sync_permissions(&app.system(), operator.id, &[view])
        .await
        .unwrap();

    let report = app.services.seeder.seed().await.unwrap();
    assert!(report.roles_created.is_empty());
    assert_eq!(report.permissions, Ability::ALL.len() + 1);
    assert_eq!(app.role_permission_names(&operator).await, vec!["assets.view"]);
    assert!(before.len() > 1);

    let roles = app.services.roles.list(&app.system()).await.unwrap();
    assert_eq!(roles.len(), 5);
}

#[tokio::test]
async fn test_seed_restores_super_admin_wildcard() {
    let app = helpers::TestApp::new().await;
    let admin = app.role("super_admin").await;
    let view = app.permission_id("assets.view").await;
    app.store.push_role_permission_row(admin.id, view).await;

    app.services.seeder.seed().await.unwrap();
    assert_eq!(app.role_permission_names(&admin).await, vec!["*"]);
}

#[tokio::test]
async fn test_super_admin_role_cannot_be_renamed_or_deleted() {
    let app = helpers::TestApp::new().await;
    let admin = app.role("super_admin").await;
    let ctx = app.system();

    let err = app
        .services
        .roles
        .rename(&ctx, admin.id, RenameRoleRequest { name: "root".into() })
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);

    let err = app.services.roles.delete(&ctx, admin.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);

    let kpa = app.role("kpa").await;
    let err = app
        .services
        .roles
        .rename(&ctx, kpa.id, RenameRoleRequest { name: "super_admin".into() })
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);
}

#[tokio::test]
async fn test_create_rename_delete_role() {
    let app = helpers::TestApp::new().await;
    let ctx = app.system();
    let user = app.user_with_roles("gudang", &[]).await;

    let role = app
        .services
        .roles
        .create(&ctx, CreateRoleRequest { name: " gudang ".into() })
        .await
        .unwrap();
    assert_eq!(role.name, "gudang");

    let err = app
        .services
        .roles
        .create(&ctx, CreateRoleRequest { name: "gudang".into() })
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);

    let err = app
        .services
        .roles
        .create(&ctx, CreateRoleRequest { name: String::new() })
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    let renamed = app
        .services
        .roles
        .rename(&ctx, role.id, RenameRoleRequest { name: "warehouse".into() })
        .await
        .unwrap();
    assert_eq!(renamed.name, "warehouse");

    app.services
        .users
        .sync_roles(&ctx, user.id, &[role.id])
        .await
        .unwrap();
    app.services.roles.delete(&ctx, role.id).await.unwrap();
    assert!(app.user_role_names(&user).await.is_empty());

    let err = app.services.roles.get(&ctx, role.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_missing_targets_are_not_found() {
    let app = helpers::TestApp::new().await;
    let ctx = app.system();

    let err = app
        .services
        .roles
        .sync_permissions(&ctx, RoleId(9_999), &[])
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);

    let err = app
        .services
        .users
        .sync_roles(&ctx, UserId(9_999), &[])
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_admin_operations_are_authorized() {
    let app = helpers::TestApp::new().await;
    let pegawai = app.user_with_roles("peg", &["pegawai"]).await;
    let root = app.user_with_roles("root", &["super_admin"]).await;
    let kpa = app.role("kpa").await;
    let l1 = app.permission_id("approval-l1").await;

    let err = app
        .services
        .roles
        .sync_permissions(&app.ctx(&pegawai), kpa.id, &[l1])
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Authorization);
    assert!(!err.message.contains("roles.edit"));

    let err = app
        .services
        .users
        .sync_roles(&app.ctx(&pegawai), pegawai.id, &[kpa.id])
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Authorization);

    app.services
        .roles
        .sync_permissions(&app.ctx(&root), kpa.id, &[l1])
        .await
        .unwrap();
    assert_eq!(app.role_permission_names(&kpa).await, vec!["approval-l1"]);
}

#[tokio::test]
async fn test_users_can_list_their_own_roles() {
    let app = helpers::TestApp::new().await;
    let pegawai = app.user_with_roles("peg", &["pegawai"]).await;
    let other = app.user_with_roles("op", &["operator"]).await;

    let roles = app
        .services
        .users
        .roles_of(&app.ctx(&pegawai), pegawai.id)
        .await
        .unwrap();
    assert_eq!(roles.len(), 1);

    let err = app
        .services
        .users
        .roles_of(&app.ctx(&pegawai), other.id)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Authorization);
}

#[tokio::test]
async fn test_catalog_grouping_and_edits() {
    let app = helpers::TestApp::new().await;
    let ctx = app.system();
    let catalog = &app.services.catalog;

    let grouped = catalog.grouped_by_module(&ctx).await.unwrap();
    assert_eq!(grouped["approval"].len(), 3);
    assert_eq!(grouped["system"].len(), 1);

    let created = catalog
        .create(
            &ctx,
            CreatePermissionRequest {
                name: "assets.transfer".into(),
                module: "assets".into(),
                description: Some("Move assets between rooms".into()),
            },
        )
        .await
        .unwrap();
    assert_eq!(catalog.list(&ctx, Some("assets")).await.unwrap().len(), 7);

    let updated = catalog
        .update(
            &ctx,
            created.id,
            UpdatePermissionRequest {
                name: "assets.relocate".into(),
                description: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "assets.relocate");
    assert_eq!(updated.description, None);

    let err = catalog
        .create(
            &ctx,
            CreatePermissionRequest {
                name: "*".into(),
                module: "system".into(),
                description: None,
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);

    let wildcard: PermissionId = app.permission_id("*").await;
    let err = catalog
        .update(
            &ctx,
            wildcard,
            UpdatePermissionRequest {
                name: "everything".into(),
                description: None,
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);
}

#[tokio::test]
async fn test_blank_permission_fields_are_rejected() {
    let app = helpers::TestApp::new().await;
    let ctx = app.system();
    let catalog = &app.services.catalog;
    let before = catalog.list(&ctx, None).await.unwrap().len();

    for (name, module) in [("   ", "  "), ("assets.transfer", " "), (" ", "assets")] {
        let err = catalog
            .create(
                &ctx,
                CreatePermissionRequest {
                    name: name.into(),
                    module: module.into(),
                    description: None,
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation, "{name:?}/{module:?}");
    }
    assert_eq!(catalog.list(&ctx, None).await.unwrap().len(), before);

    let view = app.permission_id("assets.view").await;
    let err = catalog
        .update(
            &ctx,
            view,
            UpdatePermissionRequest {
                name: "  ".into(),
                description: None,
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
    assert_eq!(app.permission_id("assets.view").await, view);
}
