//! Integration tests for role permission and user role synchronization.

mod helpers;

use stockroom_core::types::{PermissionId, RoleId};
use stockroom_database::RbacStore;

#[tokio::test]
async fn test_super_admin_always_holds_only_wildcard() {
    let app = helpers::TestApp::new().await;
    let admin = app.role("super_admin").await;
    let some = app
        .permission_ids(&["assets.view", "roles.delete", "approval-l1"])
        .await;

    let requests: Vec<Vec<PermissionId>> = vec![
        some.clone(),
        vec![],
        vec![PermissionId(999_999)],
        vec![some[0], some[0], some[1]],
    ];

    for request in requests {
        app.services
            .roles
            .sync_permissions(&app.system(), admin.id, &request)
            .await
            .unwrap();
        assert_eq!(app.role_permission_names(&admin).await, vec!["*"]);
        assert_eq!(app.store.role_permission_rows(admin.id).await.unwrap().len(), 1);
    }
}

#[tokio::test]
async fn test_super_admin_is_exclusive() {
    let app = helpers::TestApp::new().await;
    let user = app.user_with_roles("andi", &["operator"]).await;
    let admin = app.role("super_admin").await;
    let kpa = app.role("kpa").await;
    let pegawai = app.role("pegawai").await;

    for request in [
        vec![admin.id],
        vec![kpa.id, admin.id, pegawai.id],
        vec![admin.id, admin.id, RoleId(424_242)],
    ] {
        let outcome = app
            .services
            .users
            .sync_roles(&app.system(), user.id, &request)
            .await
            .unwrap();
        assert_eq!(outcome.roles, vec!["super_admin"]);
        assert_eq!(app.user_role_names(&user).await, vec!["super_admin"]);
    }
}

#[tokio::test]
async fn test_repeated_sync_is_idempotent() {
    let app = helpers::TestApp::new().await;
    let operator = app.role("operator").await;
    let ids = app
        .permission_ids(&["assets.view", "assets.edit", "assets.view"])
        .await;

    let first = app
        .services
        .roles
        .sync_permissions(&app.system(), operator.id, &ids)
        .await
        .unwrap();
    let rows_after_first = app.store.role_permission_rows(operator.id).await.unwrap();

    let second = app
        .services
        .roles
        .sync_permissions(&app.system(), operator.id, &ids)
        .await
        .unwrap();
    let mut rows_after_second = app.store.role_permission_rows(operator.id).await.unwrap();

    assert_eq!(first.permissions, second.permissions);
    assert_eq!(second.permissions, vec!["assets.edit", "assets.view"]);
    assert_eq!(rows_after_second.len(), 2);
    rows_after_second.sort();
    let mut expected = rows_after_first;
    expected.sort();
    assert_eq!(rows_after_second, expected);
}

#[tokio::test]
async fn test_duplicate_rows_are_collapsed_by_sync() {
    let app = helpers::TestApp::new().await;
    let operator = app.role("operator").await;
    let view = app.permission_id("assets.view").await;
    let edit = app.permission_id("assets.edit").await;

    for _ in 0..3 {
        app.store.push_role_permission_row(operator.id, view).await;
    }
    assert!(app.store.role_permission_rows(operator.id).await.unwrap().len() > 1);

    app.services
        .roles
        .sync_permissions(&app.system(), operator.id, &[view, edit, view])
        .await
        .unwrap();

    let mut rows = app.store.role_permission_rows(operator.id).await.unwrap();
    rows.sort();
    let mut expected = vec![view, edit];
    expected.sort();
    assert_eq!(rows, expected);
}

#[tokio::test]
async fn test_unknown_permission_id_is_dropped() {
    let app = helpers::TestApp::new().await;
    let pegawai = app.role("pegawai").await;
    let valid = app.permission_id("atk.requests.create").await;

    let outcome = app
        .services
        .roles
        .sync_permissions(&app.system(), pegawai.id, &[valid, PermissionId(999_999)])
        .await
        .unwrap();

    assert_eq!(outcome.permissions, vec!["atk.requests.create"]);
    assert_eq!(outcome.dropped, vec![PermissionId(999_999)]);
    assert_eq!(app.store.role_permission_rows(pegawai.id).await.unwrap(), vec![valid]);
}

#[tokio::test]
async fn test_kpa_resync_replaces_whole_set() {
    let app = helpers::TestApp::new().await;
    let kpa = app.role("kpa").await;
    let ids = app
        .permission_ids(&["view-reports", "approval-l3", "view-aset"])
        .await;

    app.services
        .roles
        .sync_permissions(&app.system(), kpa.id, &ids)
        .await
        .unwrap();
    assert_eq!(
        app.role_permission_names(&kpa).await,
        vec!["approval-l3", "view-aset", "view-reports"]
    );

    let l3 = app.permission_id("approval-l3").await;
    app.services
        .roles
        .sync_permissions(&app.system(), kpa.id, &[l3])
        .await
        .unwrap();
    assert_eq!(app.role_permission_names(&kpa).await, vec!["approval-l3"]);
}

#[tokio::test]
async fn test_granting_super_admin_replaces_existing_roles() {
    let app = helpers::TestApp::new().await;
    let user = app.user_with_roles("sari", &["kpa"]).await;
    let admin = app.role("super_admin").await;

    app.services
        .users
        .sync_roles(&app.system(), user.id, &[admin.id])
        .await
        .unwrap();

    assert_eq!(app.user_role_names(&user).await, vec!["super_admin"]);
}

#[tokio::test]
async fn test_omitting_super_admin_removes_it() {
    let app = helpers::TestApp::new().await;
    let user = app.user_with_roles("yudi", &["super_admin"]).await;
    let kpa = app.role("kpa").await;

    app.services
        .users
        .sync_roles(&app.system(), user.id, &[kpa.id])
        .await
        .unwrap();

    assert_eq!(app.user_role_names(&user).await, vec!["kpa"]);
}
