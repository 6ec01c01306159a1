//! Integration tests for resource authorization over seeded roles.

mod helpers;

use stockroom_auth::{Decision, DecisionSource};
use stockroom_core::error::ErrorKind;
use stockroom_entity::permission::Ability;
use stockroom_entity::resource::{Action, ResourceKind, ResourceSnapshot, ResourceState, transition};

#[tokio::test]
async fn test_super_admin_passes_every_named_check() {
    let app = helpers::TestApp::new().await;
    let user = app.user_with_roles("root", &["super_admin"]).await;
    let enforcer = app.services.access.enforcer();

    for ability in Ability::ALL {
        assert!(
            enforcer.user_has_permission(user.id, ability.as_str()).await.unwrap(),
            "{ability}"
        );
    }
    for hypothetical in ["reports.archive", "assets.transfer", "x"] {
        assert!(enforcer.user_has_permission(user.id, hypothetical).await.unwrap());
    }
}

#[tokio::test]
async fn test_super_admin_passes_every_ungated_rule() {
    let app = helpers::TestApp::new().await;
    let user = app.user_with_roles("root", &["super_admin"]).await;
    let grants = app.services.access.grants(user.id).await.unwrap();
    assert!(grants.is_super_admin());

    let authorizer = stockroom_auth::Authorizer::new();
    for kind in ResourceKind::ALL {
        for action in authorizer.registry().actions(*kind) {
            let rule = authorizer.registry().rule(*kind, action).unwrap();
            if !rule.gated_states().is_empty() {
                continue;
            }
            let verdict = app
                .services
                .access
                .inspect(user.id, *kind, action, None)
                .await
                .unwrap();
            assert_eq!(verdict.decision, Decision::Allow, "{kind}.{action}");
        }
    }
}

#[tokio::test]
async fn test_requester_updates_only_while_pending() {
    let app = helpers::TestApp::new().await;
    let user = app.user_with_roles("pegawai1", &["pegawai"]).await;
    let access = &app.services.access;

    let pending = ResourceSnapshot::owned_by(user.id).in_state(ResourceState::Pending);
    let verdict = access
        .inspect(user.id, ResourceKind::AtkRequest, Action::Update, Some(&pending))
        .await
        .unwrap();
    assert_eq!(verdict.decision, Decision::Allow);
    assert_eq!(verdict.source, DecisionSource::Ownership);

    let next = transition(ResourceKind::AtkRequest, ResourceState::Pending, Action::Approve).unwrap();
    let approved = pending.in_state(next);
    let verdict = access
        .inspect(user.id, ResourceKind::AtkRequest, Action::Update, Some(&approved))
        .await
        .unwrap();
    assert_eq!(verdict.decision, Decision::Deny);
}

#[tokio::test]
async fn test_submit_requires_draft_and_permission() {
    let app = helpers::TestApp::new().await;
    let operator = app.user_with_roles("op", &["operator"]).await;
    let pegawai = app.user_with_roles("peg", &["pegawai"]).await;
    let admin = app.user_with_roles("root", &["super_admin"]).await;
    let access = &app.services.access;

    let draft = ResourceSnapshot::owned_by(operator.id).in_state(ResourceState::Draft);
    assert!(access
        .allows(operator.id, ResourceKind::StockOpname, Action::Submit, Some(&draft))
        .await
        .unwrap());
    assert!(!access
        .allows(pegawai.id, ResourceKind::StockOpname, Action::Submit, Some(&draft))
        .await
        .unwrap());

    let submitted = draft.in_state(ResourceState::Submitted);
    for actor in [operator.id, admin.id] {
        assert!(!access
            .allows(actor, ResourceKind::StockOpname, Action::Submit, Some(&submitted))
            .await
            .unwrap());
    }
}

#[tokio::test]
async fn test_request_walks_through_approval_levels() {
    let app = helpers::TestApp::new().await;
    let requester = app.user_with_roles("peg", &["pegawai"]).await;
    let operator = app.user_with_roles("op", &["operator"]).await;
    let kasubag = app.user_with_roles("kasubag", &["kasubag"]).await;
    let kpa = app.user_with_roles("kpa", &["kpa"]).await;
    let access = &app.services.access;

    let steps = [
        (operator.id, Action::Approve),
        (kasubag.id, Action::Approve),
        (kpa.id, Action::Approve),
        (operator.id, Action::Distribute),
        (requester.id, Action::ConfirmReceive),
    ];

    let mut request = ResourceSnapshot::owned_by(requester.id).in_state(ResourceState::Pending);
    for (actor, action) in steps {
        access
            .authorize(actor, ResourceKind::AtkRequest, action, Some(&request))
            .await
            .unwrap();
        let state = request.state.unwrap();
        let next = transition(ResourceKind::AtkRequest, state, action).unwrap();
        request = request.in_state(next);
    }
    assert_eq!(request.state, Some(ResourceState::Diterima));
}

#[tokio::test]
async fn test_approver_cannot_skip_level() {
    let app = helpers::TestApp::new().await;
    let kpa = app.user_with_roles("kpa", &["kpa"]).await;
    let pending = ResourceSnapshot::owned_by(kpa.id).in_state(ResourceState::Pending);

    let err = app
        .services
        .access
        .authorize(kpa.id, ResourceKind::AtkRequest, Action::Approve, Some(&pending))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Authorization);
    assert_eq!(err.message, "This action is unauthorized.");
}

#[tokio::test]
async fn test_notification_logs_are_super_admin_only_by_default() {
    let app = helpers::TestApp::new().await;
    let admin = app.user_with_roles("root", &["super_admin"]).await;
    let kpa = app.user_with_roles("kpa", &["kpa"]).await;
    let access = &app.services.access;

    let verdict = access
        .inspect(admin.id, ResourceKind::NotificationLog, Action::Resend, None)
        .await
        .unwrap();
    assert_eq!(verdict.source, DecisionSource::SuperAdmin);

    assert!(!access
        .allows(kpa.id, ResourceKind::NotificationLog, Action::ViewAny, None)
        .await
        .unwrap());
}

#[tokio::test]
async fn test_revoked_role_takes_effect_immediately() {
    let app = helpers::TestApp::new().await;
    let user = app.user_with_roles("op", &["operator"]).await;
    let access = &app.services.access;

    assert!(access
        .allows(user.id, ResourceKind::Asset, Action::Update, None)
        .await
        .unwrap());

    app.services
        .users
        .sync_roles(&app.system(), user.id, &[])
        .await
        .unwrap();

    assert!(!access
        .allows(user.id, ResourceKind::Asset, Action::Update, None)
        .await
        .unwrap());
}
