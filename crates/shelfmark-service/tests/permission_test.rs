//! Integration tests for permission override management and resolution.

mod helpers;

use helpers::TestApp;
use shelfmark_core::error::ErrorKind;
use shelfmark_service::context::RequestContext;
use uuid::Uuid;

fn admin_ctx() -> RequestContext {
    RequestContext::new(Uuid::new_v4(), "10.0.0.1")
}

#[tokio::test]
async fn granted_permission_is_effective_without_any_role() {
    let app = TestApp::new().await;
    app.create_permission("canEditItem", true).await;
    let user = app
        .create_user("ada@library.test", "EMP-001", "password123", Vec::new())
        .await;

    app.permissions
        .grant_permission(&admin_ctx(), user.id, "canEditItem")
        .await
        .unwrap();

    let view = app.permissions.get_effective_permissions(user.id).await.unwrap();
    assert_eq!(view.effective_permissions, vec!["canEditItem"]);
}

#[tokio::test]
async fn granting_unknown_or_inactive_permission_fails() {
    let app = TestApp::new().await;
    app.create_permission("canRetireItem", false).await;
    let user = app
        .create_user("ada@library.test", "EMP-001", "password123", Vec::new())
        .await;

    let unknown = app
        .permissions
        .grant_permission(&admin_ctx(), user.id, "canDoAnything")
        .await
        .unwrap_err();
    assert_eq!(unknown.kind, ErrorKind::Validation);

    let inactive = app
        .permissions
        .grant_permission(&admin_ctx(), user.id, "canRetireItem")
        .await
        .unwrap_err();
    assert_eq!(inactive.kind, ErrorKind::Validation);

    assert!(app.user(user.id).await.permission_overrides.is_empty());
}

#[tokio::test]
async fn grant_clears_a_prior_revoke_of_the_same_name() {
    let app = TestApp::new().await;
    app.create_permission("canViewItem", true).await;
    let role = app.create_role("Librarian", &["canViewItem"]).await;
    let user = app
        .create_user("ada@library.test", "EMP-001", "password123", vec![role.id])
        .await;

    let ctx = admin_ctx();
    app.permissions
        .revoke_permission(&ctx, user.id, "canViewItem")
        .await
        .unwrap();
    assert!(
        app.user(user.id)
            .await
            .permission_overrides
            .revoked
            .contains("canViewItem")
    );

    app.permissions
        .grant_permission(&ctx, user.id, "canViewItem")
        .await
        .unwrap();

    let reloaded = app.user(user.id).await;
    assert!(reloaded.permission_overrides.granted.contains("canViewItem"));
    assert!(!reloaded.permission_overrides.revoked.contains("canViewItem"));
}

#[tokio::test]
async fn revoking_a_pure_grant_leaves_no_residue() {
    let app = TestApp::new().await;
    app.create_permission("canEditItem", true).await;
    let user = app
        .create_user("ada@library.test", "EMP-001", "password123", Vec::new())
        .await;

    let ctx = admin_ctx();
    app.permissions
        .grant_permission(&ctx, user.id, "canEditItem")
        .await
        .unwrap();
    app.permissions
        .revoke_permission(&ctx, user.id, "canEditItem")
        .await
        .unwrap();

    // No role supplies canEditItem, so the revoke must not be recorded:
    // the withdrawn grant resolves identically to a clean absence.
    let reloaded = app.user(user.id).await;
    assert!(reloaded.permission_overrides.is_empty());

    let view = app.permissions.get_effective_permissions(user.id).await.unwrap();
    assert!(view.effective_permissions.is_empty());
}

#[tokio::test]
async fn revoking_a_role_derived_permission_records_the_suppression() {
    let app = TestApp::new().await;
    app.create_permission("canViewItem", true).await;
    let role = app.create_role("Librarian", &["canViewItem"]).await;
    let user = app
        .create_user("ada@library.test", "EMP-001", "password123", vec![role.id])
        .await;

    app.permissions
        .revoke_permission(&admin_ctx(), user.id, "canViewItem")
        .await
        .unwrap();

    // The role keeps supplying the permission on every resolution, so
    // the suppression must be persistent.
    let reloaded = app.user(user.id).await;
    assert!(reloaded.permission_overrides.revoked.contains("canViewItem"));

    let view = app.permissions.get_effective_permissions(user.id).await.unwrap();
    assert_eq!(view.role_permissions, vec!["canViewItem"]);
    assert!(view.effective_permissions.is_empty());
}

#[tokio::test]
async fn revoke_wins_when_present_on_both_sides() {
    let app = TestApp::new().await;
    app.create_permission("canViewItem", true).await;
    app.create_permission("canEditItem", true).await;
    let role = app.create_role("Librarian", &["canViewItem"]).await;
    let user = app
        .create_user("ada@library.test", "EMP-001", "password123", vec![role.id])
        .await;

    app.permissions
        .update_permission_overrides(
            &admin_ctx(),
            user.id,
            vec!["canEditItem".to_string()],
            vec!["canViewItem".to_string()],
        )
        .await
        .unwrap();

    let view = app.permissions.get_effective_permissions(user.id).await.unwrap();
    assert_eq!(view.role_permissions, vec!["canViewItem"]);
    assert_eq!(view.granted_permissions, vec!["canEditItem"]);
    assert_eq!(view.revoked_permissions, vec!["canViewItem"]);
    // canViewItem suppressed despite the role; canEditItem present
    // despite no role.
    assert_eq!(view.effective_permissions, vec!["canEditItem"]);
}

#[tokio::test]
async fn bulk_update_rejects_all_when_any_name_is_invalid() {
    let app = TestApp::new().await;
    app.create_permission("canViewItem", true).await;
    app.create_permission("canArchiveItem", false).await;
    let user = app
        .create_user("ada@library.test", "EMP-001", "password123", Vec::new())
        .await;

    let err = app
        .permissions
        .update_permission_overrides(
            &admin_ctx(),
            user.id,
            vec!["canViewItem".to_string(), "canFlyToTheMoon".to_string()],
            vec!["canArchiveItem".to_string()],
        )
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::Validation);
    // One error, all offenders named.
    assert!(err.message.contains("canFlyToTheMoon"));
    assert!(err.message.contains("canArchiveItem"));
    assert!(!err.message.contains("canViewItem"));

    // Nothing was applied.
    assert!(app.user(user.id).await.permission_overrides.is_empty());
}

#[tokio::test]
async fn bulk_update_replaces_rather_than_merges() {
    let app = TestApp::new().await;
    app.create_permission("canViewItem", true).await;
    app.create_permission("canEditItem", true).await;
    app.create_permission("canExportReports", true).await;
    let user = app
        .create_user("ada@library.test", "EMP-001", "password123", Vec::new())
        .await;

    let ctx = admin_ctx();
    app.permissions
        .grant_permission(&ctx, user.id, "canViewItem")
        .await
        .unwrap();

    app.permissions
        .update_permission_overrides(
            &ctx,
            user.id,
            vec![
                "canExportReports".to_string(),
                "canExportReports".to_string(),
            ],
            vec!["canEditItem".to_string()],
        )
        .await
        .unwrap();

    let reloaded = app.user(user.id).await;
    // The earlier grant is gone: replace, not merge. Inputs dedupe.
    assert_eq!(reloaded.permission_overrides.granted.len(), 1);
    assert!(
        reloaded
            .permission_overrides
            .granted
            .contains("canExportReports")
    );
    assert_eq!(reloaded.permission_overrides.revoked.len(), 1);
}

#[tokio::test]
async fn override_mutations_record_the_acting_user() {
    let app = TestApp::new().await;
    app.create_permission("canViewItem", true).await;
    let user = app
        .create_user("ada@library.test", "EMP-001", "password123", Vec::new())
        .await;

    let ctx = admin_ctx();
    app.permissions
        .grant_permission(&ctx, user.id, "canViewItem")
        .await
        .unwrap();

    assert_eq!(app.user(user.id).await.updated_by, Some(ctx.actor_id));
}

#[tokio::test]
async fn operations_on_unknown_users_are_not_found() {
    let app = TestApp::new().await;
    app.create_permission("canViewItem", true).await;

    let err = app
        .permissions
        .grant_permission(&admin_ctx(), Uuid::new_v4(), "canViewItem")
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);

    let err = app
        .permissions
        .get_effective_permissions(Uuid::new_v4())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}
