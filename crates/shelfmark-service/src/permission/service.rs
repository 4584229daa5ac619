//! Grant, revoke, and bulk override operations plus the diagnostic
//! effective-permissions view.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use shelfmark_auth::permission::PermissionResolver;
use shelfmark_core::error::AppError;
use shelfmark_core::result::AppResult;
use shelfmark_entity::audit::AuditLogEntry;
use shelfmark_entity::user::{PermissionOverrides, User};
use shelfmark_store::traits::{PermissionStore, UserStore};

use crate::audit::AuditNotifier;
use crate::context::RequestContext;

/// Read-only diagnostic view of every layer of a user's permissions.
///
/// All four sets are sorted for stable output in admin screens.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct EffectivePermissionsView {
    /// Union of the user's role permissions.
    pub role_permissions: Vec<String>,
    /// Explicit per-user grants.
    pub granted_permissions: Vec<String>,
    /// Explicit per-user revocations.
    pub revoked_permissions: Vec<String>,
    /// The final resolved set.
    pub effective_permissions: Vec<String>,
}

/// Manages per-user permission overrides.
#[derive(Clone)]
pub struct PermissionService {
    /// User persistence.
    users: Arc<dyn UserStore>,
    /// Permission catalog.
    permissions: Arc<dyn PermissionStore>,
    /// Resolution engine.
    resolver: PermissionResolver,
    /// Fire-and-forget audit notification.
    audit: AuditNotifier,
}

impl std::fmt::Debug for PermissionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PermissionService").finish()
    }
}

impl PermissionService {
    /// Creates a new permission service.
    pub fn new(
        users: Arc<dyn UserStore>,
        permissions: Arc<dyn PermissionStore>,
        resolver: PermissionResolver,
        audit: AuditNotifier,
    ) -> Self {
        Self {
            users,
            permissions,
            resolver,
            audit,
        }
    }

    /// Grants a permission to a user as an explicit override.
    ///
    /// The name must be an active catalog entry. Granting also clears a
    /// prior explicit revoke of the same name.
    pub async fn grant_permission(
        &self,
        ctx: &RequestContext,
        user_id: Uuid,
        permission_name: &str,
    ) -> AppResult<()> {
        let user = self.find_user(user_id).await?;

        let permission = self.permissions.find_by_name(permission_name).await?;
        if !permission.is_some_and(|p| p.is_active) {
            return Err(AppError::validation(format!(
                "Invalid permission: {permission_name}"
            )));
        }

        let mut overrides = user.permission_overrides.clone();
        overrides.granted.insert(permission_name.to_string());
        overrides.revoked.remove(permission_name);

        self.users
            .update_permission_overrides(user.id, &overrides, ctx.actor_id)
            .await?;

        self.audit.notify(AuditLogEntry::new(
            ctx.actor_id,
            "permission.grant",
            "user",
            Some(user.id),
            Some(serde_json::json!({ "permission": permission_name })),
            Some(ctx.client_ip.clone()),
        ));

        info!(
            actor_id = %ctx.actor_id,
            user_id = %user.id,
            permission = %permission_name,
            "Permission granted"
        );

        Ok(())
    }

    /// Revokes a permission from a user.
    ///
    /// An explicit grant is always removed. A revocation entry is
    /// recorded **only** when the permission is currently supplied by
    /// one of the user's roles: a withdrawn pure grant leaves no
    /// residue, while a role-derived permission must be remembered as
    /// suppressed or the role would re-supply it on the next
    /// resolution. The two cases resolve identically today but require
    /// different persistent states.
    pub async fn revoke_permission(
        &self,
        ctx: &RequestContext,
        user_id: Uuid,
        permission_name: &str,
    ) -> AppResult<()> {
        let user = self.find_user(user_id).await?;

        let through_role = self
            .resolver
            .has_permission_through_role(&user, permission_name)
            .await?;

        let mut overrides = user.permission_overrides.clone();
        overrides.granted.remove(permission_name);
        if through_role {
            overrides.revoked.insert(permission_name.to_string());
        }

        self.users
            .update_permission_overrides(user.id, &overrides, ctx.actor_id)
            .await?;

        self.audit.notify(AuditLogEntry::new(
            ctx.actor_id,
            "permission.revoke",
            "user",
            Some(user.id),
            Some(serde_json::json!({
                "permission": permission_name,
                "suppressed_role_permission": through_role,
            })),
            Some(ctx.client_ip.clone()),
        ));

        info!(
            actor_id = %ctx.actor_id,
            user_id = %user.id,
            permission = %permission_name,
            through_role = through_role,
            "Permission revoked"
        );

        Ok(())
    }

    /// Replaces a user's overrides wholesale with the given lists.
    ///
    /// Every requested name is validated against the active catalog
    /// first; if any are unknown or inactive, nothing is applied and a
    /// single error names all offenders. Unlike grant/revoke, this is a
    /// replace, not a merge.
    pub async fn update_permission_overrides(
        &self,
        ctx: &RequestContext,
        user_id: Uuid,
        granted: Vec<String>,
        revoked: Vec<String>,
    ) -> AppResult<()> {
        let user = self.find_user(user_id).await?;

        let active = self.permissions.find_active_names().await?;
        let mut invalid: Vec<String> = granted
            .iter()
            .chain(revoked.iter())
            .filter(|name| !active.contains(*name))
            .cloned()
            .collect();
        invalid.sort();
        invalid.dedup();

        if !invalid.is_empty() {
            return Err(AppError::validation(format!(
                "Invalid or inactive permissions: {}",
                invalid.join(", ")
            )));
        }

        let overrides = PermissionOverrides::from_lists(granted, revoked);

        self.users
            .update_permission_overrides(user.id, &overrides, ctx.actor_id)
            .await?;

        self.audit.notify(AuditLogEntry::new(
            ctx.actor_id,
            "permission.bulk_update",
            "user",
            Some(user.id),
            Some(serde_json::json!({
                "granted": sorted(&overrides.granted),
                "revoked": sorted(&overrides.revoked),
            })),
            Some(ctx.client_ip.clone()),
        ));

        info!(
            actor_id = %ctx.actor_id,
            user_id = %user.id,
            granted = overrides.granted.len(),
            revoked = overrides.revoked.len(),
            "Permission overrides replaced"
        );

        Ok(())
    }

    /// Returns all four permission sets for a user, for admin screens.
    pub async fn get_effective_permissions(
        &self,
        user_id: Uuid,
    ) -> AppResult<EffectivePermissionsView> {
        let user = self.find_user(user_id).await?;

        let role_permissions = self.resolver.resolve_role_permissions(&user).await?;
        let effective = self.resolver.resolve_effective_permissions(&user).await?;

        Ok(EffectivePermissionsView {
            role_permissions: sorted(&role_permissions),
            granted_permissions: sorted(&user.permission_overrides.granted),
            revoked_permissions: sorted(&user.permission_overrides.revoked),
            effective_permissions: sorted(&effective),
        })
    }

    async fn find_user(&self, user_id: Uuid) -> AppResult<User> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }
}

/// Sorted copy of a name set.
fn sorted(names: &HashSet<String>) -> Vec<String> {
    let mut list: Vec<String> = names.iter().cloned().collect();
    list.sort();
    list
}
