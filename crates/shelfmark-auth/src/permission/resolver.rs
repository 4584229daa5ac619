//! Role-union plus override permission resolution.

use std::collections::HashSet;
use std::sync::Arc;

use shelfmark_core::result::AppResult;
use shelfmark_entity::user::User;
use shelfmark_store::traits::RoleStore;

/// Computes a user's permission sets from roles and overrides.
///
/// Resolution is a pure function of the current role assignments and
/// override sets: roles are re-read from the store on every call, so
/// there is no staleness window to reason about.
#[derive(Clone)]
pub struct PermissionResolver {
    /// Role lookup.
    roles: Arc<dyn RoleStore>,
}

impl std::fmt::Debug for PermissionResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PermissionResolver").finish()
    }
}

impl PermissionResolver {
    /// Creates a new resolver over the given role store.
    pub fn new(roles: Arc<dyn RoleStore>) -> Self {
        Self { roles }
    }

    /// Union of permission names across all of the user's roles.
    pub async fn resolve_role_permissions(&self, user: &User) -> AppResult<HashSet<String>> {
        let roles = self.roles.find_by_ids(&user.roles).await?;

        let mut permissions = HashSet::new();
        for role in roles {
            permissions.extend(role.permissions);
        }
        Ok(permissions)
    }

    /// The user's final resolved permission set.
    ///
    /// Role permissions, plus explicit grants, minus explicit
    /// revocations — in that order. Because removal happens last, a name
    /// present in both override sets resolves to excluded: revoke wins
    /// over grant, regardless of how the overrides were inserted.
    pub async fn resolve_effective_permissions(&self, user: &User) -> AppResult<HashSet<String>> {
        let mut permissions = self.resolve_role_permissions(user).await?;

        permissions.extend(user.permission_overrides.granted.iter().cloned());

        for revoked in &user.permission_overrides.revoked {
            permissions.remove(revoked);
        }

        Ok(permissions)
    }

    /// Whether any of the user's roles currently supplies the permission.
    pub async fn has_permission_through_role(
        &self,
        user: &User,
        permission_name: &str,
    ) -> AppResult<bool> {
        let roles = self.roles.find_by_ids(&user.roles).await?;
        Ok(roles.iter().any(|r| r.has_permission(permission_name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use shelfmark_entity::role::Role;
    use shelfmark_entity::user::PermissionOverrides;
    use shelfmark_store::memory::MemoryStore;
    use uuid::Uuid;

    fn role(name: &str, permissions: &[&str]) -> Role {
        Role {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: None,
            permissions: permissions.iter().map(|p| p.to_string()).collect(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn user(roles: Vec<Uuid>, granted: &[&str], revoked: &[&str]) -> User {
        User {
            id: Uuid::new_v4(),
            email: "staff@library.test".to_string(),
            employee_number: "EMP-007".to_string(),
            password_hash: "hash".to_string(),
            roles,
            permission_overrides: PermissionOverrides::from_lists(
                granted.iter().map(|p| p.to_string()),
                revoked.iter().map(|p| p.to_string()),
            ),
            reset_password_token: None,
            reset_password_expires: None,
            last_login: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            updated_by: None,
        }
    }

    async fn resolver_with_roles(roles: &[Role]) -> PermissionResolver {
        let store = Arc::new(MemoryStore::new());
        let role_store: Arc<dyn RoleStore> = store;
        for role in roles {
            role_store.create(role).await.unwrap();
        }
        PermissionResolver::new(role_store)
    }

    #[tokio::test]
    async fn role_permissions_are_unioned() {
        let r1 = role("Librarian", &["canViewItem", "canCheckoutItem"]);
        let r2 = role("Cataloguer", &["canViewItem", "canEditItem"]);
        let resolver = resolver_with_roles(&[r1.clone(), r2.clone()]).await;

        let user = user(vec![r1.id, r2.id], &[], &[]);
        let permissions = resolver.resolve_role_permissions(&user).await.unwrap();

        assert_eq!(permissions.len(), 3);
        assert!(permissions.contains("canViewItem"));
        assert!(permissions.contains("canCheckoutItem"));
        assert!(permissions.contains("canEditItem"));
    }

    #[tokio::test]
    async fn stale_role_references_are_skipped() {
        let r1 = role("Librarian", &["canViewItem"]);
        let resolver = resolver_with_roles(&[r1.clone()]).await;

        let user = user(vec![r1.id, Uuid::new_v4()], &[], &[]);
        let permissions = resolver.resolve_role_permissions(&user).await.unwrap();
        assert_eq!(permissions.len(), 1);
    }

    #[tokio::test]
    async fn grants_extend_and_revokes_suppress() {
        let r1 = role("Librarian", &["canViewItem"]);
        let resolver = resolver_with_roles(&[r1.clone()]).await;

        let user = user(vec![r1.id], &["canEditItem"], &["canViewItem"]);
        let effective = resolver.resolve_effective_permissions(&user).await.unwrap();

        // canViewItem suppressed despite the role grant; canEditItem
        // present despite no role supplying it.
        assert_eq!(effective, HashSet::from(["canEditItem".to_string()]));
    }

    #[tokio::test]
    async fn revoke_wins_when_name_is_on_both_sides() {
        let r1 = role("Librarian", &[]);
        let resolver = resolver_with_roles(&[r1.clone()]).await;

        let user = user(vec![r1.id], &["canExportReports"], &["canExportReports"]);
        let effective = resolver.resolve_effective_permissions(&user).await.unwrap();
        assert!(!effective.contains("canExportReports"));
    }

    #[tokio::test]
    async fn user_without_roles_or_overrides_resolves_empty() {
        let resolver = resolver_with_roles(&[]).await;
        let user = user(Vec::new(), &[], &[]);
        assert!(
            resolver
                .resolve_effective_permissions(&user)
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn role_derivation_check() {
        let r1 = role("Librarian", &["canViewItem"]);
        let resolver = resolver_with_roles(&[r1.clone()]).await;

        let user = user(vec![r1.id], &["canEditItem"], &[]);
        assert!(
            resolver
                .has_permission_through_role(&user, "canViewItem")
                .await
                .unwrap()
        );
        // An explicit grant is not role-derived.
        assert!(
            !resolver
                .has_permission_through_role(&user, "canEditItem")
                .await
                .unwrap()
        );
    }
}
