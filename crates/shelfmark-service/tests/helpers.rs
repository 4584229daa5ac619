//! Shared test helpers for the service integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use tokio::sync::Mutex;
use uuid::Uuid;

use shelfmark_auth::password::PasswordHasher;
use shelfmark_auth::permission::PermissionResolver;
use shelfmark_auth::reset::PasswordResetFlow;
use shelfmark_auth::token::TokenLifecycle;
use shelfmark_core::config::auth::AuthConfig;
use shelfmark_core::config::mail::MailConfig;
use shelfmark_core::error::AppError;
use shelfmark_core::result::AppResult;
use shelfmark_core::traits::mailer::{OutboundMailer, ResetMail};
use shelfmark_entity::permission::{Permission, PermissionCategory};
use shelfmark_entity::role::Role;
use shelfmark_entity::user::{PermissionOverrides, User};
use shelfmark_service::audit::AuditNotifier;
use shelfmark_service::auth::AuthService;
use shelfmark_service::permission::PermissionService;
use shelfmark_store::memory::MemoryStore;
use shelfmark_store::traits::{PermissionStore, RoleStore, TokenStore, UserStore};

/// A strong password that satisfies the reset password policy.
pub const STRONG_PASSWORD: &str = "Quartz#Lantern9!Meadow";

/// Mailer that records every mail it is asked to deliver.
#[derive(Debug, Clone, Default)]
pub struct CapturingMailer {
    sent: Arc<Mutex<Vec<ResetMail>>>,
}

impl CapturingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn sent(&self) -> Vec<ResetMail> {
        self.sent.lock().await.clone()
    }
}

#[async_trait]
impl OutboundMailer for CapturingMailer {
    async fn send_password_reset(&self, mail: &ResetMail) -> AppResult<()> {
        self.sent.lock().await.push(mail.clone());
        Ok(())
    }
}

/// Mailer that always fails delivery.
#[derive(Debug, Clone, Default)]
pub struct FailingMailer;

#[async_trait]
impl OutboundMailer for FailingMailer {
    async fn send_password_reset(&self, _mail: &ResetMail) -> AppResult<()> {
        Err(AppError::mail("SMTP relay unreachable"))
    }
}

/// Test application wiring every service over the in-memory store.
pub struct TestApp {
    pub store: Arc<MemoryStore>,
    pub config: AuthConfig,
    pub lifecycle: TokenLifecycle,
    pub resolver: PermissionResolver,
    pub auth: AuthService,
    pub permissions: PermissionService,
    pub hasher: PasswordHasher,
}

impl TestApp {
    /// Non-production app with a capturing mailer.
    pub async fn new() -> Self {
        Self::build(Arc::new(CapturingMailer::new()), false)
    }

    /// App with an explicit mailer and production flag.
    pub fn with_mailer(mailer: Arc<dyn OutboundMailer>, production: bool) -> Self {
        Self::build(mailer, production)
    }

    fn build(mailer: Arc<dyn OutboundMailer>, production: bool) -> Self {
        init_tracing();

        let store = Arc::new(MemoryStore::new());
        let config = AuthConfig {
            jwt_secret: "integration-test-secret".to_string(),
            ..AuthConfig::default()
        };

        let users: Arc<dyn UserStore> = store.clone();
        let tokens: Arc<dyn TokenStore> = store.clone();
        let roles: Arc<dyn RoleStore> = store.clone();
        let permission_store: Arc<dyn PermissionStore> = store.clone();

        let lifecycle = TokenLifecycle::new(&config, tokens);
        let resolver = PermissionResolver::new(roles);
        let audit = AuditNotifier::spawn(store.clone());

        let reset = PasswordResetFlow::new(
            users.clone(),
            mailer,
            &config,
            MailConfig::default(),
            production,
        );

        let auth = AuthService::new(users.clone(), lifecycle.clone(), reset, audit.clone());
        let permissions =
            PermissionService::new(users, permission_store, resolver.clone(), audit);

        Self {
            store,
            config,
            lifecycle,
            resolver,
            auth,
            permissions,
            hasher: PasswordHasher::new(),
        }
    }

    /// Creates a role with the given permission names.
    pub async fn create_role(&self, name: &str, permissions: &[&str]) -> Role {
        let role = Role {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: None,
            permissions: permissions.iter().map(|p| p.to_string()).collect(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let roles: Arc<dyn RoleStore> = self.store.clone();
        roles.create(&role).await.expect("Failed to create role");
        role
    }

    /// Creates a catalog permission.
    pub async fn create_permission(&self, name: &str, active: bool) -> Permission {
        let mut permission =
            Permission::new(name, format!("{name} test permission"), PermissionCategory::Catalog);
        permission.is_active = active;
        let store: Arc<dyn PermissionStore> = self.store.clone();
        store
            .create(&permission)
            .await
            .expect("Failed to create permission");
        permission
    }

    /// Creates a user with the given credentials and role references.
    pub async fn create_user(
        &self,
        email: &str,
        employee_number: &str,
        password: &str,
        roles: Vec<Uuid>,
    ) -> User {
        let user = User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            employee_number: employee_number.to_string(),
            password_hash: self
                .hasher
                .hash_password(password)
                .expect("Failed to hash password"),
            roles,
            permission_overrides: PermissionOverrides::new(),
            reset_password_token: None,
            reset_password_expires: None,
            last_login: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            updated_by: None,
        };
        let users: Arc<dyn UserStore> = self.store.clone();
        users.create(&user).await.expect("Failed to create user");
        user
    }

    /// Reloads a user from the store.
    pub async fn user(&self, id: Uuid) -> User {
        let users: Arc<dyn UserStore> = self.store.clone();
        users
            .find_by_id(id)
            .await
            .expect("Store error")
            .expect("User not found")
    }

    /// Pins a reset token onto a user with an explicit expiry, bypassing
    /// the request flow. Returns the raw token to present.
    pub async fn plant_reset_token(&self, user_id: Uuid, expires: DateTime<Utc>) -> String {
        let raw = Uuid::new_v4().simple().to_string();
        let digest = hex(&Sha256::digest(raw.as_bytes()));
        let users: Arc<dyn UserStore> = self.store.clone();
        users
            .set_reset_token(user_id, &digest, expires)
            .await
            .expect("Failed to set reset token");
        raw
    }
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Installs a test subscriber once; repeated calls are no-ops.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}
