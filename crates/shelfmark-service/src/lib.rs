//! # shelfmark-service
//!
//! Boundary services consumed by the platform's route handlers: the
//! login/logout and password reset surface (`AuthService`), permission
//! override management (`PermissionService`), the fire-and-forget audit
//! notifier, and a non-production mailer.

pub mod audit;
pub mod auth;
pub mod context;
pub mod mail;
pub mod permission;

pub use audit::AuditNotifier;
pub use auth::{AuthService, LoginResult, UserSummary};
pub use context::RequestContext;
pub use mail::LoggingMailer;
pub use permission::{EffectivePermissionsView, PermissionService};
