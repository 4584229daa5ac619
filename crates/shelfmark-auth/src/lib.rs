//! # shelfmark-auth
//!
//! The credential engines of the Shelfmark platform: access/refresh
//! token lifecycle, effective-permission resolution, and the one-time
//! password reset flow.
//!
//! ## Modules
//!
//! - `token` — signed access tokens and the opaque refresh token lifecycle
//! - `permission` — role-union plus override resolution
//! - `reset` — one-time password reset tokens
//! - `password` — Argon2id hashing and reset-password policy

mod encoding;
pub mod password;
pub mod permission;
pub mod reset;
pub mod token;

pub use password::{PasswordHasher, PasswordValidator};
pub use permission::PermissionResolver;
pub use reset::{PasswordResetFlow, ResetRequestOutcome};
pub use token::{AccessClaims, AccessTokenDecoder, AccessTokenEncoder, TokenLifecycle, TokenPair};
