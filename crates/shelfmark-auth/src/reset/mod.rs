//! One-time password reset tokens.

pub mod flow;

pub use flow::{PasswordResetFlow, ResetRequestOutcome, RESET_TOKEN_TTL_MINUTES};
