//! Authentication boundary service.

pub mod service;

pub use service::{AuthService, LoginResult, UserSummary};
