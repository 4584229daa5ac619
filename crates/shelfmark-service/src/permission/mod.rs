//! Permission override management service.

pub mod service;

pub use service::{EffectivePermissionsView, PermissionService};
