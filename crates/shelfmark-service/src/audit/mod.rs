//! Fire-and-forget audit notification.

pub mod notifier;

pub use notifier::AuditNotifier;
