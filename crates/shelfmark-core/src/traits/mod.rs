//! Collaborator ports consumed by the credential subsystem.
//!
//! Store ports live in `shelfmark-store` next to their implementations;
//! the traits here are for collaborators with no entity dependencies.

pub mod mailer;

pub use mailer::{OutboundMailer, ResetMail};
