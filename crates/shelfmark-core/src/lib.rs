//! # shelfmark-core
//!
//! Core crate for the Shelfmark authorization subsystem. Contains the
//! unified error system, configuration schemas, and the ports (store and
//! collaborator traits) every other crate builds on.
//!
//! This crate has **no** internal dependencies on other Shelfmark crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;

pub use error::AppError;
pub use result::AppResult;
