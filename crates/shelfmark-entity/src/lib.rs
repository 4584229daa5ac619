//! # shelfmark-entity
//!
//! Domain entity models for the Shelfmark credential subsystem. Every
//! struct in this crate represents a database table row or a domain value
//! object. All entities derive `Debug`, `Clone`, `Serialize`,
//! `Deserialize`, and database entities additionally derive
//! `sqlx::FromRow`.

pub mod audit;
pub mod permission;
pub mod role;
pub mod token;
pub mod user;
