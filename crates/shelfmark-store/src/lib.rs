//! # shelfmark-store
//!
//! The Credential Store: connection management, the store ports every
//! engine consumes, concrete PostgreSQL repositories, an in-memory
//! backend for tests and single-node development, and the background
//! sweeper that purges expired token rows.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod sweeper;
pub mod traits;

pub use connection::DatabasePool;
pub use memory::MemoryStore;
pub use sweeper::TokenSweeper;
pub use traits::{AuditStore, PermissionStore, RoleStore, TokenStore, UserStore};
