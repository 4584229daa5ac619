//! User entity and permission override value types.

pub mod model;
pub mod overrides;

pub use model::User;
pub use overrides::PermissionOverrides;
