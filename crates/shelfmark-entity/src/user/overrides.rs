//! Per-user permission override sets.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Per-user exceptions layered on top of role-derived permissions.
///
/// Both sides are true sets: duplicates cannot exist. The same name may
/// legally appear in both `granted` and `revoked` at once; resolution
/// applies revocations after grants, so revoke wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionOverrides {
    /// Permission names explicitly granted to this user.
    #[serde(default)]
    pub granted: HashSet<String>,
    /// Permission names explicitly revoked from this user.
    #[serde(default)]
    pub revoked: HashSet<String>,
}

impl PermissionOverrides {
    /// Creates an empty override pair.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a deduplicated override pair from raw name lists.
    pub fn from_lists<I, J>(granted: I, revoked: J) -> Self
    where
        I: IntoIterator<Item = String>,
        J: IntoIterator<Item = String>,
    {
        Self {
            granted: granted.into_iter().collect(),
            revoked: revoked.into_iter().collect(),
        }
    }

    /// Whether neither side holds any entries.
    pub fn is_empty(&self) -> bool {
        self.granted.is_empty() && self.revoked.is_empty()
    }
}
