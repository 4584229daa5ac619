//! Request context carrying the acting user and client address.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Context for the current authenticated request.
///
/// Extracted by middleware and passed into service methods so that
/// every mutation knows *who* is acting and from *where*.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The acting user's ID.
    pub actor_id: Uuid,
    /// IP address of the request origin.
    pub client_ip: String,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(actor_id: Uuid, client_ip: impl Into<String>) -> Self {
        Self {
            actor_id,
            client_ip: client_ip.into(),
        }
    }
}
