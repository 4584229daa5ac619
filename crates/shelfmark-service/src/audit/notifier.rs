//! Asynchronous audit log notifier.
//!
//! Audit writes must never block or fail the operation that triggered
//! them. Entries go onto an unbounded channel; a background task drains
//! it into the audit store, logging and swallowing sink errors at that
//! boundary.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use shelfmark_entity::audit::AuditLogEntry;
use shelfmark_store::traits::AuditStore;

/// Hands audit entries to a background writer.
#[derive(Clone)]
pub struct AuditNotifier {
    /// Channel into the drain task.
    tx: mpsc::UnboundedSender<AuditLogEntry>,
}

impl std::fmt::Debug for AuditNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuditNotifier").finish()
    }
}

impl AuditNotifier {
    /// Spawns the drain task over the given audit store and returns the
    /// notifier handle.
    pub fn spawn(store: Arc<dyn AuditStore>) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<AuditLogEntry>();

        tokio::spawn(async move {
            while let Some(entry) = rx.recv().await {
                if let Err(e) = store.append(&entry).await {
                    warn!(
                        action = %entry.action,
                        actor_id = %entry.actor_id,
                        error = %e,
                        "Failed to write audit entry"
                    );
                }
            }
        });

        Self { tx }
    }

    /// Enqueues an audit entry. Never blocks and never fails the caller.
    pub fn notify(&self, entry: AuditLogEntry) {
        if self.tx.send(entry).is_err() {
            debug!("Audit channel closed; entry dropped");
        }
    }
}
