//! Periodic purge of expired token rows.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{error, info};

use shelfmark_core::error::AppError;

use crate::traits::TokenStore;

/// Handles periodic removal of token rows past their expiry.
///
/// Purging is hygiene only — refresh validation always re-checks the
/// expiry instant itself, so a missed sweep never extends a token's
/// usable life.
#[derive(Clone)]
pub struct TokenSweeper {
    /// Token store to purge.
    tokens: Arc<dyn TokenStore>,
}

impl std::fmt::Debug for TokenSweeper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSweeper").finish()
    }
}

impl TokenSweeper {
    /// Creates a new token sweeper.
    pub fn new(tokens: Arc<dyn TokenStore>) -> Self {
        Self { tokens }
    }

    /// Runs one purge cycle. Returns the number of rows removed.
    pub async fn run_sweep(&self) -> Result<u64, AppError> {
        let purged = self.tokens.purge_expired(Utc::now()).await?;

        if purged > 0 {
            info!(purged = purged, "Purged expired token records");
        }

        Ok(purged)
    }

    /// Spawns the background sweep loop with the given interval.
    pub fn spawn(self, interval: Duration) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                if let Err(e) = self.run_sweep().await {
                    error!(error = %e, "Token sweep failed");
                }
            }
        })
    }
}
