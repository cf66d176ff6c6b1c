//! # Readiness
//!
//! A one-way "collaborator became available" signal. Waiters are woken when
//! the wallet SDK finishes loading instead of polling on an interval.
//!
//! ```text
//!   Readiness::new() ── false ──────────────── mark_available() ── true
//!                        │                           │
//!   until_available() ───┴── parked ─────────────────┴──► returns
//!   until_available() (called later) ──────────────────► returns at once
//! ```

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// Shared availability flag. Cloning shares the same flag.
#[derive(Debug, Clone)]
pub struct Readiness {
    tx: Arc<watch::Sender<bool>>,
}

impl Readiness {
    /// Not yet available.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Readiness { tx: Arc::new(tx) }
    }

    /// Already available.
    pub fn available() -> Self {
        let readiness = Self::new();
        readiness.mark_available();
        readiness
    }

    /// Wakes every waiter. Idempotent.
    pub fn mark_available(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_available(&self) -> bool {
        *self.tx.borrow()
    }

    /// Resolves once the flag is set; immediately if it already is.
    pub async fn until_available(&self) {
        let mut rx = self.tx.subscribe();
        // The sender lives in self, so the channel cannot close here
        let _ = rx.wait_for(|ready| *ready).await;
    }

    /// Like [`Readiness::until_available`] but gives up after `limit`.
    ///
    /// ## Returns
    /// `true` if available within the limit.
    pub async fn until_available_within(&self, limit: Duration) -> bool {
        tokio::time::timeout(limit, self.until_available()).await.is_ok()
    }
}

impl Default for Readiness {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_available_resolves_immediately() {
        let readiness = Readiness::available();
        assert!(readiness.is_available());
        readiness.until_available().await;
    }

    #[tokio::test]
    async fn test_waiter_is_woken() {
        let readiness = Readiness::new();
        let waiter = {
            let readiness = readiness.clone();
            tokio::spawn(async move { readiness.until_available().await })
        };

        tokio::task::yield_now().await;
        assert!(!waiter.is_finished());

        readiness.mark_available();
        waiter.await.unwrap();
        assert!(readiness.is_available());
    }

    #[tokio::test(start_paused = true)]
    async fn test_bounded_wait_times_out() {
        let readiness = Readiness::new();
        assert!(!readiness.until_available_within(Duration::from_secs(5)).await);

        readiness.mark_available();
        assert!(readiness.until_available_within(Duration::from_secs(5)).await);
    }
}
