use crate::ports::{ContentStore, ExpirationStore};
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, interval_at};
use tracing::{debug, info, warn};

/// Evicts entries whose expiry has passed
/// Content is deleted before its expiry record is dropped; an entry that
/// fails partway keeps its record and is retried on the next sweep
#[derive(Clone)]
pub(crate) struct Sweeper {
    pub(crate) cache_name: String,
    pub(crate) expiration_store: Arc<dyn ExpirationStore>,
    pub(crate) content_store: Option<Arc<dyn ContentStore>>,
}

impl Sweeper {
    /// Run one sweep over every recorded expiry, returning how many entries
    /// were evicted. Per-entry failures are logged and left for the next
    /// sweep; they never abort the rest of the pass.
    pub(crate) async fn sweep(&self) -> usize {
        let entries = match self.expiration_store.get_all().await {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Skipping maintenance sweep, could not load expirations: {}", e);
                return 0;
            }
        };
        if entries.is_empty() {
            return 0;
        }

        let content = match &self.content_store {
            Some(store) => store.open(&self.cache_name).await,
            None => None,
        };

        let now = Utc::now();
        let mut evicted = 0;
        for (key, expires_at) in entries {
            if now <= expires_at {
                continue;
            }

            if let Some(handle) = &content {
                if let Err(e) = handle.delete(&key).await {
                    warn!(
                        "Failed to delete stale content for '{}', will retry next sweep: {}",
                        key, e
                    );
                    continue;
                }
            }

            if let Err(e) = self.expiration_store.remove(&key).await {
                warn!(
                    "Failed to drop expiry record for '{}', will retry next sweep: {}",
                    key, e
                );
                continue;
            }

            evicted += 1;
        }

        if evicted > 0 {
            info!("Maintenance sweep evicted {} stale entries", evicted);
        }
        evicted
    }
}

/// Recurring maintenance task owned by a response cache
/// Armed at construction; stopping is terminal, there is no re-arm
pub struct MaintenanceScheduler {
    shutdown_tx: watch::Sender<bool>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl MaintenanceScheduler {
    /// Arm the recurring sweep. The first tick lands one full interval from
    /// now; the construction-time sweep has already run by then.
    pub(crate) fn start(sweeper: Sweeper, every: Duration) -> Self {
        // tokio's interval panics on a zero period
        let every = every.max(Duration::from_millis(1));
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + every, every);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        sweeper.sweep().await;
                    }
                    _ = shutdown_rx.changed() => break,
                }
            }
        });

        Self {
            shutdown_tx,
            handle: Mutex::new(Some(handle)),
        }
    }

    /// Whether the recurring sweep is still armed
    pub fn is_active(&self) -> bool {
        !*self.shutdown_tx.borrow()
    }

    /// Signal the task to stop and wait for it to exit
    /// A sweep iteration already underway finishes first
    pub(crate) async fn stop(&self) {
        if self.shutdown_tx.send_replace(true) {
            return;
        }

        let handle = self.handle.lock().await.take();
        if let Some(handle) = handle {
            let _ = handle.await;
        }
        debug!("Maintenance scheduler stopped");
    }
}

impl Drop for MaintenanceScheduler {
    fn drop(&mut self) {
        // Caches dropped without a shutdown still release their task
        if let Some(handle) = self.handle.get_mut().take() {
            handle.abort();
        }
    }
}
