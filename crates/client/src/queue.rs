//! Durable retry queue for remote mirror deliveries.
//!
//! The queue exists so `resetPassword` and `register` mirror writes survive
//! offline and flaky conditions without blocking the caller or losing the
//! local write. Entries live in the `syncQueue` collection of the local
//! store; a single-flight drain pass delivers them through the gateway with
//! bounded per-entry retry.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use stockbook_core::ClientError;
use uuid::Uuid;

use crate::gateway::{RemoteGateway, RemoteOutcome};
use crate::hooks::SharedHooks;
use crate::store::{LocalStore, SYNC_QUEUE};
use crate::types::QUEUE_TIMEOUT;

/// An entry is dropped once `attempts` exceeds this bound.
pub const MAX_ATTEMPTS: u32 = 3;

/// Delay before the automatic leftover flush after startup.
const STARTUP_FLUSH_DELAY: Duration = Duration::from_secs(1);

/// Deferred mirror mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum SyncAction {
    /// Query-encoded password reset.
    #[serde(rename_all = "camelCase")]
    ResetPassword { email: String, new_password: String },
    /// Opaque POST of the original registration payload.
    Register { payload: serde_json::Value },
    /// Forward-compatibility escape valve: entries written by a newer client
    /// are dropped unconditionally, not treated as errors.
    #[serde(other)]
    Unknown,
}

/// One persisted queue entry.
///
/// `attempts` starts at 0 and is incremented only on delivery failure. An
/// entry leaves the queue exactly when delivery succeeds or `attempts`
/// exceeds [`MAX_ATTEMPTS`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncEntry {
    pub id: Uuid,
    #[serde(flatten)]
    pub action: SyncAction,
    pub attempts: u32,
    pub ts: i64,
}

enum Delivery {
    Delivered,
    Failed,
    DropUnknown,
}

/// Owner of the persisted queue and the process-wide drain flag.
pub struct SyncQueueService {
    store: LocalStore,
    gateway: RemoteGateway,
    hooks: SharedHooks,
    draining: AtomicBool,
}

impl SyncQueueService {
    pub fn new(store: LocalStore, gateway: RemoteGateway, hooks: SharedHooks) -> Arc<Self> {
        Arc::new(Self {
            store,
            gateway,
            hooks,
            draining: AtomicBool::new(false),
        })
    }

    /// Append an entry with `attempts = 0`, persist the queue, and trigger an
    /// asynchronous drain.
    ///
    /// Delivery is not guaranteed: a drain pass re-persists the whole queue
    /// when it finishes, so an entry persisted here while a pass is already
    /// in flight can be overwritten by that pass's final write and never
    /// delivered. The caller must not assume the entry is drained
    /// immediately.
    pub async fn enqueue(self: &Arc<Self>, action: SyncAction) -> anyhow::Result<()> {
        let mut queue: Vec<SyncEntry> = self.store.get(SYNC_QUEUE).await;
        queue.push(SyncEntry {
            id: Uuid::now_v7(),
            action,
            attempts: 0,
            ts: Utc::now().timestamp_millis(),
        });
        self.store.put(SYNC_QUEUE, &queue).await?;

        self.hooks.toast("Change will be saved in the background");

        let service = Arc::clone(self);
        tokio::spawn(async move {
            service.process().await;
        });
        Ok(())
    }

    /// Schedule one drain shortly after startup to flush anything left over
    /// from a previous session. Must be called within a Tokio runtime.
    pub fn spawn_startup_flush(self: &Arc<Self>) {
        let service = Arc::clone(self);
        tokio::spawn(async move {
            tokio::time::sleep(STARTUP_FLUSH_DELAY).await;
            service.process().await;
        });
    }

    /// Current persisted entries, in insertion order.
    pub async fn pending(&self) -> Vec<SyncEntry> {
        self.store.get(SYNC_QUEUE).await
    }

    /// Drain the persisted queue once.
    ///
    /// Single-flight process-wide: a trigger while a pass is running is a
    /// silent no-op. The pass sees the entries persisted before its queue
    /// read, and its final re-persist overwrites anything enqueued mid-pass
    /// (last write wins). Entries are visited in reverse insertion order and
    /// the surviving queue is rebuilt and re-persisted once at the end of
    /// the pass.
    pub async fn process(&self) {
        if self
            .draining
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::debug!("drain already in flight, skipping");
            return;
        }

        let queue: Vec<SyncEntry> = self.store.get(SYNC_QUEUE).await;
        if !queue.is_empty() {
            tracing::debug!(entries = queue.len(), "draining sync queue");
            let mut kept: Vec<SyncEntry> = Vec::with_capacity(queue.len());

            for mut entry in queue.into_iter().rev() {
                match self.deliver(&entry).await {
                    Delivery::Delivered => {
                        tracing::info!(id = %entry.id, "sync entry delivered");
                        self.hooks.toast("Background sync succeeded");
                    }
                    Delivery::DropUnknown => {
                        tracing::warn!(id = %entry.id, "unknown sync action, dropping");
                    }
                    Delivery::Failed => {
                        entry.attempts += 1;
                        if entry.attempts > MAX_ATTEMPTS {
                            tracing::warn!(
                                id = %entry.id,
                                attempts = entry.attempts,
                                "dropping sync entry after retry limit"
                            );
                            self.hooks
                                .toast(&format!("Sync failed: {}", ClientError::RetryExhausted));
                        } else {
                            kept.push(entry);
                        }
                    }
                }
            }

            // Restore insertion order for the persisted list.
            kept.reverse();
            if let Err(err) = self.store.put(SYNC_QUEUE, &kept).await {
                tracing::error!("failed to re-persist sync queue: {err:?}");
            }
        }

        self.draining.store(false, Ordering::Release);
    }

    async fn deliver(&self, entry: &SyncEntry) -> Delivery {
        match &entry.action {
            SyncAction::ResetPassword {
                email,
                new_password,
            } => {
                let outcome = self
                    .gateway
                    .invoke(
                        "resetPassword",
                        &[("email", email), ("newPassword", new_password)],
                        QUEUE_TIMEOUT,
                    )
                    .await;
                match outcome {
                    RemoteOutcome::Body(_) => Delivery::Delivered,
                    other => {
                        tracing::warn!(id = %entry.id, ?other, "resetPassword delivery failed");
                        Delivery::Failed
                    }
                }
            }
            SyncAction::Register { payload } => {
                match self.gateway.dispatch_opaque(payload, QUEUE_TIMEOUT).await {
                    Ok(_) => Delivery::Delivered,
                    Err(err) => {
                        tracing::warn!(id = %entry.id, "register delivery failed: {err}");
                        Delivery::Failed
                    }
                }
            }
            SyncAction::Unknown => Delivery::DropUnknown,
        }
    }
}
