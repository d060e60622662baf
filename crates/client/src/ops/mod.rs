//! Data-access operations: one method per entity mutation or query.
//!
//! Each operation composes the local store, the remote gateway and the sync
//! queue under the dual-write or read-through policy of its entity family:
//!
//! - accounts: local write-through with a best-effort mirror (`register`),
//!   local-first reads (`login`), queued delivery (`reset_password`)
//! - inventory, requests: remote-only, no local cache
//! - orders: fire-and-forget opaque deletes
//!
//! Remote failures never escape as panics; every operation returns a
//! structured [`ClientError`] and local-first paths keep working with the
//! remote fully unreachable.

mod accounts;
mod inventory;
mod orders;
mod requests;

pub use accounts::Registration;

use std::sync::Arc;

use stockbook_core::{ClientError, ClientResult};

use crate::config::RemoteConfig;
use crate::gateway::RemoteGateway;
use crate::hooks::{NoopHooks, SharedHooks};
use crate::queue::SyncQueueService;
use crate::store::LocalStore;

/// Client facade over the store, gateway and queue.
///
/// Cheap to clone; all clones share the same store and queue service.
#[derive(Clone)]
pub struct StockClient {
    pub(crate) store: LocalStore,
    pub(crate) gateway: RemoteGateway,
    pub(crate) queue: Arc<SyncQueueService>,
    pub(crate) hooks: SharedHooks,
}

impl StockClient {
    /// Wire up a client and schedule the startup queue flush.
    ///
    /// Must be called within a Tokio runtime (the flush is spawned).
    pub fn new(store: LocalStore, config: RemoteConfig, hooks: SharedHooks) -> Self {
        let gateway = RemoteGateway::new(config);
        let queue = SyncQueueService::new(store.clone(), gateway.clone(), Arc::clone(&hooks));
        queue.spawn_startup_flush();
        Self {
            store,
            gateway,
            queue,
            hooks,
        }
    }

    /// Headless client over an in-memory store.
    pub async fn in_memory(config: RemoteConfig) -> anyhow::Result<Self> {
        Ok(Self::new(
            LocalStore::in_memory().await?,
            config,
            Arc::new(NoopHooks),
        ))
    }

    /// The shared queue service (drain trigger, pending inspection).
    pub fn queue(&self) -> &Arc<SyncQueueService> {
        &self.queue
    }

    /// Gate for every remote-touching operation: without a real endpoint the
    /// operation returns `Unconfigured` and issues zero network calls.
    pub(crate) fn require_configured(&self) -> ClientResult<()> {
        if self.gateway.is_configured() {
            Ok(())
        } else {
            Err(ClientError::Unconfigured)
        }
    }
}
