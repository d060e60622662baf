//! `stockbook-client` — offline-resilient client for a spreadsheet-backed
//! stock service.
//!
//! The client keeps a durable local store as the source of truth, mirrors
//! mutations to a single configured remote endpoint on a best-effort basis,
//! and reconciles failed mirror writes through a persisted retry queue after
//! reconnection. The application stays usable with the remote slow,
//! unreachable or unconfigured.

pub mod config;
pub mod gateway;
pub mod hooks;
pub mod ops;
pub mod queue;
pub mod store;
pub mod types;

pub use config::{PLACEHOLDER_URL, RemoteConfig};
pub use gateway::{Dispatched, RemoteGateway, RemoteOutcome};
pub use hooks::{NoopHooks, SharedHooks, UiHooks};
pub use ops::{Registration, StockClient};
pub use queue::{MAX_ATTEMPTS, SyncAction, SyncEntry, SyncQueueService};
pub use store::LocalStore;
pub use types::CallPolicy;

pub use stockbook_core::{
    Account, AccountSummary, Ack, ClientError, ClientResult, Item, StockRequest,
};
