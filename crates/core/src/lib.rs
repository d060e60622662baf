//! `stockbook-core` — domain records and the client error taxonomy.
//!
//! This crate contains **pure domain** types (no transport or storage
//! concerns). The client crate composes these with the local store and the
//! remote gateway.

pub mod account;
pub mod error;
pub mod item;
pub mod request;

pub use account::{Account, AccountSummary, normalize_email};
pub use error::{Ack, ClientError, ClientResult};
pub use item::Item;
pub use request::StockRequest;
