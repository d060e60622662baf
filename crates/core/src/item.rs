//! Inventory items mirrored from the remote service.
//!
//! Items are read-through only; the client keeps no local copy.

use serde::{Deserialize, Serialize};

/// A stock item as reported by the remote mirror. `name` is the unique key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    #[serde(default)]
    pub stock: i64,
}
