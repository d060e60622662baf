//! Stock requests raised by teachers, tracked remotely only.

use serde::{Deserialize, Serialize};

/// A stock request row as reported by the remote mirror.
///
/// `status` and `reason` are free-form strings; the remote service owns the
/// vocabulary and this client passes them through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockRequest {
    pub teacher_email: String,
    pub teacher_name: String,
    pub item: String,
    #[serde(default)]
    pub qty: i64,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub timestamp: String,
}
