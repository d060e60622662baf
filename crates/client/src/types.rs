//! Wire types and per-call policy shared by the gateway and the operations.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use stockbook_core::{Ack, ClientError, ClientResult, Item, StockRequest};

/// Default deadline for synchronous remote calls.
pub const SYNC_TIMEOUT: Duration = Duration::from_secs(8);
/// Deadline for queued background deliveries.
pub const QUEUE_TIMEOUT: Duration = Duration::from_secs(10);

/// How a remote call's outcome is interpreted.
#[derive(Debug, Clone, Copy)]
pub struct CallPolicy {
    pub timeout: Duration,
    /// Treat an HTTP-ok but unparseable body as a successful mutation. The
    /// remote service is known to acknowledge some actions in plain text.
    pub assume_success_on_unparseable_body: bool,
}

impl CallPolicy {
    /// A parsed envelope is required.
    pub fn strict() -> Self {
        Self {
            timeout: SYNC_TIMEOUT,
            assume_success_on_unparseable_body: false,
        }
    }

    /// Unparseable bodies count as implicit success.
    pub fn lenient() -> Self {
        Self {
            timeout: SYNC_TIMEOUT,
            assume_success_on_unparseable_body: true,
        }
    }
}

/// Generic `{success, message}` envelope returned by query-encoded actions.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteEnvelope {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: String,
}

/// Account slice the remote mirror reports for login/findUser/getUsers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteUser {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

/// Reply shape of `login` and `findUser`.
#[derive(Debug, Clone, Deserialize)]
pub struct UserReply {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub user: Option<RemoteUser>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ItemsReply {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub items: Vec<Item>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UsersReply {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub users: Vec<RemoteUser>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RequestsReply {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub requests: Vec<StockRequest>,
}

/// Interpret a mutation reply body under the given policy.
///
/// `fallback_message` is the local wording used when the remote acknowledged
/// in a body we cannot parse.
pub(crate) fn parse_ack(body: &str, policy: CallPolicy, fallback_message: &str) -> ClientResult<Ack> {
    match serde_json::from_str::<RemoteEnvelope>(body) {
        Ok(envelope) => Ok(Ack::confirmed(envelope.success, envelope.message)),
        Err(err) if policy.assume_success_on_unparseable_body => {
            tracing::warn!("unparseable remote ack, assuming success: {err}");
            Ok(Ack::unverified(fallback_message))
        }
        Err(err) => Err(ClientError::parse(err.to_string())),
    }
}
