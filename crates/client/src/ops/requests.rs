//! Stock requests raised by teachers. Remote-only, no local cache.

use stockbook_core::{Ack, ClientError, ClientResult, StockRequest};

use crate::hooks::LoadingGuard;
use crate::types::{CallPolicy, RequestsReply, SYNC_TIMEOUT, parse_ack};

use super::StockClient;

impl StockClient {
    /// Raise a stock request. Implicit success on an unparseable body.
    pub async fn request_stock(
        &self,
        teacher_email: &str,
        teacher_name: &str,
        item: &str,
        qty: i64,
    ) -> ClientResult<Ack> {
        self.require_configured()?;
        let _loading = LoadingGuard::start(&self.hooks, "Sending request...");

        let qty = qty.to_string();
        let policy = CallPolicy::lenient();
        let body = self
            .gateway
            .invoke(
                "requestStock",
                &[
                    ("teacherEmail", teacher_email),
                    ("teacherName", teacher_name),
                    ("item", item),
                    ("qty", &qty),
                ],
                policy.timeout,
            )
            .await
            .into_body()?;
        parse_ack(&body, policy, "request sent")
    }

    /// Read-through listing of every pending teacher request.
    pub async fn get_teacher_stock_requests(&self) -> ClientResult<Vec<StockRequest>> {
        self.require_configured()?;
        let _loading = LoadingGuard::start(&self.hooks, "Loading requests...");

        let body = self
            .gateway
            .invoke("getTeacherStockRequests", &[], SYNC_TIMEOUT)
            .await
            .into_body()?;
        let reply: RequestsReply =
            serde_json::from_str(&body).map_err(|err| ClientError::parse(err.to_string()))?;
        if reply.success {
            Ok(reply.requests)
        } else {
            Err(ClientError::parse(reply.message))
        }
    }

    /// Approve/reject a request. Implicit success on an unparseable body.
    pub async fn update_request_status(
        &self,
        email: &str,
        item: &str,
        status: &str,
        reason: &str,
    ) -> ClientResult<Ack> {
        self.require_configured()?;
        let _loading = LoadingGuard::start(&self.hooks, "Updating status...");

        let policy = CallPolicy::lenient();
        let body = self
            .gateway
            .invoke(
                "updateRequestStatus",
                &[
                    ("email", email),
                    ("item", item),
                    ("status", status),
                    ("reason", reason),
                ],
                policy.timeout,
            )
            .await
            .into_body()?;
        parse_ack(&body, policy, "status updated")
    }
}
