//! Order removal. Both operations are opaque-post fire-and-forget: success
//! is reported once the request is dispatched, never confirmed by the
//! remote.

use stockbook_core::{Ack, ClientResult};

use crate::hooks::LoadingGuard;
use crate::types::SYNC_TIMEOUT;

use super::StockClient;

impl StockClient {
    /// Delete one order, identified by owner email, item and date.
    pub async fn delete_order(&self, email: &str, item: &str, date: &str) -> ClientResult<Ack> {
        self.require_configured()?;
        let _loading = LoadingGuard::start(&self.hooks, "Deleting order...");

        self.gateway
            .dispatch_opaque(
                &serde_json::json!({
                    "action": "deleteOrder",
                    "email": email,
                    "item": item,
                    "date": date,
                }),
                SYNC_TIMEOUT,
            )
            .await?;
        Ok(Ack::unverified("order delete dispatched"))
    }

    /// Delete every order.
    pub async fn delete_all_orders(&self) -> ClientResult<Ack> {
        self.require_configured()?;
        let _loading = LoadingGuard::start(&self.hooks, "Deleting all orders...");

        self.gateway
            .dispatch_opaque(&serde_json::json!({ "action": "deleteAllOrders" }), SYNC_TIMEOUT)
            .await?;
        Ok(Ack::unverified("all orders delete dispatched"))
    }
}
