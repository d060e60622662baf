//! Item listings and mutations. Items are never cached locally; every
//! operation here is remote-only and requires a configured endpoint.

use stockbook_core::{Ack, ClientError, ClientResult, Item};

use crate::hooks::LoadingGuard;
use crate::types::{CallPolicy, ItemsReply, SYNC_TIMEOUT, parse_ack};

use super::StockClient;

impl StockClient {
    /// Read-through item listing.
    pub async fn get_items(&self) -> ClientResult<Vec<Item>> {
        self.require_configured()?;
        let _loading = LoadingGuard::start(&self.hooks, "Loading items...");

        let body = self.gateway.invoke("getItems", &[], SYNC_TIMEOUT).await.into_body()?;
        let reply: ItemsReply =
            serde_json::from_str(&body).map_err(|err| ClientError::parse(err.to_string()))?;
        if reply.success {
            Ok(reply.items)
        } else {
            Err(ClientError::parse(reply.message))
        }
    }

    /// Add an item. Implicit success on an unparseable body.
    pub async fn add_item(&self, name: &str, stock: i64) -> ClientResult<Ack> {
        self.require_configured()?;
        let _loading = LoadingGuard::start(&self.hooks, "Adding item...");

        let stock = stock.to_string();
        let policy = CallPolicy::lenient();
        let body = self
            .gateway
            .invoke("addItem", &[("name", name), ("stock", &stock)], policy.timeout)
            .await
            .into_body()?;
        parse_ack(&body, policy, "item added")
    }

    /// Overwrite an item's stock level. Implicit success on an unparseable
    /// body.
    pub async fn update_item(&self, name: &str, stock: i64) -> ClientResult<Ack> {
        self.require_configured()?;
        let _loading = LoadingGuard::start(&self.hooks, "Updating stock...");

        let stock = stock.to_string();
        let policy = CallPolicy::lenient();
        let body = self
            .gateway
            .invoke("updateItem", &[("name", name), ("stock", &stock)], policy.timeout)
            .await
            .into_body()?;
        parse_ack(&body, policy, "stock updated")
    }

    /// Fire-and-forget item removal: the ack is optimistic, the remote
    /// never confirms it.
    pub async fn delete_item(&self, name: &str) -> ClientResult<Ack> {
        self.require_configured()?;
        let _loading = LoadingGuard::start(&self.hooks, "Deleting item...");

        self.gateway
            .dispatch_opaque(
                &serde_json::json!({ "action": "deleteItem", "name": name }),
                SYNC_TIMEOUT,
            )
            .await?;
        Ok(Ack::unverified("item delete dispatched"))
    }
}
