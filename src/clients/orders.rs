use async_trait::async_trait;
use serde_json::json;
use tracing::{info, instrument};

use super::{paths, ApiClient, DocumentApi};
use crate::dto::order_wire::{OrderDetail, OrderSubmitPayload, OrderSummary};
use crate::errors::ServiceError;
use crate::models::document::{Document, DocumentKind, DocumentStatus};

/// Client for the order endpoints.
#[derive(Debug, Clone)]
pub struct OrderClient {
    api: ApiClient,
}

impl OrderClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<OrderSummary>, ServiceError> {
        let orders: Vec<OrderSummary> = self
            .api
            .get(paths::ORDERS)
            .await?
            .into_data()?
            .unwrap_or_default();
        info!("Fetched orders: count={}", orders.len());
        Ok(orders)
    }

    #[instrument(skip(self))]
    pub async fn update_status(
        &self,
        id: i64,
        status: DocumentStatus,
    ) -> Result<Option<String>, ServiceError> {
        if !status.valid_for(DocumentKind::Order) {
            return Err(ServiceError::InvalidStatus(format!(
                "{} is not a valid order status",
                status
            )));
        }
        let message = self
            .api
            .put::<_, serde_json::Value>(
                &paths::order_status(id),
                &json!({ "order_status": status.to_string() }),
            )
            .await?
            .accept()?;
        info!("Order status updated: id={}, status={}", id, status);
        Ok(message)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<Option<String>, ServiceError> {
        let message = self
            .api
            .delete::<serde_json::Value>(&paths::order(id))
            .await?
            .accept()?;
        info!("Order deleted: id={}", id);
        Ok(message)
    }
}

#[async_trait]
impl DocumentApi for OrderClient {
    fn kind(&self) -> DocumentKind {
        DocumentKind::Order
    }

    #[instrument(skip(self))]
    async fn fetch(&self, id: i64) -> Result<Document, ServiceError> {
        let detail: OrderDetail = self
            .api
            .get(&paths::order(id))
            .await?
            .require_data("order detail")?;
        Ok(detail.into_document(Some(id)))
    }

    #[instrument(skip(self, doc))]
    async fn create(&self, doc: &Document) -> Result<Option<String>, ServiceError> {
        let payload = OrderSubmitPayload::from_document(doc);
        let message = self
            .api
            .post::<_, serde_json::Value>(paths::ORDERS, &payload)
            .await?
            .accept()?;
        info!("Order created: products={}", payload.subs.len());
        Ok(message)
    }

    #[instrument(skip(self, doc))]
    async fn update(&self, id: i64, doc: &Document) -> Result<Option<String>, ServiceError> {
        let payload = OrderSubmitPayload::from_document(doc);
        let message = self
            .api
            .put::<_, serde_json::Value>(&paths::order(id), &payload)
            .await?
            .accept()?;
        info!("Order updated: id={}, products={}", id, payload.subs.len());
        Ok(message)
    }

    #[instrument(skip(self))]
    async fn delete_product_line(&self, line_id: i64) -> Result<Option<String>, ServiceError> {
        self.api
            .delete::<serde_json::Value>(&paths::order_product_line(line_id))
            .await?
            .accept()
    }

    #[instrument(skip(self))]
    async fn delete_component_line(&self, line_id: i64) -> Result<Option<String>, ServiceError> {
        self.api
            .delete::<serde_json::Value>(&paths::order_component_line(line_id))
            .await?
            .accept()
    }
}
