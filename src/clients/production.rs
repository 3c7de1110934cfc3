use async_trait::async_trait;
use serde_json::json;
use tracing::{info, instrument};

use super::{paths, ApiClient, DocumentApi};
use crate::dto::production_wire::{
    ProductionDetail, ProductionHeaderUpdate, ProductionSubmitPayload, ProductionSummary,
};
use crate::errors::ServiceError;
use crate::models::document::{Document, DocumentKind, DocumentStatus};

/// Client for the production-run endpoints.
#[derive(Debug, Clone)]
pub struct ProductionClient {
    api: ApiClient,
}

impl ProductionClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<ProductionSummary>, ServiceError> {
        let runs: Vec<ProductionSummary> = self
            .api
            .get(paths::PRODUCTION)
            .await?
            .into_data()?
            .unwrap_or_default();
        info!("Fetched production runs: count={}", runs.len());
        Ok(runs)
    }

    #[instrument(skip(self))]
    pub async fn update_status(
        &self,
        id: i64,
        status: DocumentStatus,
    ) -> Result<Option<String>, ServiceError> {
        if !status.valid_for(DocumentKind::Production) {
            return Err(ServiceError::InvalidStatus(format!(
                "{} is not a valid production status",
                status
            )));
        }
        let message = self
            .api
            .put::<_, serde_json::Value>(
                &paths::production_status(id),
                &json!({ "production_p_status": status.to_string() }),
            )
            .await?
            .accept()?;
        info!("Production status updated: id={}, status={}", id, status);
        Ok(message)
    }

    /// Header-only update (date, totals, status) for a persisted run.
    #[instrument(skip(self, header))]
    pub async fn update_header(
        &self,
        id: i64,
        header: &ProductionHeaderUpdate,
    ) -> Result<Option<String>, ServiceError> {
        let message = self
            .api
            .put::<_, serde_json::Value>(&paths::production_run(id), header)
            .await?
            .accept()?;
        info!("Production header updated: id={}", id);
        Ok(message)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<Option<String>, ServiceError> {
        let message = self
            .api
            .delete::<serde_json::Value>(&paths::production_run(id))
            .await?
            .accept()?;
        info!("Production run deleted: id={}", id);
        Ok(message)
    }
}

#[async_trait]
impl DocumentApi for ProductionClient {
    fn kind(&self) -> DocumentKind {
        DocumentKind::Production
    }

    #[instrument(skip(self))]
    async fn fetch(&self, id: i64) -> Result<Document, ServiceError> {
        let detail: ProductionDetail = self
            .api
            .get(&paths::production_run(id))
            .await?
            .require_data("production detail")?;
        Ok(detail.into_document(Some(id)))
    }

    #[instrument(skip(self, doc))]
    async fn create(&self, doc: &Document) -> Result<Option<String>, ServiceError> {
        let payload = ProductionSubmitPayload::from_document(doc);
        let message = self
            .api
            .post::<_, serde_json::Value>(paths::PRODUCTION, &payload)
            .await?
            .accept()?;
        info!("Production run created: products={}", payload.production.len());
        Ok(message)
    }

    #[instrument(skip(self, doc))]
    async fn update(&self, id: i64, doc: &Document) -> Result<Option<String>, ServiceError> {
        let payload = ProductionSubmitPayload::from_document(doc);
        let message = self
            .api
            .put::<_, serde_json::Value>(&paths::production_run(id), &payload)
            .await?
            .accept()?;
        info!(
            "Production run updated: id={}, products={}",
            id,
            payload.production.len()
        );
        Ok(message)
    }

    #[instrument(skip(self))]
    async fn delete_product_line(&self, line_id: i64) -> Result<Option<String>, ServiceError> {
        self.api
            .delete::<serde_json::Value>(&paths::production_product_line(line_id))
            .await?
            .accept()
    }

    #[instrument(skip(self))]
    async fn delete_component_line(&self, line_id: i64) -> Result<Option<String>, ServiceError> {
        self.api
            .delete::<serde_json::Value>(&paths::production_component_line(line_id))
            .await?
            .accept()
    }
}
