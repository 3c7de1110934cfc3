use async_trait::async_trait;
use tracing::{info, instrument};

use super::{paths, ApiClient, BomApi};
use crate::errors::ServiceError;
use crate::models::bom::BomRow;
use crate::models::document::ProductId;

/// Client for the BOM template service.
#[derive(Debug, Clone)]
pub struct BomClient {
    api: ApiClient,
}

impl BomClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl BomApi for BomClient {
    #[instrument(skip(self))]
    async fn sub_components(&self, product_id: ProductId) -> Result<Vec<BomRow>, ServiceError> {
        let rows: Vec<BomRow> = self
            .api
            .get(&paths::bom_subs(product_id))
            .await?
            .into_data()?
            .unwrap_or_default();
        info!(
            "Fetched BOM template: product_id={}, rows={}",
            product_id,
            rows.len()
        );
        Ok(rows)
    }
}
