use tracing::{info, instrument};

use super::{paths, ApiClient};
use crate::dto::report_wire::{StockFilter, StockRow};
use crate::errors::ServiceError;

/// Client for the reporting endpoints.
#[derive(Debug, Clone)]
pub struct ReportClient {
    api: ApiClient,
}

impl ReportClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Raw stock movements for the filter window; opening/closing stock
    /// are derived client-side via [`crate::reports`].
    #[instrument(skip(self))]
    pub async fn component_stock(&self, filter: &StockFilter) -> Result<Vec<StockRow>, ServiceError> {
        let rows: Vec<StockRow> = self
            .api
            .post(paths::REPORT_COMPONENT_STOCK, filter)
            .await?
            .into_data()?
            .unwrap_or_default();
        info!("Fetched stock report: rows={}", rows.len());
        Ok(rows)
    }
}
