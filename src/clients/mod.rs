//! Typed clients for the backing REST API.
//!
//! Every endpoint wraps its payload in the `{code, message, data}`
//! envelope and signals success with code 201 on every verb; the shared
//! [`ApiClient`] owns that decoding rule so the per-service clients stay
//! thin. The session depends on the [`BomApi`] and [`DocumentApi`] traits
//! rather than the concrete clients.

pub mod bom;
pub mod catalog;
pub mod orders;
pub mod production;
pub mod reports;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use crate::config::AppConfig;
use crate::dto::envelope::Envelope;
use crate::errors::ServiceError;
use crate::models::bom::BomRow;
use crate::models::document::{Document, DocumentKind, ProductId};

pub use bom::BomClient;
pub use catalog::{CatalogBundle, CatalogClient};
pub use orders::OrderClient;
pub use production::ProductionClient;
pub use reports::ReportClient;

/// Fetches a product's BOM template.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BomApi: Send + Sync {
    async fn sub_components(&self, product_id: ProductId) -> Result<Vec<BomRow>, ServiceError>;
}

/// Persistence operations for one document kind. Orders and production
/// runs implement the same surface so the session is kind-agnostic;
/// mutation calls resolve to the server message for notifications.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentApi: Send + Sync {
    fn kind(&self) -> DocumentKind;
    async fn fetch(&self, id: i64) -> Result<Document, ServiceError>;
    async fn create(&self, doc: &Document) -> Result<Option<String>, ServiceError>;
    async fn update(&self, id: i64, doc: &Document) -> Result<Option<String>, ServiceError>;
    async fn delete_product_line(&self, line_id: i64) -> Result<Option<String>, ServiceError>;
    async fn delete_component_line(&self, line_id: i64) -> Result<Option<String>, ServiceError>;
}

/// Shared HTTP plumbing: base URL handling, timeouts and envelope decode.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    pub fn from_config(config: &AppConfig) -> Result<Self, ServiceError> {
        Self::new(&config.api_base_url, config.request_timeout())
    }

    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ServiceError> {
        let mut base = Url::parse(base_url)?;
        // Url::join drops the last path segment without this.
        if !base.path().ends_with('/') {
            base.set_path(&format!("{}/", base.path()));
        }
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("mfgops-console/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http, base_url: base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<Envelope<T>, ServiceError> {
        self.execute(self.http.get(self.endpoint(path)?)).await
    }

    pub(crate) async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Envelope<T>, ServiceError> {
        self.execute(self.http.post(self.endpoint(path)?).json(body))
            .await
    }

    pub(crate) async fn put<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Envelope<T>, ServiceError> {
        self.execute(self.http.put(self.endpoint(path)?).json(body))
            .await
    }

    pub(crate) async fn delete<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<Envelope<T>, ServiceError> {
        self.execute(self.http.delete(self.endpoint(path)?)).await
    }

    fn endpoint(&self, path: &str) -> Result<Url, ServiceError> {
        self.base_url
            .join(path)
            .map_err(|e| ServiceError::InvalidInput(format!("bad endpoint path {}: {}", path, e)))
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<Envelope<T>, ServiceError> {
        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        match serde_json::from_slice::<Envelope<T>>(&bytes) {
            Ok(envelope) => Ok(envelope),
            Err(_) if !status.is_success() => Err(ServiceError::ExternalApiError(format!(
                "backend returned HTTP {}",
                status
            ))),
            Err(err) => Err(ServiceError::SerializationError(err.to_string())),
        }
    }
}

/// Endpoint paths, relative to the configured API base.
pub(crate) mod paths {
    pub const VENDORS_ACTIVE: &str = "vendors/active";
    pub const PRODUCTS_ACTIVE: &str = "products/active";
    pub const COMPONENTS_ACTIVE: &str = "components/active";

    pub const ORDERS: &str = "orders";
    pub const PRODUCTION: &str = "production";
    pub const REPORT_COMPONENT_STOCK: &str = "reports/component-stock";

    pub fn bom_subs(product_id: i64) -> String {
        format!("bom/subs/{}", product_id)
    }

    pub fn order(id: i64) -> String {
        format!("orders/{}", id)
    }

    pub fn order_status(id: i64) -> String {
        format!("orders/{}/status", id)
    }

    pub fn order_product_line(id: i64) -> String {
        format!("orders/subs/{}", id)
    }

    pub fn order_component_line(id: i64) -> String {
        format!("orders/subs1/{}", id)
    }

    pub fn production_run(id: i64) -> String {
        format!("production/{}", id)
    }

    pub fn production_status(id: i64) -> String {
        format!("production/{}/status", id)
    }

    pub fn production_product_line(id: i64) -> String {
        format!("production/subs/{}", id)
    }

    pub fn production_component_line(id: i64) -> String {
        format!("production/subs1/{}", id)
    }
}
