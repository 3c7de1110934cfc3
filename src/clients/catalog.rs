use tracing::{info, instrument};

use super::{paths, ApiClient};
use crate::errors::ServiceError;
use crate::models::catalog::{Component, Product, Vendor};

/// Client for the active vendor/product/component listings that feed the
/// selection dropdowns.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    api: ApiClient,
}

/// All three catalogs, loaded together for the editor screens.
#[derive(Debug, Clone, Default)]
pub struct CatalogBundle {
    pub vendors: Vec<Vendor>,
    pub products: Vec<Product>,
    pub components: Vec<Component>,
}

impl CatalogClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Fetches the three catalogs concurrently; an editor screen needs
    /// every dropdown populated before it is usable.
    #[instrument(skip(self))]
    pub async fn load_all(&self) -> Result<CatalogBundle, ServiceError> {
        let (vendors, products, components) = futures::try_join!(
            self.active_vendors(),
            self.active_products(),
            self.active_components()
        )?;
        Ok(CatalogBundle {
            vendors,
            products,
            components,
        })
    }

    #[instrument(skip(self))]
    pub async fn active_vendors(&self) -> Result<Vec<Vendor>, ServiceError> {
        let vendors: Vec<Vendor> = self
            .api
            .get(paths::VENDORS_ACTIVE)
            .await?
            .into_data()?
            .unwrap_or_default();
        info!("Fetched active vendors: count={}", vendors.len());
        Ok(vendors)
    }

    #[instrument(skip(self))]
    pub async fn active_products(&self) -> Result<Vec<Product>, ServiceError> {
        let products: Vec<Product> = self
            .api
            .get(paths::PRODUCTS_ACTIVE)
            .await?
            .into_data()?
            .unwrap_or_default();
        info!("Fetched active products: count={}", products.len());
        Ok(products)
    }

    #[instrument(skip(self))]
    pub async fn active_components(&self) -> Result<Vec<Component>, ServiceError> {
        let components: Vec<Component> = self
            .api
            .get(paths::COMPONENTS_ACTIVE)
            .await?
            .into_data()?
            .unwrap_or_default();
        info!("Fetched active components: count={}", components.len());
        Ok(components)
    }
}
