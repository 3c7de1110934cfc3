//! Catalog entries served by the backend's `active` listings.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::document::{ComponentId, ProductId, VendorId};

/// A vendor (order counterparty).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vendor {
    pub id: VendorId,
    #[serde(rename = "vendor_name")]
    pub name: String,
}

/// A sellable product; `rate` seeds the product-line amount at selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    #[serde(rename = "product_name")]
    pub name: String,
    #[serde(
        rename = "product_rate",
        default,
        deserialize_with = "crate::dto::lax::decimal"
    )]
    pub rate: Decimal,
}

/// A raw component consumed by products.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    pub id: ComponentId,
    #[serde(rename = "component_name")]
    pub name: String,
    #[serde(rename = "component_unit", default)]
    pub unit: Option<String>,
    #[serde(
        rename = "component_rate",
        default,
        deserialize_with = "crate::dto::lax::decimal"
    )]
    pub rate: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn product_deserializes_from_backend_shape() {
        let raw = r#"{"id": 3, "product_name": "Steel Frame", "product_rate": "125.50"}"#;
        let product: Product = serde_json::from_str(raw).expect("should parse");
        assert_eq!(product.id, 3);
        assert_eq!(product.name, "Steel Frame");
        assert_eq!(product.rate, dec!(125.50));
    }

    #[test]
    fn missing_rate_coerces_to_zero() {
        let raw = r#"{"id": 9, "component_name": "Bolt", "component_unit": null}"#;
        let component: Component = serde_json::from_str(raw).expect("should parse");
        assert_eq!(component.rate, Decimal::ZERO);
        assert!(component.unit.is_none());
    }
}
