//! Bill-of-materials template rows.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::document::ComponentId;

/// One sub-component row of a product's BOM template, as returned by the
/// BOM service. Quantities are per one unit of the product; scaling to the
/// ordered quantity happens later through the product-quantity cascade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BomRow {
    #[serde(
        rename = "bom_sub_component_id",
        default,
        deserialize_with = "crate::dto::lax::opt_id"
    )]
    pub component_id: Option<ComponentId>,

    #[serde(
        rename = "bom_sub_qnty",
        default,
        deserialize_with = "crate::dto::lax::decimal"
    )]
    pub quantity: Decimal,

    #[serde(rename = "component_unit", default)]
    pub unit: Option<String>,

    #[serde(
        rename = "component_rate",
        default,
        deserialize_with = "crate::dto::lax::decimal"
    )]
    pub rate: Decimal,
}
