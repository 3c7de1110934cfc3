//! Report wire shapes.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Filter posted to the component-stock report endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct StockFilter {
    #[serde(serialize_with = "crate::dto::lax::date_string")]
    pub from_date: Option<NaiveDate>,
    #[serde(serialize_with = "crate::dto::lax::date_string")]
    pub to_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component_id: Option<i64>,
}

/// One component's raw stock movements for the report window. Opening and
/// closing stock are derived client-side, see [`crate::reports`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StockRow {
    #[serde(default, deserialize_with = "crate::dto::lax::opt_id")]
    pub component_id: Option<i64>,
    #[serde(default)]
    pub component_name: Option<String>,
    /// Purchases before the window.
    #[serde(default, deserialize_with = "crate::dto::lax::decimal")]
    pub openpurch: Decimal,
    /// Production intake before the window.
    #[serde(default, deserialize_with = "crate::dto::lax::decimal")]
    pub openproduction: Decimal,
    /// Order dispatches before the window.
    #[serde(default, deserialize_with = "crate::dto::lax::decimal")]
    pub dispatchorder: Decimal,
    /// Purchases inside the window.
    #[serde(default, deserialize_with = "crate::dto::lax::decimal")]
    pub purch: Decimal,
    /// Production intake inside the window.
    #[serde(default, deserialize_with = "crate::dto::lax::decimal")]
    pub production: Decimal,
    /// Dispatches inside the window.
    #[serde(default, deserialize_with = "crate::dto::lax::decimal")]
    pub dispatch: Decimal,
}

/// One order line of the order report, used for per-vendor totals.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderReportRow {
    #[serde(default)]
    pub vendor_name: Option<String>,
    #[serde(
        rename = "order_p_sub_qnty",
        default,
        deserialize_with = "crate::dto::lax::decimal"
    )]
    pub quantity: Decimal,
    #[serde(
        rename = "order_p_sub_amount",
        default,
        deserialize_with = "crate::dto::lax::decimal"
    )]
    pub amount: Decimal,
}
