//! Production wire shapes: detail/list payloads, the flattened submit
//! payload and the header-only update used by the production edit screen.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;

use crate::models::document::{
    ComponentLine, Counterparty, Document, DocumentKind, DocumentStatus, LineId, ProductLine,
};

/// One row of the production list endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductionSummary {
    pub id: i64,
    #[serde(default, deserialize_with = "crate::dto::lax::opt_date")]
    pub production_p_date: Option<NaiveDate>,
    #[serde(default)]
    pub order_ref: Option<String>,
    #[serde(default)]
    pub production_p_status: Option<String>,
    #[serde(
        rename = "production_p_qnty",
        default,
        deserialize_with = "crate::dto::lax::decimal"
    )]
    pub quantity: Decimal,
    #[serde(
        rename = "production_p_amount",
        default,
        deserialize_with = "crate::dto::lax::decimal"
    )]
    pub amount: Decimal,
}

/// Raw production detail: flat product rows (`production`) plus flat
/// component rows (`subs`) joined by product id.
#[derive(Debug, Default, Deserialize)]
pub struct ProductionDetail {
    #[serde(default, deserialize_with = "crate::dto::lax::opt_date")]
    pub production_p_date: Option<NaiveDate>,
    #[serde(default)]
    pub order_ref: Option<String>,
    #[serde(default)]
    pub production_p_status: Option<String>,
    #[serde(default)]
    pub production: Vec<ProductionProductRow>,
    #[serde(default)]
    pub subs: Vec<ProductionComponentRow>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct ProductionProductRow {
    #[serde(default, deserialize_with = "crate::dto::lax::opt_id")]
    pub id: Option<i64>,
    #[serde(
        rename = "production_p_product_id",
        default,
        deserialize_with = "crate::dto::lax::opt_id"
    )]
    pub product_id: Option<i64>,
    #[serde(
        rename = "production_p_qnty",
        default,
        deserialize_with = "crate::dto::lax::decimal"
    )]
    pub quantity: Decimal,
    #[serde(
        rename = "production_p_amount",
        default,
        deserialize_with = "crate::dto::lax::decimal"
    )]
    pub amount: Decimal,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct ProductionComponentRow {
    #[serde(default, deserialize_with = "crate::dto::lax::opt_id")]
    pub id: Option<i64>,
    #[serde(
        rename = "production_c_product_id",
        default,
        deserialize_with = "crate::dto::lax::opt_id"
    )]
    pub product_id: Option<i64>,
    #[serde(
        rename = "production_c_component_id",
        default,
        deserialize_with = "crate::dto::lax::opt_id"
    )]
    pub component_id: Option<i64>,
    #[serde(
        rename = "production_c_qnty",
        default,
        deserialize_with = "crate::dto::lax::decimal"
    )]
    pub quantity: Decimal,
    #[serde(rename = "production_c_unit", default)]
    pub unit: Option<String>,
    #[serde(
        rename = "production_c_rate",
        default,
        deserialize_with = "crate::dto::lax::decimal"
    )]
    pub rate: Decimal,
    #[serde(
        rename = "production_c_amount",
        default,
        deserialize_with = "crate::dto::lax::decimal"
    )]
    pub amount: Decimal,
}

impl ProductionDetail {
    /// Reconciles the flat shape into the canonical document tree, with
    /// the same grouping and fallback rules as orders.
    pub fn into_document(self, id: Option<i64>) -> Document {
        let status = self
            .production_p_status
            .as_deref()
            .and_then(|s| DocumentStatus::from_str(s).ok());

        let mut by_product: HashMap<i64, Vec<ComponentLine>> = HashMap::new();
        for row in self.subs {
            if let Some(pid) = row.product_id {
                by_product.entry(pid).or_default().push(component_from_row(row));
            }
        }

        let mut products: Vec<ProductLine> = self
            .production
            .into_iter()
            .map(|row| {
                let components = row
                    .product_id
                    .and_then(|pid| by_product.remove(&pid))
                    .filter(|c| !c.is_empty())
                    .unwrap_or_else(|| vec![ComponentLine::empty()]);
                ProductLine::new(
                    LineId::from_option(row.id),
                    row.product_id,
                    or_one(row.quantity),
                    row.amount,
                    components,
                )
            })
            .collect();

        if products.is_empty() {
            products.push(ProductLine::empty());
        }

        Document {
            kind: DocumentKind::Production,
            id,
            document_date: self.production_p_date,
            delivery_date: None,
            counterparty: self
                .order_ref
                .filter(|r| !r.trim().is_empty())
                .map(Counterparty::OrderRef)
                .unwrap_or_default(),
            reference: None,
            note: String::new(),
            status,
            products,
        }
    }
}

fn component_from_row(row: ProductionComponentRow) -> ComponentLine {
    ComponentLine {
        id: LineId::from_option(row.id),
        component_id: row.component_id,
        quantity: or_one(row.quantity),
        unit: row.unit.unwrap_or_default(),
        rate: row.rate,
        amount: row.amount,
    }
}

fn or_one(quantity: Decimal) -> Decimal {
    if quantity.is_zero() {
        Decimal::ONE
    } else {
        quantity
    }
}

/// The flattened create payload. Every row is stamped with the production
/// date and source-order reference so the backend can book the run
/// against the order.
#[derive(Debug, Serialize)]
pub struct ProductionSubmitPayload {
    pub production: Vec<ProductionSubmitProductRow>,
    pub subs: Vec<ProductionSubmitComponentRow>,
}

#[derive(Debug, Serialize)]
pub struct ProductionSubmitProductRow {
    pub id: Option<i64>,
    pub order_ref: Option<String>,
    #[serde(serialize_with = "crate::dto::lax::date_string")]
    pub production_p_date: Option<NaiveDate>,
    pub production_p_product_id: Option<i64>,
    #[serde(with = "rust_decimal::serde::float")]
    pub production_p_qnty: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub production_p_amount: Decimal,
}

#[derive(Debug, Serialize)]
pub struct ProductionSubmitComponentRow {
    pub id: Option<i64>,
    pub production_c_component_id: Option<i64>,
    #[serde(with = "rust_decimal::serde::float")]
    pub production_c_qnty: Decimal,
    pub production_c_unit: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub production_c_rate: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub production_c_amount: Decimal,
    pub production_c_product_id: Option<i64>,
    #[serde(serialize_with = "crate::dto::lax::date_string")]
    pub production_c_date: Option<NaiveDate>,
    pub order_ref: Option<String>,
}

impl ProductionSubmitPayload {
    pub fn from_document(doc: &Document) -> Self {
        let order_ref = doc.counterparty.order_ref().map(str::to_string);
        Self {
            production: doc
                .products
                .iter()
                .map(|p| ProductionSubmitProductRow {
                    id: p.id.persisted(),
                    order_ref: order_ref.clone(),
                    production_p_date: doc.document_date,
                    production_p_product_id: p.product_id,
                    production_p_qnty: p.quantity,
                    production_p_amount: p.amount,
                })
                .collect(),
            subs: doc
                .products
                .iter()
                .flat_map(|p| {
                    p.components.iter().map(|c| ProductionSubmitComponentRow {
                        id: c.id.persisted(),
                        production_c_component_id: c.component_id,
                        production_c_qnty: c.quantity,
                        production_c_unit: c.unit.clone(),
                        production_c_rate: c.rate,
                        production_c_amount: c.amount,
                        production_c_product_id: p.product_id,
                        production_c_date: doc.document_date,
                        order_ref: order_ref.clone(),
                    })
                })
                .collect(),
        }
    }
}

/// Header-only update for a persisted production run (date, totals and
/// status; lines are untouched).
#[derive(Debug, Serialize)]
pub struct ProductionHeaderUpdate {
    #[serde(serialize_with = "crate::dto::lax::date_string")]
    pub production_p_date: Option<NaiveDate>,
    #[serde(with = "rust_decimal::serde::float")]
    pub production_p_qnty: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub production_p_amount: Decimal,
    pub production_p_status: String,
}
