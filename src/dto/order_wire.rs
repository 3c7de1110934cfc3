//! Order wire shapes: detail payloads (both screen variants), list rows
//! and the flattened submit payload.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;

use crate::models::document::{
    ComponentLine, Counterparty, Document, DocumentKind, DocumentStatus, LineId, ProductLine,
};

/// One row of the order list endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderSummary {
    pub id: i64,
    #[serde(default, deserialize_with = "crate::dto::lax::opt_date")]
    pub order_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "crate::dto::lax::opt_date")]
    pub order_delivery_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "crate::dto::lax::opt_id")]
    pub order_buyer_id: Option<i64>,
    #[serde(default)]
    pub order_status: Option<String>,
    #[serde(default)]
    pub order_note: Option<String>,
}

/// Raw order detail. Two screen generations produced two shapes: the flat
/// one joins `subs` and `subs1` by product id; the nested one carries each
/// product's `subs1` inline under `products`. Both collapse into the same
/// canonical [`Document`].
#[derive(Debug, Default, Deserialize)]
pub struct OrderDetail {
    #[serde(default, deserialize_with = "crate::dto::lax::opt_date")]
    pub order_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "crate::dto::lax::opt_date")]
    pub order_delivery_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "crate::dto::lax::opt_id")]
    pub order_buyer_id: Option<i64>,
    #[serde(default)]
    pub order_ref: Option<String>,
    #[serde(default)]
    pub order_note: Option<String>,
    #[serde(default)]
    pub order_status: Option<String>,
    #[serde(default)]
    pub subs: Vec<OrderProductRow>,
    #[serde(default)]
    pub subs1: Vec<OrderComponentRow>,
    #[serde(default)]
    pub products: Vec<OrderNestedProduct>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct OrderProductRow {
    #[serde(default, deserialize_with = "crate::dto::lax::opt_id")]
    pub id: Option<i64>,
    #[serde(
        rename = "order_p_sub_product_id",
        default,
        deserialize_with = "crate::dto::lax::opt_id"
    )]
    pub product_id: Option<i64>,
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

#[derive(Debug, Default, Clone, Deserialize)]
pub struct OrderComponentRow {
    #[serde(default, deserialize_with = "crate::dto::lax::opt_id")]
    pub id: Option<i64>,
    /// Parent product reference (flat shape only).
    #[serde(
        rename = "order_sub_product_id",
        default,
        deserialize_with = "crate::dto::lax::opt_id"
    )]
    pub product_id: Option<i64>,
    #[serde(
        rename = "order_sub_component_id",
        default,
        deserialize_with = "crate::dto::lax::opt_id"
    )]
    pub component_id: Option<i64>,
    #[serde(
        rename = "order_sub_qnty",
        default,
        deserialize_with = "crate::dto::lax::decimal"
    )]
    pub quantity: Decimal,
    #[serde(rename = "order_sub_unit", default)]
    pub unit: Option<String>,
    #[serde(
        rename = "order_sub_rate",
        default,
        deserialize_with = "crate::dto::lax::decimal"
    )]
    pub rate: Decimal,
    #[serde(
        rename = "order_sub_amount",
        default,
        deserialize_with = "crate::dto::lax::decimal"
    )]
    pub amount: Decimal,
}

#[derive(Debug, Default, Deserialize)]
pub struct OrderNestedProduct {
    #[serde(flatten)]
    pub row: OrderProductRow,
    #[serde(default)]
    pub subs1: Vec<OrderComponentRow>,
}

impl OrderDetail {
    /// Reconciles either wire shape into the canonical document tree.
    ///
    /// Component rows are grouped under their declared parent product id;
    /// a product row with no component rows falls back to one empty
    /// component line, and component rows referencing an unknown product
    /// are dropped.
    pub fn into_document(self, id: Option<i64>) -> Document {
        let status = self
            .order_status
            .as_deref()
            .and_then(|s| DocumentStatus::from_str(s).ok());

        let products = if !self.products.is_empty() {
            self.products
                .into_iter()
                .map(|nested| {
                    let components = nested
                        .subs1
                        .into_iter()
                        .map(component_from_row)
                        .collect::<Vec<_>>();
                    product_from_row(nested.row, components)
                })
                .collect()
        } else {
            let mut by_product: HashMap<i64, Vec<ComponentLine>> = HashMap::new();
            for row in self.subs1 {
                if let Some(pid) = row.product_id {
                    by_product.entry(pid).or_default().push(component_from_row(row));
                }
            }
            self.subs
                .into_iter()
                .map(|row| {
                    let components = row
                        .product_id
                        .and_then(|pid| by_product.remove(&pid))
                        .unwrap_or_default();
                    product_from_row(row, components)
                })
                .collect::<Vec<_>>()
        };

        let products = if products.is_empty() {
            vec![ProductLine::empty()]
        } else {
            products
        };

        Document {
            kind: DocumentKind::Order,
            id,
            document_date: self.order_date,
            delivery_date: self.order_delivery_date,
            counterparty: self
                .order_buyer_id
                .map(Counterparty::Buyer)
                .unwrap_or_default(),
            reference: self.order_ref.filter(|r| !r.trim().is_empty()),
            note: self.order_note.unwrap_or_default(),
            status,
            products,
        }
    }
}

fn component_from_row(row: OrderComponentRow) -> ComponentLine {
    ComponentLine {
        id: LineId::from_option(row.id),
        component_id: row.component_id,
        quantity: or_one(row.quantity),
        unit: row.unit.unwrap_or_default(),
        rate: row.rate,
        amount: row.amount,
    }
}

fn product_from_row(row: OrderProductRow, components: Vec<ComponentLine>) -> ProductLine {
    let components = if components.is_empty() {
        vec![ComponentLine::empty()]
    } else {
        components
    };
    ProductLine::new(
        LineId::from_option(row.id),
        row.product_id,
        or_one(row.quantity),
        row.amount,
        components,
    )
}

fn or_one(quantity: Decimal) -> Decimal {
    if quantity.is_zero() {
        Decimal::ONE
    } else {
        quantity
    }
}

/// The flattened create/update payload: product rows in `subs`, component
/// rows in `subs1` cross-referenced by product id.
#[derive(Debug, Serialize)]
pub struct OrderSubmitPayload {
    #[serde(serialize_with = "crate::dto::lax::date_string")]
    pub order_date: Option<NaiveDate>,
    #[serde(serialize_with = "crate::dto::lax::date_string")]
    pub order_delivery_date: Option<NaiveDate>,
    pub order_buyer_id: Option<i64>,
    pub order_note: String,
    pub order_status: Option<String>,
    pub subs: Vec<OrderSubmitProductRow>,
    pub subs1: Vec<OrderSubmitComponentRow>,
}

#[derive(Debug, Serialize)]
pub struct OrderSubmitProductRow {
    pub id: Option<i64>,
    pub order_p_sub_product_id: Option<i64>,
    #[serde(with = "rust_decimal::serde::float")]
    pub order_p_sub_qnty: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub order_p_sub_amount: Decimal,
}

#[derive(Debug, Serialize)]
pub struct OrderSubmitComponentRow {
    pub id: Option<i64>,
    pub order_sub_component_id: Option<i64>,
    #[serde(with = "rust_decimal::serde::float")]
    pub order_sub_qnty: Decimal,
    pub order_sub_unit: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub order_sub_rate: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub order_sub_amount: Decimal,
    /// Owning product, repeated on every component row.
    pub order_sub_product_id: Option<i64>,
}

impl OrderSubmitPayload {
    pub fn from_document(doc: &Document) -> Self {
        Self {
            order_date: doc.document_date,
            order_delivery_date: doc.delivery_date,
            order_buyer_id: doc.counterparty.buyer(),
            order_note: doc.note.clone(),
            order_status: doc.status.map(|s| s.to_string()),
            subs: doc
                .products
                .iter()
                .map(|p| OrderSubmitProductRow {
                    id: p.id.persisted(),
                    order_p_sub_product_id: p.product_id,
                    order_p_sub_qnty: p.quantity,
                    order_p_sub_amount: p.amount,
                })
                .collect(),
            subs1: doc
                .products
                .iter()
                .flat_map(|p| {
                    p.components.iter().map(|c| OrderSubmitComponentRow {
                        id: c.id.persisted(),
                        order_sub_component_id: c.component_id,
                        order_sub_qnty: c.quantity,
                        order_sub_unit: c.unit.clone(),
                        order_sub_rate: c.rate,
                        order_sub_amount: c.amount,
                        order_sub_product_id: p.product_id,
                    })
                })
                .collect(),
        }
    }
}
