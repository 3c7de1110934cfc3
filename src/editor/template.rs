//! Composing a production run from an existing order.
//!
//! When a run is booked against an order, the product dropdowns are
//! restricted to the order's own products and the component lines come
//! from the order, not from a BOM fetch. [`OrderTemplate`] captures that
//! slice of the order once so the editor can stay synchronous.

use chrono::NaiveDate;
use std::collections::HashMap;

use crate::models::catalog::Product;
use crate::models::document::{
    ComponentLine, Counterparty, Document, DocumentKind, LineId, ProductId,
};

#[derive(Debug, Clone)]
pub struct OrderTemplate {
    order_ref: String,
    date: Option<NaiveDate>,
    allowed: Vec<ProductId>,
    components: HashMap<ProductId, Vec<ComponentLine>>,
}

impl OrderTemplate {
    /// Captures the selectable products and their component lines from a
    /// loaded order. Component identities are dropped: the production run
    /// gets fresh lines, not references into the order's rows.
    pub fn from_order(order: &Document) -> Self {
        let order_ref = order
            .reference
            .clone()
            .or_else(|| order.id.map(|id| id.to_string()))
            .unwrap_or_default();

        let mut allowed = Vec::new();
        let mut components: HashMap<ProductId, Vec<ComponentLine>> = HashMap::new();
        for line in &order.products {
            let Some(product_id) = line.product_id else {
                continue;
            };
            allowed.push(product_id);
            let fresh: Vec<ComponentLine> = line
                .components
                .iter()
                .map(|c| ComponentLine {
                    id: LineId::New,
                    ..c.clone()
                })
                .collect();
            components.insert(product_id, fresh);
        }

        Self {
            order_ref,
            date: order.document_date,
            allowed,
            components,
        }
    }

    pub fn order_ref(&self) -> &str {
        &self.order_ref
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    pub fn allows(&self, product_id: ProductId) -> bool {
        self.allowed.contains(&product_id)
    }

    /// Fresh component lines for a product, empty when the order had none.
    pub fn components_for(&self, product_id: ProductId) -> Vec<ComponentLine> {
        self.components.get(&product_id).cloned().unwrap_or_default()
    }

    /// Restricts a product catalog to the order's own products.
    pub fn restrict<'a>(&self, catalog: &'a [Product]) -> Vec<&'a Product> {
        catalog.iter().filter(|p| self.allows(p.id)).collect()
    }

    /// Seeds a production document booked against this order.
    pub fn start_document(&self) -> Document {
        let mut doc = Document::new(DocumentKind::Production);
        doc.document_date = self.date;
        doc.counterparty = Counterparty::OrderRef(self.order_ref.clone());
        doc
    }
}
