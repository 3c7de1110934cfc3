//! Pre-submit structural validation.
//!
//! Validation never throws: it produces a field-keyed error map and the
//! submission gate refuses to touch the network while the map is
//! non-empty. Keys are scoped by line position (`product_2`,
//! `component_2_0`) so the form layer can attach messages to the right row.

use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::models::document::{Document, DocumentKind};

pub const MSG_REQUIRED: &str = "Required";
pub const MSG_PRODUCT_REQUIRED: &str = "Product required";
pub const MSG_COMPONENT_FIELDS: &str = "All component fields required";

/// Field-keyed validation errors.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationMap(BTreeMap<String, String>);

impl ValidationMap {
    pub fn insert(&mut self, key: impl Into<String>, message: impl Into<String>) {
        self.0.insert(key.into(), message.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.0.iter()
    }
}

pub fn product_key(product_index: usize) -> String {
    format!("product_{}", product_index)
}

pub fn component_key(product_index: usize, component_index: usize) -> String {
    format!("component_{}_{}", product_index, component_index)
}

/// Validates the whole tree.
///
/// Header requirements differ by kind: orders need a date, a delivery date
/// and a buyer; production runs need a date and the order reference they
/// are booked against. Line requirements are identical: a selected product
/// per product line, and a selected component with positive quantity,
/// non-empty unit and positive rate per component line.
pub fn validate_document(doc: &Document) -> ValidationMap {
    let mut errors = ValidationMap::default();

    if doc.document_date.is_none() {
        errors.insert("document_date", MSG_REQUIRED);
    }
    match doc.kind {
        DocumentKind::Order => {
            if doc.delivery_date.is_none() {
                errors.insert("delivery_date", MSG_REQUIRED);
            }
            if doc.counterparty.buyer().is_none() {
                errors.insert("counterparty", MSG_REQUIRED);
            }
        }
        DocumentKind::Production => {
            if doc.counterparty.order_ref().is_none() {
                errors.insert("counterparty", MSG_REQUIRED);
            }
        }
    }

    for (pi, product) in doc.products.iter().enumerate() {
        if product.product_id.is_none() {
            errors.insert(product_key(pi), MSG_PRODUCT_REQUIRED);
        }
        for (ci, component) in product.components.iter().enumerate() {
            let complete = component.component_id.is_some()
                && component.quantity > Decimal::ZERO
                && !component.unit.trim().is_empty()
                && component.rate > Decimal::ZERO;
            if !complete {
                errors.insert(component_key(pi, ci), MSG_COMPONENT_FIELDS);
            }
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::document::{Counterparty, Document, DocumentKind};
    use chrono::NaiveDate;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn valid_order() -> Document {
        let mut doc = Document::new(DocumentKind::Order);
        doc.document_date = NaiveDate::from_ymd_opt(2025, 5, 1);
        doc.delivery_date = NaiveDate::from_ymd_opt(2025, 5, 10);
        doc.counterparty = Counterparty::Buyer(4);
        doc.products[0].product_id = Some(11);
        let component = &mut doc.products[0].components[0];
        component.component_id = Some(7);
        component.quantity = dec!(2);
        component.unit = "kg".into();
        component.rate = dec!(50);
        component.amount = dec!(100);
        doc
    }

    #[test]
    fn complete_order_passes() {
        assert!(validate_document(&valid_order()).is_empty());
    }

    #[test]
    fn missing_product_selection_is_keyed_by_position() {
        let mut doc = valid_order();
        doc.products[0].product_id = None;
        let errors = validate_document(&doc);
        assert_eq!(errors.get("product_0"), Some(MSG_PRODUCT_REQUIRED));
    }

    #[rstest]
    #[case::no_component(|d: &mut Document| d.products[0].components[0].component_id = None)]
    #[case::zero_quantity(|d: &mut Document| d.products[0].components[0].quantity = dec!(0))]
    #[case::blank_unit(|d: &mut Document| d.products[0].components[0].unit = "  ".into())]
    #[case::zero_rate(|d: &mut Document| d.products[0].components[0].rate = dec!(0))]
    fn incomplete_component_fields_fail(#[case] mutate: fn(&mut Document)) {
        let mut doc = valid_order();
        mutate(&mut doc);
        let errors = validate_document(&doc);
        assert_eq!(errors.get("component_0_0"), Some(MSG_COMPONENT_FIELDS));
    }

    #[test]
    fn order_header_requirements() {
        let mut doc = valid_order();
        doc.document_date = None;
        doc.delivery_date = None;
        doc.counterparty = Counterparty::None;
        let errors = validate_document(&doc);
        assert!(errors.contains("document_date"));
        assert!(errors.contains("delivery_date"));
        assert!(errors.contains("counterparty"));
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn production_needs_order_reference_but_no_delivery_date() {
        let mut doc = valid_order();
        doc.kind = DocumentKind::Production;
        doc.delivery_date = None;
        doc.counterparty = Counterparty::OrderRef("ORD-33".into());
        assert!(validate_document(&doc).is_empty());

        doc.counterparty = Counterparty::Buyer(4);
        assert!(validate_document(&doc).contains("counterparty"));
    }
}
