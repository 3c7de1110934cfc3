//! Wire-shape reconciliation: both order detail variants collapse into
//! the same canonical tree, and submit payloads flatten back out.

use rust_decimal_macros::dec;
use serde_json::json;

use mfgops_console::dto::order_wire::{OrderDetail, OrderSubmitPayload};
use mfgops_console::dto::production_wire::{ProductionDetail, ProductionSubmitPayload};
use mfgops_console::models::document::{
    Counterparty, Document, DocumentKind, DocumentStatus, LineId,
};

#[test]
fn flat_shape_groups_components_under_their_product() {
    let detail: OrderDetail = serde_json::from_value(json!({
        "order_date": "2025-03-01",
        "order_delivery_date": "2025-03-09",
        "order_buyer_id": "4",
        "order_note": "rush",
        "order_status": "Pending",
        "subs": [
            { "id": 500, "order_p_sub_product_id": "11", "order_p_sub_qnty": 2, "order_p_sub_amount": "200" },
            { "id": 501, "order_p_sub_product_id": "12", "order_p_sub_qnty": 1, "order_p_sub_amount": 30 }
        ],
        "subs1": [
            { "id": 600, "order_sub_product_id": "11", "order_sub_component_id": 7,
              "order_sub_qnty": "2", "order_sub_unit": "kg", "order_sub_rate": 50, "order_sub_amount": 100 },
            { "id": 601, "order_sub_product_id": "11", "order_sub_component_id": 8,
              "order_sub_qnty": 2, "order_sub_unit": "pcs", "order_sub_rate": "50", "order_sub_amount": "100" }
        ]
    }))
    .unwrap();

    let doc = detail.into_document(Some(41));
    assert_eq!(doc.kind, DocumentKind::Order);
    assert_eq!(doc.id, Some(41));
    assert_eq!(doc.counterparty, Counterparty::Buyer(4));
    assert_eq!(doc.status, Some(DocumentStatus::Pending));
    assert_eq!(doc.products.len(), 2);

    let first = &doc.products[0];
    assert_eq!(first.id, LineId::Persisted(500));
    assert_eq!(first.product_id, Some(11));
    assert_eq!(first.components.len(), 2);
    assert_eq!(first.components[0].id, LineId::Persisted(600));
    assert_eq!(first.components[1].rate, dec!(50));

    // Product 12 has no component rows: it gets one empty placeholder.
    let second = &doc.products[1];
    assert_eq!(second.components.len(), 1);
    assert_eq!(second.components[0].component_id, None);
}

#[test]
fn nested_shape_is_equivalent_to_flat() {
    let detail: OrderDetail = serde_json::from_value(json!({
        "order_date": "2025-03-01",
        "products": [
            {
                "id": 500,
                "order_p_sub_product_id": 11,
                "order_p_sub_qnty": 2,
                "order_p_sub_amount": 200,
                "subs1": [
                    { "id": 600, "order_sub_component_id": 7, "order_sub_qnty": 2,
                      "order_sub_unit": "kg", "order_sub_rate": 50, "order_sub_amount": 100 }
                ]
            }
        ]
    }))
    .unwrap();

    let doc = detail.into_document(Some(41));
    assert_eq!(doc.products.len(), 1);
    assert_eq!(doc.products[0].product_id, Some(11));
    assert_eq!(doc.products[0].components[0].component_id, Some(7));
    assert_eq!(doc.products[0].components[0].amount, dec!(100));
}

#[test]
fn orphan_component_rows_are_dropped_without_error() {
    let detail: OrderDetail = serde_json::from_value(json!({
        "subs": [
            { "id": 500, "order_p_sub_product_id": 11, "order_p_sub_qnty": 1, "order_p_sub_amount": 0 }
        ],
        "subs1": [
            { "id": 600, "order_sub_product_id": 99, "order_sub_component_id": 7,
              "order_sub_qnty": 1, "order_sub_unit": "kg", "order_sub_rate": 5, "order_sub_amount": 5 }
        ]
    }))
    .unwrap();

    let doc = detail.into_document(Some(1));
    assert_eq!(doc.products.len(), 1);
    // The orphan (product 99) is gone; the real product got its placeholder.
    assert_eq!(doc.products[0].components.len(), 1);
    assert_eq!(doc.products[0].components[0].component_id, None);
}

#[test]
fn empty_detail_still_yields_an_editable_tree() {
    let detail: OrderDetail = serde_json::from_value(json!({})).unwrap();
    let doc = detail.into_document(None);
    assert_eq!(doc.products.len(), 1);
    assert_eq!(doc.products[0].components.len(), 1);
    assert!(doc.document_date.is_none());
}

#[test]
fn zero_and_missing_quantities_default_to_one() {
    let detail: OrderDetail = serde_json::from_value(json!({
        "subs": [
            { "id": 500, "order_p_sub_product_id": 11, "order_p_sub_amount": 10 }
        ],
        "subs1": [
            { "id": 600, "order_sub_product_id": 11, "order_sub_component_id": 7,
              "order_sub_qnty": 0, "order_sub_unit": "kg", "order_sub_rate": 5, "order_sub_amount": 0 }
        ]
    }))
    .unwrap();

    let doc = detail.into_document(Some(1));
    assert_eq!(doc.products[0].quantity, dec!(1));
    assert_eq!(doc.products[0].components[0].quantity, dec!(1));
}

#[test]
fn order_submit_payload_flattens_with_parent_references() {
    let mut doc = Document::new(DocumentKind::Order);
    doc.document_date = chrono::NaiveDate::from_ymd_opt(2025, 3, 1);
    doc.delivery_date = chrono::NaiveDate::from_ymd_opt(2025, 3, 9);
    doc.counterparty = Counterparty::Buyer(4);
    doc.note = "rush".into();
    doc.status = Some(DocumentStatus::Processing);
    doc.products[0].id = LineId::Persisted(500);
    doc.products[0].product_id = Some(11);
    doc.products[0].quantity = dec!(2);
    doc.products[0].amount = dec!(200);
    doc.products[0].components[0].component_id = Some(7);
    doc.products[0].components[0].quantity = dec!(2);
    doc.products[0].components[0].unit = "kg".into();
    doc.products[0].components[0].rate = dec!(50);
    doc.products[0].components[0].amount = dec!(100);

    let value = serde_json::to_value(OrderSubmitPayload::from_document(&doc)).unwrap();
    assert_eq!(value["order_date"], "2025-03-01");
    assert_eq!(value["order_delivery_date"], "2025-03-09");
    assert_eq!(value["order_buyer_id"], 4);
    assert_eq!(value["order_status"], "Processing");
    assert_eq!(value["subs"][0]["id"], 500);
    assert_eq!(value["subs"][0]["order_p_sub_product_id"], 11);
    assert_eq!(value["subs"][0]["order_p_sub_qnty"], 2.0);
    assert_eq!(value["subs1"][0]["order_sub_product_id"], 11);
    assert_eq!(value["subs1"][0]["order_sub_unit"], "kg");
    assert_eq!(value["subs1"][0]["order_sub_amount"], 100.0);
}

#[test]
fn production_detail_and_submit_round_the_same_fields() {
    let detail: ProductionDetail = serde_json::from_value(json!({
        "production_p_date": "2025-06-01",
        "order_ref": "ORD-9",
        "production_p_status": "Finished",
        "production": [
            { "id": 300, "production_p_product_id": 5, "production_p_qnty": 3, "production_p_amount": 150 }
        ],
        "subs": [
            { "id": 400, "production_c_product_id": 5, "production_c_component_id": 2,
              "production_c_qnty": 3, "production_c_unit": "kg", "production_c_rate": 50,
              "production_c_amount": 150 }
        ]
    }))
    .unwrap();

    let doc = detail.into_document(Some(12));
    assert_eq!(doc.kind, DocumentKind::Production);
    assert_eq!(doc.counterparty.order_ref(), Some("ORD-9"));
    assert_eq!(doc.status, Some(DocumentStatus::Finished));
    assert_eq!(doc.products[0].components[0].amount, dec!(150));

    let value = serde_json::to_value(ProductionSubmitPayload::from_document(&doc)).unwrap();
    assert_eq!(value["production"][0]["order_ref"], "ORD-9");
    assert_eq!(value["production"][0]["production_p_date"], "2025-06-01");
    assert_eq!(value["subs"][0]["production_c_product_id"], 5);
    assert_eq!(value["subs"][0]["order_ref"], "ORD-9");
}
