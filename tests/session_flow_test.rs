//! Full session flows over stubbed HTTP: create an order end to end, and
//! verify deletes only splice the tree after backend confirmation.

use std::sync::Arc;
use std::time::Duration;

use assert_matches::assert_matches;
use chrono::NaiveDate;
use rust_decimal_macros::dec;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use mfgops_console::clients::{ApiClient, BomClient, OrderClient};
use mfgops_console::editor::ExpansionOutcome;
use mfgops_console::events;
use mfgops_console::models::catalog::Product;
use mfgops_console::session::{EditorSession, SubmitOutcome};

async fn api(server: &MockServer) -> ApiClient {
    ApiClient::new(&format!("{}/api/", server.uri()), Duration::from_secs(5)).unwrap()
}

fn order_session(
    api: ApiClient,
) -> (
    EditorSession<BomClient, OrderClient>,
    tokio::sync::mpsc::Receiver<events::EditorEvent>,
) {
    let (sender, rx) = events::channel(32);
    (
        EditorSession::new(
            Arc::new(BomClient::new(api.clone())),
            Arc::new(OrderClient::new(api)),
            sender,
        ),
        rx,
    )
}

#[tokio::test]
async fn create_order_flow_expands_bom_and_posts_flattened_payload() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/bom/subs/11"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 201,
            "data": [
                { "bom_sub_component_id": 7, "bom_sub_qnty": 2,
                  "component_unit": "kg", "component_rate": 50 }
            ]
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/orders"))
        .and(body_partial_json(json!({
            "order_buyer_id": 4,
            "subs1": [
                { "order_sub_component_id": 7, "order_sub_product_id": 11 }
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 201,
            "message": "Order saved successfully"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (mut session, _rx) = order_session(api(&server).await);
    let product = Product {
        id: 11,
        name: "Steel Frame".into(),
        rate: dec!(100),
    };

    let outcome = session.select_product(0, &product).await.unwrap();
    assert_matches!(outcome, ExpansionOutcome::Applied(1));
    assert_eq!(session.document().products[0].components[0].amount, dec!(100));

    {
        let editor = session.editor_mut();
        editor.set_document_date(NaiveDate::from_ymd_opt(2025, 3, 1));
        editor.set_delivery_date(NaiveDate::from_ymd_opt(2025, 3, 9));
        editor.set_buyer(4);
    }

    let outcome = session.submit().await.unwrap();
    match outcome {
        SubmitOutcome::Saved { created, message } => {
            assert!(created);
            assert_eq!(message.as_deref(), Some("Order saved successfully"));
        }
        other => panic!("expected save, got {:?}", other),
    }
}

#[tokio::test]
async fn bom_failure_leaves_the_line_component_less_but_editable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/bom/subs/11"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 404,
            "message": "No BOM for product"
        })))
        .mount(&server)
        .await;

    let (mut session, _rx) = order_session(api(&server).await);
    let product = Product {
        id: 11,
        name: "Steel Frame".into(),
        rate: dec!(100),
    };

    let err = session.select_product(0, &product).await.unwrap_err();
    assert_eq!(err.notification_message(), "No BOM for product");
    assert_eq!(session.document().products[0].product_id, Some(11));
    assert!(session.document().products[0].components.is_empty());
}

#[tokio::test]
async fn confirmed_delete_splices_only_after_success_envelope() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/orders/41"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 201,
            "data": {
                "order_date": "2025-03-01",
                "order_delivery_date": "2025-03-09",
                "order_buyer_id": 4,
                "subs": [
                    { "id": 500, "order_p_sub_product_id": 11,
                      "order_p_sub_qnty": 1, "order_p_sub_amount": 100 },
                    { "id": 501, "order_p_sub_product_id": 12,
                      "order_p_sub_qnty": 1, "order_p_sub_amount": 30 }
                ],
                "subs1": []
            }
        })))
        .mount(&server)
        .await;

    // First delete attempt fails, second succeeds.
    Mock::given(method("DELETE"))
        .and(path("/api/orders/subs/501"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 400,
            "message": "Line is locked"
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/orders/subs/501"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 201,
            "message": "Product deleted"
        })))
        .mount(&server)
        .await;

    let (mut session, _rx) = order_session(api(&server).await);
    session.load(41).await.unwrap();
    assert_eq!(session.document().products.len(), 2);

    let err = session.remove_product(1).await.unwrap_err();
    assert_eq!(err.notification_message(), "Line is locked");
    assert_eq!(session.document().products.len(), 2);

    let message = session.remove_product(1).await.unwrap();
    assert_eq!(message.as_deref(), Some("Product deleted"));
    assert_eq!(session.document().products.len(), 1);
}
