mod common;

use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::json;

use common::{response_json, TestApp};

#[tokio::test]
async fn rma_defaults_and_filters() {
    let app = TestApp::new().await;
    let tool_id = app.create_tool("RR151D").await;

    let rma = app
        .create(
            "/api/v1/rmas",
            json!({ "rma_number": "RMA-001", "customer_name": "Intel", "tool_id": tool_id }),
        )
        .await;
    assert_eq!(rma["status"], "RMA_WRITTEN_EMAILED");
    assert_eq!(rma["status_display"], "RMA Written - Emailed");
    assert_eq!(rma["purged"], false);
    assert_eq!(rma["downtime_hours"], 0.0);

    app.create(
        "/api/v1/rmas",
        json!({ "rma_number": "RMA-002", "customer_name": "Micron", "status": "COMPLETED" }),
    )
    .await;

    let body = response_json(app.get("/api/v1/rmas?status=completed").await).await;
    assert_eq!(body["data"]["total"], 1);
    assert_eq!(body["data"]["items"][0]["rma_number"], "RMA-002");

    let body = response_json(app.get("/api/v1/rmas?customer=intel").await).await;
    assert_eq!(body["data"]["total"], 1);

    let body = response_json(app.get(&format!("/api/v1/tools/{tool_id}/rmas")).await).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn rma_references_are_checked() {
    let app = TestApp::new().await;

    let response = app
        .post("/api/v1/rmas", json!({ "tool_id": 77 }))
        .await;
    assert_eq!(response.status(), 400);
    let body = response_json(response).await;
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("Tool with ID 77 does not exist"));

    let response = app
        .post("/api/v1/rmas", json!({ "customer_email": "not-an-email" }))
        .await;
    assert_eq!(response.status(), 400);

    let response = app
        .post("/api/v1/rmas", json!({ "downtime_hours": -1.0 }))
        .await;
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn labor_totals_and_line_items() {
    let app = TestApp::new().await;
    let rma = app.create("/api/v1/rmas", json!({ "rma_number": "RMA-010" })).await;
    let rma_id = rma["id"].as_i64().unwrap();

    app.create(
        &format!("/api/v1/rmas/{rma_id}/labor"),
        json!({ "technician": "Sam", "hours": "2.5", "price_per_hour": "100" }),
    )
    .await;
    app.create(
        &format!("/api/v1/rmas/{rma_id}/labor"),
        json!({ "technician": "Ana", "hours": "1", "price_per_hour": "80" }),
    )
    .await;

    let response = app
        .post(
            &format!("/api/v1/rmas/{rma_id}/labor"),
            json!({ "hours": "-1", "price_per_hour": "80" }),
        )
        .await;
    assert_eq!(response.status(), 400);

    let body = response_json(app.get(&format!("/api/v1/rmas/{rma_id}/labor")).await).await;
    assert_eq!(body["data"]["entries"].as_array().unwrap().len(), 2);
    let total = Decimal::from_str(body["data"]["total_labor_cost"].as_str().unwrap()).unwrap();
    assert_eq!(total, dec!(330));

    let item = app
        .create(
            &format!("/api/v1/rmas/{rma_id}/line-items"),
            json!({ "part_name": "Valve", "part_number": "V-1" }),
        )
        .await;
    assert_eq!(item["quantity"], 1);
    assert_eq!(item["replacement_required"], false);

    let body = response_json(
        app.get(&format!("/api/v1/rmas/{rma_id}/line-items"))
            .await,
    )
    .await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn rma_parts_and_comments() {
    let app = TestApp::new().await;
    let part = app
        .create(
            "/api/v1/parts",
            json!({ "name": "Filter", "part_number": "F-9" }),
        )
        .await;
    let part_id = part["id"].as_i64().unwrap();
    let rma = app.create("/api/v1/rmas", json!({})).await;
    let rma_id = rma["id"].as_i64().unwrap();

    let response = app
        .put(
            &format!("/api/v1/rmas/{rma_id}/parts"),
            json!({ "ids": [part_id] }),
        )
        .await;
    let body = response_json(response).await;
    assert_eq!(body["data"]["part_ids"], json!([part_id]));

    app.create(
        &format!("/api/v1/rmas/{rma_id}/comments"),
        json!({ "content": "Shipped back to vendor" }),
    )
    .await;
    let body = response_json(app.get(&format!("/api/v1/rmas/{rma_id}/comments")).await).await;
    assert_eq!(body["data"][0]["content"], "Shipped back to vendor");

    let response = app.delete(&format!("/api/v1/rmas/{rma_id}")).await;
    assert_eq!(response.status(), 204);
    let response = app.get(&format!("/api/v1/rmas/{rma_id}")).await;
    assert_eq!(response.status(), 404);
}
