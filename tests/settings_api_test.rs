mod common;

use serde_json::json;

use common::{response_json, TestApp};

#[tokio::test]
async fn checklist_labels_freeze_on_first_check() {
    let app = TestApp::new().await;

    let body = response_json(app.get("/api/v1/checklist-templates/slurry").await).await;
    assert_eq!(body["data"]["customized"], false);
    assert_eq!(body["data"]["labels"].as_array().unwrap().len(), 12);
    assert_eq!(body["data"]["labels"][0], "Commission");

    let response = app
        .put(
            "/api/v1/checklist-templates/SLURRY",
            json!({ "labels": ["Set", "Leak check", "Power on"] }),
        )
        .await;
    assert_eq!(response.status(), 200);
    let body = response_json(response).await;
    assert_eq!(body["data"]["customized"], true);

    let untouched = app
        .create(
            "/api/v1/tools",
            json!({ "name": "RR151D", "tool_type": "SLURRY" }),
        )
        .await;
    assert_eq!(untouched["checklist_labels_json"], serde_json::Value::Null);
    assert_eq!(untouched["checklist_labels"], json!(["Set", "Leak check", "Power on"]));
    assert_eq!(untouched["checklist_items"].as_array().unwrap().len(), 3);
    let untouched_id = untouched["id"].as_i64().unwrap();

    let checked = app
        .create(
            "/api/v1/tools",
            json!({
                "name": "RZ151D",
                "tool_type": "SLURRY",
                "checklist": [{ "item": "pre_sl1", "date": "2024-05-02" }]
            }),
        )
        .await;
    let checked_id = checked["id"].as_i64().unwrap();
    assert_eq!(checked["checklist_items"][1]["label"], "Leak check");
    assert_eq!(checked["checklist_items"][1]["completed"], true);

    // A later template edit only reaches tools with nothing checked
    app.put(
        "/api/v1/checklist-templates/SLURRY",
        json!({ "labels": ["Set", "Leak check"] }),
    )
    .await;

    let body = response_json(app.get(&format!("/api/v1/tools/{checked_id}")).await).await;
    assert_eq!(body["data"]["checklist_labels"], json!(["Set", "Leak check", "Power on"]));

    let body = response_json(app.get(&format!("/api/v1/tools/{untouched_id}")).await).await;
    assert_eq!(body["data"]["checklist_labels"], json!(["Set", "Leak check"]));

    // Tools without a type use the slurry labels
    let untyped = app
        .create(
            "/api/v1/tools",
            json!({ "name": "WK151D", "checklist": [{ "item": "commission", "completed": true }] }),
        )
        .await;
    assert_eq!(untyped["checklist_labels"], json!(["Set", "Leak check"]));
}

#[tokio::test]
async fn checklist_template_validation() {
    let app = TestApp::new().await;

    let response = app.get("/api/v1/checklist-templates/TURBINE").await;
    assert_eq!(response.status(), 400);

    let response = app
        .put("/api/v1/checklist-templates/CHEMBLEND", json!({ "labels": [] }))
        .await;
    assert_eq!(response.status(), 400);

    let response = app
        .put(
            "/api/v1/checklist-templates/CHEMBLEND",
            json!({ "labels": ["Commission", "  "] }),
        )
        .await;
    assert_eq!(response.status(), 400);

    let labels: Vec<String> = (1..=13).map(|n| format!("Step {n}")).collect();
    let response = app
        .put(
            "/api/v1/checklist-templates/CHEMBLEND",
            json!({ "labels": labels }),
        )
        .await;
    assert_eq!(response.status(), 400);

    let body = response_json(app.get("/api/v1/checklist-templates/chemblend").await).await;
    assert_eq!(body["data"]["customized"], false);
}

#[tokio::test]
async fn return_address_names_are_unique() {
    let app = TestApp::new().await;
    let fab = app
        .create(
            "/api/v1/return-addresses",
            json!({ "name": "Fab 52 Receiving", "address": "4500 S Dobson Rd\nChandler, AZ" }),
        )
        .await;
    let fab_id = fab["id"].as_i64().unwrap();
    app.create(
        "/api/v1/return-addresses",
        json!({ "name": "Depot", "address": "100 Depot Way" }),
    )
    .await;

    let response = app
        .post(
            "/api/v1/return-addresses",
            json!({ "name": "  fab 52 receiving ", "address": "elsewhere" }),
        )
        .await;
    assert_eq!(response.status(), 409);

    let response = app
        .post(
            "/api/v1/return-addresses",
            json!({ "name": "Blank", "address": "   " }),
        )
        .await;
    assert_eq!(response.status(), 400);

    let body = response_json(app.get("/api/v1/return-addresses").await).await;
    let names: Vec<_> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|address| address["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["Depot", "Fab 52 Receiving"]);

    let response = app
        .put(
            &format!("/api/v1/return-addresses/{fab_id}"),
            json!({ "name": "DEPOT" }),
        )
        .await;
    assert_eq!(response.status(), 409);

    // Renaming onto its own name in another case is allowed
    let response = app
        .put(
            &format!("/api/v1/return-addresses/{fab_id}"),
            json!({ "name": "FAB 52 RECEIVING", "address": "Dock 3" }),
        )
        .await;
    assert_eq!(response.status(), 200);
    let body = response_json(response).await;
    assert_eq!(body["data"]["address"], "Dock 3");

    let response = app
        .delete(&format!("/api/v1/return-addresses/{fab_id}"))
        .await;
    assert_eq!(response.status(), 204);
    let response = app.get(&format!("/api/v1/return-addresses/{fab_id}")).await;
    assert_eq!(response.status(), 404);
}
