mod common;

use serde_json::json;

use common::{response_json, TestApp};

#[tokio::test]
async fn duplicate_passdowns_conflict_unless_allowed() {
    let app = TestApp::new().await;
    let tool_id = app.create_tool("RR151D").await;
    let body = json!({
        "comment": "Swapped filter on loop 2",
        "date": "2024-05-01",
        "tool_ids": [tool_id]
    });

    let passdown = app.create("/api/v1/passdowns", body.clone()).await;
    assert_eq!(passdown["tool_ids"], json!([tool_id]));
    assert_eq!(passdown["date"], "2024-05-01");

    let response = app.post("/api/v1/passdowns", body.clone()).await;
    assert_eq!(response.status(), 409);
    let error = response_json(response).await;
    assert!(error["message"]
        .as_str()
        .unwrap()
        .contains("same date, comment and tool"));

    // Same comment on another tool is not a duplicate
    let other_tool = app.create_tool("RZ151D").await;
    app.create(
        "/api/v1/passdowns",
        json!({
            "comment": "Swapped filter on loop 2",
            "date": "2024-05-01",
            "tool_ids": [other_tool]
        }),
    )
    .await;

    let mut forced = body;
    forced["allow_duplicate"] = json!(true);
    app.create("/api/v1/passdowns", forced).await;

    let body = response_json(app.get(&format!("/api/v1/tools/{tool_id}/passdowns")).await).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn passdown_listing_by_date_and_recent() {
    let app = TestApp::new().await;
    for (date, comment) in [
        ("2024-05-01", "Night shift handover"),
        ("2024-05-02", "Day shift handover"),
        ("2024-05-03", "Weekend coverage"),
    ] {
        app.create(
            "/api/v1/passdowns",
            json!({ "comment": comment, "date": date }),
        )
        .await;
    }

    let body = response_json(app.get("/api/v1/passdowns?date=2024-05-02").await).await;
    assert_eq!(body["data"]["total"], 1);
    assert_eq!(body["data"]["items"][0]["comment"], "Day shift handover");

    let body = response_json(
        app.get("/api/v1/passdowns?start=2024-05-02&end=2024-05-03")
            .await,
    )
    .await;
    assert_eq!(body["data"]["total"], 2);

    let body = response_json(app.get("/api/v1/passdowns?recent=1").await).await;
    let items = body["data"]["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["comment"], "Weekend coverage");
}

#[tokio::test]
async fn passdown_validation_and_attachments() {
    let app = TestApp::new().await;

    let response = app.post("/api/v1/passdowns", json!({ "comment": "" })).await;
    assert_eq!(response.status(), 400);

    let response = app
        .post(
            "/api/v1/passdowns",
            json!({ "comment": "Handover", "tool_ids": [31337] }),
        )
        .await;
    assert_eq!(response.status(), 400);

    let passdown = app
        .create("/api/v1/passdowns", json!({ "comment": "Handover" }))
        .await;
    assert!(passdown["date"].is_string());
    let passdown_id = passdown["id"].as_i64().unwrap();

    let attachment = app
        .create(
            &format!("/api/v1/passdowns/{passdown_id}/attachments"),
            json!({ "file_name": "panel.png", "file_path": "uploads/panel.png" }),
        )
        .await;
    assert_eq!(attachment["kind"], "PICTURE");

    let body = response_json(
        app.get(&format!("/api/v1/passdowns/{passdown_id}/attachments"))
            .await,
    )
    .await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let response = app
        .put(
            &format!("/api/v1/passdowns/{passdown_id}"),
            json!({ "comment": "Handover, pump B still noisy" }),
        )
        .await;
    let body = response_json(response).await;
    assert_eq!(body["data"]["comment"], "Handover, pump B still noisy");

    let response = app.delete(&format!("/api/v1/passdowns/{passdown_id}")).await;
    assert_eq!(response.status(), 204);
}

#[tokio::test]
async fn blank_comment_on_update_is_rejected() {
    let app = TestApp::new().await;
    let passdown = app
        .create(
            "/api/v1/passdowns",
            json!({ "comment": "Loop 1 drained", "date": "2024-05-03" }),
        )
        .await;
    let id = passdown["id"].as_i64().unwrap();

    let response = app
        .put(&format!("/api/v1/passdowns/{id}"), json!({ "comment": "   " }))
        .await;
    assert_eq!(response.status(), 400);
    let body = response_json(response).await;
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("Comment is required"));

    let response = app
        .put(
            &format!("/api/v1/passdowns/{id}"),
            json!({ "comment": "  Loop 1 refilled  " }),
        )
        .await;
    let body = response_json(response).await;
    assert_eq!(body["data"]["comment"], "Loop 1 refilled");
}
