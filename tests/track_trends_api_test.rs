mod common;

use serde_json::json;

use common::{response_json, TestApp};

#[tokio::test]
async fn related_links_are_bidirectional() {
    let app = TestApp::new().await;
    let first = app
        .create("/api/v1/track-trends", json!({ "name": "Filter clogging" }))
        .await;
    let first_id = first["id"].as_i64().unwrap();
    let second = app
        .create(
            "/api/v1/track-trends",
            json!({ "name": "Slurry settling", "related_ids": [first_id] }),
        )
        .await;
    let second_id = second["id"].as_i64().unwrap();
    assert_eq!(second["related"][0]["id"], first_id);

    let body = response_json(app.get(&format!("/api/v1/track-trends/{first_id}")).await).await;
    assert_eq!(body["data"]["related"][0]["id"], second_id);

    // Self links are dropped
    let response = app
        .put(
            &format!("/api/v1/track-trends/{first_id}/related"),
            json!({ "ids": [first_id] }),
        )
        .await;
    let body = response_json(response).await;
    assert_eq!(body["data"]["related"], json!([]));

    let body = response_json(app.get(&format!("/api/v1/track-trends/{second_id}")).await).await;
    assert_eq!(body["data"]["related"], json!([]));

    let response = app
        .put(
            &format!("/api/v1/track-trends/{first_id}/related"),
            json!({ "ids": [999] }),
        )
        .await;
    assert_eq!(response.status(), 400);

    let body = response_json(
        app.get(&format!("/api/v1/track-trends/{first_id}/available-related"))
            .await,
    )
    .await;
    let candidates = body["data"].as_array().unwrap();
    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0]["id"], second_id);
}

#[tokio::test]
async fn rmas_are_found_through_affected_tools() {
    let app = TestApp::new().await;
    let affected = app.create_tool("RR151D").await;
    let other = app.create_tool("RZ151D").await;
    app.create(
        "/api/v1/rmas",
        json!({ "rma_number": "RMA-100", "tool_id": affected }),
    )
    .await;
    app.create(
        "/api/v1/rmas",
        json!({ "rma_number": "RMA-200", "tool_id": other }),
    )
    .await;

    let track_trend = app
        .create("/api/v1/track-trends", json!({ "name": "Valve wear" }))
        .await;
    let id = track_trend["id"].as_i64().unwrap();

    let response = app
        .put(
            &format!("/api/v1/track-trends/{id}/tools"),
            json!({ "ids": [affected] }),
        )
        .await;
    let body = response_json(response).await;
    assert_eq!(body["data"]["tools"][0]["name"], "RR151D");

    let body = response_json(app.get(&format!("/api/v1/track-trends/{id}/rmas")).await).await;
    let rmas = body["data"].as_array().unwrap();
    assert_eq!(rmas.len(), 1);
    assert_eq!(rmas[0]["rma_number"], "RMA-100");

    let body = response_json(
        app.get(&format!("/api/v1/tools/{affected}/track-trends"))
            .await,
    )
    .await;
    assert_eq!(body["data"][0]["id"], id);
}

#[tokio::test]
async fn track_trend_records_and_deletion() {
    let app = TestApp::new().await;
    let response = app
        .post("/api/v1/track-trends", json!({ "name": "  " }))
        .await;
    assert_eq!(response.status(), 400);

    let track_trend = app
        .create("/api/v1/track-trends", json!({ "name": "Leak at manifold" }))
        .await;
    let id = track_trend["id"].as_i64().unwrap();

    app.create(
        &format!("/api/v1/track-trends/{id}/comments"),
        json!({ "content": "Second occurrence this month" }),
    )
    .await;
    app.create(
        &format!("/api/v1/track-trends/{id}/attachments"),
        json!({ "file_name": "trend.xlsx", "file_path": "uploads/trend.xlsx" }),
    )
    .await;

    let response = app
        .put(
            &format!("/api/v1/track-trends/{id}"),
            json!({ "description": "Manifold B only" }),
        )
        .await;
    let body = response_json(response).await;
    assert_eq!(body["data"]["description"], "Manifold B only");
    assert_eq!(body["data"]["name"], "Leak at manifold");

    let response = app.delete(&format!("/api/v1/track-trends/{id}")).await;
    assert_eq!(response.status(), 204);
    let response = app.get(&format!("/api/v1/track-trends/{id}/comments")).await;
    assert_eq!(response.status(), 404);
}
