mod common;

use serde_json::json;

use common::{response_json, TestApp};

#[tokio::test]
async fn destination_chain_and_path() {
    let app = TestApp::new().await;
    let from = app.create_tool("FROM").await;
    let a = app.create_tool("A").await;
    let b = app.create_tool("B").await;

    let moving_part = app
        .create(
            "/api/v1/moving-parts",
            json!({
                "part_name": "Flow meter",
                "from_tool_id": from,
                "destination_tool_ids": [a, b]
            }),
        )
        .await;
    assert_eq!(moving_part["to_tool_id"], b);
    assert_eq!(moving_part["destination_tool_ids"], json!([a, b]));
    let id = moving_part["id"].as_i64().unwrap();

    let body = response_json(app.get(&format!("/api/v1/moving-parts/{id}/path")).await).await;
    assert_eq!(body["data"]["path"], "FROM → A → B");
    assert_eq!(body["data"]["destinations"].as_array().unwrap().len(), 2);

    let c = app.create_tool("C").await;
    let response = app
        .post(
            &format!("/api/v1/moving-parts/{id}/destinations"),
            json!({ "tool_id": c }),
        )
        .await;
    let body = response_json(response).await;
    assert_eq!(body["data"]["destination_tool_ids"], json!([a, b, c]));
    assert_eq!(body["data"]["to_tool_id"], c);

    // Any hop in the chain finds the part
    for tool_id in [from, a, c] {
        let body = response_json(
            app.get(&format!("/api/v1/tools/{tool_id}/moving-parts"))
                .await,
        )
        .await;
        assert_eq!(body["data"][0]["id"], id, "tool {tool_id}");
    }
    let unrelated = app.create_tool("D").await;
    let body = response_json(
        app.get(&format!("/api/v1/tools/{unrelated}/moving-parts"))
            .await,
    )
    .await;
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn update_replaces_the_chain() {
    let app = TestApp::new().await;
    let a = app.create_tool("A").await;
    let moving_part = app
        .create(
            "/api/v1/moving-parts",
            json!({ "part_name": "Valve", "destination_tool_ids": [a], "notes": "first" }),
        )
        .await;
    let id = moving_part["id"].as_i64().unwrap();

    let response = app
        .put(
            &format!("/api/v1/moving-parts/{id}"),
            json!({ "part_name": "Valve body", "destination_tool_ids": [] }),
        )
        .await;
    assert_eq!(response.status(), 200);
    let body = response_json(response).await;
    assert_eq!(body["data"]["part_name"], "Valve body");
    assert_eq!(body["data"]["destination_tool_ids"], json!([]));
    assert!(body["data"]["to_tool_id"].is_null());
    assert!(body["data"]["notes"].is_null());

    let body = response_json(app.get(&format!("/api/v1/moving-parts/{id}/path")).await).await;
    assert_eq!(body["data"]["path"], "Unknown");
}

#[tokio::test]
async fn unknown_references_are_rejected() {
    let app = TestApp::new().await;

    let response = app
        .post(
            "/api/v1/moving-parts",
            json!({ "part_name": "Valve", "destination_tool_ids": [404] }),
        )
        .await;
    assert_eq!(response.status(), 400);

    let response = app
        .post(
            "/api/v1/moving-parts",
            json!({ "part_name": "Valve", "linked_track_trend_id": 12 }),
        )
        .await;
    assert_eq!(response.status(), 400);

    let response = app
        .post("/api/v1/moving-parts", json!({ "part_name": "" }))
        .await;
    assert_eq!(response.status(), 400);

    let response = app.get("/api/v1/moving-parts/55/path").await;
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn linking_a_track_trend_leaves_a_system_comment() {
    let app = TestApp::new().await;
    let track_trend = app
        .create("/api/v1/track-trends", json!({ "name": "Pump cavitation" }))
        .await;
    let track_trend_id = track_trend["id"].as_i64().unwrap();
    let moving_part = app
        .create("/api/v1/moving-parts", json!({ "part_name": "Impeller" }))
        .await;
    let id = moving_part["id"].as_i64().unwrap();

    let response = app
        .post(
            &format!("/api/v1/moving-parts/{id}/track-trend"),
            json!({ "track_trend_id": track_trend_id }),
        )
        .await;
    let body = response_json(response).await;
    assert_eq!(body["data"]["linked_track_trend_id"], track_trend_id);

    let body = response_json(
        app.get(&format!("/api/v1/track-trends/{track_trend_id}/comments"))
            .await,
    )
    .await;
    let comments = body["data"].as_array().unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0]["system_generated"], true);
    assert!(comments[0]["content"]
        .as_str()
        .unwrap()
        .contains("linked to this track & trend"));
}
