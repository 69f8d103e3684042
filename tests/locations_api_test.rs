mod common;

use serde_json::json;

use common::{response_json, TestApp};

#[tokio::test]
async fn location_display_name_and_default() {
    let app = TestApp::new().await;

    let arizona = app
        .create(
            "/api/v1/locations",
            json!({ "state": "Arizona", "fab": "52", "default_location": true }),
        )
        .await;
    assert_eq!(arizona["resolved_display_name"], "AZ F52");
    assert_eq!(arizona["default_location"], true);

    let ireland = app
        .create(
            "/api/v1/locations",
            json!({ "state": "Ireland", "fab": "24", "display_name": "Leixlip" }),
        )
        .await;
    assert_eq!(ireland["resolved_display_name"], "Leixlip");
    let ireland_id = ireland["id"].as_i64().unwrap();

    // Moving the default clears it from the previous location
    let response = app
        .post(&format!("/api/v1/locations/{ireland_id}/default"), json!({}))
        .await;
    assert_eq!(response.status(), 200);

    let body = response_json(app.get("/api/v1/locations/default").await).await;
    assert_eq!(body["data"]["id"], ireland_id);

    let arizona_id = arizona["id"].as_i64().unwrap();
    let body = response_json(app.get(&format!("/api/v1/locations/{arizona_id}")).await).await;
    assert_eq!(body["data"]["default_location"], false);

    let body = response_json(app.get("/api/v1/locations").await).await;
    assert_eq!(body["data"]["total"], 2);
}

#[tokio::test]
async fn default_location_is_404_when_unset() {
    let app = TestApp::new().await;
    app.create_location("Arizona", "52").await;

    let response = app.get("/api/v1/locations/default").await;
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn custom_locations_are_found_or_created_case_insensitively() {
    let app = TestApp::new().await;
    let location_id = app.create_location("Arizona", "52").await;
    let uri = format!("/api/v1/locations/{location_id}/custom-locations");

    let response = app.post(&uri, json!({ "name": "Bench A" })).await;
    assert_eq!(response.status(), 201);
    let created = response_json(response).await["data"].clone();
    assert_eq!(created["description"], "Auto-created custom location");

    let response = app.post(&uri, json!({ "name": "bench a" })).await;
    assert_eq!(response.status(), 200);
    let found = response_json(response).await["data"].clone();
    assert_eq!(found["id"], created["id"]);

    let second = app.create(&uri, json!({ "name": "Cage" })).await;
    let second_id = second["id"].as_i64().unwrap();

    // Renaming onto an existing name conflicts
    let response = app
        .put(
            &format!("/api/v1/custom-locations/{second_id}"),
            json!({ "name": "BENCH A" }),
        )
        .await;
    assert_eq!(response.status(), 409);

    let body = response_json(app.get(&uri).await).await;
    let names: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|custom| custom["name"].as_str().unwrap())
        .collect();
    assert_eq!(names.len(), 2);
    assert!(names.contains(&"Bench A"));
    assert!(names.contains(&"Cage"));

    let response = app
        .delete(&format!("/api/v1/custom-locations/{second_id}"))
        .await;
    assert_eq!(response.status(), 204);
}

#[tokio::test]
async fn location_requires_a_state() {
    let app = TestApp::new().await;
    let response = app
        .post("/api/v1/locations", json!({ "state": "", "fab": "52" }))
        .await;
    assert_eq!(response.status(), 400);

    let response = app.get("/api/v1/locations/999").await;
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn blank_state_on_update_is_rejected() {
    let app = TestApp::new().await;
    let location_id = app.create_location("Arizona", "52").await;

    let response = app
        .put(
            &format!("/api/v1/locations/{location_id}"),
            json!({ "state": "   " }),
        )
        .await;
    assert_eq!(response.status(), 400);

    let body = response_json(app.get(&format!("/api/v1/locations/{location_id}")).await).await;
    assert_eq!(body["data"]["state"], "Arizona");
}

#[tokio::test]
async fn only_one_fabless_location_per_state() {
    let app = TestApp::new().await;
    app.create("/api/v1/locations", json!({ "state": "Oregon" }))
        .await;

    let response = app
        .post("/api/v1/locations", json!({ "state": "Oregon", "fab": "  " }))
        .await;
    assert_eq!(response.status(), 409);

    // A fab of its own keeps the second row distinct until the fab is cleared
    let hillsboro = app
        .create("/api/v1/locations", json!({ "state": "Oregon", "fab": "20" }))
        .await;
    let hillsboro_id = hillsboro["id"].as_i64().unwrap();
    let response = app
        .put(
            &format!("/api/v1/locations/{hillsboro_id}"),
            json!({ "fab": "" }),
        )
        .await;
    assert_eq!(response.status(), 409);

    // Updating the fab-less row itself is fine
    let body = response_json(app.get("/api/v1/locations").await).await;
    let oregon_id = body["data"]["items"]
        .as_array()
        .unwrap()
        .iter()
        .find(|location| location["fab"].is_null())
        .map(|location| location["id"].as_i64().unwrap())
        .unwrap();
    let response = app
        .put(
            &format!("/api/v1/locations/{oregon_id}"),
            json!({ "notes": "Sort site" }),
        )
        .await;
    assert_eq!(response.status(), 200);

    let body = response_json(app.get("/api/v1/locations").await).await;
    assert_eq!(body["data"]["total"], 2);
}
