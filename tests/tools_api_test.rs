mod common;

use serde_json::json;

use common::{response_json, TestApp};

#[tokio::test]
async fn tool_status_follows_the_checklist() {
    let app = TestApp::new().await;
    let location_id = app.create_location("Arizona", "52").await;

    let tool = app
        .create(
            "/api/v1/tools",
            json!({
                "name": "RR151D",
                "tool_type": "SLURRY",
                "location_id": location_id,
                "checklist": [{ "item": "commission", "completed": true }]
            }),
        )
        .await;
    assert_eq!(tool["status"], "IN_PROGRESS");
    assert_eq!(tool["calculated_status"], "IN_PROGRESS");
    assert_eq!(tool["location_name"], "AZ F52");
    assert_eq!(tool["location_display_name"], "AZ F52");
    let tool_id = tool["id"].as_i64().unwrap();

    // Items outside the counted set are recorded without moving the status
    let response = app
        .put(
            &format!("/api/v1/tools/{tool_id}"),
            json!({ "checklist": [
                { "item": "commission", "completed": false },
                { "item": "sl2", "completed": true }
            ] }),
        )
        .await;
    assert_eq!(response.status(), 200);
    let body = response_json(response).await;
    assert_eq!(body["data"]["status"], "NOT_STARTED");
    assert_eq!(body["data"]["sl2_completed"], true);

    let counted = [
        "commission",
        "pre_sl1",
        "sl1",
        "mechanical_pre_sl1",
        "mechanical_post_sl1",
        "specific_input_functionality",
        "modes_of_operation",
        "specific_soos",
        "field_service_report",
        "certificate_of_approval",
        "turned_over_to_customer",
        "start_up_sl03",
    ];
    let checklist: Vec<_> = counted
        .iter()
        .map(|item| json!({ "item": item, "date": "2024-05-01" }))
        .collect();
    let response = app
        .put(
            &format!("/api/v1/tools/{tool_id}"),
            json!({ "checklist": checklist }),
        )
        .await;
    let body = response_json(response).await;
    assert_eq!(body["data"]["status"], "COMPLETED");
    assert_eq!(body["data"]["completed_checklist_items"], 12);
}

#[tokio::test]
async fn tool_listing_filters() {
    let app = TestApp::new().await;
    app.create(
        "/api/v1/tools",
        json!({ "name": "AH151", "tool_type": "CHEMBLEND" }),
    )
    .await;
    app.create(
        "/api/v1/tools",
        json!({
            "name": "RZ151D",
            "tool_type": "SLURRY",
            "checklist": [{ "item": "sl1", "completed": true }]
        }),
    )
    .await;

    let body = response_json(app.get("/api/v1/tools?status=in_progress").await).await;
    assert_eq!(body["data"]["total"], 1);
    assert_eq!(body["data"]["items"][0]["name"], "RZ151D");

    let body = response_json(app.get("/api/v1/tools?tool_type=chemblend").await).await;
    assert_eq!(body["data"]["total"], 1);
    assert_eq!(body["data"]["items"][0]["name"], "AH151");

    let body = response_json(app.get("/api/v1/tools?search=rz1").await).await;
    assert_eq!(body["data"]["total"], 1);

    let response = app.get("/api/v1/tools?status=BROKEN").await;
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn technicians_and_tags_replace_the_whole_set() {
    let app = TestApp::new().await;
    let tool_id = app.create_tool("WK151D").await;
    let user = app
        .create(
            "/api/v1/users",
            json!({ "email": "tech1@pcd.com", "password": "secret", "name": "Tech One" }),
        )
        .await;
    let user_id = user["id"].as_i64().unwrap();

    let response = app
        .put(
            &format!("/api/v1/tools/{tool_id}/technicians"),
            json!({ "ids": [user_id, 9999] }),
        )
        .await;
    assert_eq!(response.status(), 400);
    let body = response_json(response).await;
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("User with ID 9999 does not exist"));

    let response = app
        .put(
            &format!("/api/v1/tools/{tool_id}/technicians"),
            json!({ "ids": [user_id] }),
        )
        .await;
    let body = response_json(response).await;
    assert_eq!(body["data"]["technician_ids"], json!([user_id]));

    let response = app
        .put(
            &format!("/api/v1/tools/{tool_id}/tags"),
            json!({ "tags": ["hot", "priority"] }),
        )
        .await;
    let body = response_json(response).await;
    let tags = body["data"]["tags"].as_array().unwrap();
    assert_eq!(tags.len(), 2);

    let response = app
        .put(&format!("/api/v1/tools/{tool_id}/tags"), json!({ "tags": [] }))
        .await;
    let body = response_json(response).await;
    assert_eq!(body["data"]["tags"], json!([]));
}

#[tokio::test]
async fn unknown_technician_leaves_no_tool_behind() {
    let app = TestApp::new().await;
    let response = app
        .post(
            "/api/v1/tools",
            json!({ "name": "X1", "technician_ids": [999] }),
        )
        .await;
    assert_eq!(response.status(), 400);
    let body = response_json(response).await;
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("User with ID 999 does not exist"));

    let body = response_json(app.get("/api/v1/tools").await).await;
    assert_eq!(body["data"]["total"], 0);
}

#[tokio::test]
async fn comments_and_attachments_go_with_the_tool() {
    let app = TestApp::new().await;
    let tool_id = app.create_tool("JP151D").await;

    let comment = app
        .create(
            &format!("/api/v1/tools/{tool_id}/comments"),
            json!({ "content": "Leak check passed" }),
        )
        .await;
    assert_eq!(comment["system_generated"], false);

    let response = app
        .post(
            &format!("/api/v1/tools/{tool_id}/comments"),
            json!({ "content": "   " }),
        )
        .await;
    assert_eq!(response.status(), 400);

    app.create(
        &format!("/api/v1/tools/{tool_id}/attachments"),
        json!({ "file_name": "front.JPG", "file_path": "uploads/front.jpg" }),
    )
    .await;
    let document = app
        .create(
            &format!("/api/v1/tools/{tool_id}/attachments"),
            json!({ "file_name": "report.pdf", "file_path": "uploads/report.pdf" }),
        )
        .await;
    assert_eq!(document["kind"], "DOCUMENT");

    let body = response_json(
        app.get(&format!("/api/v1/tools/{tool_id}/attachments?kind=picture"))
            .await,
    )
    .await;
    let pictures = body["data"].as_array().unwrap();
    assert_eq!(pictures.len(), 1);
    assert_eq!(pictures[0]["file_name"], "front.JPG");

    let document_id = document["id"].as_i64().unwrap();
    let response = app
        .delete(&format!("/api/v1/attachments/{document_id}"))
        .await;
    assert_eq!(response.status(), 204);

    let response = app.delete(&format!("/api/v1/tools/{tool_id}")).await;
    assert_eq!(response.status(), 204);
    let response = app.get(&format!("/api/v1/tools/{tool_id}/comments")).await;
    assert_eq!(response.status(), 404);
    let response = app.get(&format!("/api/v1/tools/{tool_id}")).await;
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn part_movements_adjust_stock() {
    let app = TestApp::new().await;
    let tool_id = app.create_tool("HG151D").await;
    let part = app
        .create(
            "/api/v1/parts",
            json!({ "name": "Pump seal", "part_number": "PS-100", "quantity": 3 }),
        )
        .await;
    let part_id = part["id"].as_i64().unwrap();

    let recorded = app
        .create(
            &format!("/api/v1/parts/{part_id}/movements"),
            json!({ "tool_id": tool_id, "movement_type": "REMOVED", "quantity": 5 }),
        )
        .await;
    assert_eq!(recorded["part"]["quantity"], 0);
    // History keeps the requested amount even when stock clamps
    assert_eq!(recorded["movement"]["quantity"], 5);

    let recorded = app
        .create(
            &format!("/api/v1/parts/{part_id}/movements"),
            json!({ "tool_id": tool_id, "movement_type": "ADDED" }),
        )
        .await;
    assert_eq!(recorded["part"]["quantity"], 1);
    assert_eq!(recorded["movement"]["quantity"], 1);

    let response = app
        .post(
            &format!("/api/v1/parts/{part_id}/movements"),
            json!({ "tool_id": 4242, "movement_type": "ADDED" }),
        )
        .await;
    assert_eq!(response.status(), 400);

    let body = response_json(
        app.get(&format!("/api/v1/tools/{tool_id}/part-movements"))
            .await,
    )
    .await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let body = response_json(app.get("/api/v1/parts?search=ps-1").await).await;
    assert_eq!(body["data"]["total"], 1);
}
