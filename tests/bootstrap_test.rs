mod common;

use sea_orm::{ConnectionTrait, DbBackend, Statement};
use serde_json::json;

use common::{response_json, test_config, TestApp};
use pcd_manager::bootstrap;

#[tokio::test]
async fn seeding_a_fresh_database() {
    let app = TestApp::new().await;
    let cfg = test_config();

    let report = bootstrap::seed(app.state.db.clone(), &cfg)
        .await
        .expect("seed");
    assert_eq!(report.users_created, 2);
    assert_eq!(report.tools_created, 41);
    assert!(report.location_created);
    assert!(report.demo_tech_created);
    assert!(report.demo_tech_linked);
    assert!(report.default_location_set);
    assert_eq!(report.passdowns_created, 5);
    assert!(report.failed_steps.is_empty(), "{:?}", report.failed_steps);

    let body = response_json(app.get("/api/v1/tools?tool_type=CHEMBLEND&limit=100").await).await;
    assert_eq!(body["data"]["total"], 17);

    let body = response_json(app.get("/api/v1/locations/default").await).await;
    assert_eq!(body["data"]["resolved_display_name"], "AZ F52");

    let response = app
        .post(
            "/api/v1/auth/verify",
            json!({ "email": "demo.tech@pcd.com", "password": "password123" }),
        )
        .await;
    assert_eq!(response.status(), 200);
    let demo = response_json(response).await["data"].clone();
    assert_eq!(demo["active_tool_id"], demo["assigned_tool_ids"][0]);

    let body = response_json(app.get("/api/v1/passdowns").await).await;
    assert_eq!(body["data"]["total"], 5);
    let demo_tool = demo["active_tool_id"].as_i64().unwrap();
    let body = response_json(app.get(&format!("/api/v1/passdowns?tool_id={demo_tool}")).await).await;
    assert_eq!(body["data"]["total"], 2);

    let second = bootstrap::seed(app.state.db.clone(), &cfg)
        .await
        .expect("second seed");
    assert!(!second.created_anything(), "{second:?}");
    assert_eq!(second.passdowns_created, 0);
}

#[tokio::test]
async fn sample_passdowns_wait_for_an_empty_table() {
    let app = TestApp::new().await;
    app.create(
        "/api/v1/passdowns",
        json!({ "comment": "Existing shift note", "date": "2024-05-01" }),
    )
    .await;

    let report = bootstrap::seed(app.state.db.clone(), &test_config())
        .await
        .expect("seed");
    assert_eq!(report.passdowns_created, 0);
    assert_eq!(report.tools_created, 41);

    let body = response_json(app.get("/api/v1/passdowns").await).await;
    assert_eq!(body["data"]["total"], 1);
}

#[tokio::test]
async fn schema_patch_repairs_legacy_values() {
    let app = TestApp::new().await;
    let db = app.state.db.clone();

    for (name, status, tool_type) in [
        ("LEGACY", "IN_USE", "SLURRY"),
        ("BROKEN", "BOGUS", "WEIRD"),
        ("FINE", "COMPLETED", "CHEMBLEND"),
    ] {
        db.execute(Statement::from_string(
            DbBackend::Sqlite,
            format!(
                "INSERT INTO tools (name, status, tool_type, created_at, updated_at) \
                 VALUES ('{name}', '{status}', '{tool_type}', CURRENT_TIMESTAMP, CURRENT_TIMESTAMP)"
            ),
        ))
        .await
        .expect("insert legacy tool");
    }

    let report = bootstrap::patch_schema(&db).await.expect("patch");
    assert_eq!(report.legacy_statuses_mapped, 1);
    assert_eq!(report.unknown_statuses_reset, 1);
    assert_eq!(report.tool_types_reset, 1);
    assert!(!report.passdown_comment_widened);

    let rows = db
        .query_all(Statement::from_string(
            DbBackend::Sqlite,
            "SELECT name, status, tool_type FROM tools ORDER BY id".to_string(),
        ))
        .await
        .expect("select tools");
    let values: Vec<(String, String, String)> = rows
        .iter()
        .map(|row| {
            (
                row.try_get("", "name").unwrap(),
                row.try_get("", "status").unwrap(),
                row.try_get("", "tool_type").unwrap(),
            )
        })
        .collect();
    assert_eq!(
        values,
        vec![
            ("LEGACY".into(), "IN_PROGRESS".into(), "SLURRY".into()),
            ("BROKEN".into(), "NOT_STARTED".into(), "SLURRY".into()),
            ("FINE".into(), "COMPLETED".into(), "CHEMBLEND".into()),
        ]
    );

    // Repaired rows decode through the API again
    let body = response_json(app.get("/api/v1/tools").await).await;
    assert_eq!(body["data"]["total"], 3);

    let again = bootstrap::patch_schema(&db).await.expect("second patch");
    assert_eq!(again.changed_rows(), 0);
}
