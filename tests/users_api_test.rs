mod common;

use sea_orm::{ConnectionTrait, DbBackend, Statement};
use serde_json::json;

use common::{response_json, TestApp};

async fn stored_password(app: &TestApp, user_id: i64) -> String {
    let row = app
        .state
        .db
        .query_one(Statement::from_sql_and_values(
            DbBackend::Sqlite,
            "SELECT password FROM users WHERE id = ?",
            [user_id.into()],
        ))
        .await
        .unwrap()
        .unwrap();
    row.try_get("", "password").unwrap()
}

#[tokio::test]
async fn user_creation_normalizes_and_hides_the_password() {
    let app = TestApp::new().await;
    let user = app
        .create(
            "/api/v1/users",
            json!({
                "email": "Jane.Doe@PCD.com",
                "password": "s3cret",
                "name": "Jane Doe",
                "role": "ADMIN"
            }),
        )
        .await;
    assert_eq!(user["email"], "jane.doe@pcd.com");
    assert_eq!(user["first_name"], "Jane");
    assert_eq!(user["last_name"], "Doe");
    assert_eq!(user["roles"], "ADMIN");
    assert_eq!(user["active"], true);
    assert!(user.get("password").is_none());

    let response = app
        .post(
            "/api/v1/users",
            json!({ "email": "jane.doe@pcd.com", "password": "other" }),
        )
        .await;
    assert_eq!(response.status(), 409);

    let response = app
        .post(
            "/api/v1/users",
            json!({ "email": "not-an-email", "password": "x" }),
        )
        .await;
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn credential_checks() {
    let app = TestApp::new().await;
    let user = app
        .create(
            "/api/v1/users",
            json!({ "email": "tech@pcd.com", "password": "right-pass", "name": "Tech" }),
        )
        .await;
    let user_id = user["id"].as_i64().unwrap();

    let response = app
        .post(
            "/api/v1/auth/verify",
            json!({ "email": "TECH@pcd.com", "password": "right-pass" }),
        )
        .await;
    assert_eq!(response.status(), 200);
    let body = response_json(response).await;
    assert_eq!(body["data"]["id"], user_id);

    let response = app
        .post(
            "/api/v1/auth/verify",
            json!({ "email": "tech@pcd.com", "password": "wrong-pass" }),
        )
        .await;
    assert_eq!(response.status(), 401);

    let response = app
        .post(
            "/api/v1/auth/verify",
            json!({ "email": "nobody@pcd.com", "password": "right-pass" }),
        )
        .await;
    assert_eq!(response.status(), 401);

    app.put(&format!("/api/v1/users/{user_id}"), json!({ "active": false }))
        .await;
    let response = app
        .post(
            "/api/v1/auth/verify",
            json!({ "email": "tech@pcd.com", "password": "right-pass" }),
        )
        .await;
    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn blank_password_on_update_keeps_the_old_one() {
    let app = TestApp::new().await;
    let user = app
        .create(
            "/api/v1/users",
            json!({ "email": "lead@pcd.com", "password": "keep-me" }),
        )
        .await;
    let user_id = user["id"].as_i64().unwrap();

    let response = app
        .put(
            &format!("/api/v1/users/{user_id}"),
            json!({ "password": "  ", "first_name": "Lee", "last_name": "Ng" }),
        )
        .await;
    assert_eq!(response.status(), 200);

    let response = app
        .post(
            "/api/v1/auth/verify",
            json!({ "email": "lead@pcd.com", "password": "keep-me" }),
        )
        .await;
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn active_tool_counts_as_assigned() {
    let app = TestApp::new().await;
    let active_tool = app.create_tool("RR151D").await;
    let other_tool = app.create_tool("RZ151D").await;
    let user = app
        .create(
            "/api/v1/users",
            json!({ "email": "field@pcd.com", "password": "pw", "active_tool_id": active_tool }),
        )
        .await;
    assert_eq!(user["assigned_tool_ids"], json!([active_tool]));
    let user_id = user["id"].as_i64().unwrap();

    let response = app
        .put(
            &format!("/api/v1/users/{user_id}/assigned-tools"),
            json!({ "ids": [other_tool] }),
        )
        .await;
    let body = response_json(response).await;
    let assigned = body["data"]["assigned_tool_ids"].as_array().unwrap();
    assert_eq!(assigned.len(), 2);
    assert!(assigned.contains(&json!(active_tool)));
    assert!(assigned.contains(&json!(other_tool)));

    let response = app
        .put(
            &format!("/api/v1/users/{user_id}/assigned-tools"),
            json!({ "ids": [8080] }),
        )
        .await;
    assert_eq!(response.status(), 400);

    let response = app.delete(&format!("/api/v1/users/{user_id}")).await;
    assert_eq!(response.status(), 204);
}

#[tokio::test]
async fn imported_bcrypt_password_is_upgraded_on_verify() {
    let app = TestApp::new().await;
    let user = app
        .create(
            "/api/v1/users",
            json!({ "email": "old.admin@pcd.com", "password": "placeholder" }),
        )
        .await;
    let user_id = user["id"].as_i64().unwrap();

    // Accounts carried over from the old system hold $2a$ BCrypt hashes
    let imported = bcrypt::hash("admin123", 4)
        .unwrap()
        .replacen("$2b$", "$2a$", 1);
    app.state
        .db
        .execute(Statement::from_sql_and_values(
            DbBackend::Sqlite,
            "UPDATE users SET password = ? WHERE id = ?",
            [imported.into(), user_id.into()],
        ))
        .await
        .unwrap();

    let response = app
        .post(
            "/api/v1/auth/verify",
            json!({ "email": "old.admin@pcd.com", "password": "wrong" }),
        )
        .await;
    assert_eq!(response.status(), 401);
    assert!(stored_password(&app, user_id).await.starts_with("$2a$"));

    let response = app
        .post(
            "/api/v1/auth/verify",
            json!({ "email": "old.admin@pcd.com", "password": "admin123" }),
        )
        .await;
    assert_eq!(response.status(), 200);
    assert!(stored_password(&app, user_id).await.starts_with("$argon2id$"));

    let response = app
        .post(
            "/api/v1/auth/verify",
            json!({ "email": "old.admin@pcd.com", "password": "admin123" }),
        )
        .await;
    assert_eq!(response.status(), 200);
}
