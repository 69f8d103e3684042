use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post, put},
    Router,
};

use super::common::{created, Created, IdsRequest};
use crate::{
    entities::user,
    errors::ServiceError,
    services::users::{CreateUserRequest, UpdateUserRequest, UserDetail, VerifyCredentialsRequest},
    ApiResponse, ApiResult, AppState, ListQuery, PaginatedResponse,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route(
            "/users/:id",
            get(get_user).put(update_user).delete(delete_user),
        )
        .route("/users/:id/assigned-tools", put(set_assigned_tools))
        .route("/auth/verify", post(verify_credentials))
}

pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<PaginatedResponse<user::Model>> {
    let (page, limit) = query.clamped();
    let (items, total) = state.services.users.list(page, limit).await?;
    Ok(Json(ApiResponse::success(PaginatedResponse::new(
        items, total, page, limit,
    ))))
}

pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<Created<UserDetail>, ServiceError> {
    let user = state.services.users.create(payload).await?;
    Ok(created(user))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<UserDetail> {
    let user = state.services.users.get(id).await?;
    Ok(Json(ApiResponse::success(user)))
}

pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateUserRequest>,
) -> ApiResult<UserDetail> {
    let user = state.services.users.update(id, payload).await?;
    Ok(Json(ApiResponse::success(user)))
}

pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ServiceError> {
    state.services.users.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn set_assigned_tools(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<IdsRequest>,
) -> ApiResult<UserDetail> {
    let user = state
        .services
        .users
        .set_assigned_tools(id, payload.ids)
        .await?;
    Ok(Json(ApiResponse::success(user)))
}

/// Credential check used by the front end at sign-in. No session is issued.
pub async fn verify_credentials(
    State(state): State<AppState>,
    Json(payload): Json<VerifyCredentialsRequest>,
) -> ApiResult<UserDetail> {
    let user = state.services.users.verify(payload).await?;
    Ok(Json(ApiResponse::success(user)))
}
