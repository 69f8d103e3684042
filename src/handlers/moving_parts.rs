use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};

use super::common::{created, Created};
use crate::{
    errors::ServiceError,
    services::moving_parts::{
        AddDestinationRequest, CreateMovingPartRequest, LinkTrackTrendRequest, MovementPath,
        MovingPartView, UpdateMovingPartRequest,
    },
    ApiResponse, ApiResult, AppState, ListQuery, PaginatedResponse,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/moving-parts",
            get(list_moving_parts).post(create_moving_part),
        )
        .route(
            "/moving-parts/:id",
            get(get_moving_part)
                .put(update_moving_part)
                .delete(delete_moving_part),
        )
        .route("/moving-parts/:id/destinations", post(add_destination))
        .route("/moving-parts/:id/track-trend", post(link_track_trend))
        .route("/moving-parts/:id/path", get(movement_path))
}

pub async fn list_moving_parts(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<PaginatedResponse<MovingPartView>> {
    let (page, limit) = query.clamped();
    let (items, total) = state.services.moving_parts.list(page, limit).await?;
    Ok(Json(ApiResponse::success(PaginatedResponse::new(
        items, total, page, limit,
    ))))
}

pub async fn create_moving_part(
    State(state): State<AppState>,
    Json(payload): Json<CreateMovingPartRequest>,
) -> Result<Created<MovingPartView>, ServiceError> {
    let moving_part = state.services.moving_parts.create(payload).await?;
    Ok(created(moving_part))
}

pub async fn get_moving_part(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<MovingPartView> {
    let moving_part = state.services.moving_parts.get(id).await?;
    Ok(Json(ApiResponse::success(moving_part)))
}

pub async fn update_moving_part(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateMovingPartRequest>,
) -> ApiResult<MovingPartView> {
    let moving_part = state.services.moving_parts.update(id, payload).await?;
    Ok(Json(ApiResponse::success(moving_part)))
}

pub async fn delete_moving_part(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ServiceError> {
    state.services.moving_parts.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn add_destination(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<AddDestinationRequest>,
) -> ApiResult<MovingPartView> {
    let moving_part = state
        .services
        .moving_parts
        .add_destination(id, payload.tool_id)
        .await?;
    Ok(Json(ApiResponse::success(moving_part)))
}

pub async fn link_track_trend(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<LinkTrackTrendRequest>,
) -> ApiResult<MovingPartView> {
    let moving_part = state
        .services
        .moving_parts
        .link_track_trend(id, payload.track_trend_id)
        .await?;
    Ok(Json(ApiResponse::success(moving_part)))
}

pub async fn movement_path(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<MovementPath> {
    let path = state.services.moving_parts.path(id).await?;
    Ok(Json(ApiResponse::success(path)))
}
