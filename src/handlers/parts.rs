use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Deserialize;

use super::common::{created, Created};
use crate::{
    clamp_page,
    entities::part,
    errors::ServiceError,
    services::parts::{
        CreatePartRequest, MovementRecorded, RecordMovementRequest, UpdatePartRequest,
    },
    ApiResponse, ApiResult, AppState, PaginatedResponse,
};

#[derive(Debug, Default, Deserialize)]
pub struct PartListQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub search: Option<String>,
    pub location_id: Option<i32>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/parts", get(list_parts).post(create_part))
        .route(
            "/parts/:id",
            get(get_part).put(update_part).delete(delete_part),
        )
        .route("/parts/:id/movements", post(record_movement))
}

pub async fn list_parts(
    State(state): State<AppState>,
    Query(query): Query<PartListQuery>,
) -> ApiResult<PaginatedResponse<part::Model>> {
    let (page, limit) = clamp_page(query.page, query.limit);
    let search = query.search.filter(|term| !term.trim().is_empty());
    let (items, total) = state
        .services
        .parts
        .list(search, query.location_id, page, limit)
        .await?;
    Ok(Json(ApiResponse::success(PaginatedResponse::new(
        items, total, page, limit,
    ))))
}

pub async fn create_part(
    State(state): State<AppState>,
    Json(payload): Json<CreatePartRequest>,
) -> Result<Created<part::Model>, ServiceError> {
    let part = state.services.parts.create(payload).await?;
    Ok(created(part))
}

pub async fn get_part(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<part::Model> {
    let part = state.services.parts.get(id).await?;
    Ok(Json(ApiResponse::success(part)))
}

pub async fn update_part(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdatePartRequest>,
) -> ApiResult<part::Model> {
    let part = state.services.parts.update(id, payload).await?;
    Ok(Json(ApiResponse::success(part)))
}

pub async fn delete_part(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ServiceError> {
    state.services.parts.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn record_movement(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<RecordMovementRequest>,
) -> Result<Created<MovementRecorded>, ServiceError> {
    let recorded = state.services.parts.record_movement(id, payload).await?;
    Ok(created(recorded))
}
