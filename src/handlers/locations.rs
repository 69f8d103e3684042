use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};

use super::common::{created, Created};
use crate::{
    entities::custom_location,
    errors::ServiceError,
    services::locations::{
        CreateLocationRequest, CustomLocationRequest, CustomLocationView, LocationView,
        UpdateCustomLocationRequest, UpdateLocationRequest,
    },
    ApiResponse, ApiResult, AppState, ListQuery, PaginatedResponse,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/locations", get(list_locations).post(create_location))
        .route("/locations/default", get(get_default_location))
        .route(
            "/locations/:id",
            get(get_location)
                .put(update_location)
                .delete(delete_location),
        )
        .route("/locations/:id/default", post(set_default_location))
        .route(
            "/locations/:id/custom-locations",
            get(list_custom_locations).post(find_or_create_custom_location),
        )
        .route(
            "/custom-locations/:id",
            get(get_custom_location)
                .put(update_custom_location)
                .delete(delete_custom_location),
        )
}

pub async fn list_locations(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<PaginatedResponse<LocationView>> {
    let (page, limit) = query.clamped();
    let (items, total) = state.services.locations.list(page, limit).await?;
    Ok(Json(ApiResponse::success(PaginatedResponse::new(
        items, total, page, limit,
    ))))
}

pub async fn create_location(
    State(state): State<AppState>,
    Json(payload): Json<CreateLocationRequest>,
) -> Result<Created<LocationView>, ServiceError> {
    let location = state.services.locations.create(payload).await?;
    Ok(created(location))
}

pub async fn get_location(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<LocationView> {
    let location = state.services.locations.get(id).await?;
    Ok(Json(ApiResponse::success(location)))
}

pub async fn get_default_location(State(state): State<AppState>) -> ApiResult<LocationView> {
    let location = state
        .services
        .locations
        .get_default()
        .await?
        .ok_or_else(|| ServiceError::NotFound("No default location is set".to_string()))?;
    Ok(Json(ApiResponse::success(location)))
}

pub async fn update_location(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateLocationRequest>,
) -> ApiResult<LocationView> {
    let location = state.services.locations.update(id, payload).await?;
    Ok(Json(ApiResponse::success(location)))
}

pub async fn delete_location(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ServiceError> {
    state.services.locations.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn set_default_location(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<LocationView> {
    let location = state.services.locations.set_default(id).await?;
    Ok(Json(ApiResponse::success(location)))
}

pub async fn list_custom_locations(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Vec<CustomLocationView>> {
    let custom_locations = state.services.locations.custom_locations(id).await?;
    Ok(Json(ApiResponse::success(custom_locations)))
}

/// 201 when the custom location was created, 200 when an existing one matched
pub async fn find_or_create_custom_location(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<CustomLocationRequest>,
) -> Result<Response, ServiceError> {
    let (custom_location, was_created): (custom_location::Model, bool) = state
        .services
        .locations
        .find_or_create_custom_location(id, payload)
        .await?;
    let status = if was_created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(ApiResponse::success(custom_location))).into_response())
}

pub async fn get_custom_location(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<CustomLocationView> {
    let custom_location = state.services.locations.get_custom_location(id).await?;
    Ok(Json(ApiResponse::success(custom_location)))
}

pub async fn update_custom_location(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateCustomLocationRequest>,
) -> ApiResult<CustomLocationView> {
    let custom_location = state
        .services
        .locations
        .update_custom_location(id, payload)
        .await?;
    Ok(Json(ApiResponse::success(custom_location)))
}

pub async fn delete_custom_location(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ServiceError> {
    state.services.locations.delete_custom_location(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
