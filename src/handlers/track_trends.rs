use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, put},
    Router,
};

use super::common::{created, AttachmentQuery, Created, IdsRequest};
use crate::{
    entities::{
        attachment,
        comment::{self, OwnerKind},
        rma, track_trend,
    },
    errors::ServiceError,
    services::{
        records::{NewAttachment, NewComment},
        track_trends::{CreateTrackTrendRequest, TrackTrendDetail, UpdateTrackTrendRequest},
    },
    ApiResponse, ApiResult, AppState, ListQuery, PaginatedResponse,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/track-trends",
            get(list_track_trends).post(create_track_trend),
        )
        .route(
            "/track-trends/:id",
            get(get_track_trend)
                .put(update_track_trend)
                .delete(delete_track_trend),
        )
        .route("/track-trends/:id/tools", put(set_tools))
        .route("/track-trends/:id/related", put(set_related))
        .route("/track-trends/:id/available-related", get(available_related))
        .route(
            "/track-trends/:id/comments",
            get(list_comments).post(add_comment),
        )
        .route(
            "/track-trends/:id/attachments",
            get(list_attachments).post(add_attachment),
        )
        .route("/track-trends/:id/rmas", get(list_rmas))
}

pub async fn list_track_trends(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<PaginatedResponse<track_trend::Model>> {
    let (page, limit) = query.clamped();
    let (items, total) = state.services.track_trends.list(page, limit).await?;
    Ok(Json(ApiResponse::success(PaginatedResponse::new(
        items, total, page, limit,
    ))))
}

pub async fn create_track_trend(
    State(state): State<AppState>,
    Json(payload): Json<CreateTrackTrendRequest>,
) -> Result<Created<TrackTrendDetail>, ServiceError> {
    let track_trend = state.services.track_trends.create(payload).await?;
    Ok(created(track_trend))
}

pub async fn get_track_trend(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<TrackTrendDetail> {
    let track_trend = state.services.track_trends.get(id).await?;
    Ok(Json(ApiResponse::success(track_trend)))
}

pub async fn update_track_trend(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateTrackTrendRequest>,
) -> ApiResult<TrackTrendDetail> {
    let track_trend = state.services.track_trends.update(id, payload).await?;
    Ok(Json(ApiResponse::success(track_trend)))
}

pub async fn delete_track_trend(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ServiceError> {
    state.services.track_trends.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn set_tools(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<IdsRequest>,
) -> ApiResult<TrackTrendDetail> {
    let track_trend = state.services.track_trends.set_tools(id, payload.ids).await?;
    Ok(Json(ApiResponse::success(track_trend)))
}

pub async fn set_related(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<IdsRequest>,
) -> ApiResult<TrackTrendDetail> {
    let track_trend = state
        .services
        .track_trends
        .set_related(id, payload.ids)
        .await?;
    Ok(Json(ApiResponse::success(track_trend)))
}

pub async fn available_related(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Vec<track_trend::Model>> {
    let candidates = state.services.track_trends.available_related(id).await?;
    Ok(Json(ApiResponse::success(candidates)))
}

pub async fn list_comments(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Vec<comment::Model>> {
    state.services.track_trends.get_model(id).await?;
    let comments = state
        .services
        .records
        .comments(OwnerKind::TrackTrend, id)
        .await?;
    Ok(Json(ApiResponse::success(comments)))
}

pub async fn add_comment(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<NewComment>,
) -> Result<Created<comment::Model>, ServiceError> {
    state.services.track_trends.get_model(id).await?;
    let comment = state
        .services
        .records
        .add_comment(OwnerKind::TrackTrend, id, payload)
        .await?;
    Ok(created(comment))
}

pub async fn list_attachments(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Query(query): Query<AttachmentQuery>,
) -> ApiResult<Vec<attachment::Model>> {
    let kind = query.kind()?;
    state.services.track_trends.get_model(id).await?;
    let attachments = state
        .services
        .records
        .attachments(OwnerKind::TrackTrend, id, kind)
        .await?;
    Ok(Json(ApiResponse::success(attachments)))
}

pub async fn add_attachment(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<NewAttachment>,
) -> Result<Created<attachment::Model>, ServiceError> {
    state.services.track_trends.get_model(id).await?;
    let attachment = state
        .services
        .records
        .add_attachment(OwnerKind::TrackTrend, id, payload)
        .await?;
    Ok(created(attachment))
}

pub async fn list_rmas(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Vec<rma::Model>> {
    let rmas = state.services.track_trends.rmas(id).await?;
    Ok(Json(ApiResponse::success(rmas)))
}
