use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use chrono::NaiveDate;
use serde::Deserialize;

use super::common::{created, AttachmentQuery, Created};
use crate::{
    clamp_page,
    entities::{attachment, comment::OwnerKind, passdown},
    errors::ServiceError,
    services::{
        passdowns::{CreatePassdownRequest, PassdownDetail, PassdownQuery, UpdatePassdownRequest},
        records::NewAttachment,
    },
    ApiResponse, ApiResult, AppState, PaginatedResponse,
};

#[derive(Debug, Default, Deserialize)]
pub struct PassdownListQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub date: Option<NaiveDate>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub tool_id: Option<i32>,
    pub recent: Option<u64>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/passdowns", get(list_passdowns).post(create_passdown))
        .route(
            "/passdowns/:id",
            get(get_passdown)
                .put(update_passdown)
                .delete(delete_passdown),
        )
        .route(
            "/passdowns/:id/attachments",
            get(list_attachments).post(add_attachment),
        )
}

pub async fn list_passdowns(
    State(state): State<AppState>,
    Query(query): Query<PassdownListQuery>,
) -> ApiResult<PaginatedResponse<passdown::Model>> {
    let (page, limit) = match query.recent {
        Some(recent) => (1, recent.clamp(1, 100)),
        None => clamp_page(query.page, query.limit),
    };
    let filter = PassdownQuery {
        date: query.date,
        start: query.start,
        end: query.end,
        tool_id: query.tool_id,
        recent: query.recent,
    };
    let (items, total) = state.services.passdowns.list(filter, page, limit).await?;
    Ok(Json(ApiResponse::success(PaginatedResponse::new(
        items, total, page, limit,
    ))))
}

pub async fn create_passdown(
    State(state): State<AppState>,
    Json(payload): Json<CreatePassdownRequest>,
) -> Result<Created<PassdownDetail>, ServiceError> {
    let passdown = state.services.passdowns.create(payload).await?;
    Ok(created(passdown))
}

pub async fn get_passdown(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<PassdownDetail> {
    let passdown = state.services.passdowns.get(id).await?;
    Ok(Json(ApiResponse::success(passdown)))
}

pub async fn update_passdown(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdatePassdownRequest>,
) -> ApiResult<PassdownDetail> {
    let passdown = state.services.passdowns.update(id, payload).await?;
    Ok(Json(ApiResponse::success(passdown)))
}

pub async fn delete_passdown(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ServiceError> {
    state.services.passdowns.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_attachments(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Query(query): Query<AttachmentQuery>,
) -> ApiResult<Vec<attachment::Model>> {
    let kind = query.kind()?;
    state.services.passdowns.get_model(id).await?;
    let attachments = state
        .services
        .records
        .attachments(OwnerKind::Passdown, id, kind)
        .await?;
    Ok(Json(ApiResponse::success(attachments)))
}

pub async fn add_attachment(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<NewAttachment>,
) -> Result<Created<attachment::Model>, ServiceError> {
    state.services.passdowns.get_model(id).await?;
    let attachment = state
        .services
        .records
        .add_attachment(OwnerKind::Passdown, id, payload)
        .await?;
    Ok(created(attachment))
}
