use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, put},
    Router,
};
use serde::Deserialize;

use super::common::{created, parse_enum, AttachmentQuery, Created, IdsRequest};
use crate::{
    clamp_page,
    entities::{
        attachment,
        comment::{self, OwnerKind},
        rma::{self, RmaPriority, RmaStatus},
        rma_labor_entry, rma_part_line_item,
    },
    errors::ServiceError,
    repositories::rma_repository::RmaFilter,
    services::{
        moving_parts::MovingPartView,
        records::{NewAttachment, NewComment},
        rmas::{LaborSummary, NewLaborEntry, NewLineItem, RmaDetail, RmaRequest},
    },
    ApiResponse, ApiResult, AppState, PaginatedResponse,
};

#[derive(Debug, Default, Deserialize)]
pub struct RmaListQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub customer: Option<String>,
    pub tool_id: Option<i32>,
}

impl RmaListQuery {
    fn filter(&self) -> Result<RmaFilter, ServiceError> {
        Ok(RmaFilter {
            status: parse_enum::<RmaStatus>("status", self.status.as_deref())?,
            priority: parse_enum::<RmaPriority>("priority", self.priority.as_deref())?,
            customer: self.customer.clone().filter(|name| !name.trim().is_empty()),
            tool_id: self.tool_id,
        })
    }
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/rmas", get(list_rmas).post(create_rma))
        .route("/rmas/:id", get(get_rma).put(update_rma).delete(delete_rma))
        .route("/rmas/:id/parts", put(set_parts))
        .route(
            "/rmas/:id/line-items",
            get(list_line_items).post(add_line_item),
        )
        .route("/rmas/:id/labor", get(list_labor).post(add_labor_entry))
        .route("/rmas/:id/comments", get(list_comments).post(add_comment))
        .route(
            "/rmas/:id/attachments",
            get(list_attachments).post(add_attachment),
        )
        .route("/rmas/:id/moving-parts", get(list_moving_parts))
}

pub async fn list_rmas(
    State(state): State<AppState>,
    Query(query): Query<RmaListQuery>,
) -> ApiResult<PaginatedResponse<rma::Model>> {
    let filter = query.filter()?;
    let (page, limit) = clamp_page(query.page, query.limit);
    let (items, total) = state.services.rmas.list(filter, page, limit).await?;
    Ok(Json(ApiResponse::success(PaginatedResponse::new(
        items, total, page, limit,
    ))))
}

pub async fn create_rma(
    State(state): State<AppState>,
    Json(payload): Json<RmaRequest>,
) -> Result<Created<RmaDetail>, ServiceError> {
    let rma = state.services.rmas.create(payload).await?;
    Ok(created(rma))
}

pub async fn get_rma(State(state): State<AppState>, Path(id): Path<i32>) -> ApiResult<RmaDetail> {
    let rma = state.services.rmas.get(id).await?;
    Ok(Json(ApiResponse::success(rma)))
}

pub async fn update_rma(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<RmaRequest>,
) -> ApiResult<RmaDetail> {
    let rma = state.services.rmas.update(id, payload).await?;
    Ok(Json(ApiResponse::success(rma)))
}

pub async fn delete_rma(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ServiceError> {
    state.services.rmas.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn set_parts(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<IdsRequest>,
) -> ApiResult<RmaDetail> {
    let rma = state.services.rmas.set_parts(id, payload.ids).await?;
    Ok(Json(ApiResponse::success(rma)))
}

pub async fn list_line_items(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Vec<rma_part_line_item::Model>> {
    let items = state.services.rmas.line_items(id).await?;
    Ok(Json(ApiResponse::success(items)))
}

pub async fn add_line_item(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<NewLineItem>,
) -> Result<Created<rma_part_line_item::Model>, ServiceError> {
    let item = state.services.rmas.add_line_item(id, payload).await?;
    Ok(created(item))
}

pub async fn list_labor(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<LaborSummary> {
    let labor = state.services.rmas.labor(id).await?;
    Ok(Json(ApiResponse::success(labor)))
}

pub async fn add_labor_entry(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<NewLaborEntry>,
) -> Result<Created<rma_labor_entry::Model>, ServiceError> {
    let entry = state.services.rmas.add_labor_entry(id, payload).await?;
    Ok(created(entry))
}

pub async fn list_comments(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Vec<comment::Model>> {
    state.services.rmas.get_model(id).await?;
    let comments = state.services.records.comments(OwnerKind::Rma, id).await?;
    Ok(Json(ApiResponse::success(comments)))
}

pub async fn add_comment(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<NewComment>,
) -> Result<Created<comment::Model>, ServiceError> {
    state.services.rmas.get_model(id).await?;
    let comment = state
        .services
        .records
        .add_comment(OwnerKind::Rma, id, payload)
        .await?;
    Ok(created(comment))
}

pub async fn list_attachments(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Query(query): Query<AttachmentQuery>,
) -> ApiResult<Vec<attachment::Model>> {
    let kind = query.kind()?;
    state.services.rmas.get_model(id).await?;
    let attachments = state
        .services
        .records
        .attachments(OwnerKind::Rma, id, kind)
        .await?;
    Ok(Json(ApiResponse::success(attachments)))
}

pub async fn add_attachment(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<NewAttachment>,
) -> Result<Created<attachment::Model>, ServiceError> {
    state.services.rmas.get_model(id).await?;
    let attachment = state
        .services
        .records
        .add_attachment(OwnerKind::Rma, id, payload)
        .await?;
    Ok(created(attachment))
}

pub async fn list_moving_parts(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Vec<MovingPartView>> {
    state.services.rmas.get_model(id).await?;
    let moving_parts = state.services.moving_parts.find_by_rma(id).await?;
    Ok(Json(ApiResponse::success(moving_parts)))
}
