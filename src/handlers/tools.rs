use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, put},
    Router,
};
use serde::Deserialize;

use super::common::{created, parse_enum, AttachmentQuery, Created, IdsRequest, TagsRequest};
use crate::{
    clamp_page,
    entities::{
        attachment, comment,
        comment::OwnerKind,
        part_movement, passdown, rma,
        tool::{ToolStatus, ToolType},
        track_trend,
    },
    errors::ServiceError,
    repositories::tool_repository::ToolFilter,
    services::{
        moving_parts::MovingPartView,
        records::{NewAttachment, NewComment},
        tools::{CreateToolRequest, ToolDetail, ToolSummary, UpdateToolRequest},
    },
    ApiResponse, ApiResult, AppState, PaginatedResponse,
};

#[derive(Debug, Default, Deserialize)]
pub struct ToolListQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub search: Option<String>,
    pub status: Option<String>,
    pub tool_type: Option<String>,
    pub location_id: Option<i32>,
}

impl ToolListQuery {
    fn filter(&self) -> Result<ToolFilter, ServiceError> {
        Ok(ToolFilter {
            search: self.search.clone().filter(|term| !term.trim().is_empty()),
            status: parse_enum::<ToolStatus>("status", self.status.as_deref())?,
            tool_type: parse_enum::<ToolType>("tool type", self.tool_type.as_deref())?,
            location_id: self.location_id,
        })
    }
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/tools", get(list_tools).post(create_tool))
        .route(
            "/tools/:id",
            get(get_tool).put(update_tool).delete(delete_tool),
        )
        .route("/tools/:id/technicians", put(set_technicians))
        .route("/tools/:id/tags", put(set_tags))
        .route(
            "/tools/:id/comments",
            get(list_comments).post(add_comment),
        )
        .route(
            "/tools/:id/attachments",
            get(list_attachments).post(add_attachment),
        )
        .route("/tools/:id/part-movements", get(list_part_movements))
        .route("/tools/:id/moving-parts", get(list_moving_parts))
        .route("/tools/:id/passdowns", get(list_passdowns))
        .route("/tools/:id/track-trends", get(list_track_trends))
        .route("/tools/:id/rmas", get(list_rmas))
}

pub async fn list_tools(
    State(state): State<AppState>,
    Query(query): Query<ToolListQuery>,
) -> ApiResult<PaginatedResponse<ToolSummary>> {
    let filter = query.filter()?;
    let (page, limit) = clamp_page(query.page, query.limit);
    let (items, total) = state.services.tools.list(filter, page, limit).await?;
    Ok(Json(ApiResponse::success(PaginatedResponse::new(
        items, total, page, limit,
    ))))
}

pub async fn create_tool(
    State(state): State<AppState>,
    Json(payload): Json<CreateToolRequest>,
) -> Result<Created<ToolDetail>, ServiceError> {
    let tool = state.services.tools.create(payload).await?;
    Ok(created(tool))
}

pub async fn get_tool(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<ToolDetail> {
    let tool = state.services.tools.get(id).await?;
    Ok(Json(ApiResponse::success(tool)))
}

pub async fn update_tool(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateToolRequest>,
) -> ApiResult<ToolDetail> {
    let tool = state.services.tools.update(id, payload).await?;
    Ok(Json(ApiResponse::success(tool)))
}

pub async fn delete_tool(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ServiceError> {
    state.services.tools.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn set_technicians(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<IdsRequest>,
) -> ApiResult<ToolDetail> {
    let tool = state.services.tools.set_technicians(id, payload.ids).await?;
    Ok(Json(ApiResponse::success(tool)))
}

pub async fn set_tags(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<TagsRequest>,
) -> ApiResult<ToolDetail> {
    let tool = state.services.tools.set_tags(id, payload.tags).await?;
    Ok(Json(ApiResponse::success(tool)))
}

pub async fn list_comments(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Vec<comment::Model>> {
    state.services.tools.get_model(id).await?;
    let comments = state.services.records.comments(OwnerKind::Tool, id).await?;
    Ok(Json(ApiResponse::success(comments)))
}

pub async fn add_comment(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<NewComment>,
) -> Result<Created<comment::Model>, ServiceError> {
    state.services.tools.get_model(id).await?;
    let comment = state
        .services
        .records
        .add_comment(OwnerKind::Tool, id, payload)
        .await?;
    Ok(created(comment))
}

pub async fn list_attachments(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Query(query): Query<AttachmentQuery>,
) -> ApiResult<Vec<attachment::Model>> {
    let kind = query.kind()?;
    state.services.tools.get_model(id).await?;
    let attachments = state
        .services
        .records
        .attachments(OwnerKind::Tool, id, kind)
        .await?;
    Ok(Json(ApiResponse::success(attachments)))
}

pub async fn add_attachment(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<NewAttachment>,
) -> Result<Created<attachment::Model>, ServiceError> {
    state.services.tools.get_model(id).await?;
    let attachment = state
        .services
        .records
        .add_attachment(OwnerKind::Tool, id, payload)
        .await?;
    Ok(created(attachment))
}

pub async fn list_part_movements(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Vec<part_movement::Model>> {
    state.services.tools.get_model(id).await?;
    let movements = state.services.parts.movements_for_tool(id).await?;
    Ok(Json(ApiResponse::success(movements)))
}

pub async fn list_moving_parts(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Vec<MovingPartView>> {
    state.services.tools.get_model(id).await?;
    let moving_parts = state.services.moving_parts.find_by_tool(id).await?;
    Ok(Json(ApiResponse::success(moving_parts)))
}

pub async fn list_passdowns(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Vec<passdown::Model>> {
    state.services.tools.get_model(id).await?;
    let passdowns = state.services.passdowns.passdowns_for_tool(id).await?;
    Ok(Json(ApiResponse::success(passdowns)))
}

pub async fn list_track_trends(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Vec<track_trend::Model>> {
    state.services.tools.get_model(id).await?;
    let track_trends = state.services.track_trends.track_trends_for_tool(id).await?;
    Ok(Json(ApiResponse::success(track_trends)))
}

pub async fn list_rmas(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Vec<rma::Model>> {
    state.services.tools.get_model(id).await?;
    let rmas = state.services.rmas.rmas_for_tool(id).await?;
    Ok(Json(ApiResponse::success(rmas)))
}
