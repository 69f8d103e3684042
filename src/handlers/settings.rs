use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};

use super::common::{created, parse_enum, Created};
use crate::{
    entities::{return_address, tool::ToolType},
    errors::ServiceError,
    services::{
        checklist_templates::{ChecklistTemplateView, SaveChecklistTemplateRequest},
        return_addresses::{CreateReturnAddressRequest, UpdateReturnAddressRequest},
    },
    ApiResponse, ApiResult, AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/checklist-templates/:tool_type",
            get(get_checklist_template).put(save_checklist_template),
        )
        .route(
            "/return-addresses",
            get(list_return_addresses).post(create_return_address),
        )
        .route(
            "/return-addresses/:id",
            get(get_return_address)
                .put(update_return_address)
                .delete(delete_return_address),
        )
}

fn tool_type(raw: &str) -> Result<ToolType, ServiceError> {
    parse_enum("tool type", Some(raw))?
        .ok_or_else(|| ServiceError::InvalidInput("Tool type is required".to_string()))
}

pub async fn get_checklist_template(
    State(state): State<AppState>,
    Path(raw): Path<String>,
) -> ApiResult<ChecklistTemplateView> {
    let template = state
        .services
        .checklist_templates
        .get(tool_type(&raw)?)
        .await?;
    Ok(Json(ApiResponse::success(template)))
}

pub async fn save_checklist_template(
    State(state): State<AppState>,
    Path(raw): Path<String>,
    Json(payload): Json<SaveChecklistTemplateRequest>,
) -> ApiResult<ChecklistTemplateView> {
    let template = state
        .services
        .checklist_templates
        .save(tool_type(&raw)?, payload)
        .await?;
    Ok(Json(ApiResponse::success(template)))
}

pub async fn list_return_addresses(
    State(state): State<AppState>,
) -> ApiResult<Vec<return_address::Model>> {
    let addresses = state.services.return_addresses.list().await?;
    Ok(Json(ApiResponse::success(addresses)))
}

pub async fn create_return_address(
    State(state): State<AppState>,
    Json(payload): Json<CreateReturnAddressRequest>,
) -> Result<Created<return_address::Model>, ServiceError> {
    let address = state.services.return_addresses.create(payload).await?;
    Ok(created(address))
}

pub async fn get_return_address(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<return_address::Model> {
    let address = state.services.return_addresses.get(id).await?;
    Ok(Json(ApiResponse::success(address)))
}

pub async fn update_return_address(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateReturnAddressRequest>,
) -> ApiResult<return_address::Model> {
    let address = state.services.return_addresses.update(id, payload).await?;
    Ok(Json(ApiResponse::success(address)))
}

pub async fn delete_return_address(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ServiceError> {
    state.services.return_addresses.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
