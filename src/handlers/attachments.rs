use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::delete,
    Router,
};

use crate::{errors::ServiceError, AppState};

/// Attachments are listed and added under their owner; removal is by id.
pub fn routes() -> Router<AppState> {
    Router::new().route("/attachments/:id", delete(delete_attachment))
}

pub async fn delete_attachment(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ServiceError> {
    state.services.records.delete_attachment(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
