use axum::{http::StatusCode, Json};
use serde::Deserialize;
use std::str::FromStr;

use crate::{entities::attachment::AttachmentKind, errors::ServiceError, ApiResponse};

/// 201 with the standard envelope
pub type Created<T> = (StatusCode, Json<ApiResponse<T>>);

pub fn created<T>(data: T) -> Created<T> {
    (StatusCode::CREATED, Json(ApiResponse::success(data)))
}

/// Parses an optional enum query parameter, case-insensitively
pub fn parse_enum<T: FromStr>(field: &str, raw: Option<&str>) -> Result<Option<T>, ServiceError> {
    match raw.map(str::trim).filter(|value| !value.is_empty()) {
        None => Ok(None),
        Some(value) => T::from_str(value)
            .map(Some)
            .map_err(|_| ServiceError::InvalidInput(format!("Invalid {}: {}", field, value))),
    }
}

/// Body of the endpoints that replace an id set
#[derive(Debug, Deserialize)]
pub struct IdsRequest {
    pub ids: Vec<i32>,
}

#[derive(Debug, Deserialize)]
pub struct TagsRequest {
    pub tags: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AttachmentQuery {
    pub kind: Option<String>,
}

impl AttachmentQuery {
    pub fn kind(&self) -> Result<Option<AttachmentKind>, ServiceError> {
        parse_enum("attachment kind", self.kind.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::tool::ToolStatus;
    use assert_matches::assert_matches;

    #[test]
    fn enum_params_parse_case_insensitively() {
        assert_eq!(
            parse_enum::<ToolStatus>("status", Some("in_progress")).unwrap(),
            Some(ToolStatus::InProgress)
        );
        assert_eq!(parse_enum::<ToolStatus>("status", Some("  ")).unwrap(), None);
        assert_matches!(
            parse_enum::<ToolStatus>("status", Some("BROKEN")),
            Err(ServiceError::InvalidInput(_))
        );
    }
}
