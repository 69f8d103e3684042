use sea_orm::Set;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use validator::Validate;

use crate::{
    db::DbPool,
    entities::{rma, tool, track_trend},
    errors::ServiceError,
    repositories::{RmaRepository, ToolRepository, TrackTrendRepository},
    services::ensure_all_found,
};

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreateTrackTrendRequest {
    #[validate(length(min = 1, max = 255, message = "Name is required"))]
    pub name: String,
    #[validate(length(max = 1000, message = "Description cannot exceed 1000 characters"))]
    pub description: Option<String>,
    #[serde(default)]
    pub tool_ids: Vec<i32>,
    #[serde(default)]
    pub related_ids: Vec<i32>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateTrackTrendRequest {
    #[validate(length(min = 1, max = 255, message = "Name is required"))]
    pub name: Option<String>,
    #[validate(length(max = 1000, message = "Description cannot exceed 1000 characters"))]
    pub description: Option<String>,
    pub tool_ids: Option<Vec<i32>>,
    pub related_ids: Option<Vec<i32>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrackTrendDetail {
    #[serde(flatten)]
    pub track_trend: track_trend::Model,
    pub tools: Vec<tool::Model>,
    pub related: Vec<track_trend::Model>,
}

/// Service for track & trend investigations
#[derive(Clone)]
pub struct TrackTrendService {
    track_trends: TrackTrendRepository,
    tools: ToolRepository,
    rmas: RmaRepository,
}

impl TrackTrendService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self {
            track_trends: TrackTrendRepository::new(db_pool.clone()),
            tools: ToolRepository::new(db_pool.clone()),
            rmas: RmaRepository::new(db_pool),
        }
    }

    #[instrument(skip(self))]
    pub async fn list(
        &self,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<track_trend::Model>, u64), ServiceError> {
        self.track_trends.find_all(page, limit).await
    }

    pub async fn get_model(&self, id: i32) -> Result<track_trend::Model, ServiceError> {
        self.track_trends
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Track & trend", id))
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i32) -> Result<TrackTrendDetail, ServiceError> {
        let track_trend = self.get_model(id).await?;
        self.detail(track_trend).await
    }

    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn create(
        &self,
        request: CreateTrackTrendRequest,
    ) -> Result<TrackTrendDetail, ServiceError> {
        request.validate()?;
        let name = request.name.trim().to_string();
        if name.is_empty() {
            return Err(ServiceError::ValidationError("Name is required".to_string()));
        }
        self.check_tools(&request.tool_ids).await?;
        self.check_related(None, &request.related_ids).await?;

        let created = self
            .track_trends
            .create(track_trend::ActiveModel {
                name: Set(name),
                description: Set(request.description),
                ..Default::default()
            })
            .await?;
        self.track_trends
            .replace_tools(created.id, &request.tool_ids)
            .await?;
        self.track_trends
            .replace_related(created.id, &request.related_ids)
            .await?;
        info!(track_trend_id = created.id, "track & trend created");
        self.detail(created).await
    }

    #[instrument(skip(self, request))]
    pub async fn update(
        &self,
        id: i32,
        request: UpdateTrackTrendRequest,
    ) -> Result<TrackTrendDetail, ServiceError> {
        request.validate()?;
        let existing = self.get_model(id).await?;
        if let Some(tool_ids) = request.tool_ids.as_deref() {
            self.check_tools(tool_ids).await?;
        }
        if let Some(related_ids) = request.related_ids.as_deref() {
            self.check_related(Some(id), related_ids).await?;
        }

        let mut active: track_trend::ActiveModel = existing.into();
        if let Some(name) = request.name {
            active.name = Set(name.trim().to_string());
        }
        if let Some(description) = request.description {
            active.description = Set(Some(description));
        }
        let updated = self.track_trends.update(active).await?;

        if let Some(tool_ids) = request.tool_ids.as_deref() {
            self.track_trends.replace_tools(id, tool_ids).await?;
        }
        if let Some(related_ids) = request.related_ids.as_deref() {
            self.track_trends.replace_related(id, related_ids).await?;
        }
        info!(track_trend_id = id, "track & trend updated");
        self.detail(updated).await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        self.track_trends.delete(id).await?;
        info!(track_trend_id = id, "track & trend deleted");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn set_tools(&self, id: i32, tool_ids: Vec<i32>) -> Result<TrackTrendDetail, ServiceError> {
        let track_trend = self.get_model(id).await?;
        self.check_tools(&tool_ids).await?;
        self.track_trends.replace_tools(id, &tool_ids).await?;
        self.detail(track_trend).await
    }

    #[instrument(skip(self))]
    pub async fn set_related(
        &self,
        id: i32,
        related_ids: Vec<i32>,
    ) -> Result<TrackTrendDetail, ServiceError> {
        let track_trend = self.get_model(id).await?;
        self.check_related(Some(id), &related_ids).await?;
        self.track_trends.replace_related(id, &related_ids).await?;
        self.detail(track_trend).await
    }

    /// Investigations that could be related to `id`: every other one
    #[instrument(skip(self))]
    pub async fn available_related(&self, id: i32) -> Result<Vec<track_trend::Model>, ServiceError> {
        self.get_model(id).await?;
        self.track_trends.find_all_except(id).await
    }

    /// RMAs raised against any affected tool
    #[instrument(skip(self))]
    pub async fn rmas(&self, id: i32) -> Result<Vec<rma::Model>, ServiceError> {
        self.get_model(id).await?;
        let tool_ids = self.track_trends.tool_ids(id).await?;
        self.rmas.find_by_tool_ids(&tool_ids).await
    }

    #[instrument(skip(self))]
    pub async fn track_trends_for_tool(
        &self,
        tool_id: i32,
    ) -> Result<Vec<track_trend::Model>, ServiceError> {
        let ids = self.track_trends.ids_for_tool(tool_id).await?;
        self.track_trends.find_by_ids(&ids).await
    }

    async fn check_tools(&self, tool_ids: &[i32]) -> Result<(), ServiceError> {
        let tools = self.tools.find_by_ids(tool_ids).await?;
        ensure_all_found("Tool", tool_ids, tools.iter().map(|tool| tool.id))
    }

    async fn check_related(&self, own_id: Option<i32>, related_ids: &[i32]) -> Result<(), ServiceError> {
        let wanted: Vec<i32> = related_ids
            .iter()
            .copied()
            .filter(|related_id| Some(*related_id) != own_id)
            .collect();
        let found = self.track_trends.find_by_ids(&wanted).await?;
        ensure_all_found("Track & trend", &wanted, found.iter().map(|tt| tt.id))
    }

    async fn detail(&self, track_trend: track_trend::Model) -> Result<TrackTrendDetail, ServiceError> {
        let tool_ids = self.track_trends.tool_ids(track_trend.id).await?;
        let tools = self.tools.find_by_ids(&tool_ids).await?;
        let related_ids = self.track_trends.related_ids(track_trend.id).await?;
        let related = self.track_trends.find_by_ids(&related_ids).await?;
        Ok(TrackTrendDetail {
            track_trend,
            tools,
            related,
        })
    }
}
