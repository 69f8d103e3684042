use chrono::{NaiveDateTime, Utc};
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, instrument};
use validator::Validate;

use crate::{
    db::DbPool,
    entities::{
        comment::OwnerKind,
        json_list,
        moving_part::{self, format_path},
        tool,
    },
    errors::ServiceError,
    repositories::{
        CustomLocationRepository, MovingPartRepository, RmaRepository, ToolRepository,
        TrackTrendRepository,
    },
    services::{ensure_all_found, records::RecordService},
};

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreateMovingPartRequest {
    #[validate(length(min = 1, max = 255, message = "Part name is required"))]
    pub part_name: String,
    pub from_tool_id: Option<i32>,
    /// Free-text source used when the part does not come off a tool
    pub from_custom_location: Option<String>,
    pub from_custom_location_id: Option<i32>,
    #[serde(default)]
    pub destination_tool_ids: Vec<i32>,
    #[serde(default)]
    pub to_custom_locations: Vec<String>,
    pub to_custom_location_id: Option<i32>,
    pub move_date: Option<NaiveDateTime>,
    #[validate(length(max = 1000, message = "Notes cannot exceed 1000 characters"))]
    pub notes: Option<String>,
    pub additional_notes: Option<String>,
    pub rma_id: Option<i32>,
    pub linked_track_trend_id: Option<i32>,
}

/// Replaces the part name, notes, source tool, destination chain and RMA.
/// A missing or empty destination list clears the chain. The remaining fields
/// change only when present.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateMovingPartRequest {
    #[validate(length(min = 1, max = 255, message = "Part name is required"))]
    pub part_name: String,
    pub from_tool_id: Option<i32>,
    #[serde(default)]
    pub destination_tool_ids: Vec<i32>,
    #[validate(length(max = 1000, message = "Notes cannot exceed 1000 characters"))]
    pub notes: Option<String>,
    pub rma_id: Option<i32>,
    pub from_custom_location: Option<String>,
    pub from_custom_location_id: Option<i32>,
    pub to_custom_locations: Option<Vec<String>>,
    pub to_custom_location_id: Option<i32>,
    pub additional_notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AddDestinationRequest {
    pub tool_id: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LinkTrackTrendRequest {
    pub track_trend_id: i32,
}

/// Moving part with its stored JSON lists decoded.
#[derive(Debug, Clone, Serialize)]
pub struct MovingPartView {
    #[serde(flatten)]
    pub moving_part: moving_part::Model,
    pub destination_tool_ids: Vec<i32>,
    pub to_custom_location_names: Vec<String>,
}

impl From<moving_part::Model> for MovingPartView {
    fn from(moving_part: moving_part::Model) -> Self {
        Self {
            destination_tool_ids: moving_part.destination_chain(),
            to_custom_location_names: moving_part.to_custom_locations(),
            moving_part,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MovementPath {
    pub moving_part_id: i32,
    pub path: String,
    pub from_tool: Option<tool::Model>,
    /// Destination tools in chain order; ids of deleted tools are skipped
    pub destinations: Vec<tool::Model>,
}

/// Service for parts moving between tools and custom locations
#[derive(Clone)]
pub struct MovingPartService {
    moving_parts: MovingPartRepository,
    tools: ToolRepository,
    custom_locations: CustomLocationRepository,
    rmas: RmaRepository,
    track_trends: TrackTrendRepository,
    records: RecordService,
}

impl MovingPartService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self {
            moving_parts: MovingPartRepository::new(db_pool.clone()),
            tools: ToolRepository::new(db_pool.clone()),
            custom_locations: CustomLocationRepository::new(db_pool.clone()),
            rmas: RmaRepository::new(db_pool.clone()),
            track_trends: TrackTrendRepository::new(db_pool.clone()),
            records: RecordService::new(db_pool),
        }
    }

    #[instrument(skip(self))]
    pub async fn list(&self, page: u64, limit: u64) -> Result<(Vec<MovingPartView>, u64), ServiceError> {
        let (parts, total) = self.moving_parts.find_all(page, limit).await?;
        Ok((parts.into_iter().map(MovingPartView::from).collect(), total))
    }

    pub async fn get_model(&self, id: i32) -> Result<moving_part::Model, ServiceError> {
        self.moving_parts
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Moving part", id))
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i32) -> Result<MovingPartView, ServiceError> {
        self.get_model(id).await.map(MovingPartView::from)
    }

    #[instrument(skip(self, request), fields(part_name = %request.part_name))]
    pub async fn create(&self, request: CreateMovingPartRequest) -> Result<MovingPartView, ServiceError> {
        request.validate()?;
        self.check_tools(request.from_tool_id, &request.destination_tool_ids)
            .await?;
        self.check_custom_locations(&[request.from_custom_location_id, request.to_custom_location_id])
            .await?;
        self.check_rma(request.rma_id).await?;
        if let Some(track_trend_id) = request.linked_track_trend_id {
            self.check_track_trend(track_trend_id).await?;
        }

        let from_custom_location = request
            .from_custom_location
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty() && request.from_tool_id.is_none());

        let saved = self
            .moving_parts
            .create(moving_part::ActiveModel {
                part_name: Set(request.part_name.trim().to_string()),
                from_tool_id: Set(request.from_tool_id),
                from_custom_location: Set(from_custom_location),
                from_custom_location_id: Set(request.from_custom_location_id),
                to_tool_id: Set(request.destination_tool_ids.last().copied()),
                to_custom_location_id: Set(request.to_custom_location_id),
                destination_chain: Set(json_list::encode(&request.destination_tool_ids)),
                to_custom_locations: Set(json_list::encode(&clean_names(
                    request.to_custom_locations,
                ))),
                move_date: Set(request.move_date.unwrap_or_else(|| Utc::now().naive_utc())),
                notes: Set(request.notes),
                additional_notes: Set(request.additional_notes),
                rma_id: Set(request.rma_id),
                linked_track_trend_id: Set(request.linked_track_trend_id),
                ..Default::default()
            })
            .await?;
        info!(
            moving_part_id = saved.id,
            hops = request.destination_tool_ids.len(),
            "moving part recorded"
        );
        Ok(saved.into())
    }

    #[instrument(skip(self, request))]
    pub async fn update(
        &self,
        id: i32,
        request: UpdateMovingPartRequest,
    ) -> Result<MovingPartView, ServiceError> {
        request.validate()?;
        let existing = self.get_model(id).await?;
        self.check_tools(request.from_tool_id, &request.destination_tool_ids)
            .await?;
        self.check_custom_locations(&[request.from_custom_location_id, request.to_custom_location_id])
            .await?;
        self.check_rma(request.rma_id).await?;

        let mut active: moving_part::ActiveModel = existing.into();
        active.part_name = Set(request.part_name.trim().to_string());
        active.notes = Set(request.notes);
        active.from_tool_id = Set(request.from_tool_id);
        active.destination_chain = Set(json_list::encode(&request.destination_tool_ids));
        active.to_tool_id = Set(request.destination_tool_ids.last().copied());
        active.rma_id = Set(request.rma_id);
        if let Some(name) = request.from_custom_location {
            active.from_custom_location = Set(Some(name.trim().to_string()).filter(|n| !n.is_empty()));
        }
        if let Some(custom_location_id) = request.from_custom_location_id {
            active.from_custom_location_id = Set(Some(custom_location_id));
        }
        if let Some(names) = request.to_custom_locations {
            active.to_custom_locations = Set(json_list::encode(&clean_names(names)));
        }
        if let Some(custom_location_id) = request.to_custom_location_id {
            active.to_custom_location_id = Set(Some(custom_location_id));
        }
        if let Some(notes) = request.additional_notes {
            active.additional_notes = Set(Some(notes));
        }

        let saved = self.moving_parts.update(active).await?;
        info!(moving_part_id = id, "moving part updated");
        Ok(saved.into())
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        self.moving_parts.delete(id).await?;
        info!(moving_part_id = id, "moving part deleted");
        Ok(())
    }

    /// Appends one hop to the chain; the new hop becomes the current destination
    #[instrument(skip(self))]
    pub async fn add_destination(&self, id: i32, tool_id: i32) -> Result<MovingPartView, ServiceError> {
        let existing = self.get_model(id).await?;
        self.check_tools(None, &[tool_id]).await?;

        let chain = existing.chain_with(tool_id);
        let mut active: moving_part::ActiveModel = existing.into();
        active.destination_chain = Set(chain);
        active.to_tool_id = Set(Some(tool_id));
        let saved = self.moving_parts.update(active).await?;
        info!(moving_part_id = id, tool_id, "destination added");
        Ok(saved.into())
    }

    /// Links the part to an investigation and notes it on the investigation
    #[instrument(skip(self))]
    pub async fn link_track_trend(
        &self,
        id: i32,
        track_trend_id: i32,
    ) -> Result<MovingPartView, ServiceError> {
        let existing = self.get_model(id).await?;
        self.check_track_trend(track_trend_id).await?;

        let part_name = existing.part_name.clone();
        let mut active: moving_part::ActiveModel = existing.into();
        active.linked_track_trend_id = Set(Some(track_trend_id));
        let saved = self.moving_parts.update(active).await?;

        self.records
            .add_system_comment(
                OwnerKind::TrackTrend,
                track_trend_id,
                &format!("Moving part '{}' (ID {}) linked to this track & trend", part_name, id),
            )
            .await?;
        info!(moving_part_id = id, track_trend_id, "moving part linked to track & trend");
        Ok(saved.into())
    }

    #[instrument(skip(self))]
    pub async fn path(&self, id: i32) -> Result<MovementPath, ServiceError> {
        let moving_part = self.get_model(id).await?;
        let chain = moving_part.destination_chain();

        let mut lookup = chain.clone();
        lookup.extend(moving_part.from_tool_id);
        let tools: HashMap<i32, tool::Model> = self
            .tools
            .find_by_ids(&lookup)
            .await?
            .into_iter()
            .map(|tool| (tool.id, tool))
            .collect();

        let from_tool = moving_part
            .from_tool_id
            .and_then(|tool_id| tools.get(&tool_id).cloned());
        let destinations: Vec<tool::Model> = chain
            .iter()
            .filter_map(|tool_id| tools.get(tool_id).cloned())
            .collect();
        let names: Vec<String> = destinations.iter().map(|tool| tool.name.clone()).collect();

        Ok(MovementPath {
            moving_part_id: id,
            path: format_path(from_tool.as_ref().map(|tool| tool.name.as_str()), &names),
            from_tool,
            destinations,
        })
    }

    #[instrument(skip(self))]
    pub async fn find_by_tool(&self, tool_id: i32) -> Result<Vec<MovingPartView>, ServiceError> {
        let parts = self.moving_parts.find_by_tool(tool_id).await?;
        Ok(parts.into_iter().map(MovingPartView::from).collect())
    }

    #[instrument(skip(self))]
    pub async fn find_by_rma(&self, rma_id: i32) -> Result<Vec<MovingPartView>, ServiceError> {
        let parts = self.moving_parts.find_by_rma(rma_id).await?;
        Ok(parts.into_iter().map(MovingPartView::from).collect())
    }

    async fn check_tools(&self, from_tool_id: Option<i32>, chain: &[i32]) -> Result<(), ServiceError> {
        let mut ids = chain.to_vec();
        ids.extend(from_tool_id);
        let tools = self.tools.find_by_ids(&ids).await?;
        ensure_all_found("Tool", &ids, tools.iter().map(|tool| tool.id))
    }

    async fn check_custom_locations(&self, ids: &[Option<i32>]) -> Result<(), ServiceError> {
        for id in ids.iter().flatten() {
            if self.custom_locations.find_by_id(*id).await?.is_none() {
                return Err(ServiceError::InvalidInput(format!(
                    "Custom location with ID {} does not exist",
                    id
                )));
            }
        }
        Ok(())
    }

    async fn check_rma(&self, rma_id: Option<i32>) -> Result<(), ServiceError> {
        if let Some(rma_id) = rma_id {
            if self.rmas.find_by_id(rma_id).await?.is_none() {
                return Err(ServiceError::InvalidInput(format!(
                    "RMA with ID {} does not exist",
                    rma_id
                )));
            }
        }
        Ok(())
    }

    async fn check_track_trend(&self, track_trend_id: i32) -> Result<(), ServiceError> {
        if self.track_trends.find_by_id(track_trend_id).await?.is_none() {
            return Err(ServiceError::InvalidInput(format!(
                "Track & trend with ID {} does not exist",
                track_trend_id
            )));
        }
        Ok(())
    }
}

fn clean_names(names: Vec<String>) -> Vec<String> {
    names
        .into_iter()
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .collect()
}
