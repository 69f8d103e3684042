use chrono::{NaiveDate, NaiveDateTime, Utc};
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use validator::Validate;

use crate::{
    db::DbPool,
    entities::{
        part::{self, PartCategory},
        part_movement::{self, MovementType},
    },
    errors::ServiceError,
    repositories::{LocationRepository, PartRepository, ToolRepository},
};

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreatePartRequest {
    #[validate(length(min = 1, max = 255, message = "Part name is required"))]
    pub name: String,
    #[validate(length(min = 1, max = 100, message = "Part number is required"))]
    pub part_number: String,
    pub description: Option<String>,
    pub manufacturer: Option<String>,
    pub location_id: Option<i32>,
    #[validate(range(min = 0, message = "Quantity cannot be negative"))]
    pub quantity: Option<i32>,
    pub category: Option<PartCategory>,
    #[validate(range(min = 0, message = "Minimum quantity cannot be negative"))]
    pub minimum_quantity: Option<i32>,
    pub unit_cost: Option<f64>,
    pub supplier: Option<String>,
    pub last_order_date: Option<NaiveDate>,
    #[serde(default)]
    pub replacement_required: bool,
    #[validate(length(max = 1000, message = "Notes cannot exceed 1000 characters"))]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdatePartRequest {
    #[validate(length(min = 1, max = 255, message = "Part name is required"))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 100, message = "Part number is required"))]
    pub part_number: Option<String>,
    pub description: Option<String>,
    pub manufacturer: Option<String>,
    pub location_id: Option<i32>,
    #[validate(range(min = 0, message = "Quantity cannot be negative"))]
    pub quantity: Option<i32>,
    pub category: Option<PartCategory>,
    #[validate(range(min = 0, message = "Minimum quantity cannot be negative"))]
    pub minimum_quantity: Option<i32>,
    pub unit_cost: Option<f64>,
    pub supplier: Option<String>,
    pub last_order_date: Option<NaiveDate>,
    pub replacement_required: Option<bool>,
    #[validate(length(max = 1000, message = "Notes cannot exceed 1000 characters"))]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RecordMovementRequest {
    pub tool_id: i32,
    pub movement_type: MovementType,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: Option<i32>,
    pub timestamp: Option<NaiveDateTime>,
    pub source_destination: Option<String>,
    pub comments: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MovementRecorded {
    pub movement: part_movement::Model,
    pub part: part::Model,
}

/// Quantity after a movement. Removals never go below zero.
pub fn adjusted_quantity(current: i32, movement_type: MovementType, amount: i32) -> i32 {
    match movement_type {
        MovementType::Added => current.saturating_add(amount),
        MovementType::Removed => current.saturating_sub(amount).max(0),
    }
}

/// Service for managing the parts inventory
#[derive(Clone)]
pub struct PartService {
    parts: PartRepository,
    tools: ToolRepository,
    locations: LocationRepository,
}

impl PartService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self {
            parts: PartRepository::new(db_pool.clone()),
            tools: ToolRepository::new(db_pool.clone()),
            locations: LocationRepository::new(db_pool),
        }
    }

    #[instrument(skip(self))]
    pub async fn list(
        &self,
        search: Option<String>,
        location_id: Option<i32>,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<part::Model>, u64), ServiceError> {
        self.parts
            .find_all(search.as_deref(), location_id, page, limit)
            .await
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i32) -> Result<part::Model, ServiceError> {
        self.parts
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Part", id))
    }

    pub async fn find_by_ids(&self, ids: &[i32]) -> Result<Vec<part::Model>, ServiceError> {
        self.parts.find_by_ids(ids).await
    }

    #[instrument(skip(self, request), fields(part_number = %request.part_number))]
    pub async fn create(&self, request: CreatePartRequest) -> Result<part::Model, ServiceError> {
        request.validate()?;
        self.check_location(request.location_id).await?;

        let part = self
            .parts
            .create(part::ActiveModel {
                name: Set(request.name.trim().to_string()),
                part_number: Set(request.part_number.trim().to_string()),
                description: Set(request.description),
                manufacturer: Set(request.manufacturer),
                location_id: Set(request.location_id),
                quantity: Set(request.quantity.unwrap_or(0)),
                category: Set(request.category),
                minimum_quantity: Set(request.minimum_quantity.unwrap_or(0)),
                unit_cost: Set(request.unit_cost),
                supplier: Set(request.supplier),
                last_order_date: Set(request.last_order_date),
                replacement_required: Set(request.replacement_required),
                notes: Set(request.notes),
                ..Default::default()
            })
            .await?;
        info!(part_id = part.id, "part created");
        Ok(part)
    }

    #[instrument(skip(self, request))]
    pub async fn update(&self, id: i32, request: UpdatePartRequest) -> Result<part::Model, ServiceError> {
        request.validate()?;
        let existing = self.get(id).await?;
        self.check_location(request.location_id).await?;

        let mut active: part::ActiveModel = existing.into();
        if let Some(name) = request.name {
            active.name = Set(name.trim().to_string());
        }
        if let Some(part_number) = request.part_number {
            active.part_number = Set(part_number.trim().to_string());
        }
        if let Some(value) = request.description {
            active.description = Set(Some(value));
        }
        if let Some(value) = request.manufacturer {
            active.manufacturer = Set(Some(value));
        }
        if let Some(value) = request.location_id {
            active.location_id = Set(Some(value));
        }
        if let Some(value) = request.quantity {
            active.quantity = Set(value);
        }
        if let Some(value) = request.category {
            active.category = Set(Some(value));
        }
        if let Some(value) = request.minimum_quantity {
            active.minimum_quantity = Set(value);
        }
        if let Some(value) = request.unit_cost {
            active.unit_cost = Set(Some(value));
        }
        if let Some(value) = request.supplier {
            active.supplier = Set(Some(value));
        }
        if let Some(value) = request.last_order_date {
            active.last_order_date = Set(Some(value));
        }
        if let Some(value) = request.replacement_required {
            active.replacement_required = Set(value);
        }
        if let Some(value) = request.notes {
            active.notes = Set(Some(value));
        }

        let part = self.parts.update(active).await?;
        info!(part_id = id, "part updated");
        Ok(part)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        self.parts.delete(id).await?;
        info!(part_id = id, "part deleted");
        Ok(())
    }

    /// Records a part going onto or coming off a tool and adjusts stock
    #[instrument(skip(self, request), fields(tool_id = request.tool_id))]
    pub async fn record_movement(
        &self,
        part_id: i32,
        request: RecordMovementRequest,
    ) -> Result<MovementRecorded, ServiceError> {
        request.validate()?;
        let part = self.get(part_id).await?;
        if self.tools.find_by_id(request.tool_id).await?.is_none() {
            return Err(ServiceError::InvalidInput(format!(
                "Tool with ID {} does not exist",
                request.tool_id
            )));
        }

        let amount = request.quantity.unwrap_or(1);
        let new_quantity = adjusted_quantity(part.quantity, request.movement_type, amount);
        if request.movement_type == MovementType::Removed && part.quantity < amount {
            warn!(part_id, on_hand = part.quantity, amount, "removal exceeds stock, clamping at zero");
        }

        let (movement, part) = self
            .parts
            .record_movement(
                part_movement::ActiveModel {
                    tool_id: Set(request.tool_id),
                    part_id: Set(part_id),
                    movement_type: Set(request.movement_type),
                    quantity: Set(amount),
                    timestamp: Set(request
                        .timestamp
                        .unwrap_or_else(|| Utc::now().naive_utc())),
                    source_destination: Set(request.source_destination),
                    comments: Set(request.comments),
                    ..Default::default()
                },
                part,
                new_quantity,
            )
            .await?;
        info!(
            movement_id = movement.id,
            part_id,
            quantity = part.quantity,
            "part movement recorded"
        );
        Ok(MovementRecorded { movement, part })
    }

    #[instrument(skip(self))]
    pub async fn movements_for_tool(
        &self,
        tool_id: i32,
    ) -> Result<Vec<part_movement::Model>, ServiceError> {
        self.parts.movements_for_tool(tool_id).await
    }

    async fn check_location(&self, location_id: Option<i32>) -> Result<(), ServiceError> {
        if let Some(location_id) = location_id {
            if self.locations.find_by_id(location_id).await?.is_none() {
                return Err(ServiceError::InvalidInput(format!(
                    "Location with ID {} does not exist",
                    location_id
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(5, MovementType::Added, 3, 8)]
    #[case(5, MovementType::Removed, 3, 2)]
    #[case(2, MovementType::Removed, 5, 0)]
    #[case(0, MovementType::Removed, 1, 0)]
    fn quantity_adjustment(
        #[case] current: i32,
        #[case] movement_type: MovementType,
        #[case] amount: i32,
        #[case] expected: i32,
    ) {
        assert_eq!(adjusted_quantity(current, movement_type, amount), expected);
    }
}
