use sea_orm::Set;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use validator::Validate;

use crate::{
    db::DbPool,
    entities::{custom_location, location},
    errors::ServiceError,
    repositories::{CustomLocationRepository, LocationRepository},
};

const AUTO_CREATED_DESCRIPTION: &str = "Auto-created custom location";

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreateLocationRequest {
    #[validate(length(min = 1, max = 100, message = "State is required"))]
    pub state: String,
    #[validate(length(max = 20))]
    pub fab: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
    pub display_name: Option<String>,
    #[serde(default)]
    pub default_location: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateLocationRequest {
    #[validate(length(min = 1, max = 100, message = "State is required"))]
    pub state: Option<String>,
    #[validate(length(max = 20))]
    pub fab: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
    pub display_name: Option<String>,
}

/// Location row with its resolved display name.
#[derive(Debug, Clone, Serialize)]
pub struct LocationView {
    #[serde(flatten)]
    pub location: location::Model,
    pub resolved_display_name: String,
}

impl From<location::Model> for LocationView {
    fn from(location: location::Model) -> Self {
        Self {
            resolved_display_name: location.display_name(),
            location,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CustomLocationRequest {
    #[validate(length(min = 1, max = 255, message = "Custom location name is required"))]
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateCustomLocationRequest {
    #[validate(length(min = 1, max = 255, message = "Custom location name is required"))]
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Custom location with the number of moving parts headed to it.
#[derive(Debug, Clone, Serialize)]
pub struct CustomLocationView {
    #[serde(flatten)]
    pub custom_location: custom_location::Model,
    pub part_count: i64,
}

/// Service for managing locations and their custom sub-locations
#[derive(Clone)]
pub struct LocationService {
    locations: LocationRepository,
    custom_locations: CustomLocationRepository,
}

impl LocationService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self {
            locations: LocationRepository::new(db_pool.clone()),
            custom_locations: CustomLocationRepository::new(db_pool),
        }
    }

    #[instrument(skip(self))]
    pub async fn list(&self, page: u64, limit: u64) -> Result<(Vec<LocationView>, u64), ServiceError> {
        let (locations, total) = self.locations.find_all(page, limit).await?;
        Ok((locations.into_iter().map(LocationView::from).collect(), total))
    }

    pub async fn get_model(&self, id: i32) -> Result<location::Model, ServiceError> {
        self.locations
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Location", id))
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i32) -> Result<LocationView, ServiceError> {
        self.get_model(id).await.map(LocationView::from)
    }

    /// The location flagged as default, if any
    #[instrument(skip(self))]
    pub async fn get_default(&self) -> Result<Option<LocationView>, ServiceError> {
        Ok(self.locations.find_default().await?.map(LocationView::from))
    }

    pub async fn find_by_state_and_fab(
        &self,
        state: &str,
        fab: &str,
    ) -> Result<Option<location::Model>, ServiceError> {
        self.locations.find_by_state_and_fab(state, fab).await
    }

    #[instrument(skip(self, request), fields(state = %request.state))]
    pub async fn create(&self, request: CreateLocationRequest) -> Result<LocationView, ServiceError> {
        request.validate()?;
        let state = request.state.trim().to_string();
        if state.is_empty() {
            return Err(ServiceError::ValidationError("State is required".to_string()));
        }
        let fab = non_blank(request.fab);
        if fab.is_none() {
            self.ensure_no_fabless_twin(&state, None).await?;
        }

        let created = self
            .locations
            .create(location::ActiveModel {
                state: Set(state),
                fab: Set(fab),
                name: Set(request.name),
                description: Set(request.description),
                address: Set(request.address),
                notes: Set(request.notes),
                display_name: Set(non_blank(request.display_name)),
                default_location: Set(false),
                ..Default::default()
            })
            .await?;

        let created = if request.default_location {
            self.locations.set_default(created.id).await?
        } else {
            created
        };
        info!(location_id = created.id, "location created");
        Ok(created.into())
    }

    #[instrument(skip(self, request))]
    pub async fn update(
        &self,
        id: i32,
        request: UpdateLocationRequest,
    ) -> Result<LocationView, ServiceError> {
        request.validate()?;
        let existing = self.get_model(id).await?;
        let state = match request.state {
            Some(state) if state.trim().is_empty() => {
                return Err(ServiceError::ValidationError("State is required".to_string()));
            }
            Some(state) => state.trim().to_string(),
            None => existing.state.clone(),
        };
        let fab = match request.fab {
            Some(fab) => non_blank(Some(fab)),
            None => existing.fab.clone(),
        };
        if fab.is_none() {
            self.ensure_no_fabless_twin(&state, Some(id)).await?;
        }

        let mut active: location::ActiveModel = existing.into();
        active.state = Set(state);
        active.fab = Set(fab);
        if let Some(name) = request.name {
            active.name = Set(Some(name));
        }
        if let Some(description) = request.description {
            active.description = Set(Some(description));
        }
        if let Some(address) = request.address {
            active.address = Set(Some(address));
        }
        if let Some(notes) = request.notes {
            active.notes = Set(Some(notes));
        }
        if let Some(display_name) = request.display_name {
            active.display_name = Set(non_blank(Some(display_name)));
        }

        let updated = self.locations.update(active).await?;
        info!(location_id = id, "location updated");
        Ok(updated.into())
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        self.locations.delete(id).await?;
        info!(location_id = id, "location deleted");
        Ok(())
    }

    /// Makes `id` the only default location
    #[instrument(skip(self))]
    pub async fn set_default(&self, id: i32) -> Result<LocationView, ServiceError> {
        self.get_model(id).await?;
        let location = self.locations.set_default(id).await?;
        info!(location_id = id, "default location changed");
        Ok(location.into())
    }

    #[instrument(skip(self))]
    pub async fn custom_locations(
        &self,
        location_id: i32,
    ) -> Result<Vec<CustomLocationView>, ServiceError> {
        self.get_model(location_id).await?;
        let custom_locations = self.custom_locations.find_by_location(location_id).await?;
        let counts = self
            .custom_locations
            .incoming_part_counts(location_id)
            .await?;
        Ok(custom_locations
            .into_iter()
            .map(|custom_location| CustomLocationView {
                part_count: counts.get(&custom_location.id).copied().unwrap_or(0),
                custom_location,
            })
            .collect())
    }

    /// Returns the custom location named `request.name` under `location_id`,
    /// creating it when missing. The flag is true when a row was inserted.
    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn find_or_create_custom_location(
        &self,
        location_id: i32,
        request: CustomLocationRequest,
    ) -> Result<(custom_location::Model, bool), ServiceError> {
        request.validate()?;
        let name = request.name.trim();
        if name.is_empty() {
            return Err(ServiceError::ValidationError(
                "Custom location name is required".to_string(),
            ));
        }
        self.get_model(location_id).await?;

        if let Some(existing) = self.custom_locations.find_by_name(location_id, name).await? {
            return Ok((existing, false));
        }

        let created = self
            .custom_locations
            .create(custom_location::ActiveModel {
                name: Set(name.to_string()),
                description: Set(Some(
                    non_blank(request.description)
                        .unwrap_or_else(|| AUTO_CREATED_DESCRIPTION.to_string()),
                )),
                location_id: Set(location_id),
                ..Default::default()
            })
            .await?;
        info!(custom_location_id = created.id, location_id, "custom location created");
        Ok((created, true))
    }

    #[instrument(skip(self))]
    pub async fn get_custom_location(&self, id: i32) -> Result<CustomLocationView, ServiceError> {
        let custom_location = self.custom_location_model(id).await?;
        let part_count = self.custom_locations.count_incoming(id).await?;
        Ok(CustomLocationView {
            custom_location,
            part_count: i64::try_from(part_count).unwrap_or(i64::MAX),
        })
    }

    #[instrument(skip(self, request))]
    pub async fn update_custom_location(
        &self,
        id: i32,
        request: UpdateCustomLocationRequest,
    ) -> Result<CustomLocationView, ServiceError> {
        request.validate()?;
        let existing = self.custom_location_model(id).await?;
        let location_id = existing.location_id;
        let mut active: custom_location::ActiveModel = existing.into();

        if let Some(name) = request.name {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(ServiceError::ValidationError(
                    "Custom location name is required".to_string(),
                ));
            }
            if let Some(clash) = self.custom_locations.find_by_name(location_id, &name).await? {
                if clash.id != id {
                    warn!(custom_location_id = id, clash_id = clash.id, "duplicate custom location name");
                    return Err(ServiceError::Conflict(format!(
                        "A custom location named '{}' already exists at this location",
                        name
                    )));
                }
            }
            active.name = Set(name);
        }
        if let Some(description) = request.description {
            active.description = Set(Some(description));
        }

        self.custom_locations.update(active).await?;
        info!(custom_location_id = id, "custom location updated");
        self.get_custom_location(id).await
    }

    #[instrument(skip(self))]
    pub async fn delete_custom_location(&self, id: i32) -> Result<(), ServiceError> {
        self.custom_locations.delete(id).await?;
        info!(custom_location_id = id, "custom location deleted");
        Ok(())
    }

    pub async fn custom_location_model(
        &self,
        id: i32,
    ) -> Result<custom_location::Model, ServiceError> {
        self.custom_locations
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Custom location", id))
    }

    /// The unique (state, fab) index treats NULL fabs as distinct, so fab-less
    /// rows are checked here. `except` skips the row being updated.
    async fn ensure_no_fabless_twin(&self, state: &str, except: Option<i32>) -> Result<(), ServiceError> {
        let twins = self.locations.find_without_fab(state).await?;
        if twins.iter().any(|twin| Some(twin.id) != except) {
            return Err(ServiceError::Conflict(
                "A location with this state and fab already exists".to_string(),
            ));
        }
        Ok(())
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
