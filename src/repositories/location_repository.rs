use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use std::collections::HashMap;
use std::sync::Arc;

use crate::entities::{custom_location, location, moving_part};
use crate::errors::ServiceError;
use crate::repositories::{fetch_page, Repository};

use super::BaseRepository;

/// Repository for location operations
#[derive(Debug, Clone)]
pub struct LocationRepository {
    base: BaseRepository,
}

impl LocationRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<location::Model>, ServiceError> {
        location::Entity::find_by_id(id)
            .one(self.base.get_db())
            .await
            .map_err(ServiceError::DatabaseError)
    }

    pub async fn find_by_state_and_fab(
        &self,
        state: &str,
        fab: &str,
    ) -> Result<Option<location::Model>, ServiceError> {
        location::Entity::find()
            .filter(location::Column::State.eq(state))
            .filter(location::Column::Fab.eq(fab))
            .one(self.base.get_db())
            .await
            .map_err(ServiceError::DatabaseError)
    }

    /// Locations in `state` that carry no fab
    pub async fn find_without_fab(&self, state: &str) -> Result<Vec<location::Model>, ServiceError> {
        location::Entity::find()
            .filter(location::Column::State.eq(state))
            .filter(location::Column::Fab.is_null())
            .all(self.base.get_db())
            .await
            .map_err(ServiceError::DatabaseError)
    }

    pub async fn find_default(&self) -> Result<Option<location::Model>, ServiceError> {
        location::Entity::find()
            .filter(location::Column::DefaultLocation.eq(true))
            .order_by_asc(location::Column::Id)
            .one(self.base.get_db())
            .await
            .map_err(ServiceError::DatabaseError)
    }

    /// Get all locations with pagination, ordered by state then fab
    pub async fn find_all(
        &self,
        page: u64,
        page_size: u64,
    ) -> Result<(Vec<location::Model>, u64), ServiceError> {
        let query = location::Entity::find()
            .order_by_asc(location::Column::State)
            .order_by_asc(location::Column::Fab);
        fetch_page(self.base.get_db(), query, page, page_size)
            .await
            .map_err(ServiceError::DatabaseError)
    }

    pub async fn create(
        &self,
        location: location::ActiveModel,
    ) -> Result<location::Model, ServiceError> {
        location.insert(self.base.get_db()).await.map_err(|e| {
            ServiceError::from_write_error(e, "A location with this state and fab already exists")
        })
    }

    pub async fn update(
        &self,
        location: location::ActiveModel,
    ) -> Result<location::Model, ServiceError> {
        location.update(self.base.get_db()).await.map_err(|e| {
            ServiceError::from_write_error(e, "A location with this state and fab already exists")
        })
    }

    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        let result = location::Entity::delete_by_id(id)
            .exec(self.base.get_db())
            .await
            .map_err(ServiceError::DatabaseError)?;
        if result.rows_affected == 0 {
            return Err(ServiceError::not_found("Location", id));
        }
        Ok(())
    }

    /// Clears every default flag and sets it on `id`, atomically
    pub async fn set_default(&self, id: i32) -> Result<location::Model, ServiceError> {
        let txn = self
            .base
            .get_db()
            .begin()
            .await
            .map_err(ServiceError::DatabaseError)?;

        let target = location::Entity::find_by_id(id)
            .one(&txn)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| ServiceError::not_found("Location", id))?;

        location::Entity::update_many()
            .col_expr(location::Column::DefaultLocation, Expr::value(false))
            .filter(location::Column::DefaultLocation.eq(true))
            .exec(&txn)
            .await
            .map_err(ServiceError::DatabaseError)?;

        let mut active: location::ActiveModel = target.into();
        active.default_location = Set(true);
        let updated = active.update(&txn).await.map_err(ServiceError::DatabaseError)?;

        txn.commit().await.map_err(ServiceError::DatabaseError)?;
        Ok(updated)
    }
}

impl Repository for LocationRepository {
    fn get_db(&self) -> &DatabaseConnection {
        self.base.get_db()
    }
}

/// Repository for custom sub-locations
#[derive(Debug, Clone)]
pub struct CustomLocationRepository {
    base: BaseRepository,
}

impl CustomLocationRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_by_id(
        &self,
        id: i32,
    ) -> Result<Option<custom_location::Model>, ServiceError> {
        custom_location::Entity::find_by_id(id)
            .one(self.base.get_db())
            .await
            .map_err(ServiceError::DatabaseError)
    }

    pub async fn find_by_location(
        &self,
        location_id: i32,
    ) -> Result<Vec<custom_location::Model>, ServiceError> {
        custom_location::Entity::find()
            .filter(custom_location::Column::LocationId.eq(location_id))
            .order_by_asc(custom_location::Column::Name)
            .all(self.base.get_db())
            .await
            .map_err(ServiceError::DatabaseError)
    }

    /// Case-insensitive name lookup within one location
    pub async fn find_by_name(
        &self,
        location_id: i32,
        name: &str,
    ) -> Result<Option<custom_location::Model>, ServiceError> {
        let wanted = name.trim().to_lowercase();
        Ok(self
            .find_by_location(location_id)
            .await?
            .into_iter()
            .find(|existing| existing.name.trim().to_lowercase() == wanted))
    }

    /// Incoming moving parts per custom location of `location_id`
    pub async fn incoming_part_counts(
        &self,
        location_id: i32,
    ) -> Result<HashMap<i32, i64>, ServiceError> {
        let ids: Vec<i32> = custom_location::Entity::find()
            .select_only()
            .column(custom_location::Column::Id)
            .filter(custom_location::Column::LocationId.eq(location_id))
            .into_tuple()
            .all(self.base.get_db())
            .await
            .map_err(ServiceError::DatabaseError)?;
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows: Vec<(Option<i32>, i64)> = moving_part::Entity::find()
            .select_only()
            .column(moving_part::Column::ToCustomLocationId)
            .column_as(Expr::col(moving_part::Column::Id).count(), "part_count")
            .filter(moving_part::Column::ToCustomLocationId.is_in(ids))
            .group_by(moving_part::Column::ToCustomLocationId)
            .into_tuple()
            .all(self.base.get_db())
            .await
            .map_err(ServiceError::DatabaseError)?;

        Ok(rows
            .into_iter()
            .filter_map(|(id, count)| id.map(|id| (id, count)))
            .collect())
    }

    pub async fn count_incoming(&self, custom_location_id: i32) -> Result<u64, ServiceError> {
        moving_part::Entity::find()
            .filter(moving_part::Column::ToCustomLocationId.eq(custom_location_id))
            .count(self.base.get_db())
            .await
            .map_err(ServiceError::DatabaseError)
    }

    pub async fn create(
        &self,
        custom_location: custom_location::ActiveModel,
    ) -> Result<custom_location::Model, ServiceError> {
        custom_location
            .insert(self.base.get_db())
            .await
            .map_err(ServiceError::DatabaseError)
    }

    pub async fn update(
        &self,
        custom_location: custom_location::ActiveModel,
    ) -> Result<custom_location::Model, ServiceError> {
        custom_location
            .update(self.base.get_db())
            .await
            .map_err(ServiceError::DatabaseError)
    }

    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        let result = custom_location::Entity::delete_by_id(id)
            .exec(self.base.get_db())
            .await
            .map_err(ServiceError::DatabaseError)?;
        if result.rows_affected == 0 {
            return Err(ServiceError::not_found("Custom location", id));
        }
        Ok(())
    }
}

impl Repository for CustomLocationRepository {
    fn get_db(&self) -> &DatabaseConnection {
        self.base.get_db()
    }
}
