use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use std::sync::Arc;

use crate::entities::{part, part_movement};
use crate::errors::ServiceError;
use crate::repositories::{fetch_page, like_pattern, lower_like, Repository};

use super::BaseRepository;

const DUPLICATE_PART_NUMBER: &str = "A part with this part number already exists";

/// Repository for part and part movement operations
#[derive(Debug, Clone)]
pub struct PartRepository {
    base: BaseRepository,
}

impl PartRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<part::Model>, ServiceError> {
        part::Entity::find_by_id(id)
            .one(self.base.get_db())
            .await
            .map_err(ServiceError::DatabaseError)
    }

    pub async fn find_by_ids(&self, ids: &[i32]) -> Result<Vec<part::Model>, ServiceError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        part::Entity::find()
            .filter(part::Column::Id.is_in(ids.to_vec()))
            .order_by_asc(part::Column::Name)
            .all(self.base.get_db())
            .await
            .map_err(ServiceError::DatabaseError)
    }

    /// Parts matching an optional name/part number search, paginated
    pub async fn find_all(
        &self,
        search: Option<&str>,
        location_id: Option<i32>,
        page: u64,
        page_size: u64,
    ) -> Result<(Vec<part::Model>, u64), ServiceError> {
        let mut query = part::Entity::find();
        if let Some(pattern) = like_pattern(search) {
            query = query.filter(
                Condition::any()
                    .add(lower_like(part::Column::Name, &pattern))
                    .add(lower_like(part::Column::PartNumber, &pattern)),
            );
        }
        if let Some(location_id) = location_id {
            query = query.filter(part::Column::LocationId.eq(location_id));
        }
        let query = query.order_by_asc(part::Column::Name);
        fetch_page(self.base.get_db(), query, page, page_size)
            .await
            .map_err(ServiceError::DatabaseError)
    }

    pub async fn create(&self, part: part::ActiveModel) -> Result<part::Model, ServiceError> {
        part.insert(self.base.get_db())
            .await
            .map_err(|e| ServiceError::from_write_error(e, DUPLICATE_PART_NUMBER))
    }

    pub async fn update(&self, part: part::ActiveModel) -> Result<part::Model, ServiceError> {
        part.update(self.base.get_db())
            .await
            .map_err(|e| ServiceError::from_write_error(e, DUPLICATE_PART_NUMBER))
    }

    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        let result = part::Entity::delete_by_id(id)
            .exec(self.base.get_db())
            .await
            .map_err(ServiceError::DatabaseError)?;
        if result.rows_affected == 0 {
            return Err(ServiceError::not_found("Part", id));
        }
        Ok(())
    }

    /// Movement history of a tool, newest first
    pub async fn movements_for_tool(
        &self,
        tool_id: i32,
    ) -> Result<Vec<part_movement::Model>, ServiceError> {
        part_movement::Entity::find()
            .filter(part_movement::Column::ToolId.eq(tool_id))
            .order_by_desc(part_movement::Column::Timestamp)
            .order_by_desc(part_movement::Column::Id)
            .all(self.base.get_db())
            .await
            .map_err(ServiceError::DatabaseError)
    }

    /// Inserts a movement and writes the part's new quantity in one transaction
    pub async fn record_movement(
        &self,
        movement: part_movement::ActiveModel,
        part: part::Model,
        new_quantity: i32,
    ) -> Result<(part_movement::Model, part::Model), ServiceError> {
        let txn = self
            .base
            .get_db()
            .begin()
            .await
            .map_err(ServiceError::DatabaseError)?;

        let movement = movement
            .insert(&txn)
            .await
            .map_err(ServiceError::DatabaseError)?;

        let mut active: part::ActiveModel = part.into();
        active.quantity = Set(new_quantity);
        let part = active.update(&txn).await.map_err(ServiceError::DatabaseError)?;

        txn.commit().await.map_err(ServiceError::DatabaseError)?;
        Ok((movement, part))
    }
}

impl Repository for PartRepository {
    fn get_db(&self) -> &DatabaseConnection {
        self.base.get_db()
    }
}
