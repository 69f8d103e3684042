use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder,
};
use std::sync::Arc;

use crate::entities::{json_list, moving_part};
use crate::errors::ServiceError;
use crate::repositories::{fetch_page, Repository};

use super::BaseRepository;

/// Repository for moving part operations
#[derive(Debug, Clone)]
pub struct MovingPartRepository {
    base: BaseRepository,
}

impl MovingPartRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<moving_part::Model>, ServiceError> {
        moving_part::Entity::find_by_id(id)
            .one(self.base.get_db())
            .await
            .map_err(ServiceError::DatabaseError)
    }

    /// All moving parts, most recent move first
    pub async fn find_all(
        &self,
        page: u64,
        page_size: u64,
    ) -> Result<(Vec<moving_part::Model>, u64), ServiceError> {
        let query = moving_part::Entity::find()
            .order_by_desc(moving_part::Column::MoveDate)
            .order_by_desc(moving_part::Column::Id);
        fetch_page(self.base.get_db(), query, page, page_size)
            .await
            .map_err(ServiceError::DatabaseError)
    }

    /// Parts that left `tool_id` or pass through it anywhere in their chain
    pub async fn find_by_tool(&self, tool_id: i32) -> Result<Vec<moving_part::Model>, ServiceError> {
        let chain_match = json_list::chain_like_patterns(tool_id)
            .into_iter()
            .fold(Condition::any(), |condition, pattern| {
                condition.add(moving_part::Column::DestinationChain.like(pattern))
            });

        moving_part::Entity::find()
            .filter(
                Condition::any()
                    .add(moving_part::Column::FromToolId.eq(tool_id))
                    .add(chain_match),
            )
            .order_by_desc(moving_part::Column::MoveDate)
            .order_by_desc(moving_part::Column::Id)
            .all(self.base.get_db())
            .await
            .map_err(ServiceError::DatabaseError)
    }

    pub async fn find_by_rma(&self, rma_id: i32) -> Result<Vec<moving_part::Model>, ServiceError> {
        moving_part::Entity::find()
            .filter(moving_part::Column::RmaId.eq(rma_id))
            .order_by_desc(moving_part::Column::MoveDate)
            .all(self.base.get_db())
            .await
            .map_err(ServiceError::DatabaseError)
    }

    pub async fn create(
        &self,
        moving_part: moving_part::ActiveModel,
    ) -> Result<moving_part::Model, ServiceError> {
        moving_part
            .insert(self.base.get_db())
            .await
            .map_err(ServiceError::DatabaseError)
    }

    pub async fn update(
        &self,
        moving_part: moving_part::ActiveModel,
    ) -> Result<moving_part::Model, ServiceError> {
        moving_part
            .update(self.base.get_db())
            .await
            .map_err(ServiceError::DatabaseError)
    }

    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        let result = moving_part::Entity::delete_by_id(id)
            .exec(self.base.get_db())
            .await
            .map_err(ServiceError::DatabaseError)?;
        if result.rows_affected == 0 {
            return Err(ServiceError::not_found("Moving part", id));
        }
        Ok(())
    }
}

impl Repository for MovingPartRepository {
    fn get_db(&self) -> &DatabaseConnection {
        self.base.get_db()
    }
}
