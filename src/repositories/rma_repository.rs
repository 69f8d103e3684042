use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};
use std::sync::Arc;

use crate::entities::{
    comment::OwnerKind,
    rma::{self, RmaPriority, RmaStatus},
    rma_labor_entry, rma_part, rma_part_line_item,
};
use crate::errors::ServiceError;
use crate::repositories::{fetch_page, like_pattern, lower_like, Repository};

use super::{tool_repository::dedup, BaseRepository, OwnedRecordRepository};

/// Optional filters for RMA listings
#[derive(Debug, Clone, Default)]
pub struct RmaFilter {
    pub status: Option<RmaStatus>,
    pub priority: Option<RmaPriority>,
    /// Case-insensitive match on the customer name
    pub customer: Option<String>,
    pub tool_id: Option<i32>,
}

/// Repository for RMA operations
#[derive(Debug, Clone)]
pub struct RmaRepository {
    base: BaseRepository,
}

impl RmaRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<rma::Model>, ServiceError> {
        rma::Entity::find_by_id(id)
            .one(self.base.get_db())
            .await
            .map_err(ServiceError::DatabaseError)
    }

    /// Get RMAs with filters and pagination, newest first
    pub async fn find_all(
        &self,
        filter: &RmaFilter,
        page: u64,
        page_size: u64,
    ) -> Result<(Vec<rma::Model>, u64), ServiceError> {
        let mut query = rma::Entity::find();
        if let Some(status) = filter.status {
            query = query.filter(rma::Column::Status.eq(status));
        }
        if let Some(priority) = filter.priority {
            query = query.filter(rma::Column::Priority.eq(priority));
        }
        if let Some(pattern) = like_pattern(filter.customer.as_deref()) {
            query = query.filter(lower_like(rma::Column::CustomerName, &pattern));
        }
        if let Some(tool_id) = filter.tool_id {
            query = query.filter(rma::Column::ToolId.eq(tool_id));
        }
        let query = query.order_by_desc(rma::Column::Id);
        fetch_page(self.base.get_db(), query, page, page_size)
            .await
            .map_err(ServiceError::DatabaseError)
    }

    /// RMAs raised against any of the given tools, newest first
    pub async fn find_by_tool_ids(&self, tool_ids: &[i32]) -> Result<Vec<rma::Model>, ServiceError> {
        if tool_ids.is_empty() {
            return Ok(Vec::new());
        }
        rma::Entity::find()
            .filter(rma::Column::ToolId.is_in(tool_ids.to_vec()))
            .order_by_desc(rma::Column::Id)
            .all(self.base.get_db())
            .await
            .map_err(ServiceError::DatabaseError)
    }

    pub async fn create(&self, rma: rma::ActiveModel) -> Result<rma::Model, ServiceError> {
        rma.insert(self.base.get_db())
            .await
            .map_err(ServiceError::DatabaseError)
    }

    pub async fn update(&self, rma: rma::ActiveModel) -> Result<rma::Model, ServiceError> {
        rma.update(self.base.get_db())
            .await
            .map_err(ServiceError::DatabaseError)
    }

    /// Delete an RMA with its comments and attachments. Line items, labor
    /// and part links cascade.
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        let txn = self
            .base
            .get_db()
            .begin()
            .await
            .map_err(ServiceError::DatabaseError)?;

        OwnedRecordRepository::delete_for_owner(&txn, OwnerKind::Rma, id)
            .await
            .map_err(ServiceError::DatabaseError)?;
        let result = rma::Entity::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(ServiceError::DatabaseError)?;
        if result.rows_affected == 0 {
            return Err(ServiceError::not_found("RMA", id));
        }

        txn.commit().await.map_err(ServiceError::DatabaseError)
    }

    pub async fn part_ids(&self, rma_id: i32) -> Result<Vec<i32>, ServiceError> {
        rma_part::Entity::find()
            .select_only()
            .column(rma_part::Column::PartId)
            .filter(rma_part::Column::RmaId.eq(rma_id))
            .order_by_asc(rma_part::Column::PartId)
            .into_tuple()
            .all(self.base.get_db())
            .await
            .map_err(ServiceError::DatabaseError)
    }

    pub async fn replace_parts(&self, rma_id: i32, part_ids: &[i32]) -> Result<(), ServiceError> {
        let txn = self
            .base
            .get_db()
            .begin()
            .await
            .map_err(ServiceError::DatabaseError)?;

        rma_part::Entity::delete_many()
            .filter(rma_part::Column::RmaId.eq(rma_id))
            .exec(&txn)
            .await
            .map_err(ServiceError::DatabaseError)?;

        for part_id in dedup(part_ids) {
            rma_part::ActiveModel {
                rma_id: Set(rma_id),
                part_id: Set(part_id),
            }
            .insert(&txn)
            .await
            .map_err(ServiceError::DatabaseError)?;
        }

        txn.commit().await.map_err(ServiceError::DatabaseError)
    }

    pub async fn line_items(
        &self,
        rma_id: i32,
    ) -> Result<Vec<rma_part_line_item::Model>, ServiceError> {
        rma_part_line_item::Entity::find()
            .filter(rma_part_line_item::Column::RmaId.eq(rma_id))
            .order_by_asc(rma_part_line_item::Column::Id)
            .all(self.base.get_db())
            .await
            .map_err(ServiceError::DatabaseError)
    }

    pub async fn add_line_item(
        &self,
        item: rma_part_line_item::ActiveModel,
    ) -> Result<rma_part_line_item::Model, ServiceError> {
        item.insert(self.base.get_db())
            .await
            .map_err(ServiceError::DatabaseError)
    }

    pub async fn labor_entries(
        &self,
        rma_id: i32,
    ) -> Result<Vec<rma_labor_entry::Model>, ServiceError> {
        rma_labor_entry::Entity::find()
            .filter(rma_labor_entry::Column::RmaId.eq(rma_id))
            .order_by_asc(rma_labor_entry::Column::LaborDate)
            .order_by_asc(rma_labor_entry::Column::Id)
            .all(self.base.get_db())
            .await
            .map_err(ServiceError::DatabaseError)
    }

    pub async fn add_labor_entry(
        &self,
        entry: rma_labor_entry::ActiveModel,
    ) -> Result<rma_labor_entry::Model, ServiceError> {
        entry
            .insert(self.base.get_db())
            .await
            .map_err(ServiceError::DatabaseError)
    }
}

impl Repository for RmaRepository {
    fn get_db(&self) -> &DatabaseConnection {
        self.base.get_db()
    }
}
