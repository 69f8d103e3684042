use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use std::sync::Arc;

use crate::entities::{
    comment::OwnerKind,
    tool::{self, ToolStatus, ToolType},
    tool_tag, tool_technician,
};
use crate::errors::ServiceError;
use crate::repositories::{fetch_page, like_pattern, lower_like, Repository};

use super::{BaseRepository, OwnedRecordRepository};

/// Optional filters for tool listings
#[derive(Debug, Clone, Default)]
pub struct ToolFilter {
    /// Matches name, first serial number or location name
    pub search: Option<String>,
    pub status: Option<ToolStatus>,
    pub tool_type: Option<ToolType>,
    pub location_id: Option<i32>,
}

/// Repository for tool operations
#[derive(Debug, Clone)]
pub struct ToolRepository {
    base: BaseRepository,
}

impl ToolRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find a tool by ID
    pub async fn find_by_id(&self, id: i32) -> Result<Option<tool::Model>, ServiceError> {
        tool::Entity::find_by_id(id)
            .one(self.base.get_db())
            .await
            .map_err(ServiceError::DatabaseError)
    }

    pub async fn find_by_name(&self, name: &str) -> Result<Option<tool::Model>, ServiceError> {
        tool::Entity::find()
            .filter(tool::Column::Name.eq(name))
            .one(self.base.get_db())
            .await
            .map_err(ServiceError::DatabaseError)
    }

    /// Tools with the given ids, ordered by name
    pub async fn find_by_ids(&self, ids: &[i32]) -> Result<Vec<tool::Model>, ServiceError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        tool::Entity::find()
            .filter(tool::Column::Id.is_in(ids.to_vec()))
            .order_by_asc(tool::Column::Name)
            .all(self.base.get_db())
            .await
            .map_err(ServiceError::DatabaseError)
    }

    /// Get tools with filters and pagination
    pub async fn find_all(
        &self,
        filter: &ToolFilter,
        page: u64,
        page_size: u64,
    ) -> Result<(Vec<tool::Model>, u64), ServiceError> {
        let mut query = tool::Entity::find();

        if let Some(pattern) = like_pattern(filter.search.as_deref()) {
            query = query.filter(
                Condition::any()
                    .add(lower_like(tool::Column::Name, &pattern))
                    .add(lower_like(tool::Column::SerialNumber1, &pattern))
                    .add(lower_like(tool::Column::LocationName, &pattern)),
            );
        }
        if let Some(status) = filter.status {
            query = query.filter(tool::Column::Status.eq(status));
        }
        if let Some(tool_type) = filter.tool_type {
            query = query.filter(tool::Column::ToolType.eq(tool_type));
        }
        if let Some(location_id) = filter.location_id {
            query = query.filter(tool::Column::LocationId.eq(location_id));
        }

        let query = query
            .order_by_asc(tool::Column::Name)
            .order_by_asc(tool::Column::Id);
        fetch_page(self.base.get_db(), query, page, page_size)
            .await
            .map_err(ServiceError::DatabaseError)
    }

    pub async fn count(&self) -> Result<u64, ServiceError> {
        tool::Entity::find()
            .count(self.base.get_db())
            .await
            .map_err(ServiceError::DatabaseError)
    }

    /// Create a new tool
    pub async fn create(&self, tool: tool::ActiveModel) -> Result<tool::Model, ServiceError> {
        tool.insert(self.base.get_db())
            .await
            .map_err(ServiceError::DatabaseError)
    }

    /// Persist changes already applied to an active model
    pub async fn update(&self, tool: tool::ActiveModel) -> Result<tool::Model, ServiceError> {
        tool.update(self.base.get_db())
            .await
            .map_err(ServiceError::DatabaseError)
    }

    /// Delete a tool with its comments and attachments. Movements, tags and
    /// technician rows go with it through their foreign keys.
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        let txn = self
            .base
            .get_db()
            .begin()
            .await
            .map_err(ServiceError::DatabaseError)?;

        OwnedRecordRepository::delete_for_owner(&txn, OwnerKind::Tool, id)
            .await
            .map_err(ServiceError::DatabaseError)?;
        let result = tool::Entity::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(ServiceError::DatabaseError)?;
        if result.rows_affected == 0 {
            return Err(ServiceError::not_found("Tool", id));
        }

        txn.commit().await.map_err(ServiceError::DatabaseError)
    }

    pub async fn technician_ids(&self, tool_id: i32) -> Result<Vec<i32>, ServiceError> {
        tool_technician::Entity::find()
            .select_only()
            .column(tool_technician::Column::UserId)
            .filter(tool_technician::Column::ToolId.eq(tool_id))
            .order_by_asc(tool_technician::Column::UserId)
            .into_tuple()
            .all(self.base.get_db())
            .await
            .map_err(ServiceError::DatabaseError)
    }

    /// Tool ids the user is listed as technician on
    pub async fn tool_ids_for_technician(&self, user_id: i32) -> Result<Vec<i32>, ServiceError> {
        tool_technician::Entity::find()
            .select_only()
            .column(tool_technician::Column::ToolId)
            .filter(tool_technician::Column::UserId.eq(user_id))
            .into_tuple()
            .all(self.base.get_db())
            .await
            .map_err(ServiceError::DatabaseError)
    }

    pub async fn add_technician(&self, tool_id: i32, user_id: i32) -> Result<(), ServiceError> {
        let exists = tool_technician::Entity::find_by_id((tool_id, user_id))
            .one(self.base.get_db())
            .await
            .map_err(ServiceError::DatabaseError)?;
        if exists.is_none() {
            tool_technician::ActiveModel {
                tool_id: Set(tool_id),
                user_id: Set(user_id),
            }
            .insert(self.base.get_db())
            .await
            .map_err(ServiceError::DatabaseError)?;
        }
        Ok(())
    }

    /// Swap the technician set of a tool in one transaction
    pub async fn replace_technicians(
        &self,
        tool_id: i32,
        user_ids: &[i32],
    ) -> Result<(), ServiceError> {
        let txn = self
            .base
            .get_db()
            .begin()
            .await
            .map_err(ServiceError::DatabaseError)?;

        tool_technician::Entity::delete_many()
            .filter(tool_technician::Column::ToolId.eq(tool_id))
            .exec(&txn)
            .await
            .map_err(ServiceError::DatabaseError)?;

        for user_id in dedup(user_ids) {
            tool_technician::ActiveModel {
                tool_id: Set(tool_id),
                user_id: Set(user_id),
            }
            .insert(&txn)
            .await
            .map_err(ServiceError::DatabaseError)?;
        }

        txn.commit().await.map_err(ServiceError::DatabaseError)
    }

    pub async fn tags(&self, tool_id: i32) -> Result<Vec<String>, ServiceError> {
        tool_tag::Entity::find()
            .select_only()
            .column(tool_tag::Column::Tag)
            .filter(tool_tag::Column::ToolId.eq(tool_id))
            .order_by_asc(tool_tag::Column::Tag)
            .into_tuple()
            .all(self.base.get_db())
            .await
            .map_err(ServiceError::DatabaseError)
    }

    /// Swap the tag set of a tool in one transaction. Blank tags are dropped.
    pub async fn replace_tags(&self, tool_id: i32, tags: &[String]) -> Result<(), ServiceError> {
        let mut cleaned: Vec<String> = tags
            .iter()
            .map(|tag| tag.trim().to_string())
            .filter(|tag| !tag.is_empty())
            .collect();
        cleaned.sort();
        cleaned.dedup();

        let txn = self
            .base
            .get_db()
            .begin()
            .await
            .map_err(ServiceError::DatabaseError)?;

        tool_tag::Entity::delete_many()
            .filter(tool_tag::Column::ToolId.eq(tool_id))
            .exec(&txn)
            .await
            .map_err(ServiceError::DatabaseError)?;

        for tag in cleaned {
            tool_tag::ActiveModel {
                tool_id: Set(tool_id),
                tag: Set(tag),
            }
            .insert(&txn)
            .await
            .map_err(ServiceError::DatabaseError)?;
        }

        txn.commit().await.map_err(ServiceError::DatabaseError)
    }
}

/// Order-preserving de-duplication for id lists coming from clients.
pub(crate) fn dedup(ids: &[i32]) -> Vec<i32> {
    let mut seen = std::collections::HashSet::new();
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}

impl Repository for ToolRepository {
    fn get_db(&self) -> &DatabaseConnection {
        self.base.get_db()
    }
}

#[cfg(test)]
mod tests {
    use super::dedup;

    #[test]
    fn dedup_keeps_first_occurrence() {
        assert_eq!(dedup(&[3, 1, 3, 2, 1]), vec![3, 1, 2]);
    }
}
