use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use std::sync::Arc;

use crate::entities::{comment::OwnerKind, passdown, passdown_tech, passdown_tool};
use crate::errors::ServiceError;
use crate::repositories::{fetch_page, Repository};

use super::{tool_repository::dedup, BaseRepository, OwnedRecordRepository};

/// Optional filters for passdown listings
#[derive(Debug, Clone, Default)]
pub struct PassdownFilter {
    pub date: Option<NaiveDate>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub tool_id: Option<i32>,
}

/// Repository for passdown operations
#[derive(Debug, Clone)]
pub struct PassdownRepository {
    base: BaseRepository,
}

impl PassdownRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn count(&self) -> Result<u64, ServiceError> {
        passdown::Entity::find()
            .count(self.base.get_db())
            .await
            .map_err(ServiceError::DatabaseError)
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<passdown::Model>, ServiceError> {
        passdown::Entity::find_by_id(id)
            .one(self.base.get_db())
            .await
            .map_err(ServiceError::DatabaseError)
    }

    /// Get passdowns with filters and pagination, latest date first
    pub async fn find_all(
        &self,
        filter: &PassdownFilter,
        page: u64,
        page_size: u64,
    ) -> Result<(Vec<passdown::Model>, u64), ServiceError> {
        let mut query = passdown::Entity::find();
        if let Some(date) = filter.date {
            query = query.filter(passdown::Column::Date.eq(date));
        }
        if let Some(start) = filter.start {
            query = query.filter(passdown::Column::Date.gte(start));
        }
        if let Some(end) = filter.end {
            query = query.filter(passdown::Column::Date.lte(end));
        }
        if let Some(tool_id) = filter.tool_id {
            let ids = self.passdown_ids_for_tool(tool_id).await?;
            query = query.filter(passdown::Column::Id.is_in(ids));
        }
        let query = query
            .order_by_desc(passdown::Column::Date)
            .order_by_desc(passdown::Column::Id);
        fetch_page(self.base.get_db(), query, page, page_size)
            .await
            .map_err(ServiceError::DatabaseError)
    }

    /// Every passdown linked to `tool_id`, latest date first
    pub async fn find_by_tool(&self, tool_id: i32) -> Result<Vec<passdown::Model>, ServiceError> {
        let ids = self.passdown_ids_for_tool(tool_id).await?;
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        passdown::Entity::find()
            .filter(passdown::Column::Id.is_in(ids))
            .order_by_desc(passdown::Column::Date)
            .order_by_desc(passdown::Column::Id)
            .all(self.base.get_db())
            .await
            .map_err(ServiceError::DatabaseError)
    }

    /// Passdowns written on `date` with exactly this comment
    pub async fn find_same_day_comment(
        &self,
        date: NaiveDate,
        comment: &str,
    ) -> Result<Vec<passdown::Model>, ServiceError> {
        passdown::Entity::find()
            .filter(passdown::Column::Date.eq(date))
            .filter(passdown::Column::Comment.eq(comment))
            .all(self.base.get_db())
            .await
            .map_err(ServiceError::DatabaseError)
    }

    pub async fn passdown_ids_for_tool(&self, tool_id: i32) -> Result<Vec<i32>, ServiceError> {
        passdown_tool::Entity::find()
            .select_only()
            .column(passdown_tool::Column::PassdownId)
            .filter(passdown_tool::Column::ToolId.eq(tool_id))
            .into_tuple()
            .all(self.base.get_db())
            .await
            .map_err(ServiceError::DatabaseError)
    }

    pub async fn tool_ids(&self, passdown_id: i32) -> Result<Vec<i32>, ServiceError> {
        passdown_tool::Entity::find()
            .select_only()
            .column(passdown_tool::Column::ToolId)
            .filter(passdown_tool::Column::PassdownId.eq(passdown_id))
            .order_by_asc(passdown_tool::Column::ToolId)
            .into_tuple()
            .all(self.base.get_db())
            .await
            .map_err(ServiceError::DatabaseError)
    }

    pub async fn tech_ids(&self, passdown_id: i32) -> Result<Vec<i32>, ServiceError> {
        passdown_tech::Entity::find()
            .select_only()
            .column(passdown_tech::Column::UserId)
            .filter(passdown_tech::Column::PassdownId.eq(passdown_id))
            .order_by_asc(passdown_tech::Column::UserId)
            .into_tuple()
            .all(self.base.get_db())
            .await
            .map_err(ServiceError::DatabaseError)
    }

    /// Saves a passdown and, when given, replaces its tool and tech links, all in one transaction
    pub async fn save_with_links(
        &self,
        passdown: passdown::ActiveModel,
        tool_ids: Option<&[i32]>,
        tech_ids: Option<&[i32]>,
    ) -> Result<passdown::Model, ServiceError> {
        let txn = self
            .base
            .get_db()
            .begin()
            .await
            .map_err(ServiceError::DatabaseError)?;

        let saved = if passdown.id.is_not_set() {
            passdown.insert(&txn).await
        } else {
            passdown.update(&txn).await
        }
        .map_err(ServiceError::DatabaseError)?;

        if let Some(tool_ids) = tool_ids {
            replace_tools(&txn, saved.id, tool_ids).await?;
        }
        if let Some(tech_ids) = tech_ids {
            replace_techs(&txn, saved.id, tech_ids).await?;
        }

        txn.commit().await.map_err(ServiceError::DatabaseError)?;
        Ok(saved)
    }

    /// Delete a passdown with its attachments. Link rows cascade.
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        let txn = self
            .base
            .get_db()
            .begin()
            .await
            .map_err(ServiceError::DatabaseError)?;

        OwnedRecordRepository::delete_for_owner(&txn, OwnerKind::Passdown, id)
            .await
            .map_err(ServiceError::DatabaseError)?;
        let result = passdown::Entity::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(ServiceError::DatabaseError)?;
        if result.rows_affected == 0 {
            return Err(ServiceError::not_found("Passdown", id));
        }

        txn.commit().await.map_err(ServiceError::DatabaseError)
    }
}

async fn replace_tools(
    txn: &DatabaseTransaction,
    passdown_id: i32,
    tool_ids: &[i32],
) -> Result<(), ServiceError> {
    passdown_tool::Entity::delete_many()
        .filter(passdown_tool::Column::PassdownId.eq(passdown_id))
        .exec(txn)
        .await
        .map_err(ServiceError::DatabaseError)?;
    for tool_id in dedup(tool_ids) {
        passdown_tool::ActiveModel {
            passdown_id: Set(passdown_id),
            tool_id: Set(tool_id),
        }
        .insert(txn)
        .await
        .map_err(ServiceError::DatabaseError)?;
    }
    Ok(())
}

async fn replace_techs(
    txn: &DatabaseTransaction,
    passdown_id: i32,
    user_ids: &[i32],
) -> Result<(), ServiceError> {
    passdown_tech::Entity::delete_many()
        .filter(passdown_tech::Column::PassdownId.eq(passdown_id))
        .exec(txn)
        .await
        .map_err(ServiceError::DatabaseError)?;
    for user_id in dedup(user_ids) {
        passdown_tech::ActiveModel {
            passdown_id: Set(passdown_id),
            user_id: Set(user_id),
        }
        .insert(txn)
        .await
        .map_err(ServiceError::DatabaseError)?;
    }
    Ok(())
}

impl Repository for PassdownRepository {
    fn get_db(&self) -> &DatabaseConnection {
        self.base.get_db()
    }
}
