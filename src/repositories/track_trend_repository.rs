use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use std::sync::Arc;

use crate::entities::{comment::OwnerKind, track_trend, track_trend_relation, track_trend_tool};
use crate::errors::ServiceError;
use crate::repositories::{fetch_page, Repository};

use super::{tool_repository::dedup, BaseRepository, OwnedRecordRepository};

const DUPLICATE_NAME: &str = "A track & trend with this name already exists";

/// Repository for track & trend operations
#[derive(Debug, Clone)]
pub struct TrackTrendRepository {
    base: BaseRepository,
}

impl TrackTrendRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<track_trend::Model>, ServiceError> {
        track_trend::Entity::find_by_id(id)
            .one(self.base.get_db())
            .await
            .map_err(ServiceError::DatabaseError)
    }

    pub async fn find_by_ids(&self, ids: &[i32]) -> Result<Vec<track_trend::Model>, ServiceError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        track_trend::Entity::find()
            .filter(track_trend::Column::Id.is_in(ids.to_vec()))
            .order_by_asc(track_trend::Column::Name)
            .all(self.base.get_db())
            .await
            .map_err(ServiceError::DatabaseError)
    }

    pub async fn find_all(
        &self,
        page: u64,
        page_size: u64,
    ) -> Result<(Vec<track_trend::Model>, u64), ServiceError> {
        let query = track_trend::Entity::find().order_by_asc(track_trend::Column::Name);
        fetch_page(self.base.get_db(), query, page, page_size)
            .await
            .map_err(ServiceError::DatabaseError)
    }

    /// Every investigation except `exclude_id`, ordered by name
    pub async fn find_all_except(
        &self,
        exclude_id: i32,
    ) -> Result<Vec<track_trend::Model>, ServiceError> {
        track_trend::Entity::find()
            .filter(track_trend::Column::Id.ne(exclude_id))
            .order_by_asc(track_trend::Column::Name)
            .all(self.base.get_db())
            .await
            .map_err(ServiceError::DatabaseError)
    }

    pub async fn create(
        &self,
        track_trend: track_trend::ActiveModel,
    ) -> Result<track_trend::Model, ServiceError> {
        track_trend
            .insert(self.base.get_db())
            .await
            .map_err(|e| ServiceError::from_write_error(e, DUPLICATE_NAME))
    }

    pub async fn update(
        &self,
        track_trend: track_trend::ActiveModel,
    ) -> Result<track_trend::Model, ServiceError> {
        track_trend
            .update(self.base.get_db())
            .await
            .map_err(|e| ServiceError::from_write_error(e, DUPLICATE_NAME))
    }

    /// Delete an investigation with its comments and attachments. Tool links
    /// and relations in both directions cascade.
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        let txn = self
            .base
            .get_db()
            .begin()
            .await
            .map_err(ServiceError::DatabaseError)?;

        OwnedRecordRepository::delete_for_owner(&txn, OwnerKind::TrackTrend, id)
            .await
            .map_err(ServiceError::DatabaseError)?;
        let result = track_trend::Entity::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(ServiceError::DatabaseError)?;
        if result.rows_affected == 0 {
            return Err(ServiceError::not_found("Track & trend", id));
        }

        txn.commit().await.map_err(ServiceError::DatabaseError)
    }

    pub async fn tool_ids(&self, track_trend_id: i32) -> Result<Vec<i32>, ServiceError> {
        track_trend_tool::Entity::find()
            .select_only()
            .column(track_trend_tool::Column::ToolId)
            .filter(track_trend_tool::Column::TrackTrendId.eq(track_trend_id))
            .order_by_asc(track_trend_tool::Column::ToolId)
            .into_tuple()
            .all(self.base.get_db())
            .await
            .map_err(ServiceError::DatabaseError)
    }

    /// Investigations that list `tool_id` among their affected tools
    pub async fn ids_for_tool(&self, tool_id: i32) -> Result<Vec<i32>, ServiceError> {
        track_trend_tool::Entity::find()
            .select_only()
            .column(track_trend_tool::Column::TrackTrendId)
            .filter(track_trend_tool::Column::ToolId.eq(tool_id))
            .into_tuple()
            .all(self.base.get_db())
            .await
            .map_err(ServiceError::DatabaseError)
    }

    pub async fn replace_tools(
        &self,
        track_trend_id: i32,
        tool_ids: &[i32],
    ) -> Result<(), ServiceError> {
        let txn = self
            .base
            .get_db()
            .begin()
            .await
            .map_err(ServiceError::DatabaseError)?;

        track_trend_tool::Entity::delete_many()
            .filter(track_trend_tool::Column::TrackTrendId.eq(track_trend_id))
            .exec(&txn)
            .await
            .map_err(ServiceError::DatabaseError)?;

        for tool_id in dedup(tool_ids) {
            track_trend_tool::ActiveModel {
                track_trend_id: Set(track_trend_id),
                tool_id: Set(tool_id),
            }
            .insert(&txn)
            .await
            .map_err(ServiceError::DatabaseError)?;
        }

        txn.commit().await.map_err(ServiceError::DatabaseError)
    }

    pub async fn related_ids(&self, track_trend_id: i32) -> Result<Vec<i32>, ServiceError> {
        track_trend_relation::Entity::find()
            .select_only()
            .column(track_trend_relation::Column::RelatedTrackTrendId)
            .filter(track_trend_relation::Column::TrackTrendId.eq(track_trend_id))
            .into_tuple()
            .all(self.base.get_db())
            .await
            .map_err(ServiceError::DatabaseError)
    }

    /// Replaces the relation set of an investigation. Each link is stored in
    /// both directions so either side sees the other.
    pub async fn replace_related(
        &self,
        track_trend_id: i32,
        related_ids: &[i32],
    ) -> Result<(), ServiceError> {
        let txn = self
            .base
            .get_db()
            .begin()
            .await
            .map_err(ServiceError::DatabaseError)?;

        track_trend_relation::Entity::delete_many()
            .filter(
                Condition::any()
                    .add(track_trend_relation::Column::TrackTrendId.eq(track_trend_id))
                    .add(track_trend_relation::Column::RelatedTrackTrendId.eq(track_trend_id)),
            )
            .exec(&txn)
            .await
            .map_err(ServiceError::DatabaseError)?;

        for related_id in dedup(related_ids)
            .into_iter()
            .filter(|related_id| *related_id != track_trend_id)
        {
            for (from, to) in [(track_trend_id, related_id), (related_id, track_trend_id)] {
                track_trend_relation::ActiveModel {
                    track_trend_id: Set(from),
                    related_track_trend_id: Set(to),
                }
                .insert(&txn)
                .await
                .map_err(ServiceError::DatabaseError)?;
            }
        }

        txn.commit().await.map_err(ServiceError::DatabaseError)
    }
}

impl Repository for TrackTrendRepository {
    fn get_db(&self) -> &DatabaseConnection {
        self.base.get_db()
    }
}
