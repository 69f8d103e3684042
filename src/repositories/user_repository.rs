use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use std::sync::Arc;

use crate::entities::{user, user_tool_assignment};
use crate::errors::ServiceError;
use crate::repositories::{fetch_page, Repository};

use super::{tool_repository::dedup, BaseRepository};

const DUPLICATE_EMAIL: &str = "A user with this email already exists";

/// Repository for user operations
#[derive(Debug, Clone)]
pub struct UserRepository {
    base: BaseRepository,
}

impl UserRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<user::Model>, ServiceError> {
        user::Entity::find_by_id(id)
            .one(self.base.get_db())
            .await
            .map_err(ServiceError::DatabaseError)
    }

    /// Lookup by an already normalised e-mail address
    pub async fn find_by_email(&self, email: &str) -> Result<Option<user::Model>, ServiceError> {
        user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(self.base.get_db())
            .await
            .map_err(ServiceError::DatabaseError)
    }

    pub async fn find_by_ids(&self, ids: &[i32]) -> Result<Vec<user::Model>, ServiceError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        user::Entity::find()
            .filter(user::Column::Id.is_in(ids.to_vec()))
            .order_by_asc(user::Column::Email)
            .all(self.base.get_db())
            .await
            .map_err(ServiceError::DatabaseError)
    }

    pub async fn find_all(
        &self,
        page: u64,
        page_size: u64,
    ) -> Result<(Vec<user::Model>, u64), ServiceError> {
        let query = user::Entity::find().order_by_asc(user::Column::Email);
        fetch_page(self.base.get_db(), query, page, page_size)
            .await
            .map_err(ServiceError::DatabaseError)
    }

    pub async fn count(&self) -> Result<u64, ServiceError> {
        user::Entity::find()
            .count(self.base.get_db())
            .await
            .map_err(ServiceError::DatabaseError)
    }

    pub async fn create(&self, user: user::ActiveModel) -> Result<user::Model, ServiceError> {
        user.insert(self.base.get_db())
            .await
            .map_err(|e| ServiceError::from_write_error(e, DUPLICATE_EMAIL))
    }

    pub async fn update(&self, user: user::ActiveModel) -> Result<user::Model, ServiceError> {
        user.update(self.base.get_db())
            .await
            .map_err(|e| ServiceError::from_write_error(e, DUPLICATE_EMAIL))
    }

    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        let result = user::Entity::delete_by_id(id)
            .exec(self.base.get_db())
            .await
            .map_err(ServiceError::DatabaseError)?;
        if result.rows_affected == 0 {
            return Err(ServiceError::not_found("User", id));
        }
        Ok(())
    }

    pub async fn assigned_tool_ids(&self, user_id: i32) -> Result<Vec<i32>, ServiceError> {
        user_tool_assignment::Entity::find()
            .select_only()
            .column(user_tool_assignment::Column::ToolId)
            .filter(user_tool_assignment::Column::UserId.eq(user_id))
            .order_by_asc(user_tool_assignment::Column::ToolId)
            .into_tuple()
            .all(self.base.get_db())
            .await
            .map_err(ServiceError::DatabaseError)
    }

    /// Swap the assigned tool set of a user in one transaction
    pub async fn replace_assigned_tools(
        &self,
        user_id: i32,
        tool_ids: &[i32],
    ) -> Result<(), ServiceError> {
        let txn = self
            .base
            .get_db()
            .begin()
            .await
            .map_err(ServiceError::DatabaseError)?;

        user_tool_assignment::Entity::delete_many()
            .filter(user_tool_assignment::Column::UserId.eq(user_id))
            .exec(&txn)
            .await
            .map_err(ServiceError::DatabaseError)?;

        for tool_id in dedup(tool_ids) {
            user_tool_assignment::ActiveModel {
                user_id: Set(user_id),
                tool_id: Set(tool_id),
            }
            .insert(&txn)
            .await
            .map_err(ServiceError::DatabaseError)?;
        }

        txn.commit().await.map_err(ServiceError::DatabaseError)
    }
}

impl Repository for UserRepository {
    fn get_db(&self) -> &DatabaseConnection {
        self.base.get_db()
    }
}
