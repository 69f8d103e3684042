use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use std::sync::Arc;

use crate::entities::{checklist_template, return_address, tool::ToolType};
use crate::errors::ServiceError;
use crate::repositories::Repository;

use super::BaseRepository;

const DUPLICATE_RETURN_ADDRESS: &str = "An address with this name already exists";

/// Repository for per-tool-type checklist templates
#[derive(Debug, Clone)]
pub struct ChecklistTemplateRepository {
    base: BaseRepository,
}

impl ChecklistTemplateRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_by_tool_type(
        &self,
        tool_type: ToolType,
    ) -> Result<Option<checklist_template::Model>, ServiceError> {
        checklist_template::Entity::find()
            .filter(checklist_template::Column::ToolType.eq(tool_type))
            .one(self.base.get_db())
            .await
            .map_err(ServiceError::DatabaseError)
    }

    /// Inserts or replaces the template of `tool_type`
    pub async fn upsert(
        &self,
        tool_type: ToolType,
        items_json: String,
    ) -> Result<checklist_template::Model, ServiceError> {
        let db = self.base.get_db();
        let saved = match self.find_by_tool_type(tool_type).await? {
            Some(existing) => {
                let mut active: checklist_template::ActiveModel = existing.into();
                active.items_json = Set(items_json);
                active.update(db).await
            }
            None => {
                checklist_template::ActiveModel {
                    tool_type: Set(tool_type),
                    items_json: Set(items_json),
                    ..Default::default()
                }
                .insert(db)
                .await
            }
        };
        saved.map_err(ServiceError::DatabaseError)
    }
}

/// Repository for RMA return addresses
#[derive(Debug, Clone)]
pub struct ReturnAddressRepository {
    base: BaseRepository,
}

impl ReturnAddressRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<return_address::Model>, ServiceError> {
        return_address::Entity::find_by_id(id)
            .one(self.base.get_db())
            .await
            .map_err(ServiceError::DatabaseError)
    }

    /// All addresses ordered by name
    pub async fn find_all(&self) -> Result<Vec<return_address::Model>, ServiceError> {
        return_address::Entity::find()
            .order_by_asc(return_address::Column::Name)
            .all(self.base.get_db())
            .await
            .map_err(ServiceError::DatabaseError)
    }

    /// Case-insensitive name lookup
    pub async fn find_by_name(
        &self,
        name: &str,
    ) -> Result<Option<return_address::Model>, ServiceError> {
        return_address::Entity::find()
            .filter(
                Expr::expr(Func::lower(Expr::col(return_address::Column::Name)))
                    .eq(name.trim().to_lowercase()),
            )
            .one(self.base.get_db())
            .await
            .map_err(ServiceError::DatabaseError)
    }

    pub async fn create(
        &self,
        address: return_address::ActiveModel,
    ) -> Result<return_address::Model, ServiceError> {
        address
            .insert(self.base.get_db())
            .await
            .map_err(|e| ServiceError::from_write_error(e, DUPLICATE_RETURN_ADDRESS))
    }

    pub async fn update(
        &self,
        address: return_address::ActiveModel,
    ) -> Result<return_address::Model, ServiceError> {
        address
            .update(self.base.get_db())
            .await
            .map_err(|e| ServiceError::from_write_error(e, DUPLICATE_RETURN_ADDRESS))
    }

    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        let result = return_address::Entity::delete_by_id(id)
            .exec(self.base.get_db())
            .await
            .map_err(ServiceError::DatabaseError)?;
        if result.rows_affected == 0 {
            return Err(ServiceError::not_found("Return address", id));
        }
        Ok(())
    }
}
