use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder,
};
use std::sync::Arc;

use crate::entities::{
    attachment::{self, AttachmentKind},
    comment::{self, OwnerKind},
};
use crate::errors::ServiceError;
use crate::repositories::Repository;

use super::BaseRepository;

/// Comments and attachments keyed by (owner kind, owner id).
#[derive(Debug, Clone)]
pub struct OwnedRecordRepository {
    base: BaseRepository,
}

impl OwnedRecordRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Comments for one owner, newest first
    pub async fn comments_for(
        &self,
        owner_kind: OwnerKind,
        owner_id: i32,
    ) -> Result<Vec<comment::Model>, ServiceError> {
        comment::Entity::find()
            .filter(comment::Column::OwnerKind.eq(owner_kind))
            .filter(comment::Column::OwnerId.eq(owner_id))
            .order_by_desc(comment::Column::CreatedDate)
            .order_by_desc(comment::Column::Id)
            .all(self.base.get_db())
            .await
            .map_err(ServiceError::DatabaseError)
    }

    pub async fn create_comment(
        &self,
        comment: comment::ActiveModel,
    ) -> Result<comment::Model, ServiceError> {
        comment
            .insert(self.base.get_db())
            .await
            .map_err(ServiceError::DatabaseError)
    }

    /// Attachments for one owner, optionally narrowed to pictures or documents
    pub async fn attachments_for(
        &self,
        owner_kind: OwnerKind,
        owner_id: i32,
        kind: Option<AttachmentKind>,
    ) -> Result<Vec<attachment::Model>, ServiceError> {
        let mut query = attachment::Entity::find()
            .filter(attachment::Column::OwnerKind.eq(owner_kind))
            .filter(attachment::Column::OwnerId.eq(owner_id));
        if let Some(kind) = kind {
            query = query.filter(attachment::Column::Kind.eq(kind));
        }
        query
            .order_by_desc(attachment::Column::UploadedAt)
            .order_by_desc(attachment::Column::Id)
            .all(self.base.get_db())
            .await
            .map_err(ServiceError::DatabaseError)
    }

    pub async fn create_attachment(
        &self,
        attachment: attachment::ActiveModel,
    ) -> Result<attachment::Model, ServiceError> {
        attachment.insert(self.base.get_db()).await.map_err(|e| {
            ServiceError::from_write_error(e, "File is already attached to this record")
        })
    }

    pub async fn find_attachment(&self, id: i32) -> Result<Option<attachment::Model>, ServiceError> {
        attachment::Entity::find_by_id(id)
            .one(self.base.get_db())
            .await
            .map_err(ServiceError::DatabaseError)
    }

    pub async fn delete_attachment(&self, id: i32) -> Result<(), ServiceError> {
        let result = attachment::Entity::delete_by_id(id)
            .exec(self.base.get_db())
            .await
            .map_err(ServiceError::DatabaseError)?;
        if result.rows_affected == 0 {
            return Err(ServiceError::not_found("Attachment", id));
        }
        Ok(())
    }

    /// Removes every comment and attachment of an owner. Runs on the caller's
    /// connection so it can share the owner's delete transaction.
    pub async fn delete_for_owner<C: ConnectionTrait>(
        db: &C,
        owner_kind: OwnerKind,
        owner_id: i32,
    ) -> Result<u64, DbErr> {
        let comments = comment::Entity::delete_many()
            .filter(comment::Column::OwnerKind.eq(owner_kind))
            .filter(comment::Column::OwnerId.eq(owner_id))
            .exec(db)
            .await?;
        let attachments = attachment::Entity::delete_many()
            .filter(attachment::Column::OwnerKind.eq(owner_kind))
            .filter(attachment::Column::OwnerId.eq(owner_id))
            .exec(db)
            .await?;
        Ok(comments.rows_affected + attachments.rows_affected)
    }
}

impl Repository for OwnedRecordRepository {
    fn get_db(&self) -> &DatabaseConnection {
        self.base.get_db()
    }
}
