use sea_orm::Set;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, instrument};
use validator::Validate;

use crate::{
    db::DbPool,
    entities::{
        attachment::{self, infer_kind, AttachmentKind},
        comment::{self, OwnerKind},
    },
    errors::ServiceError,
    repositories::OwnedRecordRepository,
};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewComment {
    #[validate(length(min = 1, max = 2000, message = "Comment must be 1-2000 characters"))]
    pub content: String,
    pub user_id: Option<i32>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewAttachment {
    #[validate(length(min = 1, max = 255))]
    pub file_name: String,
    #[validate(length(min = 1, max = 1024))]
    pub file_path: String,
    pub file_type: Option<String>,
    #[validate(range(min = 0))]
    pub file_size: Option<i64>,
    /// Picture or document; guessed from the type or extension when absent
    pub kind: Option<AttachmentKind>,
    pub tag: Option<String>,
    pub uploaded_by: Option<String>,
}

/// Comments and attachment metadata shared by tools, RMAs, passdowns and
/// track & trends. Owner existence is checked by the owning service.
#[derive(Clone)]
pub struct RecordService {
    repository: OwnedRecordRepository,
}

impl RecordService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self {
            repository: OwnedRecordRepository::new(db_pool),
        }
    }

    #[instrument(skip(self))]
    pub async fn comments(
        &self,
        owner_kind: OwnerKind,
        owner_id: i32,
    ) -> Result<Vec<comment::Model>, ServiceError> {
        self.repository.comments_for(owner_kind, owner_id).await
    }

    #[instrument(skip(self, input))]
    pub async fn add_comment(
        &self,
        owner_kind: OwnerKind,
        owner_id: i32,
        input: NewComment,
    ) -> Result<comment::Model, ServiceError> {
        if !owner_kind.accepts_comments() {
            return Err(ServiceError::InvalidOperation(format!(
                "{} records do not take comments",
                owner_kind
            )));
        }
        input.validate()?;
        let content = input.content.trim().to_string();
        if content.is_empty() {
            return Err(ServiceError::ValidationError(
                "Comment content is required".to_string(),
            ));
        }

        let saved = self
            .repository
            .create_comment(comment::ActiveModel {
                owner_kind: Set(owner_kind),
                owner_id: Set(owner_id),
                content: Set(content),
                user_id: Set(input.user_id),
                system_generated: Set(false),
                ..Default::default()
            })
            .await?;
        info!(comment_id = saved.id, %owner_kind, owner_id, "comment added");
        Ok(saved)
    }

    /// Comment written by the service itself, e.g. when a tool is linked.
    #[instrument(skip(self))]
    pub async fn add_system_comment(
        &self,
        owner_kind: OwnerKind,
        owner_id: i32,
        content: &str,
    ) -> Result<comment::Model, ServiceError> {
        self.repository
            .create_comment(comment::ActiveModel {
                owner_kind: Set(owner_kind),
                owner_id: Set(owner_id),
                content: Set(truncate(content, comment::MAX_CONTENT_LEN as usize)),
                user_id: Set(None),
                system_generated: Set(true),
                ..Default::default()
            })
            .await
    }

    #[instrument(skip(self))]
    pub async fn attachments(
        &self,
        owner_kind: OwnerKind,
        owner_id: i32,
        kind: Option<AttachmentKind>,
    ) -> Result<Vec<attachment::Model>, ServiceError> {
        self.repository
            .attachments_for(owner_kind, owner_id, kind)
            .await
    }

    #[instrument(skip(self, input))]
    pub async fn add_attachment(
        &self,
        owner_kind: OwnerKind,
        owner_id: i32,
        input: NewAttachment,
    ) -> Result<attachment::Model, ServiceError> {
        input.validate()?;
        let kind = input
            .kind
            .unwrap_or_else(|| infer_kind(input.file_type.as_deref(), &input.file_name));

        let saved = self
            .repository
            .create_attachment(attachment::ActiveModel {
                owner_kind: Set(owner_kind),
                owner_id: Set(owner_id),
                kind: Set(kind),
                file_name: Set(input.file_name.trim().to_string()),
                file_path: Set(input.file_path.trim().to_string()),
                file_type: Set(input.file_type),
                file_size: Set(input.file_size),
                tag: Set(input.tag),
                uploaded_by: Set(input.uploaded_by),
                ..Default::default()
            })
            .await?;
        info!(attachment_id = saved.id, %owner_kind, owner_id, "attachment recorded");
        Ok(saved)
    }

    #[instrument(skip(self))]
    pub async fn delete_attachment(&self, id: i32) -> Result<(), ServiceError> {
        self.repository.delete_attachment(id).await?;
        info!(attachment_id = id, "attachment removed");
        Ok(())
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
