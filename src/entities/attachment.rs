use chrono::{NaiveDateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

pub use super::comment::OwnerKind;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    strum::EnumString,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum AttachmentKind {
    #[sea_orm(string_value = "PICTURE")]
    Picture,
    #[sea_orm(string_value = "DOCUMENT")]
    Document,
}

/// Metadata for a stored picture or document. File bytes live outside the database.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "attachments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub owner_kind: OwnerKind,
    pub owner_id: i32,
    pub kind: AttachmentKind,
    pub file_name: String,
    pub file_path: String,
    pub file_type: Option<String>,
    pub file_size: Option<i64>,
    pub tag: Option<String>,
    pub uploaded_by: Option<String>,
    pub uploaded_at: NaiveDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C: ConnectionTrait>(self, _db: &C, insert: bool) -> Result<Self, DbErr> {
        let mut active_model = self;
        if insert {
            active_model.uploaded_at = sea_orm::Set(Utc::now().naive_utc());
        }
        Ok(active_model)
    }
}

/// Guesses the attachment kind from a MIME type or file extension.
pub fn infer_kind(file_type: Option<&str>, file_name: &str) -> AttachmentKind {
    if file_type.is_some_and(|mime| mime.starts_with("image/")) {
        return AttachmentKind::Picture;
    }
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "jpg" | "jpeg" | "png" | "gif" | "bmp" | "webp" | "heic" => AttachmentKind::Picture,
        _ => AttachmentKind::Document,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infers_pictures_from_mime_or_extension() {
        assert_eq!(infer_kind(Some("image/png"), "scan"), AttachmentKind::Picture);
        assert_eq!(infer_kind(None, "panel.JPG"), AttachmentKind::Picture);
        assert_eq!(infer_kind(Some("application/pdf"), "fsr.pdf"), AttachmentKind::Document);
        assert_eq!(infer_kind(None, "README"), AttachmentKind::Document);
    }
}
