use chrono::{NaiveDateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

pub const MAX_CONTENT_LEN: u64 = 2_000;

/// Record a comment or attachment hangs off.
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
    strum::Display,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum OwnerKind {
    #[sea_orm(string_value = "TOOL")]
    Tool,
    #[sea_orm(string_value = "RMA")]
    Rma,
    #[sea_orm(string_value = "PASSDOWN")]
    Passdown,
    #[sea_orm(string_value = "TRACK_TREND")]
    TrackTrend,
}

impl OwnerKind {
    /// Passdowns carry attachments only.
    pub fn accepts_comments(&self) -> bool {
        !matches!(self, OwnerKind::Passdown)
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "comments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub owner_kind: OwnerKind,
    pub owner_id: i32,
    #[sea_orm(column_type = "String(StringLen::N(2000))")]
    pub content: String,
    pub user_id: Option<i32>,
    pub system_generated: bool,
    pub created_date: NaiveDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "SetNull"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C: ConnectionTrait>(self, _db: &C, insert: bool) -> Result<Self, DbErr> {
        let mut active_model = self;
        if insert {
            active_model.created_date = sea_orm::Set(Utc::now().naive_utc());
        }
        Ok(active_model)
    }
}
