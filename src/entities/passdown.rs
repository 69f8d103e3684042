use chrono::{NaiveDate, NaiveDateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

pub const MAX_COMMENT_LEN: u64 = 10_000;

/// Shift handoff note.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "passdowns")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(column_type = "String(StringLen::N(10000))", nullable)]
    pub comment: Option<String>,
    pub date: Option<NaiveDate>,
    pub user_id: Option<i32>,
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
    #[sea_orm(has_many = "super::passdown_tool::Entity")]
    Tools,
    #[sea_orm(has_many = "super::passdown_tech::Entity")]
    AssignedTechs,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::passdown_tool::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tools.def()
    }
}

impl Related<super::passdown_tech::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AssignedTechs.def()
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C: ConnectionTrait>(self, _db: &C, insert: bool) -> Result<Self, DbErr> {
        let mut active_model = self;
        if insert {
            let now = Utc::now().naive_utc();
            active_model.created_date = sea_orm::Set(now);
            if !matches!(active_model.date, sea_orm::ActiveValue::Set(Some(_))) {
                active_model.date = sea_orm::Set(Some(now.date()));
            }
        }
        Ok(active_model)
    }
}
