use chrono::{NaiveDateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Cross-tool investigation of a recurring issue.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "track_trends")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
    #[sea_orm(column_type = "String(StringLen::N(1000))", nullable)]
    pub description: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::track_trend_tool::Entity")]
    AffectedTools,
    #[sea_orm(has_many = "super::moving_part::Entity")]
    MovingParts,
}

impl Related<super::track_trend_tool::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AffectedTools.def()
    }
}

impl Related<super::moving_part::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MovingParts.def()
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C: ConnectionTrait>(self, _db: &C, insert: bool) -> Result<Self, DbErr> {
        let mut active_model = self;
        let now = Utc::now().naive_utc();
        if insert {
            active_model.created_at = sea_orm::Set(now);
        }
        active_model.updated_at = sea_orm::Set(now);
        Ok(active_model)
    }
}
