use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "track_trend_tools")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub track_trend_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub tool_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::track_trend::Entity",
        from = "Column::TrackTrendId",
        to = "super::track_trend::Column::Id",
        on_delete = "Cascade"
    )]
    TrackTrend,
    #[sea_orm(
        belongs_to = "super::tool::Entity",
        from = "Column::ToolId",
        to = "super::tool::Column::Id",
        on_delete = "Cascade"
    )]
    Tool,
}

impl Related<super::track_trend::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TrackTrend.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
