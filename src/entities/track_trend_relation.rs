use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Directed link between two investigations. Services store both directions.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "track_trend_relations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub track_trend_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub related_track_trend_id: i32,
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
        belongs_to = "super::track_trend::Entity",
        from = "Column::RelatedTrackTrendId",
        to = "super::track_trend::Column::Id",
        on_delete = "Cascade"
    )]
    RelatedTrackTrend,
}

impl ActiveModelBehavior for ActiveModel {}
