use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "passdown_tools")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub passdown_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub tool_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::passdown::Entity",
        from = "Column::PassdownId",
        to = "super::passdown::Column::Id",
        on_delete = "Cascade"
    )]
    Passdown,
    #[sea_orm(
        belongs_to = "super::tool::Entity",
        from = "Column::ToolId",
        to = "super::tool::Column::Id",
        on_delete = "Cascade"
    )]
    Tool,
}

impl Related<super::passdown::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Passdown.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
