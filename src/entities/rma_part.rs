use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "rma_parts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub rma_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub part_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::rma::Entity",
        from = "Column::RmaId",
        to = "super::rma::Column::Id",
        on_delete = "Cascade"
    )]
    Rma,
    #[sea_orm(
        belongs_to = "super::part::Entity",
        from = "Column::PartId",
        to = "super::part::Column::Id",
        on_delete = "Cascade"
    )]
    Part,
}

impl Related<super::rma::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Rma.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
