use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "rma_part_line_items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub rma_id: i32,
    pub part_name: Option<String>,
    pub part_number: Option<String>,
    pub product_description: Option<String>,
    pub quantity: i32,
    pub replacement_required: bool,
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
}

impl Related<super::rma::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Rma.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
