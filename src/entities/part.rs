use chrono::NaiveDate;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

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
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum PartCategory {
    #[sea_orm(string_value = "ELECTRONIC")]
    Electronic,
    #[sea_orm(string_value = "MECHANICAL")]
    Mechanical,
    #[sea_orm(string_value = "HYDRAULIC")]
    Hydraulic,
    #[sea_orm(string_value = "PNEUMATIC")]
    Pneumatic,
    #[sea_orm(string_value = "ELECTRICAL")]
    Electrical,
    #[sea_orm(string_value = "OTHER")]
    Other,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "parts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    #[sea_orm(unique)]
    pub part_number: String,
    pub description: Option<String>,
    pub manufacturer: Option<String>,
    pub location_id: Option<i32>,
    pub quantity: i32,
    pub category: Option<PartCategory>,
    pub minimum_quantity: i32,
    pub unit_cost: Option<f64>,
    pub supplier: Option<String>,
    pub last_order_date: Option<NaiveDate>,
    pub replacement_required: bool,
    pub notes: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::location::Entity",
        from = "Column::LocationId",
        to = "super::location::Column::Id",
        on_delete = "SetNull"
    )]
    Location,
    #[sea_orm(has_many = "super::part_movement::Entity")]
    Movements,
}

impl Related<super::location::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Location.def()
    }
}

impl Related<super::part_movement::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Movements.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Stock has fallen to or below the reorder threshold.
    pub fn needs_reorder(&self) -> bool {
        self.quantity <= self.minimum_quantity
    }
}
