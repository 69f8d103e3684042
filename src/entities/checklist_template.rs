use chrono::{NaiveDateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::tool::ToolType;

/// Labels shown for the counted checklist items when a tool type has no template.
pub const DEFAULT_LABELS: [&str; 12] = [
    "Commission",
    "PreSL1",
    "SL1",
    "Mechanical: Pre SL1",
    "Mechanical: Post SL1",
    "Input Functionality Tested",
    "Operation Modes Tested",
    "SOO's Tested",
    "Field Service Report",
    "Certificate of Approval",
    "Turned Over to Customer",
    "Start-Up/SL03",
];

pub fn default_labels() -> Vec<String> {
    DEFAULT_LABELS.iter().map(|label| ToString::to_string(label)).collect()
}

/// Per-tool-type checklist labels, one per counted item in checklist order.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tool_checklist_templates")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub tool_type: ToolType,
    #[sea_orm(column_type = "Text")]
    pub items_json: String,
    pub updated_at: NaiveDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C: ConnectionTrait>(self, _db: &C, _insert: bool) -> Result<Self, DbErr> {
        let mut active_model = self;
        active_model.updated_at = sea_orm::Set(Utc::now().naive_utc());
        Ok(active_model)
    }
}
