use chrono::NaiveDateTime;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::json_list;

/// A part transferred between tools or custom locations, possibly over several hops.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "moving_parts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub part_name: String,
    pub from_tool_id: Option<i32>,
    pub from_custom_location: Option<String>,
    pub from_custom_location_id: Option<i32>,
    pub to_tool_id: Option<i32>,
    pub to_custom_location_id: Option<i32>,
    #[sea_orm(column_type = "Text", nullable)]
    pub destination_chain: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub to_custom_locations: Option<String>,
    pub move_date: NaiveDateTime,
    #[sea_orm(column_type = "String(StringLen::N(1000))", nullable)]
    pub notes: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub additional_notes: Option<String>,
    pub rma_id: Option<i32>,
    pub linked_track_trend_id: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::tool::Entity",
        from = "Column::FromToolId",
        to = "super::tool::Column::Id",
        on_delete = "SetNull"
    )]
    FromTool,
    #[sea_orm(
        belongs_to = "super::tool::Entity",
        from = "Column::ToToolId",
        to = "super::tool::Column::Id",
        on_delete = "SetNull"
    )]
    ToTool,
    #[sea_orm(
        belongs_to = "super::custom_location::Entity",
        from = "Column::FromCustomLocationId",
        to = "super::custom_location::Column::Id",
        on_delete = "SetNull"
    )]
    FromCustomLocation,
    #[sea_orm(
        belongs_to = "super::custom_location::Entity",
        from = "Column::ToCustomLocationId",
        to = "super::custom_location::Column::Id",
        on_delete = "SetNull"
    )]
    ToCustomLocation,
    #[sea_orm(
        belongs_to = "super::rma::Entity",
        from = "Column::RmaId",
        to = "super::rma::Column::Id",
        on_delete = "SetNull"
    )]
    Rma,
    #[sea_orm(
        belongs_to = "super::track_trend::Entity",
        from = "Column::LinkedTrackTrendId",
        to = "super::track_trend::Column::Id",
        on_delete = "SetNull"
    )]
    TrackTrend,
}

impl Related<super::rma::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Rma.def()
    }
}

impl Related<super::track_trend::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TrackTrend.def()
    }
}

pub struct FromToolLink;

impl Linked for FromToolLink {
    type FromEntity = Entity;
    type ToEntity = super::tool::Entity;

    fn link(&self) -> Vec<RelationDef> {
        vec![Relation::FromTool.def()]
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Ordered tool ids the part travels through after leaving its source.
    pub fn destination_chain(&self) -> Vec<i32> {
        json_list::decode(self.destination_chain.as_deref())
    }

    pub fn to_custom_locations(&self) -> Vec<String> {
        json_list::decode(self.to_custom_locations.as_deref())
    }

    /// Chain with `tool_id` appended, encoded for storage.
    pub fn chain_with(&self, tool_id: i32) -> Option<String> {
        let mut chain = self.destination_chain();
        chain.push(tool_id);
        json_list::encode(&chain)
    }
}

/// Renders "<from> → <hop> → <hop>", using "Unknown" when the source tool is gone.
pub fn format_path(from: Option<&str>, destinations: &[String]) -> String {
    std::iter::once(from.unwrap_or("Unknown"))
        .chain(destinations.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(" → ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn moving_part(chain: Option<&str>) -> Model {
        Model {
            id: 1,
            part_name: "Valve".into(),
            from_tool_id: Some(1),
            from_custom_location: None,
            from_custom_location_id: None,
            to_tool_id: Some(2),
            to_custom_location_id: None,
            destination_chain: chain.map(String::from),
            to_custom_locations: None,
            move_date: Utc::now().naive_utc(),
            notes: None,
            additional_notes: None,
            rma_id: None,
            linked_track_trend_id: None,
        }
    }

    #[test]
    fn appends_to_existing_chain() {
        let part = moving_part(Some("[2,5]"));
        assert_eq!(part.chain_with(9).as_deref(), Some("[2,5,9]"));
    }

    #[test]
    fn malformed_chain_restarts_from_empty() {
        let part = moving_part(Some("not json"));
        assert!(part.destination_chain().is_empty());
        assert_eq!(part.chain_with(3).as_deref(), Some("[3]"));
    }

    #[test]
    fn path_formatting() {
        let hops = vec!["RR151D".to_string(), "RAK152D".to_string()];
        assert_eq!(format_path(Some("RAK151D"), &hops), "RAK151D → RR151D → RAK152D");
        assert_eq!(format_path(None, &[]), "Unknown");
    }
}
