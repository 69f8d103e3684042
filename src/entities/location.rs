use chrono::{NaiveDateTime, Utc};
use once_cell::sync::Lazy;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

static STATE_ABBREVIATIONS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([("Arizona", "AZ"), ("New Mexico", "NM"), ("Ireland", "IE")])
});

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "locations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: Option<String>,
    pub description: Option<String>,
    pub address: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
    pub state: String,
    pub fab: Option<String>,
    pub display_name: Option<String>,
    pub default_location: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::tool::Entity")]
    Tools,
    #[sea_orm(has_many = "super::custom_location::Entity")]
    CustomLocations,
    #[sea_orm(has_many = "super::part::Entity")]
    Parts,
}

impl Related<super::tool::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tools.def()
    }
}

impl Related<super::custom_location::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CustomLocations.def()
    }
}

impl Related<super::part::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Parts.def()
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

impl Model {
    /// Name shown in pickers and headers, e.g. "AZ F52".
    pub fn display_name(&self) -> String {
        resolve_display_name(self.display_name.as_deref(), &self.state, self.fab.as_deref())
    }
}

/// Short code for a state, falling back to its first two letters.
pub fn state_abbreviation(state: &str) -> String {
    match STATE_ABBREVIATIONS.get(state) {
        Some(abbreviation) => (*abbreviation).to_string(),
        None => state.chars().take(2).collect::<String>().to_uppercase(),
    }
}

pub fn resolve_display_name(stored: Option<&str>, state: &str, fab: Option<&str>) -> String {
    if let Some(name) = stored.filter(|name| !name.trim().is_empty()) {
        return name.to_string();
    }
    if state.is_empty() {
        return "Location".to_string();
    }
    match fab.filter(|fab| !fab.is_empty()) {
        None => state.chars().take(3).collect::<String>().to_uppercase(),
        Some(fab) => format!("{} F{}", state_abbreviation(state), fab),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Some("Main Fab"), "Arizona", Some("52"), "Main Fab")]
    #[case(Some("  "), "Arizona", Some("52"), "AZ F52")]
    #[case(None, "New Mexico", Some("11"), "NM F11")]
    #[case(None, "Ireland", Some("24"), "IE F24")]
    #[case(None, "Oregon", Some("3"), "OR F3")]
    #[case(None, "X", Some("9"), "X F9")]
    #[case(None, "Arizona", None, "ARI")]
    #[case(None, "Az", None, "AZ")]
    #[case(None, "", Some("52"), "Location")]
    fn display_name_fallbacks(
        #[case] stored: Option<&str>,
        #[case] state: &str,
        #[case] fab: Option<&str>,
        #[case] expected: &str,
    ) {
        assert_eq!(resolve_display_name(stored, state, fab), expected);
    }
}
