use chrono::{NaiveDateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

pub const ROLE_ADMIN: &str = "ADMIN";
pub const ROLE_TECHNICIAN: &str = "TECHNICIAN";

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Option<String>,
    pub roles: Option<String>,
    pub active: bool,
    pub phone_number: Option<String>,
    pub active_site_id: Option<i32>,
    pub default_location_id: Option<i32>,
    pub active_tool_id: Option<i32>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::location::Entity",
        from = "Column::ActiveSiteId",
        to = "super::location::Column::Id",
        on_delete = "SetNull"
    )]
    ActiveSite,
    #[sea_orm(
        belongs_to = "super::location::Entity",
        from = "Column::DefaultLocationId",
        to = "super::location::Column::Id",
        on_delete = "SetNull"
    )]
    DefaultLocation,
    #[sea_orm(
        belongs_to = "super::tool::Entity",
        from = "Column::ActiveToolId",
        to = "super::tool::Column::Id",
        on_delete = "SetNull"
    )]
    ActiveTool,
    #[sea_orm(has_many = "super::user_tool_assignment::Entity")]
    ToolAssignments,
}

impl Related<super::user_tool_assignment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ToolAssignments.def()
    }
}

/// Site the user is currently working at.
pub struct ActiveSiteLink;

impl Linked for ActiveSiteLink {
    type FromEntity = Entity;
    type ToEntity = super::location::Entity;

    fn link(&self) -> Vec<RelationDef> {
        vec![Relation::ActiveSite.def()]
    }
}

pub struct DefaultLocationLink;

impl Linked for DefaultLocationLink {
    type FromEntity = Entity;
    type ToEntity = super::location::Entity;

    fn link(&self) -> Vec<RelationDef> {
        vec![Relation::DefaultLocation.def()]
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
    pub fn is_admin(&self) -> bool {
        [self.role.as_deref(), self.roles.as_deref()]
            .into_iter()
            .flatten()
            .any(|role| role.eq_ignore_ascii_case(ROLE_ADMIN))
    }
}

/// Trims and lowercases an e-mail address.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Splits a full name on its first space. The last name is empty when there is no space.
pub fn split_name(name: &str) -> (String, String) {
    let name = name.trim();
    match name.split_once(' ') {
        Some((first, last)) => (first.to_string(), last.trim().to_string()),
        None => (name.to_string(), String::new()),
    }
}

pub fn join_name(first: &str, last: &str) -> String {
    [first.trim(), last.trim()]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}

/// Fields of a user that mirror each other and must be kept in step before saving.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileFields {
    pub name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Option<String>,
    pub roles: Option<String>,
    pub active_site_id: Option<i32>,
    pub default_location_id: Option<i32>,
}

impl ProfileFields {
    /// Fills whichever side of each mirrored pair is missing.
    pub fn sync(mut self) -> Self {
        if !blank(&self.name) && blank(&self.first_name) {
            let (first, last) = split_name(self.name.as_deref().unwrap_or_default());
            self.first_name = Some(first);
            self.last_name = Some(last);
        } else if blank(&self.name) && !blank(&self.first_name) {
            let joined = join_name(
                self.first_name.as_deref().unwrap_or_default(),
                self.last_name.as_deref().unwrap_or_default(),
            );
            self.name = Some(joined);
        }

        if !blank(&self.role) && blank(&self.roles) {
            self.roles = self.role.clone();
        } else if !blank(&self.roles) && blank(&self.role) {
            self.role = self.roles.clone();
        }

        match (self.active_site_id, self.default_location_id) {
            (Some(site), None) => self.default_location_id = Some(site),
            (None, Some(default)) => self.active_site_id = Some(default),
            _ => {}
        }
        self
    }
}

impl From<&Model> for ProfileFields {
    fn from(model: &Model) -> Self {
        Self {
            name: model.name.clone(),
            first_name: model.first_name.clone(),
            last_name: model.last_name.clone(),
            role: model.role.clone(),
            roles: model.roles.clone(),
            active_site_id: model.active_site_id,
            default_location_id: model.default_location_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_first_space_only() {
        assert_eq!(
            split_name("Ada King Lovelace"),
            ("Ada".to_string(), "King Lovelace".to_string())
        );
        assert_eq!(split_name("Cher"), ("Cher".to_string(), String::new()));
    }

    #[test]
    fn email_normalisation_is_idempotent() {
        let once = normalize_email("  Tech@PCD.com ");
        assert_eq!(once, "tech@pcd.com");
        assert_eq!(normalize_email(&once), once);
    }

    #[test]
    fn sync_fills_names_roles_and_sites() {
        let synced = ProfileFields {
            name: Some("Demo Tech".into()),
            role: Some(ROLE_TECHNICIAN.into()),
            active_site_id: Some(4),
            ..Default::default()
        }
        .sync();

        assert_eq!(synced.first_name.as_deref(), Some("Demo"));
        assert_eq!(synced.last_name.as_deref(), Some("Tech"));
        assert_eq!(synced.roles.as_deref(), Some(ROLE_TECHNICIAN));
        assert_eq!(synced.default_location_id, Some(4));
    }

    #[test]
    fn sync_joins_first_and_last_when_name_missing() {
        let synced = ProfileFields {
            first_name: Some("Grace".into()),
            last_name: Some("Hopper".into()),
            roles: Some(ROLE_ADMIN.into()),
            default_location_id: Some(2),
            ..Default::default()
        }
        .sync();

        assert_eq!(synced.name.as_deref(), Some("Grace Hopper"));
        assert_eq!(synced.role.as_deref(), Some(ROLE_ADMIN));
        assert_eq!(synced.active_site_id, Some(2));
    }
}
