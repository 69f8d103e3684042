use sea_orm::Set;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use validator::Validate;

use crate::{
    auth::{PasswordCheck, PasswordEncoder},
    db::DbPool,
    entities::user::{self, normalize_email, ProfileFields},
    errors::ServiceError,
    repositories::{LocationRepository, ToolRepository, UserRepository},
    services::ensure_all_found,
};

const INVALID_CREDENTIALS: &str = "Invalid email or password";

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
    #[validate(length(min = 1, max = 255, message = "Password is required"))]
    pub password: String,
    pub name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Option<String>,
    pub roles: Option<String>,
    pub active: Option<bool>,
    pub phone_number: Option<String>,
    pub active_site_id: Option<i32>,
    pub default_location_id: Option<i32>,
    pub active_tool_id: Option<i32>,
}

/// Partial update. A blank password keeps the stored one.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(email(message = "A valid email is required"))]
    pub email: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Option<String>,
    pub roles: Option<String>,
    pub active: Option<bool>,
    pub phone_number: Option<String>,
    pub active_site_id: Option<i32>,
    pub default_location_id: Option<i32>,
    pub active_tool_id: Option<i32>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct VerifyCredentialsRequest {
    #[validate(length(min = 1))]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// User without the password, plus the tools they are assigned to.
/// The active tool always counts as assigned.
#[derive(Debug, Clone, Serialize)]
pub struct UserDetail {
    #[serde(flatten)]
    pub user: user::Model,
    pub assigned_tool_ids: Vec<i32>,
}

/// Service for managing users and checking their credentials
#[derive(Clone)]
pub struct UserService {
    users: UserRepository,
    locations: LocationRepository,
    tools: ToolRepository,
    encoder: PasswordEncoder,
}

impl UserService {
    pub fn new(db_pool: Arc<DbPool>, encoder: PasswordEncoder) -> Self {
        Self {
            users: UserRepository::new(db_pool.clone()),
            locations: LocationRepository::new(db_pool.clone()),
            tools: ToolRepository::new(db_pool),
            encoder,
        }
    }

    #[instrument(skip(self))]
    pub async fn list(&self, page: u64, limit: u64) -> Result<(Vec<user::Model>, u64), ServiceError> {
        self.users.find_all(page, limit).await
    }

    pub async fn get_model(&self, id: i32) -> Result<user::Model, ServiceError> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", id))
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i32) -> Result<UserDetail, ServiceError> {
        let user = self.get_model(id).await?;
        self.detail(user).await
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<user::Model>, ServiceError> {
        self.users.find_by_email(&normalize_email(email)).await
    }

    pub async fn count(&self) -> Result<u64, ServiceError> {
        self.users.count().await
    }

    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn create(&self, request: CreateUserRequest) -> Result<UserDetail, ServiceError> {
        request.validate()?;
        self.check_references(
            request.active_site_id,
            request.default_location_id,
            request.active_tool_id,
        )
        .await?;

        let profile = ProfileFields {
            name: request.name,
            first_name: request.first_name,
            last_name: request.last_name,
            role: request.role,
            roles: request.roles,
            active_site_id: request.active_site_id,
            default_location_id: request.default_location_id,
        }
        .sync();

        let mut active = user::ActiveModel {
            email: Set(normalize_email(&request.email)),
            password: Set(self.encoder.hash(&request.password)?),
            active: Set(request.active.unwrap_or(true)),
            phone_number: Set(request.phone_number),
            active_tool_id: Set(request.active_tool_id),
            ..Default::default()
        };
        apply_profile(&mut active, profile);

        let user = self.users.create(active).await?;
        info!(user_id = user.id, "user created");
        self.detail(user).await
    }

    #[instrument(skip(self, request))]
    pub async fn update(&self, id: i32, request: UpdateUserRequest) -> Result<UserDetail, ServiceError> {
        request.validate()?;
        let existing = self.get_model(id).await?;
        self.check_references(
            request.active_site_id,
            request.default_location_id,
            request.active_tool_id,
        )
        .await?;

        let current = ProfileFields::from(&existing);
        let profile = ProfileFields {
            name: request.name.or(current.name),
            first_name: request.first_name.or(current.first_name),
            last_name: request.last_name.or(current.last_name),
            role: request.role.or(current.role),
            roles: request.roles.or(current.roles),
            active_site_id: request.active_site_id.or(current.active_site_id),
            default_location_id: request.default_location_id.or(current.default_location_id),
        }
        .sync();

        let mut active: user::ActiveModel = existing.into();
        if let Some(email) = request.email {
            active.email = Set(normalize_email(&email));
        }
        if let Some(password) = request.password.filter(|p| !p.trim().is_empty()) {
            active.password = Set(self.encoder.hash(&password)?);
        }
        if let Some(value) = request.active {
            active.active = Set(value);
        }
        if let Some(value) = request.phone_number {
            active.phone_number = Set(Some(value));
        }
        if let Some(tool_id) = request.active_tool_id {
            active.active_tool_id = Set(Some(tool_id));
        }
        apply_profile(&mut active, profile);

        let user = self.users.update(active).await?;
        info!(user_id = id, "user updated");
        self.detail(user).await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        self.users.delete(id).await?;
        info!(user_id = id, "user deleted");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn set_assigned_tools(
        &self,
        id: i32,
        tool_ids: Vec<i32>,
    ) -> Result<UserDetail, ServiceError> {
        let user = self.get_model(id).await?;
        let tools = self.tools.find_by_ids(&tool_ids).await?;
        ensure_all_found("Tool", &tool_ids, tools.iter().map(|tool| tool.id))?;
        self.users.replace_assigned_tools(id, &tool_ids).await?;
        self.detail(user).await
    }

    /// Checks an email/password pair. Plaintext passwords left over from the
    /// old system are re-hashed on the first successful check.
    #[instrument(skip(self, request))]
    pub async fn verify(&self, request: VerifyCredentialsRequest) -> Result<UserDetail, ServiceError> {
        request.validate()?;
        let Some(user) = self.find_by_email(&request.email).await? else {
            return Err(ServiceError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        };
        if !user.active {
            warn!(user_id = user.id, "credential check for inactive user");
            return Err(ServiceError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        let user = match self.encoder.verify(&request.password, &user.password)? {
            PasswordCheck::Valid => user,
            PasswordCheck::ValidLegacy => {
                let user_id = user.id;
                let mut active: user::ActiveModel = user.into();
                active.password = Set(self.encoder.hash(&request.password)?);
                let upgraded = self.users.update(active).await?;
                info!(user_id, "upgraded legacy password hash");
                upgraded
            }
            PasswordCheck::Invalid => {
                return Err(ServiceError::Unauthorized(INVALID_CREDENTIALS.to_string()));
            }
        };
        self.detail(user).await
    }

    /// Raw insert used by the data initializer. The password is hashed here.
    pub(crate) async fn insert_seed_user(
        &self,
        email: &str,
        password: &str,
        name: &str,
        role: &str,
    ) -> Result<user::Model, ServiceError> {
        let profile = ProfileFields {
            name: Some(name.to_string()),
            role: Some(role.to_string()),
            ..Default::default()
        }
        .sync();
        let mut active = user::ActiveModel {
            email: Set(normalize_email(email)),
            password: Set(self.encoder.hash(password)?),
            active: Set(true),
            phone_number: Set(None),
            active_tool_id: Set(None),
            ..Default::default()
        };
        apply_profile(&mut active, profile);
        self.users.create(active).await
    }

    pub(crate) async fn save_model(&self, active: user::ActiveModel) -> Result<user::Model, ServiceError> {
        self.users.update(active).await
    }

    async fn check_references(
        &self,
        active_site_id: Option<i32>,
        default_location_id: Option<i32>,
        active_tool_id: Option<i32>,
    ) -> Result<(), ServiceError> {
        for location_id in [active_site_id, default_location_id].into_iter().flatten() {
            if self.locations.find_by_id(location_id).await?.is_none() {
                return Err(ServiceError::InvalidInput(format!(
                    "Location with ID {} does not exist",
                    location_id
                )));
            }
        }
        if let Some(tool_id) = active_tool_id {
            if self.tools.find_by_id(tool_id).await?.is_none() {
                return Err(ServiceError::InvalidInput(format!(
                    "Tool with ID {} does not exist",
                    tool_id
                )));
            }
        }
        Ok(())
    }

    async fn detail(&self, user: user::Model) -> Result<UserDetail, ServiceError> {
        let mut assigned_tool_ids = self.users.assigned_tool_ids(user.id).await?;
        if let Some(tool_id) = user.active_tool_id {
            if !assigned_tool_ids.contains(&tool_id) {
                assigned_tool_ids.push(tool_id);
                assigned_tool_ids.sort_unstable();
            }
        }
        Ok(UserDetail {
            user,
            assigned_tool_ids,
        })
    }
}

fn apply_profile(active: &mut user::ActiveModel, profile: ProfileFields) {
    active.name = Set(profile.name);
    active.first_name = Set(profile.first_name);
    active.last_name = Set(profile.last_name);
    active.role = Set(profile.role);
    active.roles = Set(profile.roles);
    active.active_site_id = Set(profile.active_site_id);
    active.default_location_id = Set(profile.default_location_id);
}
