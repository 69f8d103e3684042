use chrono::{NaiveDate, Utc};
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use validator::Validate;

use crate::{
    db::DbPool,
    entities::passdown,
    errors::ServiceError,
    repositories::{
        passdown_repository::PassdownFilter, PassdownRepository, ToolRepository, UserRepository,
    },
    services::ensure_all_found,
};

/// Listing filters. `recent` returns only the newest N passdowns.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PassdownQuery {
    pub date: Option<NaiveDate>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub tool_id: Option<i32>,
    pub recent: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreatePassdownRequest {
    #[validate(length(min = 1, max = 10000, message = "Comment must be 1-10000 characters"))]
    pub comment: String,
    /// Defaults to today
    pub date: Option<NaiveDate>,
    pub user_id: Option<i32>,
    #[serde(default)]
    pub tool_ids: Vec<i32>,
    #[serde(default)]
    pub tech_ids: Vec<i32>,
    /// Save even when an identical passdown exists for the same day and tool
    #[serde(default)]
    pub allow_duplicate: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdatePassdownRequest {
    #[validate(length(min = 1, max = 10000, message = "Comment must be 1-10000 characters"))]
    pub comment: Option<String>,
    pub date: Option<NaiveDate>,
    pub user_id: Option<i32>,
    pub tool_ids: Option<Vec<i32>>,
    pub tech_ids: Option<Vec<i32>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PassdownDetail {
    #[serde(flatten)]
    pub passdown: passdown::Model,
    pub tool_ids: Vec<i32>,
    pub tech_ids: Vec<i32>,
}

/// Service for managing shift passdowns
#[derive(Clone)]
pub struct PassdownService {
    passdowns: PassdownRepository,
    tools: ToolRepository,
    users: UserRepository,
}

impl PassdownService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self {
            passdowns: PassdownRepository::new(db_pool.clone()),
            tools: ToolRepository::new(db_pool.clone()),
            users: UserRepository::new(db_pool),
        }
    }

    #[instrument(skip(self))]
    pub async fn list(
        &self,
        query: PassdownQuery,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<passdown::Model>, u64), ServiceError> {
        let (page, limit) = match query.recent {
            Some(recent) => (1, recent.clamp(1, 100)),
            None => (page, limit),
        };
        let filter = PassdownFilter {
            date: query.date,
            start: query.start,
            end: query.end,
            tool_id: query.tool_id,
        };
        self.passdowns.find_all(&filter, page, limit).await
    }

    pub async fn count(&self) -> Result<u64, ServiceError> {
        self.passdowns.count().await
    }

    pub async fn get_model(&self, id: i32) -> Result<passdown::Model, ServiceError> {
        self.passdowns
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Passdown", id))
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i32) -> Result<PassdownDetail, ServiceError> {
        let passdown = self.get_model(id).await?;
        self.detail(passdown).await
    }

    #[instrument(skip(self, request), fields(tools = request.tool_ids.len()))]
    pub async fn create(&self, request: CreatePassdownRequest) -> Result<PassdownDetail, ServiceError> {
        request.validate()?;
        let comment = request.comment.trim().to_string();
        if comment.is_empty() {
            return Err(ServiceError::ValidationError("Comment is required".to_string()));
        }
        let date = request.date.unwrap_or_else(|| Utc::now().date_naive());
        self.check_links(request.user_id, &request.tool_ids, &request.tech_ids)
            .await?;

        if !request.allow_duplicate {
            if let Some(existing) = self.find_duplicate(date, &comment, &request.tool_ids).await? {
                warn!(existing_id = existing, %date, "potential duplicate passdown");
                return Err(ServiceError::Conflict(format!(
                    "A passdown with the same date, comment and tool already exists (ID {})",
                    existing
                )));
            }
        }

        let saved = self
            .passdowns
            .save_with_links(
                passdown::ActiveModel {
                    comment: Set(Some(comment)),
                    date: Set(Some(date)),
                    user_id: Set(request.user_id),
                    ..Default::default()
                },
                Some(&request.tool_ids),
                Some(&request.tech_ids),
            )
            .await?;
        info!(passdown_id = saved.id, %date, "passdown created");
        self.detail(saved).await
    }

    #[instrument(skip(self, request))]
    pub async fn update(
        &self,
        id: i32,
        request: UpdatePassdownRequest,
    ) -> Result<PassdownDetail, ServiceError> {
        request.validate()?;
        let comment = match request.comment {
            Some(comment) if comment.trim().is_empty() => {
                return Err(ServiceError::ValidationError("Comment is required".to_string()));
            }
            comment => comment.map(|comment| comment.trim().to_string()),
        };
        let existing = self.get_model(id).await?;
        self.check_links(
            request.user_id,
            request.tool_ids.as_deref().unwrap_or_default(),
            request.tech_ids.as_deref().unwrap_or_default(),
        )
        .await?;

        let mut active: passdown::ActiveModel = existing.into();
        if let Some(comment) = comment {
            active.comment = Set(Some(comment));
        }
        if let Some(date) = request.date {
            active.date = Set(Some(date));
        }
        if let Some(user_id) = request.user_id {
            active.user_id = Set(Some(user_id));
        }

        let saved = self
            .passdowns
            .save_with_links(active, request.tool_ids.as_deref(), request.tech_ids.as_deref())
            .await?;
        info!(passdown_id = id, "passdown updated");
        self.detail(saved).await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        self.passdowns.delete(id).await?;
        info!(passdown_id = id, "passdown deleted");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn passdowns_for_tool(&self, tool_id: i32) -> Result<Vec<passdown::Model>, ServiceError> {
        self.passdowns.find_by_tool(tool_id).await
    }

    /// Id of a same-day passdown with the same comment that shares a tool.
    /// Without tools, any same-day passdown with that comment counts.
    async fn find_duplicate(
        &self,
        date: NaiveDate,
        comment: &str,
        tool_ids: &[i32],
    ) -> Result<Option<i32>, ServiceError> {
        let candidates = self.passdowns.find_same_day_comment(date, comment).await?;
        if tool_ids.is_empty() {
            return Ok(candidates.first().map(|candidate| candidate.id));
        }
        let wanted: HashSet<i32> = tool_ids.iter().copied().collect();
        for candidate in candidates {
            let linked = self.passdowns.tool_ids(candidate.id).await?;
            if linked.iter().any(|tool_id| wanted.contains(tool_id)) {
                return Ok(Some(candidate.id));
            }
        }
        Ok(None)
    }

    async fn check_links(
        &self,
        user_id: Option<i32>,
        tool_ids: &[i32],
        tech_ids: &[i32],
    ) -> Result<(), ServiceError> {
        let tools = self.tools.find_by_ids(tool_ids).await?;
        ensure_all_found("Tool", tool_ids, tools.iter().map(|tool| tool.id))?;

        let mut user_ids = tech_ids.to_vec();
        user_ids.extend(user_id);
        let users = self.users.find_by_ids(&user_ids).await?;
        ensure_all_found("User", &user_ids, users.iter().map(|user| user.id))
    }

    async fn detail(&self, passdown: passdown::Model) -> Result<PassdownDetail, ServiceError> {
        let tool_ids = self.passdowns.tool_ids(passdown.id).await?;
        let tech_ids = self.passdowns.tech_ids(passdown.id).await?;
        Ok(PassdownDetail {
            passdown,
            tool_ids,
            tech_ids,
        })
    }
}
