use chrono::NaiveDate;
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, instrument};
use validator::Validate;

use crate::{
    db::DbPool,
    entities::{
        json_list,
        tool::{self, ChecklistItem, ToolStatus, ToolType},
    },
    errors::ServiceError,
    repositories::{
        tool_repository::ToolFilter, LocationRepository, ToolRepository, UserRepository,
    },
    services::{
        checklist_templates::{label_checklist, ChecklistTemplateService, LabeledChecklistItem},
        ensure_all_found,
    },
};

/// One checklist step to record. `clear_date` wins over `date`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChecklistUpdate {
    pub item: ChecklistItem,
    pub completed: Option<bool>,
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub clear_date: bool,
}

impl ChecklistUpdate {
    fn date_change(&self) -> Option<Option<NaiveDate>> {
        if self.clear_date {
            Some(None)
        } else {
            self.date.map(Some)
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreateToolRequest {
    #[validate(length(min = 1, max = 255, message = "Tool name is required"))]
    pub name: String,
    pub secondary_name: Option<String>,
    pub tool_type: Option<ToolType>,
    pub serial_number1: Option<String>,
    pub serial_number2: Option<String>,
    pub model1: Option<String>,
    pub model2: Option<String>,
    pub chemical_gas_service: Option<String>,
    pub system_name: Option<String>,
    pub equipment_location: Option<String>,
    pub config_number: Option<String>,
    pub equipment_set: Option<i32>,
    pub checklist_labels: Option<Vec<String>>,
    pub location_id: Option<i32>,
    pub location_name: Option<String>,
    pub set_date: Option<NaiveDate>,
    pub notes: Option<String>,
    #[serde(default)]
    pub checklist: Vec<ChecklistUpdate>,
    pub technician_ids: Option<Vec<i32>>,
    pub tags: Option<Vec<String>>,
}

/// Partial update; absent fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateToolRequest {
    #[validate(length(min = 1, max = 255, message = "Tool name is required"))]
    pub name: Option<String>,
    pub secondary_name: Option<String>,
    pub tool_type: Option<ToolType>,
    pub serial_number1: Option<String>,
    pub serial_number2: Option<String>,
    pub model1: Option<String>,
    pub model2: Option<String>,
    pub chemical_gas_service: Option<String>,
    pub system_name: Option<String>,
    pub equipment_location: Option<String>,
    pub config_number: Option<String>,
    pub equipment_set: Option<i32>,
    pub checklist_labels: Option<Vec<String>>,
    pub location_id: Option<i32>,
    pub location_name: Option<String>,
    pub set_date: Option<NaiveDate>,
    pub notes: Option<String>,
    #[serde(default)]
    pub checklist: Vec<ChecklistUpdate>,
}

/// Tool row plus the status its checklist implies.
#[derive(Debug, Clone, Serialize)]
pub struct ToolSummary {
    #[serde(flatten)]
    pub tool: tool::Model,
    pub calculated_status: ToolStatus,
}

impl From<tool::Model> for ToolSummary {
    fn from(tool: tool::Model) -> Self {
        let calculated_status = tool.calculated_status();
        Self {
            tool,
            calculated_status,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ToolDetail {
    #[serde(flatten)]
    pub tool: tool::Model,
    pub calculated_status: ToolStatus,
    pub completed_checklist_items: usize,
    pub checklist_labels: Vec<String>,
    /// Counted items under the labels above
    pub checklist_items: Vec<LabeledChecklistItem>,
    pub location_display_name: Option<String>,
    pub technician_ids: Vec<i32>,
    pub tags: Vec<String>,
}

/// Service for managing tools
#[derive(Clone)]
pub struct ToolService {
    tools: ToolRepository,
    locations: LocationRepository,
    users: UserRepository,
    templates: ChecklistTemplateService,
}

impl ToolService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self {
            tools: ToolRepository::new(db_pool.clone()),
            locations: LocationRepository::new(db_pool.clone()),
            users: UserRepository::new(db_pool.clone()),
            templates: ChecklistTemplateService::new(db_pool),
        }
    }

    #[instrument(skip(self))]
    pub async fn list(
        &self,
        filter: ToolFilter,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<ToolSummary>, u64), ServiceError> {
        let (tools, total) = self.tools.find_all(&filter, page, limit).await?;
        Ok((tools.into_iter().map(ToolSummary::from).collect(), total))
    }

    /// Loads a tool or fails with `NotFound`
    #[instrument(skip(self))]
    pub async fn get_model(&self, id: i32) -> Result<tool::Model, ServiceError> {
        self.tools
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Tool", id))
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i32) -> Result<ToolDetail, ServiceError> {
        let tool = self.get_model(id).await?;
        self.detail(tool).await
    }

    pub async fn find_by_ids(&self, ids: &[i32]) -> Result<Vec<tool::Model>, ServiceError> {
        self.tools.find_by_ids(ids).await
    }

    /// Fails with `InvalidInput` unless every id names an existing tool
    pub async fn ensure_exist(&self, ids: &[i32]) -> Result<Vec<tool::Model>, ServiceError> {
        let tools = self.tools.find_by_ids(ids).await?;
        ensure_all_found("Tool", ids, tools.iter().map(|tool| tool.id))?;
        Ok(tools)
    }

    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn create(&self, request: CreateToolRequest) -> Result<ToolDetail, ServiceError> {
        request.validate()?;
        if request.name.trim().is_empty() {
            return Err(ServiceError::ValidationError("Tool name is required".to_string()));
        }
        let location_name = self
            .resolve_location_name(request.location_id, request.location_name)
            .await?;
        if let Some(user_ids) = request.technician_ids.as_deref() {
            self.ensure_users_exist(user_ids).await?;
        }

        let mut active = tool::ActiveModel {
            name: Set(request.name.trim().to_string()),
            secondary_name: Set(request.secondary_name),
            tool_type: Set(request.tool_type),
            serial_number1: Set(request.serial_number1),
            serial_number2: Set(request.serial_number2),
            model1: Set(request.model1),
            model2: Set(request.model2),
            chemical_gas_service: Set(request.chemical_gas_service),
            system_name: Set(request.system_name),
            equipment_location: Set(request.equipment_location),
            config_number: Set(request.config_number),
            equipment_set: Set(request.equipment_set),
            checklist_labels_json: Set(request
                .checklist_labels
                .as_deref()
                .and_then(json_list::encode)),
            location_name: Set(location_name),
            location_id: Set(request.location_id),
            status: Set(ToolStatus::NotStarted),
            set_date: Set(request.set_date),
            notes: Set(request.notes),
            upload_date: Set(None),
            ..blank_checklist()
        };
        for update in &request.checklist {
            active.set_checklist_entry(update.item, update.completed, update.date_change());
        }

        let tool = self.tools.create(active).await?;
        let tool = self.persist_status(tool).await?;

        if let Some(user_ids) = request.technician_ids.as_deref() {
            self.tools.replace_technicians(tool.id, user_ids).await?;
        }
        if let Some(tags) = request.tags.as_deref() {
            self.tools.replace_tags(tool.id, tags).await?;
        }

        info!(tool_id = tool.id, status = ?tool.status, "tool created");
        self.detail(tool).await
    }

    #[instrument(skip(self, request))]
    pub async fn update(
        &self,
        id: i32,
        request: UpdateToolRequest,
    ) -> Result<ToolDetail, ServiceError> {
        request.validate()?;
        let existing = self.get_model(id).await?;
        let location_changed = request.location_id.is_some();
        let location_name = if location_changed || request.location_name.is_some() {
            self.resolve_location_name(request.location_id, request.location_name.clone())
                .await?
        } else {
            existing.location_name.clone()
        };

        let mut active: tool::ActiveModel = existing.into();
        if let Some(name) = request.name {
            active.name = Set(name.trim().to_string());
        }
        if let Some(value) = request.secondary_name {
            active.secondary_name = Set(Some(value));
        }
        if let Some(value) = request.tool_type {
            active.tool_type = Set(Some(value));
        }
        if let Some(value) = request.serial_number1 {
            active.serial_number1 = Set(Some(value));
        }
        if let Some(value) = request.serial_number2 {
            active.serial_number2 = Set(Some(value));
        }
        if let Some(value) = request.model1 {
            active.model1 = Set(Some(value));
        }
        if let Some(value) = request.model2 {
            active.model2 = Set(Some(value));
        }
        if let Some(value) = request.chemical_gas_service {
            active.chemical_gas_service = Set(Some(value));
        }
        if let Some(value) = request.system_name {
            active.system_name = Set(Some(value));
        }
        if let Some(value) = request.equipment_location {
            active.equipment_location = Set(Some(value));
        }
        if let Some(value) = request.config_number {
            active.config_number = Set(Some(value));
        }
        if let Some(value) = request.equipment_set {
            active.equipment_set = Set(Some(value));
        }
        if let Some(labels) = request.checklist_labels {
            active.checklist_labels_json = Set(json_list::encode(&labels));
        }
        if let Some(location_id) = request.location_id {
            active.location_id = Set(Some(location_id));
        }
        active.location_name = Set(location_name);
        if let Some(value) = request.set_date {
            active.set_date = Set(Some(value));
        }
        if let Some(value) = request.notes {
            active.notes = Set(Some(value));
        }
        for update in &request.checklist {
            active.set_checklist_entry(update.item, update.completed, update.date_change());
        }

        let tool = self.tools.update(active).await?;
        let tool = self.persist_status(tool).await?;
        info!(tool_id = tool.id, status = ?tool.status, "tool updated");
        self.detail(tool).await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        self.tools.delete(id).await?;
        info!(tool_id = id, "tool deleted");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn set_technicians(
        &self,
        id: i32,
        user_ids: Vec<i32>,
    ) -> Result<ToolDetail, ServiceError> {
        let tool = self.get_model(id).await?;
        self.replace_technicians(id, &user_ids).await?;
        self.detail(tool).await
    }

    #[instrument(skip(self))]
    pub async fn set_tags(&self, id: i32, tags: Vec<String>) -> Result<ToolDetail, ServiceError> {
        let tool = self.get_model(id).await?;
        self.tools.replace_tags(id, &tags).await?;
        self.detail(tool).await
    }

    /// Adds one technician without touching the rest of the set
    pub async fn add_technician(&self, tool_id: i32, user_id: i32) -> Result<(), ServiceError> {
        self.tools.add_technician(tool_id, user_id).await
    }

    pub async fn count(&self) -> Result<u64, ServiceError> {
        self.tools.count().await
    }

    pub async fn find_by_name(&self, name: &str) -> Result<Option<tool::Model>, ServiceError> {
        self.tools.find_by_name(name).await
    }

    pub async fn tool_ids_for_technician(&self, user_id: i32) -> Result<Vec<i32>, ServiceError> {
        self.tools.tool_ids_for_technician(user_id).await
    }

    /// Raw insert used by the data initializer; status is synced afterwards.
    pub(crate) async fn insert_model(
        &self,
        active: tool::ActiveModel,
    ) -> Result<tool::Model, ServiceError> {
        let tool = self.tools.create(active).await?;
        self.persist_status(tool).await
    }

    async fn replace_technicians(&self, tool_id: i32, user_ids: &[i32]) -> Result<(), ServiceError> {
        self.ensure_users_exist(user_ids).await?;
        self.tools.replace_technicians(tool_id, user_ids).await
    }

    async fn ensure_users_exist(&self, user_ids: &[i32]) -> Result<(), ServiceError> {
        let users = self.users.find_by_ids(user_ids).await?;
        ensure_all_found("User", user_ids, users.iter().map(|user| user.id))
    }

    /// Writes the checklist-derived status back when it differs from the stored one.
    /// The first checked item also freezes the labels the tool shows, so later
    /// template edits leave it alone.
    async fn persist_status(&self, tool: tool::Model) -> Result<tool::Model, ServiceError> {
        let calculated = tool.calculated_status();
        let snapshot = if tool.completed_checklist_items() > 0 && tool.label_snapshot().is_none() {
            Some(self.templates.labels_for(tool.tool_type).await?)
        } else {
            None
        };
        if tool.status == calculated && snapshot.is_none() {
            return Ok(tool);
        }
        debug!(tool_id = tool.id, from = ?tool.status, to = ?calculated, "syncing tool status");
        let mut active: tool::ActiveModel = tool.into();
        active.status = Set(calculated);
        if let Some(labels) = snapshot {
            active.checklist_labels_json = Set(json_list::encode(&labels));
        }
        self.tools.update(active).await
    }

    async fn resolve_location_name(
        &self,
        location_id: Option<i32>,
        location_name: Option<String>,
    ) -> Result<Option<String>, ServiceError> {
        let Some(location_id) = location_id else {
            return Ok(location_name);
        };
        let location = self
            .locations
            .find_by_id(location_id)
            .await?
            .ok_or_else(|| {
                ServiceError::InvalidInput(format!("Location with ID {} does not exist", location_id))
            })?;
        Ok(location_name
            .filter(|name| !name.trim().is_empty())
            .or_else(|| Some(location.display_name())))
    }

    async fn detail(&self, tool: tool::Model) -> Result<ToolDetail, ServiceError> {
        let technician_ids = self.tools.technician_ids(tool.id).await?;
        let tags = self.tools.tags(tool.id).await?;
        let location_display_name = match tool.location_id {
            Some(location_id) => self
                .locations
                .find_by_id(location_id)
                .await?
                .map(|location| location.display_name()),
            None => None,
        };
        let checklist_labels = self.templates.labels_for_tool(&tool).await?;
        Ok(ToolDetail {
            calculated_status: tool.calculated_status(),
            completed_checklist_items: tool.completed_checklist_items(),
            checklist_items: label_checklist(&tool, &checklist_labels),
            checklist_labels,
            location_display_name,
            technician_ids,
            tags,
            tool,
        })
    }
}

/// Active model with every checklist flag false and every date empty.
pub(crate) fn blank_checklist() -> tool::ActiveModel {
    let mut active = tool::ActiveModel::default();
    for item in ChecklistItem::ALL {
        active.set_checklist_entry(item, Some(false), Some(None));
    }
    active
}
