use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use validator::Validate;

use crate::{
    db::DbPool,
    entities::{
        checklist_template::default_labels,
        json_list,
        tool::{self, ChecklistItem, ToolType},
    },
    errors::ServiceError,
    repositories::ChecklistTemplateRepository,
};

/// Tools without a type use the slurry template.
const FALLBACK_TOOL_TYPE: ToolType = ToolType::Slurry;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SaveChecklistTemplateRequest {
    #[validate(length(min = 1, max = 12, message = "A checklist template needs 1 to 12 labels"))]
    pub labels: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChecklistTemplateView {
    pub tool_type: ToolType,
    pub labels: Vec<String>,
    /// False when the built-in labels are in effect
    pub customized: bool,
    pub updated_at: Option<NaiveDateTime>,
}

/// One counted checklist item under the label the tool shows for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabeledChecklistItem {
    pub item: ChecklistItem,
    pub label: String,
    pub completed: bool,
    pub date: Option<NaiveDate>,
}

/// Pairs labels with the counted items in order. Items past the last label are not shown.
pub fn label_checklist(tool: &tool::Model, labels: &[String]) -> Vec<LabeledChecklistItem> {
    tool.counted_checklist()
        .into_iter()
        .zip(labels)
        .map(|((item, entry), label)| LabeledChecklistItem {
            item,
            label: label.clone(),
            completed: entry.is_satisfied(),
            date: entry.date,
        })
        .collect()
}

/// Service for the per-tool-type checklist labels
#[derive(Clone)]
pub struct ChecklistTemplateService {
    templates: ChecklistTemplateRepository,
}

impl ChecklistTemplateService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self {
            templates: ChecklistTemplateRepository::new(db_pool),
        }
    }

    #[instrument(skip(self))]
    pub async fn get(&self, tool_type: ToolType) -> Result<ChecklistTemplateView, ServiceError> {
        let stored = self.templates.find_by_tool_type(tool_type).await?;
        let labels: Vec<String> = stored
            .as_ref()
            .map(|template| json_list::decode(Some(template.items_json.as_str())))
            .unwrap_or_default();
        let customized = !labels.is_empty();
        Ok(ChecklistTemplateView {
            tool_type,
            labels: if customized { labels } else { default_labels() },
            customized,
            updated_at: stored.map(|template| template.updated_at),
        })
    }

    /// Replaces the labels of `tool_type`. Tools that already froze their labels keep them.
    #[instrument(skip(self, request), fields(labels = request.labels.len()))]
    pub async fn save(
        &self,
        tool_type: ToolType,
        request: SaveChecklistTemplateRequest,
    ) -> Result<ChecklistTemplateView, ServiceError> {
        request.validate()?;
        let labels: Vec<String> = request
            .labels
            .iter()
            .map(|label| label.trim().to_string())
            .collect();
        if labels.iter().any(String::is_empty) {
            return Err(ServiceError::ValidationError(
                "Checklist labels cannot be blank".to_string(),
            ));
        }
        let items_json = json_list::encode(&labels).ok_or_else(|| {
            ServiceError::ValidationError("Checklist labels could not be encoded".to_string())
        })?;

        let saved = self.templates.upsert(tool_type, items_json).await?;
        info!(?tool_type, labels = labels.len(), "checklist template saved");
        Ok(ChecklistTemplateView {
            tool_type,
            labels,
            customized: true,
            updated_at: Some(saved.updated_at),
        })
    }

    /// Labels new checks on a tool of this type would show
    pub async fn labels_for(&self, tool_type: Option<ToolType>) -> Result<Vec<String>, ServiceError> {
        Ok(self.get(tool_type.unwrap_or(FALLBACK_TOOL_TYPE)).await?.labels)
    }

    /// The tool's frozen labels, or its type's current labels when nothing is checked yet
    pub async fn labels_for_tool(&self, tool: &tool::Model) -> Result<Vec<String>, ServiceError> {
        match tool.label_snapshot() {
            Some(labels) => Ok(labels),
            None => self.labels_for(tool.tool_type).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn tool_with(items: &[(ChecklistItem, bool, Option<NaiveDate>)]) -> tool::Model {
        let now = Utc::now().naive_utc();
        let mut tool = tool::Model {
            id: 1,
            name: "RR151D".into(),
            secondary_name: None,
            tool_type: Some(ToolType::Slurry),
            serial_number1: None,
            serial_number2: None,
            model1: None,
            model2: None,
            chemical_gas_service: None,
            system_name: None,
            equipment_location: None,
            config_number: None,
            equipment_set: None,
            checklist_labels_json: None,
            location_name: None,
            location_id: None,
            status: Default::default(),
            set_date: None,
            notes: None,
            upload_date: None,
            commission_date: None,
            commission_completed: false,
            pre_sl1_date: None,
            pre_sl1_completed: false,
            sl1_date: None,
            sl1_completed: false,
            sl2_date: None,
            sl2_completed: false,
            electrical_operation_pre_sl1_date: None,
            electrical_operation_pre_sl1_completed: false,
            hazardous_energy_checklist_date: None,
            hazardous_energy_checklist_completed: false,
            mechanical_pre_sl1_date: None,
            mechanical_pre_sl1_completed: false,
            mechanical_post_sl1_date: None,
            mechanical_post_sl1_completed: false,
            specific_input_functionality_date: None,
            specific_input_functionality_completed: false,
            modes_of_operation_date: None,
            modes_of_operation_completed: false,
            specific_soos_date: None,
            specific_soos_completed: false,
            field_service_report_date: None,
            field_service_report_completed: false,
            certificate_of_approval_date: None,
            certificate_of_approval_completed: false,
            turned_over_to_customer_date: None,
            turned_over_to_customer_completed: false,
            start_up_sl03_date: None,
            start_up_sl03_completed: false,
            created_at: now,
            updated_at: now,
        };
        for (item, completed, date) in items {
            match item {
                ChecklistItem::Commission => {
                    tool.commission_completed = *completed;
                    tool.commission_date = *date;
                }
                ChecklistItem::Sl1 => {
                    tool.sl1_completed = *completed;
                    tool.sl1_date = *date;
                }
                ChecklistItem::Sl2 => {
                    tool.sl2_completed = *completed;
                    tool.sl2_date = *date;
                }
                _ => unreachable!("not used by these tests"),
            }
        }
        tool
    }

    #[test]
    fn labels_follow_counted_items_in_order() {
        let day = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
        let tool = tool_with(&[
            (ChecklistItem::Commission, true, None),
            (ChecklistItem::Sl1, false, Some(day)),
            (ChecklistItem::Sl2, true, None),
        ]);
        let items = label_checklist(&tool, &default_labels());
        assert_eq!(items.len(), ChecklistItem::COUNTED);
        assert_eq!(items[0].label, "Commission");
        assert!(items[0].completed);
        assert_eq!(items[2].item, ChecklistItem::Sl1);
        assert_eq!(items[2].date, Some(day));
        assert!(items[2].completed);
        // SL2 is uncounted, so the fourth label goes to mechanical pre-SL1
        assert_eq!(items[3].item, ChecklistItem::MechanicalPreSl1);
        assert!(!items[3].completed);
    }

    #[test]
    fn short_templates_hide_trailing_items() {
        let tool = tool_with(&[]);
        let labels = vec!["Install".to_string(), "Verify".to_string()];
        let items = label_checklist(&tool, &labels);
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].item, ChecklistItem::PreSl1);
        assert_eq!(items[1].label, "Verify");
    }

    #[test]
    fn snapshot_wins_over_the_template() {
        let mut tool = tool_with(&[]);
        assert_eq!(tool.label_snapshot(), None);
        tool.checklist_labels_json = Some("[\"Frozen\"]".into());
        assert_eq!(tool.label_snapshot(), Some(vec!["Frozen".to_string()]));
    }
}
