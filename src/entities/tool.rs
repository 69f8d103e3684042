use chrono::{NaiveDate, NaiveDateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Equipment family of a tool.
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
#[strum(ascii_case_insensitive)]
pub enum ToolType {
    #[sea_orm(string_value = "CHEMBLEND")]
    #[strum(serialize = "CHEMBLEND")]
    Chemblend,
    #[sea_orm(string_value = "SLURRY")]
    #[strum(serialize = "SLURRY")]
    Slurry,
    #[sea_orm(string_value = "AMATGASGUARD")]
    #[strum(serialize = "AMATGASGUARD")]
    Amatgasguard,
}

impl ToolType {
    pub fn display_name(&self) -> &'static str {
        match self {
            ToolType::Chemblend => "ChemBlend",
            ToolType::Slurry => "Slurry",
            ToolType::Amatgasguard => "GasGuard",
        }
    }

    /// Stored names accepted by the schema patcher.
    pub const STORED_NAMES: [&'static str; 3] = ["CHEMBLEND", "SLURRY", "AMATGASGUARD"];
}

/// Checklist-driven installation status of a tool.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    strum::EnumString,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum ToolStatus {
    #[default]
    #[sea_orm(string_value = "NOT_STARTED")]
    NotStarted,
    #[sea_orm(string_value = "IN_PROGRESS")]
    InProgress,
    #[sea_orm(string_value = "COMPLETED")]
    Completed,
}

impl ToolStatus {
    pub const STORED_NAMES: [&'static str; 3] = ["NOT_STARTED", "IN_PROGRESS", "COMPLETED"];

    /// Maps a number of satisfied checklist items onto a status.
    pub fn from_completed_count(completed: usize) -> Self {
        if completed == 0 {
            ToolStatus::NotStarted
        } else if completed >= ChecklistItem::COUNTED {
            ToolStatus::Completed
        } else {
            ToolStatus::InProgress
        }
    }
}

/// Every installation checklist step tracked on a tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChecklistItem {
    Commission,
    PreSl1,
    Sl1,
    Sl2,
    ElectricalOperationPreSl1,
    HazardousEnergyChecklist,
    MechanicalPreSl1,
    MechanicalPostSl1,
    SpecificInputFunctionality,
    ModesOfOperation,
    SpecificSoos,
    FieldServiceReport,
    CertificateOfApproval,
    TurnedOverToCustomer,
    StartUpSl03,
}

impl ChecklistItem {
    pub const ALL: [ChecklistItem; 15] = [
        ChecklistItem::Commission,
        ChecklistItem::PreSl1,
        ChecklistItem::Sl1,
        ChecklistItem::Sl2,
        ChecklistItem::ElectricalOperationPreSl1,
        ChecklistItem::HazardousEnergyChecklist,
        ChecklistItem::MechanicalPreSl1,
        ChecklistItem::MechanicalPostSl1,
        ChecklistItem::SpecificInputFunctionality,
        ChecklistItem::ModesOfOperation,
        ChecklistItem::SpecificSoos,
        ChecklistItem::FieldServiceReport,
        ChecklistItem::CertificateOfApproval,
        ChecklistItem::TurnedOverToCustomer,
        ChecklistItem::StartUpSl03,
    ];

    /// Number of items that contribute to the derived status.
    pub const COUNTED: usize = 12;

    /// SL2, electrical pre-SL1 and the hazardous energy checklist are recorded
    /// but never move the status.
    pub fn counts_toward_status(&self) -> bool {
        !matches!(
            self,
            ChecklistItem::Sl2
                | ChecklistItem::ElectricalOperationPreSl1
                | ChecklistItem::HazardousEnergyChecklist
        )
    }
}

/// Flag/date pair for one checklist item. Older rows only carry dates, newer
/// ones only flags, so either one marks the item done.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistEntry {
    pub completed: bool,
    pub date: Option<NaiveDate>,
}

impl ChecklistEntry {
    pub fn new(completed: bool, date: Option<NaiveDate>) -> Self {
        Self { completed, date }
    }

    pub fn is_satisfied(&self) -> bool {
        self.completed || self.date.is_some()
    }
}

/// Derives a tool status from its checklist entries.
pub fn derive_status<I>(entries: I) -> ToolStatus
where
    I: IntoIterator<Item = (ChecklistItem, ChecklistEntry)>,
{
    let completed = entries
        .into_iter()
        .filter(|(item, entry)| item.counts_toward_status() && entry.is_satisfied())
        .count();
    ToolStatus::from_completed_count(completed)
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, Validate)]
#[sea_orm(table_name = "tools")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
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
    #[sea_orm(column_type = "Text", nullable)]
    pub checklist_labels_json: Option<String>,
    pub location_name: Option<String>,
    pub location_id: Option<i32>,
    pub status: ToolStatus,
    pub set_date: Option<NaiveDate>,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
    pub upload_date: Option<NaiveDateTime>,

    pub commission_date: Option<NaiveDate>,
    pub commission_completed: bool,
    pub pre_sl1_date: Option<NaiveDate>,
    pub pre_sl1_completed: bool,
    pub sl1_date: Option<NaiveDate>,
    pub sl1_completed: bool,
    pub sl2_date: Option<NaiveDate>,
    pub sl2_completed: bool,
    pub electrical_operation_pre_sl1_date: Option<NaiveDate>,
    pub electrical_operation_pre_sl1_completed: bool,
    pub hazardous_energy_checklist_date: Option<NaiveDate>,
    pub hazardous_energy_checklist_completed: bool,
    pub mechanical_pre_sl1_date: Option<NaiveDate>,
    pub mechanical_pre_sl1_completed: bool,
    pub mechanical_post_sl1_date: Option<NaiveDate>,
    pub mechanical_post_sl1_completed: bool,
    pub specific_input_functionality_date: Option<NaiveDate>,
    pub specific_input_functionality_completed: bool,
    pub modes_of_operation_date: Option<NaiveDate>,
    pub modes_of_operation_completed: bool,
    pub specific_soos_date: Option<NaiveDate>,
    pub specific_soos_completed: bool,
    pub field_service_report_date: Option<NaiveDate>,
    pub field_service_report_completed: bool,
    pub certificate_of_approval_date: Option<NaiveDate>,
    pub certificate_of_approval_completed: bool,
    pub turned_over_to_customer_date: Option<NaiveDate>,
    pub turned_over_to_customer_completed: bool,
    pub start_up_sl03_date: Option<NaiveDate>,
    pub start_up_sl03_completed: bool,

    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::location::Entity",
        from = "Column::LocationId",
        to = "super::location::Column::Id",
        on_update = "Cascade",
        on_delete = "SetNull"
    )]
    Location,
    #[sea_orm(has_many = "super::part_movement::Entity")]
    PartMovements,
    #[sea_orm(has_many = "super::tool_tag::Entity")]
    Tags,
    #[sea_orm(has_many = "super::tool_technician::Entity")]
    Technicians,
}

impl Related<super::location::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Location.def()
    }
}

impl Related<super::part_movement::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PartMovements.def()
    }
}

impl Related<super::tool_tag::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tags.def()
    }
}

/// Technicians currently working the tool.
impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        super::tool_technician::Relation::User.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::tool_technician::Relation::Tool.def().rev())
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
    /// Flag/date pair for a single checklist item.
    pub fn checklist_entry(&self, item: ChecklistItem) -> ChecklistEntry {
        let (completed, date) = match item {
            ChecklistItem::Commission => (self.commission_completed, self.commission_date),
            ChecklistItem::PreSl1 => (self.pre_sl1_completed, self.pre_sl1_date),
            ChecklistItem::Sl1 => (self.sl1_completed, self.sl1_date),
            ChecklistItem::Sl2 => (self.sl2_completed, self.sl2_date),
            ChecklistItem::ElectricalOperationPreSl1 => (
                self.electrical_operation_pre_sl1_completed,
                self.electrical_operation_pre_sl1_date,
            ),
            ChecklistItem::HazardousEnergyChecklist => (
                self.hazardous_energy_checklist_completed,
                self.hazardous_energy_checklist_date,
            ),
            ChecklistItem::MechanicalPreSl1 => {
                (self.mechanical_pre_sl1_completed, self.mechanical_pre_sl1_date)
            }
            ChecklistItem::MechanicalPostSl1 => {
                (self.mechanical_post_sl1_completed, self.mechanical_post_sl1_date)
            }
            ChecklistItem::SpecificInputFunctionality => (
                self.specific_input_functionality_completed,
                self.specific_input_functionality_date,
            ),
            ChecklistItem::ModesOfOperation => {
                (self.modes_of_operation_completed, self.modes_of_operation_date)
            }
            ChecklistItem::SpecificSoos => (self.specific_soos_completed, self.specific_soos_date),
            ChecklistItem::FieldServiceReport => (
                self.field_service_report_completed,
                self.field_service_report_date,
            ),
            ChecklistItem::CertificateOfApproval => (
                self.certificate_of_approval_completed,
                self.certificate_of_approval_date,
            ),
            ChecklistItem::TurnedOverToCustomer => (
                self.turned_over_to_customer_completed,
                self.turned_over_to_customer_date,
            ),
            ChecklistItem::StartUpSl03 => (self.start_up_sl03_completed, self.start_up_sl03_date),
        };
        ChecklistEntry::new(completed, date)
    }

    pub fn checklist(&self) -> Vec<(ChecklistItem, ChecklistEntry)> {
        ChecklistItem::ALL
            .iter()
            .map(|item| (*item, self.checklist_entry(*item)))
            .collect()
    }

    pub fn completed_checklist_items(&self) -> usize {
        self.checklist()
            .into_iter()
            .filter(|(item, entry)| item.counts_toward_status() && entry.is_satisfied())
            .count()
    }

    /// Status implied by the checklist, regardless of what is stored.
    pub fn calculated_status(&self) -> ToolStatus {
        derive_status(self.checklist())
    }

    /// Counted items in checklist order, which is the order template labels follow.
    pub fn counted_checklist(&self) -> Vec<(ChecklistItem, ChecklistEntry)> {
        self.checklist()
            .into_iter()
            .filter(|(item, _)| item.counts_toward_status())
            .collect()
    }

    /// Labels frozen on the tool when its first item was checked.
    pub fn label_snapshot(&self) -> Option<Vec<String>> {
        let labels: Vec<String> = super::json_list::decode(self.checklist_labels_json.as_deref());
        (!labels.is_empty()).then_some(labels)
    }
}

impl ActiveModel {
    /// Writes one checklist item onto the active model. `None` leaves the
    /// corresponding column untouched.
    pub fn set_checklist_entry(
        &mut self,
        item: ChecklistItem,
        completed: Option<bool>,
        date: Option<Option<NaiveDate>>,
    ) {
        use sea_orm::Set;

        macro_rules! apply {
            ($flag:ident, $date:ident) => {{
                if let Some(value) = completed {
                    self.$flag = Set(value);
                }
                if let Some(value) = date {
                    self.$date = Set(value);
                }
            }};
        }

        match item {
            ChecklistItem::Commission => apply!(commission_completed, commission_date),
            ChecklistItem::PreSl1 => apply!(pre_sl1_completed, pre_sl1_date),
            ChecklistItem::Sl1 => apply!(sl1_completed, sl1_date),
            ChecklistItem::Sl2 => apply!(sl2_completed, sl2_date),
            ChecklistItem::ElectricalOperationPreSl1 => apply!(
                electrical_operation_pre_sl1_completed,
                electrical_operation_pre_sl1_date
            ),
            ChecklistItem::HazardousEnergyChecklist => apply!(
                hazardous_energy_checklist_completed,
                hazardous_energy_checklist_date
            ),
            ChecklistItem::MechanicalPreSl1 => {
                apply!(mechanical_pre_sl1_completed, mechanical_pre_sl1_date)
            }
            ChecklistItem::MechanicalPostSl1 => {
                apply!(mechanical_post_sl1_completed, mechanical_post_sl1_date)
            }
            ChecklistItem::SpecificInputFunctionality => apply!(
                specific_input_functionality_completed,
                specific_input_functionality_date
            ),
            ChecklistItem::ModesOfOperation => {
                apply!(modes_of_operation_completed, modes_of_operation_date)
            }
            ChecklistItem::SpecificSoos => apply!(specific_soos_completed, specific_soos_date),
            ChecklistItem::FieldServiceReport => {
                apply!(field_service_report_completed, field_service_report_date)
            }
            ChecklistItem::CertificateOfApproval => {
                apply!(certificate_of_approval_completed, certificate_of_approval_date)
            }
            ChecklistItem::TurnedOverToCustomer => {
                apply!(turned_over_to_customer_completed, turned_over_to_customer_date)
            }
            ChecklistItem::StartUpSl03 => apply!(start_up_sl03_completed, start_up_sl03_date),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    fn entries(satisfied: &[ChecklistItem]) -> Vec<(ChecklistItem, ChecklistEntry)> {
        ChecklistItem::ALL
            .iter()
            .map(|item| {
                let entry = if satisfied.contains(item) {
                    ChecklistEntry::new(true, None)
                } else {
                    ChecklistEntry::default()
                };
                (*item, entry)
            })
            .collect()
    }

    #[test]
    fn empty_checklist_is_not_started() {
        assert_eq!(derive_status(entries(&[])), ToolStatus::NotStarted);
    }

    #[test]
    fn all_counted_items_complete_the_tool() {
        let counted: Vec<ChecklistItem> = ChecklistItem::ALL
            .iter()
            .copied()
            .filter(ChecklistItem::counts_toward_status)
            .collect();
        assert_eq!(counted.len(), ChecklistItem::COUNTED);
        assert_eq!(derive_status(entries(&counted)), ToolStatus::Completed);
    }

    #[test]
    fn uncounted_items_never_move_status() {
        let uncounted = [
            ChecklistItem::Sl2,
            ChecklistItem::ElectricalOperationPreSl1,
            ChecklistItem::HazardousEnergyChecklist,
        ];
        assert_eq!(derive_status(entries(&uncounted)), ToolStatus::NotStarted);
    }

    #[test]
    fn date_alone_satisfies_an_item() {
        let mut list = entries(&[]);
        list[0].1 = ChecklistEntry::new(false, Some(day()));
        assert_eq!(derive_status(list), ToolStatus::InProgress);
    }

    #[test]
    fn count_mapping() {
        assert_eq!(ToolStatus::from_completed_count(0), ToolStatus::NotStarted);
        assert_eq!(ToolStatus::from_completed_count(1), ToolStatus::InProgress);
        assert_eq!(ToolStatus::from_completed_count(11), ToolStatus::InProgress);
        assert_eq!(ToolStatus::from_completed_count(12), ToolStatus::Completed);
    }

    #[test]
    fn enums_parse_case_insensitively() {
        assert_eq!(ToolStatus::from_str("in_progress").unwrap(), ToolStatus::InProgress);
        assert_eq!(ToolType::from_str("slurry").unwrap(), ToolType::Slurry);
        assert_eq!(ToolType::Amatgasguard.display_name(), "GasGuard");
    }
}
