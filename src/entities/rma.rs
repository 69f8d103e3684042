use chrono::{NaiveDate, NaiveDateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

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
pub enum RmaStatus {
    #[default]
    #[sea_orm(string_value = "RMA_WRITTEN_EMAILED")]
    RmaWrittenEmailed,
    #[sea_orm(string_value = "NUMBER_PROVIDED")]
    NumberProvided,
    #[sea_orm(string_value = "MEMO_EMAILED")]
    MemoEmailed,
    #[sea_orm(string_value = "RECEIVED_PARTS")]
    ReceivedParts,
    #[sea_orm(string_value = "WAITING_CUSTOMER")]
    WaitingCustomer,
    #[sea_orm(string_value = "WAITING_ENGINEERING")]
    WaitingEngineering,
    #[sea_orm(string_value = "WAITING_FSE")]
    WaitingFse,
    #[sea_orm(string_value = "MISSING_LABOR_HOURS")]
    MissingLaborHours,
    #[sea_orm(string_value = "COMPLETED")]
    Completed,
}

impl RmaStatus {
    pub fn display_name(&self) -> &'static str {
        match self {
            RmaStatus::RmaWrittenEmailed => "RMA Written - Emailed",
            RmaStatus::NumberProvided => "RMA Number Provided",
            RmaStatus::MemoEmailed => "Shipping Memo Emailed",
            RmaStatus::ReceivedParts => "Received Parts",
            RmaStatus::WaitingCustomer => "Waiting on Customer",
            RmaStatus::WaitingEngineering => "Waiting on Engineering",
            RmaStatus::WaitingFse => "Waiting on FSE",
            RmaStatus::MissingLaborHours => "Missing Labor Hours",
            RmaStatus::Completed => "Completed",
        }
    }
}

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
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum RmaPriority {
    #[sea_orm(string_value = "NONE")]
    None,
    #[sea_orm(string_value = "LOW")]
    Low,
    #[default]
    #[sea_orm(string_value = "MEDIUM")]
    Medium,
    #[sea_orm(string_value = "HIGH")]
    High,
    #[sea_orm(string_value = "URGENT")]
    Urgent,
}

impl RmaPriority {
    pub fn display_name(&self) -> &'static str {
        match self {
            RmaPriority::None => "None",
            RmaPriority::Low => "Low",
            RmaPriority::Medium => "Medium",
            RmaPriority::High => "High",
            RmaPriority::Urgent => "Urgent",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(48))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RmaReasonForRequest {
    #[sea_orm(string_value = "LABOR_ONLY")]
    LaborOnly,
    #[sea_orm(string_value = "NON_WARRANTY_FAR_NO_REPLACEMENT")]
    NonWarrantyFarNoReplacement,
    #[sea_orm(string_value = "RETURN_FOR_CREDIT")]
    ReturnForCredit,
    #[sea_orm(string_value = "RETURN_FOR_REFURBISHMENT")]
    ReturnForRefurbishment,
    #[sea_orm(string_value = "RETURNED_GOODS_AUTHORIZATION")]
    ReturnedGoodsAuthorization,
    #[sea_orm(string_value = "TRACK_AND_TREND_NO_REPLACEMENT")]
    TrackAndTrendNoReplacement,
    #[sea_orm(string_value = "WARRANTY_REPLACEMENT")]
    WarrantyReplacement,
    #[sea_orm(string_value = "WARRANTY_REPLACEMENT_AND_FAR")]
    WarrantyReplacementAndFar,
}

impl RmaReasonForRequest {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::LaborOnly => "Labor Only",
            Self::NonWarrantyFarNoReplacement => "Non-Warranty FAR - No Replacement",
            Self::ReturnForCredit => "Return for Credit",
            Self::ReturnForRefurbishment => "Return for Refurbishment",
            Self::ReturnedGoodsAuthorization => "Returned Goods Authorization",
            Self::TrackAndTrendNoReplacement => "Track and Trend - No Replacement",
            Self::WarrantyReplacement => "Warranty Replacement",
            Self::WarrantyReplacementAndFar => "Warranty Replacement and FAR",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(48))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DssProductLine {
    #[sea_orm(string_value = "CARRIER_CLEANER")]
    CarrierCleaner,
    #[sea_orm(string_value = "CHEMGUARD")]
    Chemguard,
    #[sea_orm(string_value = "CHEMKEEPER")]
    Chemkeeper,
    #[sea_orm(string_value = "FLOWMASTER")]
    Flowmaster,
    #[sea_orm(string_value = "FTC_SYSTEMS")]
    FtcSystems,
    #[sea_orm(string_value = "GASGUARD")]
    Gasguard,
    #[sea_orm(string_value = "GASKEEPER")]
    Gaskeeper,
    #[sea_orm(string_value = "GASSTAR")]
    Gasstar,
    #[sea_orm(string_value = "VMHYT_TOOL_GAS_JUNGLES")]
    VmhytToolGasJungles,
    #[sea_orm(string_value = "PARTS_CLEAN")]
    PartsClean,
    #[sea_orm(string_value = "QMAC")]
    Qmac,
    #[sea_orm(string_value = "SCADA_SYSTEMS")]
    ScadaSystems,
    #[sea_orm(string_value = "OTHER_ABQ")]
    OtherAbq,
    #[sea_orm(string_value = "OTHER_VULTEE")]
    OtherVultee,
    #[sea_orm(string_value = "OTHER_VMHYT")]
    OtherVmhyt,
}

impl DssProductLine {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::CarrierCleaner => "Carrier Cleaner",
            Self::Chemguard => "ChemGuard® Chemical Delivery Systems",
            Self::Chemkeeper => "ChemKeeper Delivery Systems",
            Self::Flowmaster => "FlowMaster®",
            Self::FtcSystems => "FTC (Flow and Temp Control) Systems",
            Self::Gasguard => "GASGUARD® Gas Delivery Systems",
            Self::Gaskeeper => "Gaskeeper Gas Delivery Systems",
            Self::Gasstar => "GasSTAR",
            Self::VmhytToolGasJungles => "VMHYT Tool Gas Jungles",
            Self::PartsClean => "Parts Clean",
            Self::Qmac => "QMAC Analytical Systems",
            Self::ScadaSystems => "SCADA Systems: MMMS, GCS, CMS, GMS",
            Self::OtherAbq => "Other (ABQ)",
            Self::OtherVultee => "Other (Vultee)",
            Self::OtherVmhyt => "Other (VMHYT)",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SystemDescription {
    #[sea_orm(string_value = "BLEND_MODULE")]
    BlendModule,
    #[sea_orm(string_value = "CHEMBLEND")]
    Chemblend,
    #[sea_orm(string_value = "DISTRIBUTION_MODULE")]
    DistributionModule,
    #[sea_orm(string_value = "FEED_MODULE")]
    FeedModule,
    #[sea_orm(string_value = "SCADA")]
    Scada,
    #[sea_orm(string_value = "OTHER")]
    Other,
}

impl SystemDescription {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::BlendModule => "Blend Module",
            Self::Chemblend => "ChemBlend",
            Self::DistributionModule => "Distribution Module",
            Self::FeedModule => "Feed Module",
            Self::Scada => "SCADA",
            Self::Other => "Other (Enter Description in Failure Mode)",
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "rmas")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub rma_number: Option<String>,
    pub customer_name: Option<String>,
    pub customer_contact: Option<String>,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    pub company_ship_to_name: Option<String>,
    pub company_ship_to_address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub attn: Option<String>,
    pub serial_number: Option<String>,
    pub status: RmaStatus,
    pub priority: RmaPriority,
    pub reason_for_request: Option<RmaReasonForRequest>,
    pub dss_product_line: Option<DssProductLine>,
    pub system_description: Option<SystemDescription>,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub root_cause: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub resolution: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
    pub location_id: Option<i32>,
    pub technician: Option<String>,
    pub tool_id: Option<i32>,
    pub created_by_id: Option<i32>,
    pub field_tech_name: Option<String>,
    pub field_tech_phone: Option<String>,
    pub field_tech_email: Option<String>,
    pub discovered_by: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub why_how: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub how_contained: Option<String>,
    pub sales_order: Option<String>,
    pub sap_notification_number: Option<String>,
    pub service_order: Option<String>,
    pub labor_charge_number: Option<String>,
    pub parts_source_location: Option<String>,
    pub excel_file_attached: bool,
    pub shipping_memo_emailed: bool,
    pub interruption_to_flow: bool,
    pub interruption_to_production: bool,
    pub downtime_hours: f64,
    pub exposed_to_process_gas_or_chemicals: bool,
    pub purged: bool,
    #[sea_orm(column_type = "Text", nullable)]
    pub instructions_for_exposed_component: Option<String>,
    pub received_date: Option<NaiveDate>,
    pub written_date: Option<NaiveDate>,
    pub rma_number_provided_date: Option<NaiveDate>,
    pub shipping_memo_emailed_date: Option<NaiveDate>,
    pub parts_received_date: Option<NaiveDate>,
    pub failed_parts_shipped_date: Option<NaiveDate>,
    pub installed_parts_date: Option<NaiveDate>,
    pub failed_parts_packed_date: Option<NaiveDate>,
    pub created_date: NaiveDateTime,
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
    #[sea_orm(
        belongs_to = "super::tool::Entity",
        from = "Column::ToolId",
        to = "super::tool::Column::Id",
        on_delete = "SetNull"
    )]
    Tool,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::CreatedById",
        to = "super::user::Column::Id",
        on_delete = "SetNull"
    )]
    CreatedBy,
    #[sea_orm(has_many = "super::rma_part_line_item::Entity")]
    PartLineItems,
    #[sea_orm(has_many = "super::rma_labor_entry::Entity")]
    LaborEntries,
    #[sea_orm(has_many = "super::rma_part::Entity")]
    Parts,
}

impl Related<super::rma_part_line_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PartLineItems.def()
    }
}

impl Related<super::rma_labor_entry::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LaborEntries.def()
    }
}

impl Related<super::rma_part::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Parts.def()
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C: ConnectionTrait>(self, _db: &C, insert: bool) -> Result<Self, DbErr> {
        let mut active_model = self;
        if insert {
            let now = Utc::now().naive_utc();
            active_model.created_date = sea_orm::Set(now);
            if !matches!(active_model.received_date, sea_orm::ActiveValue::Set(Some(_))) {
                active_model.received_date = sea_orm::Set(Some(now.date()));
            }
        }
        Ok(active_model)
    }
}
