use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use validator::Validate;

use crate::{
    db::DbPool,
    entities::{
        rma::{self, DssProductLine, RmaPriority, RmaReasonForRequest, RmaStatus, SystemDescription},
        rma_labor_entry::{self, total_labor_cost},
        rma_part_line_item,
    },
    errors::ServiceError,
    repositories::{rma_repository::RmaFilter, LocationRepository, PartRepository, RmaRepository, ToolRepository},
    services::ensure_all_found,
};

/// Body of both create and update requests. On update, absent fields keep
/// their stored value; on create they take the column default.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct RmaRequest {
    #[validate(length(max = 100))]
    pub rma_number: Option<String>,
    pub customer_name: Option<String>,
    pub customer_contact: Option<String>,
    #[validate(email(message = "Customer email is not valid"))]
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    pub company_ship_to_name: Option<String>,
    pub company_ship_to_address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub attn: Option<String>,
    pub serial_number: Option<String>,
    pub status: Option<RmaStatus>,
    pub priority: Option<RmaPriority>,
    pub reason_for_request: Option<RmaReasonForRequest>,
    pub dss_product_line: Option<DssProductLine>,
    pub system_description: Option<SystemDescription>,
    pub description: Option<String>,
    pub root_cause: Option<String>,
    pub resolution: Option<String>,
    pub notes: Option<String>,
    pub location_id: Option<i32>,
    pub technician: Option<String>,
    pub tool_id: Option<i32>,
    pub created_by_id: Option<i32>,
    pub field_tech_name: Option<String>,
    pub field_tech_phone: Option<String>,
    #[validate(email(message = "Field tech email is not valid"))]
    pub field_tech_email: Option<String>,
    pub discovered_by: Option<String>,
    pub why_how: Option<String>,
    pub how_contained: Option<String>,
    pub sales_order: Option<String>,
    pub sap_notification_number: Option<String>,
    pub service_order: Option<String>,
    pub labor_charge_number: Option<String>,
    pub parts_source_location: Option<String>,
    pub excel_file_attached: Option<bool>,
    pub shipping_memo_emailed: Option<bool>,
    pub interruption_to_flow: Option<bool>,
    pub interruption_to_production: Option<bool>,
    #[validate(range(min = 0.0, message = "Downtime hours cannot be negative"))]
    pub downtime_hours: Option<f64>,
    pub exposed_to_process_gas_or_chemicals: Option<bool>,
    pub purged: Option<bool>,
    pub instructions_for_exposed_component: Option<String>,
    pub received_date: Option<NaiveDate>,
    pub written_date: Option<NaiveDate>,
    pub rma_number_provided_date: Option<NaiveDate>,
    pub shipping_memo_emailed_date: Option<NaiveDate>,
    pub parts_received_date: Option<NaiveDate>,
    pub failed_parts_shipped_date: Option<NaiveDate>,
    pub installed_parts_date: Option<NaiveDate>,
    pub failed_parts_packed_date: Option<NaiveDate>,
    pub part_ids: Option<Vec<i32>>,
}

macro_rules! set_optional {
    ($active:ident, $request:ident, $($field:ident),+ $(,)?) => {
        $(
            if let Some(value) = $request.$field {
                $active.$field = Set(Some(value));
            }
        )+
    };
}

macro_rules! set_required {
    ($active:ident, $request:ident, $($field:ident),+ $(,)?) => {
        $(
            if let Some(value) = $request.$field {
                $active.$field = Set(value);
            }
        )+
    };
}

impl RmaRequest {
    fn apply(self, active: &mut rma::ActiveModel) {
        let request = self;
        set_optional!(
            active,
            request,
            rma_number,
            customer_name,
            customer_contact,
            customer_email,
            customer_phone,
            company_ship_to_name,
            company_ship_to_address,
            city,
            state,
            zip_code,
            attn,
            serial_number,
            reason_for_request,
            dss_product_line,
            system_description,
            description,
            root_cause,
            resolution,
            notes,
            location_id,
            technician,
            tool_id,
            created_by_id,
            field_tech_name,
            field_tech_phone,
            field_tech_email,
            discovered_by,
            why_how,
            how_contained,
            sales_order,
            sap_notification_number,
            service_order,
            labor_charge_number,
            parts_source_location,
            instructions_for_exposed_component,
            received_date,
            written_date,
            rma_number_provided_date,
            shipping_memo_emailed_date,
            parts_received_date,
            failed_parts_shipped_date,
            installed_parts_date,
            failed_parts_packed_date,
        );
        set_required!(
            active,
            request,
            status,
            priority,
            excel_file_attached,
            shipping_memo_emailed,
            interruption_to_flow,
            interruption_to_production,
            downtime_hours,
            exposed_to_process_gas_or_chemicals,
            purged,
        );
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewLineItem {
    pub part_name: Option<String>,
    pub part_number: Option<String>,
    pub product_description: Option<String>,
    #[validate(range(min = 0, message = "Quantity cannot be negative"))]
    pub quantity: Option<i32>,
    #[serde(default)]
    pub replacement_required: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewLaborEntry {
    pub description: Option<String>,
    pub technician: Option<String>,
    pub hours: Decimal,
    pub labor_date: Option<NaiveDate>,
    pub price_per_hour: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct RmaDetail {
    #[serde(flatten)]
    pub rma: rma::Model,
    pub status_display: &'static str,
    pub priority_display: &'static str,
    pub part_ids: Vec<i32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LaborSummary {
    pub entries: Vec<rma_labor_entry::Model>,
    pub total_labor_cost: Decimal,
}

/// Service for managing RMAs
#[derive(Clone)]
pub struct RmaService {
    rmas: RmaRepository,
    tools: ToolRepository,
    parts: PartRepository,
    locations: LocationRepository,
}

impl RmaService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self {
            rmas: RmaRepository::new(db_pool.clone()),
            tools: ToolRepository::new(db_pool.clone()),
            parts: PartRepository::new(db_pool.clone()),
            locations: LocationRepository::new(db_pool),
        }
    }

    #[instrument(skip(self))]
    pub async fn list(
        &self,
        filter: RmaFilter,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<rma::Model>, u64), ServiceError> {
        self.rmas.find_all(&filter, page, limit).await
    }

    pub async fn get_model(&self, id: i32) -> Result<rma::Model, ServiceError> {
        self.rmas
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("RMA", id))
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i32) -> Result<RmaDetail, ServiceError> {
        let rma = self.get_model(id).await?;
        self.detail(rma).await
    }

    #[instrument(skip(self, request))]
    pub async fn create(&self, request: RmaRequest) -> Result<RmaDetail, ServiceError> {
        request.validate()?;
        self.check_references(request.tool_id, request.location_id)
            .await?;
        let part_ids = request.part_ids.clone();
        if let Some(part_ids) = part_ids.as_deref() {
            self.ensure_parts_exist(part_ids).await?;
        }

        let mut active = rma::ActiveModel {
            status: Set(RmaStatus::default()),
            priority: Set(RmaPriority::default()),
            excel_file_attached: Set(false),
            shipping_memo_emailed: Set(false),
            interruption_to_flow: Set(false),
            interruption_to_production: Set(false),
            downtime_hours: Set(0.0),
            exposed_to_process_gas_or_chemicals: Set(false),
            purged: Set(false),
            ..Default::default()
        };
        request.apply(&mut active);

        let rma = self.rmas.create(active).await?;
        if let Some(part_ids) = part_ids.as_deref() {
            self.rmas.replace_parts(rma.id, part_ids).await?;
        }
        info!(rma_id = rma.id, status = ?rma.status, "RMA created");
        self.detail(rma).await
    }

    #[instrument(skip(self, request))]
    pub async fn update(&self, id: i32, request: RmaRequest) -> Result<RmaDetail, ServiceError> {
        request.validate()?;
        let existing = self.get_model(id).await?;
        self.check_references(request.tool_id, request.location_id)
            .await?;
        let part_ids = request.part_ids.clone();
        if let Some(part_ids) = part_ids.as_deref() {
            self.ensure_parts_exist(part_ids).await?;
        }

        let mut active: rma::ActiveModel = existing.into();
        request.apply(&mut active);
        let rma = self.rmas.update(active).await?;
        if let Some(part_ids) = part_ids.as_deref() {
            self.rmas.replace_parts(id, part_ids).await?;
        }
        info!(rma_id = id, status = ?rma.status, "RMA updated");
        self.detail(rma).await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        self.rmas.delete(id).await?;
        info!(rma_id = id, "RMA deleted");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn set_parts(&self, id: i32, part_ids: Vec<i32>) -> Result<RmaDetail, ServiceError> {
        let rma = self.get_model(id).await?;
        self.ensure_parts_exist(&part_ids).await?;
        self.rmas.replace_parts(id, &part_ids).await?;
        self.detail(rma).await
    }

    #[instrument(skip(self))]
    pub async fn line_items(
        &self,
        id: i32,
    ) -> Result<Vec<rma_part_line_item::Model>, ServiceError> {
        self.get_model(id).await?;
        self.rmas.line_items(id).await
    }

    #[instrument(skip(self, item))]
    pub async fn add_line_item(
        &self,
        id: i32,
        item: NewLineItem,
    ) -> Result<rma_part_line_item::Model, ServiceError> {
        item.validate()?;
        self.get_model(id).await?;
        let saved = self
            .rmas
            .add_line_item(rma_part_line_item::ActiveModel {
                rma_id: Set(id),
                part_name: Set(item.part_name),
                part_number: Set(item.part_number),
                product_description: Set(item.product_description),
                quantity: Set(item.quantity.unwrap_or(1)),
                replacement_required: Set(item.replacement_required),
                ..Default::default()
            })
            .await?;
        info!(rma_id = id, line_item_id = saved.id, "RMA line item added");
        Ok(saved)
    }

    #[instrument(skip(self))]
    pub async fn labor(&self, id: i32) -> Result<LaborSummary, ServiceError> {
        self.get_model(id).await?;
        let entries = self.rmas.labor_entries(id).await?;
        Ok(LaborSummary {
            total_labor_cost: total_labor_cost(&entries),
            entries,
        })
    }

    #[instrument(skip(self, entry))]
    pub async fn add_labor_entry(
        &self,
        id: i32,
        entry: NewLaborEntry,
    ) -> Result<rma_labor_entry::Model, ServiceError> {
        if entry.hours.is_sign_negative() || entry.price_per_hour.is_sign_negative() {
            return Err(ServiceError::ValidationError(
                "Hours and price per hour cannot be negative".to_string(),
            ));
        }
        self.get_model(id).await?;
        let saved = self
            .rmas
            .add_labor_entry(rma_labor_entry::ActiveModel {
                rma_id: Set(id),
                description: Set(entry.description),
                technician: Set(entry.technician),
                hours: Set(entry.hours),
                labor_date: Set(entry.labor_date),
                price_per_hour: Set(entry.price_per_hour),
                ..Default::default()
            })
            .await?;
        info!(rma_id = id, labor_entry_id = saved.id, "RMA labor entry added");
        Ok(saved)
    }

    /// RMAs raised against a tool, newest first
    #[instrument(skip(self))]
    pub async fn rmas_for_tool(&self, tool_id: i32) -> Result<Vec<rma::Model>, ServiceError> {
        self.rmas.find_by_tool_ids(&[tool_id]).await
    }

    pub async fn rmas_for_tools(&self, tool_ids: &[i32]) -> Result<Vec<rma::Model>, ServiceError> {
        self.rmas.find_by_tool_ids(tool_ids).await
    }

    async fn ensure_parts_exist(&self, part_ids: &[i32]) -> Result<(), ServiceError> {
        let parts = self.parts.find_by_ids(part_ids).await?;
        ensure_all_found("Part", part_ids, parts.iter().map(|part| part.id))
    }

    async fn check_references(
        &self,
        tool_id: Option<i32>,
        location_id: Option<i32>,
    ) -> Result<(), ServiceError> {
        if let Some(tool_id) = tool_id {
            if self.tools.find_by_id(tool_id).await?.is_none() {
                return Err(ServiceError::InvalidInput(format!(
                    "Tool with ID {} does not exist",
                    tool_id
                )));
            }
        }
        if let Some(location_id) = location_id {
            if self.locations.find_by_id(location_id).await?.is_none() {
                return Err(ServiceError::InvalidInput(format!(
                    "Location with ID {} does not exist",
                    location_id
                )));
            }
        }
        Ok(())
    }

    async fn detail(&self, rma: rma::Model) -> Result<RmaDetail, ServiceError> {
        let part_ids = self.rmas.part_ids(rma.id).await?;
        Ok(RmaDetail {
            status_display: rma.status.display_name(),
            priority_display: rma.priority.display_name(),
            part_ids,
            rma,
        })
    }
}
