pub mod attachments;
pub mod common;
pub mod locations;
pub mod moving_parts;
pub mod parts;
pub mod passdowns;
pub mod rmas;
pub mod settings;
pub mod tools;
pub mod track_trends;
pub mod users;

use crate::{auth::PasswordEncoder, db::DbPool};
use std::sync::Arc;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub locations: Arc<crate::services::locations::LocationService>,
    pub tools: Arc<crate::services::tools::ToolService>,
    pub users: Arc<crate::services::users::UserService>,
    pub parts: Arc<crate::services::parts::PartService>,
    pub rmas: Arc<crate::services::rmas::RmaService>,
    pub passdowns: Arc<crate::services::passdowns::PassdownService>,
    pub moving_parts: Arc<crate::services::moving_parts::MovingPartService>,
    pub track_trends: Arc<crate::services::track_trends::TrackTrendService>,
    pub records: Arc<crate::services::records::RecordService>,
    pub checklist_templates:
        Arc<crate::services::checklist_templates::ChecklistTemplateService>,
    pub return_addresses: Arc<crate::services::return_addresses::ReturnAddressService>,
}

impl AppServices {
    pub fn new(db_pool: Arc<DbPool>, encoder: PasswordEncoder) -> Self {
        Self {
            locations: Arc::new(crate::services::locations::LocationService::new(
                db_pool.clone(),
            )),
            tools: Arc::new(crate::services::tools::ToolService::new(db_pool.clone())),
            users: Arc::new(crate::services::users::UserService::new(
                db_pool.clone(),
                encoder,
            )),
            parts: Arc::new(crate::services::parts::PartService::new(db_pool.clone())),
            rmas: Arc::new(crate::services::rmas::RmaService::new(db_pool.clone())),
            passdowns: Arc::new(crate::services::passdowns::PassdownService::new(
                db_pool.clone(),
            )),
            moving_parts: Arc::new(crate::services::moving_parts::MovingPartService::new(
                db_pool.clone(),
            )),
            track_trends: Arc::new(crate::services::track_trends::TrackTrendService::new(
                db_pool.clone(),
            )),
            records: Arc::new(crate::services::records::RecordService::new(db_pool.clone())),
            checklist_templates: Arc::new(
                crate::services::checklist_templates::ChecklistTemplateService::new(
                    db_pool.clone(),
                ),
            ),
            return_addresses: Arc::new(
                crate::services::return_addresses::ReturnAddressService::new(db_pool),
            ),
        }
    }
}
