use chrono::{Duration, Utc};
use sea_orm::Set;
use serde::Serialize;
use std::{future::Future, sync::Arc};
use tracing::{info, instrument, warn};

use crate::{
    auth::PasswordEncoder,
    config::AppConfig,
    db::DbPool,
    entities::{
        location,
        tool::{self, ToolStatus, ToolType},
        user,
    },
    errors::ServiceError,
    services::{
        locations::{CreateLocationRequest, LocationService},
        passdowns::{CreatePassdownRequest, PassdownService},
        tools::{blank_checklist, ToolService},
        users::UserService,
    },
};

pub const HOME_STATE: &str = "Arizona";
pub const HOME_FAB: &str = "52";
pub const DEMO_TECH_EMAIL: &str = "demo.tech@pcd.com";
pub const DEMO_TOOL_NAME: &str = "RR151D";

const SEED_USERS: [(&str, &str, &str, &str); 2] = [
    ("admin@pcd.com", "admin123", "Admin User", "ADMIN"),
    ("tech@pcd.com", "tech123", "Tech User", "TECHNICIAN"),
];

/// Days before today, author email, tool name, comment
const SAMPLE_PASSDOWNS: [(i64, &str, &str, &str); 5] = [
    (
        0,
        "tech@pcd.com",
        DEMO_TOOL_NAME,
        "Completed initial setup of the tool. All systems operational and ready for testing.",
    ),
    (
        1,
        "tech@pcd.com",
        "RZ151D",
        "Changed filters and cleaned mixing chamber. Performance has improved significantly.",
    ),
    (
        2,
        "admin@pcd.com",
        "BH151",
        "Encountered issue with the control panel. Error code E-223 appears intermittently. Need to check wiring connections.",
    ),
    (
        5,
        "tech@pcd.com",
        "KOR151",
        "Calibrated sensors according to specification. Readings are now within acceptable range.",
    ),
    (
        9,
        "admin@pcd.com",
        DEMO_TOOL_NAME,
        "Replaced worn pump seals. No more leaking observed during high-pressure operations.",
    ),
];

/// Name, secondary name, type, model 1, model 2, serial 1, serial 2
type SeedTool = (
    &'static str,
    Option<&'static str>,
    ToolType,
    &'static str,
    Option<&'static str>,
    &'static str,
    Option<&'static str>,
);

const MODEL_SLURRY: Option<&str> = Some("2309011");
const MODEL_CHEMBLEND: Option<&str> = Some("2309019");

pub const SEED_TOOLS: [SeedTool; 41] = [
    ("RAK151D", None, ToolType::Slurry, "2312625", MODEL_SLURRY, "200465017-4", Some("200465044-47")),
    ("RR151D", None, ToolType::Slurry, "2313328", MODEL_SLURRY, "200465022-3", Some("200455776-29")),
    ("RAK152D", None, ToolType::Slurry, "2313194", None, "200466053-1", None),
    ("WK151D", None, ToolType::Slurry, "2313326", MODEL_SLURRY, "200463297-1", Some("200463298-40")),
    ("KT151D", Some("CH151D/RR152D"), ToolType::Slurry, "2312622", MODEL_SLURRY, "200463695-2", Some("200455778-30")),
    ("FU151D", Some("CONT151D"), ToolType::Slurry, "2309011", None, "200466036-51", None),
    ("EK151D", Some("KB152D"), ToolType::Slurry, "2313193", None, "200466052-1", None),
    ("JP151D", Some("CH152D"), ToolType::Slurry, "2313191", None, "200466050-1", None),
    ("JK151D", None, ToolType::Slurry, "2313325", MODEL_SLURRY, "200463160-1", Some("200463161-37")),
    ("WL151D", None, ToolType::Slurry, "2315214", MODEL_SLURRY, "200464053-1", Some("200463381-41")),
    ("HG151D", None, ToolType::Slurry, "2313556", MODEL_SLURRY, "200465024-2", Some("200465023-46")),
    ("HG152D", Some("FA151D"), ToolType::Slurry, "2313556", MODEL_SLURRY, "200466493-4", Some("200455775-28")),
    ("RE151D", None, ToolType::Slurry, "2313330", MODEL_SLURRY, "200463698-2", Some("200463697-43")),
    ("EF151D", None, ToolType::Slurry, "2313329", MODEL_SLURRY, "200463290-1", Some("200463291-38")),
    ("VC151D", None, ToolType::Slurry, "2312620", MODEL_SLURRY, "200462472-2", Some("200455801-31")),
    ("TM151D", None, ToolType::Slurry, "2312617", MODEL_SLURRY, "200460354-2", Some("200455771-24")),
    ("XJ151D", Some("AE151D"), ToolType::Slurry, "2313557", MODEL_SLURRY, "200466049-4", Some("200466048-52")),
    ("WC151D", None, ToolType::Slurry, "2312624", MODEL_SLURRY, "200465018-2", Some("200465019-44")),
    ("JS151D", None, ToolType::Slurry, "2312618", MODEL_SLURRY, "200460356-2", Some("200455773-26")),
    ("RFT151D", None, ToolType::Slurry, "2310218", MODEL_SLURRY, "200460355-3", Some("200455772-25")),
    ("RFT152D", None, ToolType::Slurry, "2310218", MODEL_SLURRY, "200466533-4", Some("200469736-64")),
    ("FB151D", None, ToolType::Slurry, "2312621", MODEL_SLURRY, "200462473-3", Some("200462474-36")),
    ("WR151D", Some("FB152D"), ToolType::Slurry, "2312621", MODEL_SLURRY, "200465021-4", Some("200465020-45")),
    ("RZ151D", None, ToolType::Slurry, "2312619", MODEL_SLURRY, "200460357-2", Some("200455774-27")),
    ("AH151", Some("KOR154"), ToolType::Chemblend, "2313196", None, "200466047-2", None),
    ("AR151", Some("BT154"), ToolType::Chemblend, "2309019", None, "200466037-30", None),
    ("BH151", None, ToolType::Chemblend, "2310219", MODEL_CHEMBLEND, "200460944-3", Some("200461418-22")),
    ("BH152", None, ToolType::Chemblend, "2313195", None, "200466055-2", None),
    ("BT151", None, ToolType::Chemblend, "2309019", Some("2310216"), "200461416-20", Some("200460358-4")),
    ("BT152", None, ToolType::Chemblend, "2310216", MODEL_CHEMBLEND, "200462009-5", Some("200461417-21")),
    ("GR151", Some("SSC152"), ToolType::Chemblend, "2315220", MODEL_CHEMBLEND, "200466046-3", Some("200466043-32")),
    ("HD151", None, ToolType::Chemblend, "2310216", MODEL_CHEMBLEND, "200464063-8", Some("200463299-26")),
    ("HD152", None, ToolType::Chemblend, "2310216", MODEL_CHEMBLEND, "200464086-9", Some("200463300-27")),
    ("JT151", None, ToolType::Chemblend, "2313327", MODEL_CHEMBLEND, "200466038-2", Some("200465975-29")),
    ("KF151", None, ToolType::Chemblend, "2315219", MODEL_CHEMBLEND, "200464087-4", Some("200463301-28")),
    ("KF152", None, ToolType::Chemblend, "2315219", MODEL_CHEMBLEND, "200464085-3", Some("200466044-33")),
    ("KG151", None, ToolType::Chemblend, "2312626", MODEL_CHEMBLEND, "200462476-2", Some("200462477-25")),
    ("KG152", None, ToolType::Chemblend, "2309019", Some("2312626"), "200466042-31", Some("200466045-3")),
    ("KOR151", None, ToolType::Chemblend, "2310217", MODEL_CHEMBLEND, "200460945-4", Some("200455777-19")),
    ("KOR152", None, ToolType::Chemblend, "2310217", MODEL_CHEMBLEND, "200460946-5", Some("200461419-23")),
    ("SSC151", None, ToolType::Chemblend, "2315220", MODEL_CHEMBLEND, "200463971-1", Some("200462471-24")),
];

/// What one seeding pass created or changed. A second pass reports nothing new.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub users_created: usize,
    pub location_created: bool,
    pub tools_created: usize,
    pub demo_tech_created: bool,
    pub demo_tech_updated: bool,
    pub demo_tech_linked: bool,
    pub default_location_set: bool,
    pub passdowns_created: usize,
    /// Steps that failed; the remaining steps still ran
    pub failed_steps: Vec<String>,
}

impl SeedReport {
    pub fn created_anything(&self) -> bool {
        self.users_created > 0
            || self.location_created
            || self.tools_created > 0
            || self.demo_tech_created
            || self.demo_tech_updated
            || self.demo_tech_linked
            || self.default_location_set
            || self.passdowns_created > 0
    }
}

struct Seeder {
    locations: LocationService,
    tools: ToolService,
    users: UserService,
    passdowns: PassdownService,
}

/// Creates first-run users, the home fab and its tools, and the demo technician.
#[instrument(skip(db, config))]
pub async fn seed(db: Arc<DbPool>, config: &AppConfig) -> Result<SeedReport, ServiceError> {
    let encoder = PasswordEncoder::from_config(config)?;
    let seeder = Seeder {
        locations: LocationService::new(db.clone()),
        tools: ToolService::new(db.clone()),
        passdowns: PassdownService::new(db.clone()),
        users: UserService::new(db, encoder),
    };
    let mut report = SeedReport::default();

    if let Some(created) = run_step(&mut report, "default users", seeder.seed_users()).await {
        report.users_created = created;
    }
    if let Some((location_created, tools_created)) =
        run_step(&mut report, "hardcoded tools", seeder.seed_tools()).await
    {
        report.location_created = location_created;
        report.tools_created = tools_created;
    }
    if let Some((created, updated, linked)) =
        run_step(&mut report, "demo technician", seeder.seed_demo_tech()).await
    {
        report.demo_tech_created = created;
        report.demo_tech_updated = updated;
        report.demo_tech_linked = linked;
    }
    if let Some(set) = run_step(&mut report, "default location", seeder.seed_default_location()).await {
        report.default_location_set = set;
    }
    if let Some(created) = run_step(&mut report, "sample passdowns", seeder.seed_passdowns()).await {
        report.passdowns_created = created;
    }

    info!(
        users_created = report.users_created,
        tools_created = report.tools_created,
        passdowns_created = report.passdowns_created,
        failed_steps = report.failed_steps.len(),
        "data seed finished"
    );
    Ok(report)
}

async fn run_step<T, Fut>(report: &mut SeedReport, step: &str, future: Fut) -> Option<T>
where
    Fut: Future<Output = Result<T, ServiceError>>,
{
    match future.await {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(step, error = %err, "seed step failed");
            report.failed_steps.push(step.to_string());
            None
        }
    }
}

impl Seeder {
    async fn seed_users(&self) -> Result<usize, ServiceError> {
        if self.users.count().await? > 0 {
            return Ok(0);
        }
        for (email, password, name, role) in SEED_USERS {
            self.users.insert_seed_user(email, password, name, role).await?;
            info!(email, role, "default user created");
        }
        Ok(SEED_USERS.len())
    }

    async fn home_location(&self) -> Result<(location::Model, bool), ServiceError> {
        if let Some(existing) = self
            .locations
            .find_by_state_and_fab(HOME_STATE, HOME_FAB)
            .await?
        {
            return Ok((existing, false));
        }
        let created = self
            .locations
            .create(CreateLocationRequest {
                state: HOME_STATE.to_string(),
                fab: Some(HOME_FAB.to_string()),
                name: Some("Fab 52 Arizona".to_string()),
                ..Default::default()
            })
            .await?;
        warn!("location Arizona F52 was missing and has been created");
        Ok((created.location, true))
    }

    async fn seed_tools(&self) -> Result<(bool, usize), ServiceError> {
        if self.tools.count().await? > 0 {
            return Ok((false, 0));
        }
        let (location, location_created) = self.home_location().await?;
        let today = Utc::now().date_naive();

        for (name, secondary_name, tool_type, model1, model2, serial1, serial2) in SEED_TOOLS {
            self.tools
                .insert_model(tool::ActiveModel {
                    name: Set(name.to_string()),
                    secondary_name: Set(secondary_name.map(str::to_string)),
                    tool_type: Set(Some(tool_type)),
                    model1: Set(Some(model1.to_string())),
                    model2: Set(model2.map(str::to_string)),
                    serial_number1: Set(Some(serial1.to_string())),
                    serial_number2: Set(serial2.map(str::to_string)),
                    location_id: Set(Some(location.id)),
                    status: Set(ToolStatus::NotStarted),
                    set_date: Set(Some(today)),
                    ..blank_checklist()
                })
                .await?;
        }
        info!(
            tools = SEED_TOOLS.len(),
            location = %location.display_name(),
            "hardcoded tools created"
        );
        Ok((location_created, SEED_TOOLS.len()))
    }

    /// Returns (created, updated, linked to the demo tool)
    async fn seed_demo_tech(&self) -> Result<(bool, bool, bool), ServiceError> {
        let site = self
            .locations
            .find_by_state_and_fab(HOME_STATE, HOME_FAB)
            .await?;
        if site.is_none() {
            warn!("location Arizona F52 not found; demo technician gets no active site");
        }
        let demo_tool = self.tools.find_by_name(DEMO_TOOL_NAME).await?;
        if demo_tool.is_none() {
            warn!(tool = DEMO_TOOL_NAME, "demo tool not found; demo technician gets no active tool");
        }

        let (user, created) = match self.users.find_by_email(DEMO_TECH_EMAIL).await? {
            Some(user) => (user, false),
            None => {
                let user = self
                    .users
                    .insert_seed_user(DEMO_TECH_EMAIL, "password123", "Demo Tech", "TECHNICIAN")
                    .await?;
                info!(email = DEMO_TECH_EMAIL, "demo technician created");
                (user, true)
            }
        };

        let wanted_site = site.as_ref().map(|site| site.id).or(user.active_site_id);
        let wanted_tool = demo_tool.as_ref().map(|tool| tool.id);
        let updated = user.active_site_id != wanted_site || user.active_tool_id != wanted_tool;
        let user_id = user.id;
        if updated {
            let mut active: user::ActiveModel = user.into();
            active.active_site_id = Set(wanted_site);
            active.active_tool_id = Set(wanted_tool);
            self.users.save_model(active).await?;
            info!(email = DEMO_TECH_EMAIL, "demo technician active site/tool updated");
        }

        let mut linked = false;
        if let Some(tool) = demo_tool {
            let assigned = self.tools.tool_ids_for_technician(user_id).await?;
            if !assigned.contains(&tool.id) {
                self.tools.add_technician(tool.id, user_id).await?;
                linked = true;
                info!(tool = DEMO_TOOL_NAME, "demo technician added to tool technicians");
            }
        }
        // A freshly created user always gets its fields set, which is not an update
        Ok((created, updated && !created, linked))
    }

    /// Only runs against an empty passdown table. Rows whose author or tool
    /// is missing are skipped.
    async fn seed_passdowns(&self) -> Result<usize, ServiceError> {
        if self.passdowns.count().await? > 0 {
            return Ok(0);
        }
        let today = Utc::now().date_naive();
        let mut created = 0;
        for (days_ago, email, tool_name, comment) in SAMPLE_PASSDOWNS {
            let author = self.users.find_by_email(email).await?;
            let tool = self.tools.find_by_name(tool_name).await?;
            let (Some(author), Some(tool)) = (author, tool) else {
                warn!(email, tool = tool_name, "sample passdown skipped; author or tool missing");
                continue;
            };
            self.passdowns
                .create(CreatePassdownRequest {
                    comment: comment.to_string(),
                    date: Some(today - Duration::days(days_ago)),
                    user_id: Some(author.id),
                    tool_ids: vec![tool.id],
                    tech_ids: vec![author.id],
                    allow_duplicate: true,
                })
                .await?;
            created += 1;
        }
        info!(passdowns = created, "sample passdowns created");
        Ok(created)
    }

    async fn seed_default_location(&self) -> Result<bool, ServiceError> {
        if self.locations.get_default().await?.is_some() {
            return Ok(false);
        }
        let Some(home) = self
            .locations
            .find_by_state_and_fab(HOME_STATE, HOME_FAB)
            .await?
        else {
            return Ok(false);
        };
        self.locations.set_default(home.id).await?;
        info!(location_id = home.id, "home location marked as default");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hardcoded_tool_mix() {
        let slurry = SEED_TOOLS
            .iter()
            .filter(|(_, _, tool_type, ..)| *tool_type == ToolType::Slurry)
            .count();
        assert_eq!(slurry, 24);
        assert_eq!(SEED_TOOLS.len() - slurry, 17);
    }

    #[test]
    fn hardcoded_tool_names_are_unique() {
        let mut names: Vec<&str> = SEED_TOOLS.iter().map(|tool| tool.0).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), SEED_TOOLS.len());
        assert!(names.contains(&DEMO_TOOL_NAME));
    }

    #[test]
    fn sample_passdowns_reference_seeded_rows() {
        for (_, email, tool_name, comment) in SAMPLE_PASSDOWNS {
            assert!(SEED_USERS.iter().any(|user| user.0 == email), "{email}");
            assert!(SEED_TOOLS.iter().any(|tool| tool.0 == tool_name), "{tool_name}");
            assert!(!comment.trim().is_empty());
        }
    }
}
