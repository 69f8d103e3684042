use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use serde::Serialize;

use pcd_manager::{
    bootstrap,
    config::{self, AppConfig},
    db::{self, DbPool},
};

#[derive(Parser)]
#[command(
    name = "pcd-admin",
    about = "Maintenance commands for the PCD Manager database",
    version
)]
struct Cli {
    #[arg(
        long,
        global = true,
        action = ArgAction::SetTrue,
        help = "Render command output as pretty JSON"
    )]
    json: bool,
    #[arg(
        long,
        global = true,
        help = "Database URL; overrides the configured one"
    )]
    database_url: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply pending migrations
    Migrate,
    /// Repair legacy tool statuses and types
    PatchSchema,
    /// Create first-run users, tools and the demo technician
    Seed {
        #[arg(
            long,
            action = ArgAction::SetTrue,
            help = "Run the schema patch before seeding"
        )]
        patch: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut cfg = config::load_config().context("failed to load configuration")?;
    if let Some(url) = cli.database_url.clone() {
        cfg.database_url = url;
    }
    config::init_tracing(&cfg.log_level, cfg.log_json);

    let pool = db::establish_connection_from_app_config(&cfg)
        .await
        .context("failed to connect to the database")?;

    match cli.command {
        Commands::Migrate => {
            db::run_migrations(&pool)
                .await
                .context("migrations failed")?;
            if cli.json {
                print_json(&serde_json::json!({ "migrated": true }))?;
            } else {
                println!("Migrations applied ({})", db::backend_name(&pool));
            }
        }
        Commands::PatchSchema => {
            let report = bootstrap::patch_schema(&pool)
                .await
                .context("schema patch failed")?;
            if cli.json {
                print_json(&report)?;
            } else {
                println!(
                    "Schema patch: {} legacy statuses mapped, {} unknown statuses reset, {} tool types reset",
                    report.legacy_statuses_mapped,
                    report.unknown_statuses_reset,
                    report.tool_types_reset
                );
            }
        }
        Commands::Seed { patch } => {
            if patch {
                bootstrap::patch_schema(&pool)
                    .await
                    .context("schema patch failed")?;
            }
            seed(pool, &cfg, cli.json).await?;
        }
    }

    Ok(())
}

async fn seed(pool: DbPool, cfg: &AppConfig, json: bool) -> Result<()> {
    let report = bootstrap::seed(Arc::new(pool), cfg)
        .await
        .context("data seed failed")?;
    if json {
        print_json(&report)?;
    } else if report.created_anything() {
        println!(
            "Seeded {} users, {} tools and {} passdowns",
            report.users_created, report.tools_created, report.passdowns_created
        );
    } else {
        println!("Nothing to seed");
    }
    if !report.failed_steps.is_empty() {
        eprintln!("Failed steps: {}", report.failed_steps.join(", "));
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
