use anyhow::Context;
use clap::Subcommand;
use serde_json::json;
use sqlx::migrate::Migrate;
use sqlx::PgPool;

use crate::cli::utils::{output_success, output_table};
use crate::cli::OutputFormat;
use crate::config::config;
use crate::database::{DatabaseManager, MIGRATOR};

#[derive(Subcommand)]
pub enum MigrateCommands {
    #[command(about = "Apply every pending migration")]
    Run,

    #[command(about = "Revert applied migrations newer than the target version")]
    Revert {
        #[arg(long, default_value_t = 0, help = "Version to keep (0 reverts everything)")]
        target: i64,
    },

    #[command(about = "List known migrations and whether they are applied")]
    Info,
}

pub async fn handle(cmd: MigrateCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let pool = DatabaseManager::connect(&config().database)
        .await
        .context("failed to connect to database")?;

    match cmd {
        MigrateCommands::Run => {
            DatabaseManager::migrate(&pool).await?;
            output_success(&output_format, "Migrations applied", None)
        }
        MigrateCommands::Revert { target } => {
            DatabaseManager::revert(&pool, target).await?;
            output_success(
                &output_format,
                &format!("Reverted to version {}", target),
                Some(json!({ "target": target })),
            )
        }
        MigrateCommands::Info => info(&pool, &output_format).await,
    }
}

async fn info(pool: &PgPool, output_format: &OutputFormat) -> anyhow::Result<()> {
    let mut conn = pool.acquire().await?;
    conn.ensure_migrations_table().await?;
    let applied = conn.list_applied_migrations().await?;

    let rows = MIGRATOR
        .iter()
        .filter(|m| m.migration_type.is_up_migration())
        .map(|m| {
            let status = if applied.iter().any(|a| a.version == m.version) {
                "applied"
            } else {
                "pending"
            };
            vec![m.version.to_string(), m.description.to_string(), status.to_string()]
        })
        .collect();

    output_table(output_format, "migrations", &["version", "description", "status"], rows)
}
